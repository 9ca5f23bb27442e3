pub mod concerns;
pub mod dispatch;
pub mod probe;
pub mod queries;
pub mod report;
pub mod schema;
