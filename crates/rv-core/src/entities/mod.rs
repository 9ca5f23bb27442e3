//! Entity records produced by executing synthesized report queries.
//!
//! Records are flat projections of a result row. They never point at each
//! other; relationships are carried by the string identifiers already in the
//! row (a cluster name, a comma-joined host id list).

mod concern;
mod datastore;
mod host;
mod network;
mod os;
mod vcenter;
mod vm;

pub use concern::{Concern, ConcernRecord};
pub use datastore::Datastore;
pub use host::Host;
pub use network::Network;
pub use os::Os;
pub use vcenter::VCenterSummary;
pub use vm::Vm;
