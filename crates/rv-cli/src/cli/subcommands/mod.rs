mod concerns;

pub use concerns::ConcernCommands;
