use clap::Subcommand;

/// Concerns persisted in the store.
#[derive(Clone, Debug, Subcommand)]
pub enum ConcernCommands {
    /// List stored concerns, one record per VM and concern.
    List {
        /// Only these VM ids (repeatable).
        #[arg(long = "vm", value_name = "ID")]
        vm_ids: Vec<String>,
    },
    /// Delete stored concerns. Without --vm, deletes all of them.
    Clear {
        /// Only these VM ids (repeatable).
        #[arg(long = "vm", value_name = "ID")]
        vm_ids: Vec<String>,
    },
}
