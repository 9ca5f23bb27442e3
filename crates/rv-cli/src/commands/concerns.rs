use anyhow::Context;
use rv_lake::{ConcernFilter, ConcernStore};
use serde::Serialize;

use crate::cli::subcommands::ConcernCommands;
use crate::context::AppContext;
use crate::output::output;

#[derive(Serialize)]
struct ClearResponse {
    removed: usize,
}

/// Handle `rvl concerns`.
pub async fn handle(action: &ConcernCommands, ctx: &AppContext) -> anyhow::Result<()> {
    if ctx.config.store.is_in_memory() {
        tracing::warn!("store is in memory; set --db-path to read concerns from an earlier run");
    }
    let store = ConcernStore::new(ctx.lake.conn());

    match action {
        ConcernCommands::List { vm_ids } => {
            let filter = ConcernFilter::new().where_vm_id(vm_ids);
            let records = store.records(&filter).context("failed to read concerns")?;
            output(&records, ctx.format)
        }
        ConcernCommands::Clear { vm_ids } => {
            let filter = ConcernFilter::new().where_vm_id(vm_ids);
            let removed = store.delete(&filter).context("failed to delete concerns")?;
            tracing::info!(removed, "concerns cleared");
            output(&ClearResponse { removed }, ctx.format)
        }
    }
}
