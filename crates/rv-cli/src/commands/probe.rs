use rv_lake::{IngestReport, SchemaSnapshot};
use serde::Serialize;

use crate::cli::root_commands::ProbeArgs;
use crate::context::AppContext;
use crate::output::output;
use crate::pipeline;

#[derive(Serialize)]
struct ProbeResponse<'a> {
    ingest: &'a IngestReport,
    schema: &'a SchemaSnapshot,
}

/// Handle `rvl probe`.
pub async fn handle(args: &ProbeArgs, ctx: &AppContext) -> anyhow::Result<()> {
    let source = pipeline::source_of(&args.source)?;
    let prepared = pipeline::prepare(ctx, &source)?;

    output(
        &ProbeResponse {
            ingest: &prepared.ingest,
            schema: &prepared.snapshot,
        },
        ctx.format,
    )
}
