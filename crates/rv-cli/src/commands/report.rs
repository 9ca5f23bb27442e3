use rv_lake::{ReportAssembler, VmQueryOptions};

use crate::cli::root_commands::ReportArgs;
use crate::context::AppContext;
use crate::output::output;
use crate::pipeline;

/// Handle `rvl report`.
pub async fn handle(args: &ReportArgs, ctx: &AppContext) -> anyhow::Result<()> {
    let source = pipeline::source_of(&args.source)?;
    let prepared = pipeline::prepare(ctx, &source)?;

    let options = VmQueryOptions {
        cluster: args.cluster.clone(),
        limit: args.limit,
        offset: args.offset,
    };

    ctx.checkpoint()?;
    let report = ReportAssembler::new(ctx.lake.conn(), &prepared.queries)
        .assemble(&args.only, &options);

    for (domain, message) in &report.errors {
        tracing::warn!(%domain, %message, "report section failed");
    }
    if !report.unavailable.is_empty() {
        tracing::info!(unavailable = ?report.unavailable, "domains not reportable for this source");
    }

    output(&report, ctx.format)
}
