//! Source pipeline: ingest → probe → synthesize.
//!
//! Shared by every command that reads a source. Each phase is preceded by a
//! cancellation checkpoint, so Ctrl-C stops the run at the next phase boundary.

use anyhow::Context;
use rv_lake::{IngestReport, QueryBuilder, QuerySet, SchemaSnapshot, Source};

use crate::cli::root_commands::SourceArgs;
use crate::context::AppContext;

/// Result of running a source through ingest, probe and synthesis.
pub struct Prepared {
    pub ingest: IngestReport,
    pub snapshot: SchemaSnapshot,
    pub queries: QuerySet,
}

/// Resolve the source selected on the command line.
pub fn source_of(args: &SourceArgs) -> anyhow::Result<Source> {
    args.source()
        .context("one of --excel-file or --sqlite-file is required")
}

/// Ingest `source` into the context's store and synthesize its queries.
pub fn prepare(ctx: &AppContext, source: &Source) -> anyhow::Result<Prepared> {
    let builder = QueryBuilder::new();

    ctx.checkpoint()?;
    let ingest = rv_lake::ingest(&ctx.lake, &builder, source, ctx.config.ingest.min_tables)
        .with_context(|| format!("failed to ingest {source}"))?;

    ctx.checkpoint()?;
    let snapshot =
        SchemaSnapshot::probe(ctx.lake.conn()).context("failed to probe the ingested schema")?;

    ctx.checkpoint()?;
    let queries = builder.build(&snapshot);
    tracing::info!(
        tables = snapshot.present_tables().count(),
        domains = queries.len(),
        "queries synthesized"
    );

    Ok(Prepared {
        ingest,
        snapshot,
        queries,
    })
}
