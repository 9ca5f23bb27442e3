use rv_core::QueryType;
use rv_lake::QuerySet;
use serde::Serialize;

use crate::cli::root_commands::QueriesArgs;
use crate::context::AppContext;
use crate::output::output;
use crate::pipeline;

/// One domain's synthesized query, or why it could not be composed.
#[derive(Debug, Serialize, PartialEq, Eq)]
struct QueryEntry<'a> {
    domain: QueryType,
    #[serde(skip_serializing_if = "Option::is_none")]
    sql: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn entries(queries: &QuerySet) -> Vec<QueryEntry<'_>> {
    queries
        .iter()
        .map(|(domain, result)| match result {
            Ok(sql) => QueryEntry {
                domain,
                sql: Some(sql),
                error: None,
            },
            Err(error) => QueryEntry {
                domain,
                sql: None,
                error: Some(error.to_string()),
            },
        })
        .collect()
}

/// Handle `rvl queries`.
pub async fn handle(args: &QueriesArgs, ctx: &AppContext) -> anyhow::Result<()> {
    let source = pipeline::source_of(&args.source)?;
    let prepared = pipeline::prepare(ctx, &source)?;

    output(&entries(&prepared.queries), ctx.format)
}
