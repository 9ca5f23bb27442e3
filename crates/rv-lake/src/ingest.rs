//! Ingest pipeline: run a source's setup script into the canonical raw tables.
//!
//! Scripts run statement by statement and a failing statement is logged and
//! skipped. Exports routinely omit optional sheets; one missing sheet must not
//! stop the others from loading. What actually landed is read back from the
//! catalog afterwards.

use std::sync::LazyLock;

use duckdb::Connection;
use regex::Regex;
use serde::Serialize;

use crate::probe::SchemaSnapshot;
use crate::query::{FOREIGN_SCHEMA, QueryBuilder, Source};
use crate::schemas::{SHEETS, TABLE_DVPORT, TABLE_VCLUSTER};
use crate::sql::ident;
use crate::{InventoryLake, LakeError};
use rv_core::enums::{TABLE_VDATASTORE, TABLE_VHOST, TABLE_VINFO, TABLE_VNETWORK};

/// Tables the foreign-snapshot remap produces.
pub const FOREIGN_TABLES: &[&str] = &[
    TABLE_VINFO,
    TABLE_VHOST,
    TABLE_VCLUSTER,
    TABLE_VDATASTORE,
    TABLE_VNETWORK,
    TABLE_DVPORT,
];

static LEADING_KEYWORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(CREATE|INSERT|UPDATE|DELETE|DROP|ALTER|WITH|INSTALL|LOAD|ATTACH|DETACH)\b")
        .expect("leading keyword pattern is valid")
});

static CREATED_TABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)^CREATE\s+(?:OR\s+REPLACE\s+)?TABLE\s+(?:IF\s+NOT\s+EXISTS\s+)?"?([A-Za-z0-9_]+)"?"#,
    )
    .expect("created table pattern is valid")
});

/// Split `script` into executable statements.
///
/// A statement starts with one of the recognized leading keywords and runs to
/// the next `;` outside quotes. `--` comments are dropped, chunks with any
/// other leading word are ignored, and trailing text without a terminator is
/// not a statement.
#[must_use]
pub fn extract_statements(script: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut chars = script.chars().peekable();

    while let Some(ch) = chars.next() {
        match quote {
            Some(q) => {
                current.push(ch);
                if ch == q {
                    quote = None;
                }
            }
            None => match ch {
                '\'' | '"' => {
                    quote = Some(ch);
                    current.push(ch);
                }
                '-' if chars.peek() == Some(&'-') => {
                    for skipped in chars.by_ref() {
                        if skipped == '\n' {
                            current.push('\n');
                            break;
                        }
                    }
                }
                ';' => {
                    let text = current.trim();
                    if LEADING_KEYWORD.is_match(text) {
                        statements.push(text.to_string());
                    } else if !text.is_empty() {
                        tracing::debug!(statement = text, "ignoring unrecognized statement");
                    }
                    current.clear();
                }
                _ => current.push(ch),
            },
        }
    }

    if !current.trim().is_empty() {
        tracing::debug!(text = current.trim(), "ignoring unterminated trailing text");
    }
    statements
}

/// One statement that failed during a permissive run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatementFailure {
    pub statement: String,
    pub error: String,
}

/// What a permissive script run did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScriptOutcome {
    pub executed: usize,
    pub failures: Vec<StatementFailure>,
}

/// Execute every statement of `script`, logging and collecting failures.
pub fn execute_script(conn: &Connection, script: &str) -> ScriptOutcome {
    let mut outcome = ScriptOutcome::default();
    for statement in extract_statements(script) {
        match conn.execute_batch(&statement) {
            Ok(()) => outcome.executed += 1,
            Err(error) => {
                tracing::debug!(%error, statement = %statement, "statement failed");
                outcome.failures.push(StatementFailure {
                    statement,
                    error: error.to_string(),
                });
            }
        }
    }
    outcome
}

/// A canonical table the adapter expected but did not materialize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedTable {
    pub table: String,
    pub reason: String,
}

/// Result of loading one source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    pub source: Source,
    pub materialized: Vec<String>,
    pub skipped: Vec<SkippedTable>,
}

/// Detaches the foreign snapshot on every exit path.
struct DetachGuard<'a> {
    conn: &'a Connection,
}

impl Drop for DetachGuard<'_> {
    fn drop(&mut self) {
        let sql = format!("DETACH DATABASE IF EXISTS {}", ident(FOREIGN_SCHEMA));
        if let Err(error) = self.conn.execute_batch(&sql) {
            tracing::warn!(%error, "failed to detach foreign snapshot");
        }
    }
}

/// Load `source` into `lake`'s canonical raw tables.
///
/// # Errors
///
/// - [`LakeError::SourceNotFound`] if the file does not exist (checked first).
/// - [`LakeError::Extension`] if the adapter's engine extension will not load.
/// - [`LakeError::Synthesis`] if the ingest script fails to render.
/// - [`LakeError::NothingIngested`] if fewer than `min_tables` canonical
///   tables materialized.
/// - [`LakeError::DuckDb`] if the catalog cannot be read back.
pub fn ingest(
    lake: &InventoryLake,
    builder: &QueryBuilder,
    source: &Source,
    min_tables: usize,
) -> Result<IngestReport, LakeError> {
    if !source.path().is_file() {
        return Err(LakeError::SourceNotFound(source.path().to_path_buf()));
    }
    lake.load_extension(source.extension())?;
    let script = builder.ingest_script(source)?;

    let outcome = {
        let _guard = matches!(source, Source::Foreign(_)).then(|| DetachGuard { conn: lake.conn() });
        execute_script(lake.conn(), &script)
    };

    let expected: Vec<&str> = match source {
        Source::Tabular(_) => SHEETS.iter().map(|s| s.table).collect(),
        Source::Foreign(_) => FOREIGN_TABLES.to_vec(),
    };
    let report = summarize(lake.conn(), source, &expected, &outcome)?;

    tracing::info!(
        source = %source,
        materialized = report.materialized.len(),
        skipped = report.skipped.len(),
        "ingest finished"
    );
    for skipped in &report.skipped {
        tracing::warn!(table = %skipped.table, reason = %skipped.reason, "table not loaded");
    }

    if report.materialized.len() < min_tables {
        return Err(LakeError::NothingIngested {
            materialized: report.materialized.len(),
            required: min_tables,
        });
    }
    Ok(report)
}

fn summarize(
    conn: &Connection,
    source: &Source,
    expected: &[&str],
    outcome: &ScriptOutcome,
) -> Result<IngestReport, LakeError> {
    let snapshot = SchemaSnapshot::probe(conn)?;
    let mut materialized = Vec::new();
    let mut skipped = Vec::new();

    for table in expected {
        if snapshot.has_table(table) {
            materialized.push((*table).to_string());
            continue;
        }
        let reason = outcome
            .failures
            .iter()
            .find(|failure| {
                CREATED_TABLE
                    .captures(&failure.statement)
                    .is_some_and(|caps| caps[1].eq_ignore_ascii_case(table))
            })
            .map_or_else(|| "no statement created it".to_string(), |f| f.error.clone());
        skipped.push(SkippedTable {
            table: (*table).to_string(),
            reason,
        });
    }

    Ok(IngestReport {
        source: source.clone(),
        materialized,
        skipped,
    })
}
