//! Lake error types.

use std::path::PathBuf;

use rv_core::QueryType;

/// Errors that can occur in the analytical store layer.
#[derive(Debug, thiserror::Error)]
pub enum LakeError {
    /// `DuckDB` operation failed.
    #[error("DuckDB error: {0}")]
    DuckDb(#[from] duckdb::Error),

    /// A required `DuckDB` extension could not be installed or loaded.
    #[error("Failed to load extension '{name}': {source}")]
    Extension {
        /// Extension name (e.g., "excel", "sqlite").
        name: String,
        /// Underlying engine error.
        source: duckdb::Error,
    },

    /// Query text for a report domain could not be composed.
    #[error(transparent)]
    Synthesis(#[from] SynthesisError),

    /// The source file handed to an ingest adapter does not exist.
    #[error("Source file not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    /// Ingest finished but too few canonical tables were materialized.
    #[error("Ingest produced {materialized} canonical table(s), at least {required} required")]
    NothingIngested {
        /// Tables that were created.
        materialized: usize,
        /// Minimum the caller asked for.
        required: usize,
    },

    /// The domain has no query for this source (prerequisite tables absent).
    #[error("Report domain '{0}' is not available for this source")]
    NotReportable(QueryType),

    /// The caller cancelled the operation.
    #[error("Operation cancelled")]
    Cancelled,

    /// I/O error (file checks on sources and store files).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures while rendering a query template.
///
/// Each one is tied to a single template, so it only ever disqualifies the
/// domain that template belongs to.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SynthesisError {
    /// The template references a placeholder no parameter was supplied for.
    #[error("Template '{template}' references unbound placeholder '{placeholder}'")]
    UnboundPlaceholder {
        template: &'static str,
        placeholder: String,
    },

    /// A parameter was supplied but the template never references it.
    #[error("Template '{template}' was given unused parameter '{parameter}'")]
    UnusedParameter {
        template: &'static str,
        parameter: String,
    },

    /// A `{{` without a matching `}}`.
    #[error("Template '{template}' is malformed at byte {offset}: unterminated placeholder")]
    Malformed { template: &'static str, offset: usize },
}
