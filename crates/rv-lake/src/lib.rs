//! # rv-lake
//!
//! `DuckDB`-backed core of rvlake: load an inventory export, find out what it
//! actually contains, and report on it.
//!
//! ## Phases
//!
//! 1. [`ingest()`] runs a source's setup script into raw per-sheet tables,
//!    tolerating sheets the export does not carry.
//! 2. [`SchemaSnapshot::probe`] records which tables and columns exist.
//! 3. [`QueryBuilder::build`] renders a query per report domain whose
//!    prerequisite tables are present, resolving column-name drift per field.
//! 4. [`ReportAssembler`] runs each query and maps rows to `rv-core` entities.
//! 5. [`validate_all`] feeds every VM to a validator and stores the concerns
//!    through [`ConcernStore`].
//!
//! Every component borrows the single connection owned by [`InventoryLake`].

pub mod concerns;
pub mod drift;
pub mod error;
pub mod ingest;
pub mod probe;
pub mod protocol;
pub mod query;
pub mod report;
pub mod schemas;
pub mod sql;
pub mod templates;
pub mod validation;

pub use concerns::{ConcernFilter, ConcernStore, ConcernValueBatch};
pub use error::{LakeError, SynthesisError};
pub use ingest::{IngestReport, ingest};
pub use probe::SchemaSnapshot;
pub use query::{QueryBuilder, QuerySet, Source};
pub use report::{Report, ReportAssembler, VmQueryOptions};
pub use validation::{ValidationSummary, validate_all};

use duckdb::Connection;

use crate::sql::{ident, literal};

/// The session's analytical store.
///
/// Holds the raw tables of the ingested source and the `concerns` table.
pub struct InventoryLake {
    conn: Connection,
    extension_repository: Option<String>,
}

impl InventoryLake {
    /// Open or create a store file.
    ///
    /// Creates the `concerns` table if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns [`LakeError::DuckDb`] if the file cannot be opened or schema creation fails.
    pub fn open_local(path: &str) -> Result<Self, LakeError> {
        let conn = Connection::open(path)?;
        let lake = Self {
            conn,
            extension_repository: None,
        };
        lake.init_schema()?;
        Ok(lake)
    }

    /// Open an in-memory store.
    ///
    /// # Errors
    ///
    /// Returns [`LakeError::DuckDb`] if schema creation fails.
    pub fn open_in_memory() -> Result<Self, LakeError> {
        let conn = Connection::open_in_memory()?;
        let lake = Self {
            conn,
            extension_repository: None,
        };
        lake.init_schema()?;
        Ok(lake)
    }

    /// Install extensions from `repository` instead of the default one.
    #[must_use]
    pub fn with_extension_repository(mut self, repository: Option<String>) -> Self {
        self.extension_repository = repository;
        self
    }

    /// Access the underlying `DuckDB` connection.
    #[must_use]
    pub const fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Install and load an engine extension (`excel`, `sqlite`).
    ///
    /// # Errors
    ///
    /// Returns [`LakeError::Extension`] if either step fails.
    pub fn load_extension(&self, name: &str) -> Result<(), LakeError> {
        let install = match &self.extension_repository {
            Some(repository) => format!("INSTALL {} FROM {}", ident(name), literal(repository)),
            None => format!("INSTALL {}", ident(name)),
        };
        let load = format!("LOAD {}", ident(name));

        for sql in [install, load] {
            self.conn
                .execute_batch(&sql)
                .map_err(|source| LakeError::Extension {
                    name: name.to_string(),
                    source,
                })?;
        }
        tracing::debug!(extension = name, "extension loaded");
        Ok(())
    }

    fn init_schema(&self) -> Result<(), LakeError> {
        self.conn.execute_batch(schemas::CREATE_CONCERNS)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column_names(lake: &InventoryLake, table: &str) -> Vec<String> {
        let mut stmt = lake
            .conn()
            .prepare(
                "SELECT column_name FROM information_schema.columns \
                 WHERE table_name = ? ORDER BY ordinal_position",
            )
            .unwrap();
        stmt.query_map([table], |row| row.get(0))
            .unwrap()
            .collect::<Result<Vec<String>, _>>()
            .unwrap()
    }

    #[test]
    fn open_in_memory_creates_concerns_table() {
        let lake = InventoryLake::open_in_memory().unwrap();
        assert_eq!(
            column_names(&lake, schemas::CONCERNS_TABLE),
            vec!["VM_ID", "Concern_ID", "Label", "Category", "Assessment"]
        );
    }

    #[test]
    fn open_local_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.duckdb");
        let path = path.to_str().unwrap();

        drop(InventoryLake::open_local(path).unwrap());
        let lake = InventoryLake::open_local(path).unwrap();
        assert_eq!(column_names(&lake, schemas::CONCERNS_TABLE).len(), 5);
    }

    #[test]
    fn unknown_extension_is_an_extension_error() {
        let lake = InventoryLake::open_in_memory()
            .unwrap()
            .with_extension_repository(Some("/nonexistent/repository".into()));
        let err = lake.load_extension("no_such_extension").unwrap_err();
        assert!(matches!(err, LakeError::Extension { ref name, .. } if name == "no_such_extension"));
    }
}
