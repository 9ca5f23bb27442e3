//! Concern store: persist, read, and delete per-VM concern records.
//!
//! Writes never de-duplicate. Inserting the same tuple twice stores two rows;
//! every read path selects `DISTINCT`.

use std::collections::BTreeMap;

use duckdb::Connection;
use rv_core::entities::{Concern, ConcernRecord};

use crate::LakeError;
use crate::schemas::{
    ASSESSMENT_COL, CATEGORY_COL, CONCERN_ID_COL, CONCERNS_TABLE, LABEL_COL, VM_ID_COL,
};
use crate::sql::{ident, literal};

/// Predicates restricting which concern rows a read or delete touches.
///
/// An empty filter matches every row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConcernFilter {
    clauses: BTreeMap<String, String>,
}

impl ConcernFilter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to the given VM ids. With no ids the filter is unchanged.
    ///
    /// Ids are raw values; quoting happens here.
    #[must_use]
    pub fn where_vm_id<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let quoted: Vec<String> = ids.into_iter().map(|id| literal(id.as_ref())).collect();
        if quoted.is_empty() {
            return self;
        }
        self.clauses.insert(
            format!("{} IN", ident(VM_ID_COL)),
            format!("({})", quoted.join(", ")),
        );
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// The `WHERE` clause, or an empty string when there are no predicates.
    #[must_use]
    pub fn build(&self) -> String {
        if self.clauses.is_empty() {
            return String::new();
        }
        let predicates: Vec<String> = self
            .clauses
            .iter()
            .map(|(key, value)| format!("{key} {value}"))
            .collect();
        format!("WHERE {}", predicates.join(" AND "))
    }
}

/// Escaped row tuples for one multi-row insert.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConcernValueBatch {
    values: Vec<String>,
}

impl ConcernValueBatch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one row per concern, all attributed to `vm_id`.
    pub fn append(&mut self, vm_id: &str, concerns: &[Concern]) -> &mut Self {
        for concern in concerns {
            self.values.push(format!(
                "({}, {}, {}, {}, {})",
                literal(vm_id),
                literal(&concern.id),
                literal(&concern.label),
                literal(&concern.category),
                literal(&concern.assessment),
            ));
        }
        self
    }

    /// Row tuples joined for a `VALUES` list; empty for an empty batch.
    #[must_use]
    pub fn build(&self) -> String {
        self.values.join(", ")
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Reads and writes the `concerns` table through a borrowed connection.
pub struct ConcernStore<'a> {
    conn: &'a Connection,
}

impl<'a> ConcernStore<'a> {
    #[must_use]
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Distinct concerns (without VM id) matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns [`LakeError::DuckDb`] if the query fails.
    pub fn get(&self, filter: &ConcernFilter) -> Result<Vec<Concern>, LakeError> {
        let sql = format!(
            "SELECT DISTINCT {id}, {label}, {category}, {assessment} FROM {table} {filter} \
             ORDER BY {id}, {label}, {category}, {assessment}",
            id = ident(CONCERN_ID_COL),
            label = ident(LABEL_COL),
            category = ident(CATEGORY_COL),
            assessment = ident(ASSESSMENT_COL),
            table = ident(CONCERNS_TABLE),
            filter = filter.build(),
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], |row| {
            Ok(Concern {
                id: text(row, 0)?,
                label: text(row, 1)?,
                category: text(row, 2)?,
                assessment: text(row, 3)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Distinct full records matching `filter`, ordered by VM id then concern id.
    ///
    /// # Errors
    ///
    /// Returns [`LakeError::DuckDb`] if the query fails.
    pub fn records(&self, filter: &ConcernFilter) -> Result<Vec<ConcernRecord>, LakeError> {
        let sql = format!(
            "SELECT DISTINCT {vm}, {id}, {label}, {category}, {assessment} FROM {table} {filter} \
             ORDER BY {vm}, {id}, {label}, {category}, {assessment}",
            vm = ident(VM_ID_COL),
            id = ident(CONCERN_ID_COL),
            label = ident(LABEL_COL),
            category = ident(CATEGORY_COL),
            assessment = ident(ASSESSMENT_COL),
            table = ident(CONCERNS_TABLE),
            filter = filter.build(),
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], |row| {
            Ok(ConcernRecord {
                vm_id: text(row, 0)?,
                concern_id: text(row, 1)?,
                label: text(row, 2)?,
                category: text(row, 3)?,
                assessment: text(row, 4)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Physical rows matching `filter`, duplicates included.
    ///
    /// # Errors
    ///
    /// Returns [`LakeError::DuckDb`] if the query fails.
    pub fn row_count(&self, filter: &ConcernFilter) -> Result<u64, LakeError> {
        let sql = format!(
            "SELECT COUNT(*) FROM {} {}",
            ident(CONCERNS_TABLE),
            filter.build()
        );
        let count: i64 = self.conn.query_row(&sql, [], |row| row.get(0))?;
        Ok(u64::try_from(count).unwrap_or_default())
    }

    /// Write every row of `batch` in one statement; returns rows written.
    ///
    /// An empty batch issues no statement and returns 0.
    ///
    /// # Errors
    ///
    /// Returns [`LakeError::DuckDb`] if the insert fails. Nothing is retried.
    pub fn insert(&self, batch: &ConcernValueBatch) -> Result<usize, LakeError> {
        if batch.is_empty() {
            return Ok(0);
        }
        let sql = format!(
            "INSERT INTO {} ({}, {}, {}, {}, {}) VALUES {}",
            ident(CONCERNS_TABLE),
            ident(VM_ID_COL),
            ident(CONCERN_ID_COL),
            ident(LABEL_COL),
            ident(CATEGORY_COL),
            ident(ASSESSMENT_COL),
            batch.build(),
        );
        let written = self.conn.execute(&sql, [])?;
        tracing::debug!(rows = written, "concerns inserted");
        Ok(written)
    }

    /// Delete rows matching `filter`; returns rows removed.
    ///
    /// An empty filter deletes every concern in the store.
    ///
    /// # Errors
    ///
    /// Returns [`LakeError::DuckDb`] if the delete fails.
    pub fn delete(&self, filter: &ConcernFilter) -> Result<usize, LakeError> {
        let sql = format!("DELETE FROM {} {}", ident(CONCERNS_TABLE), filter.build());
        let removed = self.conn.execute(&sql, [])?;
        tracing::debug!(rows = removed, "concerns deleted");
        Ok(removed)
    }
}

fn text(row: &duckdb::Row<'_>, idx: usize) -> Result<String, duckdb::Error> {
    Ok(row.get::<_, Option<String>>(idx)?.unwrap_or_default())
}
