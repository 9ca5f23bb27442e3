//! Schema prober: an immutable snapshot of which tables and columns exist.
//!
//! The snapshot is captured once per run, after ingest and before query
//! synthesis. Every query the builder emits is derived from one snapshot, and
//! only references tables and columns recorded present in it. If the store is
//! mutated after probing, queries built from the old snapshot may fail; the
//! pipeline never does that within a run.

use std::collections::{BTreeMap, BTreeSet};

use duckdb::Connection;
use serde::Serialize;

use crate::LakeError;
use crate::schemas::SHEETS;

const PROBE_COLUMNS: &str = "
SELECT lower(table_name), column_name
FROM information_schema.columns
WHERE table_schema = 'main' AND table_catalog = current_database()
ORDER BY lower(table_name), ordinal_position
";

/// Which tables exist (keyed by lower-cased name) and which columns each carries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SchemaSnapshot {
    tables: BTreeMap<String, bool>,
    columns: BTreeMap<String, BTreeSet<String>>,
}

impl SchemaSnapshot {
    /// Read the store's catalog (not its data) into a snapshot.
    ///
    /// Every canonical table gets an entry in the existence map, `false` when
    /// absent. Non-canonical tables that exist are recorded too.
    ///
    /// # Errors
    ///
    /// Returns [`LakeError::DuckDb`] if the catalog query fails.
    pub fn probe(conn: &Connection) -> Result<Self, LakeError> {
        let mut stmt = conn.prepare(PROBE_COLUMNS)?;
        let rows = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;

        let snapshot = Self::from_tables(
            rows.into_iter()
                .fold(BTreeMap::<String, Vec<String>>::new(), |mut acc, (t, c)| {
                    acc.entry(t).or_default().push(c);
                    acc
                }),
        );

        tracing::debug!(
            tables = ?snapshot.present_tables().collect::<Vec<_>>(),
            "probed schema"
        );
        Ok(snapshot)
    }

    /// Build a snapshot from `(table, columns)` pairs without touching a store.
    pub fn from_tables<I, T, C, S>(tables: I) -> Self
    where
        I: IntoIterator<Item = (T, C)>,
        T: AsRef<str>,
        C: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut snapshot = Self {
            tables: SHEETS.iter().map(|s| (s.table.to_string(), false)).collect(),
            columns: BTreeMap::new(),
        };
        for (table, cols) in tables {
            let key = table.as_ref().to_lowercase();
            snapshot.tables.insert(key.clone(), true);
            snapshot
                .columns
                .entry(key)
                .or_default()
                .extend(cols.into_iter().map(Into::into));
        }
        snapshot
    }

    /// Whether `table` exists (case-insensitive).
    #[must_use]
    pub fn has_table(&self, table: &str) -> bool {
        self.tables
            .get(&table.to_lowercase())
            .copied()
            .unwrap_or(false)
    }

    /// Whether `column` exists on `table`. Case-insensitive on both.
    #[must_use]
    pub fn has_column(&self, table: &str, column: &str) -> bool {
        self.column(table, column).is_some()
    }

    /// The stored spelling of `column` on `table`.
    ///
    /// An exact match wins; otherwise the first case-insensitive match.
    #[must_use]
    pub fn column(&self, table: &str, column: &str) -> Option<&str> {
        let cols = self.columns.get(&table.to_lowercase())?;
        if let Some(exact) = cols.get(column) {
            return Some(exact.as_str());
        }
        cols.iter()
            .find(|c| c.eq_ignore_ascii_case(column))
            .map(String::as_str)
    }

    /// Every column of `table` whose name starts with `prefix`.
    ///
    /// Ordered by plain string comparison, not numerically: `Network #10`
    /// sorts before `Network #2`.
    #[must_use]
    pub fn columns_like(&self, table: &str, prefix: &str) -> Vec<String> {
        self.columns
            .get(&table.to_lowercase())
            .map(|cols| {
                cols.iter()
                    .filter(|c| c.starts_with(prefix))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Names of tables recorded present, in ascending order.
    pub fn present_tables(&self) -> impl Iterator<Item = &str> {
        self.tables
            .iter()
            .filter(|(_, exists)| **exists)
            .map(|(name, _)| name.as_str())
    }

    /// Columns recorded for `table`, in ascending order.
    pub fn columns_of(&self, table: &str) -> impl Iterator<Item = &str> {
        self.columns
            .get(&table.to_lowercase())
            .into_iter()
            .flat_map(|cols| cols.iter().map(String::as_str))
    }
}
