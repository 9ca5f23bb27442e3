//! Analytical store configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StoreConfig {
    /// Path of the `DuckDB` file. Empty means an in-memory store for the run.
    #[serde(default)]
    pub path: String,

    /// Custom repository to install extensions from (e.g., a mirror URL).
    #[serde(default)]
    pub extension_repository: Option<String>,
}

impl StoreConfig {
    /// Whether the store should be opened in memory.
    #[must_use]
    pub fn is_in_memory(&self) -> bool {
        self.path.trim().is_empty() || self.path == ":memory:"
    }
}
