//! Ingest configuration.

use serde::{Deserialize, Serialize};

/// Default minimum number of canonical tables an ingest must produce.
const fn default_min_tables() -> usize {
    1
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IngestConfig {
    /// Fewer materialized tables than this fails the run.
    #[serde(default = "default_min_tables")]
    pub min_tables: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            min_tables: default_min_tables(),
        }
    }
}
