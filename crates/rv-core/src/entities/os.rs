use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One bucket of the guest operating-system histogram.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Os {
    pub name: String,
    pub count: i64,
}
