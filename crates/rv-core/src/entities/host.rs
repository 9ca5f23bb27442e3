use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// An ESXi host row from the host sheet.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Host {
    pub cluster: String,
    pub cpu_cores: i64,
    pub cpu_sockets: i64,
    pub id: String,
    #[serde(rename = "memoryMB")]
    pub memory_mb: i64,
    pub model: String,
    pub vendor: String,
}
