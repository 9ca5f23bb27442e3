use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A datastore resolved against the hosts (and host-bus adapters) that mount it.
///
/// One record per (cluster, datastore) pair. `host_id` is a comma-joined,
/// de-duplicated list of owning host object ids, or `"N/A"` when none resolved.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Datastore {
    pub cluster: String,
    pub disk_id: String,
    #[serde(rename = "freeCapacityGB")]
    pub free_capacity_gb: i64,
    pub hardware_accelerated_move: bool,
    pub host_id: String,
    pub model: String,
    pub protocol_type: String,
    #[serde(rename = "totalCapacityGB")]
    pub total_capacity_gb: i64,
    #[serde(rename = "type")]
    pub kind: String,
    pub vendor: String,
}
