use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Per-vCenter rollup of the VM inventory.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VCenterSummary {
    pub id: String,
    pub server: String,
    pub vm_count: i64,
    pub cluster_count: i64,
    pub host_count: i64,
    pub datacenter_count: i64,
}
