use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A virtual machine as reported by the inventory export.
///
/// `uuid` and `folder` stay `None` when the export carries neither the
/// current nor the legacy column for them.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
#[allow(clippy::struct_excessive_bools)] // Mirrors the export's independent flag columns
pub struct Vm {
    pub id: String,
    pub name: String,
    pub uuid: Option<String>,
    pub folder: Option<String>,
    pub host: String,
    pub cluster: String,
    pub datacenter: String,
    pub power_state: String,
    pub cpu_count: i64,
    #[serde(rename = "memoryMB")]
    pub memory_mb: i64,
    pub guest_os: String,
    pub firmware: String,
    pub is_template: bool,
    pub networks: Vec<String>,
    pub disk_count: i64,
    #[serde(rename = "diskCapacityMiB")]
    pub disk_capacity_mib: i64,
    pub cpu_hot_add: bool,
    pub memory_hot_add: bool,
    pub vcenter: String,
}
