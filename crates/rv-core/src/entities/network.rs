use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A logical network per (cluster, switch, network) triple.
///
/// `vlan_id` is empty when the export has no distributed-port sheet.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Network {
    pub cluster: String,
    pub dvswitch: String,
    pub name: String,
    /// Always `"distributed"`.
    #[serde(rename = "type")]
    pub kind: String,
    pub vlan_id: String,
    pub vms_count: i64,
}
