use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A migration-readiness issue flagged by a validator for one VM.
///
/// The VM it belongs to is implied by the call that produced it; see
/// [`ConcernRecord`] for the persisted shape that carries the VM id.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct Concern {
    pub id: String,
    pub label: String,
    pub category: String,
    pub assessment: String,
}

/// A concern row as stored in the `concerns` table.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct ConcernRecord {
    pub vm_id: String,
    pub concern_id: String,
    pub label: String,
    pub category: String,
    pub assessment: String,
}

impl ConcernRecord {
    /// Attach a validator-produced concern to the VM it was raised for.
    #[must_use]
    pub fn new(vm_id: &str, concern: &Concern) -> Self {
        Self {
            vm_id: vm_id.to_string(),
            concern_id: concern.id.clone(),
            label: concern.label.clone(),
            category: concern.category.clone(),
            assessment: concern.assessment.clone(),
        }
    }

    /// Drop the VM id, keeping the four logical concern fields.
    #[must_use]
    pub fn concern(&self) -> Concern {
        Concern {
            id: self.concern_id.clone(),
            label: self.label.clone(),
            category: self.category.clone(),
            assessment: self.assessment.clone(),
        }
    }
}
