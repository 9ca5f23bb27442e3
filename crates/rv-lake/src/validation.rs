//! Validation orchestrator: run a [`VmValidator`] over every ingested VM and
//! persist what it finds.

use rv_core::VmValidator;
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::concerns::{ConcernStore, ConcernValueBatch};
use crate::query::QuerySet;
use crate::report::{ReportAssembler, VmQueryOptions};
use crate::{InventoryLake, LakeError};

/// Counts from one validation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ValidationSummary {
    pub vms_checked: usize,
    pub vms_failed: usize,
    pub concerns_written: usize,
}

/// Validate every VM sequentially and flush all concerns in one insert.
///
/// A validator error for one VM is logged and that VM is skipped. `cancel` is
/// checked before each VM and before the flush, and is handed to every
/// validator call; a call already in flight is not aborted.
///
/// # Errors
///
/// - [`LakeError::Cancelled`] if `cancel` fires; nothing from this pass is
///   written.
/// - [`LakeError::NotReportable`] / [`LakeError::Synthesis`] if the VM domain
///   has no usable query.
/// - [`LakeError::DuckDb`] if reading VMs or the insert fails.
pub async fn validate_all<V: VmValidator>(
    cancel: &CancellationToken,
    lake: &InventoryLake,
    queries: &QuerySet,
    validator: &V,
) -> Result<ValidationSummary, LakeError> {
    let vms = ReportAssembler::new(lake.conn(), queries).vms(&VmQueryOptions::default())?;
    let mut batch = ConcernValueBatch::new();
    let mut summary = ValidationSummary::default();

    for vm in &vms {
        if cancel.is_cancelled() {
            tracing::info!(checked = summary.vms_checked, "validation cancelled");
            return Err(LakeError::Cancelled);
        }
        summary.vms_checked += 1;
        match validator.validate(cancel, vm).await {
            Ok(concerns) => {
                batch.append(&vm.id, &concerns);
            }
            Err(error) => {
                summary.vms_failed += 1;
                tracing::warn!(vm_id = %vm.id, %error, "validation failed for VM");
            }
        }
    }

    if cancel.is_cancelled() {
        return Err(LakeError::Cancelled);
    }
    summary.concerns_written = ConcernStore::new(lake.conn()).insert(&batch)?;

    tracing::info!(
        vms = summary.vms_checked,
        failed = summary.vms_failed,
        concerns = summary.concerns_written,
        "validation finished"
    );
    Ok(summary)
}
