//! The VM validation collaborator.
//!
//! Rule implementations live outside this workspace. Anything that can turn a
//! [`Vm`] into a list of [`Concern`]s plugs in here.

use std::future::Future;

use tokio_util::sync::CancellationToken;

use crate::entities::{Concern, Vm};
use crate::errors::ValidatorError;

/// Produces migration concerns for one VM.
///
/// Calls may be I/O bound. The orchestrator awaits them one at a time and
/// checks for cancellation between calls, never mid-call. A validator that
/// waits on something slow can watch `cancel` and return early itself.
pub trait VmValidator {
    /// Validate a single VM.
    ///
    /// # Errors
    ///
    /// Returns [`ValidatorError`] when this VM could not be validated. The
    /// caller skips the VM and keeps going.
    fn validate(
        &self,
        cancel: &CancellationToken,
        vm: &Vm,
    ) -> impl Future<Output = Result<Vec<Concern>, ValidatorError>>;
}
