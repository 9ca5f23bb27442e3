//! Cross-cutting error types.
//!
//! Storage and synthesis errors live in `rv-lake`; the binary converges
//! everything into `anyhow`.

use thiserror::Error;

/// Errors a [`crate::VmValidator`] can report for a single VM.
///
/// The orchestrator logs these and skips the VM; they never abort a batch.
#[derive(Debug, Error)]
pub enum ValidatorError {
    /// The VM record lacks data the validator needs.
    #[error("VM {vm_id} cannot be validated: {reason}")]
    Unvalidatable { vm_id: String, reason: String },

    /// The external validation capability failed or was unreachable.
    #[error("Validator backend failed: {0}")]
    Backend(String),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
