//! Profile-load error taxonomy.
//!
//! Failures split along one line: a profile that is not provisioned yet is
//! transient and retried locally, while an error raised by the service is
//! fatal and surfaced immediately. Both end in the same user-visible state
//! with a single recovery action (sign out); nothing propagates past the
//! bootstrap boundary uncaught.

use thiserror::Error;

/// Terminal profile-load failure shown on the error screen.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// The profile never appeared within the retry budget.
    #[error("could not load profile after {attempts} attempts")]
    RetriesExhausted {
        /// Total fetch attempts performed, initial fetch included.
        attempts: u32,
    },

    /// The service raised an error during a fetch. Not retried.
    #[error("unexpected error while loading profile: {0}")]
    Unexpected(String),
}

impl LoadError {
    /// Returns true if this failure came from exhausting the retry budget
    /// rather than from a service error.
    ///
    /// Exhaustion means the account was simply never provisioned in time;
    /// a service error indicates something genuinely broken.
    pub fn is_exhaustion(&self) -> bool {
        matches!(self, Self::RetriesExhausted { .. })
    }
}
