//! Observable bootstrap state types.
//!
//! [`BootstrapPhase`] is the "view model" of the session/profile bootstrap:
//! exactly one of {unauthenticated, loading, ready, failed} holds at any
//! time, and screen navigation is only reachable from `Ready`.

use std::time::Duration;

use kaiwa_core::{LoadError, Profile};

/// Retries performed after the initial profile fetch comes back empty.
pub const DEFAULT_PROFILE_RETRIES: u32 = 5;

/// Constant delay between profile fetch attempts (not exponential).
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(1000);

/// Bootstrap phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootstrapPhase {
    /// No session; the auth screen is shown.
    Unauthenticated,
    /// Session present, profile fetch (or a retry) in flight.
    Loading,
    /// Profile loaded; screens are reachable.
    Ready {
        /// The signed-in user's profile.
        profile: Profile,
    },
    /// Profile load failed; the only recovery action is sign-out.
    Failed {
        /// What went wrong.
        error: LoadError,
    },
}

impl BootstrapPhase {
    /// Profile of the signed-in user. `None` unless `Ready`.
    pub fn profile(&self) -> Option<&Profile> {
        match self {
            Self::Ready { profile } => Some(profile),
            _ => None,
        }
    }

    /// Load failure. `None` unless `Failed`.
    pub fn error(&self) -> Option<&LoadError> {
        match self {
            Self::Failed { error } => Some(error),
            _ => None,
        }
    }
}

/// Profile fetch retry policy.
///
/// A freshly created account may not have a provisioned profile yet, so an
/// empty fetch result is retried a bounded number of times at a constant
/// interval before giving up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the initial attempt.
    pub max_retries: u32,
    /// Delay between consecutive attempts.
    pub delay: Duration,
}

impl RetryPolicy {
    /// Total fetch attempts this policy allows, initial fetch included.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries + 1
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_retries: DEFAULT_PROFILE_RETRIES, delay: DEFAULT_RETRY_DELAY }
    }
}
