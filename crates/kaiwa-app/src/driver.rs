//! Driver trait for abstracting I/O operations.
//!
//! The [`Driver`] trait decouples the application runtime from specific
//! I/O implementations. Each frontend implements the trait to provide
//! platform-specific input and rendering, while the generic
//! [`crate::Runtime`] handles all orchestration.

use std::{future::Future, ops::Sub, time::Duration};

use crate::{App, AppEvent};

/// Abstracts platform I/O for the application runtime.
///
/// Implementations provide platform-specific input and rendering while the
/// generic [`Runtime`](crate::Runtime) handles orchestration logic. This
/// ensures the same orchestration code runs in production and simulation.
///
/// # Associated Types
///
/// - [`Error`](Driver::Error): Platform-specific error type
/// - [`Instant`](Driver::Instant): Time representation (real or virtual)
pub trait Driver: Send {
    /// Platform-specific error type.
    type Error: std::error::Error + Send + 'static;

    /// Time instant type. Enables virtual time in simulation.
    type Instant: Copy + Ord + Send + Sync + Sub<Output = Duration>;

    /// Poll for the next user-interaction event.
    ///
    /// Returns an event if one is available, or `None` if nothing is
    /// ready. Implementations should not block indefinitely; the runtime
    /// paces idle cycles itself.
    fn poll_event(&mut self) -> impl Future<Output = Result<Option<AppEvent>, Self::Error>> + Send;

    /// Render the application state.
    fn render(&mut self, app: &App<Self::Instant>) -> Result<(), Self::Error>;

    /// Tear down platform resources.
    fn stop(&mut self);
}
