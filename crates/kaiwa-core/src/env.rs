//! Environment abstraction for deterministic testing.
//!
//! Decouples application logic from the system clock. State machines never
//! read time themselves; `now` is passed into the methods that need it,
//! and only driver code awaits [`Environment::sleep`]. This lets the same
//! bootstrap and runtime code run against real time in production and a
//! virtual clock in simulation.

use std::time::Duration;

/// Abstract environment providing time.
///
/// # Invariants
///
/// Implementations MUST guarantee that `now()` never goes backwards within
/// a single execution context.
pub trait Environment: Clone + Send + Sync + 'static {
    /// The specific instant type used by this environment.
    ///
    /// Production environments use `std::time::Instant`, while simulation
    /// environments use virtual time.
    type Instant: Copy + Ord + Send + Sync + std::ops::Sub<Output = Duration>;

    /// Current time (monotonic).
    fn now(&self) -> Self::Instant;

    /// Sleeps for the specified duration.
    ///
    /// This is the only async method in the trait, and it should only be
    /// used by driver code (not state-machine logic).
    fn sleep(&self, duration: Duration) -> impl std::future::Future<Output = ()> + Send;
}

/// Production environment backed by the system clock and tokio timers.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioEnv;

impl TokioEnv {
    /// Create a new production environment.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Environment for TokioEnv {
    type Instant = std::time::Instant;

    fn now(&self) -> Self::Instant {
        std::time::Instant::now()
    }

    fn sleep(&self, duration: Duration) -> impl std::future::Future<Output = ()> + Send {
        tokio::time::sleep(duration)
    }
}
