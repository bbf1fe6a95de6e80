//! External auth/profile service contract.
//!
//! The backend (sessions, profiles, sign-out) is a collaborator behind
//! this trait. The application owns none of its wire formats or
//! persistence; it only consumes session-change notifications and issues
//! the four calls below.

use std::{fmt, future::Future};

use kaiwa_core::{Profile, Session, UserId};
use tokio::sync::mpsc;

/// Kind of auth-state change, as reported by the service.
///
/// Informational only: the session value carried alongside is
/// authoritative and handlers may ignore the kind entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthChangeEvent {
    /// A user signed in.
    SignedIn,
    /// The user signed out.
    SignedOut,
    /// The session token was refreshed.
    TokenRefreshed,
}

/// An auth-state change pushed by the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthChange {
    /// What happened.
    pub event: AuthChangeEvent,
    /// The new session. `None` means signed out.
    pub session: Option<Session>,
}

impl AuthChange {
    /// A sign-in carrying the new session.
    pub fn signed_in(session: Session) -> Self {
        Self { event: AuthChangeEvent::SignedIn, session: Some(session) }
    }

    /// A sign-out.
    pub fn signed_out() -> Self {
        Self { event: AuthChangeEvent::SignedOut, session: None }
    }
}

/// Releases an auth subscription exactly once, on drop.
///
/// Scoped acquisition with guaranteed release: the registration returned
/// by [`AuthService::subscribe`] must be disposed exactly once on
/// teardown, and tying the disposal to `Drop` makes double-release
/// unrepresentable.
pub struct UnsubscribeGuard {
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl UnsubscribeGuard {
    /// Create a guard that runs `release` when dropped.
    pub fn new(release: impl FnOnce() + Send + 'static) -> Self {
        Self { release: Some(Box::new(release)) }
    }

    /// A guard with nothing to release.
    pub fn noop() -> Self {
        Self { release: None }
    }
}

impl Drop for UnsubscribeGuard {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl fmt::Debug for UnsubscribeGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnsubscribeGuard").field("armed", &self.release.is_some()).finish()
    }
}

/// A live auth-change subscription: a channel of changes plus the guard
/// that releases the registration when the subscription is dropped.
#[derive(Debug)]
pub struct AuthSubscription {
    changes: mpsc::UnboundedReceiver<AuthChange>,
    _guard: UnsubscribeGuard,
}

impl AuthSubscription {
    /// Wrap a change receiver and its release guard.
    pub fn new(changes: mpsc::UnboundedReceiver<AuthChange>, guard: UnsubscribeGuard) -> Self {
        Self { changes, _guard: guard }
    }

    /// Take the next queued change without waiting. `None` if the queue is
    /// empty or the service hung up.
    pub fn try_recv(&mut self) -> Option<AuthChange> {
        self.changes.try_recv().ok()
    }

    /// Wait for the next change. `None` if the service hung up.
    pub async fn recv(&mut self) -> Option<AuthChange> {
        self.changes.recv().await
    }
}

/// Contract required from the external auth/profile service.
///
/// All methods are fallible; failures are converted to local UI state at
/// the bootstrap boundary and never propagate past it.
pub trait AuthService: Send {
    /// Service-specific error type.
    type Error: std::error::Error + Send + 'static;

    /// Register for auth-state changes.
    ///
    /// Registration is synchronous so that it can be ordered before the
    /// one-shot [`AuthService::get_session`] call at startup.
    fn subscribe(&mut self) -> Result<AuthSubscription, Self::Error>;

    /// One-shot fetch of the current session, covering the gap between
    /// process start and the first pushed change.
    fn get_session(
        &mut self,
    ) -> impl Future<Output = Result<Option<Session>, Self::Error>> + Send;

    /// Fetch the profile for a user. `Ok(None)` means the profile is not
    /// provisioned yet - an expected condition shortly after account
    /// creation, not an error.
    fn get_profile(
        &mut self,
        user_id: &UserId,
    ) -> impl Future<Output = Result<Option<Profile>, Self::Error>> + Send;

    /// Sign the current user out. The service follows up with a `None`
    /// session change on the subscription.
    fn sign_out(&mut self) -> impl Future<Output = Result<(), Self::Error>> + Send;
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use super::*;

    #[test]
    fn guard_releases_exactly_once_on_drop() {
        let released = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&released);
        let guard = UnsubscribeGuard::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(released.load(Ordering::SeqCst), 0);
        drop(guard);
        assert_eq!(released.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn dropping_the_subscription_releases_the_registration() {
        let released = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&released);
        let (tx, rx) = mpsc::unbounded_channel();

        let mut subscription = AuthSubscription::new(
            rx,
            UnsubscribeGuard::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );

        tx.send(AuthChange::signed_out()).unwrap();
        assert_eq!(subscription.try_recv(), Some(AuthChange::signed_out()));
        assert_eq!(subscription.try_recv(), None);

        drop(subscription);
        assert_eq!(released.load(Ordering::SeqCst), 1);
    }
}
