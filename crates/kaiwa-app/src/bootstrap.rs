//! Session/profile bootstrap state machine.
//!
//! Establishes session and profile state after process start or an auth
//! change: `Unauthenticated -> Loading -> {Ready, Failed}`, re-entered
//! whenever the session reference changes (including to `None`, which
//! forces `Unauthenticated`).
//!
//! This is a pure state machine in the action pattern: methods take time
//! as input and return [`AppAction`]s for the runtime to execute. No I/O,
//! no clock reads.
//!
//! # Retry semantics
//!
//! A fetch that resolves to "no profile" is transient (the account may not
//! be provisioned yet) and is retried at a constant interval within a
//! bounded budget. A fetch that resolves to an error is fatal and fails
//! fast with zero retries. The asymmetry is deliberate.
//!
//! # Stale guard
//!
//! Every session change bumps an epoch counter. Fetch results and retry
//! firings carry the epoch they were issued under; anything stale is
//! discarded, so a pending retry can never overwrite state after a logout
//! or a session swap.

use std::{ops::Sub, time::Duration};

use kaiwa_core::{LoadError, Profile, Session};

use crate::{AppAction, BootstrapPhase, RetryPolicy};

/// Session/profile bootstrap state machine.
///
/// Generic over `I` to support both real and virtual time.
#[derive(Debug, Clone)]
pub struct Bootstrap<I = std::time::Instant>
where
    I: Copy + Ord + Send + Sync + Sub<Output = Duration>,
{
    /// Current session. Replaced wholesale on every auth event.
    session: Option<Session>,
    /// Current phase.
    phase: BootstrapPhase,
    /// Bumped on every session change; stale-callback guard.
    epoch: u64,
    /// Retry budget and spacing.
    policy: RetryPolicy,
    /// Retries left within the current load.
    retries_left: u32,
    /// Fetch attempts issued within the current load.
    attempts_made: u32,
    /// When the pending retry delay started. `None` if no retry armed.
    retry_armed: Option<I>,
}

impl<I> Default for Bootstrap<I>
where
    I: Copy + Ord + Send + Sync + Sub<Output = Duration>,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<I> Bootstrap<I>
where
    I: Copy + Ord + Send + Sync + Sub<Output = Duration>,
{
    /// Create a bootstrap machine with the default retry policy.
    pub fn new() -> Self {
        Self::with_policy(RetryPolicy::default())
    }

    /// Create a bootstrap machine with the given retry policy.
    pub fn with_policy(policy: RetryPolicy) -> Self {
        Self {
            session: None,
            phase: BootstrapPhase::Unauthenticated,
            epoch: 0,
            policy,
            retries_left: 0,
            attempts_made: 0,
            retry_armed: None,
        }
    }

    /// Replace the session and restart the load.
    ///
    /// Invalidates everything in flight (epoch bump, retry disarm). A
    /// `Some` session enters `Loading` and issues the initial fetch; a
    /// `None` session forces `Unauthenticated`.
    pub fn handle_session_change(&mut self, session: Option<Session>) -> Vec<AppAction> {
        self.epoch = self.epoch.wrapping_add(1);
        self.retry_armed = None;
        self.session = session;

        match &self.session {
            Some(session) => {
                self.phase = BootstrapPhase::Loading;
                self.retries_left = self.policy.max_retries;
                self.attempts_made = 1;
                vec![
                    AppAction::FetchProfile { user_id: session.user_id.clone(), epoch: self.epoch },
                    AppAction::Render,
                ]
            },
            None => {
                self.phase = BootstrapPhase::Unauthenticated;
                vec![AppAction::Render]
            },
        }
    }

    /// Apply a resolved profile fetch.
    ///
    /// Results from a previous epoch, or arriving outside `Loading`, are
    /// discarded.
    pub fn handle_profile_result(
        &mut self,
        epoch: u64,
        result: Result<Option<Profile>, String>,
        now: I,
    ) -> Vec<AppAction> {
        if epoch != self.epoch {
            tracing::debug!(stale = epoch, current = self.epoch, "discarding stale fetch result");
            return vec![];
        }
        if self.phase != BootstrapPhase::Loading {
            return vec![];
        }

        match result {
            Ok(Some(profile)) => {
                self.phase = BootstrapPhase::Ready { profile };
                vec![AppAction::Render]
            },
            Ok(None) if self.retries_left > 0 => {
                self.retries_left -= 1;
                self.retry_armed = Some(now);
                // Still loading; the retry fires from handle_tick.
                vec![]
            },
            Ok(None) => {
                self.phase = BootstrapPhase::Failed {
                    error: LoadError::RetriesExhausted { attempts: self.attempts_made },
                };
                vec![AppAction::Render]
            },
            Err(message) => {
                self.phase =
                    BootstrapPhase::Failed { error: LoadError::Unexpected(message) };
                vec![AppAction::Render]
            },
        }
    }

    /// Fire the armed retry once its delay has elapsed.
    pub fn handle_tick(&mut self, now: I) -> Vec<AppAction> {
        let Some(armed_at) = self.retry_armed else {
            return vec![];
        };
        if now < armed_at || now - armed_at < self.policy.delay {
            return vec![];
        }
        self.retry_armed = None;

        match (&self.phase, &self.session) {
            (BootstrapPhase::Loading, Some(session)) => {
                self.attempts_made += 1;
                vec![AppAction::FetchProfile {
                    user_id: session.user_id.clone(),
                    epoch: self.epoch,
                }]
            },
            _ => vec![],
        }
    }

    /// Current session. `None` if signed out.
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Current phase.
    pub fn phase(&self) -> &BootstrapPhase {
        &self.phase
    }

    /// Loaded profile. `None` unless `Ready`.
    pub fn profile(&self) -> Option<&Profile> {
        self.phase.profile()
    }

    /// Load failure. `None` unless `Failed`.
    pub fn error(&self) -> Option<&LoadError> {
        self.phase.error()
    }

    /// Current epoch. Bumped on every session change.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Fetch attempts issued within the current load.
    pub fn attempts_made(&self) -> u32 {
        self.attempts_made
    }

    /// True if a retry is armed and waiting for its delay.
    pub fn retry_pending(&self) -> bool {
        self.retry_armed.is_some()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use kaiwa_core::UserId;

    use super::*;

    fn session() -> Session {
        Session::new(UserId::new("user-1"), "token-1")
    }

    fn profile() -> Profile {
        Profile {
            id: UserId::new("user-1"),
            username: "haru".into(),
            lang: kaiwa_core::Lang::Japanese,
            avatar: "cat.png".into(),
        }
    }

    fn fetch_epoch(actions: &[AppAction]) -> Option<u64> {
        actions.iter().find_map(|a| match a {
            AppAction::FetchProfile { epoch, .. } => Some(*epoch),
            _ => None,
        })
    }

    #[test]
    fn session_arrival_starts_loading_and_fetches() {
        let mut bootstrap: Bootstrap = Bootstrap::new();
        let actions = bootstrap.handle_session_change(Some(session()));

        assert!(fetch_epoch(&actions).is_some());
        assert_eq!(*bootstrap.phase(), BootstrapPhase::Loading);
        assert_eq!(bootstrap.attempts_made(), 1);
    }

    #[test]
    fn empty_result_arms_retry_that_respects_the_delay() {
        let mut bootstrap: Bootstrap = Bootstrap::new();
        let t0 = Instant::now();
        let epoch = fetch_epoch(&bootstrap.handle_session_change(Some(session()))).unwrap();

        let actions = bootstrap.handle_profile_result(epoch, Ok(None), t0);
        assert!(actions.is_empty());
        assert!(bootstrap.retry_pending());

        // Too early: nothing fires.
        assert!(bootstrap.handle_tick(t0 + Duration::from_millis(999)).is_empty());

        let actions = bootstrap.handle_tick(t0 + Duration::from_millis(1000));
        assert_eq!(fetch_epoch(&actions), Some(epoch));
        assert_eq!(bootstrap.attempts_made(), 2);
    }

    #[test]
    fn never_provisioned_profile_exhausts_after_six_attempts() {
        let mut bootstrap: Bootstrap = Bootstrap::new();
        let t0 = Instant::now();
        let epoch = fetch_epoch(&bootstrap.handle_session_change(Some(session()))).unwrap();

        let mut now = t0;
        let mut attempts = 1;
        loop {
            let actions = bootstrap.handle_profile_result(epoch, Ok(None), now);
            if *bootstrap.phase() != BootstrapPhase::Loading || !bootstrap.retry_pending() {
                assert!(actions.contains(&AppAction::Render));
                break;
            }
            now += Duration::from_millis(1000);
            let fired = bootstrap.handle_tick(now);
            assert_eq!(fetch_epoch(&fired), Some(epoch));
            attempts += 1;
        }

        assert_eq!(attempts, 6);
        assert_eq!(bootstrap.attempts_made(), 6);
        assert_eq!(
            bootstrap.error(),
            Some(&LoadError::RetriesExhausted { attempts: 6 })
        );
    }

    #[test]
    fn fetch_error_fails_fast_with_zero_retries() {
        let mut bootstrap: Bootstrap = Bootstrap::new();
        let t0 = Instant::now();
        let epoch = fetch_epoch(&bootstrap.handle_session_change(Some(session()))).unwrap();

        let actions = bootstrap.handle_profile_result(epoch, Err("boom".into()), t0);
        assert!(actions.contains(&AppAction::Render));
        assert_eq!(bootstrap.error(), Some(&LoadError::Unexpected("boom".into())));
        assert_eq!(bootstrap.attempts_made(), 1);

        // No retry is armed after a hard failure.
        assert!(!bootstrap.retry_pending());
        assert!(bootstrap.handle_tick(t0 + Duration::from_secs(10)).is_empty());
    }

    #[test]
    fn success_transitions_to_ready() {
        let mut bootstrap: Bootstrap = Bootstrap::new();
        let t0 = Instant::now();
        let epoch = fetch_epoch(&bootstrap.handle_session_change(Some(session()))).unwrap();

        bootstrap.handle_profile_result(epoch, Ok(Some(profile())), t0);
        assert_eq!(bootstrap.profile(), Some(&profile()));
        assert!(bootstrap.error().is_none());
    }

    #[test]
    fn stale_result_from_previous_epoch_is_discarded() {
        let mut bootstrap: Bootstrap = Bootstrap::new();
        let t0 = Instant::now();
        let old_epoch = fetch_epoch(&bootstrap.handle_session_change(Some(session()))).unwrap();

        bootstrap.handle_session_change(None);
        let actions = bootstrap.handle_profile_result(old_epoch, Ok(Some(profile())), t0);

        assert!(actions.is_empty());
        assert_eq!(*bootstrap.phase(), BootstrapPhase::Unauthenticated);
        assert!(bootstrap.profile().is_none());
    }

    #[test]
    fn pending_retry_never_fires_after_logout() {
        let mut bootstrap: Bootstrap = Bootstrap::new();
        let t0 = Instant::now();
        let epoch = fetch_epoch(&bootstrap.handle_session_change(Some(session()))).unwrap();
        bootstrap.handle_profile_result(epoch, Ok(None), t0);
        assert!(bootstrap.retry_pending());

        bootstrap.handle_session_change(None);
        assert!(!bootstrap.retry_pending());
        assert!(bootstrap.handle_tick(t0 + Duration::from_secs(10)).is_empty());
        assert_eq!(*bootstrap.phase(), BootstrapPhase::Unauthenticated);
    }

    #[test]
    fn signout_after_failure_clears_everything() {
        let mut bootstrap: Bootstrap = Bootstrap::new();
        let t0 = Instant::now();
        let epoch = fetch_epoch(&bootstrap.handle_session_change(Some(session()))).unwrap();
        bootstrap.handle_profile_result(epoch, Err("boom".into()), t0);
        assert!(bootstrap.error().is_some());

        bootstrap.handle_session_change(None);
        assert_eq!(*bootstrap.phase(), BootstrapPhase::Unauthenticated);
        assert!(bootstrap.session().is_none());
        assert!(bootstrap.profile().is_none());
        assert!(bootstrap.error().is_none());
    }

    #[test]
    fn new_session_restarts_the_load_under_a_fresh_epoch() {
        let mut bootstrap: Bootstrap = Bootstrap::new();
        let first = fetch_epoch(&bootstrap.handle_session_change(Some(session()))).unwrap();
        let second = fetch_epoch(
            &bootstrap.handle_session_change(Some(Session::new(UserId::new("user-2"), "token-2"))),
        )
        .unwrap();

        assert_ne!(first, second);
        assert_eq!(bootstrap.attempts_made(), 1);
    }
}
