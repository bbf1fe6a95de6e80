//! Scripted auth/profile service.

use std::{collections::VecDeque, future::Future, sync::Arc, sync::atomic::AtomicUsize};

use kaiwa_app::{AuthChange, AuthService, AuthSubscription, UnsubscribeGuard};
use kaiwa_core::{Environment, Profile, Session, UserId};
use thiserror::Error;
use tokio::sync::mpsc;

use crate::{SimEnv, SimInstant};

/// Scripted outcome of one profile fetch.
#[derive(Debug, Clone)]
pub enum ProfileStep {
    /// Profile not provisioned yet.
    Missing,
    /// Profile available.
    Found(Profile),
    /// The service raises an error.
    Fail(String),
}

/// Errors raised by the scripted service.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SimAuthError {
    /// `subscribe` was called while a subscription was already live.
    #[error("already subscribed")]
    AlreadySubscribed,

    /// Scripted fetch failure.
    #[error("simulated service failure: {0}")]
    Scripted(String),
}

/// Scripted auth/profile service.
///
/// Sessions, profile fetch outcomes and pushed auth changes are all set up
/// front; the service records every profile fetch with its virtual
/// timestamp so tests can assert attempt counts and spacing.
#[derive(Debug)]
pub struct SimAuth {
    env: SimEnv,
    session: Option<Session>,
    profile_script: VecDeque<ProfileStep>,
    profile_calls: Vec<(UserId, SimInstant)>,
    changes_tx: mpsc::UnboundedSender<AuthChange>,
    changes_rx: Option<mpsc::UnboundedReceiver<AuthChange>>,
    releases: Arc<AtomicUsize>,
    sign_outs: usize,
}

impl SimAuth {
    /// Create a service with no session and an empty script.
    pub fn new(env: SimEnv) -> Self {
        let (changes_tx, changes_rx) = mpsc::unbounded_channel();
        Self {
            env,
            session: None,
            profile_script: VecDeque::new(),
            profile_calls: Vec::new(),
            changes_tx,
            changes_rx: Some(changes_rx),
            releases: Arc::new(AtomicUsize::new(0)),
            sign_outs: 0,
        }
    }

    /// Set the session returned by the one-shot fetch.
    #[must_use]
    pub fn with_session(mut self, session: Session) -> Self {
        self.session = Some(session);
        self
    }

    /// Append steps to the profile fetch script. Fetches beyond the script
    /// resolve as not-yet-provisioned.
    #[must_use]
    pub fn script_profile(mut self, steps: impl IntoIterator<Item = ProfileStep>) -> Self {
        self.profile_script.extend(steps);
        self
    }

    /// Sender for pushing auth changes into the live subscription.
    pub fn emitter(&self) -> mpsc::UnboundedSender<AuthChange> {
        self.changes_tx.clone()
    }

    /// Every profile fetch performed, with its virtual timestamp.
    pub fn attempt_times(&self) -> &[(UserId, SimInstant)] {
        &self.profile_calls
    }

    /// How many times the subscription registration was released.
    pub fn release_count(&self) -> usize {
        self.releases.load(std::sync::atomic::Ordering::SeqCst)
    }

    /// How many sign-out calls were made.
    pub fn sign_out_count(&self) -> usize {
        self.sign_outs
    }
}

impl AuthService for SimAuth {
    type Error = SimAuthError;

    fn subscribe(&mut self) -> Result<AuthSubscription, Self::Error> {
        let changes = self.changes_rx.take().ok_or(SimAuthError::AlreadySubscribed)?;
        let releases = Arc::clone(&self.releases);
        let guard = UnsubscribeGuard::new(move || {
            releases.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        });
        Ok(AuthSubscription::new(changes, guard))
    }

    fn get_session(
        &mut self,
    ) -> impl Future<Output = Result<Option<Session>, Self::Error>> + Send {
        let session = self.session.clone();
        async move { Ok(session) }
    }

    fn get_profile(
        &mut self,
        user_id: &UserId,
    ) -> impl Future<Output = Result<Option<Profile>, Self::Error>> + Send {
        self.profile_calls.push((user_id.clone(), self.env.now()));
        let step = self.profile_script.pop_front().unwrap_or(ProfileStep::Missing);
        let result = match step {
            ProfileStep::Missing => Ok(None),
            ProfileStep::Found(profile) => Ok(Some(profile)),
            ProfileStep::Fail(message) => Err(SimAuthError::Scripted(message)),
        };
        async move { result }
    }

    fn sign_out(&mut self) -> impl Future<Output = Result<(), Self::Error>> + Send {
        self.sign_outs += 1;
        self.session = None;
        // The real service follows a sign-out with a pushed change.
        let _ = self.changes_tx.send(AuthChange::signed_out());
        async move { Ok(()) }
    }
}
