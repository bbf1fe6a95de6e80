//! Generic runtime for application orchestration.
//!
//! The Runtime drives the application event loop, coordinating between:
//! - [`App`]: screen-flow state machine
//! - [`AuthService`]: external auth/profile service
//! - [`Driver`]: platform-specific I/O
//!
//! Single-threaded and cooperative: every cycle drains one driver event,
//! any queued auth changes, and the retry timer, executing the produced
//! actions in order. The async session and profile fetches and the idle
//! sleep are the only suspension points; between them state transitions
//! are atomic with respect to other events.

use std::time::Duration;

use kaiwa_core::Environment;
use thiserror::Error;

use crate::{App, AppAction, AppEvent, AuthService, AuthSubscription, Driver, RetryPolicy};

/// How long an idle cycle sleeps before polling again.
pub const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Runtime errors.
#[derive(Debug, Error)]
pub enum RuntimeError<D, S>
where
    D: std::error::Error,
    S: std::error::Error,
{
    /// The driver failed.
    #[error("driver error: {0}")]
    Driver(D),

    /// The auth service failed outside the profile-fetch path.
    #[error("auth service error: {0}")]
    Service(S),
}

/// Generic runtime that orchestrates App, `AuthService`, and Driver.
///
/// # Type Parameters
///
/// - `D`: Platform-specific I/O driver
/// - `S`: External auth/profile service
/// - `E`: Environment providing real or virtual time
pub struct Runtime<D, S, E>
where
    D: Driver<Instant = E::Instant>,
    S: AuthService,
    E: Environment,
{
    driver: D,
    service: S,
    env: E,
    app: App<E::Instant>,
}

type RunResult<T, D, S> =
    Result<T, RuntimeError<<D as Driver>::Error, <S as AuthService>::Error>>;

impl<D, S, E> Runtime<D, S, E>
where
    D: Driver<Instant = E::Instant>,
    S: AuthService,
    E: Environment,
{
    /// Create a runtime with the default retry policy.
    pub fn new(driver: D, service: S, env: E) -> Self {
        Self::with_policy(driver, service, env, RetryPolicy::default())
    }

    /// Create a runtime with the given profile retry policy.
    pub fn with_policy(driver: D, service: S, env: E, policy: RetryPolicy) -> Self {
        Self { driver, service, env, app: App::with_policy(policy) }
    }

    /// Run the main event loop until the app quits.
    ///
    /// Subscribes to auth changes first, then performs the one-shot
    /// session fetch; both feed the same `SessionChanged` event and
    /// whichever is processed last wins. The subscription is released when
    /// the loop exits.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver or the auth service fails outside
    /// the profile-fetch path (those failures become local UI state).
    pub async fn run(&mut self) -> RunResult<(), D, S> {
        self.driver.render(&self.app).map_err(RuntimeError::Driver)?;

        let mut subscription = self.service.subscribe().map_err(RuntimeError::Service)?;

        // Registration above happens-before this one-shot fetch; both
        // resolve asynchronously and the last processed result wins.
        match self.service.get_session().await {
            Ok(session) => {
                if self.dispatch(AppEvent::SessionChanged(session)).await? {
                    self.driver.stop();
                    return Ok(());
                }
            },
            Err(e) => tracing::warn!(error = %e, "one-shot session fetch failed"),
        }

        loop {
            if self.cycle(&mut subscription).await? {
                break;
            }
        }

        self.driver.stop();
        Ok(())
    }

    /// Process one cycle of the event loop.
    ///
    /// Returns `true` if the application should quit.
    async fn cycle(&mut self, subscription: &mut AuthSubscription) -> RunResult<bool, D, S> {
        let mut worked = false;

        if let Some(event) = self.driver.poll_event().await.map_err(RuntimeError::Driver)? {
            worked = true;
            if self.dispatch(event).await? {
                return Ok(true);
            }
        }

        while let Some(change) = subscription.try_recv() {
            worked = true;
            if self.dispatch(AppEvent::SessionChanged(change.session)).await? {
                return Ok(true);
            }
        }

        let actions = self.app.handle_tick(self.env.now());
        if !actions.is_empty() {
            worked = true;
            if self.process_actions(actions).await? {
                return Ok(true);
            }
        }

        if !worked {
            self.env.sleep(POLL_INTERVAL).await;
        }
        Ok(false)
    }

    /// Feed one event through the app and execute the resulting actions.
    async fn dispatch(&mut self, event: AppEvent) -> RunResult<bool, D, S> {
        let now = self.env.now();
        let actions = self.app.handle(event, now);
        self.process_actions(actions).await
    }

    /// Execute actions, feeding fetch results back through the app until
    /// the queue drains.
    ///
    /// Returns `true` if should quit.
    async fn process_actions(&mut self, initial_actions: Vec<AppAction>) -> RunResult<bool, D, S> {
        let mut pending_actions = initial_actions;

        while !pending_actions.is_empty() {
            let actions = std::mem::take(&mut pending_actions);

            for action in actions {
                match action {
                    AppAction::Render => {
                        self.driver.render(&self.app).map_err(RuntimeError::Driver)?;
                    },
                    AppAction::Quit => return Ok(true),
                    AppAction::SignOut => {
                        if let Err(e) = self.service.sign_out().await {
                            tracing::warn!(error = %e, "sign-out request failed");
                        }
                    },
                    AppAction::FetchProfile { user_id, epoch } => {
                        // Suspension point. The result carries the epoch it
                        // was issued under; the app discards it if stale.
                        let result = self
                            .service
                            .get_profile(&user_id)
                            .await
                            .map_err(|e| e.to_string());
                        let now = self.env.now();
                        pending_actions.extend(
                            self.app.handle(AppEvent::ProfileFetched { epoch, result }, now),
                        );
                    },
                }
            }
        }
        Ok(false)
    }

    /// Get a reference to the App.
    pub fn app(&self) -> &App<E::Instant> {
        &self.app
    }

    /// Get a reference to the driver.
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Get a reference to the auth service.
    pub fn service(&self) -> &S {
        &self.service
    }
}
