//! Screen-flow state machine.
//!
//! [`App`] composes the session bootstrap and the screen router and is the
//! single place that mutates either. Screens and drivers only read state
//! and request transitions through events.
//!
//! Navigation events are honored only once the bootstrap is `Ready`;
//! sign-out is honored from any phase because it is the one recovery
//! action the error screen offers.

use std::{ops::Sub, time::Duration};

use kaiwa_core::{LoadError, Profile, Session};

use crate::{AppAction, AppEvent, Bootstrap, BootstrapPhase, RetryPolicy, Router, Screen};

/// Screen-flow state machine.
///
/// Pure state machine that processes events and produces actions.
/// No I/O dependencies - fully testable in simulation.
#[derive(Debug, Clone)]
pub struct App<I = std::time::Instant>
where
    I: Copy + Ord + Send + Sync + Sub<Output = Duration>,
{
    bootstrap: Bootstrap<I>,
    router: Router,
}

impl<I> Default for App<I>
where
    I: Copy + Ord + Send + Sync + Sub<Output = Duration>,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<I> App<I>
where
    I: Copy + Ord + Send + Sync + Sub<Output = Duration>,
{
    /// Create an app with the default retry policy.
    pub fn new() -> Self {
        Self::with_policy(RetryPolicy::default())
    }

    /// Create an app with the given profile retry policy.
    pub fn with_policy(policy: RetryPolicy) -> Self {
        Self { bootstrap: Bootstrap::with_policy(policy), router: Router::new() }
    }

    /// Process an event and return actions.
    pub fn handle(&mut self, event: AppEvent, now: I) -> Vec<AppAction> {
        match event {
            AppEvent::SessionChanged(session) => self.bootstrap.handle_session_change(session),
            AppEvent::ProfileFetched { epoch, result } => {
                if let Err(message) = &result {
                    tracing::error!(%message, "unexpected error while fetching profile");
                }
                self.bootstrap.handle_profile_result(epoch, result, now)
            },
            AppEvent::FriendSelected(friend) => {
                self.navigate(|router| router.select_friend(friend))
            },
            AppEvent::AddFriendRequested => self.navigate(Router::open_add_friend),
            AppEvent::Back => self.navigate(Router::back),
            AppEvent::CallStarted => self.navigate(Router::start_call),
            AppEvent::CallEnded => self.navigate(Router::end_call),
            AppEvent::LogoutRequested => {
                self.router.reset();
                vec![AppAction::SignOut, AppAction::Render]
            },
            AppEvent::QuitRequested => vec![AppAction::Quit],
        }
    }

    /// Fire any armed retry timer.
    pub fn handle_tick(&mut self, now: I) -> Vec<AppAction> {
        self.bootstrap.handle_tick(now)
    }

    /// Apply a navigation request, gated on the bootstrap being ready.
    fn navigate(&mut self, transition: impl FnOnce(&mut Router) -> bool) -> Vec<AppAction> {
        if !matches!(self.bootstrap.phase(), BootstrapPhase::Ready { .. }) {
            tracing::debug!("ignoring navigation before profile is ready");
            return vec![];
        }
        if transition(&mut self.router) { vec![AppAction::Render] } else { vec![] }
    }

    /// Bootstrap state machine.
    pub fn bootstrap(&self) -> &Bootstrap<I> {
        &self.bootstrap
    }

    /// Screen router.
    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Current bootstrap phase.
    pub fn phase(&self) -> &BootstrapPhase {
        self.bootstrap.phase()
    }

    /// Current screen.
    pub fn screen(&self) -> &Screen {
        self.router.screen()
    }

    /// Current session. `None` if signed out.
    pub fn session(&self) -> Option<&Session> {
        self.bootstrap.session()
    }

    /// The signed-in user's profile. `None` unless ready.
    pub fn profile(&self) -> Option<&Profile> {
        self.bootstrap.profile()
    }

    /// Profile load failure. `None` unless failed.
    pub fn error(&self) -> Option<&LoadError> {
        self.bootstrap.error()
    }

    /// The profile targeted by the chat or voice-call screen.
    pub fn active_friend(&self) -> Option<&Profile> {
        self.router.active_friend()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use kaiwa_core::{Lang, UserId};

    use super::*;

    fn session() -> Session {
        Session::new(UserId::new("user-1"), "token-1")
    }

    fn profile(name: &str) -> Profile {
        Profile {
            id: UserId::new(format!("id-{name}")),
            username: name.into(),
            lang: Lang::Japanese,
            avatar: "bird.png".into(),
        }
    }

    /// Bring an app to the ready phase.
    fn ready_app() -> App {
        let mut app: App = App::new();
        let now = Instant::now();
        let actions = app.handle(AppEvent::SessionChanged(Some(session())), now);
        let epoch = actions
            .iter()
            .find_map(|a| match a {
                AppAction::FetchProfile { epoch, .. } => Some(*epoch),
                _ => None,
            })
            .unwrap();
        app.handle(
            AppEvent::ProfileFetched { epoch, result: Ok(Some(profile("haru"))) },
            now,
        );
        app
    }

    #[test]
    fn navigation_is_ignored_until_ready() {
        let mut app: App = App::new();
        let now = Instant::now();
        app.handle(AppEvent::SessionChanged(Some(session())), now);

        assert!(app.handle(AppEvent::FriendSelected(profile("mei")), now).is_empty());
        assert!(app.handle(AppEvent::AddFriendRequested, now).is_empty());
        assert_eq!(*app.screen(), Screen::Friends);
    }

    #[test]
    fn ready_app_navigates_and_renders() {
        let mut app = ready_app();
        let now = Instant::now();

        let actions = app.handle(AppEvent::FriendSelected(profile("mei")), now);
        assert_eq!(actions, vec![AppAction::Render]);
        assert_eq!(app.active_friend(), Some(&profile("mei")));
    }

    #[test]
    fn logout_is_honored_from_the_failed_phase() {
        let mut app: App = App::new();
        let now = Instant::now();
        let actions = app.handle(AppEvent::SessionChanged(Some(session())), now);
        let epoch = actions
            .iter()
            .find_map(|a| match a {
                AppAction::FetchProfile { epoch, .. } => Some(*epoch),
                _ => None,
            })
            .unwrap();
        app.handle(AppEvent::ProfileFetched { epoch, result: Err("boom".into()) }, now);
        assert!(app.error().is_some());

        let actions = app.handle(AppEvent::LogoutRequested, now);
        assert!(actions.contains(&AppAction::SignOut));
    }

    #[test]
    fn logout_resets_the_router_immediately() {
        let mut app = ready_app();
        let now = Instant::now();
        app.handle(AppEvent::FriendSelected(profile("mei")), now);
        app.handle(AppEvent::CallStarted, now);
        assert!(matches!(app.screen(), Screen::VoiceCall { .. }));

        app.handle(AppEvent::LogoutRequested, now);
        assert_eq!(*app.screen(), Screen::Friends);
        assert_eq!(app.active_friend(), None);
    }

    #[test]
    fn quit_request_produces_quit() {
        let mut app: App = App::new();
        let actions = app.handle(AppEvent::QuitRequested, Instant::now());
        assert_eq!(actions, vec![AppAction::Quit]);
    }
}
