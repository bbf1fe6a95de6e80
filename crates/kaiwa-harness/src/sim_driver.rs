//! Scripted user-input driver with a render log.

use std::{collections::VecDeque, convert::Infallible, future::Future};

use kaiwa_app::{App, AppEvent, BootstrapPhase, Driver, Screen};

use crate::SimInstant;

/// One step of a driver script.
#[derive(Debug, Clone)]
pub enum DriverStep {
    /// Report "no input" for this many polls (the runtime sleeps through
    /// them, advancing virtual time).
    Idle(u32),
    /// Deliver a user-interaction event.
    Event(AppEvent),
}

/// Snapshot of app state captured by one render call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderFrame {
    /// Bootstrap phase at render time.
    pub phase: BootstrapPhase,
    /// Screen at render time.
    pub screen: Screen,
}

/// Scripted driver.
///
/// Plays back a script of idle polls and user events, then requests quit,
/// so every runtime test terminates deterministically. Render calls are
/// logged as [`RenderFrame`]s for oracle checks.
#[derive(Debug, Default)]
pub struct SimDriver {
    script: VecDeque<DriverStep>,
    renders: Vec<RenderFrame>,
    stopped: bool,
}

impl SimDriver {
    /// Create a driver that immediately requests quit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a driver playing back the given script.
    pub fn with_script(script: impl IntoIterator<Item = DriverStep>) -> Self {
        Self { script: script.into_iter().collect(), renders: Vec::new(), stopped: false }
    }

    /// Create a driver that idles for `polls` cycles, then quits.
    pub fn idle(polls: u32) -> Self {
        Self::with_script([DriverStep::Idle(polls)])
    }

    /// Every frame rendered so far.
    pub fn renders(&self) -> &[RenderFrame] {
        &self.renders
    }

    /// True once the runtime has torn the driver down.
    pub fn stopped(&self) -> bool {
        self.stopped
    }
}

impl Driver for SimDriver {
    type Error = Infallible;
    type Instant = SimInstant;

    fn poll_event(&mut self) -> impl Future<Output = Result<Option<AppEvent>, Self::Error>> + Send {
        let polled = loop {
            match self.script.front_mut() {
                Some(DriverStep::Idle(0)) => {
                    self.script.pop_front();
                },
                Some(DriverStep::Idle(remaining)) => {
                    *remaining -= 1;
                    break None;
                },
                Some(DriverStep::Event(_)) => {
                    let Some(DriverStep::Event(event)) = self.script.pop_front() else {
                        break None;
                    };
                    break Some(event);
                },
                // Script exhausted: ask the app to quit.
                None => break Some(AppEvent::QuitRequested),
            }
        };
        async move { Ok(polled) }
    }

    fn render(&mut self, app: &App<SimInstant>) -> Result<(), Self::Error> {
        self.renders.push(RenderFrame { phase: app.phase().clone(), screen: app.screen().clone() });
        Ok(())
    }

    fn stop(&mut self) {
        self.stopped = true;
    }
}
