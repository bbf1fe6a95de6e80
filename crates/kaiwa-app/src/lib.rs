//! Application layer for Kaiwa
//!
//! Pure state machines and generic runtime for the client-side screen
//! flow: authentication gating, profile loading with bounded retry, and
//! navigation between the friends-list, chat, add-friend and voice-call
//! screens. Chat transport, call signaling and friend persistence live
//! behind the external service boundary and never appear here.
//!
//! # Components
//!
//! - [`App`]: screen-flow state machine (bootstrap gating + navigation)
//! - [`Bootstrap`]: session/profile bootstrap with retry and stale guard
//! - [`Router`]: typed finite-state navigation between screens
//! - [`AuthService`]: contract required from the external auth service
//! - [`Driver`]: trait for platform-specific I/O abstraction
//! - [`Runtime`]: generic orchestration loop using Driver

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod action;
mod app;
mod bootstrap;
mod driver;
mod event;
mod router;
mod runtime;
mod service;
mod state;

pub use action::AppAction;
pub use app::App;
pub use bootstrap::Bootstrap;
pub use driver::Driver;
pub use event::AppEvent;
pub use router::{Router, Screen};
pub use runtime::{POLL_INTERVAL, Runtime, RuntimeError};
pub use service::{AuthChange, AuthChangeEvent, AuthService, AuthSubscription, UnsubscribeGuard};
pub use state::{BootstrapPhase, RetryPolicy};
