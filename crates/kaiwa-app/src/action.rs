//! Application side-effects and intents.
//!
//! This module defines the [`AppAction`] enum, which represents
//! instructions produced by the [`crate::App`] state machine for the
//! runtime to execute.

use kaiwa_core::UserId;

/// Actions produced by the App state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    /// Render the UI.
    Render,

    /// Quit the application.
    Quit,

    /// Fetch the profile for the given user from the auth service.
    FetchProfile {
        /// User to fetch.
        user_id: UserId,
        /// Bootstrap epoch at issue time; the result must carry it back.
        epoch: u64,
    },

    /// Sign out through the auth service.
    SignOut,
}
