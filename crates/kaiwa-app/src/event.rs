//! Application input events.
//!
//! This module defines [`AppEvent`], the comprehensive set of inputs that
//! drive the [`crate::App`] state machine.
//!
//! Events originate from two distinct sources:
//! - Auth service notifications (session changes, fetch results).
//! - User interactions forwarded by the presentation screens.

use kaiwa_core::{Profile, Session};

/// Events processed by the App state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// The session reference changed (live subscription or one-shot
    /// fetch). `None` means signed out.
    SessionChanged(Option<Session>),

    /// A profile fetch resolved. Carries the bootstrap epoch the fetch was
    /// issued under so stale results can be discarded.
    ProfileFetched {
        /// Epoch at fetch time.
        epoch: u64,
        /// `Ok(None)` means the profile is not provisioned yet.
        result: Result<Option<Profile>, String>,
    },

    /// A friend was selected on the friends list.
    FriendSelected(Profile),

    /// The add-friend screen was requested.
    AddFriendRequested,

    /// Back to the friends list.
    Back,

    /// A voice call was started from the chat screen.
    CallStarted,

    /// The active voice call ended.
    CallEnded,

    /// Sign-out requested (friends list header or error screen).
    LogoutRequested,

    /// Quit the application.
    QuitRequested,
}
