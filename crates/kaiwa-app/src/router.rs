//! Screen router.
//!
//! Finite-state navigation between the four screens. The chat and
//! voice-call screens require an active friend, and the requirement is
//! carried by the variant itself rather than a nullable field, so those
//! screens cannot exist without one.

use kaiwa_core::Profile;

/// The screen currently shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    /// Friends list (the home screen).
    Friends,
    /// Add-friend form.
    AddFriend,
    /// One-to-one chat with the active friend.
    Chat {
        /// The friend being chatted with.
        friend: Profile,
    },
    /// Voice call with the active friend.
    VoiceCall {
        /// The friend being called.
        friend: Profile,
    },
}

/// Finite-state router over the four screens.
///
/// Transition methods return `true` if the transition happened; requests
/// that are invalid for the current screen are no-ops.
#[derive(Debug, Clone)]
pub struct Router {
    screen: Screen,
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    /// Create a router showing the friends list.
    pub fn new() -> Self {
        Self { screen: Screen::Friends }
    }

    /// Current screen.
    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    /// The profile targeted by the chat or voice-call screen.
    pub fn active_friend(&self) -> Option<&Profile> {
        match &self.screen {
            Screen::Chat { friend } | Screen::VoiceCall { friend } => Some(friend),
            Screen::Friends | Screen::AddFriend => None,
        }
    }

    /// Open a chat with the given friend. Only valid from the friends
    /// list.
    pub fn select_friend(&mut self, friend: Profile) -> bool {
        match self.screen {
            Screen::Friends => {
                self.screen = Screen::Chat { friend };
                true
            },
            _ => false,
        }
    }

    /// Open the add-friend form. Only valid from the friends list.
    pub fn open_add_friend(&mut self) -> bool {
        match self.screen {
            Screen::Friends => {
                self.screen = Screen::AddFriend;
                true
            },
            _ => false,
        }
    }

    /// Return to the friends list, clearing the active friend. Valid from
    /// chat and add-friend.
    pub fn back(&mut self) -> bool {
        match self.screen {
            Screen::Chat { .. } | Screen::AddFriend => {
                self.screen = Screen::Friends;
                true
            },
            _ => false,
        }
    }

    /// Start a voice call with the active friend. Only valid from chat;
    /// the friend carries over.
    pub fn start_call(&mut self) -> bool {
        match std::mem::replace(&mut self.screen, Screen::Friends) {
            Screen::Chat { friend } => {
                self.screen = Screen::VoiceCall { friend };
                true
            },
            other => {
                self.screen = other;
                false
            },
        }
    }

    /// End the voice call, returning to the chat with the same friend.
    pub fn end_call(&mut self) -> bool {
        match std::mem::replace(&mut self.screen, Screen::Friends) {
            Screen::VoiceCall { friend } => {
                self.screen = Screen::Chat { friend };
                true
            },
            other => {
                self.screen = other;
                false
            },
        }
    }

    /// Return to the friends list from anywhere, clearing the active
    /// friend. Used on logout.
    pub fn reset(&mut self) {
        self.screen = Screen::Friends;
    }
}
