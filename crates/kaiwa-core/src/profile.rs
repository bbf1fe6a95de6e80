//! User profile records.
//!
//! Profiles are owned by the external auth/profile service and fetched
//! keyed by the session's user id. A profile may not exist immediately
//! after account creation; the service signals this with an empty result
//! rather than an error.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque user identifier issued by the auth service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Create a user id from its service-issued string form.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Display language of a profile.
///
/// The service stores the literal strings `"Japanese"` and `"Chinese"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Lang {
    /// Japanese.
    Japanese,
    /// Chinese.
    Chinese,
}

impl fmt::Display for Lang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Japanese => f.write_str("Japanese"),
            Self::Chinese => f.write_str("Chinese"),
        }
    }
}

/// User-visible account record keyed by session identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Owning user id (uuid from the auth service).
    pub id: UserId,
    /// Display name.
    pub username: String,
    /// Display language.
    pub lang: Lang,
    /// Avatar identifier or URL.
    pub avatar: String,
}
