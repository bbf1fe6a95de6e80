//! Authenticated session token.

use serde::{Deserialize, Serialize};

use crate::profile::UserId;

/// Opaque authenticated-identity token issued by the external auth
/// service.
///
/// The application never inspects the token; it only holds the current
/// session as `Option<Session>` and replaces it wholesale on every auth
/// event. The lifecycle (issuing, refreshing, revoking) is owned by the
/// service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Id of the authenticated user, used to key profile fetches.
    pub user_id: UserId,
    /// Bearer token for service calls.
    pub access_token: String,
}

impl Session {
    /// Create a session for the given user.
    pub fn new(user_id: UserId, access_token: impl Into<String>) -> Self {
        Self { user_id, access_token: access_token.into() }
    }
}
