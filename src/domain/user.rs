// SPDX-License-Identifier: MPL-2.0
//! Authenticated user and session types.
//!
//! Users are owned by the authentication provider; the application only
//! reads them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier assigned by the authentication provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The signed-in user as reported by the authentication provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
}

/// A signed-in user together with the bearer token used for backend calls.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    pub user: User,
    access_token: String,
}

impl Session {
    pub fn new(user: User, access_token: impl Into<String>) -> Self {
        Self {
            user,
            access_token: access_token.into(),
        }
    }

    #[must_use]
    pub fn user_id(&self) -> &UserId {
        &self.user.id
    }

    #[must_use]
    pub fn access_token(&self) -> &str {
        &self.access_token
    }
}

// Keep the token out of logs.
impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("user", &self.user)
            .field("access_token", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_redacts_token() {
        let session = Session::new(
            User {
                id: UserId::new("u1"),
                email: "ana@example.com".into(),
                display_name: None,
                avatar_url: None,
            },
            "secret-token",
        );
        let debug = format!("{session:?}");
        assert!(!debug.contains("secret-token"));
        assert!(debug.contains("ana@example.com"));
        assert_eq!(session.access_token(), "secret-token");
    }
}
