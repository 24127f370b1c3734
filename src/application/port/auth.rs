// SPDX-License-Identifier: MPL-2.0
//! Authentication port definition.
//!
//! The application never manages users itself; it asks the backend's auth
//! service for a [`Session`] and hands that session to every gateway call.

use crate::domain::Session;
use futures_util::future::BoxFuture;
use std::fmt;
use thiserror::Error;

/// Errors raised by the authentication provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("an account already exists for this email")]
    EmailTaken,

    /// The account was created but must be confirmed by email first.
    #[error("email confirmation required")]
    ConfirmationRequired,

    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("unexpected response: {0}")]
    Decode(String),
}

impl AuthError {
    /// Returns the i18n message key shown in the sign-in form.
    #[must_use]
    pub fn i18n_key(&self) -> &'static str {
        match self {
            AuthError::InvalidCredentials => "sign-in-error-credentials",
            AuthError::EmailTaken => "sign-in-error-email-taken",
            AuthError::ConfirmationRequired => "sign-in-confirm-email",
            AuthError::Http { .. } | AuthError::Transport(_) | AuthError::Decode(_) => {
                "sign-in-error-generic"
            }
        }
    }
}

/// Email and password entered in the sign-in form.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into().trim().to_string(),
            password: password.into(),
        }
    }

    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }

    /// Both fields are required before contacting the provider.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.email.is_empty() && !self.password.is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Port for the backend's authentication service.
pub trait AuthProvider: Send + Sync {
    fn sign_in<'a>(&'a self, credentials: &'a Credentials) -> BoxFuture<'a, Result<Session, AuthError>>;

    fn sign_up<'a>(&'a self, credentials: &'a Credentials) -> BoxFuture<'a, Result<Session, AuthError>>;

    /// Revokes the session server-side where the provider supports it.
    fn sign_out<'a>(&'a self, session: &'a Session) -> BoxFuture<'a, Result<(), AuthError>>;
}
