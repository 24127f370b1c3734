// SPDX-License-Identifier: MPL-2.0
//! Shared HTTP plumbing for the remote adapters.
//!
//! Every adapter builds its client here so they share the user agent and the
//! redirect policy, and map transport failures to port errors the same way.

use crate::application::port::{AuthError, GatewayError, GeocodeError};
use reqwest::{Client, Response, StatusCode};

/// User agent sent with every request.
pub const USER_AGENT: &str = concat!("Wayfarer/", env!("CARGO_PKG_VERSION"));

/// Longest response excerpt kept in error messages.
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Builds the HTTP client used by all adapters.
///
/// Timeouts are left at the client defaults.
pub fn client() -> reqwest::Result<Client> {
    Client::builder()
        .redirect(reqwest::redirect::Policy::limited(10))
        .user_agent(USER_AGENT)
        .build()
}

/// A non-success response, with a short excerpt of its body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpFailure {
    pub status: StatusCode,
    pub body: String,
}

impl HttpFailure {
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.status == StatusCode::UNAUTHORIZED || self.status == StatusCode::FORBIDDEN
    }
}

/// Passes successful responses through and captures the rest.
pub async fn ensure_success(response: Response) -> Result<Response, HttpFailure> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    // The body is only used for diagnostics; a read failure leaves it empty.
    let body = response.text().await.unwrap_or_default();
    Err(HttpFailure {
        status,
        body: excerpt(&body),
    })
}

fn excerpt(body: &str) -> String {
    let trimmed = body.trim();
    match trimmed.char_indices().nth(MAX_ERROR_BODY_CHARS) {
        Some((cut, _)) => format!("{}...", &trimmed[..cut]),
        None => trimmed.to_string(),
    }
}

// =============================================================================
// Error conversions
// =============================================================================

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            GatewayError::Decode(err.to_string())
        } else {
            GatewayError::Transport(err.to_string())
        }
    }
}

impl From<HttpFailure> for GatewayError {
    fn from(failure: HttpFailure) -> Self {
        if failure.is_unauthorized() {
            GatewayError::Unauthorized
        } else {
            GatewayError::Http {
                status: failure.status.as_u16(),
                message: failure.body,
            }
        }
    }
}

impl From<reqwest::Error> for AuthError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            AuthError::Decode(err.to_string())
        } else {
            AuthError::Transport(err.to_string())
        }
    }
}

impl From<HttpFailure> for AuthError {
    fn from(failure: HttpFailure) -> Self {
        AuthError::Http {
            status: failure.status.as_u16(),
            message: failure.body,
        }
    }
}

impl From<reqwest::Error> for GeocodeError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            GeocodeError::Decode(err.to_string())
        } else {
            GeocodeError::Transport(err.to_string())
        }
    }
}

impl From<HttpFailure> for GeocodeError {
    fn from(failure: HttpFailure) -> Self {
        GeocodeError::Http(failure.status.as_u16())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_agent_names_the_app() {
        assert!(USER_AGENT.starts_with("Wayfarer/"));
    }

    #[test]
    fn long_bodies_are_truncated() {
        let body = "x".repeat(500);
        let short = excerpt(&body);
        assert_eq!(short.len(), MAX_ERROR_BODY_CHARS + 3);
        assert!(short.ends_with("..."));
        assert_eq!(excerpt("  short  "), "short");
    }

    #[test]
    fn auth_failures_map_to_unauthorized() {
        let failure = HttpFailure {
            status: StatusCode::FORBIDDEN,
            body: String::new(),
        };
        assert_eq!(GatewayError::from(failure), GatewayError::Unauthorized);

        let failure = HttpFailure {
            status: StatusCode::CONFLICT,
            body: "duplicate".into(),
        };
        assert_eq!(
            GatewayError::from(failure),
            GatewayError::Http {
                status: 409,
                message: "duplicate".into()
            }
        );
    }
}
