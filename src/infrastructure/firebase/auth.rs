// SPDX-License-Identifier: MPL-2.0
//! Identity Toolkit email/password authentication.

use crate::application::port::{AuthError, AuthProvider, Credentials};
use crate::domain::{Session, User, UserId};
use crate::infrastructure::http::{ensure_success, HttpFailure};
use futures_util::future::{BoxFuture, FutureExt};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

const IDENTITY_BASE: &str = "https://identitytoolkit.googleapis.com/v1/accounts";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PasswordResponse {
    local_id: String,
    #[serde(default)]
    email: Option<String>,
    id_token: String,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    profile_picture: Option<String>,
}

impl PasswordResponse {
    fn into_session(self, fallback_email: &str) -> Session {
        let user = User {
            id: UserId::new(self.local_id),
            email: self.email.unwrap_or_else(|| fallback_email.to_string()),
            display_name: self.display_name.filter(|name| !name.is_empty()),
            avatar_url: self.profile_picture,
        };
        Session::new(user, self.id_token)
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Maps Identity Toolkit error codes such as `EMAIL_EXISTS`.
///
/// Codes may carry a suffix (`WEAK_PASSWORD : Password should be ...`).
fn classify(failure: HttpFailure) -> AuthError {
    let code = serde_json::from_str::<ErrorEnvelope>(&failure.body)
        .map(|envelope| envelope.error.message)
        .unwrap_or_default();
    let code = code.split([' ', ':']).next().unwrap_or_default();

    if failure.status != StatusCode::BAD_REQUEST {
        return failure.into();
    }
    match code {
        "EMAIL_NOT_FOUND" | "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" | "USER_DISABLED" => {
            AuthError::InvalidCredentials
        }
        "EMAIL_EXISTS" => AuthError::EmailTaken,
        _ => failure.into(),
    }
}

/// [`AuthProvider`] for Firebase projects.
#[derive(Debug, Clone)]
pub struct FirebaseAuth {
    client: Client,
    api_key: String,
}

impl FirebaseAuth {
    pub fn new(client: Client, api_key: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
        }
    }

    async fn password_call(
        &self,
        endpoint: &str,
        credentials: &Credentials,
    ) -> Result<Session, AuthError> {
        let response = self
            .client
            .post(format!("{IDENTITY_BASE}:{endpoint}"))
            .query(&[("key", self.api_key.as_str())])
            .json(&PasswordRequest {
                email: &credentials.email,
                password: credentials.password(),
                return_secure_token: true,
            })
            .send()
            .await?;

        let response = ensure_success(response).await.map_err(classify)?;
        let body: PasswordResponse = response.json().await?;
        Ok(body.into_session(&credentials.email))
    }
}

impl AuthProvider for FirebaseAuth {
    fn sign_in<'a>(
        &'a self,
        credentials: &'a Credentials,
    ) -> BoxFuture<'a, Result<Session, AuthError>> {
        self.password_call("signInWithPassword", credentials).boxed()
    }

    fn sign_up<'a>(
        &'a self,
        credentials: &'a Credentials,
    ) -> BoxFuture<'a, Result<Session, AuthError>> {
        self.password_call("signUp", credentials).boxed()
    }

    /// ID tokens are stateless; dropping the session is all sign-out needs.
    fn sign_out<'a>(&'a self, _session: &'a Session) -> BoxFuture<'a, Result<(), AuthError>> {
        async { Ok(()) }.boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failure(status: StatusCode, body: &str) -> HttpFailure {
        HttpFailure {
            status,
            body: body.into(),
        }
    }

    #[test]
    fn wrong_password_is_invalid_credentials() {
        let body = r#"{"error":{"code":400,"message":"INVALID_LOGIN_CREDENTIALS","errors":[]}}"#;
        assert_eq!(
            classify(failure(StatusCode::BAD_REQUEST, body)),
            AuthError::InvalidCredentials
        );
    }

    #[test]
    fn existing_email_is_taken() {
        let body = r#"{"error":{"code":400,"message":"EMAIL_EXISTS"}}"#;
        assert_eq!(
            classify(failure(StatusCode::BAD_REQUEST, body)),
            AuthError::EmailTaken
        );
    }

    #[test]
    fn other_failures_keep_status() {
        let body = r#"{"error":{"code":400,"message":"WEAK_PASSWORD : Password should be at least 6 characters"}}"#;
        assert!(matches!(
            classify(failure(StatusCode::BAD_REQUEST, body)),
            AuthError::Http { status: 400, .. }
        ));
        assert!(matches!(
            classify(failure(StatusCode::SERVICE_UNAVAILABLE, "")),
            AuthError::Http { status: 503, .. }
        ));
    }

    #[test]
    fn decodes_sign_in_response() {
        let body = r#"{
            "kind": "identitytoolkit#VerifyPasswordResponse",
            "localId": "ZY1rJK0eYLg",
            "email": "ana@example.com",
            "displayName": "",
            "idToken": "eyJhbGciOi",
            "registered": true,
            "refreshToken": "AGEhc0D",
            "expiresIn": "3600"
        }"#;
        let response: PasswordResponse = serde_json::from_str(body).unwrap();
        let session = response.into_session("ignored@example.com");

        assert_eq!(session.user_id().as_str(), "ZY1rJK0eYLg");
        assert_eq!(session.user.email, "ana@example.com");
        assert_eq!(session.user.display_name, None);
        assert_eq!(session.access_token(), "eyJhbGciOi");
    }
}
