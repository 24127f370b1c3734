// SPDX-License-Identifier: MPL-2.0
//! GoTrue email/password authentication.

use crate::application::port::{AuthError, AuthProvider, Credentials};
use crate::domain::{Session, User, UserId};
use crate::infrastructure::http::{ensure_success, HttpFailure};
use futures_util::future::{BoxFuture, FutureExt};
use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
struct PasswordRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct UserMetadata {
    #[serde(default)]
    full_name: Option<String>,
    #[serde(default)]
    avatar_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GoTrueUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    user_metadata: UserMetadata,
}

impl GoTrueUser {
    fn into_user(self, fallback_email: &str) -> User {
        User {
            id: UserId::new(self.id),
            email: self.email.unwrap_or_else(|| fallback_email.to_string()),
            display_name: self.user_metadata.full_name,
            avatar_url: self.user_metadata.avatar_url,
        }
    }
}

/// Token grant response. Sign-up returns a bare user (no token) when the
/// project requires email confirmation.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    user: Option<GoTrueUser>,
}

impl TokenResponse {
    fn into_session(self, fallback_email: &str) -> Result<Session, AuthError> {
        match (self.access_token, self.user) {
            (Some(token), Some(user)) => Ok(Session::new(user.into_user(fallback_email), token)),
            (None, _) => Err(AuthError::ConfirmationRequired),
            (Some(_), None) => Err(AuthError::Decode("token response without user".into())),
        }
    }
}

/// GoTrue reports errors as `error_code` (current) or `error` (legacy) with
/// a human-readable `msg` / `error_description`.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error_code: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    msg: Option<String>,
}

fn classify(failure: HttpFailure) -> AuthError {
    let body: ErrorBody = serde_json::from_str(&failure.body).unwrap_or_default();
    let code = body.error_code.or(body.error).unwrap_or_default();
    let msg = body.msg.unwrap_or_default();

    match code.as_str() {
        "user_already_exists" | "email_exists" => AuthError::EmailTaken,
        "invalid_credentials" | "invalid_grant" => AuthError::InvalidCredentials,
        _ if failure.status == StatusCode::UNPROCESSABLE_ENTITY
            && msg.contains("already registered") =>
        {
            AuthError::EmailTaken
        }
        _ => failure.into(),
    }
}

/// [`AuthProvider`] for Supabase projects.
#[derive(Debug, Clone)]
pub struct SupabaseAuth {
    client: Client,
    base: Url,
    anon_key: String,
}

impl SupabaseAuth {
    pub fn new(
        client: Client,
        project_url: &str,
        anon_key: impl Into<String>,
    ) -> Result<Self, AuthError> {
        let base = super::project_url(project_url).map_err(|err| AuthError::Decode(err.to_string()))?;
        Ok(Self {
            client,
            base,
            anon_key: anon_key.into(),
        })
    }

    fn endpoint(&self, name: &str) -> Result<Url, AuthError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| AuthError::Decode("project URL cannot hold a path".into()))?
            .pop_if_empty()
            .extend(["auth", "v1", name]);
        Ok(url)
    }

    async fn password_call(&self, url: Url, credentials: &Credentials) -> Result<Session, AuthError> {
        let response = self
            .client
            .post(url)
            .header("apikey", &self.anon_key)
            .json(&PasswordRequest {
                email: &credentials.email,
                password: credentials.password(),
            })
            .send()
            .await?;

        let response = ensure_success(response).await.map_err(classify)?;
        let body: TokenResponse = response.json().await?;
        body.into_session(&credentials.email)
    }

    async fn sign_in_with_password(&self, credentials: &Credentials) -> Result<Session, AuthError> {
        let mut url = self.endpoint("token")?;
        url.query_pairs_mut().append_pair("grant_type", "password");
        self.password_call(url, credentials).await
    }

    async fn sign_up_with_password(&self, credentials: &Credentials) -> Result<Session, AuthError> {
        let url = self.endpoint("signup")?;
        self.password_call(url, credentials).await
    }

    async fn logout(&self, session: &Session) -> Result<(), AuthError> {
        let response = self
            .client
            .post(self.endpoint("logout")?)
            .header("apikey", &self.anon_key)
            .bearer_auth(session.access_token())
            .send()
            .await?;
        ensure_success(response).await?;
        Ok(())
    }
}

impl AuthProvider for SupabaseAuth {
    fn sign_in<'a>(
        &'a self,
        credentials: &'a Credentials,
    ) -> BoxFuture<'a, Result<Session, AuthError>> {
        self.sign_in_with_password(credentials).boxed()
    }

    fn sign_up<'a>(
        &'a self,
        credentials: &'a Credentials,
    ) -> BoxFuture<'a, Result<Session, AuthError>> {
        self.sign_up_with_password(credentials).boxed()
    }

    fn sign_out<'a>(&'a self, session: &'a Session) -> BoxFuture<'a, Result<(), AuthError>> {
        self.logout(session).boxed()
    }
}
