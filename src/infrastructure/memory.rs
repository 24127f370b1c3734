// SPDX-License-Identifier: MPL-2.0
//! In-process backend.
//!
//! [`MemoryStore`] and [`MemoryAuth`] honor the same contracts as the remote
//! backends (per-user filtering, newest-first ordering, public photo URLs)
//! without any network. They back offline sessions and the gateway contract
//! tests, which can script failures through [`MemoryStore::faults`].

use crate::application::port::{
    AuthError, AuthProvider, Credentials, GatewayError, ObjectUpload, PhotoSource, PinRecord,
    RemoteStore, StoredObject,
};
use crate::domain::{PhotoId, Pin, PinId, Session, User, UserId};
use chrono::{DateTime, Utc};
use futures_util::future::{BoxFuture, FutureExt};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// URL scheme of objects held by [`MemoryStore`].
pub const URL_SCHEME: &str = "memory://";

/// Scripted failures for tests.
#[derive(Debug, Clone, Default)]
pub struct Faults {
    /// Returned by every `query_pins`.
    pub query: Option<GatewayError>,
    /// Returned by every `insert_pin`.
    pub insert: Option<GatewayError>,
    /// Uploads succeed this many times, then fail with a transport error.
    pub uploads_before_failure: Option<usize>,
}

#[derive(Debug, Default)]
struct State {
    pins: Vec<Pin>,
    objects: HashMap<String, Vec<u8>>,
    next_id: u64,
    uploads: usize,
    queries: usize,
    faults: Faults,
}

/// In-memory [`RemoteStore`]. Clones share the same state.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<State>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, GatewayError> {
        self.state
            .lock()
            .map_err(|_| GatewayError::Storage("Lock poisoned".to_string()))
    }

    /// Replaces the scripted failures.
    pub fn set_faults(&self, faults: Faults) {
        if let Ok(mut state) = self.lock() {
            state.faults = faults;
        }
    }

    /// Keys of every stored object, sorted.
    #[must_use]
    pub fn object_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .lock()
            .map(|state| state.objects.keys().cloned().collect())
            .unwrap_or_default();
        keys.sort();
        keys
    }

    /// Number of `query_pins` calls served (including scripted failures).
    #[must_use]
    pub fn query_count(&self) -> usize {
        self.lock().map(|state| state.queries).unwrap_or_default()
    }

    /// Number of pins across all users.
    #[must_use]
    pub fn pin_count(&self) -> usize {
        self.lock().map(|state| state.pins.len()).unwrap_or_default()
    }

    fn url_for(key: &str) -> String {
        format!("{URL_SCHEME}{key}")
    }
}

impl RemoteStore for MemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn object_key(
        &self,
        user: &UserId,
        photo_id: &PhotoId,
        _file_name: &str,
        _now: DateTime<Utc>,
    ) -> String {
        format!("{user}/{photo_id}")
    }

    fn query_pins<'a>(
        &'a self,
        session: &'a Session,
    ) -> BoxFuture<'a, Result<Vec<Pin>, GatewayError>> {
        let result = self.lock().and_then(|mut state| {
            state.queries += 1;
            if let Some(err) = state.faults.query.clone() {
                return Err(err);
            }
            let mut pins: Vec<Pin> = state
                .pins
                .iter()
                .filter(|pin| &pin.user_id == session.user_id())
                .cloned()
                .collect();
            pins.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            Ok(pins)
        });
        async move { result }.boxed()
    }

    fn insert_pin<'a>(
        &'a self,
        session: &'a Session,
        record: &'a PinRecord,
    ) -> BoxFuture<'a, Result<PinId, GatewayError>> {
        let result = self.lock().and_then(|mut state| {
            if let Some(err) = state.faults.insert.clone() {
                return Err(err);
            }
            if &record.user_id != session.user_id() {
                return Err(GatewayError::Unauthorized);
            }
            state.next_id += 1;
            let id = PinId::new(format!("mem-{}", state.next_id));
            state.pins.push(record.clone().into_pin(id.clone()));
            Ok(id)
        });
        async move { result }.boxed()
    }

    fn upload_object<'a>(
        &'a self,
        session: &'a Session,
        upload: ObjectUpload,
    ) -> BoxFuture<'a, Result<StoredObject, GatewayError>> {
        let result = self.lock().and_then(|mut state| {
            if state
                .faults
                .uploads_before_failure
                .is_some_and(|limit| state.uploads >= limit)
            {
                return Err(GatewayError::Transport("connection reset".into()));
            }
            if !upload.key.starts_with(&format!("{}/", session.user_id())) {
                return Err(GatewayError::Unauthorized);
            }
            state.uploads += 1;
            state.objects.insert(upload.key.clone(), upload.bytes);
            Ok(StoredObject {
                url: Self::url_for(&upload.key),
                key: upload.key,
            })
        });
        async move { result }.boxed()
    }

    fn delete_object<'a>(
        &'a self,
        _session: &'a Session,
        key: &'a str,
    ) -> BoxFuture<'a, Result<(), GatewayError>> {
        let result = self.lock().map(|mut state| {
            state.objects.remove(key);
        });
        async move { result }.boxed()
    }
}

impl PhotoSource for MemoryStore {
    fn fetch<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<Vec<u8>, GatewayError>> {
        let result = url
            .strip_prefix(URL_SCHEME)
            .ok_or_else(|| GatewayError::Storage(format!("not a memory URL: {url}")))
            .and_then(|key| {
                self.lock()?.objects.get(key).cloned().ok_or(GatewayError::Http {
                    status: 404,
                    message: key.to_string(),
                })
            });
        async move { result }.boxed()
    }
}

// =============================================================================
// MemoryAuth
// =============================================================================

/// Local accounts keyed by lowercase email.
///
/// Signing in with an unknown email registers it, so any non-empty password
/// opens a session. User ids are derived from the email and stay stable.
#[derive(Debug, Clone, Default)]
pub struct MemoryAuth {
    accounts: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryAuth {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn session_for(email: &str) -> Session {
        let user = User {
            id: UserId::new(format!("local:{email}")),
            email: email.to_string(),
            display_name: None,
            avatar_url: None,
        };
        let token = format!("local-{}", uuid::Uuid::new_v4());
        Session::new(user, token)
    }

    fn authenticate(&self, credentials: &Credentials, register: bool) -> Result<Session, AuthError> {
        if !credentials.is_complete() {
            return Err(AuthError::InvalidCredentials);
        }
        let email = credentials.email.to_lowercase();
        let mut accounts = self
            .accounts
            .lock()
            .map_err(|_| AuthError::Decode("Lock poisoned".to_string()))?;

        match accounts.get(&email) {
            Some(_) if register => Err(AuthError::EmailTaken),
            Some(password) if password != credentials.password() => {
                Err(AuthError::InvalidCredentials)
            }
            Some(_) => Ok(Self::session_for(&email)),
            None => {
                accounts.insert(email.clone(), credentials.password().to_string());
                Ok(Self::session_for(&email))
            }
        }
    }
}

impl AuthProvider for MemoryAuth {
    fn sign_in<'a>(
        &'a self,
        credentials: &'a Credentials,
    ) -> BoxFuture<'a, Result<Session, AuthError>> {
        let result = self.authenticate(credentials, false);
        async move { result }.boxed()
    }

    fn sign_up<'a>(
        &'a self,
        credentials: &'a Credentials,
    ) -> BoxFuture<'a, Result<Session, AuthError>> {
        let result = self.authenticate(credentials, true);
        async move { result }.boxed()
    }

    fn sign_out<'a>(&'a self, _session: &'a Session) -> BoxFuture<'a, Result<(), AuthError>> {
        async { Ok(()) }.boxed()
    }
}
