// SPDX-License-Identifier: MPL-2.0
//! Startup backend selection.
//!
//! [`connect`] is the only place that looks at [`BackendKind`]. Everything
//! else talks to the trait objects in [`Backend`].

use super::firebase::{FirebaseAuth, FirebaseStore};
use super::memory::{MemoryAuth, MemoryStore};
use super::photos::HttpPhotoSource;
use super::supabase::{SupabaseAuth, SupabaseStore};
use crate::application::gateway::StoreGateway;
use crate::application::port::{AuthProvider, PhotoSource, PinGateway};
use crate::config::{BackendConfig, BackendKind, FirebaseConfig, SupabaseConfig};
use crate::error::{Error, Result};
use reqwest::Client;
use std::fmt;
use std::sync::Arc;

/// The capabilities of the selected backend.
#[derive(Clone)]
pub struct Backend {
    pub kind: BackendKind,
    pub gateway: Arc<dyn PinGateway>,
    pub auth: Arc<dyn AuthProvider>,
    pub photos: Arc<dyn PhotoSource>,
}

impl fmt::Debug for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Backend").field("kind", &self.kind).finish_non_exhaustive()
    }
}

impl Backend {
    /// An in-process backend with fresh, empty state.
    #[must_use]
    pub fn memory() -> Self {
        let store = MemoryStore::new();
        Self {
            kind: BackendKind::Memory,
            gateway: Arc::new(StoreGateway::new(store.clone())),
            auth: Arc::new(MemoryAuth::new()),
            photos: Arc::new(store),
        }
    }
}

fn require(value: &str, key: &str) -> Result<()> {
    if value.trim().is_empty() {
        Err(Error::Config(format!("{key} is not set")))
    } else {
        Ok(())
    }
}

fn validate_firebase(config: &FirebaseConfig) -> Result<()> {
    require(&config.api_key, "backend.firebase.api_key")?;
    require(&config.project_id, "backend.firebase.project_id")?;
    require(&config.storage_bucket, "backend.firebase.storage_bucket")
}

fn validate_supabase(config: &SupabaseConfig) -> Result<()> {
    require(&config.url, "backend.supabase.url")?;
    require(&config.anon_key, "backend.supabase.anon_key")?;
    require(&config.bucket, "backend.supabase.bucket")?;
    require(&config.table, "backend.supabase.table")
}

/// Builds the configured backend.
///
/// # Errors
///
/// Returns [`Error::Config`] when required connection settings are missing
/// or malformed.
pub fn connect(config: &BackendConfig, client: &Client) -> Result<Backend> {
    let backend = match config.kind {
        BackendKind::Memory => Backend::memory(),
        BackendKind::Firebase => {
            validate_firebase(&config.firebase)?;
            Backend {
                kind: BackendKind::Firebase,
                gateway: Arc::new(StoreGateway::new(FirebaseStore::new(
                    client.clone(),
                    &config.firebase,
                ))),
                auth: Arc::new(FirebaseAuth::new(client.clone(), &config.firebase.api_key)),
                photos: Arc::new(HttpPhotoSource::new(client.clone())),
            }
        }
        BackendKind::Supabase => {
            validate_supabase(&config.supabase)?;
            let store = SupabaseStore::new(client.clone(), &config.supabase)
                .map_err(|err| Error::Config(err.to_string()))?;
            let auth = SupabaseAuth::new(
                client.clone(),
                &config.supabase.url,
                &config.supabase.anon_key,
            )
            .map_err(|err| Error::Config(err.to_string()))?;
            Backend {
                kind: BackendKind::Supabase,
                gateway: Arc::new(StoreGateway::new(store)),
                auth: Arc::new(auth),
                photos: Arc::new(HttpPhotoSource::new(client.clone())),
            }
        }
    };

    tracing::info!(backend = %backend.kind, "backend connected");
    Ok(backend)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_backend_needs_no_settings() {
        let backend = connect(&BackendConfig::default(), &Client::new()).unwrap();
        assert_eq!(backend.kind, BackendKind::Memory);
    }

    #[test]
    fn firebase_requires_project_settings() {
        let config = BackendConfig {
            kind: BackendKind::Firebase,
            firebase: FirebaseConfig {
                api_key: "key".into(),
                project_id: String::new(),
                storage_bucket: "bucket".into(),
            },
            ..BackendConfig::default()
        };
        let err = connect(&config, &Client::new()).unwrap_err();
        assert!(err.to_string().contains("backend.firebase.project_id"));
    }

    #[test]
    fn supabase_rejects_malformed_url() {
        let config = BackendConfig {
            kind: BackendKind::Supabase,
            supabase: SupabaseConfig {
                url: "not a url".into(),
                anon_key: "anon".into(),
                ..SupabaseConfig::default()
            },
            ..BackendConfig::default()
        };
        assert!(matches!(
            connect(&config, &Client::new()),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn complete_settings_connect() {
        let config = BackendConfig {
            kind: BackendKind::Supabase,
            supabase: SupabaseConfig {
                url: "https://abcd.supabase.co".into(),
                anon_key: "anon".into(),
                ..SupabaseConfig::default()
            },
            ..BackendConfig::default()
        };
        let backend = connect(&config, &Client::new()).unwrap();
        assert_eq!(backend.kind, BackendKind::Supabase);
    }
}
