// SPDX-License-Identifier: MPL-2.0
//! Firestore pin collection and Cloud Storage photos.

use super::document::{decode_pins, encode_pin, Document, RunQueryItem};
use crate::application::port::{GatewayError, ObjectUpload, PinRecord, RemoteStore, StoredObject};
use crate::config::FirebaseConfig;
use crate::domain::{PhotoId, Pin, PinId, Session, UserId};
use crate::infrastructure::http::ensure_success;
use chrono::{DateTime, Utc};
use futures_util::future::{BoxFuture, FutureExt};
use reqwest::{header, Client, Url};
use serde::Deserialize;
use serde_json::json;

const FIRESTORE_BASE: &str = "https://firestore.googleapis.com/v1";
const STORAGE_BASE: &str = "https://firebasestorage.googleapis.com/v0/b/";
const COLLECTION: &str = "pins";

/// Metadata returned by a Cloud Storage upload.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StorageObject {
    name: String,
    #[serde(default)]
    download_tokens: Option<String>,
}

/// [`RemoteStore`] over the Firestore and Cloud Storage REST APIs.
#[derive(Debug, Clone)]
pub struct FirebaseStore {
    client: Client,
    project_id: String,
    bucket: String,
}

impl FirebaseStore {
    pub fn new(client: Client, config: &FirebaseConfig) -> Self {
        Self {
            client,
            project_id: config.project_id.clone(),
            bucket: config.storage_bucket.clone(),
        }
    }

    fn documents_url(&self) -> String {
        format!(
            "{FIRESTORE_BASE}/projects/{}/databases/(default)/documents",
            self.project_id
        )
    }

    /// `.../b/{bucket}/o`, the bucket's object collection.
    fn objects_url(&self) -> Result<Url, GatewayError> {
        let mut url =
            Url::parse(STORAGE_BASE).map_err(|err| GatewayError::Storage(err.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| GatewayError::Storage("storage URL cannot hold a path".into()))?
            .pop_if_empty()
            .push(&self.bucket)
            .push("o");
        Ok(url)
    }

    /// Object URL with the key as one percent-encoded path segment.
    fn object_url(&self, key: &str) -> Result<Url, GatewayError> {
        let mut url = self.objects_url()?;
        url.path_segments_mut()
            .map_err(|()| GatewayError::Storage("storage URL cannot hold a path".into()))?
            .push(key);
        Ok(url)
    }

    fn public_url(&self, object: &StorageObject) -> Result<String, GatewayError> {
        let token = object
            .download_tokens
            .as_deref()
            .and_then(|tokens| tokens.split(',').next())
            .filter(|token| !token.is_empty())
            .ok_or_else(|| GatewayError::Storage(format!("no download token for {}", object.name)))?;

        let mut url = self.object_url(&object.name)?;
        url.query_pairs_mut()
            .append_pair("alt", "media")
            .append_pair("token", token);
        Ok(url.into())
    }
}

/// Structured query selecting one user's pins, newest first.
fn run_query_body(user: &UserId) -> serde_json::Value {
    json!({
        "structuredQuery": {
            "from": [{ "collectionId": COLLECTION }],
            "where": {
                "fieldFilter": {
                    "field": { "fieldPath": "userId" },
                    "op": "EQUAL",
                    "value": { "stringValue": user.as_str() }
                }
            },
            "orderBy": [{
                "field": { "fieldPath": "createdAt" },
                "direction": "DESCENDING"
            }]
        }
    })
}

impl RemoteStore for FirebaseStore {
    fn name(&self) -> &'static str {
        "firebase"
    }

    fn object_key(
        &self,
        user: &UserId,
        photo_id: &PhotoId,
        _file_name: &str,
        _now: DateTime<Utc>,
    ) -> String {
        format!("photos/{user}/{photo_id}")
    }

    fn query_pins<'a>(
        &'a self,
        session: &'a Session,
    ) -> BoxFuture<'a, Result<Vec<Pin>, GatewayError>> {
        async move {
            let response = self
                .client
                .post(format!("{}:runQuery", self.documents_url()))
                .bearer_auth(session.access_token())
                .json(&run_query_body(session.user_id()))
                .send()
                .await?;
            let items: Vec<RunQueryItem> = ensure_success(response).await?.json().await?;

            Ok(decode_pins(&items))
        }
        .boxed()
    }

    fn insert_pin<'a>(
        &'a self,
        session: &'a Session,
        record: &'a PinRecord,
    ) -> BoxFuture<'a, Result<PinId, GatewayError>> {
        async move {
            let response = self
                .client
                .post(format!("{}/{COLLECTION}", self.documents_url()))
                .bearer_auth(session.access_token())
                .json(&encode_pin(record))
                .send()
                .await?;
            let created: Document = ensure_success(response).await?.json().await?;

            created
                .id()
                .map(PinId::new)
                .ok_or_else(|| GatewayError::Decode("created document has no name".into()))
        }
        .boxed()
    }

    fn upload_object<'a>(
        &'a self,
        session: &'a Session,
        upload: ObjectUpload,
    ) -> BoxFuture<'a, Result<StoredObject, GatewayError>> {
        async move {
            let mut url = self.objects_url()?;
            url.query_pairs_mut()
                .append_pair("uploadType", "media")
                .append_pair("name", &upload.key);

            let response = self
                .client
                .post(url)
                .header(header::AUTHORIZATION, format!("Firebase {}", session.access_token()))
                .header(header::CONTENT_TYPE, upload.content_type)
                .body(upload.bytes)
                .send()
                .await?;
            let object: StorageObject = ensure_success(response).await?.json().await?;

            Ok(StoredObject {
                url: self.public_url(&object)?,
                key: object.name,
            })
        }
        .boxed()
    }

    fn delete_object<'a>(
        &'a self,
        session: &'a Session,
        key: &'a str,
    ) -> BoxFuture<'a, Result<(), GatewayError>> {
        async move {
            let response = self
                .client
                .delete(self.object_url(key)?)
                .header(header::AUTHORIZATION, format!("Firebase {}", session.access_token()))
                .send()
                .await?;
            ensure_success(response).await?;
            Ok(())
        }
        .boxed()
    }
}
