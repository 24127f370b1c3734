// SPDX-License-Identifier: MPL-2.0
//! PostgREST pin table and Supabase Storage photos.

use super::row::{decode_rows, NewPinRow, PinRow};
use crate::application::port::{GatewayError, ObjectUpload, PinRecord, RemoteStore, StoredObject};
use crate::config::SupabaseConfig;
use crate::domain::{PhotoId, Pin, PinId, Session, UserId};
use crate::infrastructure::http::ensure_success;
use chrono::{DateTime, Utc};
use futures_util::future::{BoxFuture, FutureExt};
use reqwest::{header, Client, RequestBuilder, Url};
use serde_json::json;

/// [`RemoteStore`] over a Supabase project's REST and Storage APIs.
#[derive(Debug, Clone)]
pub struct SupabaseStore {
    client: Client,
    base: Url,
    anon_key: String,
    table: String,
    bucket: String,
}

/// Keeps file names usable as a single storage path segment.
fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "photo".to_string()
    } else {
        cleaned
    }
}

impl SupabaseStore {
    pub fn new(client: Client, config: &SupabaseConfig) -> Result<Self, GatewayError> {
        let base = super::project_url(&config.url)?;
        Ok(Self {
            client,
            base,
            anon_key: config.anon_key.clone(),
            table: config.table.clone(),
            bucket: config.bucket.clone(),
        })
    }

    /// Appends path segments to the project URL.
    fn url<'s>(&self, segments: impl IntoIterator<Item = &'s str>) -> Result<Url, GatewayError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| GatewayError::Storage("project URL cannot hold a path".into()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn table_url(&self) -> Result<Url, GatewayError> {
        self.url(["rest", "v1", self.table.as_str()])
    }

    /// Keys keep their `/` separators as real path segments.
    fn object_url(&self, key: &str) -> Result<Url, GatewayError> {
        self.url(
            ["storage", "v1", "object", self.bucket.as_str()]
                .into_iter()
                .chain(key.split('/')),
        )
    }

    fn public_url(&self, key: &str) -> Result<Url, GatewayError> {
        self.url(
            ["storage", "v1", "object", "public", self.bucket.as_str()]
                .into_iter()
                .chain(key.split('/')),
        )
    }

    fn authorized(&self, request: RequestBuilder, session: &Session) -> RequestBuilder {
        request
            .header("apikey", &self.anon_key)
            .bearer_auth(session.access_token())
    }

    fn select_url(&self, user: &UserId) -> Result<Url, GatewayError> {
        let mut url = self.table_url()?;
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("user_id", &format!("eq.{user}"))
            .append_pair("order", "created_at.desc");
        Ok(url)
    }
}

impl RemoteStore for SupabaseStore {
    fn name(&self) -> &'static str {
        "supabase"
    }

    fn object_key(
        &self,
        user: &UserId,
        photo_id: &PhotoId,
        file_name: &str,
        now: DateTime<Utc>,
    ) -> String {
        format!(
            "{user}/{}_{photo_id}_{}",
            now.timestamp_millis(),
            sanitize_file_name(file_name)
        )
    }

    fn query_pins<'a>(
        &'a self,
        session: &'a Session,
    ) -> BoxFuture<'a, Result<Vec<Pin>, GatewayError>> {
        async move {
            let url = self.select_url(session.user_id())?;
            let response = self.authorized(self.client.get(url), session).send().await?;
            let rows: Vec<serde_json::Value> = ensure_success(response).await?.json().await?;

            Ok(decode_rows(rows))
        }
        .boxed()
    }

    fn insert_pin<'a>(
        &'a self,
        session: &'a Session,
        record: &'a PinRecord,
    ) -> BoxFuture<'a, Result<PinId, GatewayError>> {
        async move {
            let request = self
                .client
                .post(self.table_url()?)
                .header("Prefer", "return=representation")
                .json(&NewPinRow::from(record));
            let response = self.authorized(request, session).send().await?;
            let rows: Vec<PinRow> = ensure_success(response).await?.json().await?;

            rows.into_iter()
                .next()
                .map(|row| PinId::from(row.id))
                .ok_or_else(|| GatewayError::Decode("insert returned no row".into()))
        }
        .boxed()
    }

    fn upload_object<'a>(
        &'a self,
        session: &'a Session,
        upload: ObjectUpload,
    ) -> BoxFuture<'a, Result<StoredObject, GatewayError>> {
        async move {
            let request = self
                .client
                .post(self.object_url(&upload.key)?)
                .header(header::CONTENT_TYPE, upload.content_type)
                .header("x-upsert", "false")
                .body(upload.bytes);
            let response = self.authorized(request, session).send().await?;
            ensure_success(response).await?;

            Ok(StoredObject {
                url: self.public_url(&upload.key)?.into(),
                key: upload.key,
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
            let request = self
                .client
                .delete(self.url(["storage", "v1", "object", self.bucket.as_str()])?)
                .json(&json!({ "prefixes": [key] }));
            let response = self.authorized(request, session).send().await?;
            ensure_success(response).await?;
            Ok(())
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn store() -> SupabaseStore {
        SupabaseStore::new(
            Client::new(),
            &SupabaseConfig {
                url: "https://abcd.supabase.co/".into(),
                anon_key: "anon".into(),
                bucket: "photos".into(),
                table: "pins".into(),
            },
        )
        .unwrap()
    }

    #[test]
    fn select_filters_by_user_newest_first() {
        let url = store().select_url(&UserId::new("u1")).unwrap();
        assert_eq!(
            url.as_str(),
            "https://abcd.supabase.co/rest/v1/pins?select=*&user_id=eq.u1&order=created_at.desc"
        );
    }

    #[test]
    fn object_key_has_timestamp_id_and_clean_name() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let key = store().object_key(
            &UserId::new("u1"),
            &PhotoId::new("p9"),
            "my beach (1).jpg",
            now,
        );
        assert_eq!(key, "u1/1704067200000_p9_my_beach__1_.jpg");
    }

    #[test]
    fn storage_urls_keep_key_segments() {
        let store = store();
        assert_eq!(
            store.object_url("u1/1_p_a.jpg").unwrap().as_str(),
            "https://abcd.supabase.co/storage/v1/object/photos/u1/1_p_a.jpg"
        );
        assert_eq!(
            store.public_url("u1/1_p_a.jpg").unwrap().as_str(),
            "https://abcd.supabase.co/storage/v1/object/public/photos/u1/1_p_a.jpg"
        );
    }

    #[test]
    fn blank_file_name_gets_placeholder() {
        assert_eq!(sanitize_file_name(""), "photo");
        assert_eq!(sanitize_file_name("été.png"), "_t_.png");
    }
}
