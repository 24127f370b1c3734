// SPDX-License-Identifier: MPL-2.0
//! Remote store port definition.
//!
//! A [`RemoteStore`] is the vendor-specific half of the gateway: it knows how
//! to query and insert pin records and how to put bytes into object storage.
//! The vendor-neutral flow (sequential uploads, photo assembly, cleanup on
//! failure) lives in [`crate::application::gateway`].

use super::gateway::GatewayError;
use crate::domain::{Coordinate, Photo, PhotoId, Pin, PinId, Session, Title, UserId};
use chrono::{DateTime, NaiveDate, Utc};
use futures_util::future::BoxFuture;

/// A pin as written to the backend, before it has an identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct PinRecord {
    pub coordinate: Coordinate,
    pub title: Title,
    pub description: Option<String>,
    pub visit_date: NaiveDate,
    pub photos: Vec<Photo>,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
}

impl PinRecord {
    /// Attaches the backend-assigned identifier.
    #[must_use]
    pub fn into_pin(self, id: PinId) -> Pin {
        Pin {
            id,
            coordinate: self.coordinate,
            title: self.title,
            description: self.description,
            visit_date: self.visit_date,
            photos: self.photos,
            user_id: self.user_id,
            created_at: self.created_at,
        }
    }
}

/// Bytes to put into object storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectUpload {
    pub key: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// An object that was stored and can be fetched publicly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub key: String,
    pub url: String,
}

/// Vendor-specific pin collection and object storage.
///
/// Implementations must filter `query_pins` by the session user on the
/// server side and should return newest creation time first.
pub trait RemoteStore: Send + Sync {
    /// Short backend name used in logs.
    fn name(&self) -> &'static str;

    /// Storage key for a new photo, namespaced by user.
    fn object_key(
        &self,
        user: &UserId,
        photo_id: &PhotoId,
        file_name: &str,
        now: DateTime<Utc>,
    ) -> String;

    fn query_pins<'a>(&'a self, session: &'a Session)
        -> BoxFuture<'a, Result<Vec<Pin>, GatewayError>>;

    fn insert_pin<'a>(
        &'a self,
        session: &'a Session,
        record: &'a PinRecord,
    ) -> BoxFuture<'a, Result<PinId, GatewayError>>;

    fn upload_object<'a>(
        &'a self,
        session: &'a Session,
        upload: ObjectUpload,
    ) -> BoxFuture<'a, Result<StoredObject, GatewayError>>;

    fn delete_object<'a>(
        &'a self,
        session: &'a Session,
        key: &'a str,
    ) -> BoxFuture<'a, Result<(), GatewayError>>;
}
