// SPDX-License-Identifier: MPL-2.0
//! The pin gateway flow shared by every backend.
//!
//! [`StoreGateway`] turns any [`RemoteStore`] into a [`PinGateway`]. The
//! vendor adapters only translate records and requests; listing semantics,
//! sequential photo upload, photo assembly and cleanup after a failed write
//! are decided here, once.

use super::port::{GatewayError, ObjectUpload, PinGateway, PinRecord, RemoteStore};
use super::timeline::sort_newest_first;
use crate::domain::{NewPin, Photo, PhotoFile, PhotoId, Pin, Session};
use chrono::{DateTime, Utc};
use futures_util::future::{BoxFuture, FutureExt};

/// [`PinGateway`] implementation over a vendor [`RemoteStore`].
#[derive(Debug, Clone)]
pub struct StoreGateway<S> {
    store: S,
}

impl<S: RemoteStore> StoreGateway<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Access to the underlying store (used by tests and diagnostics).
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Reads one local file and uploads it. Returns the storage key with the
    /// assembled photo so the caller can clean up on a later failure.
    async fn upload_photo(
        &self,
        session: &Session,
        file: &PhotoFile,
        now: DateTime<Utc>,
    ) -> Result<(String, Photo), GatewayError> {
        let bytes = tokio::fs::read(&file.path)
            .await
            .map_err(|err| GatewayError::Io(format!("{}: {err}", file.path.display())))?;

        let photo_id = PhotoId::generate();
        let key = self
            .store
            .object_key(session.user_id(), &photo_id, &file.name, now);

        let stored = self
            .store
            .upload_object(
                session,
                ObjectUpload {
                    key,
                    content_type: file.content_type.clone(),
                    bytes,
                },
            )
            .await?;

        tracing::debug!(backend = self.store.name(), key = %stored.key, "photo uploaded");

        let photo = Photo {
            id: photo_id,
            url: stored.url,
            caption: None,
            upload_date: Utc::now(),
            metadata: Some(file.metadata()),
        };
        Ok((stored.key, photo))
    }

    /// Best-effort removal of objects uploaded by a failed `create`.
    async fn discard_uploads(&self, session: &Session, keys: &[String]) {
        for key in keys {
            if let Err(err) = self.store.delete_object(session, key).await {
                tracing::warn!(
                    backend = self.store.name(),
                    key = %key,
                    error = %err,
                    "failed to remove orphaned photo"
                );
            }
        }
    }

    async fn create_pin(&self, session: &Session, draft: NewPin) -> Result<Pin, GatewayError> {
        let now = Utc::now();
        let mut uploaded_keys = Vec::with_capacity(draft.photos.len());
        let mut photos = Vec::with_capacity(draft.photos.len());

        // One file at a time, in selection order.
        for file in &draft.photos {
            match self.upload_photo(session, file, now).await {
                Ok((key, photo)) => {
                    uploaded_keys.push(key);
                    photos.push(photo);
                }
                Err(err) => {
                    self.discard_uploads(session, &uploaded_keys).await;
                    return Err(err);
                }
            }
        }

        let record = PinRecord {
            coordinate: draft.coordinate,
            title: draft.title,
            description: draft.description,
            visit_date: draft.visit_date,
            photos,
            user_id: session.user_id().clone(),
            created_at: now,
        };

        match self.store.insert_pin(session, &record).await {
            Ok(id) => {
                tracing::info!(
                    backend = self.store.name(),
                    pin = %id,
                    photos = record.photos.len(),
                    "pin created"
                );
                Ok(record.into_pin(id))
            }
            Err(err) => {
                self.discard_uploads(session, &uploaded_keys).await;
                Err(err)
            }
        }
    }
}

impl<S: RemoteStore> PinGateway for StoreGateway<S> {
    fn list<'a>(&'a self, session: Option<&'a Session>) -> BoxFuture<'a, Vec<Pin>> {
        async move {
            let Some(session) = session else {
                return Vec::new();
            };

            match self.store.query_pins(session).await {
                Ok(mut pins) => {
                    sort_newest_first(&mut pins);
                    tracing::debug!(backend = self.store.name(), count = pins.len(), "pins fetched");
                    pins
                }
                Err(err) => {
                    tracing::warn!(backend = self.store.name(), error = %err, "failed to fetch pins");
                    Vec::new()
                }
            }
        }
        .boxed()
    }

    fn create<'a>(
        &'a self,
        session: &'a Session,
        draft: NewPin,
    ) -> BoxFuture<'a, Result<Pin, GatewayError>> {
        self.create_pin(session, draft).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::port::StoredObject;
    use crate::domain::{Coordinate, PinId, Title, UserId};
    use crate::test_utils::{assert_abs_diff_eq, session_for, COORD_EPSILON};
    use chrono::NaiveDate;
    use std::path::Path;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Records every call; failures are scripted per operation.
    #[derive(Default)]
    struct ScriptedStore {
        calls: Mutex<Vec<String>>,
        pins: Vec<Pin>,
        fail_query: bool,
        fail_insert: bool,
        fail_upload_after: Option<usize>,
    }

    impl ScriptedStore {
        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }

        fn uploads(&self) -> usize {
            self.calls()
                .iter()
                .filter(|c| c.starts_with("upload"))
                .count()
        }
    }

    fn server_error() -> GatewayError {
        GatewayError::Http {
            status: 500,
            message: "internal".into(),
        }
    }

    impl RemoteStore for ScriptedStore {
        fn name(&self) -> &'static str {
            "scripted"
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
            _session: &'a Session,
        ) -> BoxFuture<'a, Result<Vec<Pin>, GatewayError>> {
            self.record("query".into());
            let result = if self.fail_query {
                Err(server_error())
            } else {
                Ok(self.pins.clone())
            };
            async move { result }.boxed()
        }

        fn insert_pin<'a>(
            &'a self,
            _session: &'a Session,
            record: &'a PinRecord,
        ) -> BoxFuture<'a, Result<PinId, GatewayError>> {
            self.record(format!("insert {}", record.title));
            let result = if self.fail_insert {
                Err(server_error())
            } else {
                Ok(PinId::new("pin-1"))
            };
            async move { result }.boxed()
        }

        fn upload_object<'a>(
            &'a self,
            _session: &'a Session,
            upload: ObjectUpload,
        ) -> BoxFuture<'a, Result<StoredObject, GatewayError>> {
            let done = self.uploads();
            self.record(format!("upload {}", upload.key));
            let result = match self.fail_upload_after {
                Some(limit) if done >= limit => Err(GatewayError::Transport("reset".into())),
                _ => Ok(StoredObject {
                    url: format!("https://cdn.test/{}", upload.key),
                    key: upload.key,
                }),
            };
            async move { result }.boxed()
        }

        fn delete_object<'a>(
            &'a self,
            _session: &'a Session,
            key: &'a str,
        ) -> BoxFuture<'a, Result<(), GatewayError>> {
            self.record(format!("delete {key}"));
            async { Ok(()) }.boxed()
        }
    }

    fn write_photo(dir: &TempDir, name: &str) -> PhotoFile {
        let path = dir.path().join(name);
        std::fs::write(&path, b"fake image bytes").unwrap();
        PhotoFile::describe(&path, 16).unwrap()
    }

    fn draft(photos: Vec<PhotoFile>) -> NewPin {
        NewPin {
            coordinate: Coordinate::new(48.858_370_123, 2.294_481_987).unwrap(),
            title: Title::parse("Eiffel Tower").unwrap(),
            description: Some("Windy".into()),
            visit_date: NaiveDate::from_ymd_opt(2023, 6, 1).unwrap(),
            photos,
        }
    }

    #[tokio::test]
    async fn list_without_session_makes_no_call() {
        let gateway = StoreGateway::new(ScriptedStore::default());
        assert!(gateway.list(None).await.is_empty());
        assert!(gateway.store().calls().is_empty());
    }

    #[tokio::test]
    async fn list_error_degrades_to_empty() {
        let gateway = StoreGateway::new(ScriptedStore {
            fail_query: true,
            ..Default::default()
        });
        let session = session_for("u1");
        assert!(gateway.list(Some(&session)).await.is_empty());
        assert_eq!(gateway.store().calls(), ["query"]);
    }

    #[tokio::test]
    async fn create_uploads_sequentially_then_inserts() {
        let dir = TempDir::new().unwrap();
        let photos = vec![write_photo(&dir, "a.jpg"), write_photo(&dir, "b.png")];
        let gateway = StoreGateway::new(ScriptedStore::default());
        let session = session_for("u1");

        let pin = gateway.create(&session, draft(photos)).await.unwrap();

        let calls = gateway.store().calls();
        assert_eq!(calls.len(), 3);
        assert!(calls[0].starts_with("upload u1/"));
        assert!(calls[1].starts_with("upload u1/"));
        assert_eq!(calls[2], "insert Eiffel Tower");

        assert_eq!(pin.id.as_str(), "pin-1");
        assert_eq!(pin.user_id.as_str(), "u1");
        assert_eq!(pin.photos.len(), 2);
        assert_eq!(pin.photos[0].metadata.as_ref().unwrap().name, "a.jpg");
        assert_eq!(pin.photos[1].metadata.as_ref().unwrap().content_type, "image/png");
        assert!(pin.photos[0].url.starts_with("https://cdn.test/u1/"));
        assert_ne!(pin.photos[0].id, pin.photos[1].id);
        assert_abs_diff_eq!(pin.coordinate.latitude(), 48.858_370_123, epsilon = COORD_EPSILON);
        assert_abs_diff_eq!(pin.coordinate.longitude(), 2.294_481_987, epsilon = COORD_EPSILON);
    }

    #[tokio::test]
    async fn failed_insert_removes_uploaded_photos() {
        let dir = TempDir::new().unwrap();
        let photos = vec![write_photo(&dir, "a.jpg"), write_photo(&dir, "b.jpg")];
        let gateway = StoreGateway::new(ScriptedStore {
            fail_insert: true,
            ..Default::default()
        });
        let session = session_for("u1");

        let err = gateway.create(&session, draft(photos)).await.unwrap_err();
        assert_eq!(err, server_error());

        let calls = gateway.store().calls();
        let deletes: Vec<_> = calls.iter().filter(|c| c.starts_with("delete")).collect();
        assert_eq!(deletes.len(), 2);
    }

    #[tokio::test]
    async fn failed_upload_stops_and_cleans_previous() {
        let dir = TempDir::new().unwrap();
        let photos = vec![
            write_photo(&dir, "a.jpg"),
            write_photo(&dir, "b.jpg"),
            write_photo(&dir, "c.jpg"),
        ];
        let gateway = StoreGateway::new(ScriptedStore {
            fail_upload_after: Some(1),
            ..Default::default()
        });
        let session = session_for("u1");

        let err = gateway.create(&session, draft(photos)).await.unwrap_err();
        assert!(matches!(err, GatewayError::Transport(_)));

        let calls = gateway.store().calls();
        assert_eq!(gateway.store().uploads(), 2);
        assert_eq!(calls.iter().filter(|c| c.starts_with("delete")).count(), 1);
        assert!(!calls.iter().any(|c| c.starts_with("insert")));
    }

    #[tokio::test]
    async fn unreadable_photo_is_an_io_error() {
        let missing = PhotoFile::describe(Path::new("/nonexistent/wayfarer/x.jpg"), 0).unwrap();
        let gateway = StoreGateway::new(ScriptedStore::default());
        let session = session_for("u1");

        let err = gateway.create(&session, draft(vec![missing])).await.unwrap_err();
        assert!(matches!(err, GatewayError::Io(_)));
        assert!(gateway.store().calls().is_empty());
    }
}
