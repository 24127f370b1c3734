// SPDX-License-Identifier: MPL-2.0
//! PostgREST row mapping for the `pins` table.
//!
//! Columns are snake_case; the `photos` jsonb column keeps the camelCase
//! photo objects the web client writes.

use crate::application::port::{GatewayError, PinRecord};
use crate::domain::{Coordinate, Photo, PhotoId, PhotoMetadata, Pin, PinId, Title, UserId};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Primary keys may be uuid or bigint depending on the table definition.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RowId {
    Text(String),
    Number(i64),
}

impl From<RowId> for PinId {
    fn from(id: RowId) -> Self {
        match id {
            RowId::Text(text) => PinId::new(text),
            RowId::Number(n) => PinId::new(n.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoJson {
    pub id: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    pub upload_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<PhotoMetadata>,
}

impl From<&Photo> for PhotoJson {
    fn from(photo: &Photo) -> Self {
        Self {
            id: photo.id.to_string(),
            url: photo.url.clone(),
            caption: photo.caption.clone(),
            upload_date: photo.upload_date,
            metadata: photo.metadata.clone(),
        }
    }
}

impl From<PhotoJson> for Photo {
    fn from(json: PhotoJson) -> Self {
        Self {
            id: PhotoId::new(json.id),
            url: json.url,
            caption: json.caption,
            upload_date: json.upload_date,
            metadata: json.metadata,
        }
    }
}

/// A row as returned by `select=*`.
#[derive(Debug, Clone, Deserialize)]
pub struct PinRow {
    pub id: RowId,
    pub lat: f64,
    pub lng: f64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub visit_date: String,
    #[serde(default)]
    pub photos: Option<Vec<PhotoJson>>,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}

/// The insert payload; `id` is assigned by the database.
#[derive(Debug, Clone, Serialize)]
pub struct NewPinRow<'a> {
    pub lat: f64,
    pub lng: f64,
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub visit_date: NaiveDate,
    pub photos: Vec<PhotoJson>,
    pub user_id: &'a str,
    pub created_at: DateTime<Utc>,
}

impl<'a> From<&'a PinRecord> for NewPinRow<'a> {
    fn from(record: &'a PinRecord) -> Self {
        Self {
            lat: record.coordinate.latitude(),
            lng: record.coordinate.longitude(),
            title: record.title.as_str(),
            description: record.description.as_deref(),
            visit_date: record.visit_date,
            photos: record.photos.iter().map(PhotoJson::from).collect(),
            user_id: record.user_id.as_str(),
            created_at: record.created_at,
        }
    }
}

/// `date` columns come back as `YYYY-MM-DD`; `timestamptz` columns as RFC 3339.
fn parse_visit_date(raw: &str) -> Result<NaiveDate, GatewayError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|dt| dt.with_timezone(&Utc).date_naive()))
        .map_err(|_| GatewayError::Decode(format!("invalid visit_date `{raw}`")))
}

impl TryFrom<PinRow> for Pin {
    type Error = GatewayError;

    fn try_from(row: PinRow) -> Result<Self, Self::Error> {
        let coordinate =
            Coordinate::new(row.lat, row.lng).map_err(|err| GatewayError::Decode(err.to_string()))?;
        let title = Title::parse(&row.title).map_err(|err| GatewayError::Decode(err.to_string()))?;

        Ok(Pin {
            id: row.id.into(),
            coordinate,
            title,
            description: row.description.filter(|d| !d.trim().is_empty()),
            visit_date: parse_visit_date(&row.visit_date)?,
            photos: row
                .photos
                .unwrap_or_default()
                .into_iter()
                .map(Photo::from)
                .collect(),
            user_id: UserId::new(row.user_id),
            created_at: row.created_at,
        })
    }
}

/// Decodes a select answer row by row.
///
/// Rows that do not match [`PinRow`] or fail validation are logged and
/// skipped so one bad row does not hide the rest.
pub fn decode_rows(rows: Vec<serde_json::Value>) -> Vec<Pin> {
    rows.into_iter()
        .filter_map(|value| {
            let id = value.get("id").map(ToString::to_string);
            let decoded = serde_json::from_value::<PinRow>(value)
                .map_err(|err| GatewayError::Decode(err.to_string()))
                .and_then(Pin::try_from);
            match decoded {
                Ok(pin) => Some(pin),
                Err(err) => {
                    tracing::warn!(
                        row = id.as_deref().unwrap_or("?"),
                        error = %err,
                        "skipping unreadable pin row"
                    );
                    None
                }
            }
        })
        .collect()
}
