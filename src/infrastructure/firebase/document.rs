// SPDX-License-Identifier: MPL-2.0
//! Firestore REST document mapping.
//!
//! Firestore's REST API wraps every field in a typed value object
//! (`{"stringValue": "..."}`, `{"doubleValue": 1.5}`, ...). This module
//! converts pin records to and from that representation.
//!
//! Pin documents use camelCase field names: `lat`, `lng`, `title`,
//! `description`, `visitDate`, `photos`, `userId`, `createdAt`.

use crate::application::port::{GatewayError, PinRecord};
use crate::domain::{Coordinate, Photo, PhotoId, PhotoMetadata, Pin, PinId, Title, UserId};
use chrono::{DateTime, NaiveDate, NaiveTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// =============================================================================
// Wire types
// =============================================================================

/// A Firestore typed value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Value {
    NullValue(()),
    BooleanValue(bool),
    /// int64 values travel as decimal strings.
    IntegerValue(String),
    DoubleValue(f64),
    TimestampValue(String),
    StringValue(String),
    ArrayValue(ArrayValue),
    MapValue(MapValue),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArrayValue {
    #[serde(default)]
    pub values: Vec<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapValue {
    #[serde(default)]
    pub fields: BTreeMap<String, Value>,
}

/// A Firestore document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Full resource name, `projects/{p}/databases/(default)/documents/pins/{id}`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub fields: BTreeMap<String, Value>,
}

impl Document {
    /// The trailing path segment of the resource name.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.name
            .as_deref()
            .and_then(|name| name.rsplit('/').next())
            .filter(|id| !id.is_empty())
    }
}

/// One element of a `runQuery` response stream.
///
/// Elements without a document only carry read metadata.
#[derive(Debug, Clone, Deserialize)]
pub struct RunQueryItem {
    #[serde(default)]
    pub document: Option<Document>,
}

// =============================================================================
// Encoding
// =============================================================================

fn string(value: impl Into<String>) -> Value {
    Value::StringValue(value.into())
}

fn timestamp(value: DateTime<Utc>) -> Value {
    Value::TimestampValue(value.to_rfc3339_opts(SecondsFormat::Micros, true))
}

fn optional_string(value: Option<&str>) -> Value {
    value.map_or(Value::NullValue(()), string)
}

/// Visit dates are stored as midnight UTC timestamps.
fn visit_timestamp(date: NaiveDate) -> Value {
    timestamp(date.and_time(NaiveTime::MIN).and_utc())
}

fn encode_photo(photo: &Photo) -> Value {
    let mut fields = BTreeMap::new();
    fields.insert("id".into(), string(photo.id.as_str()));
    fields.insert("url".into(), string(&photo.url));
    if let Some(caption) = &photo.caption {
        fields.insert("caption".into(), string(caption));
    }
    fields.insert("uploadDate".into(), timestamp(photo.upload_date));
    if let Some(metadata) = &photo.metadata {
        let mut meta = BTreeMap::new();
        meta.insert("size".into(), Value::IntegerValue(metadata.size.to_string()));
        meta.insert("type".into(), string(&metadata.content_type));
        meta.insert("name".into(), string(&metadata.name));
        fields.insert("metadata".into(), Value::MapValue(MapValue { fields: meta }));
    }
    Value::MapValue(MapValue { fields })
}

/// Builds the document written by a pin insert.
#[must_use]
pub fn encode_pin(record: &PinRecord) -> Document {
    let mut fields = BTreeMap::new();
    fields.insert("lat".into(), Value::DoubleValue(record.coordinate.latitude()));
    fields.insert("lng".into(), Value::DoubleValue(record.coordinate.longitude()));
    fields.insert("title".into(), string(record.title.as_str()));
    fields.insert(
        "description".into(),
        optional_string(record.description.as_deref()),
    );
    fields.insert("visitDate".into(), visit_timestamp(record.visit_date));
    fields.insert(
        "photos".into(),
        Value::ArrayValue(ArrayValue {
            values: record.photos.iter().map(encode_photo).collect(),
        }),
    );
    fields.insert("userId".into(), string(record.user_id.as_str()));
    fields.insert("createdAt".into(), timestamp(record.created_at));
    Document { name: None, fields }
}

// =============================================================================
// Decoding
// =============================================================================

/// Typed access to a document's fields with descriptive errors.
struct Fields<'a>(&'a BTreeMap<String, Value>);

impl<'a> Fields<'a> {
    fn get(&self, key: &str) -> Result<&'a Value, GatewayError> {
        self.0
            .get(key)
            .ok_or_else(|| GatewayError::Decode(format!("missing field `{key}`")))
    }

    fn mismatch(key: &str, expected: &str) -> GatewayError {
        GatewayError::Decode(format!("field `{key}` is not a {expected}"))
    }

    fn string(&self, key: &str) -> Result<&'a str, GatewayError> {
        match self.get(key)? {
            Value::StringValue(s) => Ok(s),
            _ => Err(Self::mismatch(key, "string")),
        }
    }

    fn optional_string(&self, key: &str) -> Result<Option<&'a str>, GatewayError> {
        match self.0.get(key) {
            None | Some(Value::NullValue(())) => Ok(None),
            Some(Value::StringValue(s)) => Ok(Some(s)),
            Some(_) => Err(Self::mismatch(key, "string")),
        }
    }

    /// Numbers written by other clients may arrive as integers.
    fn number(&self, key: &str) -> Result<f64, GatewayError> {
        match self.get(key)? {
            Value::DoubleValue(n) => Ok(*n),
            Value::IntegerValue(s) => s
                .parse::<i64>()
                .map(|n| n as f64)
                .map_err(|_| Self::mismatch(key, "number")),
            _ => Err(Self::mismatch(key, "number")),
        }
    }

    fn integer(&self, key: &str) -> Result<u64, GatewayError> {
        match self.get(key)? {
            Value::IntegerValue(s) => s.parse().map_err(|_| Self::mismatch(key, "integer")),
            _ => Err(Self::mismatch(key, "integer")),
        }
    }

    fn timestamp(&self, key: &str) -> Result<DateTime<Utc>, GatewayError> {
        match self.get(key)? {
            Value::TimestampValue(s) => DateTime::parse_from_rfc3339(s)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|_| Self::mismatch(key, "timestamp")),
            _ => Err(Self::mismatch(key, "timestamp")),
        }
    }

    fn array(&self, key: &str) -> Result<&'a [Value], GatewayError> {
        match self.0.get(key) {
            None | Some(Value::NullValue(())) => Ok(&[]),
            Some(Value::ArrayValue(array)) => Ok(&array.values),
            Some(_) => Err(Self::mismatch(key, "array")),
        }
    }

    fn optional_map(&self, key: &str) -> Result<Option<Fields<'a>>, GatewayError> {
        match self.0.get(key) {
            None | Some(Value::NullValue(())) => Ok(None),
            Some(Value::MapValue(map)) => Ok(Some(Fields(&map.fields))),
            Some(_) => Err(Self::mismatch(key, "map")),
        }
    }
}

fn decode_photo(value: &Value) -> Result<Photo, GatewayError> {
    let Value::MapValue(map) = value else {
        return Err(GatewayError::Decode("photo entry is not a map".into()));
    };
    let fields = Fields(&map.fields);

    let metadata = fields
        .optional_map("metadata")?
        .map(|meta| -> Result<PhotoMetadata, GatewayError> {
            Ok(PhotoMetadata {
                size: meta.integer("size")?,
                content_type: meta.string("type")?.to_string(),
                name: meta.string("name")?.to_string(),
            })
        })
        .transpose()?;

    Ok(Photo {
        id: PhotoId::new(fields.string("id")?),
        url: fields.string("url")?.to_string(),
        caption: fields.optional_string("caption")?.map(str::to_string),
        upload_date: fields.timestamp("uploadDate")?,
        metadata,
    })
}

/// Converts a stored pin document back to a [`Pin`].
pub fn decode_pin(document: &Document) -> Result<Pin, GatewayError> {
    let id = document
        .id()
        .ok_or_else(|| GatewayError::Decode("document without name".into()))?;
    let fields = Fields(&document.fields);

    let latitude = fields.number("lat")?;
    let longitude = fields.number("lng")?;
    let coordinate = Coordinate::new(latitude, longitude)
        .map_err(|err| GatewayError::Decode(err.to_string()))?;
    let title =
        Title::parse(fields.string("title")?).map_err(|err| GatewayError::Decode(err.to_string()))?;

    let photos = fields
        .array("photos")?
        .iter()
        .map(decode_photo)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Pin {
        id: PinId::new(id),
        coordinate,
        title,
        description: fields.optional_string("description")?.map(str::to_string),
        visit_date: fields.timestamp("visitDate")?.date_naive(),
        photos,
        user_id: UserId::new(fields.string("userId")?),
        created_at: fields.timestamp("createdAt")?,
    })
}

/// Decodes every document of a `runQuery` answer.
///
/// A malformed document is logged and skipped so the others still show.
pub fn decode_pins(items: &[RunQueryItem]) -> Vec<Pin> {
    items
        .iter()
        .filter_map(|item| item.document.as_ref())
        .filter_map(|document| match decode_pin(document) {
            Ok(pin) => Some(pin),
            Err(err) => {
                tracing::warn!(
                    document = document.name.as_deref().unwrap_or("?"),
                    error = %err,
                    "skipping unreadable pin document"
                );
                None
            }
        })
        .collect()
}
