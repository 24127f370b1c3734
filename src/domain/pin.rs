// SPDX-License-Identifier: MPL-2.0
//! Pin and photo value types.
//!
//! A [`Pin`] is a visited place recorded by one user. Pins are created once
//! through the add-pin flow and never edited afterwards, so every type here
//! is plain data: validation happens in the constructors and nothing in this
//! module performs I/O.

use super::error::ValidationError;
use super::user::UserId;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Maximum absolute latitude in degrees.
pub const MAX_LATITUDE: f64 = 90.0;

/// Maximum absolute longitude in degrees.
pub const MAX_LONGITUDE: f64 = 180.0;

/// Image extensions accepted for upload (lowercase, without the dot).
pub const ACCEPTED_PHOTO_EXTENSIONS: [&str; 5] = ["jpeg", "jpg", "png", "gif", "webp"];

// =============================================================================
// Identifiers
// =============================================================================

/// Backend-assigned pin identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PinId(String);

impl PinId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Client-generated photo identifier.
///
/// Always a UUID v4 when created by this application; decoded records keep
/// whatever identifier the backend stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhotoId(String);

impl PhotoId {
    /// Generates a fresh random identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhotoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// Coordinate
// =============================================================================

/// A geographic position in degrees.
///
/// Construction through [`Coordinate::new`] guarantees a finite latitude in
/// `[-90, 90]` and a finite longitude in `[-180, 180]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    /// Creates a validated coordinate.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, ValidationError> {
        let valid = latitude.is_finite()
            && longitude.is_finite()
            && latitude.abs() <= MAX_LATITUDE
            && longitude.abs() <= MAX_LONGITUDE;

        if valid {
            Ok(Self {
                latitude,
                longitude,
            })
        } else {
            Err(ValidationError::InvalidCoordinate {
                latitude,
                longitude,
            })
        }
    }

    /// Creates a coordinate, wrapping longitude into `[-180, 180]` and
    /// clamping latitude into `[-90, 90]`.
    ///
    /// Used for positions derived from screen math, where panning past the
    /// antimeridian is expected.
    #[must_use]
    pub fn normalized(latitude: f64, longitude: f64) -> Self {
        let latitude = if latitude.is_finite() {
            latitude.clamp(-MAX_LATITUDE, MAX_LATITUDE)
        } else {
            0.0
        };
        let longitude = if longitude.is_finite() {
            let wrapped = (longitude + MAX_LONGITUDE).rem_euclid(2.0 * MAX_LONGITUDE) - MAX_LONGITUDE;
            // rem_euclid maps +180 to -180; keep the caller's sign at the seam
            if wrapped == -MAX_LONGITUDE && longitude > 0.0 {
                MAX_LONGITUDE
            } else {
                wrapped
            }
        } else {
            0.0
        };
        Self {
            latitude,
            longitude,
        }
    }

    #[must_use]
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    #[must_use]
    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let precision = f.precision().unwrap_or(6);
        write!(
            f,
            "{:.*}, {:.*}",
            precision, self.latitude, precision, self.longitude
        )
    }
}

// =============================================================================
// Title
// =============================================================================

/// A pin title, guaranteed non-empty after trimming.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Title(String);

impl Title {
    /// Trims the input and rejects blank titles.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            Err(ValidationError::BlankTitle)
        } else {
            Ok(Self(trimmed.to_string()))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Title {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Title> for String {
    fn from(title: Title) -> Self {
        title.0
    }
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// Photo
// =============================================================================

/// Upload-time details of the original file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoMetadata {
    pub size: u64,
    #[serde(rename = "type")]
    pub content_type: String,
    pub name: String,
}

/// A photo attached to a pin.
#[derive(Debug, Clone, PartialEq)]
pub struct Photo {
    pub id: PhotoId,
    pub url: String,
    pub caption: Option<String>,
    pub upload_date: DateTime<Utc>,
    pub metadata: Option<PhotoMetadata>,
}

// =============================================================================
// Pin
// =============================================================================

/// A visited place with its notes and photos.
#[derive(Debug, Clone, PartialEq)]
pub struct Pin {
    pub id: PinId,
    pub coordinate: Coordinate,
    pub title: Title,
    pub description: Option<String>,
    pub visit_date: NaiveDate,
    pub photos: Vec<Photo>,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
}

impl Pin {
    /// First photo, used as the timeline thumbnail.
    #[must_use]
    pub fn cover_photo(&self) -> Option<&Photo> {
        self.photos.first()
    }
}

// =============================================================================
// Draft types for creation
// =============================================================================

/// A local image file selected for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoFile {
    pub path: PathBuf,
    pub name: String,
    pub content_type: String,
    pub size: u64,
}

impl PhotoFile {
    /// Describes a file, rejecting extensions outside
    /// [`ACCEPTED_PHOTO_EXTENSIONS`].
    ///
    /// `size` is supplied by the caller so this stays free of I/O.
    pub fn describe(path: &Path, size: u64) -> Result<Self, ValidationError> {
        if !is_accepted_photo(path) {
            return Err(ValidationError::UnsupportedPhoto(path.to_path_buf()));
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .ok_or_else(|| ValidationError::UnsupportedPhoto(path.to_path_buf()))?;

        let content_type = image_rs::ImageFormat::from_path(path)
            .map(|format| format.to_mime_type().to_string())
            .map_err(|_| ValidationError::UnsupportedPhoto(path.to_path_buf()))?;

        Ok(Self {
            path: path.to_path_buf(),
            name,
            content_type,
            size,
        })
    }

    /// Metadata recorded alongside the uploaded photo.
    #[must_use]
    pub fn metadata(&self) -> PhotoMetadata {
        PhotoMetadata {
            size: self.size,
            content_type: self.content_type.clone(),
            name: self.name.clone(),
        }
    }
}

/// Returns `true` if the path has an accepted image extension.
#[must_use]
pub fn is_accepted_photo(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .is_some_and(|ext| ACCEPTED_PHOTO_EXTENSIONS.contains(&ext.as_str()))
}

/// A validated pin ready to be handed to the gateway.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPin {
    pub coordinate: Coordinate,
    pub title: Title,
    pub description: Option<String>,
    pub visit_date: NaiveDate,
    pub photos: Vec<PhotoFile>,
}

/// Normalizes free-text notes: trimmed, and `None` when blank.
#[must_use]
pub fn normalize_description(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::assert_abs_diff_eq;

    #[test]
    fn coordinate_accepts_bounds() {
        assert!(Coordinate::new(90.0, 180.0).is_ok());
        assert!(Coordinate::new(-90.0, -180.0).is_ok());
        assert!(Coordinate::new(48.8584, 2.2945).is_ok());
    }

    #[test]
    fn coordinate_rejects_out_of_range_and_nan() {
        assert!(Coordinate::new(90.5, 0.0).is_err());
        assert!(Coordinate::new(0.0, -180.1).is_err());
        assert!(Coordinate::new(f64::NAN, 0.0).is_err());
        assert!(Coordinate::new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn normalized_wraps_longitude() {
        let coord = Coordinate::normalized(10.0, 190.0);
        assert_abs_diff_eq!(coord.longitude(), -170.0, epsilon = 1e-9);

        let coord = Coordinate::normalized(10.0, -540.0);
        assert_abs_diff_eq!(coord.longitude(), -180.0, epsilon = 1e-9);

        let coord = Coordinate::normalized(120.0, 180.0);
        assert_abs_diff_eq!(coord.latitude(), 90.0, epsilon = 1e-9);
        assert_abs_diff_eq!(coord.longitude(), 180.0, epsilon = 1e-9);
    }

    #[test]
    fn coordinate_display_uses_precision() {
        let coord = Coordinate::new(48.858_37, 2.294_48).unwrap();
        assert_eq!(format!("{coord}"), "48.858370, 2.294480");
        assert_eq!(format!("{coord:.4}"), "48.8584, 2.2945");
    }

    #[test]
    fn title_is_trimmed() {
        let title = Title::parse("  Eiffel Tower \n").unwrap();
        assert_eq!(title.as_str(), "Eiffel Tower");
    }

    #[test]
    fn blank_title_is_rejected() {
        assert_eq!(Title::parse(""), Err(ValidationError::BlankTitle));
        assert_eq!(Title::parse(" \t\n "), Err(ValidationError::BlankTitle));
    }

    #[test]
    fn photo_ids_are_unique() {
        let a = PhotoId::generate();
        let b = PhotoId::generate();
        assert_ne!(a, b);
        assert!(uuid::Uuid::parse_str(a.as_str()).is_ok());
    }

    #[test]
    fn photo_file_derives_name_and_content_type() {
        let file = PhotoFile::describe(Path::new("/tmp/trip/Beach.JPG"), 1024).unwrap();
        assert_eq!(file.name, "Beach.JPG");
        assert_eq!(file.content_type, "image/jpeg");
        assert_eq!(file.metadata().size, 1024);

        let file = PhotoFile::describe(Path::new("sunset.webp"), 1).unwrap();
        assert_eq!(file.content_type, "image/webp");
    }

    #[test]
    fn photo_file_rejects_other_extensions() {
        assert!(matches!(
            PhotoFile::describe(Path::new("notes.txt"), 10),
            Err(ValidationError::UnsupportedPhoto(_))
        ));
        assert!(matches!(
            PhotoFile::describe(Path::new("raw.tiff"), 10),
            Err(ValidationError::UnsupportedPhoto(_))
        ));
        assert!(!is_accepted_photo(Path::new("no_extension")));
    }

    #[test]
    fn description_blank_becomes_none() {
        assert_eq!(normalize_description("   "), None);
        assert_eq!(
            normalize_description("  great food "),
            Some("great food".to_string())
        );
    }

    #[test]
    fn photo_metadata_serializes_type_key() {
        let meta = PhotoMetadata {
            size: 3,
            content_type: "image/png".into(),
            name: "a.png".into(),
        };
        let json = serde_json::to_value(&meta).unwrap();
        assert_eq!(json["type"], "image/png");
    }
}
