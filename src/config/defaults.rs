// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for all configuration constants.
//!
//! This module serves as the single source of truth for default values
//! used across the application. Constants are organized by category.
//!
//! # Categories
//!
//! - **Map**: Style, initial camera and zoom bounds
//! - **Search**: Debounce and result limits for place search
//! - **Backend**: Supabase storage names
//! - **Caches**: In-memory image cache capacities

// ==========================================================================
// Map Defaults
// ==========================================================================

/// Map style used when none is configured.
pub const DEFAULT_STYLE_URL: &str = "mapbox://styles/mapbox/outdoors-v12";

/// Initial map center latitude in degrees.
pub const DEFAULT_INITIAL_LATITUDE: f64 = 20.0;

/// Initial map center longitude in degrees.
pub const DEFAULT_INITIAL_LONGITUDE: f64 = 0.0;

/// Initial map zoom level.
pub const DEFAULT_INITIAL_ZOOM: u8 = 2;

/// Minimum map zoom level.
pub const MIN_ZOOM: u8 = 1;

/// Maximum map zoom level.
pub const MAX_ZOOM: u8 = 18;

/// Latitude limit of the Web Mercator projection.
pub const MAX_MERCATOR_LATITUDE: f64 = 85.051_128_78;

// ==========================================================================
// Search Defaults
// ==========================================================================

/// Delay between the last keystroke and the geocoding request.
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// Minimum debounce delay.
pub const MIN_DEBOUNCE_MS: u64 = 50;

/// Maximum debounce delay.
pub const MAX_DEBOUNCE_MS: u64 = 5_000;

/// Trimmed queries shorter than this never reach the geocoder, whatever the
/// configured minimum.
pub const DEFAULT_MIN_QUERY_CHARS: usize = 2;

/// Upper bound for the minimum query length.
pub const MAX_MIN_QUERY_CHARS: usize = 10;

/// Number of places requested per search.
pub const DEFAULT_RESULT_LIMIT: usize = 5;

/// Largest result count the places endpoint accepts.
pub const MAX_RESULT_LIMIT: usize = 10;

// ==========================================================================
// Backend Defaults
// ==========================================================================

/// Supabase storage bucket for photos.
pub const DEFAULT_SUPABASE_BUCKET: &str = "photos";

/// Supabase table holding pins.
pub const DEFAULT_SUPABASE_TABLE: &str = "pins";

// ==========================================================================
// Cache Defaults
// ==========================================================================

/// Decoded map tiles kept in memory.
pub const TILE_CACHE_CAPACITY: usize = 256;

/// Decoded photos kept in memory.
pub const PHOTO_CACHE_CAPACITY: usize = 64;

// ==========================================================================
// Notification Defaults
// ==========================================================================

/// Interval of the notification auto-dismiss tick, in milliseconds.
pub const NOTIFICATION_TICK_MS: u64 = 250;
