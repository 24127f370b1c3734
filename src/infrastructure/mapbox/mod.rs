// SPDX-License-Identifier: MPL-2.0
//! Mapbox adapters: place search and raster map tiles.

pub mod geocoding;
pub mod tiles;

pub use geocoding::MapboxGeocoder;
pub use tiles::{MapStyle, TileError, TileId, TileSource, TILE_SIZE};
