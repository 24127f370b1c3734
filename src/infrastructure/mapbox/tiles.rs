// SPDX-License-Identifier: MPL-2.0
//! Raster tiles for a Mapbox style.
//!
//! Styles are configured as `mapbox://styles/{owner}/{style}` and served as
//! 256 px raster tiles from the Static Tiles API.

use crate::infrastructure::http::{ensure_success, HttpFailure};
use reqwest::Client;
use std::fmt;
use thiserror::Error;

const STYLES_BASE: &str = "https://api.mapbox.com/styles/v1";

/// Tile edge length in pixels.
pub const TILE_SIZE: u32 = 256;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TileError {
    #[error("invalid style URL `{0}`, expected mapbox://styles/<owner>/<style>")]
    InvalidStyle(String),

    #[error("HTTP {0}")]
    Http(u16),

    #[error("transport error: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for TileError {
    fn from(err: reqwest::Error) -> Self {
        TileError::Transport(err.to_string())
    }
}

impl From<HttpFailure> for TileError {
    fn from(failure: HttpFailure) -> Self {
        TileError::Http(failure.status.as_u16())
    }
}

/// Address of one tile in the Web Mercator pyramid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileId {
    pub zoom: u8,
    pub x: u32,
    pub y: u32,
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.zoom, self.x, self.y)
    }
}

/// A parsed `mapbox://styles/{owner}/{style}` URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapStyle {
    pub owner: String,
    pub style: String,
}

impl MapStyle {
    pub fn parse(url: &str) -> Result<Self, TileError> {
        let invalid = || TileError::InvalidStyle(url.to_string());
        let rest = url.trim().strip_prefix("mapbox://styles/").ok_or_else(invalid)?;
        let mut parts = rest.trim_end_matches('/').split('/');

        match (parts.next(), parts.next(), parts.next()) {
            (Some(owner), Some(style), None) if !owner.is_empty() && !style.is_empty() => {
                Ok(Self {
                    owner: owner.to_string(),
                    style: style.to_string(),
                })
            }
            _ => Err(invalid()),
        }
    }
}

/// Fetches raster tiles for one style.
#[derive(Debug, Clone)]
pub struct TileSource {
    client: Client,
    style: MapStyle,
    access_token: String,
}

impl TileSource {
    pub fn new(client: Client, style: MapStyle, access_token: impl Into<String>) -> Self {
        Self {
            client,
            style,
            access_token: access_token.into(),
        }
    }

    #[must_use]
    pub fn tile_url(&self, tile: TileId) -> String {
        format!(
            "{STYLES_BASE}/{}/{}/tiles/{TILE_SIZE}/{}/{}/{}?access_token={}",
            self.style.owner, self.style.style, tile.zoom, tile.x, tile.y, self.access_token
        )
    }

    /// Downloads the encoded tile image.
    pub async fn fetch(&self, tile: TileId) -> Result<Vec<u8>, TileError> {
        let response = self.client.get(self.tile_url(tile)).send().await?;
        let bytes = ensure_success(response).await?.bytes().await?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_style_url() {
        let style = MapStyle::parse("mapbox://styles/mapbox/outdoors-v12").unwrap();
        assert_eq!(style.owner, "mapbox");
        assert_eq!(style.style, "outdoors-v12");
    }

    #[test]
    fn rejects_malformed_style_urls() {
        for url in [
            "https://api.mapbox.com/styles/v1/mapbox/streets-v12",
            "mapbox://styles/mapbox",
            "mapbox://styles//outdoors-v12",
            "mapbox://styles/a/b/c",
        ] {
            assert!(MapStyle::parse(url).is_err(), "{url} should be rejected");
        }
    }

    #[test]
    fn tile_url_uses_256px_tiles() {
        let source = TileSource::new(
            Client::new(),
            MapStyle::parse("mapbox://styles/mapbox/outdoors-v12").unwrap(),
            "pk.abc",
        );
        let url = source.tile_url(TileId { zoom: 3, x: 4, y: 2 });
        assert_eq!(
            url,
            "https://api.mapbox.com/styles/v1/mapbox/outdoors-v12/tiles/256/3/4/2?access_token=pk.abc"
        );
    }
}
