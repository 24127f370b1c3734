// SPDX-License-Identifier: MPL-2.0
//! Geocoding port definition.

use crate::domain::Coordinate;
use futures_util::future::BoxFuture;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeocodeError {
    #[error("HTTP {0}")]
    Http(u16),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("unexpected response: {0}")]
    Decode(String),
}

/// A search result the map can be centered on.
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    pub id: String,
    pub name: String,
    pub center: Coordinate,
}

/// Port for free-text place search.
pub trait Geocoder: Send + Sync {
    fn search<'a>(
        &'a self,
        query: &'a str,
        limit: usize,
    ) -> BoxFuture<'a, Result<Vec<Place>, GeocodeError>>;
}
