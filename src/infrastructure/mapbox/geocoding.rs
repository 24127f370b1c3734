// SPDX-License-Identifier: MPL-2.0
//! Mapbox places geocoding.

use crate::application::port::{GeocodeError, Geocoder, Place};
use crate::domain::Coordinate;
use crate::infrastructure::http::ensure_success;
use futures_util::future::{BoxFuture, FutureExt};
use reqwest::{Client, Url};
use serde::Deserialize;

const PLACES_BASE: &str = "https://api.mapbox.com/geocoding/v5/mapbox.places/";

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    id: String,
    place_name: String,
    /// `[longitude, latitude]`
    center: [f64; 2],
}

impl Feature {
    /// Features with out-of-range centers are dropped rather than failing
    /// the whole search.
    fn into_place(self) -> Option<Place> {
        let [longitude, latitude] = self.center;
        let center = Coordinate::new(latitude, longitude).ok()?;
        Some(Place {
            id: self.id,
            name: self.place_name,
            center,
        })
    }
}

fn parse_places(collection: FeatureCollection) -> Vec<Place> {
    collection
        .features
        .into_iter()
        .filter_map(Feature::into_place)
        .collect()
}

/// [`Geocoder`] backed by the Mapbox places endpoint.
#[derive(Debug, Clone)]
pub struct MapboxGeocoder {
    client: Client,
    access_token: String,
}

impl MapboxGeocoder {
    pub fn new(client: Client, access_token: impl Into<String>) -> Self {
        Self {
            client,
            access_token: access_token.into(),
        }
    }

    /// The query is percent-encoded as a single path segment.
    fn search_url(&self, query: &str, limit: usize) -> Result<Url, GeocodeError> {
        let mut url =
            Url::parse(PLACES_BASE).map_err(|err| GeocodeError::Decode(err.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| GeocodeError::Decode("geocoding URL cannot hold a path".into()))?
            .pop_if_empty()
            .push(&format!("{query}.json"));
        url.query_pairs_mut()
            .append_pair("access_token", &self.access_token)
            .append_pair("autocomplete", "true")
            .append_pair("limit", &limit.to_string());
        Ok(url)
    }
}

impl Geocoder for MapboxGeocoder {
    fn search<'a>(
        &'a self,
        query: &'a str,
        limit: usize,
    ) -> BoxFuture<'a, Result<Vec<Place>, GeocodeError>> {
        async move {
            let url = self.search_url(query, limit)?;
            let response = self.client.get(url).send().await?;
            let collection: FeatureCollection = ensure_success(response).await?.json().await?;
            Ok(parse_places(collection))
        }
        .boxed()
    }
}
