// SPDX-License-Identifier: MPL-2.0
//! Photo bytes served from public HTTPS URLs.

use crate::application::port::{GatewayError, PhotoSource};
use crate::infrastructure::http::ensure_success;
use futures_util::future::{BoxFuture, FutureExt};
use reqwest::Client;

/// [`PhotoSource`] for backends whose photo URLs are plain public links.
#[derive(Debug, Clone)]
pub struct HttpPhotoSource {
    client: Client,
}

impl HttpPhotoSource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl PhotoSource for HttpPhotoSource {
    fn fetch<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<Vec<u8>, GatewayError>> {
        async move {
            let response = self.client.get(url).send().await?;
            let bytes = ensure_success(response).await?.bytes().await?;
            Ok(bytes.to_vec())
        }
        .boxed()
    }
}
