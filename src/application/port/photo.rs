// SPDX-License-Identifier: MPL-2.0
//! Photo retrieval port definition.

use super::gateway::GatewayError;
use futures_util::future::BoxFuture;

/// Port for fetching the bytes behind a [`Photo`](crate::domain::Photo) URL.
///
/// Backends that serve photos over public HTTPS share one implementation;
/// the memory backend serves its own `memory://` URLs.
pub trait PhotoSource: Send + Sync {
    fn fetch<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<Vec<u8>, GatewayError>>;
}
