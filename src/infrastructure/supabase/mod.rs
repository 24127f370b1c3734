// SPDX-License-Identifier: MPL-2.0
//! Supabase backend: PostgREST pin table, Storage photos and GoTrue
//! authentication.

pub mod auth;
pub mod row;
pub mod store;

pub use auth::SupabaseAuth;
pub use store::SupabaseStore;

use crate::application::port::GatewayError;
use reqwest::Url;

/// Parses the configured project URL (`https://<ref>.supabase.co`).
pub(crate) fn project_url(raw: &str) -> Result<Url, GatewayError> {
    let url = Url::parse(raw.trim())
        .map_err(|err| GatewayError::Decode(format!("invalid Supabase URL `{raw}`: {err}")))?;
    if url.cannot_be_a_base() {
        return Err(GatewayError::Decode(format!("invalid Supabase URL `{raw}`")));
    }
    Ok(url)
}
