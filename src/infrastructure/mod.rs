// SPDX-License-Identifier: MPL-2.0
//! Infrastructure layer adapters.
//!
//! This module contains concrete implementations of the port traits defined in
//! `application::port`. These adapters wrap external services (Firebase,
//! Supabase, Mapbox) over HTTP, plus an in-process backend.
//!
//! # Available Adapters
//!
//! - [`firebase`]: Firestore, Cloud Storage and Identity Toolkit
//! - [`supabase`]: PostgREST, Storage and GoTrue
//! - [`memory`]: In-process store and accounts
//! - [`mapbox`]: Place search (implements [`Geocoder`]) and raster tiles
//! - [`photos`]: Photo bytes over HTTPS (implements [`PhotoSource`])
//! - [`backend`]: Startup selection of one backend
//!
//! # Design Notes
//!
//! - Adapters implement traits from `application::port`
//! - All HTTP adapters share one client built by [`http::client`]
//!
//! [`Geocoder`]: crate::application::port::Geocoder
//! [`PhotoSource`]: crate::application::port::PhotoSource

pub mod backend;
pub mod firebase;
pub mod http;
pub mod mapbox;
pub mod memory;
pub mod photos;
pub mod supabase;

pub use backend::{connect, Backend};
