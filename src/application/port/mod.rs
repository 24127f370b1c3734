// SPDX-License-Identifier: MPL-2.0
//! Port definitions (traits) for dependency inversion.
//!
//! This module defines abstract interfaces that infrastructure adapters implement.
//! These traits use only domain types, ensuring the application layer remains
//! independent of concrete backends.
//!
//! # Available Ports
//!
//! - [`gateway`]: Pin listing and creation, the capability the UI uses
//! - [`store`]: Vendor-specific pin records and object storage
//! - [`auth`]: Sign-in, sign-up and sign-out
//! - [`geocoder`]: Free-text place search
//! - [`photo`]: Retrieval of stored photo bytes for display
//!
//! # Design Notes
//!
//! - All traits use domain types only (no Iced handles, no HTTP types)
//! - Traits are `Send + Sync` so they can live behind `Arc<dyn _>`
//! - Async methods return `BoxFuture` so the traits stay object safe; callers
//!   wrap them in Iced's `Task::perform`

pub mod auth;
pub mod gateway;
pub mod geocoder;
pub mod photo;
pub mod store;

pub use auth::{AuthError, AuthProvider, Credentials};
pub use gateway::{GatewayError, PinGateway};
pub use geocoder::{GeocodeError, Geocoder, Place};
pub use photo::PhotoSource;
pub use store::{ObjectUpload, PinRecord, RemoteStore, StoredObject};
