// SPDX-License-Identifier: MPL-2.0
//! Domain types for travel pins.
//!
//! Everything in this module is plain data with validating constructors.
//! It depends on no UI or network crate.

pub mod error;
pub mod pin;
pub mod user;

pub use error::ValidationError;
pub use pin::{
    Coordinate, NewPin, Photo, PhotoFile, PhotoId, PhotoMetadata, Pin, PinId, Title,
};
pub use user::{Session, User, UserId};
