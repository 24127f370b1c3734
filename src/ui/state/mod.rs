// SPDX-License-Identifier: MPL-2.0
//! UI state management modules
//!
//! State logic shared by components, kept apart from the widgets so it can
//! be tested without a renderer.

pub mod debounce;
pub mod gallery;

pub use debounce::{Debouncer, Ticket};
pub use gallery::GalleryCursor;
