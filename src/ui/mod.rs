// SPDX-License-Identifier: MPL-2.0
//! User interface components and state management.
//!
//! This module organizes all UI-related code following a component-based architecture
//! with the Elm-style "state down, messages up" pattern. Each component exposes a
//! `ViewContext`, a `Message` enum, an `Event` (or `Effect`) returned from `update`,
//! and a `view` function.
//!
//! # Screens and Panels
//!
//! - [`map`] - Slippy map canvas with markers, pan and zoom
//! - [`timeline`] - Pins ordered by visit date
//! - [`gallery`] - Photo viewer for one pin
//! - [`add_pin`] - New pin form
//! - [`sign_in`] - Email and password form
//! - [`token_input`] - Map access token prompt
//! - [`search`] - Debounced place search
//! - [`header`] - Title bar with view toggle and account controls
//!
//! # Shared Infrastructure
//!
//! - [`state`] - Reusable state (debouncing, gallery cursor)
//! - [`image_cache`] - Bounded cache for tiles and photos
//! - [`styles`] - Centralized styling (buttons, containers, overlays)
//! - [`design_tokens`] - Design system constants (colors, spacing, sizing)
//! - [`theme`] - Theme colors and styling helpers
//! - [`theming`] - Light/Dark/System theme mode management
//! - [`notifications`] - Toast notification system for user feedback

pub mod add_pin;
pub mod design_tokens;
pub mod gallery;
pub mod header;
pub mod image_cache;
pub mod map;
pub mod notifications;
pub mod search;
pub mod sign_in;
pub mod state;
pub mod styles;
pub mod theme;
pub mod theming;
pub mod timeline;
pub mod token_input;
