// SPDX-License-Identifier: MPL-2.0
//! `wayfarer` is a travel journal built with the Iced GUI framework.
//!
//! Users sign in, drop pins on a map, attach photos and notes, and browse
//! their trips on the map or on a timeline. Pins live in a remote backend
//! (Firebase, Supabase, or an in-process store) behind one gateway.

#![doc(html_root_url = "https://docs.rs/wayfarer/0.1.0")]

pub mod app;
pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod i18n;
pub mod infrastructure;
pub mod ui;

#[cfg(test)]
pub mod test_utils;
