// SPDX-License-Identifier: MPL-2.0
//! Toast notifications for user feedback.
//!
//! Notifications appear temporarily to report the outcome of remote
//! operations (pin saved, sign-in failed, session expired) without
//! blocking interaction with the map.
//!
//! # Components
//!
//! - [`notification`] - Core `Notification` struct with severity levels
//! - [`manager`] - `Manager` for queuing and lifecycle management
//! - [`toast`] - Toast widget component for rendering notifications
//!
//! # Timing
//!
//! Success and info toasts disappear after 3 s, warnings after 5 s, errors
//! stay until dismissed. At most 3 toasts are visible; the rest are queued.

mod manager;
mod notification;
mod toast;

pub use manager::{Manager, Message as NotificationMessage};
pub use notification::{Notification, NotificationId, Severity};
pub use toast::Toast;
