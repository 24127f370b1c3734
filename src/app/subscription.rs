// SPDX-License-Identifier: MPL-2.0
//! Event subscriptions for the application.
//!
//! Pointer and wheel input is handled by the map canvas itself; only
//! window-level events are routed from here.

use super::Message;
use crate::config::NOTIFICATION_TICK_MS;
use iced::{event, time, Subscription};
use std::time::Duration;

/// Routes dropped files while the add-pin form is open.
pub fn create_event_subscription(accepts_files: bool) -> Subscription<Message> {
    if !accepts_files {
        return Subscription::none();
    }
    event::listen_with(|event, _status, _window_id| {
        if let event::Event::Window(iced::window::Event::FileDropped(path)) = event {
            Some(Message::FileDropped(path))
        } else {
            None
        }
    })
}

/// Creates a periodic tick subscription for notification auto-dismiss.
pub fn create_tick_subscription(has_notifications: bool) -> Subscription<Message> {
    if has_notifications {
        time::every(Duration::from_millis(NOTIFICATION_TICK_MS)).map(Message::Tick)
    } else {
        Subscription::none()
    }
}
