// SPDX-License-Identifier: MPL-2.0
//! Top-level messages and runtime flags for the application.

use crate::application::port::{AuthError, GatewayError};
use super::session::SessionEpoch;
use crate::domain::{Pin, Session};
use crate::infrastructure::mapbox::TileId;
use crate::ui::notifications;
use crate::ui::{add_pin, gallery, header, map, search, sign_in, timeline, token_input};
use iced::widget::image::Handle;
use std::path::PathBuf;
use std::time::Instant;

/// Top-level messages consumed by `App::update`. The variants forward
/// lower-level component messages while keeping a single update entrypoint.
#[derive(Debug, Clone)]
pub enum Message {
    Header(header::Message),
    Map(map::Message),
    Search(search::Message),
    Timeline(timeline::Message),
    AddPin(add_pin::Message),
    Gallery(gallery::Message),
    SignIn(sign_in::Message),
    TokenInput(token_input::Message),
    Notification(notifications::NotificationMessage),
    /// Result of a sign-in or sign-up attempt.
    SignedIn(Result<Session, AuthError>),
    /// The auth provider acknowledged (or failed) a sign-out.
    SignedOut(Result<(), AuthError>),
    /// Pins fetched under the sign-in `epoch`. Ignored once that session
    /// has ended.
    PinsLoaded {
        epoch: SessionEpoch,
        pins: Vec<Pin>,
    },
    PinCreated {
        epoch: SessionEpoch,
        result: Result<Pin, GatewayError>,
    },
    /// Files chosen in the photo dialog.
    PhotosPicked(Vec<PathBuf>),
    /// A file was dropped on the window.
    FileDropped(PathBuf),
    /// Picked or dropped files after their sizes were read.
    PhotosInspected(Vec<add_pin::PickedFile>),
    /// A map tile finished downloading; `None` on failure.
    TileLoaded {
        tile: TileId,
        image: Option<Handle>,
    },
    /// A remote photo finished downloading; `None` on failure.
    PhotoLoaded {
        url: String,
        image: Option<Handle>,
    },
    Tick(Instant), // Periodic tick for notification auto-dismiss
}

/// Runtime flags passed in from the CLI to tweak startup behavior.
#[derive(Debug, Default)]
pub struct Flags {
    /// Optional locale override in BCP-47 form (e.g. `fr`, `en-US`).
    pub lang: Option<String>,
    /// Optional backend override (`firebase`, `supabase` or `memory`).
    pub backend: Option<String>,
}
