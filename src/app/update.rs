// SPDX-License-Identifier: MPL-2.0
//! Update logic and message handlers for the application.
//!
//! Component events are turned into state changes here, and every remote
//! call leaves through a [`Task`] whose result comes back as a [`Message`].

use super::{App, MapServices, Message, Modal, Screen, SessionContext, SessionEpoch};
use crate::application::port::{AuthError, GatewayError};
use crate::domain::pin::ACCEPTED_PHOTO_EXTENSIONS;
use crate::domain::{Coordinate, Pin, PinId, Session};
use crate::infrastructure::mapbox::TileId;
use crate::ui::header::{self, ViewMode};
use crate::ui::notifications::Notification;
use crate::ui::sign_in::{self, Mode as SignInMode};
use crate::ui::{add_pin, gallery, map, search, timeline, token_input};
use iced::widget::image::Handle;
use iced::Task;
use std::fmt::Display;
use std::path::PathBuf;

/// Turns downloaded bytes into an image handle, logging failures.
fn into_handle<E: Display>(what: &str, key: &str, result: Result<Vec<u8>, E>) -> Option<Handle> {
    match result {
        Ok(bytes) => Some(Handle::from_bytes(bytes)),
        Err(err) => {
            tracing::debug!(key, error = %err, "failed to fetch {what}");
            None
        }
    }
}

/// Opens the native dialog for choosing photos.
async fn pick_photos(filter_name: String) -> Vec<PathBuf> {
    rfd::AsyncFileDialog::new()
        .add_filter(filter_name, &ACCEPTED_PHOTO_EXTENSIONS)
        .pick_files()
        .await
        .map(|files| files.iter().map(|file| file.path().to_path_buf()).collect())
        .unwrap_or_default()
}

impl App {
    pub(super) fn handle_message(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Header(message) => self.handle_header(message),
            Message::Map(message) => {
                let event = self.map.update(message);
                self.handle_map_event(event)
            }
            Message::Search(message) => {
                let effect = self.search.update(message);
                self.handle_search_effect(effect)
            }
            Message::Timeline(timeline::Message::Open(id)) => self.open_gallery(&id),
            Message::AddPin(message) => self.handle_add_pin(message),
            Message::Gallery(message) => {
                if let Modal::Gallery(state) = &mut self.modal {
                    if state.update(message) == gallery::Event::Close {
                        self.modal = Modal::None;
                    }
                }
                Task::none()
            }
            Message::SignIn(message) => self.handle_sign_in(message),
            Message::TokenInput(message) => match self.token_input.update(message) {
                token_input::Event::Accepted(token) => self.accept_token(&token),
                token_input::Event::None => Task::none(),
            },
            Message::Notification(message) => {
                self.notifications.handle_message(&message);
                Task::none()
            }
            Message::SignedIn(result) => self.handle_signed_in(result),
            Message::SignedOut(result) => {
                if let Err(err) = result {
                    tracing::warn!(error = %err, "sign-out was not acknowledged");
                }
                Task::none()
            }
            Message::PinsLoaded { epoch, pins } => match self.session_at(epoch) {
                Some(context) => {
                    tracing::debug!(count = pins.len(), "pins loaded");
                    context.replace_pins(pins);
                    self.prefetch_timeline_covers()
                }
                None => {
                    tracing::debug!(%epoch, "discarding pins of a closed session");
                    Task::none()
                }
            },
            Message::PinCreated { epoch, result } => self.handle_pin_created(epoch, result),
            Message::PhotosPicked(paths) => self.inspect_photos(paths),
            Message::FileDropped(path) => self.inspect_photos(vec![path]),
            Message::PhotosInspected(files) => {
                self.attach_photos(files);
                Task::none()
            }
            Message::TileLoaded { tile, image } => {
                self.tiles.finish_fetch(tile, image);
                Task::none()
            }
            Message::PhotoLoaded { url, image } => {
                self.photos.finish_fetch(url, image);
                Task::none()
            }
            Message::Tick(now) => {
                self.notifications.tick(now);
                Task::none()
            }
        }
    }

    fn handle_header(&mut self, message: header::Message) -> Task<Message> {
        match header::update(message, &mut self.mode) {
            header::Event::None => Task::none(),
            header::Event::ModeChanged(ViewMode::Timeline) => self.prefetch_timeline_covers(),
            header::Event::ModeChanged(ViewMode::Map) => self.request_visible_tiles(),
            header::Event::SignInRequested => {
                self.modal = Modal::SignIn(sign_in::State::default());
                Task::none()
            }
            header::Event::SignOutRequested => self.sign_out(),
        }
    }

    fn handle_map_event(&mut self, event: map::Event) -> Task<Message> {
        match event {
            map::Event::None => Task::none(),
            map::Event::ViewportChanged => self.request_visible_tiles(),
            map::Event::LocationPicked(coordinate) => {
                self.pick_location(coordinate);
                Task::none()
            }
            map::Event::PinSelected(id) => self.open_gallery(&id),
        }
    }

    /// Signed-out users are asked to sign in instead of getting the form.
    fn pick_location(&mut self, coordinate: Coordinate) {
        if self.modal.is_open() {
            return;
        }
        self.modal = if self.session.is_some() {
            tracing::debug!(%coordinate, "new pin location picked");
            Modal::AddPin(add_pin::State::new(
                coordinate,
                chrono::Local::now().date_naive(),
            ))
        } else {
            Modal::SignIn(sign_in::State::default())
        };
    }

    fn open_gallery(&mut self, id: &PinId) -> Task<Message> {
        let Some(pin) = self.session.as_ref().and_then(|context| context.pin(id)) else {
            tracing::warn!(pin = %id.as_str(), "selected pin is not in the current list");
            return Task::none();
        };
        let state = gallery::State::new(pin.clone());
        let urls: Vec<String> = state.photo_urls().map(str::to_string).collect();
        self.modal = Modal::Gallery(state);
        self.request_photos(urls)
    }

    fn handle_search_effect(&mut self, effect: search::Effect) -> Task<Message> {
        match effect {
            search::Effect::None => Task::none(),
            search::Effect::Wait { ticket, delay } => Task::perform(
                tokio::time::sleep(delay),
                move |()| Message::Search(search::Message::DebounceElapsed(ticket)),
            ),
            search::Effect::Lookup {
                ticket,
                query,
                limit,
            } => {
                let Some(services) = &self.map_services else {
                    return Task::none();
                };
                let geocoder = services.geocoder.clone();
                Task::perform(
                    async move { geocoder.search(&query, limit).await },
                    move |result| Message::Search(search::Message::ResultsLoaded { ticket, result }),
                )
            }
            search::Effect::CenterOn(place) => {
                tracing::debug!(place = %place.name, "centering on search result");
                self.mode = ViewMode::Map;
                let event = self.map.center_on(place.center);
                self.handle_map_event(event)
            }
        }
    }

    fn handle_add_pin(&mut self, message: add_pin::Message) -> Task<Message> {
        let Modal::AddPin(form) = &mut self.modal else {
            return Task::none();
        };
        match form.update(message) {
            add_pin::Event::None => Task::none(),
            add_pin::Event::Cancel => {
                self.modal = Modal::None;
                Task::none()
            }
            add_pin::Event::BrowsePhotos => Task::perform(
                pick_photos(self.i18n.tr("add-pin-photo-filter")),
                Message::PhotosPicked,
            ),
            add_pin::Event::Submit(draft) => {
                let Some(context) = &self.session else {
                    self.modal = Modal::SignIn(sign_in::State::default());
                    return Task::none();
                };
                let session = context.session().clone();
                let epoch = context.epoch();
                let gateway = self.backend.gateway.clone();
                tracing::info!(title = %draft.title.as_str(), photos = draft.photos.len(), "saving pin");
                Task::perform(
                    async move { gateway.create(&session, draft).await },
                    move |result| Message::PinCreated { epoch, result },
                )
            }
        }
    }

    fn accepts_photos(&self) -> bool {
        matches!(&self.modal, Modal::AddPin(form) if !form.is_saving())
    }

    /// Reads file sizes in the background before the form sees the files.
    fn inspect_photos(&self, paths: Vec<PathBuf>) -> Task<Message> {
        if paths.is_empty() || !self.accepts_photos() {
            tracing::debug!(count = paths.len(), "ignoring files outside the add-pin form");
            return Task::none();
        }
        Task::perform(add_pin::inspect(paths), Message::PhotosInspected)
    }

    fn attach_photos(&mut self, files: Vec<add_pin::PickedFile>) {
        match &mut self.modal {
            Modal::AddPin(form) if !form.is_saving() => form.add_photos(files),
            _ => tracing::debug!(count = files.len(), "form closed before photos were read"),
        }
    }

    /// The signed-in context, if it is still the one started at `epoch`.
    fn session_at(&mut self, epoch: SessionEpoch) -> Option<&mut SessionContext> {
        self.session.as_mut().filter(|context| context.epoch() == epoch)
    }

    fn handle_pin_created(
        &mut self,
        epoch: SessionEpoch,
        result: Result<Pin, GatewayError>,
    ) -> Task<Message> {
        // Borrow only the session field; notifications are pushed below.
        let Some(context) = self.session.as_mut().filter(|c| c.epoch() == epoch) else {
            tracing::warn!(%epoch, "pin saved for a session that is gone");
            return Task::none();
        };

        match result {
            Ok(pin) => {
                tracing::info!(pin = %pin.id.as_str(), "pin saved");
                self.notifications.push(
                    Notification::success("notification-pin-saved")
                        .with_arg("title", pin.title.as_str()),
                );
                if !context.prepend(pin) {
                    tracing::debug!("created pin was already listed");
                }
                if matches!(self.modal, Modal::AddPin(_)) {
                    self.modal = Modal::None;
                }
                if self.mode == ViewMode::Timeline {
                    self.prefetch_timeline_covers()
                } else {
                    Task::none()
                }
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to save pin");
                if let Modal::AddPin(form) = &mut self.modal {
                    form.finish_saving();
                }
                self.notifications.push(Notification::error(err.i18n_key()));
                Task::none()
            }
        }
    }

    fn handle_sign_in(&mut self, message: sign_in::Message) -> Task<Message> {
        let Modal::SignIn(form) = &mut self.modal else {
            return Task::none();
        };
        match form.update(message) {
            sign_in::Event::None => Task::none(),
            sign_in::Event::Cancel => {
                self.modal = Modal::None;
                Task::none()
            }
            sign_in::Event::Submit { mode, credentials } => {
                let auth = self.backend.auth.clone();
                Task::perform(
                    async move {
                        match mode {
                            SignInMode::SignIn => auth.sign_in(&credentials).await,
                            SignInMode::SignUp => auth.sign_up(&credentials).await,
                        }
                    },
                    Message::SignedIn,
                )
            }
        }
    }

    fn handle_signed_in(&mut self, result: Result<Session, AuthError>) -> Task<Message> {
        match result {
            Ok(session) => {
                tracing::info!(user = %session.user_id().as_str(), "signed in");
                self.notifications.push(
                    Notification::success("notification-signed-in")
                        .with_arg("email", session.user.email.as_str()),
                );
                if matches!(self.modal, Modal::SignIn(_)) {
                    self.modal = Modal::None;
                }
                self.last_epoch = self.last_epoch.next();
                let context = SessionContext::new(session, self.last_epoch);
                let task = self.load_pins(&context);
                self.session = Some(context);
                task
            }
            Err(err) => {
                tracing::warn!(error = %err, "authentication failed");
                if let Modal::SignIn(form) = &mut self.modal {
                    form.fail(err.i18n_key());
                }
                Task::none()
            }
        }
    }

    /// Fetches the pins of `context`, replacing the list when they arrive.
    fn load_pins(&self, context: &SessionContext) -> Task<Message> {
        let session = context.session().clone();
        let epoch = context.epoch();
        let gateway = self.backend.gateway.clone();
        Task::perform(
            async move { gateway.list(Some(&session)).await },
            move |pins| Message::PinsLoaded { epoch, pins },
        )
    }

    /// Drops everything tied to the user and tells the provider.
    fn sign_out(&mut self) -> Task<Message> {
        let Some(context) = self.session.take() else {
            return Task::none();
        };
        tracing::info!(user = %context.user_id().as_str(), "signing out");

        self.modal = Modal::None;
        self.mode = ViewMode::Map;
        self.photos.clear();
        self.notifications.push(Notification::info("notification-signed-out"));

        let session = context.session().clone();
        let auth = self.backend.auth.clone();
        Task::perform(
            async move { auth.sign_out(&session).await },
            Message::SignedOut,
        )
    }

    /// Builds the map services for a token typed on the token screen.
    ///
    /// The token lives in memory only and is not written to the config file.
    fn accept_token(&mut self, token: &str) -> Task<Message> {
        tracing::info!("map access token provided for this session");
        self.map_services = Some(MapServices::new(&self.client, &self.config.map, token));
        self.screen = Screen::Journal;
        self.tiles.clear();
        self.request_visible_tiles()
    }

    /// Starts downloads for visible tiles that are not cached or pending.
    fn request_visible_tiles(&mut self) -> Task<Message> {
        let Some(source) = self.map_services.as_ref().and_then(|s| s.tiles.as_ref()) else {
            return Task::none();
        };

        let tasks: Vec<Task<Message>> = self
            .map
            .viewport()
            .visible_tiles()
            .into_iter()
            .map(|placed| placed.id)
            .filter(|tile| self.tiles.begin_fetch(tile))
            .map(|tile: TileId| {
                let source = source.clone();
                Task::perform(async move { source.fetch(tile).await }, move |result| {
                    Message::TileLoaded {
                        tile,
                        image: into_handle("tile", &format!("{tile:?}"), result),
                    }
                })
            })
            .collect();

        Task::batch(tasks)
    }

    fn request_photos(&mut self, urls: Vec<String>) -> Task<Message> {
        let tasks: Vec<Task<Message>> = urls
            .into_iter()
            .filter(|url| self.photos.begin_fetch(url))
            .map(|url| {
                let photos = self.backend.photos.clone();
                let key = url.clone();
                Task::perform(async move { photos.fetch(&key).await }, move |result| {
                    Message::PhotoLoaded {
                        image: into_handle("photo", &url, result),
                        url,
                    }
                })
            })
            .collect();

        Task::batch(tasks)
    }

    fn prefetch_timeline_covers(&mut self) -> Task<Message> {
        if self.mode != ViewMode::Timeline {
            return Task::none();
        }
        let urls = self
            .session
            .as_ref()
            .map(|context| timeline::cover_urls(context.pins()))
            .unwrap_or_default();
        self.request_photos(urls)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::domain::{Title, UserId};
    use crate::i18n::fluent::I18n;
    use crate::infrastructure::Backend;
    use crate::test_utils::session_for;
    use chrono::NaiveDate;
    use reqwest::Client;

    fn app() -> App {
        let config = Config::default();
        let i18n = I18n::new(Some("en-US".into()), &config);
        App::with_backend(config, i18n, Client::new(), Backend::memory())
    }

    fn signed_in_app() -> App {
        let mut app = app();
        let _ = app.handle_message(Message::SignedIn(Ok(session_for("ana"))));
        app
    }

    fn pin(id: &str) -> Pin {
        Pin {
            id: PinId::new(id),
            coordinate: Coordinate::new(1.0, 2.0).unwrap(),
            title: Title::parse(id).unwrap(),
            description: None,
            visit_date: NaiveDate::from_ymd_opt(2024, 2, 3).unwrap(),
            photos: Vec::new(),
            user_id: UserId::new("ana"),
            created_at: chrono::Utc::now(),
        }
    }

    fn epoch(app: &App) -> SessionEpoch {
        app.session().unwrap().epoch()
    }

    fn pin_ids(app: &App) -> Vec<&str> {
        app.session()
            .unwrap()
            .pins()
            .iter()
            .map(|p| p.id.as_str())
            .collect()
    }

    fn click(app: &mut App) {
        let _ = app.handle_message(Message::Map(map::Message::Clicked(
            Coordinate::new(45.0, 7.0).unwrap(),
        )));
    }

    #[test]
    fn without_token_the_token_screen_is_shown() {
        let app = app();
        assert_eq!(app.screen(), Screen::TokenInput);
    }

    #[test]
    fn accepted_token_opens_the_journal() {
        let mut app = app();
        let _ = app.handle_message(Message::TokenInput(token_input::Message::TokenChanged(
            " pk.test ".into(),
        )));
        let _ = app.handle_message(Message::TokenInput(token_input::Message::Submit));
        assert_eq!(app.screen(), Screen::Journal);
        assert!(app.map_services.is_some());
    }

    #[test]
    fn signed_out_map_click_opens_sign_in() {
        let mut app = app();
        click(&mut app);
        assert!(matches!(app.modal(), Modal::SignIn(_)));
    }

    #[test]
    fn signed_in_map_click_opens_form_at_location() {
        let mut app = signed_in_app();
        click(&mut app);
        match app.modal() {
            Modal::AddPin(form) => {
                assert_eq!(form.coordinate(), Coordinate::new(45.0, 7.0).unwrap());
            }
            other => panic!("expected add-pin form, got {other:?}"),
        }
    }

    #[test]
    fn sign_in_starts_with_loading_context() {
        let app = signed_in_app();
        let context = app.session().unwrap();
        assert!(context.is_loading());
        assert_eq!(context.email(), "ana@example.com");
    }

    #[test]
    fn failed_sign_in_shows_error_on_form() {
        let mut app = app();
        click(&mut app);
        let _ = app.handle_message(Message::SignedIn(Err(AuthError::InvalidCredentials)));
        match app.modal() {
            Modal::SignIn(form) => assert_eq!(form.error(), Some("sign-in-error-credentials")),
            other => panic!("expected sign-in form, got {other:?}"),
        }
        assert!(app.session().is_none());
    }

    #[test]
    fn pins_for_previous_session_are_discarded() {
        let mut app = signed_in_app();
        let stale = epoch(&app);
        let _ = app.handle_message(Message::Header(header::Message::SignOut));
        let _ = app.handle_message(Message::SignedIn(Ok(session_for("bob"))));

        let _ = app.handle_message(Message::PinsLoaded {
            epoch: stale,
            pins: vec![pin("x")],
        });
        assert!(app.session().unwrap().pins().is_empty());
        assert!(app.session().unwrap().is_loading());
    }

    #[test]
    fn same_user_signing_back_in_ignores_old_results() {
        let mut app = signed_in_app();
        let stale = epoch(&app);
        let _ = app.handle_message(Message::Header(header::Message::SignOut));
        let _ = app.handle_message(Message::SignedIn(Ok(session_for("ana"))));
        let current = epoch(&app);
        assert_ne!(stale, current);

        let _ = app.handle_message(Message::PinsLoaded {
            epoch: current,
            pins: vec![pin("p1")],
        });
        let _ = app.handle_message(Message::PinCreated {
            epoch: stale,
            result: Ok(pin("p1")),
        });
        let _ = app.handle_message(Message::PinsLoaded {
            epoch: stale,
            pins: vec![pin("p0"), pin("p1")],
        });

        assert_eq!(pin_ids(&app), vec!["p1"]);
    }

    #[test]
    fn created_pin_already_fetched_is_not_duplicated() {
        let mut app = signed_in_app();
        let current = epoch(&app);
        let _ = app.handle_message(Message::PinsLoaded {
            epoch: current,
            pins: vec![pin("p1")],
        });
        let _ = app.handle_message(Message::PinCreated {
            epoch: current,
            result: Ok(pin("p1")),
        });

        assert_eq!(pin_ids(&app), vec!["p1"]);
    }

    #[test]
    fn create_success_prepends_and_closes_form() {
        let mut app = signed_in_app();
        let _ = app.handle_message(Message::PinsLoaded {
            epoch: epoch(&app),
            pins: vec![pin("old")],
        });
        click(&mut app);

        let _ = app.handle_message(Message::PinCreated {
            epoch: epoch(&app),
            result: Ok(pin("new")),
        });

        assert_eq!(pin_ids(&app), vec!["new", "old"]);
        assert!(!app.modal().is_open());
        assert!(app.notifications().has_notifications());
    }

    #[test]
    fn create_failure_keeps_form_and_clears_saving() {
        let mut app = signed_in_app();
        click(&mut app);
        let _ = app.handle_message(Message::AddPin(add_pin::Message::TitleChanged(
            "Lake".into(),
        )));
        let _ = app.handle_message(Message::AddPin(add_pin::Message::Submit));
        assert!(matches!(app.modal(), Modal::AddPin(form) if form.is_saving()));

        let _ = app.handle_message(Message::PinCreated {
            epoch: epoch(&app),
            result: Err(GatewayError::Transport("reset".into())),
        });

        match app.modal() {
            Modal::AddPin(form) => assert!(!form.is_saving()),
            other => panic!("expected add-pin form, got {other:?}"),
        }
        assert!(app.session().unwrap().pins().is_empty());
        assert_eq!(
            app.notifications().visible().next().map(|n| n.message_key()),
            Some("notification-save-pin-error")
        );
    }

    #[test]
    fn blank_title_never_reaches_gateway() {
        let mut app = signed_in_app();
        click(&mut app);
        let _ = app.handle_message(Message::AddPin(add_pin::Message::Submit));

        match app.modal() {
            Modal::AddPin(form) => {
                assert!(!form.is_saving());
                assert_eq!(form.error(), Some("add-pin-error-title-required"));
            }
            other => panic!("expected add-pin form, got {other:?}"),
        }
    }

    #[test]
    fn sign_out_tears_down_session() {
        let mut app = signed_in_app();
        let _ = app.handle_message(Message::PinsLoaded {
            epoch: epoch(&app),
            pins: vec![pin("a")],
        });
        let _ = app.handle_message(Message::Header(header::Message::ShowTimeline));
        let _ = app.handle_message(Message::Header(header::Message::SignOut));

        assert!(app.session().is_none());
        assert_eq!(app.mode(), ViewMode::Map);
        assert!(!app.modal().is_open());
    }

    #[test]
    fn marker_click_opens_gallery() {
        let mut app = signed_in_app();
        let _ = app.handle_message(Message::PinsLoaded {
            epoch: epoch(&app),
            pins: vec![pin("a")],
        });
        let _ = app.handle_message(Message::Map(map::Message::MarkerClicked(PinId::new("a"))));
        assert!(matches!(app.modal(), Modal::Gallery(state) if state.pin().id.as_str() == "a"));

        let _ = app.handle_message(Message::Gallery(gallery::Message::Close));
        assert!(!app.modal().is_open());
    }

    #[test]
    fn dropped_files_only_reach_open_form() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sea.png");
        std::fs::write(&path, [0u8; 4]).unwrap();

        let file = add_pin::PickedFile {
            path: path.clone(),
            size: Some(4),
        };

        let mut app = signed_in_app();
        let _ = app.handle_message(Message::FileDropped(path));
        let _ = app.handle_message(Message::PhotosInspected(vec![file.clone()]));
        assert!(!app.modal().is_open());

        click(&mut app);
        let _ = app.handle_message(Message::PhotosInspected(vec![file]));

        match app.modal() {
            Modal::AddPin(form) => {
                assert_eq!(form.photos().len(), 1);
                assert_eq!(form.photos()[0].size, 4);
            }
            other => panic!("expected add-pin form, got {other:?}"),
        }
    }

    #[test]
    fn pins_loaded_after_sign_out_are_ignored() {
        let mut app = signed_in_app();
        let stale = epoch(&app);
        let _ = app.handle_message(Message::Header(header::Message::SignOut));
        let _ = app.handle_message(Message::PinsLoaded {
            epoch: stale,
            pins: vec![pin("a")],
        });
        assert!(app.session().is_none());
    }
}
