// SPDX-License-Identifier: MPL-2.0
//! Application root state and orchestration between the map, the timeline
//! and the dialogs.
//!
//! The `App` struct wires together the backend ports, localization and the
//! UI components, and translates component events into async tasks. The
//! concrete backend is chosen once here at startup; nothing downstream
//! knows which one is in use.

mod message;
pub mod paths;
mod screen;
mod session;
mod subscription;
mod update;
mod view;

pub use message::{Flags, Message};
pub use screen::{Modal, Screen};
pub use session::{SessionContext, SessionEpoch};

use crate::application::port::Geocoder;
use crate::config::{self, Config, MapConfig};
use crate::i18n::fluent::I18n;
use crate::infrastructure::mapbox::{MapStyle, MapboxGeocoder, TileId, TileSource};
use crate::infrastructure::{self, http, Backend};
use crate::ui::header::ViewMode;
use crate::ui::image_cache::ImageCache;
use crate::ui::notifications::{self, Notification};
use crate::ui::theming::ThemeMode;
use crate::ui::{map, search, token_input};
use iced::{window, Element, Subscription, Task, Theme};
use reqwest::Client;
use std::fmt;
use std::sync::Arc;

/// Map tiles and place search, available once an access token is known.
#[derive(Clone)]
pub struct MapServices {
    tiles: Option<TileSource>,
    geocoder: Arc<dyn Geocoder>,
}

impl MapServices {
    /// Builds the Mapbox adapters for `token`.
    ///
    /// An unparseable style URL falls back to the default style; tiles are
    /// disabled only if that fails too.
    fn new(client: &Client, config: &MapConfig, token: &str) -> Self {
        let style = MapStyle::parse(&config.style_url)
            .or_else(|err| {
                tracing::warn!(url = %config.style_url, error = %err, "invalid map style, using default");
                MapStyle::parse(config::DEFAULT_STYLE_URL)
            })
            .ok();

        Self {
            tiles: style.map(|style| TileSource::new(client.clone(), style, token)),
            geocoder: Arc::new(MapboxGeocoder::new(client.clone(), token)),
        }
    }
}

/// Root Iced application state.
pub struct App {
    pub i18n: I18n,
    config: Config,
    screen: Screen,
    mode: ViewMode,
    modal: Modal,
    theme_mode: ThemeMode,
    client: Client,
    backend: Backend,
    map_services: Option<MapServices>,
    /// Present while a user is signed in.
    session: Option<SessionContext>,
    /// Epoch handed to the most recent sign-in.
    last_epoch: SessionEpoch,
    map: map::State,
    search: search::State,
    token_input: token_input::State,
    tiles: ImageCache<TileId>,
    photos: ImageCache<String>,
    /// Toast notification manager for user feedback.
    notifications: notifications::Manager,
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("screen", &self.screen)
            .field("mode", &self.mode)
            .field("backend", &self.backend.kind)
            .field("signed_in", &self.session.is_some())
            .finish()
    }
}

pub const WINDOW_DEFAULT_HEIGHT: u32 = 720;
pub const WINDOW_DEFAULT_WIDTH: u32 = 1100;
pub const MIN_WINDOW_HEIGHT: u32 = 480;
pub const MIN_WINDOW_WIDTH: u32 = 640;

/// Builds the window settings
pub fn window_settings() -> window::Settings {
    window::Settings {
        size: iced::Size::new(WINDOW_DEFAULT_WIDTH as f32, WINDOW_DEFAULT_HEIGHT as f32),
        min_size: Some(iced::Size::new(
            MIN_WINDOW_WIDTH as f32,
            MIN_WINDOW_HEIGHT as f32,
        )),
        ..window::Settings::default()
    }
}

/// Entry point used by `main.rs` to launch the Iced application loop.
pub fn run(flags: Flags) -> iced::Result {
    use std::cell::RefCell;

    // iced 0.14 requires an Fn boot closure; the flags are consumed once.
    let boot_state = RefCell::new(Some(flags));
    let boot = move || {
        let flags = boot_state.borrow_mut().take().unwrap_or_default();
        App::new(flags)
    };

    iced::application(boot, App::update, App::view)
        .title(App::title)
        .theme(App::theme)
        .window(window_settings())
        .subscription(App::subscription)
        .run()
}

impl App {
    /// Loads configuration, connects the backend and prepares the map.
    fn new(flags: Flags) -> (Self, Task<Message>) {
        let (mut config, config_warning) = config::load();
        let backend_warning = config.apply_overrides(None, flags.backend);
        let i18n = I18n::new(flags.lang, &config);

        let client = http::client().unwrap_or_else(|err| {
            tracing::error!(error = %err, "failed to build HTTP client, using defaults");
            Client::new()
        });

        let mut warnings: Vec<Notification> = [config_warning, backend_warning]
            .into_iter()
            .flatten()
            .map(Notification::warning)
            .collect();

        let backend = infrastructure::connect(&config.backend, &client).unwrap_or_else(|err| {
            tracing::error!(error = %err, "backend unavailable, falling back to memory");
            warnings.push(
                Notification::error("notification-backend-error")
                    .with_arg("error", err.to_string()),
            );
            Backend::memory()
        });

        let mut app = Self::with_backend(config, i18n, client, backend);
        for notification in warnings {
            app.notifications.push(notification);
        }

        tracing::info!(
            backend = %app.backend.kind,
            locale = %app.i18n.current_locale(),
            "wayfarer started"
        );
        (app, Task::none())
    }

    /// Assembles the application around an already connected backend.
    ///
    /// Nobody is signed in. The token screen is shown when `config` has no
    /// map access token.
    pub fn with_backend(config: Config, i18n: I18n, client: Client, backend: Backend) -> Self {
        let map_services = config
            .map
            .token()
            .map(|token| MapServices::new(&client, &config.map, token));
        let screen = if map_services.is_some() {
            Screen::Journal
        } else {
            Screen::TokenInput
        };

        App {
            i18n,
            screen,
            mode: ViewMode::Map,
            modal: Modal::None,
            theme_mode: config.general.theme_mode,
            client,
            backend,
            map_services,
            session: None,
            last_epoch: SessionEpoch::default(),
            map: map::State::new(&config.map),
            search: search::State::new(&config.search),
            token_input: token_input::State::default(),
            tiles: ImageCache::new(config::TILE_CACHE_CAPACITY),
            photos: ImageCache::new(config::PHOTO_CACHE_CAPACITY),
            notifications: notifications::Manager::new(),
            config,
        }
    }

    fn title(&self) -> String {
        self.i18n.tr("window-title")
    }

    fn theme(&self) -> Theme {
        self.theme_mode.iced_theme()
    }

    fn subscription(&self) -> Subscription<Message> {
        Subscription::batch([
            subscription::create_event_subscription(matches!(self.modal, Modal::AddPin(_))),
            subscription::create_tick_subscription(self.notifications.has_notifications()),
        ])
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        self.handle_message(message)
    }

    fn view(&self) -> Element<'_, Message> {
        view::view(self)
    }

    /// The signed-in session context, if any.
    #[must_use]
    pub fn session(&self) -> Option<&SessionContext> {
        self.session.as_ref()
    }

    #[must_use]
    pub fn modal(&self) -> &Modal {
        &self.modal
    }

    #[must_use]
    pub fn screen(&self) -> Screen {
        self.screen
    }

    #[must_use]
    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    #[must_use]
    pub fn notifications(&self) -> &notifications::Manager {
        &self.notifications
    }
}
