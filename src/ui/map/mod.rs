// SPDX-License-Identifier: MPL-2.0
//! Interactive map: raster tiles, one marker per pin, click to pick a
//! location, drag to pan, wheel or buttons to zoom.

pub mod canvas;
pub mod projection;

use crate::config::MapConfig;
use crate::domain::{Coordinate, Pin, PinId};
use crate::i18n::fluent::I18n;
use crate::infrastructure::mapbox::TileId;
use crate::ui::design_tokens::{radius, sizing, spacing, typography};
use crate::ui::image_cache::ImageCache;
use crate::ui::styles;
use iced::widget::{button, column, container, Canvas, Container, Stack, Text};
use iced::{alignment, Element, Length};
use projection::Viewport;

pub use canvas::MapCanvas;

/// Contextual data needed to render the map.
pub struct ViewContext<'a> {
    pub i18n: &'a I18n,
    pub state: &'a State,
    pub tiles: &'a ImageCache<TileId>,
    pub pins: &'a [Pin],
    /// Location of the pin being created, drawn with its own marker.
    pub pending: Option<Coordinate>,
    pub signed_in: bool,
    pub is_dark: bool,
}

#[derive(Debug, Clone)]
pub enum Message {
    Resized { width: f32, height: f32 },
    Panned { dx: f32, dy: f32 },
    Zoomed { delta: i32, anchor: (f32, f32) },
    ZoomIn,
    ZoomOut,
    Clicked(Coordinate),
    MarkerClicked(PinId),
}

/// Events propagated to the parent application.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    None,
    /// The visible area changed; new tiles may be needed.
    ViewportChanged,
    LocationPicked(Coordinate),
    PinSelected(PinId),
}

#[derive(Debug, Clone)]
pub struct State {
    viewport: Viewport,
}

impl State {
    #[must_use]
    pub fn new(config: &MapConfig) -> Self {
        Self {
            viewport: Viewport::new(config.initial_center(), config.initial_zoom),
        }
    }

    #[must_use]
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Re-centers the map, keeping the zoom.
    pub fn center_on(&mut self, coordinate: Coordinate) -> Event {
        self.viewport.center_on(coordinate);
        Event::ViewportChanged
    }

    pub fn update(&mut self, message: Message) -> Event {
        match message {
            Message::Resized { width, height } => {
                if self.viewport.set_size(width, height) {
                    Event::ViewportChanged
                } else {
                    Event::None
                }
            }
            Message::Panned { dx, dy } => {
                self.viewport.pan(dx, dy);
                Event::ViewportChanged
            }
            Message::Zoomed { delta, anchor } => self.zoom(delta, Some(anchor)),
            Message::ZoomIn => self.zoom(1, None),
            Message::ZoomOut => self.zoom(-1, None),
            Message::Clicked(coordinate) => Event::LocationPicked(coordinate),
            Message::MarkerClicked(id) => Event::PinSelected(id),
        }
    }

    fn zoom(&mut self, delta: i32, anchor: Option<(f32, f32)>) -> Event {
        if self.viewport.zoom_by(delta, anchor) {
            Event::ViewportChanged
        } else {
            Event::None
        }
    }
}

/// Render the map with its hint and zoom controls.
pub fn view<'a>(ctx: ViewContext<'a>) -> Element<'a, Message> {
    let map = Canvas::new(MapCanvas {
        viewport: &ctx.state.viewport,
        tiles: ctx.tiles,
        pins: ctx.pins,
        pending: ctx.pending,
        is_dark: ctx.is_dark,
    })
    .width(Length::Fill)
    .height(Length::Fill);

    let hint_key = if ctx.signed_in {
        "map-hint"
    } else {
        "map-hint-signed-out"
    };
    let hint = Container::new(
        Container::new(Text::new(ctx.i18n.tr(hint_key)).size(typography::BODY_SM))
            .padding([spacing::XXS, spacing::SM])
            .style(styles::overlay::indicator(radius::FULL)),
    )
    .width(Length::Fill)
    .align_x(alignment::Horizontal::Center)
    .padding(spacing::SM);

    let zoom_controls = Container::new(
        column![
            zoom_button("+", Message::ZoomIn),
            zoom_button("−", Message::ZoomOut),
        ]
        .spacing(spacing::XXS),
    )
    .width(Length::Fill)
    .height(Length::Fill)
    .align_x(alignment::Horizontal::Right)
    .align_y(alignment::Vertical::Bottom)
    .padding(spacing::MD);

    Stack::new()
        .push(map)
        .push(hint)
        .push(zoom_controls)
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

fn zoom_button<'a>(label: &'a str, message: Message) -> Element<'a, Message> {
    button(
        container(Text::new(label).size(typography::TITLE_SM))
            .center_x(Length::Fill)
            .center_y(Length::Fill),
    )
    .width(Length::Fixed(sizing::MAP_BUTTON))
    .height(Length::Fixed(sizing::MAP_BUTTON))
    .padding(0)
    .on_press(message)
    .style(styles::button_overlay(
        iced::Color::WHITE,
        crate::ui::design_tokens::opacity::OVERLAY_STRONG,
        crate::ui::design_tokens::opacity::OVERLAY_HOVER,
    ))
    .into()
}
