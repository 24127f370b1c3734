// SPDX-License-Identifier: MPL-2.0
//! View rendering for the application.
//!
//! The journal screen is the header above either the map (with the search
//! box floating over it) or the timeline. Dialogs are stacked on a dimmed
//! backdrop, and toasts sit above everything.

use super::{App, Message, Modal, Screen};
use crate::ui::design_tokens::spacing;
use crate::ui::header::{self, ViewMode};
use crate::ui::notifications::Toast;
use crate::ui::{add_pin, gallery, map, search, sign_in, styles, timeline, token_input};
use iced::widget::{mouse_area, opaque, Column, Container, Stack, Text};
use iced::{alignment, Element, Length};

/// Renders the current screen, the open dialog and the toasts.
pub fn view(app: &App) -> Element<'_, Message> {
    let base = match app.screen {
        Screen::TokenInput => token_input::view(token_input::ViewContext {
            i18n: &app.i18n,
            state: &app.token_input,
        })
        .map(Message::TokenInput),
        Screen::Journal => view_journal(app),
    };

    let mut layers = Stack::new()
        .width(Length::Fill)
        .height(Length::Fill)
        .push(base);

    if let Some(dialog) = view_modal(app) {
        layers = layers.push(dialog);
    }

    layers
        .push(Toast::view_overlay(&app.notifications, &app.i18n).map(Message::Notification))
        .into()
}

fn view_journal(app: &App) -> Element<'_, Message> {
    let pins = app.session.as_ref().map_or(&[][..], |context| context.pins());

    let header = header::view(header::ViewContext {
        i18n: &app.i18n,
        mode: app.mode,
        email: app.session.as_ref().map(|context| context.email()),
        pin_count: pins.len(),
    })
    .map(Message::Header);

    let body = match app.mode {
        ViewMode::Map => view_map(app, pins),
        ViewMode::Timeline => {
            if app.session.as_ref().is_some_and(|context| context.is_loading()) {
                Container::new(Text::new(app.i18n.tr("timeline-loading")))
                    .center_x(Length::Fill)
                    .center_y(Length::Fill)
                    .into()
            } else {
                timeline::view(timeline::ViewContext {
                    i18n: &app.i18n,
                    pins,
                    photos: &app.photos,
                })
                .map(Message::Timeline)
            }
        }
    };

    Column::new()
        .push(header)
        .push(Container::new(body).width(Length::Fill).height(Length::Fill))
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

fn view_map<'a>(app: &'a App, pins: &'a [crate::domain::Pin]) -> Element<'a, Message> {
    let pending = match &app.modal {
        Modal::AddPin(form) => Some(form.coordinate()),
        _ => None,
    };

    let map = map::view(map::ViewContext {
        i18n: &app.i18n,
        state: &app.map,
        tiles: &app.tiles,
        pins,
        pending,
        signed_in: app.session.is_some(),
        is_dark: app.theme_mode.is_dark(),
    })
    .map(Message::Map);

    let search = Container::new(
        search::view(search::ViewContext {
            i18n: &app.i18n,
            state: &app.search,
        })
        .map(Message::Search),
    )
    .padding(spacing::MD)
    .align_x(alignment::Horizontal::Left)
    .align_y(alignment::Vertical::Top);

    Stack::new()
        .width(Length::Fill)
        .height(Length::Fill)
        .push(map)
        .push(search)
        .into()
}

fn view_modal(app: &App) -> Option<Element<'_, Message>> {
    let i18n = &app.i18n;
    let (dialog, dismiss): (Element<'_, Message>, Option<Message>) = match &app.modal {
        Modal::None => return None,
        Modal::SignIn(state) => (
            sign_in::view(sign_in::ViewContext { i18n, state }).map(Message::SignIn),
            (!state.is_busy()).then_some(Message::SignIn(sign_in::Message::Cancel)),
        ),
        Modal::AddPin(state) => (
            add_pin::view(add_pin::ViewContext { i18n, state }).map(Message::AddPin),
            (!state.is_saving()).then_some(Message::AddPin(add_pin::Message::Cancel)),
        ),
        Modal::Gallery(state) => (
            gallery::view(gallery::ViewContext {
                i18n,
                state,
                photos: &app.photos,
            })
            .map(Message::Gallery),
            Some(Message::Gallery(gallery::Message::Close)),
        ),
    };

    // Clicking the backdrop closes the dialog unless it is busy.
    let backdrop = Container::new(opaque(dialog))
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .padding(spacing::LG)
        .style(styles::container::backdrop);

    let mut area = mouse_area(backdrop);
    if let Some(message) = dismiss {
        area = area.on_press(message);
    }
    Some(opaque(area))
}
