// SPDX-License-Identifier: MPL-2.0
//! Screen asking for a map access token when none is configured.
//!
//! The token is kept for the running session only; it is never written
//! back to `settings.toml`.

use crate::i18n::fluent::I18n;
use crate::ui::design_tokens::{sizing, spacing, typography};
use crate::ui::{styles, theme};
use iced::widget::{button, text_input, Column, Container, Text};
use iced::{Element, Length};

pub struct ViewContext<'a> {
    pub i18n: &'a I18n,
    pub state: &'a State,
}

#[derive(Debug, Clone)]
pub enum Message {
    TokenChanged(String),
    Submit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    None,
    Accepted(String),
}

#[derive(Debug, Clone, Default)]
pub struct State {
    value: String,
    rejected: bool,
}

impl State {
    pub fn update(&mut self, message: Message) -> Event {
        match message {
            Message::TokenChanged(value) => {
                self.value = value;
                self.rejected = false;
                Event::None
            }
            Message::Submit => {
                let token = self.value.trim();
                if token.is_empty() {
                    self.rejected = true;
                    Event::None
                } else {
                    Event::Accepted(token.to_string())
                }
            }
        }
    }
}

pub fn view<'a>(ctx: ViewContext<'a>) -> Element<'a, Message> {
    let i18n = ctx.i18n;

    let mut form = Column::new()
        .spacing(spacing::SM)
        .padding(spacing::LG)
        .push(Text::new(i18n.tr("token-title")).size(typography::TITLE_MD))
        .push(
            Text::new(i18n.tr("token-explanation"))
                .size(typography::BODY_SM)
                .color(theme::muted_text_color()),
        )
        .push(
            text_input(&i18n.tr("token-placeholder"), &ctx.state.value)
                .on_input(Message::TokenChanged)
                .on_submit(Message::Submit)
                .padding(spacing::XS),
        );

    if ctx.state.rejected {
        form = form.push(
            Text::new(i18n.tr("token-error-empty"))
                .size(typography::BODY_SM)
                .color(theme::error_text_color()),
        );
    }

    form = form.push(
        button(Text::new(i18n.tr("token-submit")))
            .on_press(Message::Submit)
            .style(styles::button::primary),
    );

    Container::new(
        Container::new(form)
            .width(Length::Fixed(sizing::MODAL_WIDTH))
            .style(styles::container::card),
    )
    .center_x(Length::Fill)
    .center_y(Length::Fill)
    .into()
}
