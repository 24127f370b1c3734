// SPDX-License-Identifier: MPL-2.0
//! Top bar with the application title, view toggle and account controls.

use crate::i18n::fluent::I18n;
use crate::ui::design_tokens::{spacing, typography};
use crate::ui::{styles, theme};
use iced::widget::{button, Container, Row, Space, Text};
use iced::{alignment, Element, Length};

/// Which main view is shown below the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Map,
    Timeline,
}

pub struct ViewContext<'a> {
    pub i18n: &'a I18n,
    pub mode: ViewMode,
    /// Email of the signed-in user, if any.
    pub email: Option<&'a str>,
    pub pin_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    ShowMap,
    ShowTimeline,
    SignIn,
    SignOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    None,
    ModeChanged(ViewMode),
    SignInRequested,
    SignOutRequested,
}

/// Switches `mode` on toggle messages and reports account requests.
pub fn update(message: Message, mode: &mut ViewMode) -> Event {
    let target = match message {
        Message::ShowMap => ViewMode::Map,
        Message::ShowTimeline => ViewMode::Timeline,
        Message::SignIn => return Event::SignInRequested,
        Message::SignOut => return Event::SignOutRequested,
    };
    if *mode == target {
        Event::None
    } else {
        *mode = target;
        Event::ModeChanged(target)
    }
}

pub fn view<'a>(ctx: ViewContext<'a>) -> Element<'a, Message> {
    let i18n = ctx.i18n;
    let mut bar = Row::new()
        .spacing(spacing::SM)
        .align_y(alignment::Vertical::Center)
        .push(Text::new(i18n.tr("app-title")).size(typography::TITLE_MD));

    match ctx.email {
        Some(email) => {
            bar = bar.push(toggle(
                i18n.tr("header-map"),
                ctx.mode == ViewMode::Map,
                Message::ShowMap,
            ));
            let timeline_label = i18n.tr_with_args(
                "header-timeline",
                &[("count", ctx.pin_count.to_string().as_str())],
            );
            bar = bar
                .push(toggle(
                    timeline_label,
                    ctx.mode == ViewMode::Timeline,
                    Message::ShowTimeline,
                ))
                .push(Space::new().width(Length::Fill))
                .push(
                    Text::new(email)
                        .size(typography::BODY_SM)
                        .color(theme::muted_text_color()),
                )
                .push(
                    button(Text::new(i18n.tr("header-sign-out")))
                        .on_press(Message::SignOut)
                        .style(styles::button::unselected),
                );
        }
        None => {
            bar = bar.push(Space::new().width(Length::Fill)).push(
                button(Text::new(i18n.tr("header-sign-in")))
                    .on_press(Message::SignIn)
                    .style(styles::button::primary),
            );
        }
    }

    Container::new(bar)
        .width(Length::Fill)
        .padding([spacing::XS, spacing::MD])
        .style(styles::container::header)
        .into()
}

fn toggle<'a>(label: String, active: bool, message: Message) -> Element<'a, Message> {
    let style = if active {
        styles::button::selected
    } else {
        styles::button::unselected
    };
    button(Text::new(label)).on_press(message).style(style).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggling_to_current_mode_is_silent() {
        let mut mode = ViewMode::Map;
        assert_eq!(update(Message::ShowMap, &mut mode), Event::None);
        assert_eq!(mode, ViewMode::Map);
    }

    #[test]
    fn toggling_switches_mode() {
        let mut mode = ViewMode::Map;
        assert_eq!(
            update(Message::ShowTimeline, &mut mode),
            Event::ModeChanged(ViewMode::Timeline)
        );
        assert_eq!(mode, ViewMode::Timeline);
    }

    #[test]
    fn account_buttons_leave_mode_alone() {
        let mut mode = ViewMode::Timeline;
        assert_eq!(update(Message::SignOut, &mut mode), Event::SignOutRequested);
        assert_eq!(update(Message::SignIn, &mut mode), Event::SignInRequested);
        assert_eq!(mode, ViewMode::Timeline);
    }
}
