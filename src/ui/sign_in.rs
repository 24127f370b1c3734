// SPDX-License-Identifier: MPL-2.0
//! Email and password form for signing in or creating an account.

use crate::application::port::Credentials;
use crate::i18n::fluent::I18n;
use crate::ui::design_tokens::{sizing, spacing, typography};
use crate::ui::{styles, theme};
use iced::widget::{button, text_input, Column, Container, Row, Text};
use iced::{Element, Length};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    SignIn,
    SignUp,
}

pub struct ViewContext<'a> {
    pub i18n: &'a I18n,
    pub state: &'a State,
}

#[derive(Debug, Clone)]
pub enum Message {
    EmailChanged(String),
    PasswordChanged(String),
    ToggleMode,
    Submit,
    Cancel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    None,
    Submit { mode: Mode, credentials: Credentials },
    Cancel,
}

#[derive(Debug, Clone, Default)]
pub struct State {
    mode: Mode,
    email: String,
    password: String,
    error: Option<&'static str>,
    busy: bool,
}

impl State {
    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    #[must_use]
    pub fn error(&self) -> Option<&'static str> {
        self.error
    }

    /// Shows `key` and re-enables the form. The password is cleared.
    pub fn fail(&mut self, key: &'static str) {
        self.busy = false;
        self.password.clear();
        self.error = Some(key);
    }

    pub fn update(&mut self, message: Message) -> Event {
        match message {
            Message::EmailChanged(email) => self.email = email,
            Message::PasswordChanged(password) => self.password = password,
            Message::ToggleMode => {
                self.mode = match self.mode {
                    Mode::SignIn => Mode::SignUp,
                    Mode::SignUp => Mode::SignIn,
                };
                self.error = None;
            }
            Message::Submit => {
                if self.busy {
                    return Event::None;
                }
                let credentials = Credentials::new(self.email.as_str(), self.password.as_str());
                if !credentials.is_complete() {
                    self.error = Some("sign-in-error-missing");
                    return Event::None;
                }
                self.busy = true;
                self.error = None;
                return Event::Submit {
                    mode: self.mode,
                    credentials,
                };
            }
            Message::Cancel => return Event::Cancel,
        }
        Event::None
    }
}

pub fn view<'a>(ctx: ViewContext<'a>) -> Element<'a, Message> {
    let i18n = ctx.i18n;
    let state = ctx.state;

    let (title_key, submit_key, toggle_key) = match state.mode {
        Mode::SignIn => ("sign-in-title", "sign-in-submit", "sign-in-switch-to-sign-up"),
        Mode::SignUp => ("sign-up-title", "sign-up-submit", "sign-in-switch-to-sign-in"),
    };

    let mut email = text_input(&i18n.tr("sign-in-email"), &state.email).padding(spacing::XS);
    let mut password = text_input(&i18n.tr("sign-in-password"), &state.password)
        .secure(true)
        .padding(spacing::XS);
    if !state.busy {
        email = email.on_input(Message::EmailChanged).on_submit(Message::Submit);
        password = password
            .on_input(Message::PasswordChanged)
            .on_submit(Message::Submit);
    }

    let mut form = Column::new()
        .spacing(spacing::SM)
        .padding(spacing::MD)
        .push(Text::new(i18n.tr(title_key)).size(typography::TITLE_MD))
        .push(email)
        .push(password);

    if let Some(key) = state.error {
        form = form.push(
            Text::new(i18n.tr(key))
                .size(typography::BODY_SM)
                .color(theme::error_text_color()),
        );
    }

    let submit = if state.busy {
        button(Text::new(i18n.tr(submit_key))).style(styles::button::disabled())
    } else {
        button(Text::new(i18n.tr(submit_key)))
            .on_press(Message::Submit)
            .style(styles::button::primary)
    };

    form = form
        .push(
            Row::new()
                .spacing(spacing::SM)
                .push(
                    Container::new(
                        button(Text::new(i18n.tr("sign-in-cancel")))
                            .on_press(Message::Cancel)
                            .style(styles::button::unselected),
                    )
                    .width(Length::Fill),
                )
                .push(submit),
        )
        .push(
            button(Text::new(i18n.tr(toggle_key)).size(typography::BODY_SM))
                .on_press(Message::ToggleMode)
                .style(styles::button::unselected),
        );

    Container::new(form)
        .width(Length::Fixed(sizing::SIGN_IN_WIDTH))
        .style(styles::container::card)
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> State {
        let mut state = State::default();
        state.update(Message::EmailChanged(" ana@example.com ".into()));
        state.update(Message::PasswordChanged("secret".into()));
        state
    }

    #[test]
    fn submit_requires_both_fields() {
        let mut state = State::default();
        state.update(Message::EmailChanged("ana@example.com".into()));
        assert_eq!(state.update(Message::Submit), Event::None);
        assert_eq!(state.error(), Some("sign-in-error-missing"));
        assert!(!state.is_busy());
    }

    #[test]
    fn submit_trims_email_and_locks_form() {
        let mut state = filled();
        match state.update(Message::Submit) {
            Event::Submit { mode, credentials } => {
                assert_eq!(mode, Mode::SignIn);
                assert_eq!(credentials.email, "ana@example.com");
            }
            other => panic!("expected submit, got {other:?}"),
        }
        assert!(state.is_busy());
        assert_eq!(state.update(Message::Submit), Event::None);
    }

    #[test]
    fn toggle_switches_to_sign_up() {
        let mut state = filled();
        state.update(Message::ToggleMode);
        assert!(matches!(
            state.update(Message::Submit),
            Event::Submit {
                mode: Mode::SignUp,
                ..
            }
        ));
    }

    #[test]
    fn failure_unlocks_and_clears_password() {
        let mut state = filled();
        state.update(Message::Submit);
        state.fail("sign-in-error-credentials");

        assert!(!state.is_busy());
        assert_eq!(state.error(), Some("sign-in-error-credentials"));
        assert!(state.password.is_empty());
        assert_eq!(state.email, " ana@example.com ");
    }
}
