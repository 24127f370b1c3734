// SPDX-License-Identifier: MPL-2.0
//! Photo gallery for a single pin.

use crate::domain::{Photo, Pin};
use crate::i18n::fluent::I18n;
use crate::ui::design_tokens::{sizing, spacing, typography};
use crate::ui::image_cache::ImageCache;
use crate::ui::state::GalleryCursor;
use crate::ui::{styles, theme};
use iced::widget::{button, image, scrollable, Column, Container, Row, Text};
use iced::{alignment, ContentFit, Element, Length};

pub struct ViewContext<'a> {
    pub i18n: &'a I18n,
    pub state: &'a State,
    pub photos: &'a ImageCache<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    Next,
    Previous,
    Select(usize),
    Close,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    None,
    Close,
}

#[derive(Debug, Clone)]
pub struct State {
    pin: Pin,
    cursor: GalleryCursor,
}

impl State {
    #[must_use]
    pub fn new(pin: Pin) -> Self {
        let cursor = GalleryCursor::new(pin.photos.len());
        Self { pin, cursor }
    }

    #[must_use]
    pub fn pin(&self) -> &Pin {
        &self.pin
    }

    #[must_use]
    pub fn cursor(&self) -> GalleryCursor {
        self.cursor
    }

    #[must_use]
    pub fn current_photo(&self) -> Option<&Photo> {
        self.pin.photos.get(self.cursor.index())
    }

    /// URLs the gallery may display, current photo first.
    pub fn photo_urls(&self) -> impl Iterator<Item = &str> {
        let current = self.current_photo().map(|photo| photo.url.as_str());
        current.into_iter().chain(
            self.pin
                .photos
                .iter()
                .map(|photo| photo.url.as_str())
                .filter(move |url| Some(*url) != current),
        )
    }

    pub fn update(&mut self, message: Message) -> Event {
        match message {
            Message::Next => self.cursor = self.cursor.next(),
            Message::Previous => self.cursor = self.cursor.previous(),
            Message::Select(index) => self.cursor = self.cursor.select(index),
            Message::Close => return Event::Close,
        }
        Event::None
    }
}

pub fn view<'a>(ctx: ViewContext<'a>) -> Element<'a, Message> {
    let i18n = ctx.i18n;
    let state = ctx.state;
    let pin = &state.pin;

    let close = button(Text::new("×").size(typography::TITLE_SM))
        .on_press(Message::Close)
        .style(styles::button::unselected);
    let heading = Row::new()
        .align_y(alignment::Vertical::Center)
        .push(
            Text::new(pin.title.as_str())
                .size(typography::TITLE_MD)
                .width(Length::Fill),
        )
        .push(close);

    let subtitle = Text::new(format!(
        "{}  ·  {:.4}",
        i18n.long_date(pin.visit_date),
        pin.coordinate
    ))
    .size(typography::CAPTION)
    .color(theme::muted_text_color());

    let mut content = Column::new()
        .spacing(spacing::SM)
        .padding(spacing::MD)
        .push(heading)
        .push(subtitle);

    match state.current_photo() {
        Some(photo) => {
            content = content.push(build_viewer(&ctx, photo));
            if let Some(caption) = &photo.caption {
                content = content.push(Text::new(caption.as_str()).size(typography::BODY_SM));
            }
            content = content.push(build_strip(&ctx));
        }
        None => {
            content = content.push(
                Container::new(Text::new(i18n.tr("gallery-no-photos")))
                    .width(Length::Fill)
                    .height(Length::Fixed(sizing::GALLERY_PHOTO_HEIGHT / 2.0))
                    .center_x(Length::Fill)
                    .center_y(Length::Fixed(sizing::GALLERY_PHOTO_HEIGHT / 2.0))
                    .style(styles::container::placeholder),
            );
        }
    }

    if let Some(description) = &pin.description {
        content = content.push(Text::new(description.as_str()).size(typography::BODY));
    }

    Container::new(scrollable(content))
        .width(Length::Fixed(sizing::GALLERY_WIDTH))
        .style(styles::container::card)
        .into()
}

fn build_viewer<'a>(ctx: &ViewContext<'a>, photo: &'a Photo) -> Element<'a, Message> {
    let height = Length::Fixed(sizing::GALLERY_PHOTO_HEIGHT);
    let picture: Element<'a, Message> = match ctx.photos.peek(&photo.url) {
        Some(handle) => image(handle.clone())
            .width(Length::Fill)
            .height(height)
            .content_fit(ContentFit::Contain)
            .into(),
        None => {
            let key = if ctx.photos.is_in_flight(&photo.url) {
                "gallery-photo-loading"
            } else {
                "gallery-photo-unavailable"
            };
            Container::new(Text::new(ctx.i18n.tr(key)).color(theme::muted_text_color()))
                .width(Length::Fill)
                .center_x(Length::Fill)
                .center_y(height)
                .style(styles::container::placeholder)
                .into()
        }
    };

    let cursor = ctx.state.cursor;
    let counter = Text::new(format!("{} / {}", cursor.position(), cursor.len()))
        .size(typography::BODY_SM);

    let mut previous = button(Text::new("‹").size(typography::TITLE_MD)).style(styles::button::unselected);
    let mut next = button(Text::new("›").size(typography::TITLE_MD)).style(styles::button::unselected);
    if cursor.len() > 1 {
        previous = previous.on_press(Message::Previous);
        next = next.on_press(Message::Next);
    }

    Column::new()
        .spacing(spacing::XS)
        .align_x(alignment::Horizontal::Center)
        .push(
            Row::new()
                .spacing(spacing::XS)
                .align_y(alignment::Vertical::Center)
                .push(previous)
                .push(picture)
                .push(next),
        )
        .push(counter)
        .into()
}

fn build_strip<'a>(ctx: &ViewContext<'a>) -> Element<'a, Message> {
    let current = ctx.state.cursor.index();
    let mut strip = Row::new().spacing(spacing::XS);

    for (index, photo) in ctx.state.pin.photos.iter().enumerate() {
        let thumb: Element<'a, Message> = match ctx.photos.peek(&photo.url) {
            Some(handle) => image(handle.clone())
                .width(Length::Fixed(sizing::THUMBNAIL))
                .height(Length::Fixed(sizing::THUMBNAIL))
                .content_fit(ContentFit::Cover)
                .into(),
            None => Container::new(Text::new(""))
                .width(Length::Fixed(sizing::THUMBNAIL))
                .height(Length::Fixed(sizing::THUMBNAIL))
                .style(styles::container::placeholder)
                .into(),
        };
        let style = if index == current {
            styles::button::selected
        } else {
            styles::button::unselected
        };
        strip = strip.push(
            button(thumb)
                .padding(spacing::XXS)
                .on_press(Message::Select(index))
                .style(style),
        );
    }

    scrollable(strip)
        .direction(scrollable::Direction::Horizontal(
            scrollable::Scrollbar::default(),
        ))
        .into()
}
