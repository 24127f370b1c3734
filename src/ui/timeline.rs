// SPDX-License-Identifier: MPL-2.0
//! Chronological list of pins, most recent visit first.

use crate::application::timeline::by_visit_date;
use crate::domain::{Pin, PinId};
use crate::i18n::fluent::I18n;
use crate::ui::design_tokens::{sizing, spacing, typography};
use crate::ui::image_cache::ImageCache;
use crate::ui::{styles, theme};
use iced::widget::{button, image, scrollable, Column, Container, Row, Text};
use iced::{alignment, ContentFit, Element, Length};

pub struct ViewContext<'a> {
    pub i18n: &'a I18n,
    pub pins: &'a [Pin],
    pub photos: &'a ImageCache<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    Open(PinId),
}

/// Cover photo URLs in display order, for prefetching thumbnails.
pub fn cover_urls(pins: &[Pin]) -> Vec<String> {
    by_visit_date(pins)
        .into_iter()
        .filter_map(|pin| pin.cover_photo().map(|photo| photo.url.clone()))
        .collect()
}

pub fn view<'a>(ctx: ViewContext<'a>) -> Element<'a, Message> {
    if ctx.pins.is_empty() {
        return Container::new(
            Text::new(ctx.i18n.tr("timeline-empty"))
                .size(typography::BODY_LG)
                .color(theme::muted_text_color()),
        )
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .into();
    }

    let rows = by_visit_date(ctx.pins)
        .into_iter()
        .fold(Column::new().spacing(spacing::SM), |column, pin| {
            column.push(build_row(&ctx, pin))
        });

    scrollable(
        Container::new(rows.max_width(sizing::GALLERY_WIDTH))
            .center_x(Length::Fill)
            .padding(spacing::LG),
    )
    .height(Length::Fill)
    .into()
}

fn build_row<'a>(ctx: &ViewContext<'a>, pin: &'a Pin) -> Element<'a, Message> {
    let size = Length::Fixed(sizing::TIMELINE_THUMBNAIL);
    let thumbnail: Element<'a, Message> = match pin
        .cover_photo()
        .and_then(|photo| ctx.photos.peek(&photo.url))
    {
        Some(handle) => image(handle.clone())
            .width(size)
            .height(size)
            .content_fit(ContentFit::Cover)
            .into(),
        None => Container::new(Text::new(""))
            .width(size)
            .height(size)
            .style(styles::container::placeholder)
            .into(),
    };

    let count = pin.photos.len().to_string();
    let mut details = Column::new()
        .spacing(spacing::XXS)
        .width(Length::Fill)
        .push(Text::new(pin.title.as_str()).size(typography::TITLE_SM))
        .push(
            Text::new(format!(
                "{}  ·  {}",
                ctx.i18n.long_date(pin.visit_date),
                ctx.i18n
                    .tr_with_args("timeline-photo-count", &[("count", count.as_str())])
            ))
            .size(typography::CAPTION)
            .color(theme::muted_text_color()),
        );
    if let Some(description) = &pin.description {
        details = details.push(Text::new(description.as_str()).size(typography::BODY_SM));
    }

    button(
        Row::new()
            .spacing(spacing::MD)
            .align_y(alignment::Vertical::Center)
            .push(thumbnail)
            .push(details),
    )
    .width(Length::Fill)
    .padding(spacing::SM)
    .on_press(Message::Open(pin.id.clone()))
    .style(styles::button::unselected)
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Coordinate, Photo, PhotoId, Title, UserId};
    use chrono::{NaiveDate, Utc};

    fn pin(id: &str, day: u32, photo: Option<&str>) -> Pin {
        Pin {
            id: PinId::new(id),
            coordinate: Coordinate::new(0.0, 0.0).unwrap(),
            title: Title::parse(id).unwrap(),
            description: None,
            visit_date: NaiveDate::from_ymd_opt(2023, 1, day).unwrap(),
            photos: photo
                .map(|url| Photo {
                    id: PhotoId::new("p"),
                    url: url.to_string(),
                    caption: None,
                    upload_date: Utc::now(),
                    metadata: None,
                })
                .into_iter()
                .collect(),
            user_id: UserId::new("u"),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn cover_urls_follow_visit_order_and_skip_empty_pins() {
        let pins = vec![
            pin("a", 1, Some("memory://a")),
            pin("b", 3, None),
            pin("c", 2, Some("memory://c")),
        ];
        assert_eq!(cover_urls(&pins), vec!["memory://c", "memory://a"]);
    }
}
