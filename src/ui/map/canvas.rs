// SPDX-License-Identifier: MPL-2.0
//! Canvas program drawing tiles and pin markers, and turning mouse input
//! into map messages.

use super::projection::Viewport;
use super::Message;
use crate::domain::{Coordinate, Pin, PinId};
use crate::infrastructure::mapbox::{TileId, TILE_SIZE};
use crate::ui::design_tokens::sizing;
use crate::ui::image_cache::ImageCache;
use crate::ui::theme;
use iced::mouse;
use iced::widget::canvas::{self, Frame, Geometry, Path, Stroke};
use iced::widget::Action;
use iced::{Point, Rectangle, Renderer, Size, Theme};

/// Pointer travel (in pixels) after which a press becomes a drag.
const DRAG_THRESHOLD: f32 = 4.0;

/// Mouse state kept by the canvas between events.
#[derive(Debug, Default)]
pub struct Interaction {
    pressed_at: Option<Point>,
    last: Option<Point>,
    dragging: bool,
}

/// Everything the canvas needs to draw one frame.
pub struct MapCanvas<'a> {
    pub viewport: &'a Viewport,
    pub tiles: &'a ImageCache<TileId>,
    pub pins: &'a [Pin],
    pub pending: Option<Coordinate>,
    pub is_dark: bool,
}

/// Returns the id of the marker closest to `point` within the hit radius.
#[must_use]
pub fn marker_at(viewport: &Viewport, pins: &[Pin], point: Point) -> Option<PinId> {
    let radius_sq = sizing::MARKER_HIT_RADIUS * sizing::MARKER_HIT_RADIUS;

    pins.iter()
        .filter_map(|pin| {
            let (x, y) = viewport.to_screen(pin.coordinate);
            let distance_sq = (x - point.x).powi(2) + (y - point.y).powi(2);
            (distance_sq <= radius_sq).then_some((distance_sq, pin))
        })
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, pin)| pin.id.clone())
}

impl MapCanvas<'_> {
    fn size_changed(&self, bounds: Rectangle) -> bool {
        let (width, height) = self.viewport.size();
        (bounds.width - width).abs() >= 1.0 || (bounds.height - height).abs() >= 1.0
    }

    fn draw_marker(frame: &mut Frame, center: Point, fill: iced::Color) {
        let marker = Path::circle(center, sizing::MARKER_RADIUS);
        frame.fill(&marker, fill);
        frame.stroke(
            &marker,
            Stroke::default()
                .with_color(theme::marker_outline_color())
                .with_width(2.0),
        );
    }
}

impl canvas::Program<Message> for MapCanvas<'_> {
    type State = Interaction;

    fn update(
        &self,
        state: &mut Self::State,
        event: &iced::Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Option<Action<Message>> {
        if self.size_changed(bounds) {
            return Some(Action::publish(Message::Resized {
                width: bounds.width,
                height: bounds.height,
            }));
        }

        match event {
            iced::Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                let position = cursor.position_in(bounds)?;
                state.pressed_at = Some(position);
                state.last = Some(position);
                state.dragging = false;
                Some(Action::capture())
            }
            iced::Event::Mouse(mouse::Event::CursorMoved { .. }) => {
                let pressed_at = state.pressed_at?;
                let position = cursor.position_in(bounds)?;
                let last = state.last.unwrap_or(pressed_at);

                if !state.dragging && position.distance(pressed_at) < DRAG_THRESHOLD {
                    return None;
                }
                state.dragging = true;
                state.last = Some(position);
                Some(
                    Action::publish(Message::Panned {
                        dx: position.x - last.x,
                        dy: position.y - last.y,
                    })
                    .and_capture(),
                )
            }
            iced::Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)) => {
                let pressed_at = state.pressed_at.take()?;
                let was_drag = std::mem::take(&mut state.dragging);
                state.last = None;
                if was_drag {
                    return Some(Action::capture());
                }

                let message = match marker_at(self.viewport, self.pins, pressed_at) {
                    Some(id) => Message::MarkerClicked(id),
                    None => Message::Clicked(self.viewport.to_coordinate(pressed_at.x, pressed_at.y)),
                };
                Some(Action::publish(message).and_capture())
            }
            iced::Event::Mouse(mouse::Event::CursorLeft) => {
                state.pressed_at = None;
                state.last = None;
                state.dragging = false;
                None
            }
            iced::Event::Mouse(mouse::Event::WheelScrolled { delta }) => {
                let position = cursor.position_in(bounds)?;
                let y = match delta {
                    mouse::ScrollDelta::Lines { y, .. } | mouse::ScrollDelta::Pixels { y, .. } => *y,
                };
                if y == 0.0 {
                    return None;
                }
                Some(
                    Action::publish(Message::Zoomed {
                        delta: if y > 0.0 { 1 } else { -1 },
                        anchor: (position.x, position.y),
                    })
                    .and_capture(),
                )
            }
            _ => None,
        }
    }

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        frame.fill_rectangle(
            Point::ORIGIN,
            bounds.size(),
            theme::tile_placeholder_color(self.is_dark),
        );

        let tile_size = TILE_SIZE as f32;
        let grid = Stroke::default()
            .with_color(theme::tile_grid_color(self.is_dark))
            .with_width(1.0);

        for placed in self.viewport.visible_tiles() {
            let area = Rectangle::new(Point::new(placed.x, placed.y), Size::new(tile_size, tile_size));
            match self.tiles.peek(&placed.id) {
                Some(handle) => frame.draw_image(area, canvas::Image::new(handle.clone())),
                None => frame.stroke(&Path::rectangle(area.position(), area.size()), grid),
            }
        }

        let visible = |x: f32, y: f32| {
            let margin = sizing::MARKER_HIT_RADIUS;
            x >= -margin && y >= -margin && x <= bounds.width + margin && y <= bounds.height + margin
        };

        for pin in self.pins {
            let (x, y) = self.viewport.to_screen(pin.coordinate);
            if visible(x, y) {
                Self::draw_marker(&mut frame, Point::new(x, y), theme::marker_fill_color());
            }
        }

        if let Some(pending) = self.pending {
            let (x, y) = self.viewport.to_screen(pending);
            if visible(x, y) {
                Self::draw_marker(&mut frame, Point::new(x, y), theme::pending_marker_color());
            }
        }

        vec![frame.into_geometry()]
    }

    fn mouse_interaction(
        &self,
        state: &Self::State,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> mouse::Interaction {
        if state.dragging {
            return mouse::Interaction::Grabbing;
        }
        match cursor.position_in(bounds) {
            Some(position) if marker_at(self.viewport, self.pins, position).is_some() => {
                mouse::Interaction::Pointer
            }
            Some(_) => mouse::Interaction::Crosshair,
            None => mouse::Interaction::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Title, UserId};
    use chrono::{NaiveDate, Utc};

    fn pin(id: &str, lat: f64, lng: f64) -> Pin {
        Pin {
            id: PinId::new(id),
            coordinate: Coordinate::new(lat, lng).unwrap(),
            title: Title::parse(id).unwrap(),
            description: None,
            visit_date: NaiveDate::from_ymd_opt(2023, 6, 1).unwrap(),
            photos: Vec::new(),
            user_id: UserId::new("u1"),
            created_at: Utc::now(),
        }
    }

    fn viewport() -> Viewport {
        let mut viewport = Viewport::new(Coordinate::new(0.0, 0.0).unwrap(), 6);
        viewport.set_size(800.0, 600.0);
        viewport
    }

    #[test]
    fn click_on_marker_hits_it() {
        let viewport = viewport();
        let pins = vec![pin("paris", 0.0, 0.0), pin("far", 10.0, 10.0)];

        let hit = marker_at(&viewport, &pins, Point::new(405.0, 303.0));
        assert_eq!(hit, Some(PinId::new("paris")));
    }

    #[test]
    fn click_outside_hit_radius_misses() {
        let viewport = viewport();
        let pins = vec![pin("paris", 0.0, 0.0)];

        let miss = marker_at(&viewport, &pins, Point::new(400.0 + sizing::MARKER_HIT_RADIUS + 2.0, 300.0));
        assert_eq!(miss, None);
    }

    #[test]
    fn closest_of_overlapping_markers_wins() {
        let viewport = viewport();
        let (x, y) = viewport.to_screen(Coordinate::new(0.05, 0.05).unwrap());
        let pins = vec![pin("a", 0.0, 0.0), pin("b", 0.05, 0.05)];

        assert_eq!(marker_at(&viewport, &pins, Point::new(x, y)), Some(PinId::new("b")));
    }
}
