// SPDX-License-Identifier: MPL-2.0
//! Web Mercator math for the map canvas.
//!
//! World pixel space at zoom `z` is a square of `256 * 2^z` pixels with the
//! origin at the north-west corner (latitude +85.05°, longitude -180°).
//! Longitude wraps horizontally; latitude is clamped to the Mercator limit.

use crate::config::{MAX_MERCATOR_LATITUDE, MAX_ZOOM, MIN_ZOOM};
use crate::domain::Coordinate;
use crate::infrastructure::mapbox::{TileId, TILE_SIZE};
use std::f64::consts::PI;

/// A position in world pixel space at some zoom level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldPoint {
    pub x: f64,
    pub y: f64,
}

/// Edge length of the whole world in pixels at `zoom`.
#[must_use]
pub fn world_size(zoom: u8) -> f64 {
    f64::from(TILE_SIZE) * f64::from(1u32 << u32::from(zoom))
}

/// Clamps a zoom level into the supported range.
#[must_use]
pub fn clamp_zoom(zoom: i32) -> u8 {
    let clamped = zoom.clamp(i32::from(MIN_ZOOM), i32::from(MAX_ZOOM));
    u8::try_from(clamped).unwrap_or(MIN_ZOOM)
}

/// Projects a coordinate to world pixels.
#[must_use]
pub fn project(coordinate: Coordinate, zoom: u8) -> WorldPoint {
    let size = world_size(zoom);
    let latitude = coordinate
        .latitude()
        .clamp(-MAX_MERCATOR_LATITUDE, MAX_MERCATOR_LATITUDE);
    let sin = latitude.to_radians().sin();

    WorldPoint {
        x: (coordinate.longitude() + 180.0) / 360.0 * size,
        y: (0.5 - ((1.0 + sin) / (1.0 - sin)).ln() / (4.0 * PI)) * size,
    }
}

/// Inverse of [`project`]. `x` wraps around the antimeridian.
#[must_use]
pub fn unproject(point: WorldPoint, zoom: u8) -> Coordinate {
    let size = world_size(zoom);
    let longitude = point.x / size * 360.0 - 180.0;
    let y = point.y.clamp(0.0, size);
    let latitude = (PI * (1.0 - 2.0 * y / size)).sinh().atan().to_degrees();
    Coordinate::normalized(latitude, longitude)
}

/// A tile to draw and the screen position of its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedTile {
    pub id: TileId,
    pub x: f32,
    pub y: f32,
}

/// The visible part of the map: a center, a zoom and a pixel size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    center: Coordinate,
    zoom: u8,
    width: f32,
    height: f32,
}

impl Viewport {
    #[must_use]
    pub fn new(center: Coordinate, zoom: u8) -> Self {
        Self {
            center,
            zoom: clamp_zoom(i32::from(zoom)),
            width: 0.0,
            height: 0.0,
        }
    }

    #[must_use]
    pub fn center(&self) -> Coordinate {
        self.center
    }

    #[must_use]
    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    #[must_use]
    pub fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    /// Updates the pixel size. Returns `true` if it changed.
    pub fn set_size(&mut self, width: f32, height: f32) -> bool {
        let width = width.max(0.0);
        let height = height.max(0.0);
        if (width - self.width).abs() < f32::EPSILON && (height - self.height).abs() < f32::EPSILON
        {
            return false;
        }
        self.width = width;
        self.height = height;
        self.set_center_point(project(self.center, self.zoom));
        true
    }

    pub fn center_on(&mut self, coordinate: Coordinate) {
        self.set_center_point(project(coordinate, self.zoom));
    }

    fn center_point(&self) -> WorldPoint {
        project(self.center, self.zoom)
    }

    /// Sets the center from world pixels, keeping the map vertically inside
    /// the world when the viewport allows it.
    fn set_center_point(&mut self, point: WorldPoint) {
        let size = world_size(self.zoom);
        let half_height = f64::from(self.height) / 2.0;
        let y = if size > 2.0 * half_height {
            point.y.clamp(half_height, size - half_height)
        } else {
            size / 2.0
        };
        self.center = unproject(WorldPoint { x: point.x, y }, self.zoom);
    }

    /// World pixel under the top-left corner of the viewport.
    fn origin(&self) -> WorldPoint {
        let center = self.center_point();
        WorldPoint {
            x: center.x - f64::from(self.width) / 2.0,
            y: center.y - f64::from(self.height) / 2.0,
        }
    }

    /// Screen position of a coordinate, using the wrapped copy of the world
    /// closest to the center.
    #[must_use]
    pub fn to_screen(&self, coordinate: Coordinate) -> (f32, f32) {
        let size = world_size(self.zoom);
        let center = self.center_point();
        let point = project(coordinate, self.zoom);

        let dx = (point.x - center.x + size / 2.0).rem_euclid(size) - size / 2.0;
        let dy = point.y - center.y;

        (
            (f64::from(self.width) / 2.0 + dx) as f32,
            (f64::from(self.height) / 2.0 + dy) as f32,
        )
    }

    /// Coordinate under a screen position.
    #[must_use]
    pub fn to_coordinate(&self, x: f32, y: f32) -> Coordinate {
        let origin = self.origin();
        unproject(
            WorldPoint {
                x: origin.x + f64::from(x),
                y: origin.y + f64::from(y),
            },
            self.zoom,
        )
    }

    /// Moves the map content by a screen delta (a drag).
    pub fn pan(&mut self, dx: f32, dy: f32) {
        let center = self.center_point();
        self.set_center_point(WorldPoint {
            x: center.x - f64::from(dx),
            y: center.y - f64::from(dy),
        });
    }

    /// Changes the zoom by `delta` levels, keeping the coordinate under
    /// `anchor` (or the center) in place. Returns `true` if the zoom changed.
    pub fn zoom_by(&mut self, delta: i32, anchor: Option<(f32, f32)>) -> bool {
        let zoom = clamp_zoom(i32::from(self.zoom) + delta);
        if zoom == self.zoom {
            return false;
        }

        let (ax, ay) = anchor.unwrap_or((self.width / 2.0, self.height / 2.0));
        let fixed = self.to_coordinate(ax, ay);

        self.zoom = zoom;
        let fixed_point = project(fixed, zoom);
        self.set_center_point(WorldPoint {
            x: fixed_point.x - f64::from(ax) + f64::from(self.width) / 2.0,
            y: fixed_point.y - f64::from(ay) + f64::from(self.height) / 2.0,
        });
        true
    }

    /// Tiles covering the viewport, row by row.
    #[must_use]
    pub fn visible_tiles(&self) -> Vec<PlacedTile> {
        if self.width <= 0.0 || self.height <= 0.0 {
            return Vec::new();
        }

        let tile = f64::from(TILE_SIZE);
        let count = 1i64 << i64::from(self.zoom);
        let origin = self.origin();

        let first_x = (origin.x / tile).floor() as i64;
        let last_x = ((origin.x + f64::from(self.width)) / tile).floor() as i64;
        let first_y = ((origin.y / tile).floor() as i64).max(0);
        let last_y = (((origin.y + f64::from(self.height)) / tile).floor() as i64).min(count - 1);

        let mut tiles = Vec::new();
        for ty in first_y..=last_y {
            for tx in first_x..=last_x {
                let (Ok(x), Ok(y)) = (u32::try_from(tx.rem_euclid(count)), u32::try_from(ty))
                else {
                    continue;
                };
                tiles.push(PlacedTile {
                    id: TileId {
                        zoom: self.zoom,
                        x,
                        y,
                    },
                    x: (tx as f64 * tile - origin.x) as f32,
                    y: (ty as f64 * tile - origin.y) as f32,
                });
            }
        }
        tiles
    }
}
