// SPDX-License-Identifier: MPL-2.0
//! Shared UI color helpers for the map canvas and forms.

use crate::ui::design_tokens::{
    opacity,
    palette::{self, BLACK, GRAY_100, GRAY_200, GRAY_700, WHITE},
};
use iced::Color;

/// Standard color for error text.
pub fn error_text_color() -> Color {
    palette::ERROR_500
}

/// Standard color for muted/secondary text.
pub fn muted_text_color() -> Color {
    palette::GRAY_400
}

// ============================================================================
// Map Canvas
// ============================================================================

/// Fill color for pin markers.
pub fn marker_fill_color() -> Color {
    palette::ERROR_500
}

/// Outline drawn around pin markers so they stand out on any tile.
pub fn marker_outline_color() -> Color {
    WHITE
}

/// Marker of the location picked for a pin that is being created.
pub fn pending_marker_color() -> Color {
    palette::PRIMARY_500
}

/// Background drawn where a tile has not arrived yet.
pub fn tile_placeholder_color(is_dark: bool) -> Color {
    if is_dark {
        GRAY_700
    } else {
        GRAY_100
    }
}

/// Grid lines between placeholder tiles.
pub fn tile_grid_color(is_dark: bool) -> Color {
    let base = if is_dark { BLACK } else { GRAY_200 };
    Color {
        a: opacity::OVERLAY_SUBTLE,
        ..base
    }
}
