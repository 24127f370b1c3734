// SPDX-License-Identifier: MPL-2.0
//! Shared visual constants for the journal: colors, spacing, sizes and type.
//!
//! Components read these instead of hard-coding numbers, so the map
//! overlays, dialogs and toasts stay on the same grid.
//!
//! ```
//! use wayfarer::ui::design_tokens::{opacity, palette, spacing};
//! use iced::Color;
//!
//! let scrim = Color {
//!     a: opacity::OVERLAY_STRONG,
//!     ..palette::BLACK
//! };
//! let gap = spacing::MD;
//! # let _ = (scrim, gap);
//! ```

use iced::Color;

pub mod palette {
    use super::Color;

    pub const BLACK: Color = Color::BLACK;
    pub const WHITE: Color = Color::WHITE;
    pub const GRAY_900: Color = Color::from_rgb(0.1, 0.1, 0.1);
    pub const GRAY_700: Color = Color::from_rgb(0.3, 0.3, 0.3);
    pub const GRAY_400: Color = Color::from_rgb(0.4, 0.4, 0.4);
    pub const GRAY_200: Color = Color::from_rgb(0.75, 0.75, 0.75);
    pub const GRAY_100: Color = Color::from_rgb(0.85, 0.85, 0.85);

    /// Accent blue: primary buttons, the pending pin, selected toggles.
    pub const PRIMARY_400: Color = Color::from_rgb(0.4, 0.7, 1.0);
    pub const PRIMARY_500: Color = Color::from_rgb(0.3, 0.6, 0.9);
    pub const PRIMARY_600: Color = Color::from_rgb(0.2, 0.5, 0.8);

    /// Also the fill of saved pin markers.
    pub const ERROR_500: Color = Color::from_rgb(0.898, 0.224, 0.208);
    pub const WARNING_500: Color = Color::from_rgb(0.945, 0.651, 0.125);
    pub const SUCCESS_500: Color = Color::from_rgb(0.263, 0.702, 0.404);
    pub const INFO_500: Color = Color::from_rgb(0.392, 0.588, 1.0);
}

/// Alpha levels for layers drawn over the map or the modal backdrop.
pub mod opacity {
    pub const OVERLAY_SUBTLE: f32 = 0.2;
    pub const OVERLAY_MEDIUM: f32 = 0.5;
    pub const OVERLAY_STRONG: f32 = 0.7;
    pub const OVERLAY_HOVER: f32 = 0.8;
    pub const OVERLAY_PRESSED: f32 = 0.9;
    /// Dialog and toast panels.
    pub const SURFACE: f32 = 0.95;
}

/// Gaps and padding on a 4px grid.
pub mod spacing {
    pub const XXS: f32 = 4.0;
    pub const XS: f32 = 8.0;
    pub const SM: f32 = 12.0;
    pub const MD: f32 = 16.0;
    pub const LG: f32 = 24.0;
}

pub mod sizing {
    /// Toast severity glyph.
    pub const ICON_MD: f32 = 24.0;

    pub const TOAST_WIDTH: f32 = 320.0;
    pub const MODAL_WIDTH: f32 = 480.0;
    pub const GALLERY_WIDTH: f32 = 720.0;
    pub const SEARCH_WIDTH: f32 = 360.0;
    pub const SIGN_IN_WIDTH: f32 = 360.0;

    /// Form previews and the gallery strip.
    pub const THUMBNAIL: f32 = 64.0;
    pub const TIMELINE_THUMBNAIL: f32 = 96.0;
    pub const GALLERY_PHOTO_HEIGHT: f32 = 360.0;

    /// Drawn radius of a pin marker.
    pub const MARKER_RADIUS: f32 = 8.0;
    /// Clicks this close to a marker center select it.
    pub const MARKER_HIT_RADIUS: f32 = 14.0;
    /// Zoom buttons.
    pub const MAP_BUTTON: f32 = 32.0;
}

pub mod typography {
    /// App name in the header, dialog titles.
    pub const TITLE_MD: f32 = 20.0;
    /// Pin titles in the timeline and gallery.
    pub const TITLE_SM: f32 = 18.0;
    pub const BODY_LG: f32 = 16.0;
    pub const BODY: f32 = 14.0;
    pub const BODY_SM: f32 = 13.0;
    /// Dates, coordinates, photo counters.
    pub const CAPTION: f32 = 12.0;
}

pub mod border {
    /// Accent stripe on toasts.
    pub const WIDTH_MD: f32 = 2.0;
}

pub mod radius {
    pub const SM: f32 = 4.0;
    pub const MD: f32 = 8.0;
    pub const LG: f32 = 12.0;
    /// Pill shape for the map hint and counters.
    pub const FULL: f32 = 9999.0;
}

pub mod shadow {
    use super::palette;
    use iced::{Shadow, Vector};

    pub const NONE: Shadow = Shadow {
        color: palette::BLACK,
        offset: Vector::ZERO,
        blur_radius: 0.0,
    };

    pub const SM: Shadow = Shadow {
        color: palette::BLACK,
        offset: Vector { x: 0.0, y: 2.0 },
        blur_radius: 4.0,
    };

    pub const MD: Shadow = Shadow {
        color: palette::BLACK,
        offset: Vector { x: 0.0, y: 4.0 },
        blur_radius: 8.0,
    };

    pub const LG: Shadow = Shadow {
        color: palette::BLACK,
        offset: Vector { x: 0.0, y: 8.0 },
        blur_radius: 16.0,
    };
}

const _: () = {
    assert!(spacing::XS > spacing::XXS);
    assert!(spacing::SM > spacing::XS);
    assert!(spacing::MD > spacing::SM);
    assert!(spacing::LG > spacing::MD);

    assert!(opacity::OVERLAY_SUBTLE < opacity::OVERLAY_STRONG);
    assert!(opacity::SURFACE > 0.0 && opacity::SURFACE < 1.0);

    assert!(sizing::MARKER_HIT_RADIUS >= sizing::MARKER_RADIUS);
    assert!(sizing::TIMELINE_THUMBNAIL > sizing::THUMBNAIL);

    assert!(typography::TITLE_MD > typography::TITLE_SM);
    assert!(typography::TITLE_SM > typography::BODY_LG);
    assert!(typography::BODY > typography::BODY_SM);
    assert!(typography::BODY_SM > typography::CAPTION);
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spacing_stays_on_four_pixel_grid() {
        for step in [spacing::XXS, spacing::XS, spacing::SM, spacing::MD, spacing::LG] {
            assert_eq!(step % 4.0, 0.0);
        }
    }

    #[test]
    fn dialogs_fit_inside_minimum_window() {
        let min_width = crate::app::MIN_WINDOW_WIDTH as f32;
        assert!(sizing::MODAL_WIDTH + 2.0 * spacing::LG <= min_width);
        assert!(sizing::GALLERY_WIDTH > sizing::MODAL_WIDTH);
    }
}
