// SPDX-License-Identifier: MPL-2.0
//! Screen and modal enumerations for application navigation.

use crate::ui::{add_pin, gallery, sign_in};

/// Screens the user can navigate between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// No map access token is known yet.
    TokenInput,
    /// Header with the map or the timeline below it.
    Journal,
}

/// The dialog shown above the journal, with its state.
#[derive(Debug, Clone, Default)]
pub enum Modal {
    #[default]
    None,
    SignIn(sign_in::State),
    AddPin(add_pin::State),
    Gallery(gallery::State),
}

impl Modal {
    #[must_use]
    pub fn is_open(&self) -> bool {
        !matches!(self, Modal::None)
    }
}
