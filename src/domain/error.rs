// SPDX-License-Identifier: MPL-2.0
//! Validation errors raised by domain constructors.

use std::path::PathBuf;
use thiserror::Error;

/// Input rejected before anything reaches a remote service.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("title must not be blank")]
    BlankTitle,

    #[error("invalid coordinate ({latitude}, {longitude})")]
    InvalidCoordinate { latitude: f64, longitude: f64 },

    #[error("invalid visit date: {0}")]
    InvalidVisitDate(String),

    #[error("unsupported photo file: {}", .0.display())]
    UnsupportedPhoto(PathBuf),
}

impl ValidationError {
    /// Returns the i18n message key shown next to the form.
    #[must_use]
    pub fn i18n_key(&self) -> &'static str {
        match self {
            ValidationError::BlankTitle => "add-pin-error-title-required",
            ValidationError::InvalidCoordinate { .. } => "add-pin-error-coordinate",
            ValidationError::InvalidVisitDate(_) => "add-pin-error-visit-date",
            ValidationError::UnsupportedPhoto(_) => "add-pin-error-unsupported-photo",
        }
    }
}
