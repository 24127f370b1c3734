// SPDX-License-Identifier: MPL-2.0
//! Pin gateway port definition.
//!
//! [`PinGateway`] is the single capability the rest of the application uses
//! to read and write pins. It is implemented once, in
//! [`crate::application::gateway::StoreGateway`], on top of the lower-level
//! [`RemoteStore`](super::store::RemoteStore) port that each backend provides.

use crate::domain::{NewPin, Pin, Session};
use futures_util::future::BoxFuture;
use thiserror::Error;

// =============================================================================
// GatewayError
// =============================================================================

/// Errors raised by remote pin and photo operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// The backend rejected the session token.
    #[error("not authorized")]
    Unauthorized,

    /// The backend answered with a non-success status.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// The request never produced a response (DNS, TLS, connection reset).
    #[error("transport error: {0}")]
    Transport(String),

    /// The response body did not have the expected shape.
    #[error("unexpected response: {0}")]
    Decode(String),

    /// A local photo file could not be read.
    #[error("I/O error: {0}")]
    Io(String),

    /// Object storage accepted the upload but gave no usable public URL.
    #[error("storage error: {0}")]
    Storage(String),
}

impl GatewayError {
    /// Returns the i18n message key for user-facing notifications.
    #[must_use]
    pub fn i18n_key(&self) -> &'static str {
        match self {
            GatewayError::Unauthorized => "notification-session-expired",
            GatewayError::Io(_) => "notification-photo-read-error",
            GatewayError::Http { .. }
            | GatewayError::Transport(_)
            | GatewayError::Decode(_)
            | GatewayError::Storage(_) => "notification-save-pin-error",
        }
    }
}

// =============================================================================
// PinGateway Trait
// =============================================================================

/// Port for listing and creating pins.
///
/// # Contract
///
/// - `list(None)` returns an empty list without any remote call.
/// - `list(Some(session))` returns the session user's pins, newest creation
///   time first. Remote failures are logged and yield an empty list.
/// - `create` uploads every photo sequentially, then inserts the pin, and
///   returns the created pin. Errors propagate unchanged.
///
/// Futures borrow the gateway; callers that need `'static` futures (iced
/// tasks) move an `Arc<dyn PinGateway>` into an `async move` block.
pub trait PinGateway: Send + Sync {
    fn list<'a>(&'a self, session: Option<&'a Session>) -> BoxFuture<'a, Vec<Pin>>;

    fn create<'a>(
        &'a self,
        session: &'a Session,
        draft: NewPin,
    ) -> BoxFuture<'a, Result<Pin, GatewayError>>;
}
