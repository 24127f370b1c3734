// SPDX-License-Identifier: MPL-2.0
//! Test utilities for float comparisons and shared fixtures.
//!
//! Re-exports the `approx` crate's assertion macros for float comparison,
//! which properly handle floating-point precision issues that `assert_eq!`
//! cannot.

pub use approx::{assert_abs_diff_eq, assert_relative_eq};

use crate::domain::{Session, User, UserId};

/// Default epsilon for coordinate comparisons in degrees.
pub const COORD_EPSILON: f64 = 1e-9;

/// Builds a session for the given user id with a dummy token.
pub fn session_for(user_id: &str) -> Session {
    Session::new(
        User {
            id: UserId::new(user_id),
            email: format!("{user_id}@example.com"),
            display_name: None,
            avatar_url: None,
        },
        format!("token-{user_id}"),
    )
}
