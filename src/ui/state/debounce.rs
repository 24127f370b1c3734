// SPDX-License-Identifier: MPL-2.0
//! Generation-counted debouncing.
//!
//! Every keystroke schedules a timer tagged with a fresh [`Ticket`]. When a
//! timer fires, only the ticket of the latest schedule is still current, so
//! at most one request leaves per debounce window. Responses carry the same
//! ticket and stale ones are dropped.

use std::time::Duration;

/// Identifies one scheduled timer (and the request it may trigger).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

#[derive(Debug, Clone)]
pub struct Debouncer {
    generation: u64,
    delay: Duration,
}

impl Debouncer {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            generation: 0,
            delay,
        }
    }

    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Starts a new window, superseding every earlier ticket.
    pub fn schedule(&mut self) -> Ticket {
        self.generation = self.generation.wrapping_add(1);
        Ticket(self.generation)
    }

    /// Supersedes every outstanding ticket without starting a window.
    pub fn invalidate(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    #[must_use]
    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.generation
    }
}
