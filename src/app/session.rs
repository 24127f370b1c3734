// SPDX-License-Identifier: MPL-2.0
//! Per-session state: who is signed in and which pins they own.
//!
//! A [`SessionContext`] is created on sign-in and dropped on sign-out, so
//! nothing about the previous user survives a sign-out. Each context gets a
//! new [`SessionEpoch`]; async results carry the epoch they were started
//! under and are dropped once it no longer matches, even when the same user
//! signed back in.

use crate::domain::{Pin, PinId, Session, UserId};
use std::fmt;

/// Generation number of a sign-in. Strictly increasing within one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct SessionEpoch(u64);

impl SessionEpoch {
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for SessionEpoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct SessionContext {
    session: Session,
    epoch: SessionEpoch,
    pins: Vec<Pin>,
    loading: bool,
}

impl SessionContext {
    /// A fresh context whose pins are still being fetched.
    #[must_use]
    pub fn new(session: Session, epoch: SessionEpoch) -> Self {
        Self {
            session,
            epoch,
            pins: Vec::new(),
            loading: true,
        }
    }

    #[must_use]
    pub fn epoch(&self) -> SessionEpoch {
        self.epoch
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    #[must_use]
    pub fn user_id(&self) -> &UserId {
        self.session.user_id()
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.session.user.email
    }

    #[must_use]
    pub fn pins(&self) -> &[Pin] {
        &self.pins
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn pin(&self, id: &PinId) -> Option<&Pin> {
        self.pins.iter().find(|pin| &pin.id == id)
    }

    /// Replaces the whole list with a fresh fetch.
    pub fn replace_pins(&mut self, pins: Vec<Pin>) {
        self.pins = pins;
        self.loading = false;
    }

    /// Adds a newly created pin at the front (newest creation first).
    ///
    /// Returns `false` and leaves the list alone if a pin with the same id
    /// is already present, e.g. because a fetch already returned it.
    pub fn prepend(&mut self, pin: Pin) -> bool {
        if self.pin(&pin.id).is_some() {
            return false;
        }
        self.pins.insert(0, pin);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Coordinate, Title};
    use crate::test_utils::session_for;
    use chrono::{NaiveDate, Utc};

    fn pin(id: &str) -> Pin {
        Pin {
            id: PinId::new(id),
            coordinate: Coordinate::new(10.0, 20.0).unwrap(),
            title: Title::parse(id).unwrap(),
            description: None,
            visit_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            photos: Vec::new(),
            user_id: UserId::new("ana"),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn new_context_is_loading_and_empty() {
        let context = SessionContext::new(session_for("ana"), SessionEpoch::default());
        assert!(context.is_loading());
        assert!(context.pins().is_empty());
    }

    #[test]
    fn replace_discards_previous_list() {
        let mut context = SessionContext::new(session_for("ana"), SessionEpoch::default());
        context.replace_pins(vec![pin("a"), pin("b")]);
        context.replace_pins(vec![pin("c")]);

        assert!(!context.is_loading());
        assert_eq!(context.pins().len(), 1);
        assert_eq!(context.pins()[0].id.as_str(), "c");
    }

    #[test]
    fn prepend_puts_new_pin_first() {
        let mut context = SessionContext::new(session_for("ana"), SessionEpoch::default());
        context.replace_pins(vec![pin("old")]);
        assert!(context.prepend(pin("new")));

        let ids: Vec<_> = context.pins().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "old"]);
        assert!(context.pin(&PinId::new("old")).is_some());
    }

    #[test]
    fn prepend_skips_pin_already_listed() {
        let mut context = SessionContext::new(session_for("ana"), SessionEpoch::default());
        context.replace_pins(vec![pin("p1")]);

        assert!(!context.prepend(pin("p1")));
        assert_eq!(context.pins().len(), 1);
    }

    #[test]
    fn epochs_increase() {
        let first = SessionEpoch::default().next();
        assert!(first.next() > first);
        assert_ne!(first, first.next());
    }
}
