// SPDX-License-Identifier: MPL-2.0
//! Read-side ordering of pins.

use crate::domain::Pin;
use std::cmp::Reverse;

/// Pins ordered by visit date, most recent first.
///
/// The sort is stable: pins visited on the same day keep their relative
/// order from `pins` (newest creation first, as the gateway returns them).
#[must_use]
pub fn by_visit_date(pins: &[Pin]) -> Vec<&Pin> {
    let mut ordered: Vec<&Pin> = pins.iter().collect();
    ordered.sort_by_key(|pin| Reverse(pin.visit_date));
    ordered
}

/// Sorts pins in place by creation time, newest first.
pub fn sort_newest_first(pins: &mut [Pin]) {
    pins.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Coordinate, PinId, Title, UserId};
    use chrono::{NaiveDate, TimeZone, Utc};

    fn pin(id: &str, visit: (i32, u32, u32), created_secs: i64) -> Pin {
        Pin {
            id: PinId::new(id),
            coordinate: Coordinate::new(0.0, 0.0).unwrap(),
            title: Title::parse(id).unwrap(),
            description: None,
            visit_date: NaiveDate::from_ymd_opt(visit.0, visit.1, visit.2).unwrap(),
            photos: Vec::new(),
            user_id: UserId::new("u1"),
            created_at: Utc.timestamp_opt(created_secs, 0).unwrap(),
        }
    }

    fn ids(pins: &[&Pin]) -> Vec<String> {
        pins.iter().map(|p| p.id.to_string()).collect()
    }

    #[test]
    fn visit_dates_render_most_recent_first() {
        let pins = vec![
            pin("d1", (2021, 3, 1), 30),
            pin("d3", (2023, 7, 14), 10),
            pin("d2", (2022, 1, 9), 20),
        ];
        assert_eq!(ids(&by_visit_date(&pins)), ["d3", "d2", "d1"]);
    }

    #[test]
    fn same_day_keeps_input_order() {
        let pins = vec![
            pin("first", (2022, 5, 5), 2),
            pin("second", (2022, 5, 5), 1),
            pin("older", (2020, 1, 1), 3),
        ];
        assert_eq!(ids(&by_visit_date(&pins)), ["first", "second", "older"]);
    }

    #[test]
    fn empty_input_yields_empty_timeline() {
        assert!(by_visit_date(&[]).is_empty());
    }

    #[test]
    fn newest_creation_first() {
        let mut pins = vec![
            pin("a", (2020, 1, 1), 100),
            pin("b", (2020, 1, 1), 300),
            pin("c", (2020, 1, 1), 200),
        ];
        sort_newest_first(&mut pins);
        let order: Vec<_> = pins.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(order, ["b", "c", "a"]);
    }
}
