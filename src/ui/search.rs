// SPDX-License-Identifier: MPL-2.0
//! Place search box floating over the map.
//!
//! Typing schedules a debounced lookup; the parent runs the timer and the
//! geocoder request and feeds the results back tagged with the ticket they
//! were issued for.

use crate::application::port::{GeocodeError, Place};
use crate::config::SearchConfig;
use crate::i18n::fluent::I18n;
use crate::ui::design_tokens::{sizing, spacing, typography};
use crate::ui::state::{Debouncer, Ticket};
use crate::ui::styles;
use iced::widget::{button, text_input, Column, Container, Row, Text};
use iced::{alignment, Element, Length};
use std::time::Duration;

/// Contextual data needed to render the search box.
pub struct ViewContext<'a> {
    pub i18n: &'a I18n,
    pub state: &'a State,
}

#[derive(Debug, Clone)]
pub enum Message {
    QueryChanged(String),
    DebounceElapsed(Ticket),
    ResultsLoaded {
        ticket: Ticket,
        result: Result<Vec<Place>, GeocodeError>,
    },
    ResultSelected(usize),
    Clear,
}

/// Work the parent must carry out.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    /// Sleep for `delay`, then send [`Message::DebounceElapsed`].
    Wait { ticket: Ticket, delay: Duration },
    /// Query the geocoder, then send [`Message::ResultsLoaded`].
    Lookup {
        ticket: Ticket,
        query: String,
        limit: usize,
    },
    /// Re-center the map on the chosen place.
    CenterOn(Place),
}

#[derive(Debug, Clone)]
pub struct State {
    query: String,
    results: Vec<Place>,
    debouncer: Debouncer,
    min_chars: usize,
    limit: usize,
}

impl State {
    #[must_use]
    pub fn new(config: &SearchConfig) -> Self {
        Self {
            query: String::new(),
            results: Vec::new(),
            debouncer: Debouncer::new(Duration::from_millis(config.debounce_ms)),
            min_chars: config
                .min_query_chars
                .max(crate::config::DEFAULT_MIN_QUERY_CHARS),
            limit: config.result_limit,
        }
    }

    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    #[must_use]
    pub fn results(&self) -> &[Place] {
        &self.results
    }

    fn trimmed_query(&self) -> &str {
        self.query.trim()
    }

    fn is_searchable(&self) -> bool {
        self.trimmed_query().chars().count() >= self.min_chars
    }

    pub fn update(&mut self, message: Message) -> Effect {
        match message {
            Message::QueryChanged(query) => {
                self.query = query;
                if self.is_searchable() {
                    Effect::Wait {
                        ticket: self.debouncer.schedule(),
                        delay: self.debouncer.delay(),
                    }
                } else {
                    self.debouncer.invalidate();
                    self.results.clear();
                    Effect::None
                }
            }
            Message::DebounceElapsed(ticket) => {
                if !self.debouncer.is_current(ticket) || !self.is_searchable() {
                    return Effect::None;
                }
                Effect::Lookup {
                    ticket,
                    query: self.trimmed_query().to_string(),
                    limit: self.limit,
                }
            }
            Message::ResultsLoaded { ticket, result } => {
                if !self.debouncer.is_current(ticket) {
                    tracing::debug!("dropping stale search results");
                    return Effect::None;
                }
                match result {
                    Ok(places) => self.results = places,
                    Err(err) => {
                        tracing::warn!(error = %err, "place search failed");
                        self.results.clear();
                    }
                }
                Effect::None
            }
            Message::ResultSelected(index) => {
                let Some(place) = self.results.get(index).cloned() else {
                    return Effect::None;
                };
                self.query.clone_from(&place.name);
                self.results.clear();
                self.debouncer.invalidate();
                Effect::CenterOn(place)
            }
            Message::Clear => {
                self.query.clear();
                self.results.clear();
                self.debouncer.invalidate();
                Effect::None
            }
        }
    }
}

pub fn view<'a>(ctx: ViewContext<'a>) -> Element<'a, Message> {
    let input = text_input(&ctx.i18n.tr("search-placeholder"), &ctx.state.query)
        .on_input(Message::QueryChanged)
        .padding(spacing::XS)
        .size(typography::BODY)
        .width(Length::Fill);

    let mut input_row = Row::new()
        .spacing(spacing::XXS)
        .align_y(alignment::Vertical::Center)
        .push(input);
    if !ctx.state.query.is_empty() {
        input_row = input_row.push(
            button(Text::new("×").size(typography::BODY_LG))
                .on_press(Message::Clear)
                .style(styles::button::unselected),
        );
    }

    let mut content = Column::new().spacing(spacing::XXS).push(input_row);
    for (index, place) in ctx.state.results.iter().enumerate() {
        content = content.push(
            button(Text::new(place.name.as_str()).size(typography::BODY_SM))
                .on_press(Message::ResultSelected(index))
                .width(Length::Fill)
                .style(styles::button::unselected),
        );
    }

    Container::new(content)
        .width(Length::Fixed(sizing::SEARCH_WIDTH))
        .padding(spacing::XS)
        .style(styles::container::panel)
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Coordinate;

    fn state() -> State {
        State::new(&SearchConfig::default())
    }

    fn place(name: &str) -> Place {
        Place {
            id: format!("place.{name}"),
            name: name.to_string(),
            center: Coordinate::new(48.85, 2.35).unwrap(),
        }
    }

    fn wait_ticket(effect: Effect) -> Ticket {
        match effect {
            Effect::Wait { ticket, .. } => ticket,
            other => panic!("expected Wait, got {other:?}"),
        }
    }

    #[test]
    fn short_query_never_schedules() {
        let mut state = state();
        assert_eq!(state.update(Message::QueryChanged("p".into())), Effect::None);
        assert_eq!(state.update(Message::QueryChanged("  p  ".into())), Effect::None);
        assert_eq!(state.update(Message::QueryChanged(String::new())), Effect::None);
    }

    #[test]
    fn short_query_clears_results() {
        let mut state = state();
        let ticket = wait_ticket(state.update(Message::QueryChanged("par".into())));
        state.update(Message::ResultsLoaded {
            ticket,
            result: Ok(vec![place("Paris")]),
        });
        assert_eq!(state.results().len(), 1);

        state.update(Message::QueryChanged("p".into()));
        assert!(state.results().is_empty());
    }

    #[test]
    fn only_last_keystroke_in_window_triggers_lookup() {
        let mut state = state();
        let t1 = wait_ticket(state.update(Message::QueryChanged("pa".into())));
        let t2 = wait_ticket(state.update(Message::QueryChanged("par".into())));
        let t3 = wait_ticket(state.update(Message::QueryChanged("pari".into())));

        assert_eq!(state.update(Message::DebounceElapsed(t1)), Effect::None);
        assert_eq!(state.update(Message::DebounceElapsed(t2)), Effect::None);
        assert_eq!(
            state.update(Message::DebounceElapsed(t3)),
            Effect::Lookup {
                ticket: t3,
                query: "pari".into(),
                limit: crate::config::DEFAULT_RESULT_LIMIT,
            }
        );
    }

    #[test]
    fn single_character_never_schedules_even_if_configured() {
        let config = crate::config::Config {
            search: SearchConfig {
                min_query_chars: 1,
                ..SearchConfig::default()
            },
            ..crate::config::Config::default()
        }
        .sanitized();

        let mut state = State::new(&config.search);
        assert_eq!(state.update(Message::QueryChanged("p".into())), Effect::None);

        let mut unsanitized = State::new(&SearchConfig {
            min_query_chars: 1,
            ..SearchConfig::default()
        });
        assert_eq!(
            unsanitized.update(Message::QueryChanged(" p ".into())),
            Effect::None
        );
        assert!(matches!(
            unsanitized.update(Message::QueryChanged("pa".into())),
            Effect::Wait { .. }
        ));
    }

    #[test]
    fn wait_uses_configured_delay() {
        let mut state = State::new(&SearchConfig {
            debounce_ms: 120,
            ..SearchConfig::default()
        });
        match state.update(Message::QueryChanged("rome".into())) {
            Effect::Wait { delay, .. } => assert_eq!(delay, Duration::from_millis(120)),
            other => panic!("expected Wait, got {other:?}"),
        }
    }

    #[test]
    fn lookup_uses_trimmed_query() {
        let mut state = state();
        let ticket = wait_ticket(state.update(Message::QueryChanged("  lyon ".into())));
        match state.update(Message::DebounceElapsed(ticket)) {
            Effect::Lookup { query, .. } => assert_eq!(query, "lyon"),
            other => panic!("expected Lookup, got {other:?}"),
        }
    }

    #[test]
    fn stale_results_are_dropped() {
        let mut state = state();
        let old = wait_ticket(state.update(Message::QueryChanged("ber".into())));
        let _new = wait_ticket(state.update(Message::QueryChanged("berlin".into())));

        state.update(Message::ResultsLoaded {
            ticket: old,
            result: Ok(vec![place("Bern")]),
        });
        assert!(state.results().is_empty());
    }

    #[test]
    fn geocoding_error_clears_results() {
        let mut state = state();
        let ticket = wait_ticket(state.update(Message::QueryChanged("oslo".into())));
        state.update(Message::ResultsLoaded {
            ticket,
            result: Ok(vec![place("Oslo")]),
        });

        let ticket = wait_ticket(state.update(Message::QueryChanged("oslo n".into())));
        state.update(Message::ResultsLoaded {
            ticket,
            result: Err(GeocodeError::Http(500)),
        });
        assert!(state.results().is_empty());
    }

    #[test]
    fn selecting_result_recenters_and_clears() {
        let mut state = state();
        let ticket = wait_ticket(state.update(Message::QueryChanged("par".into())));
        state.update(Message::ResultsLoaded {
            ticket,
            result: Ok(vec![place("Paris, France"), place("Paris, Texas")]),
        });

        let effect = state.update(Message::ResultSelected(0));
        assert_eq!(effect, Effect::CenterOn(place("Paris, France")));
        assert_eq!(state.query(), "Paris, France");
        assert!(state.results().is_empty());
    }

    #[test]
    fn clear_resets_query_and_outstanding_timer() {
        let mut state = state();
        let ticket = wait_ticket(state.update(Message::QueryChanged("nice".into())));
        state.update(Message::Clear);

        assert_eq!(state.query(), "");
        assert_eq!(state.update(Message::DebounceElapsed(ticket)), Effect::None);
    }
}
