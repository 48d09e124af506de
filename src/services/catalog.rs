//! Searchable event listing for the dashboard

use chrono::{DateTime, Utc};

use crate::models::{Event, EventType};
use crate::services::classifier::ClassifiedEvents;
use crate::utils::helpers::contains_ignore_case;

/// Deduplicated event list with text search
#[derive(Debug, Clone, Default)]
pub struct EventCatalog {
    events: Vec<Event>,
}

impl EventCatalog {
    pub fn new(events: Vec<Event>) -> Self {
        Self { events }
    }

    pub fn from_classified(classified: &ClassifiedEvents) -> Self {
        Self::new(classified.merged())
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn get(&self, event_id: i64) -> Option<&Event> {
        self.events.iter().find(|e| e.id == event_id)
    }

    /// Events whose title, description or location contain the query.
    ///
    /// A blank query matches everything.
    pub fn search(&self, query: &str) -> Vec<&Event> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.events.iter().collect();
        }

        self.events
            .iter()
            .filter(|event| {
                contains_ignore_case(&event.title, &needle)
                    || contains_ignore_case(&event.description, &needle)
                    || event
                        .location
                        .as_deref()
                        .is_some_and(|location| contains_ignore_case(location, &needle))
            })
            .collect()
    }

    pub fn of_type(&self, event_type: EventType) -> Vec<&Event> {
        self.events.iter().filter(|e| e.event_type == event_type).collect()
    }

    /// Events scheduled at or after `now`, soonest first
    pub fn upcoming(&self, now: DateTime<Utc>) -> Vec<&Event> {
        let mut upcoming: Vec<&Event> = self
            .events
            .iter()
            .filter(|e| e.date.is_some_and(|date| date >= now))
            .collect();
        upcoming.sort_by_key(|e| e.date);
        upcoming
    }

    /// Replace the stored copy of an event after a refetch
    pub fn replace(&mut self, event: Event) -> bool {
        match self.events.iter_mut().find(|e| e.id == event.id) {
            Some(slot) => {
                *slot = event;
                true
            }
            None => false,
        }
    }
}
