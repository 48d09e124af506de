//! Event feed shapes returned by `GET /api/events/`

use serde::{Deserialize, Serialize};

use super::event::Event;
use super::wire::null_as_default;

/// Events already split by the backend into the viewer's three relationships
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupedEvents {
    #[serde(default, deserialize_with = "null_as_default")]
    pub organized_events: Vec<Event>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub speaking_events: Vec<Event>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub attending_events: Vec<Event>,
}

/// The event list arrives either grouped by role or as one flat list whose
/// entries may carry a role hint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventFeed {
    Flat(Vec<Event>),
    Grouped(GroupedEvents),
}

impl EventFeed {
    pub fn len(&self) -> usize {
        match self {
            EventFeed::Flat(events) => events.len(),
            EventFeed::Grouped(groups) => {
                groups.organized_events.len() + groups.speaking_events.len() + groups.attending_events.len()
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
