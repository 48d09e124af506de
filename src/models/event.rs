//! Event model

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::content::{Material, Quiz};
use super::role::ViewerRole;
use super::wire::{member_ids, null_as_default, parsed, parsed_or_default, price, skip_invalid, text, timestamp};
use crate::utils::errors::{SeesError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    #[default]
    InPerson,
    Virtual,
    Hybrid,
}

impl EventType {
    pub fn label(self) -> &'static str {
        match self {
            EventType::InPerson => "In-Person",
            EventType::Virtual => "Virtual",
            EventType::Hybrid => "Hybrid",
        }
    }

    pub fn needs_physical_location(self) -> bool {
        matches!(self, EventType::InPerson | EventType::Hybrid)
    }

    pub fn needs_virtual_location(self) -> bool {
        matches!(self, EventType::Virtual | EventType::Hybrid)
    }
}

impl std::str::FromStr for EventType {
    type Err = SeesError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "in_person" => Ok(EventType::InPerson),
            "virtual" => Ok(EventType::Virtual),
            "hybrid" => Ok(EventType::Hybrid),
            other => Err(SeesError::InvalidInput(format!("Unknown event type: {}", other))),
        }
    }
}

/// Event snapshot as returned by the backend.
///
/// Decoding is lenient: absent or null optional fields become empty values
/// so a half-filled record still classifies and renders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "timestamp")]
    pub date: Option<DateTime<Utc>>,
    /// Unknown labels fall back to in-person
    #[serde(default, deserialize_with = "parsed_or_default")]
    pub event_type: EventType,
    #[serde(default, deserialize_with = "text")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub virtual_location: Option<String>,
    #[serde(default, deserialize_with = "price")]
    pub ticket_price: Option<f64>,
    #[serde(default, deserialize_with = "member_ids")]
    pub organizers: BTreeSet<i64>,
    #[serde(default, deserialize_with = "member_ids")]
    pub speakers: BTreeSet<i64>,
    #[serde(default, deserialize_with = "member_ids")]
    pub attendees: BTreeSet<i64>,
    #[serde(rename = "has_unread_update", alias = "unread_update", default, deserialize_with = "null_as_default")]
    pub unread_update: bool,
    #[serde(default, deserialize_with = "skip_invalid")]
    pub quizzes: Vec<Quiz>,
    #[serde(default, deserialize_with = "skip_invalid")]
    pub materials: Vec<Material>,
    /// Role label some feeds attach to each event; unrecognised labels are ignored
    #[serde(default, deserialize_with = "parsed", skip_serializing_if = "Option::is_none")]
    pub role: Option<ViewerRole>,
}

impl Event {
    /// Highest-precedence role the given user holds on this event
    pub fn role_for(&self, user_id: i64) -> Option<ViewerRole> {
        if self.organizers.contains(&user_id) {
            Some(ViewerRole::Organizer)
        } else if self.speakers.contains(&user_id) {
            Some(ViewerRole::Speaker)
        } else if self.attendees.contains(&user_id) {
            Some(ViewerRole::Attendee)
        } else {
            None
        }
    }

    /// Zero, negative and absent prices all mean free
    pub fn is_free(&self) -> bool {
        self.ticket_price.map_or(true, |amount| amount <= 0.0)
    }

    pub fn is_attending(&self, user_id: i64) -> bool {
        self.attendees.contains(&user_id)
    }

    /// Physical location, with blank strings treated as absent
    pub fn physical_location(&self) -> Option<&str> {
        self.location.as_deref().map(str::trim).filter(|l| !l.is_empty())
    }

    /// Virtual location, with blank strings treated as absent
    pub fn virtual_link(&self) -> Option<&str> {
        self.virtual_location.as_deref().map(str::trim).filter(|l| !l.is_empty())
    }

    /// Editable copy of this event for create/update requests
    pub fn to_draft(&self) -> EventDraft {
        EventDraft {
            title: self.title.clone(),
            description: self.description.clone(),
            date: self.date,
            event_type: self.event_type,
            location: self.location.clone(),
            virtual_location: self.virtual_location.clone(),
            ticket_price: self.ticket_price,
            organizers: self.organizers.iter().copied().collect(),
            speakers: self.speakers.iter().copied().collect(),
            attendees: self.attendees.iter().copied().collect(),
            quizzes: self.quizzes.clone(),
            materials: self.materials.clone(),
        }
    }
}

/// Payload for creating or replacing an event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDraft {
    pub title: String,
    pub description: String,
    pub date: Option<DateTime<Utc>>,
    pub event_type: EventType,
    pub location: Option<String>,
    pub virtual_location: Option<String>,
    pub ticket_price: Option<f64>,
    pub organizers: Vec<i64>,
    pub speakers: Vec<i64>,
    pub attendees: Vec<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub quizzes: Vec<Quiz>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub materials: Vec<Material>,
}

impl EventDraft {
    /// Check the rules the backend enforces on create and update
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(SeesError::InvalidInput("Event title is required".to_string()));
        }

        if self.date.is_none() {
            return Err(SeesError::InvalidInput("Event date is required".to_string()));
        }

        let has_location = self.location.as_deref().is_some_and(|l| !l.trim().is_empty());
        let has_link = self.virtual_location.as_deref().is_some_and(|l| !l.trim().is_empty());

        match self.event_type {
            EventType::Virtual if !has_link => {
                return Err(SeesError::InvalidInput(
                    "A virtual event must have a virtual location (e.g., Zoom link)".to_string()
                ));
            }
            EventType::InPerson if !has_location => {
                return Err(SeesError::InvalidInput(
                    "An in-person event must have a physical location".to_string()
                ));
            }
            EventType::Hybrid if !has_location || !has_link => {
                return Err(SeesError::InvalidInput(
                    "A hybrid event must have both a physical and virtual location".to_string()
                ));
            }
            _ => {}
        }

        if let Some(link) = self.virtual_location.as_deref().filter(|l| !l.trim().is_empty()) {
            url::Url::parse(link.trim()).map_err(|e| {
                SeesError::InvalidInput(format!("Virtual location is not a valid URL: {}", e))
            })?;
        }

        if self.ticket_price.is_some_and(|amount| amount < 0.0) {
            return Err(SeesError::InvalidInput("Ticket price cannot be negative".to_string()));
        }

        for quiz in &self.quizzes {
            quiz.validate()?;
        }

        Ok(())
    }
}
