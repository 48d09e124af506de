//! Event role classification
//!
//! Splits the viewer's events into Organizing, Speaking and Attending
//! buckets. An event listed under several relationships is kept only in the
//! highest-precedence bucket (organizer, then speaker, then attendee), and an
//! id repeated within one input keeps its first occurrence. Bucket order
//! follows input order.

use std::collections::HashSet;

use serde::Serialize;
use tracing::debug;

use crate::models::{Event, EventFeed, GroupedEvents, ViewerRole};
use crate::state::Session;
use crate::utils::logging;

/// Disjoint, deduplicated role buckets for one viewer
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClassifiedEvents {
    pub organizing: Vec<Event>,
    pub speaking: Vec<Event>,
    pub attending: Vec<Event>,
    /// Flat-feed events the viewer has no relationship with
    pub skipped: usize,
}

impl ClassifiedEvents {
    pub fn bucket(&self, role: ViewerRole) -> &[Event] {
        match role {
            ViewerRole::Organizer => &self.organizing,
            ViewerRole::Speaker => &self.speaking,
            ViewerRole::Attendee => &self.attending,
        }
    }

    /// Bucket an event landed in
    pub fn role_of(&self, event_id: i64) -> Option<ViewerRole> {
        ViewerRole::ALL
            .into_iter()
            .find(|role| self.bucket(*role).iter().any(|e| e.id == event_id))
    }

    /// Every event with the role it was classified under, bucket by bucket
    pub fn iter(&self) -> impl Iterator<Item = (ViewerRole, &Event)> {
        ViewerRole::ALL
            .into_iter()
            .flat_map(move |role| self.bucket(role).iter().map(move |event| (role, event)))
    }

    /// Deduplicated union in bucket order, as the dashboard lists them
    pub fn merged(&self) -> Vec<Event> {
        self.iter().map(|(_, event)| event.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.organizing.len() + self.speaking.len() + self.attending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of events still flagged with an unread organizer update
    pub fn unread_count(&self) -> usize {
        self.iter().filter(|(_, event)| event.unread_update).count()
    }
}

/// Stateless classifier over already-fetched event snapshots
#[derive(Debug, Clone, Copy, Default)]
pub struct EventRoleClassifier;

impl EventRoleClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Classify three possibly overlapping role lists
    pub fn classify(
        &self,
        organized: Vec<Event>,
        speaking: Vec<Event>,
        attending: Vec<Event>,
    ) -> ClassifiedEvents {
        let (classified, dropped) = split(organized, speaking, attending);
        log_outcome(&classified, dropped);
        classified
    }

    pub fn classify_grouped(&self, groups: GroupedEvents) -> ClassifiedEvents {
        self.classify(groups.organized_events, groups.speaking_events, groups.attending_events)
    }

    /// Classify a flat list, using each event's role label when present and
    /// the viewer's membership otherwise
    pub fn classify_flat(&self, events: Vec<Event>, session: &Session) -> ClassifiedEvents {
        let mut organized = Vec::new();
        let mut speaking = Vec::new();
        let mut attending = Vec::new();
        let mut skipped = 0;

        for event in events {
            match session.role_on(&event) {
                Some(ViewerRole::Organizer) => organized.push(event),
                Some(ViewerRole::Speaker) => speaking.push(event),
                Some(ViewerRole::Attendee) => attending.push(event),
                None => {
                    debug!(event_id = event.id, "Event has no relationship with viewer");
                    skipped += 1;
                }
            }
        }

        let (mut classified, dropped) = split(organized, speaking, attending);
        classified.skipped = skipped;
        log_outcome(&classified, dropped);
        classified
    }

    /// Classify whichever feed shape the backend returned
    pub fn classify_feed(&self, feed: EventFeed, session: &Session) -> ClassifiedEvents {
        match feed {
            EventFeed::Grouped(groups) => self.classify_grouped(groups),
            EventFeed::Flat(events) => self.classify_flat(events, session),
        }
    }
}

/// Buckets plus the number of entries dropped as repeats
fn split(organized: Vec<Event>, speaking: Vec<Event>, attending: Vec<Event>) -> (ClassifiedEvents, usize) {
    let total = organized.len() + speaking.len() + attending.len();
    let mut seen = HashSet::new();
    let classified = ClassifiedEvents {
        organizing: keep_unseen(organized, &mut seen),
        speaking: keep_unseen(speaking, &mut seen),
        attending: keep_unseen(attending, &mut seen),
        skipped: 0,
    };
    let dropped = total - classified.len();
    (classified, dropped)
}

fn keep_unseen(events: Vec<Event>, seen: &mut HashSet<i64>) -> Vec<Event> {
    events
        .into_iter()
        .filter(|event| seen.insert(event.id))
        .collect()
}

fn log_outcome(classified: &ClassifiedEvents, dropped: usize) {
    logging::log_classification(
        classified.organizing.len(),
        classified.speaking.len(),
        classified.attending.len(),
        dropped,
        classified.skipped,
    );
}
