//! Test helpers module
//!
//! Builders for events and content, plus an in-memory [`EventApi`] that
//! records calls and can be told to fail.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use sees_client::api::{CheckoutOutcome, EventApi};
use sees_client::models::{ContentKind, Event, EventDraft, EventFeed, GroupedEvents, Material, Quiz, UserProfile};
use sees_client::utils::errors::{ApiError, Result, SeesError};

pub fn event(id: i64) -> Event {
    serde_json::from_value(serde_json::json!({
        "id": id,
        "title": format!("Event {}", id),
        "description": "Test event",
        "event_type": "in_person",
        "location": "Main Hall",
    }))
    .expect("valid event json")
}

pub fn unread_event(id: i64) -> Event {
    let mut event = event(id);
    event.unread_update = true;
    event
}

pub fn events(ids: &[i64]) -> Vec<Event> {
    ids.iter().copied().map(event).collect()
}

pub fn ids(events: &[Event]) -> Vec<i64> {
    events.iter().map(|e| e.id).collect()
}

pub fn quiz(id: i64, visible: bool) -> Quiz {
    Quiz {
        id,
        title: format!("Quiz {}", id),
        questions: vec![],
        visible,
    }
}

pub fn material(id: i64, visible: bool) -> Material {
    Material {
        id,
        name: format!("Material {}", id),
        file: format!("/media/material-{}.pdf", id),
        visible,
    }
}

pub fn profile(id: i64) -> UserProfile {
    UserProfile {
        id,
        email: format!("user{}@sees.dev", id),
        first_name: "Test".to_string(),
        last_name: format!("User{}", id),
        phone: None,
    }
}

fn network_error(endpoint: &str) -> SeesError {
    SeesError::Api(ApiError::Unavailable {
        endpoint: endpoint.to_string(),
    })
}

/// In-memory backend
pub struct FakeApi {
    pub profile: UserProfile,
    pub feed: Mutex<EventFeed>,
    pub events: Mutex<HashMap<i64, Event>>,
    pub fail_mark_viewed: AtomicBool,
    pub fail_updates: AtomicBool,
    pub failing_items: Mutex<HashSet<(ContentKind, i64)>>,
    pub checkout_url: Mutex<Option<String>>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeApi {
    pub fn new(viewer_id: i64) -> Self {
        Self {
            profile: profile(viewer_id),
            feed: Mutex::new(EventFeed::Grouped(GroupedEvents::default())),
            events: Mutex::new(HashMap::new()),
            fail_mark_viewed: AtomicBool::new(false),
            fail_updates: AtomicBool::new(false),
            failing_items: Mutex::new(HashSet::new()),
            checkout_url: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_feed(self, feed: EventFeed) -> Self {
        *self.feed.lock().unwrap() = feed;
        self
    }

    pub fn with_event(self, event: Event) -> Self {
        self.events.lock().unwrap().insert(event.id, event);
        self
    }

    pub fn failing_mark_viewed(self) -> Self {
        self.fail_mark_viewed.store(true, Ordering::SeqCst);
        self
    }

    pub fn failing_updates(self) -> Self {
        self.fail_updates.store(true, Ordering::SeqCst);
        self
    }

    pub fn failing_item(self, kind: ContentKind, item_id: i64) -> Self {
        self.failing_items.lock().unwrap().insert((kind, item_id));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

impl EventApi for FakeApi {
    async fn fetch_profile(&self) -> Result<UserProfile> {
        self.record("fetch_profile".to_string());
        Ok(self.profile.clone())
    }

    async fn fetch_event_feed(&self) -> Result<EventFeed> {
        self.record("fetch_event_feed".to_string());
        Ok(self.feed.lock().unwrap().clone())
    }

    async fn fetch_event(&self, event_id: i64) -> Result<Event> {
        self.record(format!("fetch_event:{}", event_id));
        self.events
            .lock()
            .unwrap()
            .get(&event_id)
            .cloned()
            .ok_or(SeesError::EventNotFound { event_id })
    }

    async fn update_event(&self, event_id: i64, draft: &EventDraft) -> Result<Event> {
        self.record(format!("update_event:{}", event_id));
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(network_error("api/events/"));
        }
        let mut events = self.events.lock().unwrap();
        let stored = events
            .get_mut(&event_id)
            .ok_or(SeesError::EventNotFound { event_id })?;
        stored.attendees = draft.attendees.iter().copied().collect();
        stored.speakers = draft.speakers.iter().copied().collect();
        stored.organizers = draft.organizers.iter().copied().collect();
        stored.title = draft.title.clone();
        stored.description = draft.description.clone();
        stored.date = draft.date;
        stored.event_type = draft.event_type;
        stored.location = draft.location.clone();
        stored.virtual_location = draft.virtual_location.clone();
        stored.ticket_price = draft.ticket_price;
        Ok(stored.clone())
    }

    async fn mark_viewed(&self, event_id: i64) -> Result<()> {
        self.record(format!("mark_viewed:{}", event_id));
        if self.fail_mark_viewed.load(Ordering::SeqCst) {
            return Err(network_error("api/events/mark-viewed/"));
        }
        if let Some(event) = self.events.lock().unwrap().get_mut(&event_id) {
            event.unread_update = false;
        }
        Ok(())
    }

    async fn set_visibility(&self, kind: ContentKind, item_id: i64, visible: bool) -> Result<()> {
        self.record(format!("set_visibility:{}:{}:{}", kind, item_id, visible));
        if self.failing_items.lock().unwrap().contains(&(kind, item_id)) {
            return Err(network_error(kind.collection_path()));
        }
        Ok(())
    }

    async fn checkout(&self, event_id: i64) -> Result<CheckoutOutcome> {
        self.record(format!("checkout:{}", event_id));
        match self.checkout_url.lock().unwrap().clone() {
            Some(url) => Ok(CheckoutOutcome::Redirect(url::Url::parse(&url)?)),
            None => {
                let viewer = self.profile.id;
                if let Some(event) = self.events.lock().unwrap().get_mut(&event_id) {
                    event.attendees.insert(viewer);
                }
                Ok(CheckoutOutcome::Registered)
            }
        }
    }
}
