//! SEES backend access
//!
//! [`EventApi`] is the seam between the client-side logic and the REST
//! backend. [`HttpEventApi`] talks to the real server; tests substitute an
//! in-memory implementation.

pub mod client;

pub use client::HttpEventApi;

use std::future::Future;

use crate::models::{ContentKind, Event, EventDraft, EventFeed, UserProfile};
use crate::utils::errors::Result;

/// Result of starting a checkout for an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutOutcome {
    /// Free event: the viewer is registered immediately
    Registered,
    /// Paid event: the viewer must complete payment at this URL
    Redirect(url::Url),
}

/// Backend operations the client logic depends on
pub trait EventApi: Send + Sync {
    /// Current viewer's profile
    fn fetch_profile(&self) -> impl Future<Output = Result<UserProfile>> + Send;

    /// Event list for the current viewer, grouped or flat
    fn fetch_event_feed(&self) -> impl Future<Output = Result<EventFeed>> + Send;

    fn fetch_event(&self, event_id: i64) -> impl Future<Output = Result<Event>> + Send;

    /// Replace an event's editable fields
    fn update_event(&self, event_id: i64, draft: &EventDraft) -> impl Future<Output = Result<Event>> + Send;

    /// Acknowledge the latest update on an event. Idempotent on the backend.
    fn mark_viewed(&self, event_id: i64) -> impl Future<Output = Result<()>> + Send;

    /// Set the `visible` flag of a quiz or material
    fn set_visibility(&self, kind: ContentKind, item_id: i64, visible: bool) -> impl Future<Output = Result<()>> + Send;

    fn checkout(&self, event_id: i64) -> impl Future<Output = Result<CheckoutOutcome>> + Send;
}
