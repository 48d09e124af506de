//! Unread update tracking
//!
//! An event is `Unread` while the backend reports an organizer change the
//! viewer has not acknowledged. Opening the event moves it to `Read`, but
//! only once the backend confirmed the mark-viewed call. The client has no
//! way back to `Unread`.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use crate::api::EventApi;
use crate::models::Event;
use crate::utils::errors::Result;
use crate::utils::logging;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateState {
    Unread,
    Read,
}

impl UpdateState {
    pub fn of(event: &Event) -> Self {
        if event.unread_update {
            UpdateState::Unread
        } else {
            UpdateState::Read
        }
    }
}

#[derive(Debug)]
pub struct UnreadUpdateTracker<A> {
    api: Arc<A>,
}

impl<A> Clone for UnreadUpdateTracker<A> {
    fn clone(&self) -> Self {
        Self { api: Arc::clone(&self.api) }
    }
}

impl<A: EventApi> UnreadUpdateTracker<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self { api }
    }

    /// Acknowledge the event's latest update after the viewer opened it.
    ///
    /// Already-read events are left alone without contacting the backend.
    /// When the backend call fails the event stays unread and the error is
    /// returned; nothing else on the event is touched.
    pub async fn mark_viewed(&self, event: &mut Event) -> Result<UpdateState> {
        if UpdateState::of(event) == UpdateState::Read {
            debug!(event_id = event.id, "Event already read, nothing to acknowledge");
            return Ok(UpdateState::Read);
        }

        match self.api.mark_viewed(event.id).await {
            Ok(()) => {
                event.unread_update = false;
                logging::log_event_action(event.id, "mark_viewed", None, None);
                Ok(UpdateState::Read)
            }
            Err(e) => {
                warn!(event_id = event.id, error = %e, "Mark viewed failed, event stays unread");
                Err(e)
            }
        }
    }

    /// Acknowledge the event with the given id inside a list, if present
    pub async fn mark_viewed_in(&self, events: &mut [Event], event_id: i64) -> Result<Option<UpdateState>> {
        match events.iter_mut().find(|e| e.id == event_id) {
            Some(event) => self.mark_viewed(event).await.map(Some),
            None => Ok(None),
        }
    }
}
