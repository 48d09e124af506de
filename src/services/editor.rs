//! Organizer event editing
//!
//! Opening the editor acknowledges the event's unread update, like opening
//! the detail view. Saving replaces the local event only once the backend
//! accepted the new fields.

use std::sync::Arc;

use tracing::warn;

use super::unread::{UnreadUpdateTracker, UpdateState};
use crate::api::EventApi;
use crate::models::{Event, EventDraft, ViewerRole};
use crate::state::Session;
use crate::utils::errors::{Result, SeesError};
use crate::utils::logging;

/// An editor opened on one event
#[derive(Debug, Clone)]
pub struct EditSession {
    /// Editable copy of the event's fields
    pub draft: EventDraft,
    pub state: UpdateState,
    /// Set when acknowledging the update failed; the draft is still usable
    pub acknowledge_error: Option<String>,
}

#[derive(Debug)]
pub struct EventEditor<A> {
    api: Arc<A>,
    tracker: UnreadUpdateTracker<A>,
}

impl<A> Clone for EventEditor<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            tracker: self.tracker.clone(),
        }
    }
}

fn ensure_organizer(session: &Session, event: &Event, action: &str) -> Result<()> {
    let role = session.role_on(event);
    if role == Some(ViewerRole::Organizer) {
        return Ok(());
    }
    logging::log_permission_denied(action, role, event.id);
    Err(SeesError::PermissionDenied("Only organizers can edit an event".to_string()))
}

impl<A: EventApi> EventEditor<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self {
            tracker: UnreadUpdateTracker::new(Arc::clone(&api)),
            api,
        }
    }

    /// Start editing: check the organizer role and acknowledge the update
    pub async fn open(&self, session: &Session, event: &mut Event) -> Result<EditSession> {
        ensure_organizer(session, event, "open_editor")?;

        let (state, acknowledge_error) = match self.tracker.mark_viewed(event).await {
            Ok(state) => (state, None),
            Err(e) => (UpdateState::Unread, Some(e.user_message())),
        };

        Ok(EditSession {
            draft: event.to_draft(),
            state,
            acknowledge_error,
        })
    }

    /// Validate and submit the draft.
    ///
    /// Invalid drafts never reach the backend. On failure the local event is
    /// left exactly as it was.
    pub async fn save(&self, session: &Session, event: &mut Event, draft: &EventDraft) -> Result<()> {
        ensure_organizer(session, event, "edit_event")?;
        draft.validate()?;

        let updated = self.api.update_event(event.id, draft).await.map_err(|e| {
            warn!(event_id = event.id, error = %e, "Event update rejected, keeping previous copy");
            e
        })?;

        *event = updated;
        logging::log_event_action(event.id, "edit", session.user_id(), Some(&event.title));
        Ok(())
    }
}
