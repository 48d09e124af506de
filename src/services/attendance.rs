//! Attendance and ticket checkout

use std::sync::Arc;

use tracing::{info, warn};

use crate::api::{CheckoutOutcome, EventApi};
use crate::models::Event;
use crate::state::Session;
use crate::utils::errors::{Result, SeesError};
use crate::utils::logging;

#[derive(Debug)]
pub struct AttendanceService<A> {
    api: Arc<A>,
}

impl<A> Clone for AttendanceService<A> {
    fn clone(&self) -> Self {
        Self { api: Arc::clone(&self.api) }
    }
}

impl<A: EventApi> AttendanceService<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self { api }
    }

    /// Add or remove the viewer from the event's attendees.
    ///
    /// Returns whether the viewer is attending afterwards. The local event
    /// is replaced by the backend's copy only on success.
    pub async fn toggle_attendance(&self, session: &Session, event: &mut Event) -> Result<bool> {
        let viewer = session.viewer_id()?;
        let attending = event.is_attending(viewer);

        let mut draft = event.to_draft();
        if attending {
            draft.attendees.retain(|id| *id != viewer);
        } else {
            draft.attendees.push(viewer);
        }

        let updated = self.api.update_event(event.id, &draft).await.map_err(|e| {
            warn!(event_id = event.id, user_id = viewer, error = %e, "Attendance change failed");
            e
        })?;

        *event = updated;
        let now_attending = event.is_attending(viewer);
        logging::log_event_action(
            event.id,
            if now_attending { "attend" } else { "unattend" },
            Some(viewer),
            None,
        );
        Ok(now_attending)
    }

    /// Start checkout for the event.
    ///
    /// Free registrations are confirmed at once and the event is refreshed
    /// so the attendee list is current. Paid events hand back the payment URL.
    pub async fn checkout(&self, session: &Session, event: &mut Event) -> Result<CheckoutOutcome> {
        if !session.is_authenticated() {
            return Err(SeesError::Authentication(
                "You need to be logged in to purchase tickets".to_string()
            ));
        }

        let outcome = self.api.checkout(event.id).await?;
        match &outcome {
            CheckoutOutcome::Registered => {
                info!(event_id = event.id, "Registered for event");
                *event = self.api.fetch_event(event.id).await?;
            }
            CheckoutOutcome::Redirect(url) => {
                info!(event_id = event.id, url = %url, "Checkout requires payment");
            }
        }
        Ok(outcome)
    }
}
