//! Services module
//!
//! This module contains the client-side business logic

pub mod attendance;
pub mod catalog;
pub mod classifier;
pub mod editor;
pub mod unread;
pub mod visibility;

// Re-export commonly used services
pub use attendance::AttendanceService;
pub use catalog::EventCatalog;
pub use classifier::{ClassifiedEvents, EventRoleClassifier};
pub use editor::{EditSession, EventEditor};
pub use unread::{UnreadUpdateTracker, UpdateState};
pub use visibility::{ContentVisibilityFilter, VisibilityService};

use std::sync::Arc;

use crate::api::EventApi;
use crate::models::{Event, ViewerRole};
use crate::state::Session;
use crate::utils::errors::Result;

/// Service factory wiring every service to one backend
#[derive(Debug)]
pub struct ServiceFactory<A> {
    pub api: Arc<A>,
    pub classifier: EventRoleClassifier,
    pub tracker: UnreadUpdateTracker<A>,
    pub visibility: VisibilityService<A>,
    pub attendance: AttendanceService<A>,
    pub editor: EventEditor<A>,
}

impl<A> Clone for ServiceFactory<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            classifier: self.classifier,
            tracker: self.tracker.clone(),
            visibility: self.visibility.clone(),
            attendance: self.attendance.clone(),
            editor: self.editor.clone(),
        }
    }
}

/// An opened event: the viewer's role and the content that role may see
#[derive(Debug, Clone)]
pub struct EventDetail {
    pub role: ViewerRole,
    pub event: Event,
    pub state: UpdateState,
    /// Set when acknowledging the update failed; the event stays unread
    pub acknowledge_error: Option<String>,
}

impl<A: EventApi> ServiceFactory<A> {
    /// Create a new ServiceFactory with all services initialized
    pub fn new(api: Arc<A>) -> Self {
        Self {
            classifier: EventRoleClassifier::new(),
            tracker: UnreadUpdateTracker::new(Arc::clone(&api)),
            visibility: VisibilityService::new(Arc::clone(&api)),
            attendance: AttendanceService::new(Arc::clone(&api)),
            editor: EventEditor::new(Arc::clone(&api)),
            api,
        }
    }

    /// Fetch the event feed and classify it for the session's viewer
    pub async fn load_my_events(&self, session: &Session) -> Result<ClassifiedEvents> {
        let feed = self.api.fetch_event_feed().await?;
        Ok(self.classifier.classify_feed(feed, session))
    }

    /// Fetch the classified feed as a searchable dashboard catalog
    pub async fn load_catalog(&self, session: &Session) -> Result<EventCatalog> {
        let classified = self.load_my_events(session).await?;
        Ok(EventCatalog::from_classified(&classified))
    }

    /// Open an event: fetch it, resolve the role, acknowledge the update
    /// and narrow quizzes and materials to what the role may see.
    ///
    /// `fallback_role` applies when the session cannot derive one, as when
    /// the role came from the listing the viewer clicked through.
    pub async fn open_event(
        &self,
        session: &Session,
        event_id: i64,
        fallback_role: Option<ViewerRole>,
    ) -> Result<EventDetail> {
        let mut event = self.api.fetch_event(event_id).await?;
        let role = session
            .role_on(&event)
            .or(fallback_role)
            .unwrap_or(ViewerRole::Attendee);

        let (state, acknowledge_error) = match self.tracker.mark_viewed(&mut event).await {
            Ok(state) => (state, None),
            Err(e) => (UpdateState::Unread, Some(e.user_message())),
        };

        Ok(EventDetail {
            role,
            event: ContentVisibilityFilter::project(&event, role),
            state,
            acknowledge_error,
        })
    }
}
