//! Client context
//!
//! Bundles settings, the viewer session, the HTTP backend and the services
//! built on it. The context owns the session; operations receive it
//! explicitly rather than looking it up from shared storage.

use std::sync::Arc;

use tracing::info;

use crate::api::{EventApi, HttpEventApi};
use crate::config::Settings;
use crate::models::UserProfile;
use crate::services::ServiceFactory;
use crate::state::Session;
use crate::utils::errors::Result;

#[derive(Debug, Clone)]
pub struct ClientContext {
    pub settings: Settings,
    pub session: Session,
    pub api: Arc<HttpEventApi>,
    pub services: ServiceFactory<HttpEventApi>,
}

impl ClientContext {
    /// Build a context from validated settings
    pub fn from_settings(settings: Settings) -> Result<Self> {
        settings.validate()?;
        let session = Session::from_config(&settings.session);
        Self::with_session(settings, session)
    }

    /// Build a context for a specific session, e.g. right after login
    pub fn with_session(settings: Settings, session: Session) -> Result<Self> {
        let api = Arc::new(HttpEventApi::new(&settings.api, &session)?);
        let services = ServiceFactory::new(Arc::clone(&api));

        Ok(Self {
            settings,
            session,
            api,
            services,
        })
    }

    /// Learn the viewer id from the profile endpoint when it is not known yet
    pub async fn resolve_viewer(&mut self) -> Result<Option<UserProfile>> {
        if self.session.user_id().is_some() {
            return Ok(None);
        }

        let profile = self.api.fetch_profile().await?;
        self.session.set_profile(&profile);
        info!(user_id = profile.id, "Viewer identity resolved from profile");
        Ok(Some(profile))
    }
}
