//! Viewer session
//!
//! The session is the explicit carrier of viewer identity. Operations that
//! need to know who is looking take a `&Session` instead of reading shared
//! storage.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::SessionConfig;
use crate::models::{Event, LoginResponse, UserProfile, ViewerRole};
use crate::utils::errors::{SeesError, Result};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    user_id: Option<i64>,
    token: Option<String>,
}

impl Session {
    /// Session with nobody logged in
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn new(user_id: Option<i64>, token: Option<String>) -> Self {
        Self { user_id, token }
    }

    pub fn from_config(config: &SessionConfig) -> Self {
        Self::new(config.user_id, config.token.clone())
    }

    /// Session established by a successful login
    pub fn from_login(response: &LoginResponse) -> Self {
        Self::new(Some(response.user.id), response.token.clone())
    }

    pub fn user_id(&self) -> Option<i64> {
        self.user_id
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some() || self.user_id.is_some()
    }

    /// Viewer id, or an authentication error when nobody is known
    pub fn viewer_id(&self) -> Result<i64> {
        self.user_id.ok_or_else(|| {
            SeesError::Authentication("No viewer identity in session".to_string())
        })
    }

    /// Record the identity learned from a profile fetch
    pub fn set_profile(&mut self, profile: &UserProfile) {
        if self.user_id != Some(profile.id) {
            debug!(user_id = profile.id, "Session viewer identity updated");
        }
        self.user_id = Some(profile.id);
    }

    /// Role of this viewer on the given event, honoring a backend label first
    pub fn role_on(&self, event: &Event) -> Option<ViewerRole> {
        event
            .role
            .or_else(|| self.user_id.and_then(|id| event.role_for(id)))
    }
}
