//! SEES client
//!
//! Client library for the SEES educational events platform. It classifies a
//! viewer's events into organizing, speaking and attending buckets, narrows
//! quizzes and materials to what each role may see, and tracks unread
//! organizer updates, all on top of a typed client for the SEES REST API.

pub mod api;
pub mod config;
pub mod models;
pub mod services;
pub mod state;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{SeesError, Result};

// Re-export main components for easy access
pub use api::{EventApi, HttpEventApi};
pub use services::{ContentVisibilityFilter, EventRoleClassifier, ServiceFactory, UnreadUpdateTracker};
pub use state::{ClientContext, Session};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
