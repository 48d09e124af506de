//! Data models module
//!
//! This module contains all data structures exchanged with the SEES backend

pub mod content;
pub mod event;
pub mod feed;
pub mod role;
pub mod user;
mod wire;

// Re-export commonly used models
pub use content::{ContentKind, GatedContent, Material, Question, QuestionKind, Quiz};
pub use event::{Event, EventDraft, EventType};
pub use feed::{EventFeed, GroupedEvents};
pub use role::ViewerRole;
pub use user::{LoginRequest, LoginResponse, RegisterRequest, UpdateProfileRequest, UserProfile};
pub use wire::parse_timestamp;
