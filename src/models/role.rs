//! Viewer role model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Relationship between the current viewer and an event.
///
/// Variants are declared in precedence order: when a viewer holds several
/// roles on one event, the smallest variant wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewerRole {
    Organizer,
    Speaker,
    Attendee,
}

impl ViewerRole {
    /// All roles, highest precedence first
    pub const ALL: [ViewerRole; 3] = [ViewerRole::Organizer, ViewerRole::Speaker, ViewerRole::Attendee];

    /// Organizers edit events and control quiz/material visibility
    pub fn can_manage(self) -> bool {
        matches!(self, ViewerRole::Organizer)
    }

    /// Heading used for the bucket this role lands in
    pub fn bucket_label(self) -> &'static str {
        match self {
            ViewerRole::Organizer => "Organizing",
            ViewerRole::Speaker => "Speaking",
            ViewerRole::Attendee => "Attending",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ViewerRole::Organizer => "organizer",
            ViewerRole::Speaker => "speaker",
            ViewerRole::Attendee => "attendee",
        }
    }
}

impl fmt::Display for ViewerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewerRole {
    type Err = crate::utils::errors::SeesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "organizer" => Ok(ViewerRole::Organizer),
            "speaker" => Ok(ViewerRole::Speaker),
            "attendee" => Ok(ViewerRole::Attendee),
            other => Err(crate::utils::errors::SeesError::InvalidInput(
                format!("Unknown viewer role: {}", other)
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precedence_order() {
        assert!(ViewerRole::Organizer < ViewerRole::Speaker);
        assert!(ViewerRole::Speaker < ViewerRole::Attendee);
        assert_eq!(
            [ViewerRole::Attendee, ViewerRole::Organizer].iter().min(),
            Some(&ViewerRole::Organizer)
        );
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!("Organizer".parse::<ViewerRole>().unwrap(), ViewerRole::Organizer);
        assert_eq!(ViewerRole::Speaker.to_string(), "speaker");
        assert!("admin".parse::<ViewerRole>().is_err());
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&ViewerRole::Attendee).unwrap();
        assert_eq!(json, "\"attendee\"");
        let role: ViewerRole = serde_json::from_str("\"organizer\"").unwrap();
        assert!(role.can_manage());
    }
}
