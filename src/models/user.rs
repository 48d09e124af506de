//! User model

use serde::{Deserialize, Serialize};

use super::wire::null_as_default;
use crate::utils::errors::{Result, SeesError};
use crate::utils::helpers::is_valid_email;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub first_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub last_name: String,
    #[serde(default)]
    pub phone: Option<String>,
}

impl UserProfile {
    /// Full name, falling back to the email address
    pub fn display_name(&self) -> String {
        let name = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let name = name.trim();
        if name.is_empty() {
            self.email.clone()
        } else {
            name.to_string()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    pub password2: String,
}

impl RegisterRequest {
    /// Checks the backend would reject anyway, done before any request
    pub fn validate(&self) -> Result<()> {
        if !is_valid_email(&self.email) {
            return Err(SeesError::InvalidInput(format!("Invalid email address: {}", self.email)));
        }
        if self.password.is_empty() {
            return Err(SeesError::InvalidInput("Password is required".to_string()));
        }
        if self.password != self.password2 {
            return Err(SeesError::InvalidInput("Passwords do not match".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login answer: the user record, plus a token when the backend issues one
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(flatten)]
    pub user: UserProfile,
    #[serde(default, alias = "access")]
    pub token: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}
