//! Helper functions and utilities
//!
//! This module contains common formatting helpers used by the library and the CLI.

use chrono::{DateTime, Utc};

/// Format a ticket price; zero, negative and absent prices are free
pub fn format_price(price: Option<f64>) -> String {
    match price {
        Some(amount) if amount > 0.0 => format!("${:.2}", amount),
        _ => "Free".to_string(),
    }
}

/// Format an event date for display
pub fn format_event_date(date: Option<DateTime<Utc>>) -> String {
    match date {
        Some(date) => date.format("%B %-d, %Y at %I:%M %p UTC").to_string(),
        None => "Date not specified".to_string(),
    }
}

/// Format a timestamp for logs and compact listings
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d %H:%M UTC").to_string()
}

/// Truncate text to a maximum number of characters with ellipsis
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let kept: String = text.chars().take(max_chars).collect();
        format!("{}...", kept.trim_end())
    }
}

/// Case-insensitive substring match used by event search
pub fn contains_ignore_case(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

/// Validate email format
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.starts_with('.'),
        None => false,
    }
}
