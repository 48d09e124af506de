//! Quiz and material models
//!
//! Both kinds of event content carry an organizer-controlled `visible` flag.
//! [`GatedContent`] is the seam the visibility filter and the visibility
//! service work through.

use serde::{Deserialize, Serialize};

use super::wire::null_as_default;
use crate::utils::errors::{SeesError, Result};

/// Kind of visibility-gated content attached to an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Quiz,
    Material,
}

impl ContentKind {
    /// Collection path on the backend, relative to the API root
    pub fn collection_path(self) -> &'static str {
        match self {
            ContentKind::Quiz => "api/quizzes",
            ContentKind::Material => "api/materials",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ContentKind::Quiz => "quiz",
            ContentKind::Material => "material",
        }
    }
}

impl std::fmt::Display for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Event content whose exposure is gated by the `visible` flag
pub trait GatedContent {
    const KIND: ContentKind;

    fn id(&self) -> i64;
    fn is_visible(&self) -> bool;
    fn set_visible(&mut self, visible: bool);
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quiz {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub questions: Vec<Question>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub visible: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    #[default]
    MultipleChoice,
    TrueFalse,
}

/// A single quiz question.
///
/// For multiple choice `correct_answer` indexes the raw `options` slots,
/// blanks included. For true/false index 0 is True and 1 is False.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    #[serde(alias = "question", default, deserialize_with = "null_as_default")]
    pub text: String,
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub kind: QuestionKind,
    #[serde(default, deserialize_with = "null_as_default")]
    pub options: Vec<String>,
    #[serde(alias = "correctAnswer", default, deserialize_with = "null_as_default")]
    pub correct_answer: usize,
}

pub const MIN_CHOICES: usize = 2;
pub const MAX_CHOICES: usize = 4;

impl Question {
    pub fn multiple_choice(text: &str, options: &[&str], correct_answer: usize) -> Self {
        Self {
            text: text.to_string(),
            kind: QuestionKind::MultipleChoice,
            options: options.iter().map(|o| o.to_string()).collect(),
            correct_answer,
        }
    }

    pub fn true_false(text: &str, answer: bool) -> Self {
        Self {
            text: text.to_string(),
            kind: QuestionKind::TrueFalse,
            options: Vec::new(),
            correct_answer: if answer { 0 } else { 1 },
        }
    }

    /// Answer options as presented, blank multiple-choice slots dropped
    pub fn choices(&self) -> Vec<&str> {
        match self.kind {
            QuestionKind::TrueFalse => vec!["True", "False"],
            QuestionKind::MultipleChoice => self
                .options
                .iter()
                .map(|o| o.trim())
                .filter(|o| !o.is_empty())
                .collect(),
        }
    }

    /// The correct option's text, if the answer index points at one
    pub fn correct_choice(&self) -> Option<&str> {
        match self.kind {
            QuestionKind::TrueFalse => self.choices().get(self.correct_answer).copied(),
            QuestionKind::MultipleChoice => self
                .options
                .get(self.correct_answer)
                .map(|o| o.trim())
                .filter(|o| !o.is_empty()),
        }
    }

    /// Check the authoring rules for this question
    pub fn validate(&self) -> Result<()> {
        if self.text.trim().is_empty() {
            return Err(SeesError::InvalidInput("Question text cannot be empty".to_string()));
        }

        match self.kind {
            QuestionKind::MultipleChoice => {
                let count = self.choices().len();
                if !(MIN_CHOICES..=MAX_CHOICES).contains(&count) {
                    return Err(SeesError::InvalidInput(format!(
                        "Multiple choice questions need {} to {} options, got {}",
                        MIN_CHOICES, MAX_CHOICES, count
                    )));
                }
            }
            QuestionKind::TrueFalse => {}
        }

        if self.correct_choice().is_none() {
            return Err(SeesError::InvalidInput(
                "Correct answer must point at a non-empty option".to_string()
            ));
        }

        Ok(())
    }
}

impl Quiz {
    /// Check the quiz and every question in it
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(SeesError::InvalidInput("Quiz title cannot be empty".to_string()));
        }
        if self.questions.is_empty() {
            return Err(SeesError::InvalidInput(
                format!("Quiz '{}' has no questions", self.title)
            ));
        }
        for (index, question) in self.questions.iter().enumerate() {
            question.validate().map_err(|e| {
                SeesError::InvalidInput(format!("Quiz '{}', question {}: {}", self.title, index + 1, e))
            })?;
        }
        Ok(())
    }
}

impl GatedContent for Quiz {
    const KIND: ContentKind = ContentKind::Quiz;

    fn id(&self) -> i64 {
        self.id
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }
}

/// Downloadable material attached to an event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub id: i64,
    #[serde(alias = "title", default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(alias = "file_url", default, deserialize_with = "null_as_default")]
    pub file: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub visible: bool,
}

impl GatedContent for Material {
    const KIND: ContentKind = ContentKind::Material;

    fn id(&self) -> i64 {
        self.id
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }
}
