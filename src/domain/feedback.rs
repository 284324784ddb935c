use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::validate::unknown_value_error;

#[derive(Debug, Clone, Serialize)]
pub struct Feedback {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub category: FeedbackCategory,
    pub subject: String,
    pub message: String,
    pub status: FeedbackStatus,
    pub response: Option<String>,
    /// Set when a response is recorded, cleared when it is removed.
    pub responded_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackCategory {
    Suggestion,
    Complaint,
    Appreciation,
    Question,
}

impl FeedbackCategory {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "suggestion" => Some(FeedbackCategory::Suggestion),
            "complaint" => Some(FeedbackCategory::Complaint),
            "appreciation" => Some(FeedbackCategory::Appreciation),
            "question" => Some(FeedbackCategory::Question),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FeedbackCategory::Suggestion => "suggestion",
            FeedbackCategory::Complaint => "complaint",
            FeedbackCategory::Appreciation => "appreciation",
            FeedbackCategory::Question => "question",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackStatus {
    Unread,
    Read,
    Responded,
}

impl FeedbackStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "unread" => Some(FeedbackStatus::Unread),
            "read" => Some(FeedbackStatus::Read),
            "responded" => Some(FeedbackStatus::Responded),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FeedbackStatus::Unread => "unread",
            FeedbackStatus::Read => "read",
            FeedbackStatus::Responded => "responded",
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct FeedbackInput {
    #[validate(length(min = 1, max = 255, message = "must be between 1 and 255 characters"))]
    pub name: String,
    #[validate(email(message = "must be a valid email address"), length(max = 255, message = "must be at most 255 characters"))]
    pub email: String,
    #[validate(custom(function = validate_feedback_category))]
    pub category: String,
    #[validate(length(min = 1, max = 255, message = "must be between 1 and 255 characters"))]
    pub subject: String,
    #[validate(length(min = 20, message = "must be at least 20 characters"))]
    pub message: String,
}

/// Admin review of feedback: a status change with an optional written response.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct FeedbackReview {
    #[validate(custom(function = validate_feedback_status))]
    pub status: String,
    #[validate(length(max = 2000, message = "must be at most 2000 characters"))]
    pub response: Option<String>,
}

fn validate_feedback_category(value: &str) -> Result<(), ValidationError> {
    if FeedbackCategory::parse(value).is_some() {
        Ok(())
    } else {
        Err(unknown_value_error("feedback category"))
    }
}

fn validate_feedback_status(value: &str) -> Result<(), ValidationError> {
    if FeedbackStatus::parse(value).is_some() {
        Ok(())
    } else {
        Err(unknown_value_error("feedback status"))
    }
}
