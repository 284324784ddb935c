use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::validate::unknown_value_error;

/// An application submitted through the public join form. Admins review these;
/// applicants never edit them after submission.
#[derive(Debug, Clone, Serialize)]
pub struct MemberRegistration {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    /// Homeroom class, e.g. "XI TKJ 2"
    pub class: String,
    pub student_id: String,
    pub motivation: String,
    pub preferred_division: Option<String>,
    pub skills: Option<Vec<String>>,
    pub status: RegistrationStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationStatus {
    Pending,
    Reviewed,
    Accepted,
    Rejected,
}

impl RegistrationStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(RegistrationStatus::Pending),
            "reviewed" => Some(RegistrationStatus::Reviewed),
            "accepted" => Some(RegistrationStatus::Accepted),
            "rejected" => Some(RegistrationStatus::Rejected),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RegistrationStatus::Pending => "pending",
            RegistrationStatus::Reviewed => "reviewed",
            RegistrationStatus::Accepted => "accepted",
            RegistrationStatus::Rejected => "rejected",
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegistrationInput {
    #[validate(length(min = 1, max = 255, message = "must be between 1 and 255 characters"))]
    pub full_name: String,
    #[validate(email(message = "must be a valid email address"), length(max = 255, message = "must be at most 255 characters"))]
    pub email: String,
    #[validate(length(min = 1, max = 20, message = "must be between 1 and 20 characters"))]
    pub phone: String,
    #[validate(length(min = 1, max = 50, message = "must be between 1 and 50 characters"))]
    pub class: String,
    #[validate(length(min = 1, max = 20, message = "must be between 1 and 20 characters"))]
    pub student_id: String,
    #[validate(length(min = 50, message = "must be at least 50 characters"))]
    pub motivation: String,
    #[validate(length(max = 100, message = "must be at most 100 characters"))]
    pub preferred_division: Option<String>,
    #[validate(custom(function = validate_skills))]
    pub skills: Option<Vec<String>>,
}

/// Admin review of a registration: a status change with optional notes.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegistrationReview {
    #[validate(custom(function = validate_registration_status))]
    pub status: String,
    #[validate(length(max = 1000, message = "must be at most 1000 characters"))]
    pub notes: Option<String>,
}

fn validate_registration_status(value: &str) -> Result<(), ValidationError> {
    if RegistrationStatus::parse(value).is_some() {
        Ok(())
    } else {
        Err(unknown_value_error("registration status"))
    }
}

fn validate_skills(skills: &Vec<String>) -> Result<(), ValidationError> {
    if skills.iter().any(|skill| skill.chars().count() > 100) {
        let mut error = ValidationError::new("length");
        error.message = Some("each skill must be at most 100 characters".into());
        return Err(error);
    }
    Ok(())
}
