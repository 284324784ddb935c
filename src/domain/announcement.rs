use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::validate::{unknown_value_error, validate_datetime_format};

#[derive(Debug, Clone, Serialize)]
pub struct Announcement {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    #[serde(rename = "type")]
    pub kind: AnnouncementType,
    pub is_featured: bool,
    pub image_path: Option<String>,
    pub is_active: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Announcement {
    /// Visitors only see announcements that are active and whose publish
    /// time has passed. Inactive, unpublished, and future-dated rows are
    /// treated as nonexistent on the public surface.
    pub fn is_visible(&self, now: DateTime<Utc>) -> bool {
        self.is_active && self.published_at.map(|ts| ts <= now).unwrap_or(false)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnouncementType {
    General,
    Urgent,
    Event,
}

impl AnnouncementType {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "general" => Some(AnnouncementType::General),
            "urgent" => Some(AnnouncementType::Urgent),
            "event" => Some(AnnouncementType::Event),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AnnouncementType::General => "general",
            AnnouncementType::Urgent => "urgent",
            AnnouncementType::Event => "event",
        }
    }
}

/// Validated admin input for creating or updating an announcement. The image
/// travels separately as a multipart file.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AnnouncementInput {
    #[validate(length(min = 1, max = 255, message = "must be between 1 and 255 characters"))]
    pub title: String,
    #[validate(length(min = 1, message = "is required"))]
    pub content: String,
    #[serde(rename = "type")]
    #[validate(custom(function = validate_announcement_type))]
    pub kind: String,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default = "crate::domain::default_true")]
    pub is_active: bool,
    #[validate(custom(function = validate_datetime_format))]
    pub published_at: Option<String>,
}

fn validate_announcement_type(value: &str) -> Result<(), ValidationError> {
    if AnnouncementType::parse(value).is_some() {
        Ok(())
    } else {
        Err(unknown_value_error("announcement type"))
    }
}
