use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::validate::{unknown_value_error, validate_date_format};

#[derive(Debug, Clone, Serialize)]
pub struct Activity {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: ActivityCategory,
    /// Ordered list of storage paths, at most ten.
    pub gallery_images: Vec<String>,
    pub video_url: Option<String>,
    pub activity_date: NaiveDate,
    pub is_featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityCategory {
    Academic,
    Social,
    Sports,
    Arts,
    Volunteer,
    Competition,
}

impl ActivityCategory {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "academic" => Some(ActivityCategory::Academic),
            "social" => Some(ActivityCategory::Social),
            "sports" => Some(ActivityCategory::Sports),
            "arts" => Some(ActivityCategory::Arts),
            "volunteer" => Some(ActivityCategory::Volunteer),
            "competition" => Some(ActivityCategory::Competition),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ActivityCategory::Academic => "academic",
            ActivityCategory::Social => "social",
            ActivityCategory::Sports => "sports",
            ActivityCategory::Arts => "arts",
            ActivityCategory::Volunteer => "volunteer",
            ActivityCategory::Competition => "competition",
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ActivityInput {
    #[validate(length(min = 1, max = 255, message = "must be between 1 and 255 characters"))]
    pub title: String,
    #[validate(length(min = 1, message = "is required"))]
    pub description: String,
    #[validate(custom(function = validate_activity_category))]
    pub category: String,
    #[validate(url(message = "must be a valid URL"), length(max = 500, message = "must be at most 500 characters"))]
    pub video_url: Option<String>,
    #[validate(custom(function = validate_date_format))]
    pub activity_date: String,
    #[serde(default)]
    pub is_featured: bool,
}

fn validate_activity_category(value: &str) -> Result<(), ValidationError> {
    if ActivityCategory::parse(value).is_some() {
        Ok(())
    } else {
        Err(unknown_value_error("activity category"))
    }
}
