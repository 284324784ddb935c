use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize)]
pub struct Testimonial {
    pub id: Uuid,
    pub name: String,
    /// e.g. "Alumni 2023", "Grade XII student"
    pub role: String,
    pub content: String,
    pub photo_path: Option<String>,
    /// 1 to 5 stars.
    pub rating: i32,
    pub is_featured: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TestimonialInput {
    #[validate(length(min = 1, max = 255, message = "must be between 1 and 255 characters"))]
    pub name: String,
    #[validate(length(min = 1, max = 100, message = "must be between 1 and 100 characters"))]
    pub role: String,
    #[validate(length(min = 1, max = 1000, message = "must be between 1 and 1000 characters"))]
    pub content: String,
    #[validate(range(min = 1, max = 5, message = "must be between 1 and 5"))]
    pub rating: i32,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default = "crate::domain::default_true")]
    pub is_active: bool,
}
