use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A member of the organization's board as shown on the roster page, not a
/// login account.
#[derive(Debug, Clone, Serialize)]
pub struct OrganizationMember {
    pub id: Uuid,
    pub name: String,
    /// e.g. "Chairperson", "Secretary"
    pub position: String,
    /// Homeroom class, e.g. "XII RPL 1"
    pub class: String,
    pub photo_path: Option<String>,
    pub bio: Option<String>,
    /// Display order, ascending, starting at 1.
    pub order_position: i64,
    pub is_active: bool,
    /// Term of office, e.g. "2024/2025"
    pub period: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct OrganizationMemberInput {
    #[validate(length(min = 1, max = 255, message = "must be between 1 and 255 characters"))]
    pub name: String,
    #[validate(length(min = 1, max = 100, message = "must be between 1 and 100 characters"))]
    pub position: String,
    #[validate(length(min = 1, max = 20, message = "must be between 1 and 20 characters"))]
    pub class: String,
    #[validate(length(max = 1000, message = "must be at most 1000 characters"))]
    pub bio: Option<String>,
    #[validate(range(min = 1, message = "must be at least 1"))]
    pub order_position: i64,
    #[serde(default = "crate::domain::default_true")]
    pub is_active: bool,
    #[validate(length(min = 1, max = 20, message = "must be between 1 and 20 characters"))]
    pub period: String,
}
