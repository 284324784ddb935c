use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::validate::unknown_value_error;

#[derive(Debug, Clone, Serialize)]
pub struct Download {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub file_path: String,
    /// MIME type recorded from the upload, never user-entered.
    pub file_type: String,
    /// Human-readable size recorded from the upload, e.g. "2.1 MB".
    pub file_size: String,
    pub category: DownloadCategory,
    pub download_count: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DownloadCategory {
    Document,
    Form,
    Guide,
    Regulation,
    Report,
}

impl DownloadCategory {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "document" => Some(DownloadCategory::Document),
            "form" => Some(DownloadCategory::Form),
            "guide" => Some(DownloadCategory::Guide),
            "regulation" => Some(DownloadCategory::Regulation),
            "report" => Some(DownloadCategory::Report),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DownloadCategory::Document => "document",
            DownloadCategory::Form => "form",
            DownloadCategory::Guide => "guide",
            DownloadCategory::Regulation => "regulation",
            DownloadCategory::Report => "report",
        }
    }
}

/// Admin input for a download's metadata. The file itself travels as a
/// multipart part and its type and size are derived server-side.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct DownloadInput {
    #[validate(length(min = 1, max = 255, message = "must be between 1 and 255 characters"))]
    pub title: String,
    #[validate(length(min = 1, max = 1000, message = "must be between 1 and 1000 characters"))]
    pub description: String,
    #[validate(custom(function = validate_download_category))]
    pub category: String,
    #[serde(default = "crate::domain::default_true")]
    pub is_active: bool,
}

fn validate_download_category(value: &str) -> Result<(), ValidationError> {
    if DownloadCategory::parse(value).is_some() {
        Ok(())
    } else {
        Err(unknown_value_error("download category"))
    }
}
