use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::validate::unknown_value_error;

#[derive(Debug, Clone, Serialize)]
pub struct WorkProgram {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    /// e.g. "2024/2025"
    pub academic_year: String,
    pub category: WorkProgramCategory,
    pub status: WorkProgramStatus,
    pub start_date: NaiveDate,
    /// When present, never before `start_date`.
    pub end_date: Option<NaiveDate>,
    pub objectives: Option<Vec<String>>,
    pub outcome: Option<String>,
    pub is_featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkProgramCategory {
    Academic,
    Extracurricular,
    Social,
    Leadership,
}

impl WorkProgramCategory {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "academic" => Some(WorkProgramCategory::Academic),
            "extracurricular" => Some(WorkProgramCategory::Extracurricular),
            "social" => Some(WorkProgramCategory::Social),
            "leadership" => Some(WorkProgramCategory::Leadership),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            WorkProgramCategory::Academic => "academic",
            WorkProgramCategory::Extracurricular => "extracurricular",
            WorkProgramCategory::Social => "social",
            WorkProgramCategory::Leadership => "leadership",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkProgramStatus {
    Planned,
    Ongoing,
    Completed,
    Cancelled,
}

impl WorkProgramStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "planned" => Some(WorkProgramStatus::Planned),
            "ongoing" => Some(WorkProgramStatus::Ongoing),
            "completed" => Some(WorkProgramStatus::Completed),
            "cancelled" => Some(WorkProgramStatus::Cancelled),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            WorkProgramStatus::Planned => "planned",
            WorkProgramStatus::Ongoing => "ongoing",
            WorkProgramStatus::Completed => "completed",
            WorkProgramStatus::Cancelled => "cancelled",
        }
    }
}

/// Admin input for work programs. No files are involved, so this arrives as
/// JSON with natively typed dates; the end-after-start rule is checked by the
/// mutation pipeline alongside these field rules.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct WorkProgramInput {
    #[validate(length(min = 1, max = 255, message = "must be between 1 and 255 characters"))]
    pub title: String,
    #[validate(length(min = 1, message = "is required"))]
    pub description: String,
    #[validate(length(min = 1, max = 20, message = "must be between 1 and 20 characters"))]
    pub academic_year: String,
    #[validate(custom(function = validate_work_program_category))]
    pub category: String,
    #[validate(custom(function = validate_work_program_status))]
    pub status: String,
    #[validate(required(message = "is required"))]
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[validate(custom(function = validate_objectives))]
    pub objectives: Option<Vec<String>>,
    pub outcome: Option<String>,
    #[serde(default)]
    pub is_featured: bool,
}

fn validate_work_program_category(value: &str) -> Result<(), ValidationError> {
    if WorkProgramCategory::parse(value).is_some() {
        Ok(())
    } else {
        Err(unknown_value_error("work program category"))
    }
}

fn validate_work_program_status(value: &str) -> Result<(), ValidationError> {
    if WorkProgramStatus::parse(value).is_some() {
        Ok(())
    } else {
        Err(unknown_value_error("work program status"))
    }
}

fn validate_objectives(objectives: &Vec<String>) -> Result<(), ValidationError> {
    if objectives.iter().any(|objective| objective.chars().count() > 500) {
        let mut error = ValidationError::new("length");
        error.message = Some("each objective must be at most 500 characters".into());
        return Err(error);
    }
    Ok(())
}
