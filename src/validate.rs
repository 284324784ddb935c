use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Serialize;
use validator::{ValidationError, ValidationErrors};

use crate::error::{AppError, Result};

/// Field-level validation failures, one message per field. Every field is
/// checked before a mutation touches storage or the database, so the caller
/// gets the complete map in a single response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a message for a field. The first message per field wins.
    pub fn insert(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_insert_with(|| message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Folds the output of a `validator::Validate` derive into this map.
    pub fn merge_validator(&mut self, errors: &ValidationErrors) {
        for (field, failures) in errors.field_errors() {
            if let Some(first) = failures.first() {
                let message = first
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field));
                self.insert(&field, message);
            }
        }
    }

    pub fn into_result(self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(self))
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.0 {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", field, message)?;
            first = false;
        }
        Ok(())
    }
}

/// Parses a calendar date in `YYYY-MM-DD` form.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

/// Parses a UTC timestamp. Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS`, or a bare
/// date (taken as midnight UTC), covering what admin forms actually post.
pub fn parse_datetime(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S") {
        return Some(DateTime::from_naive_utc_and_offset(naive, Utc));
    }
    parse_date(value).map(|date| {
        DateTime::from_naive_utc_and_offset(date.and_time(NaiveTime::MIN), Utc)
    })
}

pub fn validate_date_format(value: &str) -> std::result::Result<(), ValidationError> {
    if parse_date(value).is_some() {
        Ok(())
    } else {
        let mut error = ValidationError::new("date");
        error.message = Some("must be a date in YYYY-MM-DD form".into());
        Err(error)
    }
}

pub fn validate_datetime_format(value: &str) -> std::result::Result<(), ValidationError> {
    if parse_datetime(value).is_some() {
        Ok(())
    } else {
        let mut error = ValidationError::new("datetime");
        error.message = Some("must be an RFC 3339 timestamp or a YYYY-MM-DD date".into());
        Err(error)
    }
}

/// Builds the error custom enum validators return for an out-of-set value.
pub fn unknown_value_error(what: &'static str) -> ValidationError {
    let mut error = ValidationError::new("enum");
    error.message = Some(format!("is not a recognized {}", what).into());
    error
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_message_per_field_wins() {
        let mut errors = FieldErrors::new();
        errors.insert("title", "is required");
        errors.insert("title", "is too long");
        assert_eq!(errors.get("title"), Some("is required"));
    }

    #[test]
    fn into_result_reports_all_fields() {
        let mut errors = FieldErrors::new();
        errors.insert("title", "is required");
        errors.insert("content", "is required");
        match errors.into_result() {
            Err(AppError::Validation(fields)) => {
                assert!(fields.get("title").is_some());
                assert!(fields.get("content").is_some());
            }
            other => panic!("expected validation error, got {:?}", other.err()),
        }
    }

    #[test]
    fn datetime_parsing_accepts_dates_and_timestamps() {
        assert!(parse_datetime("2025-03-01").is_some());
        assert!(parse_datetime("2025-03-01 08:30:00").is_some());
        assert!(parse_datetime("2025-03-01T08:30:00Z").is_some());
        assert!(parse_datetime("next tuesday").is_none());
    }
}
