//! Multipart form access for the admin editors. Text fields and file parts
//! are drained into one bag up front so handlers can assemble a typed input
//! struct and its attachments without re-walking the stream.

use std::collections::HashMap;

use axum::extract::Multipart;

use crate::error::{AppError, Result};
use crate::storage::UploadedFile;

#[derive(Debug, Default)]
pub struct FormData {
    fields: HashMap<String, Vec<String>>,
    files: HashMap<String, Vec<UploadedFile>>,
}

impl FormData {
    pub async fn read(mut multipart: Multipart) -> Result<Self> {
        let mut form = FormData::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(format!("Malformed form data: {}", e)))?
        {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };
            // Repeated fields post as `name[]`; fold them onto `name`.
            let name = name.trim_end_matches("[]").to_string();

            if let Some(filename) = field.file_name().map(str::to_string) {
                let content_type = field.content_type().map(str::to_string);
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Failed to read upload: {}", e)))?
                    .to_vec();

                // Browsers submit an empty part for untouched file inputs.
                if filename.is_empty() && data.is_empty() {
                    continue;
                }

                form.files.entry(name).or_default().push(UploadedFile {
                    name: filename,
                    content_type,
                    data,
                });
            } else {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Failed to read field: {}", e)))?;
                form.fields.entry(name).or_default().push(value);
            }
        }

        Ok(form)
    }

    /// The field's value, or an empty string when it was not posted, which
    /// the input struct's own validation then reports.
    pub fn text(&self, name: &str) -> String {
        self.fields
            .get(name)
            .and_then(|values| values.first())
            .cloned()
            .unwrap_or_default()
    }

    /// The field's value if posted and non-empty.
    pub fn opt_text(&self, name: &str) -> Option<String> {
        self.fields
            .get(name)
            .and_then(|values| values.first())
            .filter(|value| !value.is_empty())
            .cloned()
    }

    /// Checkbox semantics: absent means false.
    pub fn flag(&self, name: &str) -> bool {
        self.flag_or(name, false)
    }

    pub fn flag_or(&self, name: &str, default: bool) -> bool {
        match self.fields.get(name).and_then(|values| values.first()) {
            Some(value) => matches!(value.as_str(), "1" | "true" | "on" | "yes"),
            None => default,
        }
    }

    /// All values posted under a repeated field.
    pub fn values(&self, name: &str) -> Vec<String> {
        self.fields.get(name).cloned().unwrap_or_default()
    }

    /// Like `values`, but absent-vs-empty is preserved for optional lists.
    pub fn opt_values(&self, name: &str) -> Option<Vec<String>> {
        self.fields.get(name).cloned()
    }

    pub fn file(&self, name: &str) -> Option<UploadedFile> {
        self.files
            .get(name)
            .and_then(|files| files.first())
            .cloned()
    }

    pub fn files(&self, name: &str) -> Vec<UploadedFile> {
        self.files.get(name).cloned().unwrap_or_default()
    }
}
