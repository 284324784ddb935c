pub mod activities;
pub mod admin;
pub mod announcements;
pub mod downloads;
pub mod feedback;
pub mod organization_members;
pub mod registrations;
pub mod root;
pub mod testimonials;
pub mod work_programs;

use serde::Serialize;

/// A successful mutation: the confirmation line the UI shows, plus the
/// record as persisted.
#[derive(Serialize)]
pub struct Saved<T> {
    pub message: String,
    pub record: T,
}

impl<T> Saved<T> {
    pub fn new(message: &str, record: T) -> Self {
        Self { message: message.to_string(), record }
    }
}

/// A detail view: the record and a short list of related ones.
#[derive(Serialize)]
pub struct Detail<T> {
    pub record: T,
    pub related: Vec<T>,
}

#[derive(Serialize)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: &str) -> Self {
        Self { message: message.to_string() }
    }
}
