use axum::{extract::State, Json};
use serde::Serialize;
use serde_json::{json, Value};

use crate::{
    api::state::AppState,
    domain::{Activity, Announcement, Testimonial, WorkProgram},
    error::Result,
    listing::ListQuery,
};

const HOME_FEATURED_ANNOUNCEMENTS: usize = 3;
const HOME_LATEST_ANNOUNCEMENTS: usize = 5;
const HOME_ACTIVITIES: usize = 6;
const HOME_PROGRAMS: usize = 4;
const HOME_TESTIMONIALS: usize = 3;

/// The landing page aggregate: a slice of each public collection.
#[derive(Serialize)]
pub struct HomePage {
    pub featured_announcements: Vec<Announcement>,
    pub latest_announcements: Vec<Announcement>,
    pub featured_activities: Vec<Activity>,
    pub current_programs: Vec<WorkProgram>,
    pub testimonials: Vec<Testimonial>,
}

pub async fn home(State(state): State<AppState>) -> Result<Json<HomePage>> {
    let services = &state.service_context;
    let featured = ListQuery { featured: Some("yes".to_string()), ..Default::default() };
    let everything = ListQuery::default();

    let featured_announcements = services
        .announcements
        .list_public(&featured)
        .await?
        .page
        .items
        .into_iter()
        .take(HOME_FEATURED_ANNOUNCEMENTS)
        .collect();

    let latest_announcements = services
        .announcements
        .list_public(&everything)
        .await?
        .page
        .items
        .into_iter()
        .take(HOME_LATEST_ANNOUNCEMENTS)
        .collect();

    let featured_activities = services
        .activities
        .list_public(&featured)
        .await?
        .page
        .items
        .into_iter()
        .take(HOME_ACTIVITIES)
        .collect();

    let ongoing_featured = ListQuery {
        status: Some("ongoing".to_string()),
        featured: Some("yes".to_string()),
        ..Default::default()
    };
    let (programs, _years) = services.work_programs.list_public(&ongoing_featured).await?;
    let current_programs = programs.page.items.into_iter().take(HOME_PROGRAMS).collect();

    let testimonials = services
        .testimonials
        .list_public(&featured)
        .await?
        .page
        .items
        .into_iter()
        .take(HOME_TESTIMONIALS)
        .collect();

    Ok(Json(HomePage {
        featured_announcements,
        latest_announcements,
        featured_activities,
        current_programs,
        testimonials,
    }))
}

pub async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
