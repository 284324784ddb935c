use axum::{extract::State, Json};
use serde::Serialize;

use crate::{api::state::AppState, error::Result, listing::ListQuery};

/// Dashboard counters for the admin landing page.
#[derive(Serialize)]
pub struct AdminStats {
    pub announcements: i64,
    pub activities: i64,
    pub work_programs: i64,
    pub organization_members: i64,
    pub testimonials: i64,
    pub downloads: i64,
    pub registrations: i64,
    pub pending_registrations: i64,
    pub feedback: i64,
    pub unread_feedback: i64,
}

pub async fn stats(State(state): State<AppState>) -> Result<Json<AdminStats>> {
    let services = &state.service_context;
    let everything = ListQuery::default();
    let pending = ListQuery { status: Some("pending".to_string()), ..Default::default() };
    let unread = ListQuery { status: Some("unread".to_string()), ..Default::default() };

    let stats = AdminStats {
        announcements: services.announcements.list_admin(&everything).await?.page.total,
        activities: services.activities.list_admin(&everything).await?.page.total,
        work_programs: services.work_programs.list_admin(&everything).await?.page.total,
        organization_members: services
            .organization_members
            .list_admin(&everything)
            .await?
            .page
            .total,
        testimonials: services.testimonials.list_admin(&everything).await?.page.total,
        downloads: services.downloads.list_admin(&everything).await?.page.total,
        registrations: services.registrations.list_admin(&everything).await?.page.total,
        pending_registrations: services.registrations.list_admin(&pending).await?.page.total,
        feedback: services.feedback.list_admin(&everything).await?.page.total,
        unread_feedback: services.feedback.list_admin(&unread).await?.page.total,
    };

    Ok(Json(stats))
}
