use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    api::{
        handlers::{Detail, Message, Saved},
        middleware::auth::CurrentAdmin,
        state::AppState,
    },
    domain::{WorkProgram, WorkProgramInput},
    error::Result,
    listing::{ListQuery, Listing},
};

/// The public programs page carries the year selector's options alongside
/// the listing itself.
#[derive(Serialize)]
pub struct WorkProgramIndex {
    #[serde(flatten)]
    pub listing: Listing<WorkProgram>,
    pub available_years: Vec<String>,
}

pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<WorkProgramIndex>> {
    let (listing, available_years) =
        state.service_context.work_programs.list_public(&query).await?;
    Ok(Json(WorkProgramIndex { listing, available_years }))
}

pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Detail<WorkProgram>>> {
    let (record, related) = state.service_context.work_programs.show_public(id).await?;
    Ok(Json(Detail { record, related }))
}

pub async fn admin_index(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Listing<WorkProgram>>> {
    let listing = state.service_context.work_programs.list_admin(&query).await?;
    Ok(Json(listing))
}

pub async fn admin_show(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<WorkProgram>> {
    let record = state.service_context.work_programs.find(id).await?;
    Ok(Json(record))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(admin): Extension<CurrentAdmin>,
    Json(input): Json<WorkProgramInput>,
) -> Result<(StatusCode, Json<Saved<WorkProgram>>)> {
    let record = state
        .service_context
        .work_programs
        .create(&admin.session, input)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(Saved::new("Work program created successfully", record)),
    ))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(admin): Extension<CurrentAdmin>,
    Json(input): Json<WorkProgramInput>,
) -> Result<Json<Saved<WorkProgram>>> {
    let record = state
        .service_context
        .work_programs
        .update(&admin.session, id, input)
        .await?;

    Ok(Json(Saved::new("Work program updated successfully", record)))
}

pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(admin): Extension<CurrentAdmin>,
) -> Result<Json<Message>> {
    state.service_context.work_programs.delete(&admin.session, id).await?;
    Ok(Json(Message::new("Work program deleted successfully")))
}
