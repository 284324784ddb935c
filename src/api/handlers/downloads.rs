use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    api::{
        forms::FormData,
        handlers::{Message, Saved},
        middleware::auth::CurrentAdmin,
        state::AppState,
    },
    domain::{Download, DownloadInput},
    error::Result,
    listing::{ListQuery, Listing},
};

/// The public detail response. Fetching it counts the download, so the
/// record carries the already-bumped counter.
#[derive(Serialize)]
pub struct DownloadStarted {
    pub message: String,
    pub record: Download,
    pub related: Vec<Download>,
}

pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Listing<Download>>> {
    let listing = state.service_context.downloads.list_public(&query).await?;
    Ok(Json(listing))
}

pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DownloadStarted>> {
    let (record, related) = state.service_context.downloads.show_public(id).await?;
    let message = format!("Download started: {}", record.title);
    Ok(Json(DownloadStarted { message, record, related }))
}

pub async fn admin_index(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Listing<Download>>> {
    let listing = state.service_context.downloads.list_admin(&query).await?;
    Ok(Json(listing))
}

pub async fn admin_show(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Download>> {
    let record = state.service_context.downloads.find(id).await?;
    Ok(Json(record))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(admin): Extension<CurrentAdmin>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Saved<Download>>)> {
    let form = FormData::read(multipart).await?;
    let input = read_input(&form);
    let file = form.file("file");

    let record = state
        .service_context
        .downloads
        .create(&admin.session, input, file)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(Saved::new("Download created successfully", record)),
    ))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(admin): Extension<CurrentAdmin>,
    multipart: Multipart,
) -> Result<Json<Saved<Download>>> {
    let form = FormData::read(multipart).await?;
    let input = read_input(&form);
    let file = form.file("file");

    let record = state
        .service_context
        .downloads
        .update(&admin.session, id, input, file)
        .await?;

    Ok(Json(Saved::new("Download updated successfully", record)))
}

pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(admin): Extension<CurrentAdmin>,
) -> Result<Json<Message>> {
    state.service_context.downloads.delete(&admin.session, id).await?;
    Ok(Json(Message::new("Download deleted successfully")))
}

fn read_input(form: &FormData) -> DownloadInput {
    DownloadInput {
        title: form.text("title"),
        description: form.text("description"),
        category: form.text("category"),
        is_active: form.flag_or("is_active", true),
    }
}
