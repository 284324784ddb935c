use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use uuid::Uuid;

use crate::{
    api::{
        forms::FormData,
        handlers::{Detail, Message, Saved},
        middleware::auth::CurrentAdmin,
        state::AppState,
    },
    domain::{Announcement, AnnouncementInput},
    error::Result,
    listing::{ListQuery, Listing},
    service::ImageChange,
};

pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Listing<Announcement>>> {
    let listing = state.service_context.announcements.list_public(&query).await?;
    Ok(Json(listing))
}

pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Detail<Announcement>>> {
    let (record, related) = state.service_context.announcements.show_public(id).await?;
    Ok(Json(Detail { record, related }))
}

pub async fn admin_index(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Listing<Announcement>>> {
    let listing = state.service_context.announcements.list_admin(&query).await?;
    Ok(Json(listing))
}

pub async fn admin_show(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Announcement>> {
    let record = state.service_context.announcements.find(id).await?;
    Ok(Json(record))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(admin): Extension<CurrentAdmin>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Saved<Announcement>>)> {
    let form = FormData::read(multipart).await?;
    let input = read_input(&form);
    let image = form.file("image");

    let record = state
        .service_context
        .announcements
        .create(&admin.session, input, image)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(Saved::new("Announcement created successfully", record)),
    ))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(admin): Extension<CurrentAdmin>,
    multipart: Multipart,
) -> Result<Json<Saved<Announcement>>> {
    let form = FormData::read(multipart).await?;
    let input = read_input(&form);
    let image = image_change(&form);

    let record = state
        .service_context
        .announcements
        .update(&admin.session, id, input, image)
        .await?;

    Ok(Json(Saved::new("Announcement updated successfully", record)))
}

pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(admin): Extension<CurrentAdmin>,
) -> Result<Json<Message>> {
    state.service_context.announcements.delete(&admin.session, id).await?;
    Ok(Json(Message::new("Announcement deleted successfully")))
}

fn read_input(form: &FormData) -> AnnouncementInput {
    AnnouncementInput {
        title: form.text("title"),
        content: form.text("content"),
        kind: form.text("type"),
        is_featured: form.flag("is_featured"),
        is_active: form.flag_or("is_active", true),
        published_at: form.opt_text("published_at"),
    }
}

fn image_change(form: &FormData) -> ImageChange {
    if form.flag("remove_image") {
        ImageChange::Remove
    } else if let Some(file) = form.file("image") {
        ImageChange::Replace(file)
    } else {
        ImageChange::Keep
    }
}
