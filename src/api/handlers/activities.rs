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
    domain::{Activity, ActivityInput},
    error::Result,
    listing::{ListQuery, Listing},
};

pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Listing<Activity>>> {
    let listing = state.service_context.activities.list_public(&query).await?;
    Ok(Json(listing))
}

pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Detail<Activity>>> {
    let (record, related) = state.service_context.activities.show_public(id).await?;
    Ok(Json(Detail { record, related }))
}

pub async fn admin_index(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Listing<Activity>>> {
    let listing = state.service_context.activities.list_admin(&query).await?;
    Ok(Json(listing))
}

pub async fn admin_show(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Activity>> {
    let record = state.service_context.activities.find(id).await?;
    Ok(Json(record))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(admin): Extension<CurrentAdmin>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Saved<Activity>>)> {
    let form = FormData::read(multipart).await?;
    let input = read_input(&form);
    let images = form.files("gallery_images");

    let record = state
        .service_context
        .activities
        .create(&admin.session, input, images)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(Saved::new("Activity created successfully", record)),
    ))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(admin): Extension<CurrentAdmin>,
    multipart: Multipart,
) -> Result<Json<Saved<Activity>>> {
    let form = FormData::read(multipart).await?;
    let input = read_input(&form);
    // The editor posts the existing paths it wants to keep; anything omitted
    // is dropped from the gallery.
    let kept = form.values("kept_images");
    let new_images = form.files("gallery_images");

    let record = state
        .service_context
        .activities
        .update(&admin.session, id, input, kept, new_images)
        .await?;

    Ok(Json(Saved::new("Activity updated successfully", record)))
}

pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(admin): Extension<CurrentAdmin>,
) -> Result<Json<Message>> {
    state.service_context.activities.delete(&admin.session, id).await?;
    Ok(Json(Message::new("Activity deleted successfully")))
}

fn read_input(form: &FormData) -> ActivityInput {
    ActivityInput {
        title: form.text("title"),
        description: form.text("description"),
        category: form.text("category"),
        video_url: form.opt_text("video_url"),
        activity_date: form.text("activity_date"),
        is_featured: form.flag("is_featured"),
    }
}
