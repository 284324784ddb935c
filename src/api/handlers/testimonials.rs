use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use uuid::Uuid;

use crate::{
    api::{
        forms::FormData,
        handlers::{Message, Saved},
        middleware::auth::CurrentAdmin,
        state::AppState,
    },
    domain::{Testimonial, TestimonialInput},
    error::Result,
    listing::{ListQuery, Listing},
    service::ImageChange,
};

pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Listing<Testimonial>>> {
    let listing = state.service_context.testimonials.list_public(&query).await?;
    Ok(Json(listing))
}

pub async fn admin_index(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Listing<Testimonial>>> {
    let listing = state.service_context.testimonials.list_admin(&query).await?;
    Ok(Json(listing))
}

pub async fn admin_show(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Testimonial>> {
    let record = state.service_context.testimonials.find(id).await?;
    Ok(Json(record))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(admin): Extension<CurrentAdmin>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Saved<Testimonial>>)> {
    let form = FormData::read(multipart).await?;
    let input = read_input(&form);
    let photo = form.file("photo");

    let record = state
        .service_context
        .testimonials
        .create(&admin.session, input, photo)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(Saved::new("Testimonial created successfully", record)),
    ))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(admin): Extension<CurrentAdmin>,
    multipart: Multipart,
) -> Result<Json<Saved<Testimonial>>> {
    let form = FormData::read(multipart).await?;
    let input = read_input(&form);
    let photo = if form.flag("remove_photo") {
        ImageChange::Remove
    } else if let Some(file) = form.file("photo") {
        ImageChange::Replace(file)
    } else {
        ImageChange::Keep
    };

    let record = state
        .service_context
        .testimonials
        .update(&admin.session, id, input, photo)
        .await?;

    Ok(Json(Saved::new("Testimonial updated successfully", record)))
}

pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(admin): Extension<CurrentAdmin>,
) -> Result<Json<Message>> {
    state.service_context.testimonials.delete(&admin.session, id).await?;
    Ok(Json(Message::new("Testimonial deleted successfully")))
}

fn read_input(form: &FormData) -> TestimonialInput {
    TestimonialInput {
        name: form.text("name"),
        role: form.text("role"),
        content: form.text("content"),
        rating: form.text("rating").parse().unwrap_or(0),
        is_featured: form.flag("is_featured"),
        is_active: form.flag_or("is_active", true),
    }
}
