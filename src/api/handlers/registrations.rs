use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use uuid::Uuid;

use crate::{
    api::{
        handlers::{Message, Saved},
        middleware::auth::CurrentAdmin,
        state::AppState,
    },
    domain::{MemberRegistration, RegistrationInput, RegistrationReview},
    error::Result,
    listing::{ListQuery, Listing},
};

/// The public join form.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegistrationInput>,
) -> Result<(StatusCode, Json<Saved<MemberRegistration>>)> {
    let record = state.service_context.registrations.submit(input).await?;

    Ok((
        StatusCode::CREATED,
        Json(Saved::new(
            "Registration submitted successfully. We will contact you soon.",
            record,
        )),
    ))
}

pub async fn admin_index(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Listing<MemberRegistration>>> {
    let listing = state.service_context.registrations.list_admin(&query).await?;
    Ok(Json(listing))
}

pub async fn admin_show(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MemberRegistration>> {
    let record = state.service_context.registrations.find(id).await?;
    Ok(Json(record))
}

pub async fn review(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(admin): Extension<CurrentAdmin>,
    Json(input): Json<RegistrationReview>,
) -> Result<Json<Saved<MemberRegistration>>> {
    let record = state
        .service_context
        .registrations
        .review(&admin.session, id, input)
        .await?;

    Ok(Json(Saved::new("Registration updated successfully", record)))
}

pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(admin): Extension<CurrentAdmin>,
) -> Result<Json<Message>> {
    state.service_context.registrations.delete(&admin.session, id).await?;
    Ok(Json(Message::new("Registration deleted successfully")))
}
