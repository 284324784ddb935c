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
    domain::{Feedback, FeedbackInput, FeedbackReview},
    error::Result,
    listing::{ListQuery, Listing},
};

/// The public feedback form.
pub async fn submit(
    State(state): State<AppState>,
    Json(input): Json<FeedbackInput>,
) -> Result<(StatusCode, Json<Saved<Feedback>>)> {
    let record = state.service_context.feedback.submit(input).await?;

    Ok((
        StatusCode::CREATED,
        Json(Saved::new("Thank you for your feedback!", record)),
    ))
}

pub async fn admin_index(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Listing<Feedback>>> {
    let listing = state.service_context.feedback.list_admin(&query).await?;
    Ok(Json(listing))
}

pub async fn admin_show(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Feedback>> {
    let record = state.service_context.feedback.find(id).await?;
    Ok(Json(record))
}

pub async fn review(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(admin): Extension<CurrentAdmin>,
    Json(input): Json<FeedbackReview>,
) -> Result<Json<Saved<Feedback>>> {
    let record = state
        .service_context
        .feedback
        .review(&admin.session, id, input)
        .await?;

    Ok(Json(Saved::new("Feedback updated successfully", record)))
}

pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(admin): Extension<CurrentAdmin>,
) -> Result<Json<Message>> {
    state.service_context.feedback.delete(&admin.session, id).await?;
    Ok(Json(Message::new("Feedback deleted successfully")))
}
