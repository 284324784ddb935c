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
    domain::{OrganizationMember, OrganizationMemberInput},
    error::Result,
    listing::{ListQuery, Listing},
    service::ImageChange,
};

pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Listing<OrganizationMember>>> {
    let listing = state
        .service_context
        .organization_members
        .list_public(&query)
        .await?;
    Ok(Json(listing))
}

pub async fn admin_index(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Listing<OrganizationMember>>> {
    let listing = state
        .service_context
        .organization_members
        .list_admin(&query)
        .await?;
    Ok(Json(listing))
}

pub async fn admin_show(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<OrganizationMember>> {
    let record = state.service_context.organization_members.find(id).await?;
    Ok(Json(record))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(admin): Extension<CurrentAdmin>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Saved<OrganizationMember>>)> {
    let form = FormData::read(multipart).await?;
    let input = read_input(&form);
    let photo = form.file("photo");

    let record = state
        .service_context
        .organization_members
        .create(&admin.session, input, photo)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(Saved::new("Organization member created successfully", record)),
    ))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(admin): Extension<CurrentAdmin>,
    multipart: Multipart,
) -> Result<Json<Saved<OrganizationMember>>> {
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
        .organization_members
        .update(&admin.session, id, input, photo)
        .await?;

    Ok(Json(Saved::new("Organization member updated successfully", record)))
}

pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(admin): Extension<CurrentAdmin>,
) -> Result<Json<Message>> {
    state
        .service_context
        .organization_members
        .delete(&admin.session, id)
        .await?;
    Ok(Json(Message::new("Organization member deleted successfully")))
}

fn read_input(form: &FormData) -> OrganizationMemberInput {
    OrganizationMemberInput {
        name: form.text("name"),
        position: form.text("position"),
        class: form.text("class"),
        bio: form.opt_text("bio"),
        order_position: form.text("order_position").parse().unwrap_or(0),
        is_active: form.flag_or("is_active", true),
        period: form.text("period"),
    }
}
