use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;

use crate::{api::state::AppState, auth::Session, error::AppError};

/// The validated admin session, available to handlers behind `require_admin`.
#[derive(Clone)]
pub struct CurrentAdmin {
    pub session: Session,
}

pub async fn require_admin(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let cookie = jar
        .get(&state.settings.auth.session_cookie)
        .ok_or(AppError::Unauthorized)?;

    let session = state
        .auth_service
        .validate_token(cookie.value())
        .await?
        .ok_or(AppError::Unauthorized)?;

    if !(state.admin_policy.as_ref())(&session) {
        return Err(AppError::Forbidden);
    }

    request.extensions_mut().insert(CurrentAdmin { session });

    Ok(next.run(request).await)
}
