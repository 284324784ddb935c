pub mod forms;
pub mod handlers;
pub mod middleware;
pub mod state;

use std::sync::Arc;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, services::ServeDir, trace::TraceLayer,
};

use crate::{
    auth::{AdminPolicy, AuthService},
    config::Settings,
    service::ServiceContext,
};
use state::AppState;

pub fn create_app(
    service_context: Arc<ServiceContext>,
    auth_service: Arc<AuthService>,
    admin_policy: AdminPolicy,
    settings: Arc<Settings>,
) -> Router {
    let app_state = AppState::new(service_context, auth_service, admin_policy, settings.clone());

    Router::new()
        .route("/", get(handlers::root::home))
        .route("/health", get(handlers::root::health_check))
        // Public content
        .route("/announcements", get(handlers::announcements::index))
        .route("/announcements/:id", get(handlers::announcements::show))
        .route("/activities", get(handlers::activities::index))
        .route("/activities/:id", get(handlers::activities::show))
        .route("/work-programs", get(handlers::work_programs::index))
        .route("/work-programs/:id", get(handlers::work_programs::show))
        .route("/organization-members", get(handlers::organization_members::index))
        .route("/testimonials", get(handlers::testimonials::index))
        .route("/downloads", get(handlers::downloads::index))
        .route("/downloads/:id", get(handlers::downloads::show))
        // Public intake
        .route("/register", post(handlers::registrations::register))
        .route("/feedback", post(handlers::feedback::submit))
        // Admin surface
        .nest("/admin", admin_routes(app_state.clone()))
        // Uploaded files
        .nest_service("/storage", ServeDir::new(&settings.storage.root))
        .with_state(app_state)
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn admin_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/stats", get(handlers::admin::stats))
        // Announcements
        .route("/announcements", get(handlers::announcements::admin_index))
        .route("/announcements", post(handlers::announcements::create))
        .route("/announcements/:id", get(handlers::announcements::admin_show))
        .route("/announcements/:id", put(handlers::announcements::update))
        .route("/announcements/:id", delete(handlers::announcements::destroy))
        // Activities
        .route("/activities", get(handlers::activities::admin_index))
        .route("/activities", post(handlers::activities::create))
        .route("/activities/:id", get(handlers::activities::admin_show))
        .route("/activities/:id", put(handlers::activities::update))
        .route("/activities/:id", delete(handlers::activities::destroy))
        // Work programs
        .route("/work-programs", get(handlers::work_programs::admin_index))
        .route("/work-programs", post(handlers::work_programs::create))
        .route("/work-programs/:id", get(handlers::work_programs::admin_show))
        .route("/work-programs/:id", put(handlers::work_programs::update))
        .route("/work-programs/:id", delete(handlers::work_programs::destroy))
        // Organization members
        .route("/organization-members", get(handlers::organization_members::admin_index))
        .route("/organization-members", post(handlers::organization_members::create))
        .route("/organization-members/:id", get(handlers::organization_members::admin_show))
        .route("/organization-members/:id", put(handlers::organization_members::update))
        .route("/organization-members/:id", delete(handlers::organization_members::destroy))
        // Testimonials
        .route("/testimonials", get(handlers::testimonials::admin_index))
        .route("/testimonials", post(handlers::testimonials::create))
        .route("/testimonials/:id", get(handlers::testimonials::admin_show))
        .route("/testimonials/:id", put(handlers::testimonials::update))
        .route("/testimonials/:id", delete(handlers::testimonials::destroy))
        // Downloads
        .route("/downloads", get(handlers::downloads::admin_index))
        .route("/downloads", post(handlers::downloads::create))
        .route("/downloads/:id", get(handlers::downloads::admin_show))
        .route("/downloads/:id", put(handlers::downloads::update))
        .route("/downloads/:id", delete(handlers::downloads::destroy))
        // Registrations (review only, submissions come from the public form)
        .route("/registrations", get(handlers::registrations::admin_index))
        .route("/registrations/:id", get(handlers::registrations::admin_show))
        .route("/registrations/:id", put(handlers::registrations::review))
        .route("/registrations/:id", delete(handlers::registrations::destroy))
        // Feedback
        .route("/feedback", get(handlers::feedback::admin_index))
        .route("/feedback/:id", get(handlers::feedback::admin_show))
        .route("/feedback/:id", put(handlers::feedback::review))
        .route("/feedback/:id", delete(handlers::feedback::destroy))
        .route_layer(axum::middleware::from_fn_with_state(
            state,
            middleware::auth::require_admin,
        ))
}
