use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use sqlx::SqlitePool;
use tempfile::TempDir;
use tower::util::ServiceExt;
use uuid::Uuid;

use osis_cms::{
    api::create_app,
    auth::{allow_any_session, AuthService},
    config::Settings,
    domain::DownloadInput,
    service::ServiceContext,
    storage::{DiskStore, UploadedFile},
};

async fn setup() -> anyhow::Result<(Router, Arc<ServiceContext>, Arc<AuthService>, TempDir)> {
    let pool = SqlitePool::connect(":memory:").await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let dir = tempfile::tempdir()?;
    let services = Arc::new(ServiceContext::new(
        pool.clone(),
        Arc::new(DiskStore::new(dir.path())),
    ));
    let auth = Arc::new(AuthService::new(pool));

    let mut settings = Settings::default();
    settings.storage.root = dir.path().to_string_lossy().into_owned();

    let app = create_app(
        services.clone(),
        auth.clone(),
        allow_any_session(),
        Arc::new(settings),
    );

    Ok((app, services, auth, dir))
}

async fn json_body(response: axum::response::Response) -> anyhow::Result<serde_json::Value> {
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[tokio::test]
async fn health_reports_ok() -> anyhow::Result<()> {
    let (app, _services, _auth, _dir) = setup().await?;

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty())?)
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await?;
    assert_eq!(body["status"], "ok");

    Ok(())
}

#[tokio::test]
async fn admin_routes_require_a_session() -> anyhow::Result<()> {
    let (app, _services, auth, _dir) = setup().await?;

    let anonymous = app
        .clone()
        .oneshot(Request::builder().uri("/admin/stats").body(Body::empty())?)
        .await?;
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

    auth.create_session(Uuid::new_v4(), "admin-token", 24).await?;
    let authenticated = app
        .oneshot(
            Request::builder()
                .uri("/admin/stats")
                .header(header::COOKIE, "session=admin-token")
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(authenticated.status(), StatusCode::OK);

    Ok(())
}

#[tokio::test]
async fn download_detail_announces_the_download() -> anyhow::Result<()> {
    let (app, services, auth, _dir) = setup().await?;

    let admin = auth.create_session(Uuid::new_v4(), "admin-token", 24).await?;
    let created = services
        .downloads
        .create(
            &admin,
            DownloadInput {
                title: "Guidebook".to_string(),
                description: "Orientation guide.".to_string(),
                category: "guide".to_string(),
                is_active: true,
            },
            Some(UploadedFile {
                name: "guide.pdf".to_string(),
                content_type: Some("application/pdf".to_string()),
                data: vec![0u8; 512],
            }),
        )
        .await?;

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/downloads/{}", created.id))
                .body(Body::empty())?,
        )
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await?;
    assert_eq!(body["message"], "Download started: Guidebook");
    assert_eq!(body["record"]["download_count"], 1);

    Ok(())
}
