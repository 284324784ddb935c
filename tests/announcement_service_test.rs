use std::sync::Arc;

use chrono::{Duration, Utc};
use sqlx::SqlitePool;
use tempfile::TempDir;
use uuid::Uuid;

use osis_cms::{
    auth::{AuthService, Session},
    domain::AnnouncementInput,
    error::AppError,
    service::{ImageChange, ServiceContext},
    storage::DiskStore,
};

async fn setup() -> anyhow::Result<(ServiceContext, Session, TempDir)> {
    let pool = SqlitePool::connect(":memory:").await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let dir = tempfile::tempdir()?;
    let services = ServiceContext::new(pool.clone(), Arc::new(DiskStore::new(dir.path())));

    let auth = AuthService::new(pool);
    let session = auth.create_session(Uuid::new_v4(), "test-token", 24).await?;

    Ok((services, session, dir))
}

fn input(title: &str, is_active: bool, published_at: Option<&str>) -> AnnouncementInput {
    AnnouncementInput {
        title: title.to_string(),
        content: "Details inside.".to_string(),
        kind: "general".to_string(),
        is_featured: false,
        is_active,
        published_at: published_at.map(str::to_string),
    }
}

#[tokio::test]
async fn active_announcement_without_timestamp_publishes_now() -> anyhow::Result<()> {
    let (services, admin, _dir) = setup().await?;

    let created = services
        .announcements
        .create(&admin, input("Exam week schedule", true, None), None)
        .await?;

    let published = created.published_at.expect("should be published immediately");
    assert!(published <= Utc::now());

    // And it is visible right away.
    let (shown, _) = services.announcements.show_public(created.id).await?;
    assert_eq!(shown.id, created.id);

    Ok(())
}

#[tokio::test]
async fn inactive_announcement_stays_unpublished_and_hidden() -> anyhow::Result<()> {
    let (services, admin, _dir) = setup().await?;

    let created = services
        .announcements
        .create(&admin, input("Draft notice", false, None), None)
        .await?;

    assert!(created.published_at.is_none());

    match services.announcements.show_public(created.id).await {
        Err(AppError::NotFound(_)) => {}
        other => panic!("hidden announcement should 404, got {:?}", other.map(|_| ())),
    }

    Ok(())
}

#[tokio::test]
async fn future_dated_announcement_is_hidden_until_its_time() -> anyhow::Result<()> {
    let (services, admin, _dir) = setup().await?;

    let tomorrow = (Utc::now() + Duration::days(1)).to_rfc3339();
    let created = services
        .announcements
        .create(&admin, input("Scheduled reveal", true, Some(&tomorrow)), None)
        .await?;

    match services.announcements.show_public(created.id).await {
        Err(AppError::NotFound(_)) => {}
        other => panic!("future announcement should 404, got {:?}", other.map(|_| ())),
    }

    // Admins still see it.
    let found = services.announcements.find(created.id).await?;
    assert_eq!(found.id, created.id);

    Ok(())
}

#[tokio::test]
async fn update_without_timestamp_keeps_the_stored_one() -> anyhow::Result<()> {
    let (services, admin, _dir) = setup().await?;

    let created = services
        .announcements
        .create(&admin, input("Original", true, Some("2025-01-15 09:00:00")), None)
        .await?;
    let original_published = created.published_at;
    assert!(original_published.is_some());

    let updated = services
        .announcements
        .update(&admin, created.id, input("Edited", true, None), ImageChange::Keep)
        .await?;

    assert_eq!(updated.title, "Edited");
    assert_eq!(updated.published_at, original_published);

    Ok(())
}

#[tokio::test]
async fn validation_reports_every_bad_field_at_once() -> anyhow::Result<()> {
    let (services, admin, _dir) = setup().await?;

    let bad = AnnouncementInput {
        title: String::new(),
        content: String::new(),
        kind: "breaking".to_string(),
        is_featured: false,
        is_active: true,
        published_at: None,
    };

    match services.announcements.create(&admin, bad, None).await {
        Err(AppError::Validation(fields)) => {
            assert!(fields.get("title").is_some());
            assert!(fields.get("content").is_some());
            assert!(fields.get("kind").is_some());
        }
        other => panic!("expected validation failure, got {:?}", other.map(|_| ())),
    }

    Ok(())
}
