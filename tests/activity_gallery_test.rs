use std::sync::Arc;

use sqlx::SqlitePool;
use tempfile::TempDir;
use uuid::Uuid;

use osis_cms::{
    auth::{AuthService, Session},
    domain::ActivityInput,
    error::AppError,
    service::ServiceContext,
    storage::{DiskStore, UploadedFile, MAX_IMAGE_BYTES},
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

fn input(title: &str) -> ActivityInput {
    ActivityInput {
        title: title.to_string(),
        description: "A day of events.".to_string(),
        category: "social".to_string(),
        video_url: None,
        activity_date: "2025-04-12".to_string(),
        is_featured: false,
    }
}

fn photo(name: &str) -> UploadedFile {
    UploadedFile {
        name: name.to_string(),
        content_type: Some("image/jpeg".to_string()),
        data: vec![0u8; 64],
    }
}

#[tokio::test]
async fn gallery_edit_keeps_order_and_removes_dropped_files() -> anyhow::Result<()> {
    let (services, admin, dir) = setup().await?;

    let created = services
        .activities
        .create(
            &admin,
            input("Charity bazaar"),
            vec![photo("a.jpg"), photo("b.jpg"), photo("c.jpg")],
        )
        .await?;
    assert_eq!(created.gallery_images.len(), 3);
    for path in &created.gallery_images {
        assert!(dir.path().join(path).exists());
    }

    // Keep the first and third, drop the second, add two new shots.
    let kept = vec![
        created.gallery_images[0].clone(),
        created.gallery_images[2].clone(),
    ];
    let dropped = created.gallery_images[1].clone();

    let updated = services
        .activities
        .update(
            &admin,
            created.id,
            input("Charity bazaar"),
            kept.clone(),
            vec![photo("d.jpg"), photo("e.jpg")],
        )
        .await?;

    assert_eq!(updated.gallery_images.len(), 4);
    assert_eq!(updated.gallery_images[0], kept[0]);
    assert_eq!(updated.gallery_images[1], kept[1]);
    assert!(!updated.gallery_images.contains(&dropped));

    // The dropped image is gone from disk, the kept ones remain.
    assert!(!dir.path().join(&dropped).exists());
    for path in &updated.gallery_images {
        assert!(dir.path().join(path).exists());
    }

    Ok(())
}

#[tokio::test]
async fn oversize_image_is_rejected_before_anything_is_stored() -> anyhow::Result<()> {
    let (services, admin, dir) = setup().await?;

    let oversize = UploadedFile {
        name: "huge.jpg".to_string(),
        content_type: Some("image/jpeg".to_string()),
        data: vec![0u8; MAX_IMAGE_BYTES + 1],
    };

    match services
        .activities
        .create(&admin, input("Sports day"), vec![photo("ok.jpg"), oversize])
        .await
    {
        Err(AppError::Validation(fields)) => {
            assert!(fields.get("gallery_images.1").is_some());
        }
        other => panic!("expected validation failure, got {:?}", other.map(|_| ())),
    }

    // Nothing was written.
    assert!(std::fs::read_dir(dir.path().join("activities")).is_err());

    Ok(())
}

#[tokio::test]
async fn gallery_cannot_grow_past_ten_images() -> anyhow::Result<()> {
    let (services, admin, _dir) = setup().await?;

    let eleven: Vec<UploadedFile> = (0..11).map(|i| photo(&format!("{}.jpg", i))).collect();

    match services.activities.create(&admin, input("Festival"), eleven).await {
        Err(AppError::Validation(fields)) => {
            assert!(fields.get("gallery_images").is_some());
        }
        other => panic!("expected validation failure, got {:?}", other.map(|_| ())),
    }

    Ok(())
}

#[tokio::test]
async fn unowned_paths_cannot_be_kept() -> anyhow::Result<()> {
    let (services, admin, _dir) = setup().await?;

    let created = services
        .activities
        .create(&admin, input("Workshop"), vec![photo("a.jpg")])
        .await?;

    let updated = services
        .activities
        .update(
            &admin,
            created.id,
            input("Workshop"),
            vec!["activities/not-ours.jpg".to_string()],
            vec![],
        )
        .await?;

    assert!(updated.gallery_images.is_empty());

    Ok(())
}
