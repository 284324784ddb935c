use std::sync::Arc;

use sqlx::SqlitePool;
use tempfile::TempDir;
use uuid::Uuid;

use osis_cms::{
    auth::{AuthService, Session},
    domain::DownloadInput,
    error::AppError,
    service::ServiceContext,
    storage::{DiskStore, UploadedFile},
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

fn input(title: &str) -> DownloadInput {
    DownloadInput {
        title: title.to_string(),
        description: "Official document.".to_string(),
        category: "form".to_string(),
        is_active: true,
    }
}

fn pdf(len: usize) -> UploadedFile {
    UploadedFile {
        name: "form.pdf".to_string(),
        content_type: Some("application/pdf".to_string()),
        data: vec![0u8; len],
    }
}

#[tokio::test]
async fn file_metadata_is_derived_from_the_upload() -> anyhow::Result<()> {
    let (services, admin, dir) = setup().await?;

    let created = services
        .downloads
        .create(&admin, input("Membership form"), Some(pdf(2_202_009)))
        .await?;

    assert_eq!(created.file_type, "application/pdf");
    assert_eq!(created.file_size, "2.1 MB");
    assert_eq!(created.download_count, 0);
    assert!(dir.path().join(&created.file_path).exists());

    Ok(())
}

#[tokio::test]
async fn missing_file_is_a_field_error() -> anyhow::Result<()> {
    let (services, admin, _dir) = setup().await?;

    match services.downloads.create(&admin, input("Empty"), None).await {
        Err(AppError::Validation(fields)) => {
            assert!(fields.get("file").is_some());
        }
        other => panic!("expected validation failure, got {:?}", other.map(|_| ())),
    }

    Ok(())
}

#[tokio::test]
async fn each_fetch_counts_a_download() -> anyhow::Result<()> {
    let (services, admin, _dir) = setup().await?;

    let created = services
        .downloads
        .create(&admin, input("Guidebook"), Some(pdf(1024)))
        .await?;

    let (first, _) = services.downloads.show_public(created.id).await?;
    assert_eq!(first.download_count, 1);

    let (second, _) = services.downloads.show_public(created.id).await?;
    assert_eq!(second.download_count, 2);

    Ok(())
}

#[tokio::test]
async fn replacing_the_file_swaps_metadata_and_removes_the_old_one() -> anyhow::Result<()> {
    let (services, admin, dir) = setup().await?;

    let created = services
        .downloads
        .create(&admin, input("Handbook"), Some(pdf(1024)))
        .await?;
    let old_path = created.file_path.clone();

    let replacement = UploadedFile {
        name: "handbook-v2.docx".to_string(),
        content_type: Some(
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document".to_string(),
        ),
        data: vec![0u8; 4096],
    };
    let updated = services
        .downloads
        .update(&admin, created.id, input("Handbook"), Some(replacement))
        .await?;

    assert_ne!(updated.file_path, old_path);
    assert_eq!(updated.file_size, "4 KB");
    assert!(!dir.path().join(&old_path).exists());
    assert!(dir.path().join(&updated.file_path).exists());

    Ok(())
}

#[tokio::test]
async fn deleting_a_download_releases_its_file() -> anyhow::Result<()> {
    let (services, admin, dir) = setup().await?;

    let created = services
        .downloads
        .create(&admin, input("Old regulation"), Some(pdf(512)))
        .await?;
    let path = created.file_path.clone();

    services.downloads.delete(&admin, created.id).await?;

    assert!(!dir.path().join(&path).exists());
    match services.downloads.find(created.id).await {
        Err(AppError::NotFound(_)) => {}
        other => panic!("deleted download should 404, got {:?}", other.map(|_| ())),
    }

    Ok(())
}
