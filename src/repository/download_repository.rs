use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::{Download, DownloadCategory},
    error::{AppError, Result},
    repository::DownloadRepository,
};

#[derive(FromRow)]
struct DownloadRow {
    id: String,
    title: String,
    description: String,
    file_path: String,
    file_type: String,
    file_size: String,
    category: String,
    download_count: i64,
    is_active: i32,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

pub struct SqliteDownloadRepository {
    pool: SqlitePool,
}

impl SqliteDownloadRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_download(row: DownloadRow) -> Result<Download> {
        Ok(Download {
            id: Uuid::parse_str(&row.id).map_err(|e| AppError::Database(e.to_string()))?,
            title: row.title,
            description: row.description,
            file_path: row.file_path,
            file_type: row.file_type,
            file_size: row.file_size,
            category: DownloadCategory::parse(&row.category)
                .ok_or_else(|| AppError::Database(format!("Invalid download category: {}", row.category)))?,
            download_count: row.download_count,
            is_active: row.is_active != 0,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
            updated_at: DateTime::from_naive_utc_and_offset(row.updated_at, Utc),
        })
    }
}

#[async_trait]
impl DownloadRepository for SqliteDownloadRepository {
    async fn create(&self, download: Download) -> Result<Download> {
        let id_str = download.id.to_string();
        let is_active_int = if download.is_active { 1i32 } else { 0i32 };
        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            INSERT INTO downloads (
                id, title, description, file_path, file_type, file_size,
                category, download_count, is_active, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#
        )
        .bind(&id_str)
        .bind(&download.title)
        .bind(&download.description)
        .bind(&download.file_path)
        .bind(&download.file_type)
        .bind(&download.file_size)
        .bind(download.category.as_str())
        .bind(download.download_count)
        .bind(is_active_int)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(download.id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created download".to_string())
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Download>> {
        let id_str = id.to_string();
        let row = sqlx::query_as::<_, DownloadRow>(
            r#"
            SELECT id, title, description, file_path, file_type, file_size,
                   category, download_count, is_active, created_at, updated_at
            FROM downloads
            WHERE id = ?
            "#
        )
        .bind(id_str)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        match row {
            Some(r) => Ok(Some(Self::row_to_download(r)?)),
            None => Ok(None),
        }
    }

    async fn list_all(&self) -> Result<Vec<Download>> {
        let rows = sqlx::query_as::<_, DownloadRow>(
            r#"
            SELECT id, title, description, file_path, file_type, file_size,
                   category, download_count, is_active, created_at, updated_at
            FROM downloads
            ORDER BY created_at DESC
            "#
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter()
            .map(Self::row_to_download)
            .collect()
    }

    async fn update(&self, id: Uuid, download: Download) -> Result<Download> {
        let id_str = id.to_string();
        let is_active_int = if download.is_active { 1i32 } else { 0i32 };
        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            UPDATE downloads
            SET title = ?, description = ?, file_path = ?, file_type = ?,
                file_size = ?, category = ?, is_active = ?, updated_at = ?
            WHERE id = ?
            "#
        )
        .bind(&download.title)
        .bind(&download.description)
        .bind(&download.file_path)
        .bind(&download.file_type)
        .bind(&download.file_size)
        .bind(download.category.as_str())
        .bind(is_active_int)
        .bind(now)
        .bind(&id_str)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve updated download".to_string())
        })
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let id_str = id.to_string();
        sqlx::query("DELETE FROM downloads WHERE id = ?")
            .bind(&id_str)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    async fn increment_download_count(&self, id: Uuid) -> Result<()> {
        let id_str = id.to_string();
        sqlx::query(
            "UPDATE downloads SET download_count = download_count + 1 WHERE id = ?"
        )
        .bind(&id_str)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }
}
