use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::{Announcement, AnnouncementType},
    error::{AppError, Result},
    repository::AnnouncementRepository,
};

#[derive(FromRow)]
struct AnnouncementRow {
    id: String,
    title: String,
    content: String,
    kind: String,
    is_featured: i32,
    image_path: Option<String>,
    is_active: i32,
    published_at: Option<NaiveDateTime>,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

pub struct SqliteAnnouncementRepository {
    pool: SqlitePool,
}

impl SqliteAnnouncementRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_announcement(row: AnnouncementRow) -> Result<Announcement> {
        Ok(Announcement {
            id: Uuid::parse_str(&row.id).map_err(|e| AppError::Database(e.to_string()))?,
            title: row.title,
            content: row.content,
            kind: AnnouncementType::parse(&row.kind)
                .ok_or_else(|| AppError::Database(format!("Invalid announcement type: {}", row.kind)))?,
            is_featured: row.is_featured != 0,
            image_path: row.image_path,
            is_active: row.is_active != 0,
            published_at: row.published_at.map(|dt| DateTime::from_naive_utc_and_offset(dt, Utc)),
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
            updated_at: DateTime::from_naive_utc_and_offset(row.updated_at, Utc),
        })
    }
}

#[async_trait]
impl AnnouncementRepository for SqliteAnnouncementRepository {
    async fn create(&self, announcement: Announcement) -> Result<Announcement> {
        let id_str = announcement.id.to_string();
        let is_featured_int = if announcement.is_featured { 1i32 } else { 0i32 };
        let is_active_int = if announcement.is_active { 1i32 } else { 0i32 };
        let published_at_naive = announcement.published_at.map(|dt| dt.naive_utc());
        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            INSERT INTO announcements (
                id, title, content, type, is_featured, image_path,
                is_active, published_at, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#
        )
        .bind(&id_str)
        .bind(&announcement.title)
        .bind(&announcement.content)
        .bind(announcement.kind.as_str())
        .bind(is_featured_int)
        .bind(&announcement.image_path)
        .bind(is_active_int)
        .bind(published_at_naive)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(announcement.id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created announcement".to_string())
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Announcement>> {
        let id_str = id.to_string();
        let row = sqlx::query_as::<_, AnnouncementRow>(
            r#"
            SELECT id, title, content, type AS kind, is_featured, image_path,
                   is_active, published_at, created_at, updated_at
            FROM announcements
            WHERE id = ?
            "#
        )
        .bind(id_str)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        match row {
            Some(r) => Ok(Some(Self::row_to_announcement(r)?)),
            None => Ok(None),
        }
    }

    async fn list_all(&self) -> Result<Vec<Announcement>> {
        let rows = sqlx::query_as::<_, AnnouncementRow>(
            r#"
            SELECT id, title, content, type AS kind, is_featured, image_path,
                   is_active, published_at, created_at, updated_at
            FROM announcements
            ORDER BY published_at DESC, created_at DESC
            "#
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter()
            .map(Self::row_to_announcement)
            .collect()
    }

    async fn update(&self, id: Uuid, announcement: Announcement) -> Result<Announcement> {
        let id_str = id.to_string();
        let is_featured_int = if announcement.is_featured { 1i32 } else { 0i32 };
        let is_active_int = if announcement.is_active { 1i32 } else { 0i32 };
        let published_at_naive = announcement.published_at.map(|dt| dt.naive_utc());
        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            UPDATE announcements
            SET title = ?, content = ?, type = ?, is_featured = ?,
                image_path = ?, is_active = ?, published_at = ?, updated_at = ?
            WHERE id = ?
            "#
        )
        .bind(&announcement.title)
        .bind(&announcement.content)
        .bind(announcement.kind.as_str())
        .bind(is_featured_int)
        .bind(&announcement.image_path)
        .bind(is_active_int)
        .bind(published_at_naive)
        .bind(now)
        .bind(&id_str)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve updated announcement".to_string())
        })
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let id_str = id.to_string();
        sqlx::query("DELETE FROM announcements WHERE id = ?")
            .bind(&id_str)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }
}
