use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::{Activity, ActivityCategory},
    error::{AppError, Result},
    repository::ActivityRepository,
};

#[derive(FromRow)]
struct ActivityRow {
    id: String,
    title: String,
    description: String,
    category: String,
    gallery_images: String,
    video_url: Option<String>,
    activity_date: NaiveDate,
    is_featured: i32,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

pub struct SqliteActivityRepository {
    pool: SqlitePool,
}

impl SqliteActivityRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_activity(row: ActivityRow) -> Result<Activity> {
        // Gallery paths live in a JSON text column, '[]' when empty.
        let gallery_images: Vec<String> = serde_json::from_str(&row.gallery_images)
            .map_err(|e| AppError::Database(format!("Invalid gallery column: {}", e)))?;

        Ok(Activity {
            id: Uuid::parse_str(&row.id).map_err(|e| AppError::Database(e.to_string()))?,
            title: row.title,
            description: row.description,
            category: ActivityCategory::parse(&row.category)
                .ok_or_else(|| AppError::Database(format!("Invalid activity category: {}", row.category)))?,
            gallery_images,
            video_url: row.video_url,
            activity_date: row.activity_date,
            is_featured: row.is_featured != 0,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
            updated_at: DateTime::from_naive_utc_and_offset(row.updated_at, Utc),
        })
    }

    fn gallery_to_json(gallery: &[String]) -> Result<String> {
        serde_json::to_string(gallery).map_err(|e| AppError::Database(e.to_string()))
    }
}

#[async_trait]
impl ActivityRepository for SqliteActivityRepository {
    async fn create(&self, activity: Activity) -> Result<Activity> {
        let id_str = activity.id.to_string();
        let gallery_json = Self::gallery_to_json(&activity.gallery_images)?;
        let is_featured_int = if activity.is_featured { 1i32 } else { 0i32 };
        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            INSERT INTO activities (
                id, title, description, category, gallery_images, video_url,
                activity_date, is_featured, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#
        )
        .bind(&id_str)
        .bind(&activity.title)
        .bind(&activity.description)
        .bind(activity.category.as_str())
        .bind(&gallery_json)
        .bind(&activity.video_url)
        .bind(activity.activity_date)
        .bind(is_featured_int)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(activity.id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created activity".to_string())
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Activity>> {
        let id_str = id.to_string();
        let row = sqlx::query_as::<_, ActivityRow>(
            r#"
            SELECT id, title, description, category, gallery_images, video_url,
                   activity_date, is_featured, created_at, updated_at
            FROM activities
            WHERE id = ?
            "#
        )
        .bind(id_str)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        match row {
            Some(r) => Ok(Some(Self::row_to_activity(r)?)),
            None => Ok(None),
        }
    }

    async fn list_all(&self) -> Result<Vec<Activity>> {
        let rows = sqlx::query_as::<_, ActivityRow>(
            r#"
            SELECT id, title, description, category, gallery_images, video_url,
                   activity_date, is_featured, created_at, updated_at
            FROM activities
            ORDER BY activity_date DESC, created_at DESC
            "#
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter()
            .map(Self::row_to_activity)
            .collect()
    }

    async fn update(&self, id: Uuid, activity: Activity) -> Result<Activity> {
        let id_str = id.to_string();
        let gallery_json = Self::gallery_to_json(&activity.gallery_images)?;
        let is_featured_int = if activity.is_featured { 1i32 } else { 0i32 };
        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            UPDATE activities
            SET title = ?, description = ?, category = ?, gallery_images = ?,
                video_url = ?, activity_date = ?, is_featured = ?, updated_at = ?
            WHERE id = ?
            "#
        )
        .bind(&activity.title)
        .bind(&activity.description)
        .bind(activity.category.as_str())
        .bind(&gallery_json)
        .bind(&activity.video_url)
        .bind(activity.activity_date)
        .bind(is_featured_int)
        .bind(now)
        .bind(&id_str)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve updated activity".to_string())
        })
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let id_str = id.to_string();
        sqlx::query("DELETE FROM activities WHERE id = ?")
            .bind(&id_str)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }
}
