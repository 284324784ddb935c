use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::Testimonial,
    error::{AppError, Result},
    repository::TestimonialRepository,
};

#[derive(FromRow)]
struct TestimonialRow {
    id: String,
    name: String,
    role: String,
    content: String,
    photo_path: Option<String>,
    rating: i32,
    is_featured: i32,
    is_active: i32,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

pub struct SqliteTestimonialRepository {
    pool: SqlitePool,
}

impl SqliteTestimonialRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_testimonial(row: TestimonialRow) -> Result<Testimonial> {
        Ok(Testimonial {
            id: Uuid::parse_str(&row.id).map_err(|e| AppError::Database(e.to_string()))?,
            name: row.name,
            role: row.role,
            content: row.content,
            photo_path: row.photo_path,
            rating: row.rating,
            is_featured: row.is_featured != 0,
            is_active: row.is_active != 0,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
            updated_at: DateTime::from_naive_utc_and_offset(row.updated_at, Utc),
        })
    }
}

#[async_trait]
impl TestimonialRepository for SqliteTestimonialRepository {
    async fn create(&self, testimonial: Testimonial) -> Result<Testimonial> {
        let id_str = testimonial.id.to_string();
        let is_featured_int = if testimonial.is_featured { 1i32 } else { 0i32 };
        let is_active_int = if testimonial.is_active { 1i32 } else { 0i32 };
        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            INSERT INTO testimonials (
                id, name, role, content, photo_path, rating, is_featured,
                is_active, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#
        )
        .bind(&id_str)
        .bind(&testimonial.name)
        .bind(&testimonial.role)
        .bind(&testimonial.content)
        .bind(&testimonial.photo_path)
        .bind(testimonial.rating)
        .bind(is_featured_int)
        .bind(is_active_int)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(testimonial.id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created testimonial".to_string())
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Testimonial>> {
        let id_str = id.to_string();
        let row = sqlx::query_as::<_, TestimonialRow>(
            r#"
            SELECT id, name, role, content, photo_path, rating, is_featured,
                   is_active, created_at, updated_at
            FROM testimonials
            WHERE id = ?
            "#
        )
        .bind(id_str)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        match row {
            Some(r) => Ok(Some(Self::row_to_testimonial(r)?)),
            None => Ok(None),
        }
    }

    async fn list_all(&self) -> Result<Vec<Testimonial>> {
        let rows = sqlx::query_as::<_, TestimonialRow>(
            r#"
            SELECT id, name, role, content, photo_path, rating, is_featured,
                   is_active, created_at, updated_at
            FROM testimonials
            ORDER BY created_at DESC
            "#
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter()
            .map(Self::row_to_testimonial)
            .collect()
    }

    async fn update(&self, id: Uuid, testimonial: Testimonial) -> Result<Testimonial> {
        let id_str = id.to_string();
        let is_featured_int = if testimonial.is_featured { 1i32 } else { 0i32 };
        let is_active_int = if testimonial.is_active { 1i32 } else { 0i32 };
        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            UPDATE testimonials
            SET name = ?, role = ?, content = ?, photo_path = ?, rating = ?,
                is_featured = ?, is_active = ?, updated_at = ?
            WHERE id = ?
            "#
        )
        .bind(&testimonial.name)
        .bind(&testimonial.role)
        .bind(&testimonial.content)
        .bind(&testimonial.photo_path)
        .bind(testimonial.rating)
        .bind(is_featured_int)
        .bind(is_active_int)
        .bind(now)
        .bind(&id_str)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve updated testimonial".to_string())
        })
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let id_str = id.to_string();
        sqlx::query("DELETE FROM testimonials WHERE id = ?")
            .bind(&id_str)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }
}
