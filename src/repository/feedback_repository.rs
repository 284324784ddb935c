use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::{Feedback, FeedbackCategory, FeedbackStatus},
    error::{AppError, Result},
    repository::FeedbackRepository,
};

#[derive(FromRow)]
struct FeedbackRow {
    id: String,
    name: String,
    email: String,
    category: String,
    subject: String,
    message: String,
    status: String,
    response: Option<String>,
    responded_at: Option<NaiveDateTime>,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

pub struct SqliteFeedbackRepository {
    pool: SqlitePool,
}

impl SqliteFeedbackRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_feedback(row: FeedbackRow) -> Result<Feedback> {
        Ok(Feedback {
            id: Uuid::parse_str(&row.id).map_err(|e| AppError::Database(e.to_string()))?,
            name: row.name,
            email: row.email,
            category: FeedbackCategory::parse(&row.category)
                .ok_or_else(|| AppError::Database(format!("Invalid feedback category: {}", row.category)))?,
            subject: row.subject,
            message: row.message,
            status: FeedbackStatus::parse(&row.status)
                .ok_or_else(|| AppError::Database(format!("Invalid feedback status: {}", row.status)))?,
            response: row.response,
            responded_at: row.responded_at.map(|dt| DateTime::from_naive_utc_and_offset(dt, Utc)),
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
            updated_at: DateTime::from_naive_utc_and_offset(row.updated_at, Utc),
        })
    }
}

#[async_trait]
impl FeedbackRepository for SqliteFeedbackRepository {
    async fn create(&self, feedback: Feedback) -> Result<Feedback> {
        let id_str = feedback.id.to_string();
        let responded_at_naive = feedback.responded_at.map(|dt| dt.naive_utc());
        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            INSERT INTO feedback (
                id, name, email, category, subject, message, status,
                response, responded_at, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#
        )
        .bind(&id_str)
        .bind(&feedback.name)
        .bind(&feedback.email)
        .bind(feedback.category.as_str())
        .bind(&feedback.subject)
        .bind(&feedback.message)
        .bind(feedback.status.as_str())
        .bind(&feedback.response)
        .bind(responded_at_naive)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(feedback.id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created feedback".to_string())
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Feedback>> {
        let id_str = id.to_string();
        let row = sqlx::query_as::<_, FeedbackRow>(
            r#"
            SELECT id, name, email, category, subject, message, status,
                   response, responded_at, created_at, updated_at
            FROM feedback
            WHERE id = ?
            "#
        )
        .bind(id_str)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        match row {
            Some(r) => Ok(Some(Self::row_to_feedback(r)?)),
            None => Ok(None),
        }
    }

    async fn list_all(&self) -> Result<Vec<Feedback>> {
        let rows = sqlx::query_as::<_, FeedbackRow>(
            r#"
            SELECT id, name, email, category, subject, message, status,
                   response, responded_at, created_at, updated_at
            FROM feedback
            ORDER BY created_at DESC
            "#
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter()
            .map(Self::row_to_feedback)
            .collect()
    }

    async fn update_response(
        &self,
        id: Uuid,
        status: FeedbackStatus,
        response: Option<String>,
    ) -> Result<Feedback> {
        let id_str = id.to_string();
        let now = Utc::now().naive_utc();
        // responded_at tracks the response text: set when present, cleared
        // when the response is removed.
        let responded_at = response.as_ref().map(|_| now);

        sqlx::query(
            r#"
            UPDATE feedback
            SET status = ?, response = ?, responded_at = ?, updated_at = ?
            WHERE id = ?
            "#
        )
        .bind(status.as_str())
        .bind(&response)
        .bind(responded_at)
        .bind(now)
        .bind(&id_str)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve updated feedback".to_string())
        })
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let id_str = id.to_string();
        sqlx::query("DELETE FROM feedback WHERE id = ?")
            .bind(&id_str)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }
}
