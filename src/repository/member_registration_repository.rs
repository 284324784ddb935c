use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::{MemberRegistration, RegistrationStatus},
    error::{AppError, Result},
    repository::MemberRegistrationRepository,
};

#[derive(FromRow)]
struct MemberRegistrationRow {
    id: String,
    full_name: String,
    email: String,
    phone: String,
    class: String,
    student_id: String,
    motivation: String,
    preferred_division: Option<String>,
    skills: Option<String>,
    status: String,
    notes: Option<String>,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

pub struct SqliteMemberRegistrationRepository {
    pool: SqlitePool,
}

impl SqliteMemberRegistrationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_registration(row: MemberRegistrationRow) -> Result<MemberRegistration> {
        let skills: Option<Vec<String>> = row
            .skills
            .as_deref()
            .map(serde_json::from_str)
            .transpose()
            .map_err(|e| AppError::Database(format!("Invalid skills column: {}", e)))?;

        Ok(MemberRegistration {
            id: Uuid::parse_str(&row.id).map_err(|e| AppError::Database(e.to_string()))?,
            full_name: row.full_name,
            email: row.email,
            phone: row.phone,
            class: row.class,
            student_id: row.student_id,
            motivation: row.motivation,
            preferred_division: row.preferred_division,
            skills,
            status: RegistrationStatus::parse(&row.status)
                .ok_or_else(|| AppError::Database(format!("Invalid registration status: {}", row.status)))?,
            notes: row.notes,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
            updated_at: DateTime::from_naive_utc_and_offset(row.updated_at, Utc),
        })
    }
}

#[async_trait]
impl MemberRegistrationRepository for SqliteMemberRegistrationRepository {
    async fn create(&self, registration: MemberRegistration) -> Result<MemberRegistration> {
        let id_str = registration.id.to_string();
        let skills_json = registration
            .skills
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| AppError::Database(e.to_string()))?;
        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            INSERT INTO member_registrations (
                id, full_name, email, phone, class, student_id, motivation,
                preferred_division, skills, status, notes, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#
        )
        .bind(&id_str)
        .bind(&registration.full_name)
        .bind(&registration.email)
        .bind(&registration.phone)
        .bind(&registration.class)
        .bind(&registration.student_id)
        .bind(&registration.motivation)
        .bind(&registration.preferred_division)
        .bind(&skills_json)
        .bind(registration.status.as_str())
        .bind(&registration.notes)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(registration.id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created registration".to_string())
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<MemberRegistration>> {
        let id_str = id.to_string();
        let row = sqlx::query_as::<_, MemberRegistrationRow>(
            r#"
            SELECT id, full_name, email, phone, class, student_id, motivation,
                   preferred_division, skills, status, notes, created_at, updated_at
            FROM member_registrations
            WHERE id = ?
            "#
        )
        .bind(id_str)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        match row {
            Some(r) => Ok(Some(Self::row_to_registration(r)?)),
            None => Ok(None),
        }
    }

    async fn list_all(&self) -> Result<Vec<MemberRegistration>> {
        let rows = sqlx::query_as::<_, MemberRegistrationRow>(
            r#"
            SELECT id, full_name, email, phone, class, student_id, motivation,
                   preferred_division, skills, status, notes, created_at, updated_at
            FROM member_registrations
            ORDER BY created_at DESC
            "#
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter()
            .map(Self::row_to_registration)
            .collect()
    }

    async fn update_review(
        &self,
        id: Uuid,
        status: RegistrationStatus,
        notes: Option<String>,
    ) -> Result<MemberRegistration> {
        let id_str = id.to_string();
        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            UPDATE member_registrations
            SET status = ?, notes = ?, updated_at = ?
            WHERE id = ?
            "#
        )
        .bind(status.as_str())
        .bind(&notes)
        .bind(now)
        .bind(&id_str)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve reviewed registration".to_string())
        })
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let id_str = id.to_string();
        sqlx::query("DELETE FROM member_registrations WHERE id = ?")
            .bind(&id_str)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }
}
