use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::OrganizationMember,
    error::{AppError, Result},
    repository::OrganizationMemberRepository,
};

#[derive(FromRow)]
struct OrganizationMemberRow {
    id: String,
    name: String,
    position: String,
    class: String,
    photo_path: Option<String>,
    bio: Option<String>,
    order_position: i64,
    is_active: i32,
    period: String,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

pub struct SqliteOrganizationMemberRepository {
    pool: SqlitePool,
}

impl SqliteOrganizationMemberRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_member(row: OrganizationMemberRow) -> Result<OrganizationMember> {
        Ok(OrganizationMember {
            id: Uuid::parse_str(&row.id).map_err(|e| AppError::Database(e.to_string()))?,
            name: row.name,
            position: row.position,
            class: row.class,
            photo_path: row.photo_path,
            bio: row.bio,
            order_position: row.order_position,
            is_active: row.is_active != 0,
            period: row.period,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
            updated_at: DateTime::from_naive_utc_and_offset(row.updated_at, Utc),
        })
    }
}

#[async_trait]
impl OrganizationMemberRepository for SqliteOrganizationMemberRepository {
    async fn create(&self, member: OrganizationMember) -> Result<OrganizationMember> {
        let id_str = member.id.to_string();
        let is_active_int = if member.is_active { 1i32 } else { 0i32 };
        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            INSERT INTO organization_members (
                id, name, position, class, photo_path, bio, order_position,
                is_active, period, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#
        )
        .bind(&id_str)
        .bind(&member.name)
        .bind(&member.position)
        .bind(&member.class)
        .bind(&member.photo_path)
        .bind(&member.bio)
        .bind(member.order_position)
        .bind(is_active_int)
        .bind(&member.period)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(member.id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created organization member".to_string())
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<OrganizationMember>> {
        let id_str = id.to_string();
        let row = sqlx::query_as::<_, OrganizationMemberRow>(
            r#"
            SELECT id, name, position, class, photo_path, bio, order_position,
                   is_active, period, created_at, updated_at
            FROM organization_members
            WHERE id = ?
            "#
        )
        .bind(id_str)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        match row {
            Some(r) => Ok(Some(Self::row_to_member(r)?)),
            None => Ok(None),
        }
    }

    async fn list_all(&self) -> Result<Vec<OrganizationMember>> {
        let rows = sqlx::query_as::<_, OrganizationMemberRow>(
            r#"
            SELECT id, name, position, class, photo_path, bio, order_position,
                   is_active, period, created_at, updated_at
            FROM organization_members
            ORDER BY order_position ASC, created_at ASC
            "#
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter()
            .map(Self::row_to_member)
            .collect()
    }

    async fn update(&self, id: Uuid, member: OrganizationMember) -> Result<OrganizationMember> {
        let id_str = id.to_string();
        let is_active_int = if member.is_active { 1i32 } else { 0i32 };
        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            UPDATE organization_members
            SET name = ?, position = ?, class = ?, photo_path = ?, bio = ?,
                order_position = ?, is_active = ?, period = ?, updated_at = ?
            WHERE id = ?
            "#
        )
        .bind(&member.name)
        .bind(&member.position)
        .bind(&member.class)
        .bind(&member.photo_path)
        .bind(&member.bio)
        .bind(member.order_position)
        .bind(is_active_int)
        .bind(&member.period)
        .bind(now)
        .bind(&id_str)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve updated organization member".to_string())
        })
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let id_str = id.to_string();
        sqlx::query("DELETE FROM organization_members WHERE id = ?")
            .bind(&id_str)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }
}
