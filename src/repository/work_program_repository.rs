use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::{WorkProgram, WorkProgramCategory, WorkProgramStatus},
    error::{AppError, Result},
    repository::WorkProgramRepository,
};

#[derive(FromRow)]
struct WorkProgramRow {
    id: String,
    title: String,
    description: String,
    academic_year: String,
    category: String,
    status: String,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
    objectives: Option<String>,
    outcome: Option<String>,
    is_featured: i32,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

pub struct SqliteWorkProgramRepository {
    pool: SqlitePool,
}

impl SqliteWorkProgramRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_program(row: WorkProgramRow) -> Result<WorkProgram> {
        let objectives: Option<Vec<String>> = row
            .objectives
            .as_deref()
            .map(serde_json::from_str)
            .transpose()
            .map_err(|e| AppError::Database(format!("Invalid objectives column: {}", e)))?;

        Ok(WorkProgram {
            id: Uuid::parse_str(&row.id).map_err(|e| AppError::Database(e.to_string()))?,
            title: row.title,
            description: row.description,
            academic_year: row.academic_year,
            category: WorkProgramCategory::parse(&row.category)
                .ok_or_else(|| AppError::Database(format!("Invalid program category: {}", row.category)))?,
            status: WorkProgramStatus::parse(&row.status)
                .ok_or_else(|| AppError::Database(format!("Invalid program status: {}", row.status)))?,
            start_date: row.start_date,
            end_date: row.end_date,
            objectives,
            outcome: row.outcome,
            is_featured: row.is_featured != 0,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
            updated_at: DateTime::from_naive_utc_and_offset(row.updated_at, Utc),
        })
    }

    fn objectives_to_json(objectives: &Option<Vec<String>>) -> Result<Option<String>> {
        objectives
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[async_trait]
impl WorkProgramRepository for SqliteWorkProgramRepository {
    async fn create(&self, program: WorkProgram) -> Result<WorkProgram> {
        let id_str = program.id.to_string();
        let objectives_json = Self::objectives_to_json(&program.objectives)?;
        let is_featured_int = if program.is_featured { 1i32 } else { 0i32 };
        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            INSERT INTO work_programs (
                id, title, description, academic_year, category, status,
                start_date, end_date, objectives, outcome, is_featured,
                created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#
        )
        .bind(&id_str)
        .bind(&program.title)
        .bind(&program.description)
        .bind(&program.academic_year)
        .bind(program.category.as_str())
        .bind(program.status.as_str())
        .bind(program.start_date)
        .bind(program.end_date)
        .bind(&objectives_json)
        .bind(&program.outcome)
        .bind(is_featured_int)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(program.id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created work program".to_string())
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<WorkProgram>> {
        let id_str = id.to_string();
        let row = sqlx::query_as::<_, WorkProgramRow>(
            r#"
            SELECT id, title, description, academic_year, category, status,
                   start_date, end_date, objectives, outcome, is_featured,
                   created_at, updated_at
            FROM work_programs
            WHERE id = ?
            "#
        )
        .bind(id_str)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        match row {
            Some(r) => Ok(Some(Self::row_to_program(r)?)),
            None => Ok(None),
        }
    }

    async fn list_all(&self) -> Result<Vec<WorkProgram>> {
        let rows = sqlx::query_as::<_, WorkProgramRow>(
            r#"
            SELECT id, title, description, academic_year, category, status,
                   start_date, end_date, objectives, outcome, is_featured,
                   created_at, updated_at
            FROM work_programs
            ORDER BY start_date DESC, created_at DESC
            "#
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter()
            .map(Self::row_to_program)
            .collect()
    }

    async fn update(&self, id: Uuid, program: WorkProgram) -> Result<WorkProgram> {
        let id_str = id.to_string();
        let objectives_json = Self::objectives_to_json(&program.objectives)?;
        let is_featured_int = if program.is_featured { 1i32 } else { 0i32 };
        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            UPDATE work_programs
            SET title = ?, description = ?, academic_year = ?, category = ?,
                status = ?, start_date = ?, end_date = ?, objectives = ?,
                outcome = ?, is_featured = ?, updated_at = ?
            WHERE id = ?
            "#
        )
        .bind(&program.title)
        .bind(&program.description)
        .bind(&program.academic_year)
        .bind(program.category.as_str())
        .bind(program.status.as_str())
        .bind(program.start_date)
        .bind(program.end_date)
        .bind(&objectives_json)
        .bind(&program.outcome)
        .bind(is_featured_int)
        .bind(now)
        .bind(&id_str)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve updated work program".to_string())
        })
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let id_str = id.to_string();
        sqlx::query("DELETE FROM work_programs WHERE id = ?")
            .bind(&id_str)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }
}
