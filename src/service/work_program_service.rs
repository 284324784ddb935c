use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    auth::Session,
    domain::{WorkProgram, WorkProgramCategory, WorkProgramInput, WorkProgramStatus},
    error::{AppError, Result},
    listing::{paginate, FilterSet, ListQuery, Listing, ADMIN_PAGE_SIZE, PUBLIC_PAGE_SIZE, RELATED_LIMIT},
    repository::WorkProgramRepository,
    validate::FieldErrors,
};

pub struct WorkProgramService {
    repo: Arc<dyn WorkProgramRepository>,
}

impl WorkProgramService {
    pub fn new(repo: Arc<dyn WorkProgramRepository>) -> Self {
        Self { repo }
    }

    fn filters(query: &ListQuery) -> FilterSet<WorkProgram> {
        FilterSet::new()
            .search(query.search.as_deref(), |p: &WorkProgram| {
                vec![p.title.as_str(), p.description.as_str()]
            })
            .equals(query.category.as_deref(), |p| p.category.as_str().to_string())
            .equals(query.status.as_deref(), |p| p.status.as_str().to_string())
            .equals(query.year.as_deref(), |p| p.academic_year.clone())
            .featured(query.featured_filter(), |p| p.is_featured)
    }

    /// Distinct academic years present in the table, newest first, for the
    /// year selector on the programs page.
    fn available_years(programs: &[WorkProgram]) -> Vec<String> {
        let mut years: Vec<String> = programs.iter().map(|p| p.academic_year.clone()).collect();
        years.sort();
        years.dedup();
        years.reverse();
        years
    }

    pub async fn list_public(&self, query: &ListQuery) -> Result<(Listing<WorkProgram>, Vec<String>)> {
        let all = self.repo.list_all().await?;
        let years = Self::available_years(&all);
        let matched = Self::filters(query).apply(all);

        Ok((
            Listing::new(paginate(matched, query.page(), PUBLIC_PAGE_SIZE), query),
            years,
        ))
    }

    pub async fn show_public(&self, id: Uuid) -> Result<(WorkProgram, Vec<WorkProgram>)> {
        let program = self.find(id).await?;

        let related = self
            .repo
            .list_all()
            .await?
            .into_iter()
            .filter(|p| {
                p.id != program.id
                    && p.academic_year == program.academic_year
                    && p.category == program.category
            })
            .take(RELATED_LIMIT)
            .collect();

        Ok((program, related))
    }

    pub async fn list_admin(&self, query: &ListQuery) -> Result<Listing<WorkProgram>> {
        let matched = Self::filters(query).apply(self.repo.list_all().await?);
        Ok(Listing::new(paginate(matched, query.page(), ADMIN_PAGE_SIZE), query))
    }

    pub async fn find(&self, id: Uuid) -> Result<WorkProgram> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Work program not found".to_string()))
    }

    pub async fn create(&self, actor: &Session, input: WorkProgramInput) -> Result<WorkProgram> {
        let program = self.build(input, None)?;
        let created = self.repo.create(program).await?;
        tracing::info!(admin = %actor.user_id, id = %created.id, "work program created");
        Ok(created)
    }

    pub async fn update(
        &self,
        actor: &Session,
        id: Uuid,
        input: WorkProgramInput,
    ) -> Result<WorkProgram> {
        let existing = self.find(id).await?;
        let program = self.build(input, Some(&existing))?;
        let updated = self.repo.update(id, program).await?;
        tracing::info!(admin = %actor.user_id, id = %updated.id, "work program updated");
        Ok(updated)
    }

    pub async fn delete(&self, actor: &Session, id: Uuid) -> Result<()> {
        self.find(id).await?;
        self.repo.delete(id).await?;
        tracing::info!(admin = %actor.user_id, %id, "work program deleted");
        Ok(())
    }

    fn build(&self, input: WorkProgramInput, existing: Option<&WorkProgram>) -> Result<WorkProgram> {
        let mut errors = FieldErrors::new();
        if let Err(e) = input.validate() {
            errors.merge_validator(&e);
        }
        // A program may end the day it starts, but never before.
        if let (Some(start), Some(end)) = (input.start_date, input.end_date) {
            if end < start {
                errors.insert("end_date", "must not be before the start date");
            }
        }
        errors.into_result()?;

        let category = WorkProgramCategory::parse(&input.category)
            .ok_or_else(|| AppError::BadRequest("Unknown work program category".to_string()))?;
        let status = WorkProgramStatus::parse(&input.status)
            .ok_or_else(|| AppError::BadRequest("Unknown work program status".to_string()))?;
        let start_date = input
            .start_date
            .ok_or_else(|| AppError::BadRequest("Start date is required".to_string()))?;

        let now = Utc::now();
        Ok(WorkProgram {
            id: existing.map(|p| p.id).unwrap_or_else(Uuid::new_v4),
            title: input.title,
            description: input.description,
            academic_year: input.academic_year,
            category,
            status,
            start_date,
            end_date: input.end_date,
            objectives: input.objectives,
            outcome: input.outcome,
            is_featured: input.is_featured,
            created_at: existing.map(|p| p.created_at).unwrap_or(now),
            updated_at: now,
        })
    }
}
