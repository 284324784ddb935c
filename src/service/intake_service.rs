//! Public intake pipelines: the join form and the feedback form. Both accept
//! anonymous submissions, so the write path is validate → persist with the
//! initial workflow status; everything after that is admin review.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    auth::Session,
    domain::{
        Feedback, FeedbackCategory, FeedbackInput, FeedbackReview, FeedbackStatus,
        MemberRegistration, RegistrationInput, RegistrationReview, RegistrationStatus,
    },
    error::{AppError, Result},
    listing::{paginate, FilterSet, ListQuery, Listing, ADMIN_PAGE_SIZE},
    repository::{FeedbackRepository, MemberRegistrationRepository},
    validate::FieldErrors,
};

pub struct RegistrationService {
    repo: Arc<dyn MemberRegistrationRepository>,
}

impl RegistrationService {
    pub fn new(repo: Arc<dyn MemberRegistrationRepository>) -> Self {
        Self { repo }
    }

    pub async fn submit(&self, input: RegistrationInput) -> Result<MemberRegistration> {
        let mut errors = FieldErrors::new();
        if let Err(e) = input.validate() {
            errors.merge_validator(&e);
        }
        errors.into_result()?;

        let now = Utc::now();
        let registration = MemberRegistration {
            id: Uuid::new_v4(),
            full_name: input.full_name,
            email: input.email,
            phone: input.phone,
            class: input.class,
            student_id: input.student_id,
            motivation: input.motivation,
            preferred_division: input.preferred_division,
            skills: input.skills,
            status: RegistrationStatus::Pending,
            notes: None,
            created_at: now,
            updated_at: now,
        };

        let created = self.repo.create(registration).await?;
        tracing::info!(id = %created.id, "registration submitted");
        Ok(created)
    }

    pub async fn list_admin(&self, query: &ListQuery) -> Result<Listing<MemberRegistration>> {
        let matched = FilterSet::new()
            .search(query.search.as_deref(), |r: &MemberRegistration| {
                let mut haystacks = vec![
                    r.full_name.as_str(),
                    r.email.as_str(),
                    r.class.as_str(),
                    r.student_id.as_str(),
                ];
                if let Some(division) = r.preferred_division.as_deref() {
                    haystacks.push(division);
                }
                haystacks
            })
            .equals(query.status.as_deref(), |r| r.status.as_str().to_string())
            .apply(self.repo.list_all().await?);

        Ok(Listing::new(paginate(matched, query.page(), ADMIN_PAGE_SIZE), query))
    }

    pub async fn find(&self, id: Uuid) -> Result<MemberRegistration> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Registration not found".to_string()))
    }

    pub async fn review(
        &self,
        actor: &Session,
        id: Uuid,
        review: RegistrationReview,
    ) -> Result<MemberRegistration> {
        self.find(id).await?;

        let mut errors = FieldErrors::new();
        if let Err(e) = review.validate() {
            errors.merge_validator(&e);
        }
        errors.into_result()?;

        let status = RegistrationStatus::parse(&review.status)
            .ok_or_else(|| AppError::BadRequest("Unknown registration status".to_string()))?;

        let updated = self.repo.update_review(id, status, review.notes).await?;
        tracing::info!(admin = %actor.user_id, id = %updated.id, status = status.as_str(), "registration reviewed");
        Ok(updated)
    }

    pub async fn delete(&self, actor: &Session, id: Uuid) -> Result<()> {
        self.find(id).await?;
        self.repo.delete(id).await?;
        tracing::info!(admin = %actor.user_id, %id, "registration deleted");
        Ok(())
    }
}

pub struct FeedbackService {
    repo: Arc<dyn FeedbackRepository>,
}

impl FeedbackService {
    pub fn new(repo: Arc<dyn FeedbackRepository>) -> Self {
        Self { repo }
    }

    pub async fn submit(&self, input: FeedbackInput) -> Result<Feedback> {
        let mut errors = FieldErrors::new();
        if let Err(e) = input.validate() {
            errors.merge_validator(&e);
        }
        errors.into_result()?;

        let category = FeedbackCategory::parse(&input.category)
            .ok_or_else(|| AppError::BadRequest("Unknown feedback category".to_string()))?;

        let now = Utc::now();
        let feedback = Feedback {
            id: Uuid::new_v4(),
            name: input.name,
            email: input.email,
            category,
            subject: input.subject,
            message: input.message,
            status: FeedbackStatus::Unread,
            response: None,
            responded_at: None,
            created_at: now,
            updated_at: now,
        };

        let created = self.repo.create(feedback).await?;
        tracing::info!(id = %created.id, "feedback submitted");
        Ok(created)
    }

    pub async fn list_admin(&self, query: &ListQuery) -> Result<Listing<Feedback>> {
        let matched = FilterSet::new()
            .search(query.search.as_deref(), |f: &Feedback| {
                vec![f.name.as_str(), f.email.as_str(), f.subject.as_str(), f.message.as_str()]
            })
            .equals(query.category.as_deref(), |f| f.category.as_str().to_string())
            .equals(query.status.as_deref(), |f| f.status.as_str().to_string())
            .apply(self.repo.list_all().await?);

        Ok(Listing::new(paginate(matched, query.page(), ADMIN_PAGE_SIZE), query))
    }

    pub async fn find(&self, id: Uuid) -> Result<Feedback> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Feedback not found".to_string()))
    }

    pub async fn review(&self, actor: &Session, id: Uuid, review: FeedbackReview) -> Result<Feedback> {
        self.find(id).await?;

        let mut errors = FieldErrors::new();
        if let Err(e) = review.validate() {
            errors.merge_validator(&e);
        }
        errors.into_result()?;

        let status = FeedbackStatus::parse(&review.status)
            .ok_or_else(|| AppError::BadRequest("Unknown feedback status".to_string()))?;

        let updated = self.repo.update_response(id, status, review.response).await?;
        tracing::info!(admin = %actor.user_id, id = %updated.id, status = status.as_str(), "feedback reviewed");
        Ok(updated)
    }

    pub async fn delete(&self, actor: &Session, id: Uuid) -> Result<()> {
        self.find(id).await?;
        self.repo.delete(id).await?;
        tracing::info!(admin = %actor.user_id, %id, "feedback deleted");
        Ok(())
    }
}
