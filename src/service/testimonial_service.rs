use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    auth::Session,
    domain::{Testimonial, TestimonialInput},
    error::{AppError, Result},
    listing::{paginate, FilterSet, ListQuery, Listing, ADMIN_PAGE_SIZE, PUBLIC_PAGE_SIZE},
    repository::TestimonialRepository,
    service::{ImageChange, ImagePlan},
    storage::{check_image, FileStore, StoredFile, UploadedFile},
    validate::FieldErrors,
};

pub struct TestimonialService {
    repo: Arc<dyn TestimonialRepository>,
    store: Arc<dyn FileStore>,
}

impl TestimonialService {
    pub fn new(repo: Arc<dyn TestimonialRepository>, store: Arc<dyn FileStore>) -> Self {
        Self { repo, store }
    }

    fn filters(query: &ListQuery) -> FilterSet<Testimonial> {
        FilterSet::new()
            .search(query.search.as_deref(), |t: &Testimonial| {
                vec![t.name.as_str(), t.role.as_str(), t.content.as_str()]
            })
            .equals(query.rating.as_deref(), |t| t.rating.to_string())
            .featured(query.featured_filter(), |t| t.is_featured)
    }

    pub async fn list_public(&self, query: &ListQuery) -> Result<Listing<Testimonial>> {
        let matched = Self::filters(query)
            .require(|t: &Testimonial| t.is_active)
            .apply(self.repo.list_all().await?);

        Ok(Listing::new(paginate(matched, query.page(), PUBLIC_PAGE_SIZE), query))
    }

    pub async fn list_admin(&self, query: &ListQuery) -> Result<Listing<Testimonial>> {
        let matched = Self::filters(query)
            .active(query.active_filter(), |t: &Testimonial| t.is_active)
            .apply(self.repo.list_all().await?);
        Ok(Listing::new(paginate(matched, query.page(), ADMIN_PAGE_SIZE), query))
    }

    pub async fn find(&self, id: Uuid) -> Result<Testimonial> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Testimonial not found".to_string()))
    }

    pub async fn create(
        &self,
        actor: &Session,
        input: TestimonialInput,
        photo: Option<UploadedFile>,
    ) -> Result<Testimonial> {
        let mut errors = FieldErrors::new();
        if let Err(e) = input.validate() {
            errors.merge_validator(&e);
        }
        if let Some(file) = &photo {
            check_image("photo", file, &mut errors);
        }
        errors.into_result()?;

        let photo_path = match photo {
            Some(file) => Some(self.store.store("testimonials", &file.name, &file.data).await?),
            None => None,
        };

        let now = Utc::now();
        let testimonial = Testimonial {
            id: Uuid::new_v4(),
            name: input.name,
            role: input.role,
            content: input.content,
            photo_path,
            rating: input.rating,
            is_featured: input.is_featured,
            is_active: input.is_active,
            created_at: now,
            updated_at: now,
        };

        let created = self.repo.create(testimonial).await?;
        tracing::info!(admin = %actor.user_id, id = %created.id, "testimonial created");
        Ok(created)
    }

    pub async fn update(
        &self,
        actor: &Session,
        id: Uuid,
        input: TestimonialInput,
        photo: ImageChange,
    ) -> Result<Testimonial> {
        let existing = self.find(id).await?;

        let mut errors = FieldErrors::new();
        if let Err(e) = input.validate() {
            errors.merge_validator(&e);
        }
        if let ImageChange::Replace(file) = &photo {
            check_image("photo", file, &mut errors);
        }
        errors.into_result()?;

        let plan: ImagePlan = photo
            .plan(self.store.as_ref(), "testimonials", existing.photo_path.as_deref())
            .await?;

        let updated = Testimonial {
            id: existing.id,
            name: input.name,
            role: input.role,
            content: input.content,
            photo_path: plan.path.clone(),
            rating: input.rating,
            is_featured: input.is_featured,
            is_active: input.is_active,
            created_at: existing.created_at,
            updated_at: Utc::now(),
        };

        match self.repo.update(id, updated).await {
            Ok(saved) => {
                plan.commit(self.store.as_ref()).await;
                tracing::info!(admin = %actor.user_id, id = %saved.id, "testimonial updated");
                Ok(saved)
            }
            Err(e) => {
                plan.abort(self.store.as_ref()).await;
                Err(e)
            }
        }
    }

    pub async fn delete(&self, actor: &Session, id: Uuid) -> Result<()> {
        let existing = self.find(id).await?;

        if let Some(path) = existing.photo_path {
            StoredFile::new(path).release(self.store.as_ref()).await;
        }
        self.repo.delete(id).await?;

        tracing::info!(admin = %actor.user_id, %id, "testimonial deleted");
        Ok(())
    }
}
