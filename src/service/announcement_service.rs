use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    auth::Session,
    domain::{Announcement, AnnouncementInput, AnnouncementType},
    error::{AppError, Result},
    listing::{paginate, FilterSet, ListQuery, Listing, ADMIN_PAGE_SIZE, PUBLIC_PAGE_SIZE, RELATED_LIMIT},
    repository::AnnouncementRepository,
    service::{ImageChange, ImagePlan},
    storage::{check_image, FileStore, StoredFile, UploadedFile},
    validate::{parse_datetime, FieldErrors},
};

pub struct AnnouncementService {
    repo: Arc<dyn AnnouncementRepository>,
    store: Arc<dyn FileStore>,
}

impl AnnouncementService {
    pub fn new(repo: Arc<dyn AnnouncementRepository>, store: Arc<dyn FileStore>) -> Self {
        Self { repo, store }
    }

    fn filters(query: &ListQuery) -> FilterSet<Announcement> {
        FilterSet::new()
            .search(query.search.as_deref(), |a: &Announcement| {
                vec![a.title.as_str(), a.content.as_str()]
            })
            .equals(query.kind.as_deref(), |a| a.kind.as_str().to_string())
            .featured(query.featured_filter(), |a| a.is_featured)
    }

    pub async fn list_public(&self, query: &ListQuery) -> Result<Listing<Announcement>> {
        let now = Utc::now();
        let visible = Self::filters(query)
            .require(move |a: &Announcement| a.is_visible(now))
            .apply(self.repo.list_all().await?);

        Ok(Listing::new(paginate(visible, query.page(), PUBLIC_PAGE_SIZE), query))
    }

    /// Detail view for visitors. Hidden rows are indistinguishable from
    /// missing ones.
    pub async fn show_public(&self, id: Uuid) -> Result<(Announcement, Vec<Announcement>)> {
        let now = Utc::now();
        let announcement = self
            .repo
            .find_by_id(id)
            .await?
            .filter(|a| a.is_visible(now))
            .ok_or_else(|| AppError::NotFound("Announcement not found".to_string()))?;

        let related = self
            .repo
            .list_all()
            .await?
            .into_iter()
            .filter(|a| a.id != announcement.id && a.kind == announcement.kind && a.is_visible(now))
            .take(RELATED_LIMIT)
            .collect();

        Ok((announcement, related))
    }

    pub async fn list_admin(&self, query: &ListQuery) -> Result<Listing<Announcement>> {
        let matched = Self::filters(query)
            .active(query.active_filter(), |a: &Announcement| a.is_active)
            .apply(self.repo.list_all().await?);
        Ok(Listing::new(paginate(matched, query.page(), ADMIN_PAGE_SIZE), query))
    }

    pub async fn find(&self, id: Uuid) -> Result<Announcement> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Announcement not found".to_string()))
    }

    pub async fn create(
        &self,
        actor: &Session,
        input: AnnouncementInput,
        image: Option<UploadedFile>,
    ) -> Result<Announcement> {
        let mut errors = FieldErrors::new();
        if let Err(e) = input.validate() {
            errors.merge_validator(&e);
        }
        if let Some(file) = &image {
            check_image("image", file, &mut errors);
        }
        errors.into_result()?;

        let kind = AnnouncementType::parse(&input.kind)
            .ok_or_else(|| AppError::BadRequest("Unknown announcement type".to_string()))?;

        let now = Utc::now();
        // An active announcement with no explicit publish time goes live
        // immediately; an inactive one stays undated until published.
        let published_at = match &input.published_at {
            Some(value) => parse_datetime(value),
            None if input.is_active => Some(now),
            None => None,
        };

        let image_path = match image {
            Some(file) => Some(self.store.store("announcements", &file.name, &file.data).await?),
            None => None,
        };

        let announcement = Announcement {
            id: Uuid::new_v4(),
            title: input.title,
            content: input.content,
            kind,
            is_featured: input.is_featured,
            image_path,
            is_active: input.is_active,
            published_at,
            created_at: now,
            updated_at: now,
        };

        let created = self.repo.create(announcement).await?;
        tracing::info!(admin = %actor.user_id, id = %created.id, "announcement created");
        Ok(created)
    }

    pub async fn update(
        &self,
        actor: &Session,
        id: Uuid,
        input: AnnouncementInput,
        image: ImageChange,
    ) -> Result<Announcement> {
        let existing = self.find(id).await?;

        let mut errors = FieldErrors::new();
        if let Err(e) = input.validate() {
            errors.merge_validator(&e);
        }
        if let ImageChange::Replace(file) = &image {
            check_image("image", file, &mut errors);
        }
        errors.into_result()?;

        let kind = AnnouncementType::parse(&input.kind)
            .ok_or_else(|| AppError::BadRequest("Unknown announcement type".to_string()))?;

        // A supplied timestamp replaces the stored one; leaving the field out
        // keeps whatever was there.
        let published_at = match &input.published_at {
            Some(value) => parse_datetime(value),
            None => existing.published_at,
        };

        let plan: ImagePlan = image
            .plan(self.store.as_ref(), "announcements", existing.image_path.as_deref())
            .await?;

        let updated = Announcement {
            id: existing.id,
            title: input.title,
            content: input.content,
            kind,
            is_featured: input.is_featured,
            image_path: plan.path.clone(),
            is_active: input.is_active,
            published_at,
            created_at: existing.created_at,
            updated_at: Utc::now(),
        };

        match self.repo.update(id, updated).await {
            Ok(saved) => {
                plan.commit(self.store.as_ref()).await;
                tracing::info!(admin = %actor.user_id, id = %saved.id, "announcement updated");
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

        if let Some(path) = existing.image_path {
            StoredFile::new(path).release(self.store.as_ref()).await;
        }
        self.repo.delete(id).await?;

        tracing::info!(admin = %actor.user_id, %id, "announcement deleted");
        Ok(())
    }
}
