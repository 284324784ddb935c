use std::sync::Arc;

use chrono::{Datelike, Utc};
use uuid::Uuid;
use validator::Validate;

use crate::{
    auth::Session,
    domain::{Activity, ActivityCategory, ActivityInput},
    error::{AppError, Result},
    listing::{paginate, FilterSet, ListQuery, Listing, ADMIN_PAGE_SIZE, PUBLIC_PAGE_SIZE, RELATED_LIMIT},
    repository::ActivityRepository,
    storage::{check_image, FileStore, StoredFile, UploadedFile, MAX_GALLERY_IMAGES},
    validate::{parse_date, FieldErrors},
};

pub struct ActivityService {
    repo: Arc<dyn ActivityRepository>,
    store: Arc<dyn FileStore>,
}

impl ActivityService {
    pub fn new(repo: Arc<dyn ActivityRepository>, store: Arc<dyn FileStore>) -> Self {
        Self { repo, store }
    }

    fn filters(query: &ListQuery) -> FilterSet<Activity> {
        let set = FilterSet::new()
            .search(query.search.as_deref(), |a: &Activity| {
                vec![a.title.as_str(), a.description.as_str()]
            })
            .equals(query.category.as_deref(), |a| a.category.as_str().to_string())
            .featured(query.featured_filter(), |a| a.is_featured);

        match query.year.as_deref().filter(|y| !y.is_empty()) {
            Some(year) => {
                let year = year.to_string();
                set.require(move |a: &Activity| a.activity_date.year().to_string() == year)
            }
            None => set,
        }
    }

    pub async fn list_public(&self, query: &ListQuery) -> Result<Listing<Activity>> {
        let matched = Self::filters(query).apply(self.repo.list_all().await?);
        Ok(Listing::new(paginate(matched, query.page(), PUBLIC_PAGE_SIZE), query))
    }

    pub async fn show_public(&self, id: Uuid) -> Result<(Activity, Vec<Activity>)> {
        let activity = self.find(id).await?;

        let related = self
            .repo
            .list_all()
            .await?
            .into_iter()
            .filter(|a| a.id != activity.id && a.category == activity.category)
            .take(RELATED_LIMIT)
            .collect();

        Ok((activity, related))
    }

    pub async fn list_admin(&self, query: &ListQuery) -> Result<Listing<Activity>> {
        let matched = Self::filters(query).apply(self.repo.list_all().await?);
        Ok(Listing::new(paginate(matched, query.page(), ADMIN_PAGE_SIZE), query))
    }

    pub async fn find(&self, id: Uuid) -> Result<Activity> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Activity not found".to_string()))
    }

    pub async fn create(
        &self,
        actor: &Session,
        input: ActivityInput,
        images: Vec<UploadedFile>,
    ) -> Result<Activity> {
        let mut errors = FieldErrors::new();
        if let Err(e) = input.validate() {
            errors.merge_validator(&e);
        }
        Self::check_gallery(&images, 0, &mut errors);
        errors.into_result()?;

        let category = ActivityCategory::parse(&input.category)
            .ok_or_else(|| AppError::BadRequest("Unknown activity category".to_string()))?;
        let activity_date = parse_date(&input.activity_date)
            .ok_or_else(|| AppError::BadRequest("Invalid activity date".to_string()))?;

        let gallery_images = self.store_gallery(images).await?;

        let now = Utc::now();
        let activity = Activity {
            id: Uuid::new_v4(),
            title: input.title,
            description: input.description,
            category,
            gallery_images,
            video_url: input.video_url,
            activity_date,
            is_featured: input.is_featured,
            created_at: now,
            updated_at: now,
        };

        let created = self.repo.create(activity).await?;
        tracing::info!(admin = %actor.user_id, id = %created.id, "activity created");
        Ok(created)
    }

    /// The edited gallery is the kept subset of the existing images, in the
    /// submitted order, followed by any new uploads. Images dropped from the
    /// kept list are removed from storage once the record is saved.
    pub async fn update(
        &self,
        actor: &Session,
        id: Uuid,
        input: ActivityInput,
        kept_images: Vec<String>,
        new_images: Vec<UploadedFile>,
    ) -> Result<Activity> {
        let existing = self.find(id).await?;

        // Only paths the record actually owns can be kept.
        let kept: Vec<String> = kept_images
            .into_iter()
            .filter(|path| existing.gallery_images.contains(path))
            .collect();

        let mut errors = FieldErrors::new();
        if let Err(e) = input.validate() {
            errors.merge_validator(&e);
        }
        Self::check_gallery(&new_images, kept.len(), &mut errors);
        errors.into_result()?;

        let category = ActivityCategory::parse(&input.category)
            .ok_or_else(|| AppError::BadRequest("Unknown activity category".to_string()))?;
        let activity_date = parse_date(&input.activity_date)
            .ok_or_else(|| AppError::BadRequest("Invalid activity date".to_string()))?;

        let stored_new = self.store_gallery(new_images).await?;

        let mut gallery_images = kept.clone();
        gallery_images.extend(stored_new.iter().cloned());

        let dropped: Vec<String> = existing
            .gallery_images
            .iter()
            .filter(|path| !kept.contains(path))
            .cloned()
            .collect();

        let updated = Activity {
            id: existing.id,
            title: input.title,
            description: input.description,
            category,
            gallery_images,
            video_url: input.video_url,
            activity_date,
            is_featured: input.is_featured,
            created_at: existing.created_at,
            updated_at: Utc::now(),
        };

        match self.repo.update(id, updated).await {
            Ok(saved) => {
                for path in dropped {
                    StoredFile::new(path).release(self.store.as_ref()).await;
                }
                tracing::info!(admin = %actor.user_id, id = %saved.id, "activity updated");
                Ok(saved)
            }
            Err(e) => {
                for path in stored_new {
                    StoredFile::new(path).release(self.store.as_ref()).await;
                }
                Err(e)
            }
        }
    }

    pub async fn delete(&self, actor: &Session, id: Uuid) -> Result<()> {
        let existing = self.find(id).await?;

        for path in existing.gallery_images {
            StoredFile::new(path).release(self.store.as_ref()).await;
        }
        self.repo.delete(id).await?;

        tracing::info!(admin = %actor.user_id, %id, "activity deleted");
        Ok(())
    }

    fn check_gallery(images: &[UploadedFile], already_kept: usize, errors: &mut FieldErrors) {
        if already_kept + images.len() > MAX_GALLERY_IMAGES {
            errors.insert("gallery_images", "may hold at most 10 images");
        }
        for (index, file) in images.iter().enumerate() {
            let field = format!("gallery_images.{}", index);
            check_image(&field, file, errors);
        }
    }

    /// Stores a batch of gallery uploads, rolling back the ones already
    /// written if a later one fails.
    async fn store_gallery(&self, images: Vec<UploadedFile>) -> Result<Vec<String>> {
        let mut stored = Vec::with_capacity(images.len());
        for file in images {
            match self.store.store("activities", &file.name, &file.data).await {
                Ok(path) => stored.push(path),
                Err(e) => {
                    for path in stored {
                        StoredFile::new(path).release(self.store.as_ref()).await;
                    }
                    return Err(e);
                }
            }
        }
        Ok(stored)
    }
}
