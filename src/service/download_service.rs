use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    auth::Session,
    domain::{Download, DownloadCategory, DownloadInput},
    error::{AppError, Result},
    listing::{paginate, FilterSet, ListQuery, Listing, ADMIN_PAGE_SIZE, PUBLIC_PAGE_SIZE, RELATED_LIMIT},
    repository::DownloadRepository,
    storage::{check_document, format_file_size, FileStore, StoredFile, UploadedFile},
    validate::FieldErrors,
};

pub struct DownloadService {
    repo: Arc<dyn DownloadRepository>,
    store: Arc<dyn FileStore>,
}

impl DownloadService {
    pub fn new(repo: Arc<dyn DownloadRepository>, store: Arc<dyn FileStore>) -> Self {
        Self { repo, store }
    }

    fn filters(query: &ListQuery) -> FilterSet<Download> {
        FilterSet::new()
            .search(query.search.as_deref(), |d: &Download| {
                vec![d.title.as_str(), d.description.as_str()]
            })
            .equals(query.category.as_deref(), |d| d.category.as_str().to_string())
    }

    pub async fn list_public(&self, query: &ListQuery) -> Result<Listing<Download>> {
        let matched = Self::filters(query)
            .require(|d: &Download| d.is_active)
            .apply(self.repo.list_all().await?);

        Ok(Listing::new(paginate(matched, query.page(), PUBLIC_PAGE_SIZE), query))
    }

    /// Fetching a download counts as downloading it: the counter is bumped
    /// and the returned record reflects the new total.
    pub async fn show_public(&self, id: Uuid) -> Result<(Download, Vec<Download>)> {
        let download = self
            .repo
            .find_by_id(id)
            .await?
            .filter(|d| d.is_active)
            .ok_or_else(|| AppError::NotFound("Download not found".to_string()))?;

        self.repo.increment_download_count(id).await?;
        let download = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Download not found".to_string()))?;

        let related = self
            .repo
            .list_all()
            .await?
            .into_iter()
            .filter(|d| d.id != download.id && d.category == download.category && d.is_active)
            .take(RELATED_LIMIT)
            .collect();

        Ok((download, related))
    }

    pub async fn list_admin(&self, query: &ListQuery) -> Result<Listing<Download>> {
        let matched = Self::filters(query)
            .active(query.active_filter(), |d: &Download| d.is_active)
            .apply(self.repo.list_all().await?);
        Ok(Listing::new(paginate(matched, query.page(), ADMIN_PAGE_SIZE), query))
    }

    pub async fn find(&self, id: Uuid) -> Result<Download> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Download not found".to_string()))
    }

    pub async fn create(
        &self,
        actor: &Session,
        input: DownloadInput,
        file: Option<UploadedFile>,
    ) -> Result<Download> {
        let mut errors = FieldErrors::new();
        if let Err(e) = input.validate() {
            errors.merge_validator(&e);
        }
        match &file {
            Some(upload) => check_document("file", upload, &mut errors),
            None => errors.insert("file", "is required"),
        }
        errors.into_result()?;

        let file = file.ok_or_else(|| AppError::BadRequest("A file is required".to_string()))?;
        let category = DownloadCategory::parse(&input.category)
            .ok_or_else(|| AppError::BadRequest("Unknown download category".to_string()))?;

        // Type and size come from the upload itself, never from the form.
        let file_type = file
            .content_type
            .clone()
            .unwrap_or_else(|| "application/octet-stream".to_string());
        let file_size = format_file_size(file.data.len() as u64);
        let file_path = self.store.store("downloads", &file.name, &file.data).await?;

        let now = Utc::now();
        let download = Download {
            id: Uuid::new_v4(),
            title: input.title,
            description: input.description,
            file_path,
            file_type,
            file_size,
            category,
            download_count: 0,
            is_active: input.is_active,
            created_at: now,
            updated_at: now,
        };

        let created = self.repo.create(download).await?;
        tracing::info!(admin = %actor.user_id, id = %created.id, "download created");
        Ok(created)
    }

    /// Updates the metadata, optionally swapping the stored file. The old
    /// file is only removed once the record carries the new one.
    pub async fn update(
        &self,
        actor: &Session,
        id: Uuid,
        input: DownloadInput,
        file: Option<UploadedFile>,
    ) -> Result<Download> {
        let existing = self.find(id).await?;

        let mut errors = FieldErrors::new();
        if let Err(e) = input.validate() {
            errors.merge_validator(&e);
        }
        if let Some(upload) = &file {
            check_document("file", upload, &mut errors);
        }
        errors.into_result()?;

        let category = DownloadCategory::parse(&input.category)
            .ok_or_else(|| AppError::BadRequest("Unknown download category".to_string()))?;

        let (file_path, file_type, file_size, replaced) = match file {
            Some(upload) => {
                let file_type = upload
                    .content_type
                    .clone()
                    .unwrap_or_else(|| "application/octet-stream".to_string());
                let file_size = format_file_size(upload.data.len() as u64);
                let path = self.store.store("downloads", &upload.name, &upload.data).await?;
                (path, file_type, file_size, Some(existing.file_path.clone()))
            }
            None => (
                existing.file_path.clone(),
                existing.file_type.clone(),
                existing.file_size.clone(),
                None,
            ),
        };

        let updated = Download {
            id: existing.id,
            title: input.title,
            description: input.description,
            file_path: file_path.clone(),
            file_type,
            file_size,
            category,
            download_count: existing.download_count,
            is_active: input.is_active,
            created_at: existing.created_at,
            updated_at: Utc::now(),
        };

        match self.repo.update(id, updated).await {
            Ok(saved) => {
                if let Some(old) = replaced {
                    StoredFile::new(old).release(self.store.as_ref()).await;
                }
                tracing::info!(admin = %actor.user_id, id = %saved.id, "download updated");
                Ok(saved)
            }
            Err(e) => {
                if replaced.is_some() {
                    StoredFile::new(file_path).release(self.store.as_ref()).await;
                }
                Err(e)
            }
        }
    }

    pub async fn delete(&self, actor: &Session, id: Uuid) -> Result<()> {
        let existing = self.find(id).await?;

        StoredFile::new(existing.file_path).release(self.store.as_ref()).await;
        self.repo.delete(id).await?;

        tracing::info!(admin = %actor.user_id, %id, "download deleted");
        Ok(())
    }
}
