use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    auth::Session,
    domain::{OrganizationMember, OrganizationMemberInput},
    error::{AppError, Result},
    listing::{paginate, FilterSet, ListQuery, Listing, ADMIN_PAGE_SIZE, PUBLIC_PAGE_SIZE},
    repository::OrganizationMemberRepository,
    service::{ImageChange, ImagePlan},
    storage::{check_image, FileStore, StoredFile, UploadedFile},
    validate::FieldErrors,
};

pub struct OrganizationMemberService {
    repo: Arc<dyn OrganizationMemberRepository>,
    store: Arc<dyn FileStore>,
}

impl OrganizationMemberService {
    pub fn new(repo: Arc<dyn OrganizationMemberRepository>, store: Arc<dyn FileStore>) -> Self {
        Self { repo, store }
    }

    fn filters(query: &ListQuery) -> FilterSet<OrganizationMember> {
        FilterSet::new()
            .search(query.search.as_deref(), |m: &OrganizationMember| {
                vec![m.name.as_str(), m.position.as_str(), m.class.as_str()]
            })
            .equals(query.period.as_deref(), |m| m.period.clone())
    }

    /// The public roster: active members only, in board order.
    pub async fn list_public(&self, query: &ListQuery) -> Result<Listing<OrganizationMember>> {
        let matched = Self::filters(query)
            .require(|m: &OrganizationMember| m.is_active)
            .apply(self.repo.list_all().await?);

        Ok(Listing::new(paginate(matched, query.page(), PUBLIC_PAGE_SIZE), query))
    }

    pub async fn list_admin(&self, query: &ListQuery) -> Result<Listing<OrganizationMember>> {
        let matched = Self::filters(query)
            .active(query.active_filter(), |m: &OrganizationMember| m.is_active)
            .apply(self.repo.list_all().await?);
        Ok(Listing::new(paginate(matched, query.page(), ADMIN_PAGE_SIZE), query))
    }

    pub async fn find(&self, id: Uuid) -> Result<OrganizationMember> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Organization member not found".to_string()))
    }

    pub async fn create(
        &self,
        actor: &Session,
        input: OrganizationMemberInput,
        photo: Option<UploadedFile>,
    ) -> Result<OrganizationMember> {
        let mut errors = FieldErrors::new();
        if let Err(e) = input.validate() {
            errors.merge_validator(&e);
        }
        if let Some(file) = &photo {
            check_image("photo", file, &mut errors);
        }
        errors.into_result()?;

        let photo_path = match photo {
            Some(file) => Some(self.store.store("members", &file.name, &file.data).await?),
            None => None,
        };

        let now = Utc::now();
        let member = OrganizationMember {
            id: Uuid::new_v4(),
            name: input.name,
            position: input.position,
            class: input.class,
            photo_path,
            bio: input.bio,
            order_position: input.order_position,
            is_active: input.is_active,
            period: input.period,
            created_at: now,
            updated_at: now,
        };

        let created = self.repo.create(member).await?;
        tracing::info!(admin = %actor.user_id, id = %created.id, "organization member created");
        Ok(created)
    }

    pub async fn update(
        &self,
        actor: &Session,
        id: Uuid,
        input: OrganizationMemberInput,
        photo: ImageChange,
    ) -> Result<OrganizationMember> {
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
            .plan(self.store.as_ref(), "members", existing.photo_path.as_deref())
            .await?;

        let updated = OrganizationMember {
            id: existing.id,
            name: input.name,
            position: input.position,
            class: input.class,
            photo_path: plan.path.clone(),
            bio: input.bio,
            order_position: input.order_position,
            is_active: input.is_active,
            period: input.period,
            created_at: existing.created_at,
            updated_at: Utc::now(),
        };

        match self.repo.update(id, updated).await {
            Ok(saved) => {
                plan.commit(self.store.as_ref()).await;
                tracing::info!(admin = %actor.user_id, id = %saved.id, "organization member updated");
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

        tracing::info!(admin = %actor.user_id, %id, "organization member deleted");
        Ok(())
    }
}
