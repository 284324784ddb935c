pub mod activity_service;
pub mod announcement_service;
pub mod download_service;
pub mod intake_service;
pub mod organization_member_service;
pub mod testimonial_service;
pub mod work_program_service;

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::error::Result;
use crate::repository::*;
use crate::storage::{FileStore, StoredFile, UploadedFile};

pub use activity_service::ActivityService;
pub use announcement_service::AnnouncementService;
pub use download_service::DownloadService;
pub use intake_service::{FeedbackService, RegistrationService};
pub use organization_member_service::OrganizationMemberService;
pub use testimonial_service::TestimonialService;
pub use work_program_service::WorkProgramService;

pub struct ServiceContext {
    pub announcements: Arc<AnnouncementService>,
    pub activities: Arc<ActivityService>,
    pub work_programs: Arc<WorkProgramService>,
    pub organization_members: Arc<OrganizationMemberService>,
    pub testimonials: Arc<TestimonialService>,
    pub downloads: Arc<DownloadService>,
    pub registrations: Arc<RegistrationService>,
    pub feedback: Arc<FeedbackService>,
    pub db_pool: SqlitePool,
}

impl ServiceContext {
    pub fn new(db_pool: SqlitePool, store: Arc<dyn FileStore>) -> Self {
        let announcement_repo = Arc::new(SqliteAnnouncementRepository::new(db_pool.clone()));
        let activity_repo = Arc::new(SqliteActivityRepository::new(db_pool.clone()));
        let work_program_repo = Arc::new(SqliteWorkProgramRepository::new(db_pool.clone()));
        let member_repo = Arc::new(SqliteOrganizationMemberRepository::new(db_pool.clone()));
        let testimonial_repo = Arc::new(SqliteTestimonialRepository::new(db_pool.clone()));
        let download_repo = Arc::new(SqliteDownloadRepository::new(db_pool.clone()));
        let registration_repo = Arc::new(SqliteMemberRegistrationRepository::new(db_pool.clone()));
        let feedback_repo = Arc::new(SqliteFeedbackRepository::new(db_pool.clone()));

        Self {
            announcements: Arc::new(AnnouncementService::new(announcement_repo, store.clone())),
            activities: Arc::new(ActivityService::new(activity_repo, store.clone())),
            work_programs: Arc::new(WorkProgramService::new(work_program_repo)),
            organization_members: Arc::new(OrganizationMemberService::new(member_repo, store.clone())),
            testimonials: Arc::new(TestimonialService::new(testimonial_repo, store.clone())),
            downloads: Arc::new(DownloadService::new(download_repo, store.clone())),
            registrations: Arc::new(RegistrationService::new(registration_repo)),
            feedback: Arc::new(FeedbackService::new(feedback_repo)),
            db_pool,
        }
    }
}

/// What an admin edit does to a record's single attached image: leave it
/// alone, swap it for a new upload, or drop it entirely.
pub enum ImageChange {
    Keep,
    Replace(UploadedFile),
    Remove,
}

impl ImageChange {
    /// Stages the change: a replacement is written to storage now, but the
    /// outgoing file is only queued for deletion so nothing is lost if the
    /// database write fails afterwards.
    pub async fn plan(
        self,
        store: &dyn FileStore,
        folder: &str,
        current: Option<&str>,
    ) -> Result<ImagePlan> {
        match self {
            ImageChange::Keep => Ok(ImagePlan {
                path: current.map(str::to_string),
                obsolete: None,
                staged: None,
            }),
            ImageChange::Replace(file) => {
                let stored = store.store(folder, &file.name, &file.data).await?;
                Ok(ImagePlan {
                    path: Some(stored.clone()),
                    obsolete: current.map(StoredFile::new),
                    staged: Some(stored),
                })
            }
            ImageChange::Remove => Ok(ImagePlan {
                path: None,
                obsolete: current.map(StoredFile::new),
                staged: None,
            }),
        }
    }
}

/// The staged outcome of an [`ImageChange`]. `commit` after the record has
/// been persisted, `abort` if it was not.
pub struct ImagePlan {
    pub path: Option<String>,
    obsolete: Option<StoredFile>,
    staged: Option<String>,
}

impl ImagePlan {
    /// The record was saved with the new path: the outgoing file can go.
    pub async fn commit(self, store: &dyn FileStore) {
        if let Some(old) = self.obsolete {
            old.release(store).await;
        }
    }

    /// The record was not saved: remove the freshly stored file instead.
    pub async fn abort(self, store: &dyn FileStore) {
        if let Some(staged) = self.staged {
            StoredFile::new(staged).release(store).await;
        }
    }
}
