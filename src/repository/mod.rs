use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::*;
use crate::error::Result;

pub mod activity_repository;
pub mod announcement_repository;
pub mod download_repository;
pub mod feedback_repository;
pub mod member_registration_repository;
pub mod organization_member_repository;
pub mod testimonial_repository;
pub mod work_program_repository;

pub use activity_repository::SqliteActivityRepository;
pub use announcement_repository::SqliteAnnouncementRepository;
pub use download_repository::SqliteDownloadRepository;
pub use feedback_repository::SqliteFeedbackRepository;
pub use member_registration_repository::SqliteMemberRegistrationRepository;
pub use organization_member_repository::SqliteOrganizationMemberRepository;
pub use testimonial_repository::SqliteTestimonialRepository;
pub use work_program_repository::SqliteWorkProgramRepository;

#[async_trait]
pub trait AnnouncementRepository: Send + Sync {
    async fn create(&self, announcement: Announcement) -> Result<Announcement>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Announcement>>;
    async fn list_all(&self) -> Result<Vec<Announcement>>;
    async fn update(&self, id: Uuid, announcement: Announcement) -> Result<Announcement>;
    async fn delete(&self, id: Uuid) -> Result<()>;
}

#[async_trait]
pub trait ActivityRepository: Send + Sync {
    async fn create(&self, activity: Activity) -> Result<Activity>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Activity>>;
    async fn list_all(&self) -> Result<Vec<Activity>>;
    async fn update(&self, id: Uuid, activity: Activity) -> Result<Activity>;
    async fn delete(&self, id: Uuid) -> Result<()>;
}

#[async_trait]
pub trait WorkProgramRepository: Send + Sync {
    async fn create(&self, program: WorkProgram) -> Result<WorkProgram>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<WorkProgram>>;
    async fn list_all(&self) -> Result<Vec<WorkProgram>>;
    async fn update(&self, id: Uuid, program: WorkProgram) -> Result<WorkProgram>;
    async fn delete(&self, id: Uuid) -> Result<()>;
}

#[async_trait]
pub trait OrganizationMemberRepository: Send + Sync {
    async fn create(&self, member: OrganizationMember) -> Result<OrganizationMember>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<OrganizationMember>>;
    /// Ordered by `order_position` ascending.
    async fn list_all(&self) -> Result<Vec<OrganizationMember>>;
    async fn update(&self, id: Uuid, member: OrganizationMember) -> Result<OrganizationMember>;
    async fn delete(&self, id: Uuid) -> Result<()>;
}

#[async_trait]
pub trait TestimonialRepository: Send + Sync {
    async fn create(&self, testimonial: Testimonial) -> Result<Testimonial>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Testimonial>>;
    async fn list_all(&self) -> Result<Vec<Testimonial>>;
    async fn update(&self, id: Uuid, testimonial: Testimonial) -> Result<Testimonial>;
    async fn delete(&self, id: Uuid) -> Result<()>;
}

#[async_trait]
pub trait DownloadRepository: Send + Sync {
    async fn create(&self, download: Download) -> Result<Download>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Download>>;
    async fn list_all(&self) -> Result<Vec<Download>>;
    async fn update(&self, id: Uuid, download: Download) -> Result<Download>;
    async fn delete(&self, id: Uuid) -> Result<()>;
    /// Single-statement increment so concurrent hits never lose counts.
    async fn increment_download_count(&self, id: Uuid) -> Result<()>;
}

#[async_trait]
pub trait MemberRegistrationRepository: Send + Sync {
    async fn create(&self, registration: MemberRegistration) -> Result<MemberRegistration>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<MemberRegistration>>;
    async fn list_all(&self) -> Result<Vec<MemberRegistration>>;
    async fn update_review(
        &self,
        id: Uuid,
        status: RegistrationStatus,
        notes: Option<String>,
    ) -> Result<MemberRegistration>;
    async fn delete(&self, id: Uuid) -> Result<()>;
}

#[async_trait]
pub trait FeedbackRepository: Send + Sync {
    async fn create(&self, feedback: Feedback) -> Result<Feedback>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Feedback>>;
    async fn list_all(&self) -> Result<Vec<Feedback>>;
    async fn update_response(
        &self,
        id: Uuid,
        status: FeedbackStatus,
        response: Option<String>,
    ) -> Result<Feedback>;
    async fn delete(&self, id: Uuid) -> Result<()>;
}
