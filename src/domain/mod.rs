pub mod announcement;
pub mod activity;
pub mod work_program;
pub mod organization_member;
pub mod testimonial;
pub mod download;
pub mod member_registration;
pub mod feedback;

pub use announcement::*;
pub use activity::*;
pub use work_program::*;
pub use organization_member::*;
pub use testimonial::*;
pub use download::*;
pub use member_registration::*;
pub use feedback::*;

pub(crate) fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enums_round_trip_their_storage_strings() {
        for kind in [AnnouncementType::General, AnnouncementType::Urgent, AnnouncementType::Event] {
            assert_eq!(AnnouncementType::parse(kind.as_str()), Some(kind));
        }
        for status in [
            WorkProgramStatus::Planned,
            WorkProgramStatus::Ongoing,
            WorkProgramStatus::Completed,
            WorkProgramStatus::Cancelled,
        ] {
            assert_eq!(WorkProgramStatus::parse(status.as_str()), Some(status));
        }
        for category in [
            DownloadCategory::Document,
            DownloadCategory::Form,
            DownloadCategory::Guide,
            DownloadCategory::Regulation,
            DownloadCategory::Report,
        ] {
            assert_eq!(DownloadCategory::parse(category.as_str()), Some(category));
        }

        assert_eq!(AnnouncementType::parse("breaking"), None);
        assert_eq!(FeedbackStatus::parse("resolved"), None);
        assert_eq!(RegistrationStatus::parse("approved"), None);
    }

    #[test]
    fn visibility_requires_active_and_published() {
        use chrono::{Duration, Utc};

        let now = Utc::now();
        let mut announcement = Announcement {
            id: uuid::Uuid::new_v4(),
            title: "Exam week".to_string(),
            content: "Schedules posted.".to_string(),
            kind: AnnouncementType::General,
            is_featured: false,
            image_path: None,
            is_active: true,
            published_at: Some(now - Duration::hours(1)),
            created_at: now,
            updated_at: now,
        };
        assert!(announcement.is_visible(now));

        announcement.published_at = Some(now + Duration::hours(1));
        assert!(!announcement.is_visible(now));

        announcement.published_at = None;
        assert!(!announcement.is_visible(now));

        announcement.published_at = Some(now - Duration::hours(1));
        announcement.is_active = false;
        assert!(!announcement.is_visible(now));
    }
}
