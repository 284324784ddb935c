use std::sync::Arc;

use sqlx::SqlitePool;
use tempfile::TempDir;
use uuid::Uuid;

use osis_cms::{
    auth::{AuthService, Session},
    domain::{
        FeedbackInput, FeedbackReview, FeedbackStatus, RegistrationInput, RegistrationReview,
        RegistrationStatus,
    },
    error::AppError,
    listing::ListQuery,
    service::ServiceContext,
    storage::DiskStore,
};

async fn setup() -> anyhow::Result<(ServiceContext, Session, TempDir)> {
    let pool = SqlitePool::connect(":memory:").await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let dir = tempfile::tempdir()?;
    let services = ServiceContext::new(pool.clone(), Arc::new(DiskStore::new(dir.path())));

    let auth = AuthService::new(pool);
    let session = auth.create_session(Uuid::new_v4(), "test-token", 24).await?;

    Ok((services, session, dir))
}

fn registration(motivation: &str) -> RegistrationInput {
    RegistrationInput {
        full_name: "Siti Rahma".to_string(),
        email: "siti@example.com".to_string(),
        phone: "081234567890".to_string(),
        class: "XI IPA 2".to_string(),
        student_id: "2024018".to_string(),
        motivation: motivation.to_string(),
        preferred_division: Some("Media".to_string()),
        skills: Some(vec!["design".to_string(), "photography".to_string()]),
    }
}

fn feedback(message: &str) -> FeedbackInput {
    FeedbackInput {
        name: "Rafi".to_string(),
        email: "rafi@example.com".to_string(),
        category: "suggestion".to_string(),
        subject: "More weekend events".to_string(),
        message: message.to_string(),
    }
}

#[tokio::test]
async fn motivation_must_reach_fifty_characters() -> anyhow::Result<()> {
    let (services, _admin, _dir) = setup().await?;

    let short = "x".repeat(49);
    match services.registrations.submit(registration(&short)).await {
        Err(AppError::Validation(fields)) => {
            assert!(fields.get("motivation").is_some());
        }
        other => panic!("expected validation failure, got {:?}", other.map(|_| ())),
    }

    let long_enough = "x".repeat(50);
    let created = services.registrations.submit(registration(&long_enough)).await?;
    assert_eq!(created.status, RegistrationStatus::Pending);
    assert!(created.notes.is_none());

    Ok(())
}

#[tokio::test]
async fn feedback_message_must_reach_twenty_characters() -> anyhow::Result<()> {
    let (services, _admin, _dir) = setup().await?;

    match services.feedback.submit(feedback("too short by far")).await {
        Err(AppError::Validation(fields)) => {
            assert!(fields.get("message").is_some());
        }
        other => panic!("expected validation failure, got {:?}", other.map(|_| ())),
    }

    let created = services
        .feedback
        .submit(feedback("Please schedule more events on weekends."))
        .await?;
    assert_eq!(created.status, FeedbackStatus::Unread);
    assert!(created.responded_at.is_none());

    Ok(())
}

#[tokio::test]
async fn admin_search_covers_the_preferred_division() -> anyhow::Result<()> {
    let (services, _admin, _dir) = setup().await?;

    services.registrations.submit(registration(&"x".repeat(60))).await?;
    let mut other = registration(&"x".repeat(60));
    other.full_name = "Dewi Lestari".to_string();
    other.preferred_division = Some("Journalism".to_string());
    services.registrations.submit(other).await?;

    let query = ListQuery { search: Some("journal".to_string()), ..Default::default() };
    let listing = services.registrations.list_admin(&query).await?;

    assert_eq!(listing.page.total, 1);
    assert_eq!(listing.page.items[0].full_name, "Dewi Lestari");

    Ok(())
}

#[tokio::test]
async fn review_moves_a_registration_through_statuses() -> anyhow::Result<()> {
    let (services, admin, _dir) = setup().await?;

    let created = services
        .registrations
        .submit(registration(&"x".repeat(60)))
        .await?;

    let reviewed = services
        .registrations
        .review(
            &admin,
            created.id,
            RegistrationReview {
                status: "accepted".to_string(),
                notes: Some("Strong application.".to_string()),
            },
        )
        .await?;

    assert_eq!(reviewed.status, RegistrationStatus::Accepted);
    assert_eq!(reviewed.notes.as_deref(), Some("Strong application."));

    match services
        .registrations
        .review(
            &admin,
            created.id,
            RegistrationReview { status: "approved".to_string(), notes: None },
        )
        .await
    {
        Err(AppError::Validation(fields)) => {
            assert!(fields.get("status").is_some());
        }
        other => panic!("unknown status should fail validation, got {:?}", other.map(|_| ())),
    }

    Ok(())
}

#[tokio::test]
async fn responding_to_feedback_stamps_and_clears_responded_at() -> anyhow::Result<()> {
    let (services, admin, _dir) = setup().await?;

    let created = services
        .feedback
        .submit(feedback("The library hours are too short for study groups."))
        .await?;

    let responded = services
        .feedback
        .review(
            &admin,
            created.id,
            FeedbackReview {
                status: "responded".to_string(),
                response: Some("We are raising this with the school.".to_string()),
            },
        )
        .await?;
    assert_eq!(responded.status, FeedbackStatus::Responded);
    assert!(responded.responded_at.is_some());

    // Withdrawing the response clears the timestamp too.
    let reread = services
        .feedback
        .review(
            &admin,
            created.id,
            FeedbackReview { status: "read".to_string(), response: None },
        )
        .await?;
    assert_eq!(reread.status, FeedbackStatus::Read);
    assert!(reread.response.is_none());
    assert!(reread.responded_at.is_none());

    Ok(())
}
