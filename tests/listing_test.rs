use std::sync::Arc;

use chrono::NaiveDate;
use sqlx::SqlitePool;
use tempfile::TempDir;
use uuid::Uuid;

use osis_cms::{
    auth::{AuthService, Session},
    domain::{TestimonialInput, WorkProgramInput},
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

fn testimonial(name: &str, rating: i32, featured: bool, active: bool) -> TestimonialInput {
    TestimonialInput {
        name: name.to_string(),
        role: "Alumni".to_string(),
        content: "A formative experience from start to finish.".to_string(),
        rating,
        is_featured: featured,
        is_active: active,
    }
}

fn program(title: &str, year: &str, category: &str) -> WorkProgramInput {
    WorkProgramInput {
        title: title.to_string(),
        description: "Planned for this term.".to_string(),
        academic_year: year.to_string(),
        category: category.to_string(),
        status: "planned".to_string(),
        start_date: NaiveDate::from_ymd_opt(2025, 2, 1),
        end_date: None,
        objectives: None,
        outcome: None,
        is_featured: false,
    }
}

#[tokio::test]
async fn featured_filter_has_three_states() -> anyhow::Result<()> {
    let (services, admin, _dir) = setup().await?;

    services.testimonials.create(&admin, testimonial("Ana", 5, true, true), None).await?;
    services.testimonials.create(&admin, testimonial("Budi", 4, false, true), None).await?;
    services.testimonials.create(&admin, testimonial("Citra", 3, true, true), None).await?;

    let absent = ListQuery::default();
    assert_eq!(services.testimonials.list_public(&absent).await?.page.total, 3);

    let only = ListQuery { featured: Some("yes".to_string()), ..Default::default() };
    assert_eq!(services.testimonials.list_public(&only).await?.page.total, 2);

    let exclude = ListQuery { featured: Some("no".to_string()), ..Default::default() };
    assert_eq!(services.testimonials.list_public(&exclude).await?.page.total, 1);

    Ok(())
}

#[tokio::test]
async fn combined_filters_narrow_the_result() -> anyhow::Result<()> {
    let (services, admin, _dir) = setup().await?;

    services.testimonials.create(&admin, testimonial("Ana", 5, true, true), None).await?;
    services.testimonials.create(&admin, testimonial("Anandita", 5, false, true), None).await?;
    services.testimonials.create(&admin, testimonial("Ana Maria", 4, true, true), None).await?;

    let query = ListQuery {
        search: Some("ana".to_string()),
        rating: Some("5".to_string()),
        featured: Some("yes".to_string()),
        ..Default::default()
    };
    let listing = services.testimonials.list_public(&query).await?;

    assert_eq!(listing.page.total, 1);
    assert_eq!(listing.page.items[0].name, "Ana");

    Ok(())
}

#[tokio::test]
async fn inactive_testimonials_never_reach_the_public_list() -> anyhow::Result<()> {
    let (services, admin, _dir) = setup().await?;

    services.testimonials.create(&admin, testimonial("Ana", 5, false, true), None).await?;
    let hidden = services
        .testimonials
        .create(&admin, testimonial("Budi", 5, false, false), None)
        .await?;

    let public = services.testimonials.list_public(&ListQuery::default()).await?;
    assert_eq!(public.page.total, 1);

    // But the admin list carries both.
    let all = services.testimonials.list_admin(&ListQuery::default()).await?;
    assert_eq!(all.page.total, 2);
    assert!(all.page.items.iter().any(|t| t.id == hidden.id));

    Ok(())
}

#[tokio::test]
async fn admin_status_filter_splits_active_and_inactive() -> anyhow::Result<()> {
    let (services, admin, _dir) = setup().await?;

    services.testimonials.create(&admin, testimonial("Ana", 5, false, true), None).await?;
    services.testimonials.create(&admin, testimonial("Budi", 4, false, false), None).await?;

    let active = ListQuery { status: Some("active".to_string()), ..Default::default() };
    let listing = services.testimonials.list_admin(&active).await?;
    assert_eq!(listing.page.total, 1);
    assert!(listing.page.items.iter().all(|t| t.is_active));

    let inactive = ListQuery { status: Some("inactive".to_string()), ..Default::default() };
    let listing = services.testimonials.list_admin(&inactive).await?;
    assert_eq!(listing.page.total, 1);
    assert!(listing.page.items.iter().all(|t| !t.is_active));

    let absent = ListQuery::default();
    assert_eq!(services.testimonials.list_admin(&absent).await?.page.total, 2);

    Ok(())
}

#[tokio::test]
async fn work_program_years_are_listed_newest_first() -> anyhow::Result<()> {
    let (services, admin, _dir) = setup().await?;

    services.work_programs.create(&admin, program("Tutoring", "2023/2024", "academic")).await?;
    services.work_programs.create(&admin, program("Charity", "2024/2025", "social")).await?;
    services.work_programs.create(&admin, program("Olympiad", "2024/2025", "academic")).await?;

    let (listing, years) = services.work_programs.list_public(&ListQuery::default()).await?;
    assert_eq!(listing.page.total, 3);
    assert_eq!(years, vec!["2024/2025".to_string(), "2023/2024".to_string()]);

    let filtered = ListQuery { year: Some("2024/2025".to_string()), ..Default::default() };
    let (listing, _) = services.work_programs.list_public(&filtered).await?;
    assert_eq!(listing.page.total, 2);

    Ok(())
}

#[tokio::test]
async fn deleting_twice_reports_not_found() -> anyhow::Result<()> {
    let (services, admin, _dir) = setup().await?;

    let created = services
        .work_programs
        .create(&admin, program("Mentoring", "2024/2025", "leadership"))
        .await?;

    services.work_programs.delete(&admin, created.id).await?;

    match services.work_programs.delete(&admin, created.id).await {
        Err(AppError::NotFound(_)) => {}
        other => panic!("second delete should 404, got {:?}", other),
    }

    Ok(())
}

#[tokio::test]
async fn end_date_may_equal_but_not_precede_start_date() -> anyhow::Result<()> {
    let (services, admin, _dir) = setup().await?;

    let mut same_day = program("One-day drive", "2024/2025", "social");
    same_day.end_date = NaiveDate::from_ymd_opt(2025, 2, 1);
    services.work_programs.create(&admin, same_day).await?;

    let mut backwards = program("Impossible", "2024/2025", "social");
    backwards.end_date = NaiveDate::from_ymd_opt(2025, 1, 31);
    match services.work_programs.create(&admin, backwards).await {
        Err(AppError::Validation(fields)) => {
            assert!(fields.get("end_date").is_some());
        }
        other => panic!("expected validation failure, got {:?}", other.map(|_| ())),
    }

    Ok(())
}
