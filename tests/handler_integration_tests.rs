use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
};
use ayzek_backend::{
    AppError, AppState, InMemoryRepository, MockStorageService, auth,
    auth::AdminSession,
    config::AppConfig,
    handlers::{self, ValidatedJson, ValidatedQuery},
    models::{
        ApplicationFilter, CreateApplicationRequest, CreateEventRequest, CreateJourneyPersonRequest,
        CreateTeamRequest, LoginRequest, ReviewStatus, StatusUpdateRequest, TeamMemberInput,
        UpdateEventRequest, UpdateTeamRequest,
    },
    repository::Repository,
    totp,
};
use chrono::{Duration, Utc};
use std::sync::Arc;

// --- Helpers ---

fn state() -> AppState {
    AppState {
        repo: Arc::new(InMemoryRepository::new()),
        storage: Arc::new(MockStorageService::new()),
        config: AppConfig::default(),
    }
}

fn event_request(title: &str, days_ahead: i64) -> CreateEventRequest {
    CreateEventRequest {
        title: title.to_string(),
        description: "Hands-on session".to_string(),
        cover_image_url: None,
        start_at: Utc::now() + Duration::days(days_ahead),
        location: "Lab 2".to_string(),
        category: "Workshop".to_string(),
        capacity: 60,
        whatsapp_link: None,
        tags: None,
        slug: None,
    }
}

fn team_request(name: &str) -> CreateTeamRequest {
    CreateTeamRequest {
        name: name.to_string(),
        project_name: "Drone Tracking".to_string(),
        category: "Computer Vision".to_string(),
        description: "Tracks drones from ground cameras.".to_string(),
        members: vec![TeamMemberInput {
            name: "Deniz".to_string(),
            role: "Lead".to_string(),
            linkedin_url: None,
        }],
        ..Default::default()
    }
}

// --- Events ---

#[tokio::test]
async fn test_create_event_derives_slug_from_title() {
    let state = state();

    let (status, Json(event)) =
        handlers::events::create_event(State(state.clone()), ValidatedJson(event_request("Rust 101: Ownership", 3)))
            .await
            .unwrap();

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(event.slug, "rust-101-ownership");

    let Json(found) =
        handlers::events::get_event_by_slug(State(state), Path("rust-101-ownership".to_string()))
            .await
            .unwrap();
    assert_eq!(found.id, event.id);
}

#[tokio::test]
async fn test_event_title_without_letters_is_rejected() {
    let result =
        handlers::events::create_event(State(state()), ValidatedJson(event_request("!!! ???", 1))).await;

    assert!(matches!(result, Err(AppError::BadRequest(_))));
}

#[tokio::test]
async fn test_update_event_keeps_own_slug() {
    let state = state();
    let (_, Json(event)) =
        handlers::events::create_event(State(state.clone()), ValidatedJson(event_request("Demo Day", 5)))
            .await
            .unwrap();

    // Re-submitting the event's own slug is not a collision.
    let req = UpdateEventRequest {
        slug: Some(" demo-day ".to_string()),
        capacity: Some(80),
        ..Default::default()
    };
    let Json(updated) =
        handlers::events::update_event(State(state), Path(event.id), ValidatedJson(req))
            .await
            .unwrap();

    assert_eq!(updated.slug, "demo-day");
    assert_eq!(updated.capacity, 80);
}

#[tokio::test]
async fn test_update_missing_event_is_not_found() {
    let result = handlers::events::update_event(
        State(state()),
        Path(404),
        ValidatedJson(UpdateEventRequest::default()),
    )
    .await;

    assert!(matches!(result, Err(AppError::NotFound("Event"))));
}

// --- Teams ---

#[tokio::test]
async fn test_create_team_trims_name() {
    let state = state();

    let (status, Json(team)) =
        handlers::teams::create_team(State(state.clone()), ValidatedJson(team_request("  Vision Lab  ")))
            .await
            .unwrap();

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(team.team.name, "Vision Lab");
    assert_eq!(team.team.slug, "vision-lab");
    assert_eq!(team.members.len(), 1);
    assert_eq!(team.members[0].team_id, team.team.id);

    let duplicate =
        handlers::teams::create_team(State(state), ValidatedJson(team_request("Vision Lab"))).await;
    assert!(matches!(duplicate, Err(AppError::BadRequest(msg)) if msg.contains("already exists")));
}

#[tokio::test]
async fn test_update_team_rejects_invalid_member() {
    let state = state();
    let (_, Json(team)) =
        handlers::teams::create_team(State(state.clone()), ValidatedJson(team_request("Vision Lab")))
            .await
            .unwrap();

    let req = UpdateTeamRequest {
        members: Some(vec![TeamMemberInput {
            name: String::new(),
            role: "Lead".to_string(),
            linkedin_url: None,
        }]),
        ..Default::default()
    };
    let result =
        handlers::teams::update_team(State(state.clone()), Path(team.team.id), ValidatedJson(req)).await;
    assert!(matches!(result, Err(AppError::Validation(_))));

    // The roster is untouched.
    let Json(current) = handlers::teams::get_team(State(state), Path(team.team.id)).await.unwrap();
    assert_eq!(current.members[0].name, "Deniz");
}

// --- Journey ---

#[tokio::test]
async fn test_journey_handler_groups_by_year() {
    let state = state();
    for (year, name) in [(2022, "Ece"), (2024, "Mert"), (2022, "Arda")] {
        let req = CreateJourneyPersonRequest {
            year,
            name: name.to_string(),
            role: "President".to_string(),
            description: "Led the club for a year.".to_string(),
            photo_url: None,
        };
        handlers::journey::create_journey_person(State(state.clone()), ValidatedJson(req))
            .await
            .unwrap();
    }

    let Json(grouped) = handlers::journey::list_journey(State(state)).await.unwrap();

    let years: Vec<i32> = grouped.keys().copied().collect();
    assert_eq!(years, vec![2024, 2022]);
    let names: Vec<&str> = grouped[&2022].iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Ece", "Arda"]);
}

// --- Community ---

#[tokio::test]
async fn test_application_status_flow() {
    let state = state();
    let req = CreateApplicationRequest {
        first_name: " Ada ".to_string(),
        last_name: "Lovelace".to_string(),
        email: "ada@example.com".to_string(),
        phone: None,
        interests: vec!["AI".to_string(), "  ".to_string()],
        heard_from: "Instagram".to_string(),
        motivation: "Learning".to_string(),
        contribution: "Workshops".to_string(),
    };

    let (_, Json(application)) =
        handlers::community::apply(State(state.clone()), ValidatedJson(req)).await.unwrap();
    assert_eq!(application.first_name, "Ada");
    assert_eq!(application.interests, vec!["AI"]);
    assert_eq!(application.status, ReviewStatus::Pending);
    assert!(application.updated_at.is_none());

    let Json(updated) = handlers::community::update_application_status(
        State(state.clone()),
        Path(application.id),
        ValidatedJson(StatusUpdateRequest { status: ReviewStatus::Rejected }),
    )
    .await
    .unwrap();
    assert_eq!(updated.status, ReviewStatus::Rejected);
    assert!(updated.updated_at.is_some());

    let filter = ApplicationFilter { status: Some(ReviewStatus::Pending), ..Default::default() };
    let Json(pending) =
        handlers::community::list_applications(State(state), ValidatedQuery(filter)).await.unwrap();
    assert!(pending.is_empty());
}

// --- Admin ---

#[tokio::test]
async fn test_login_sets_cookie_and_requires_code_once_enrolled() {
    let state = state();
    let hash = auth::hash_password("board-password").unwrap();
    let admin = state.repo.upsert_admin("board@ayzek.org", &hash).await.unwrap();

    let login = |code: Option<String>| LoginRequest {
        email: "Board@Ayzek.org ".to_string(),
        password: "board-password".to_string(),
        code,
    };

    let (headers, Json(body)) =
        handlers::admin::login(State(state.clone()), ValidatedJson(login(None))).await.unwrap();
    let cookie = headers.get(header::SET_COOKIE).unwrap().to_str().unwrap();
    assert!(cookie.contains(&body.access_token));
    assert_eq!(body.admin_info.id, admin.id);

    let secret = totp::generate_secret();
    state.repo.set_admin_totp_secret(admin.id, Some(secret.clone())).await.unwrap();

    let result = handlers::admin::login(State(state.clone()), ValidatedJson(login(None))).await;
    assert!(matches!(result, Err(AppError::TwoFactorRequired)));

    let code = totp::current_code(&secret, &state.config.totp_issuer, "board@ayzek.org").unwrap();
    let result = handlers::admin::login(State(state), ValidatedJson(login(Some(code)))).await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_dashboard_counts_upcoming_only_in_future() {
    let state = state();
    for (title, days) in [("Past Talk", -2), ("Next Talk", 2), ("Later Talk", 9)] {
        handlers::events::create_event(State(state.clone()), ValidatedJson(event_request(title, days)))
            .await
            .unwrap();
    }

    let Json(stats) = handlers::admin::dashboard(State(state)).await.unwrap();

    assert_eq!(stats.total_events, 3);
    assert_eq!(stats.upcoming_events, 2);
    assert_eq!(stats.total_blogs, 0);
}

#[tokio::test]
async fn test_me_returns_profile_without_secrets() {
    let state = state();
    let hash = auth::hash_password("board-password").unwrap();
    let admin = state.repo.upsert_admin("board@ayzek.org", &hash).await.unwrap();

    let Json(profile) = handlers::admin::me(AdminSession(admin)).await;

    let value = serde_json::to_value(&profile).unwrap();
    assert_eq!(value["email"], "board@ayzek.org");
    assert!(value.get("password_hash").is_none());
    assert!(value.get("totp_secret").is_none());
}
