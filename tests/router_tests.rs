mod common;

use axum::http::StatusCode;
use ayzek_backend::{auth, repository::Repository, totp};
use common::{ADMIN_EMAIL, ADMIN_PASSWORD, admin_token, expect, router, seed_admin, send, test_state};
use serde_json::json;

// --- Guard ---

#[tokio::test]
async fn admin_routes_require_a_session() {
    let state = test_state();
    let app = router(&state);

    let body = expect(&app, "GET", "/admin/me", None, None, StatusCode::UNAUTHORIZED).await;
    assert_eq!(body["code"], "NOT_AUTHENTICATED");

    expect(&app, "GET", "/admin/me", Some("garbage"), None, StatusCode::UNAUTHORIZED).await;
    expect(&app, "DELETE", "/events/1", None, None, StatusCode::UNAUTHORIZED).await;
    expect(&app, "GET", "/community/applications", None, None, StatusCode::UNAUTHORIZED).await;

    // Same paths stay public for reads.
    expect(&app, "GET", "/events", None, None, StatusCode::OK).await;
    expect(&app, "GET", "/posters", None, None, StatusCode::OK).await;
}

#[tokio::test]
async fn token_for_unknown_admin_is_forbidden() {
    let state = test_state();
    let app = router(&state);
    let (token, _) = auth::issue_token(&state.config, "ghost@ayzek.org").unwrap();

    let body = expect(&app, "GET", "/admin/dashboard", Some(&token), None, StatusCode::FORBIDDEN).await;
    assert_eq!(body["code"], "FORBIDDEN");
}

// --- Login and two-factor ---

#[tokio::test]
async fn login_failures_are_distinguishable() {
    let state = test_state();
    let app = router(&state);
    let admin = seed_admin(&state).await;

    let wrong = json!({ "email": ADMIN_EMAIL, "password": "nope" });
    let body = expect(&app, "POST", "/admin/login", None, Some(wrong), StatusCode::UNAUTHORIZED).await;
    assert_eq!(body["code"], "INVALID_CREDENTIALS");

    let unknown = json!({ "email": "who@ayzek.org", "password": ADMIN_PASSWORD });
    let body = expect(&app, "POST", "/admin/login", None, Some(unknown), StatusCode::UNAUTHORIZED).await;
    assert_eq!(body["code"], "INVALID_CREDENTIALS");

    let secret = totp::generate_secret();
    state.repo.set_admin_totp_secret(admin.id, Some(secret.clone())).await.unwrap();

    let no_code = json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD });
    let body = expect(&app, "POST", "/admin/login", None, Some(no_code), StatusCode::UNAUTHORIZED).await;
    assert_eq!(body["code"], "TWO_FACTOR_REQUIRED");
    assert!(body.get("access_token").is_none());

    let bad_code = json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD, "code": "abcdef" });
    let body = expect(&app, "POST", "/admin/login", None, Some(bad_code), StatusCode::UNAUTHORIZED).await;
    assert_eq!(body["code"], "INVALID_TWO_FACTOR_CODE");

    let code = totp::current_code(&secret, &state.config.totp_issuer, ADMIN_EMAIL).unwrap();
    let good = json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD, "code": code });
    let body = expect(&app, "POST", "/admin/login", None, Some(good), StatusCode::OK).await;
    assert_eq!(body["admin_info"]["is_2fa_enabled"], true);

    let claims = auth::decode_token(&state.config, body["access_token"].as_str().unwrap()).unwrap();
    assert_eq!(claims.sub, ADMIN_EMAIL);
}

#[tokio::test]
async fn two_factor_enrollment_flow() {
    let state = test_state();
    let app = router(&state);
    let token = admin_token(&state).await;
    let issuer = state.config.totp_issuer.clone();

    let setup = expect(&app, "POST", "/admin/2fa/setup", Some(&token), None, StatusCode::OK).await;
    let secret = setup["secret"].as_str().unwrap().to_string();
    assert!(setup["otpauth_url"].as_str().unwrap().contains("issuer=AYZEK"));

    // Setup alone persists nothing.
    let me = expect(&app, "GET", "/admin/me", Some(&token), None, StatusCode::OK).await;
    assert_eq!(me["is_2fa_enabled"], false);

    let wrong = json!({ "secret": secret, "code": "000000" });
    let body = expect(&app, "POST", "/admin/2fa/enable", Some(&token), Some(wrong), StatusCode::BAD_REQUEST).await;
    assert_eq!(body["code"], "INVALID_TWO_FACTOR_CODE");

    let code = totp::current_code(&secret, &issuer, ADMIN_EMAIL).unwrap();
    let enable = json!({ "secret": secret, "code": code });
    let body = expect(&app, "POST", "/admin/2fa/enable", Some(&token), Some(enable), StatusCode::OK).await;
    assert_eq!(body["is_2fa_enabled"], true);

    let stored = state.repo.get_admin_by_email(ADMIN_EMAIL).await.unwrap().unwrap();
    assert_eq!(stored.totp_secret.as_deref(), Some(secret.as_str()));

    let code = totp::current_code(&secret, &issuer, ADMIN_EMAIL).unwrap();
    let body = expect(
        &app,
        "POST",
        "/admin/2fa/disable",
        Some(&token),
        Some(json!({ "code": code })),
        StatusCode::OK,
    )
    .await;
    assert_eq!(body["is_2fa_enabled"], false);
}

// --- Events ---

#[tokio::test]
async fn event_slug_collision_gets_timestamp_suffix() {
    let state = test_state();
    let app = router(&state);
    let token = admin_token(&state).await;

    let event = json!({
        "title": "Çağrı ile Yapay Zekâ",
        "description": "Intro workshop",
        "start_at": "2099-03-01T18:00:00Z",
        "location": "Lab 1",
        "category": "Workshop"
    });

    let first = expect(&app, "POST", "/events", Some(&token), Some(event.clone()), StatusCode::CREATED).await;
    assert_eq!(first["slug"], "cagri-ile-yapay-zeka");
    assert_eq!(first["capacity"], 60);
    assert_eq!(first["registered"], 0);

    let second = expect(&app, "POST", "/events", Some(&token), Some(event), StatusCode::CREATED).await;
    let slug = second["slug"].as_str().unwrap();
    let suffix = slug.strip_prefix("cagri-ile-yapay-zeka-").unwrap();
    assert!(suffix.parse::<i64>().is_ok());

    // The first event keeps its slug.
    let found = expect(&app, "GET", "/events/slug/cagri-ile-yapay-zeka", None, None, StatusCode::OK).await;
    assert_eq!(found["id"], first["id"]);

    let upcoming = expect(&app, "GET", "/events/upcoming?limit=1", None, None, StatusCode::OK).await;
    assert_eq!(upcoming.as_array().unwrap().len(), 1);
}

// --- Crew ---

#[tokio::test]
async fn crew_is_grouped_and_appended_per_category() {
    let state = test_state();
    let app = router(&state);
    let token = admin_token(&state).await;

    let member = |name: &str, category: &str, order: Option<i32>| {
        json!({ "name": name, "role": "Organizer", "category": category, "order_index": order })
    };

    expect(&app, "POST", "/crew", Some(&token), Some(member("Ada", "Core", Some(3))), StatusCode::CREATED).await;
    expect(&app, "POST", "/crew", Some(&token), Some(member("Alan", "Core", Some(5))), StatusCode::CREATED).await;
    let appended = expect(&app, "POST", "/crew", Some(&token), Some(member("Grace", "Core", None)), StatusCode::CREATED).await;
    assert_eq!(appended["order_index"], 6);

    let first_design = expect(&app, "POST", "/crew", Some(&token), Some(member("Linus", "Design", None)), StatusCode::CREATED).await;
    assert_eq!(first_design["order_index"], 1);

    // Grace's old index of 6 counts toward the Design max.
    let id = appended["id"].as_i64().unwrap();
    let moved = expect(
        &app,
        "PUT",
        &format!("/crew/{id}"),
        Some(&token),
        Some(json!({ "category": "Design" })),
        StatusCode::OK,
    )
    .await;
    assert_eq!(moved["order_index"], 7);

    let grouped = expect(&app, "GET", "/crew", None, None, StatusCode::OK).await;
    let core: Vec<_> = grouped["Core"].as_array().unwrap().iter().map(|m| m["name"].clone()).collect();
    assert_eq!(core, vec![json!("Ada"), json!("Alan")]);
    let design: Vec<_> = grouped["Design"].as_array().unwrap().iter().map(|m| m["name"].clone()).collect();
    assert_eq!(design, vec![json!("Linus"), json!("Grace")]);
}

// --- Teams ---

#[tokio::test]
async fn team_duplicates_are_rejected_and_delete_cascades() {
    let state = test_state();
    let app = router(&state);
    let token = admin_token(&state).await;

    let team = json!({
        "name": "Vision Lab",
        "project_name": "Drone Tracking",
        "category": "Computer Vision",
        "description": "Tracks drones from ground cameras.",
        "is_featured": true,
        "members": [
            { "name": "Ece", "role": "Lead" },
            { "name": "Mert", "role": "ML" }
        ]
    });
    let created = expect(&app, "POST", "/teams", Some(&token), Some(team.clone()), StatusCode::CREATED).await;
    assert_eq!(created["slug"], "vision-lab");
    assert_eq!(created["members"].as_array().unwrap().len(), 2);

    let body = expect(&app, "POST", "/teams", Some(&token), Some(team), StatusCode::BAD_REQUEST).await;
    assert!(body["detail"].as_str().unwrap().contains("Vision Lab"));

    // Different name, same slug.
    let clash = json!({
        "name": "vision  LAB!",
        "project_name": "Other",
        "category": "CV",
        "description": "Another description here."
    });
    let body = expect(&app, "POST", "/teams", Some(&token), Some(clash), StatusCode::BAD_REQUEST).await;
    assert!(body["detail"].as_str().unwrap().contains("vision-lab"));

    let by_slug = expect(&app, "GET", "/teams/slug/vision-lab", None, None, StatusCode::OK).await;
    assert_eq!(by_slug["project_name"], "Drone Tracking");
    let featured = expect(&app, "GET", "/teams/featured", None, None, StatusCode::OK).await;
    assert_eq!(featured.as_array().unwrap().len(), 1);

    let id = created["id"].as_i64().unwrap();
    let renamed = expect(
        &app,
        "PUT",
        &format!("/teams/{id}"),
        Some(&token),
        Some(json!({ "name": "Sky Watch", "members": [{ "name": "Ece", "role": "Lead" }] })),
        StatusCode::OK,
    )
    .await;
    assert_eq!(renamed["slug"], "sky-watch");
    assert_eq!(renamed["members"].as_array().unwrap().len(), 1);

    // Padding around the current name is trimmed, not stored.
    let padded = expect(
        &app,
        "PUT",
        &format!("/teams/{id}"),
        Some(&token),
        Some(json!({ "name": "  Sky Watch  " })),
        StatusCode::OK,
    )
    .await;
    assert_eq!(padded["name"], "Sky Watch");
    assert_eq!(padded["slug"], "sky-watch");

    expect(&app, "DELETE", &format!("/teams/{id}"), Some(&token), None, StatusCode::NO_CONTENT).await;
    assert!(state.repo.get_team(id).await.unwrap().is_none());
    expect(&app, "GET", "/teams/slug/sky-watch", None, None, StatusCode::NOT_FOUND).await;
}

// --- Journey ---

#[tokio::test]
async fn journey_groups_by_year_newest_first() {
    let state = test_state();
    let app = router(&state);
    let token = admin_token(&state).await;

    for (year, name) in [(2023, "Deniz"), (2024, "Selin"), (2024, "Kaan")] {
        let person = json!({ "year": year, "name": name, "role": "Mentor", "description": "Ran the bootcamp." });
        expect(&app, "POST", "/journey", Some(&token), Some(person), StatusCode::CREATED).await;
    }

    // Key order only survives in the raw body.
    let response = send(&app, "GET", "/journey", None, None).await;
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let raw = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(raw.find("\"2024\"").unwrap() < raw.find("\"2023\"").unwrap());

    let grouped: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let names: Vec<_> = grouped["2024"].as_array().unwrap().iter().map(|p| p["name"].clone()).collect();
    assert_eq!(names, vec![json!("Selin"), json!("Kaan")]);
}

// --- Community & suggestions ---

#[tokio::test]
async fn application_review_flow() {
    let state = test_state();
    let app = router(&state);
    let token = admin_token(&state).await;

    let application = json!({
        "first_name": "  Ada ",
        "last_name": "Lovelace",
        "email": "ada@example.com",
        "interests": ["AI", "  ", "Robotics"],
        "heard_from": "Instagram",
        "motivation": "Learning with others",
        "contribution": "Workshops"
    });
    let created = expect(&app, "POST", "/community/apply", None, Some(application), StatusCode::CREATED).await;
    assert_eq!(created["status"], "pending");
    assert_eq!(created["first_name"], "Ada");
    assert_eq!(created["interests"], json!(["AI", "Robotics"]));

    let blank_only = json!({
        "first_name": "Bob", "last_name": "B", "email": "bob@example.com",
        "interests": [" "], "heard_from": "Friend", "motivation": "m", "contribution": "c"
    });
    expect(&app, "POST", "/community/apply", None, Some(blank_only), StatusCode::BAD_REQUEST).await;

    let id = created["id"].as_i64().unwrap();
    let uri = format!("/community/applications/{id}/status");
    let body = expect(&app, "PATCH", &uri, Some(&token), Some(json!({ "status": "archived" })), StatusCode::BAD_REQUEST).await;
    assert_eq!(body["code"], "BAD_REQUEST");

    let updated = expect(&app, "PATCH", &uri, Some(&token), Some(json!({ "status": "accepted" })), StatusCode::OK).await;
    assert_eq!(updated["status"], "accepted");
    assert!(updated["updated_at"].is_string());

    let pending = expect(&app, "GET", "/community/applications?status=pending", Some(&token), None, StatusCode::OK).await;
    assert!(pending.as_array().unwrap().is_empty());
    let found = expect(&app, "GET", "/community/applications?q=LOVELACE", Some(&token), None, StatusCode::OK).await;
    assert_eq!(found.as_array().unwrap().len(), 1);

    expect(&app, "GET", "/community/applications?limit=501", Some(&token), None, StatusCode::BAD_REQUEST).await;
}

#[tokio::test]
async fn suggestions_feed_the_dashboard() {
    let state = test_state();
    let app = router(&state);
    let token = admin_token(&state).await;

    let suggestion = json!({
        "title": "Rust meetup",
        "description": "Monthly meetup about systems programming.",
        "contact": "rustacean@example.com"
    });
    let created = expect(&app, "POST", "/event-suggestions", None, Some(suggestion), StatusCode::CREATED).await;
    assert_eq!(created["status"], "pending");

    let stats = expect(&app, "GET", "/admin/dashboard", Some(&token), None, StatusCode::OK).await;
    assert_eq!(stats["pending_suggestions"], 1);
    assert_eq!(stats["total_events"], 0);

    let id = created["id"].as_i64().unwrap();
    expect(
        &app,
        "PATCH",
        &format!("/event-suggestions/{id}/status"),
        Some(&token),
        Some(json!({ "status": "reviewed" })),
        StatusCode::OK,
    )
    .await;
    let stats = expect(&app, "GET", "/admin/dashboard", Some(&token), None, StatusCode::OK).await;
    assert_eq!(stats["pending_suggestions"], 0);

    expect(&app, "DELETE", &format!("/event-suggestions/{id}"), Some(&token), None, StatusCode::NO_CONTENT).await;
    expect(&app, "GET", &format!("/event-suggestions/{id}"), Some(&token), None, StatusCode::NOT_FOUND).await;
}

// --- Validation ---

#[tokio::test]
async fn malformed_input_is_a_400_with_detail() {
    let state = test_state();
    let app = router(&state);
    let token = admin_token(&state).await;

    let bad_date = json!({ "title": "t", "content": "c", "author": "a", "category": "c", "date": "2025/05/13" });
    let body = expect(&app, "POST", "/blogs", Some(&token), Some(bad_date), StatusCode::BAD_REQUEST).await;
    assert!(body["detail"].as_str().unwrap().contains("date"));

    let short = json!({ "title": "ab", "description": "too short", "contact": "" });
    let body = expect(&app, "POST", "/event-suggestions", None, Some(short), StatusCode::BAD_REQUEST).await;
    assert_eq!(body["code"], "VALIDATION_ERROR");

    expect(&app, "GET", "/blogs?page=0", None, None, StatusCode::BAD_REQUEST).await;

    let response = send(&app, "GET", "/timeline/999", None, None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn reorder_rejects_a_malformed_id_list() {
    let state = test_state();
    let app = router(&state);
    let token = admin_token(&state).await;

    let body = expect(&app, "POST", "/posters/reorder", Some(&token), Some(json!(["a", "b"])), StatusCode::BAD_REQUEST).await;
    assert_eq!(body["code"], "BAD_REQUEST");
    assert!(body["detail"].is_string());

    let body = expect(&app, "POST", "/posters/reorder", Some(&token), Some(json!({ "ids": [1] })), StatusCode::BAD_REQUEST).await;
    assert_eq!(body["code"], "BAD_REQUEST");

    let empty = expect(&app, "POST", "/posters/reorder", Some(&token), Some(json!([])), StatusCode::OK).await;
    assert_eq!(empty, json!([]));
}
