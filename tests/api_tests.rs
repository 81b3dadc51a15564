mod common;

use common::{ADMIN_EMAIL, ADMIN_PASSWORD, seed_admin, spawn_app};
use reqwest::{StatusCode, header};
use serde_json::{Value, json};

#[tokio::test]
async fn test_health_check() {
    let app = spawn_app().await;
    let response = reqwest::get(format!("{}/health", app.address)).await.expect("req fail");

    assert!(response.status().is_success());
    assert!(response.headers().contains_key("x-request-id"));
    assert_eq!(response.text().await.unwrap(), "ok");
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = spawn_app().await;
    let doc: Value = reqwest::get(format!("{}/api-docs/openapi.json", app.address))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert!(doc["paths"]["/events/upcoming"].is_object());
    assert!(doc["paths"]["/admin/2fa/enable"].is_object());
}

#[tokio::test]
async fn test_cookie_session_lifecycle() {
    let app = spawn_app().await;
    seed_admin(&app.state).await;
    let client = reqwest::Client::new();

    // 1. Login sets the HttpOnly cookie alongside the bearer token.
    let response = client
        .post(format!("{}/admin/login", app.address))
        .json(&json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_string();
    assert!(cookie.starts_with("admin_token="));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Lax"));
    assert!(!cookie.contains("Secure"), "local config must not mark the cookie Secure");

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["token_type"], "bearer");
    assert_eq!(body["expires_in"], 1800);
    assert_eq!(body["admin_info"]["email"], ADMIN_EMAIL);

    // 2. The cookie alone authenticates.
    let session = cookie.split(';').next().unwrap().to_string();
    let me: Value = client
        .get(format!("{}/admin/me", app.address))
        .header(header::COOKIE, &session)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(me["email"], ADMIN_EMAIL);
    assert_eq!(me["is_2fa_enabled"], false);

    // 3. Logout expires it.
    let response = client
        .post(format!("{}/admin/logout", app.address))
        .header(header::COOKIE, &session)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let cleared = response.headers().get(header::SET_COOKIE).unwrap().to_str().unwrap();
    assert!(cleared.contains("Max-Age=0"));
}

#[tokio::test]
async fn test_blog_lifecycle() {
    let app = spawn_app().await;
    seed_admin(&app.state).await;
    let client = reqwest::Client::new();

    let login: Value = client
        .post(format!("{}/admin/login", app.address))
        .json(&json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let token = login["access_token"].as_str().unwrap().to_string();

    // Anonymous writes are refused with a Bearer challenge.
    let response = client
        .post(format!("{}/blogs", app.address))
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.headers().get(header::WWW_AUTHENTICATE).unwrap(), "Bearer");

    let created: Value = client
        .post(format!("{}/blogs", app.address))
        .bearer_auth(&token)
        .json(&json!({
            "title": "Hello Rust",
            "content": "First post about ownership.",
            "author": "Ayzek",
            "category": "Tech",
            "date": "13.05.2025"
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(created["date"], "2025-05-13");
    let id = created["id"].as_i64().unwrap();

    let page: Value = client
        .get(format!("{}/blogs?q=OWNERSHIP", app.address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(page["total"], 1);
    assert_eq!(page["page_size"], 12);

    let response = client
        .delete(format!("{}/blogs/{id}", app.address))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = client.get(format!("{}/blogs/{id}", app.address)).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_poster_form_upload_and_reorder() {
    let app = spawn_app().await;
    let token = common::admin_token(&app.state).await;
    let client = reqwest::Client::new();

    let mut ids = Vec::new();
    for title in ["Spring", "Summer"] {
        let form = reqwest::multipart::Form::new()
            .text("title", title)
            .text("is_active", "true")
            .part(
                "file",
                reqwest::multipart::Part::bytes(b"fake-png".to_vec()).file_name("banner.PNG"),
            );
        let response = client
            .post(format!("{}/posters", app.address))
            .bearer_auth(&token)
            .multipart(form)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let poster: Value = response.json().await.unwrap();
        let url = poster["image_url"].as_str().unwrap();
        assert!(url.starts_with("/public/uploads/") && url.ends_with(".png"));
        ids.push(poster["id"].as_i64().unwrap());
    }

    let reordered: Vec<Value> = client
        .post(format!("{}/posters/reorder", app.address))
        .bearer_auth(&token)
        .json(&vec![ids[1], ids[0]])
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let titles: Vec<_> = reordered.iter().map(|p| p["title"].as_str().unwrap()).collect();
    assert_eq!(titles, vec!["Summer", "Spring"]);
    assert_eq!(reordered[0]["order_index"], 0);
}
