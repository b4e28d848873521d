// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Signup, login and logout API tests.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
};
use gfit_tracker::db::FitnessStore;
use gfit_tracker::middleware::auth::verify_jwt;
use serde_json::json;
use tower::ServiceExt;

mod common;
use common::{body_json, json_post};

fn set_cookie_headers(response: &Response) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|value| value.to_str().unwrap().to_string())
        .collect()
}

fn signup_body(email: &str, password: &str) -> serde_json::Value {
    json!({
        "action": "signup",
        "email": email,
        "password": password,
        "fullName": "Sam Runner",
        "fitnessLevel": "beginner",
        "age": 31,
    })
}

#[tokio::test]
async fn test_signup_then_login() {
    let (app, state, store) = common::create_test_app();

    let response = app
        .clone()
        .oneshot(json_post("/auth", None, signup_body("Sam@Example.com", "password123")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["message"], "Signup successful");

    let stored = store.get_user("sam@example.com").await.unwrap().unwrap();
    assert_eq!(stored.full_name.as_deref(), Some("Sam Runner"));
    assert_eq!(stored.age, Some(31));
    assert_ne!(stored.password_hash, "password123");

    let response = app
        .oneshot(json_post(
            "/auth",
            None,
            json!({"action": "login", "email": "sam@example.com", "password": "password123"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let cookies = set_cookie_headers(&response);
    let session = cookies
        .iter()
        .find(|c| c.starts_with("gfit_token="))
        .expect("missing session cookie");
    assert!(session.contains("HttpOnly"));
    assert!(!session.contains("Secure"));

    let body = body_json(response).await;
    assert_eq!(body["message"], "Login successful");
    assert_eq!(body["user"]["email"], "sam@example.com");
    assert_eq!(body["user"]["fullName"], "Sam Runner");

    let token = body["token"].as_str().unwrap();
    assert_eq!(
        verify_jwt(token, &state.config.jwt_signing_key).unwrap(),
        "sam@example.com"
    );
}

#[tokio::test]
async fn test_duplicate_signup_is_rejected() {
    let (app, _, store) = common::create_test_app();

    app.clone()
        .oneshot(json_post("/auth", None, signup_body("sam@example.com", "password123")))
        .await
        .unwrap();

    let mut second = signup_body("sam@example.com", "different-pass");
    second["fullName"] = json!("Impostor");
    let response = app.oneshot(json_post("/auth", None, second)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["message"], "User already exists");

    let stored = store.get_user("sam@example.com").await.unwrap().unwrap();
    assert_eq!(stored.full_name.as_deref(), Some("Sam Runner"));
}

#[tokio::test]
async fn test_login_failures_look_the_same() {
    let (app, _, _) = common::create_test_app();
    app.clone()
        .oneshot(json_post("/auth", None, signup_body("sam@example.com", "password123")))
        .await
        .unwrap();

    let wrong_password = app
        .clone()
        .oneshot(json_post(
            "/auth",
            None,
            json!({"action": "login", "email": "sam@example.com", "password": "not-the-one"}),
        ))
        .await
        .unwrap();
    let unknown_email = app
        .oneshot(json_post(
            "/auth",
            None,
            json!({"action": "login", "email": "nobody@example.com", "password": "password123"}),
        ))
        .await
        .unwrap();

    assert_eq!(wrong_password.status(), StatusCode::BAD_REQUEST);
    assert_eq!(unknown_email.status(), StatusCode::BAD_REQUEST);
    assert!(set_cookie_headers(&wrong_password).is_empty());

    let a = body_json(wrong_password).await;
    let b = body_json(unknown_email).await;
    assert_eq!(a, b);
    assert_eq!(a["message"], "Invalid credentials");
}

#[tokio::test]
async fn test_invalid_action() {
    let (app, _, _) = common::create_test_app();

    let response = app
        .oneshot(json_post(
            "/auth",
            None,
            json!({"action": "reset", "email": "sam@example.com", "password": "password123"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["message"], "Invalid action");
}

#[tokio::test]
async fn test_signup_validation() {
    let (app, _, store) = common::create_test_app();

    for body in [
        signup_body("not-an-email", "password123"),
        signup_body("sam@example.com", "short"),
        json!({"action": "signup", "email": "sam@example.com", "password": "password123", "age": 400}),
        json!({"action": "signup", "password": "password123"}),
    ] {
        let response = app
            .clone()
            .oneshot(json_post("/auth", None, body.clone()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {body}");
    }

    assert!(store.get_user("sam@example.com").await.unwrap().is_none());
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let (app, _, _) = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "bad_request");
}

#[tokio::test]
async fn test_logout_clears_cookie() {
    for (frontend_url, secure) in [
        ("http://localhost:3000", false),
        ("https://gfit.example.com", true),
    ] {
        let (app, _, _) = common::create_test_app_with_frontend_url(frontend_url);

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/auth/logout")
                    .header(header::COOKIE, "gfit_token=test")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let cookies = set_cookie_headers(&response);
        let cookie = cookies
            .iter()
            .find(|c| c.starts_with("gfit_token="))
            .expect("missing removal cookie");
        assert!(cookie.contains("Max-Age=0"));
        assert!(cookie.contains("Path=/"));
        assert!(cookie.contains("HttpOnly"));
        assert_eq!(cookie.contains("Secure"), secure);
    }
}
