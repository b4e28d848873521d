// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Signup, login and logout routes.

use crate::error::{AppError, Result};
use crate::middleware::auth::{create_jwt, removal_cookie, session_cookie};
use crate::models::ProfileUpdate;
use crate::routes::MessageResponse;
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Auth routes (public).
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth", post(auth))
        .route("/auth/logout", post(logout))
}

/// `POST /auth` body. Profile fields ride along at the top level on signup.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AuthRequest {
    #[serde(default)]
    pub action: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    #[validate(length(min = 8, max = 128, message = "Password must be 8 to 128 characters"))]
    pub password: Option<String>,
    #[serde(flatten)]
    #[validate(nested)]
    pub profile: ProfileUpdate,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub email: String,
    pub full_name: Option<String>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
    pub user: SessionUser,
}

/// Either response body of `POST /auth`.
#[derive(Serialize)]
#[serde(untagged)]
pub enum AuthResponse {
    Message(MessageResponse),
    Login(LoginResponse),
}

/// Dispatch on `action`.
async fn auth(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    payload: std::result::Result<Json<AuthRequest>, JsonRejection>,
) -> Result<(CookieJar, Json<AuthResponse>)> {
    let Json(mut req) = payload?;
    let action = std::mem::take(&mut req.action);

    match action.as_str() {
        "signup" => {
            let response = signup(&state, req).await?;
            Ok((jar, Json(AuthResponse::Message(response))))
        }
        "login" => {
            let (jar, response) = login(&state, jar, req).await?;
            Ok((jar, Json(AuthResponse::Login(response))))
        }
        other => {
            tracing::debug!(action = other, "Rejected unknown auth action");
            Err(AppError::BadRequest("Invalid action".to_string()))
        }
    }
}

fn credentials(req: &AuthRequest) -> Result<(&str, &str)> {
    match (req.email.as_deref(), req.password.as_deref()) {
        (Some(email), Some(password)) if !email.trim().is_empty() => Ok((email, password)),
        _ => Err(AppError::BadRequest(
            "Email and password are required".to_string(),
        )),
    }
}

async fn signup(state: &AppState, req: AuthRequest) -> Result<MessageResponse> {
    req.validate()?;
    let (email, password) = credentials(&req)?;

    state.accounts.signup(email, password, &req.profile).await?;

    Ok(MessageResponse::new("Signup successful"))
}

async fn login(state: &AppState, jar: CookieJar, req: AuthRequest) -> Result<(CookieJar, LoginResponse)> {
    // Presence only; format errors would leak more than "Invalid credentials"
    let (email, password) = credentials(&req)?;

    let user = state.accounts.login(email, password).await?;
    let token = create_jwt(&user.email, &state.config.jwt_signing_key)?;

    let jar = jar.add(session_cookie(token.clone(), state.config.secure_cookies()));
    Ok((
        jar,
        LoginResponse {
            message: "Login successful".to_string(),
            token,
            user: SessionUser {
                email: user.email,
                full_name: user.full_name,
            },
        },
    ))
}

/// Clear the session cookie.
async fn logout(State(state): State<Arc<AppState>>, jar: CookieJar) -> (CookieJar, StatusCode) {
    (
        jar.add(removal_cookie(state.config.secure_cookies())),
        StatusCode::NO_CONTENT,
    )
}
