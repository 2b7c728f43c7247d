// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Google Sign-In authentication routes.
//!
//! The browser runs the Google Identity Services popup itself and posts
//! the resulting ID token here; the server verifies it, syncs the user
//! record, and answers with a session token (also set as a cookie).

use axum::{extract::State, routing::post, Json, Router};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::error::{AppError, Result};
use crate::middleware::auth::{create_jwt, SESSION_COOKIE, SESSION_TTL_SECS};
use crate::routes::api::UserResponse;
use crate::services::google_oidc::OidcError;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/google", post(google_login))
        .route("/auth/logout", post(logout))
}

/// Request body for Google Sign-In.
#[derive(Deserialize)]
pub struct GoogleLoginRequest {
    /// The ID token from the Google Identity Services popup
    pub credential: String,
}

/// Successful login response.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserResponse,
}

/// Verify a Google ID token, sync the user record, and open a session.
async fn google_login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(request): Json<GoogleLoginRequest>,
) -> Result<(CookieJar, Json<LoginResponse>)> {
    let identity = state
        .google_verifier
        .verify_id_token(&request.credential)
        .await
        .map_err(|e| match e {
            OidcError::Rejected(msg) => {
                tracing::warn!(error = %msg, "Google sign-in rejected");
                AppError::InvalidToken
            }
            OidcError::Transient(msg) => {
                AppError::Internal(anyhow::anyhow!("OIDC verification unavailable: {msg}"))
            }
        })?;

    let user = state.directory.sync_on_login(&identity).await?;

    tracing::info!(uid = %user.uid, email = %user.email, "User signed in");

    let token = create_jwt(&user.uid, &state.config.jwt_signing_key)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("JWT creation failed: {}", e)))?;

    let cookie = Cookie::build((SESSION_COOKIE, token.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(SESSION_TTL_SECS as i64))
        .build();

    let user = UserResponse::from_user(user, &state.config);
    Ok((jar.add(cookie), Json(LoginResponse { token, user })))
}

/// Logout response body.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct LogoutResponse {
    pub success: bool,
}

/// Clear the session cookie. Bearer-token clients just drop their token.
async fn logout(jar: CookieJar) -> (CookieJar, Json<LogoutResponse>) {
    let cookie = Cookie::build((SESSION_COOKIE, "")).path("/").build();
    (jar.remove(cookie), Json(LogoutResponse { success: true }))
}
