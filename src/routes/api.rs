// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API routes for authenticated users: the data behind the roadmap view.

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{Checkpoint, ProgressPatch, ProgressRecord, Role, TeamMember, User};
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::{get, put},
    Extension, Json, Router,
};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// API routes (require authentication via JWT).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/me", get(get_me))
        .route("/api/catalog", get(get_catalog))
        .route("/api/teams/{team_id}/members", get(get_team_members))
        .route("/api/teams/{team_id}/progress", get(get_team_progress))
        .route(
            "/api/teams/{team_id}/progress/{checkpoint_id}",
            put(save_progress),
        )
}

// ─── User Profile ────────────────────────────────────────────

/// Current user response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UserResponse {
    pub uid: String,
    pub display_name: String,
    pub email: String,
    pub photo_url: Option<String>,
    pub role: Role,
    pub team_id: Option<String>,
    /// Whether the admin console should be offered (stored role or the
    /// configured allowlist)
    pub is_teacher: bool,
}

impl UserResponse {
    pub fn from_user(user: User, config: &Config) -> Self {
        let is_teacher = user.role == Role::Teacher || config.is_teacher_email(&user.email);
        Self {
            uid: user.uid,
            display_name: user.display_name,
            email: user.email,
            photo_url: user.photo_url,
            role: user.role,
            team_id: user.team_id,
            is_teacher,
        }
    }
}

/// Get current user profile.
async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<UserResponse>> {
    let user = state
        .directory
        .get_user(&auth.uid)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", auth.uid)))?;

    Ok(Json(UserResponse::from_user(user, &state.config)))
}

// ─── Catalog ─────────────────────────────────────────────────

/// Get the master checkpoint list, ascending by order index.
async fn get_catalog(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Checkpoint>>> {
    Ok(Json(state.catalog.get_all().await?))
}

// ─── Teams ───────────────────────────────────────────────────

/// Get a team's member stubs (for assignment dropdowns). Empty if the
/// team does not exist.
async fn get_team_members(
    State(state): State<Arc<AppState>>,
    Path(team_id): Path<String>,
) -> Result<Json<Vec<TeamMember>>> {
    Ok(Json(state.directory.get_members(&team_id).await?))
}

// ─── Progress ────────────────────────────────────────────────

/// Get a team's progress records, keyed by checkpoint id.
async fn get_team_progress(
    State(state): State<Arc<AppState>>,
    Path(team_id): Path<String>,
) -> Result<Json<HashMap<String, ProgressRecord>>> {
    Ok(Json(state.progress.load_for_team(&team_id).await?))
}

/// Response for a progress save.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SaveProgressResponse {
    pub success: bool,
}

/// Merge a progress patch for one checkpoint of the caller's team.
async fn save_progress(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path((team_id, checkpoint_id)): Path<(String, String)>,
    Json(patch): Json<ProgressPatch>,
) -> Result<Json<SaveProgressResponse>> {
    require_team_access(&state, &auth, &team_id).await?;

    state.progress.save(&team_id, &checkpoint_id, &patch).await?;

    Ok(Json(SaveProgressResponse { success: true }))
}

/// Only members of a team (or a teacher) may write its progress.
async fn require_team_access(
    state: &Arc<AppState>,
    auth: &AuthUser,
    team_id: &str,
) -> Result<User> {
    let user = state
        .directory
        .get_user(&auth.uid)
        .await?
        .ok_or(AppError::Unauthorized)?;

    let allowed = user.team_id.as_deref() == Some(team_id)
        || user.role == Role::Teacher
        || state.config.is_teacher_email(&user.email);

    if allowed {
        Ok(user)
    } else {
        Err(AppError::Forbidden)
    }
}
