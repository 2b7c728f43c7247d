// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Admin console routes: teacher-only team and roster management.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{Role, Team, TeamMember, User};
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::post,
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

/// Admin routes (auth middleware applied in routes/mod.rs; every handler
/// additionally requires the teacher role).
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/admin/teams", post(create_team).get(list_teams))
        .route(
            "/api/admin/teams/{team_id}",
            axum::routing::delete(delete_team),
        )
        .route(
            "/api/admin/teams/{team_id}/members",
            post(add_member).delete(remove_member),
        )
        .route("/api/admin/catalog/seed", post(seed_catalog))
}

/// Resolve the caller to a user record and check teacher access.
///
/// The role is read fresh from the store on every call, so revoking a
/// teacher takes effect on their next request rather than at token expiry.
async fn require_teacher(state: &Arc<AppState>, auth: &AuthUser) -> Result<User> {
    let user = state
        .directory
        .get_user(&auth.uid)
        .await?
        .ok_or(AppError::Unauthorized)?;

    if user.role == Role::Teacher || state.config.is_teacher_email(&user.email) {
        Ok(user)
    } else {
        Err(AppError::Forbidden)
    }
}

// ─── Teams ───────────────────────────────────────────────────

#[derive(Deserialize, Validate)]
pub struct CreateTeamRequest {
    #[validate(length(min = 1, max = 60, message = "team name must be 1-60 characters"))]
    pub name: String,
}

/// Create a team with an empty roster.
async fn create_team(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(request): Json<CreateTeamRequest>,
) -> Result<Json<Team>> {
    require_teacher(&state, &auth).await?;
    request
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let team = state.directory.create_team(request.name.trim()).await?;
    Ok(Json(team))
}

/// List all teams, unordered.
async fn list_teams(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Vec<Team>>> {
    require_teacher(&state, &auth).await?;
    Ok(Json(state.directory.list_teams().await?))
}

/// Response for team deletion.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DeleteTeamResponse {
    pub success: bool,
}

/// Delete a team and unassign all its members.
async fn delete_team(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(team_id): Path<String>,
) -> Result<Json<DeleteTeamResponse>> {
    require_teacher(&state, &auth).await?;

    state.directory.delete_team(&team_id).await?;
    Ok(Json(DeleteTeamResponse { success: true }))
}

// ─── Members ─────────────────────────────────────────────────

#[derive(Deserialize, Validate)]
pub struct AddMemberRequest {
    #[validate(email(message = "a valid student email is required"))]
    pub email: String,
}

/// Add a student to a team by email. Fails with 404 if the student has
/// never signed in.
async fn add_member(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(team_id): Path<String>,
    Json(request): Json<AddMemberRequest>,
) -> Result<Json<TeamMember>> {
    require_teacher(&state, &auth).await?;
    request
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let member = state
        .directory
        .add_member(&team_id, request.email.trim())
        .await?;
    Ok(Json(member))
}

/// Response for member removal.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RemoveMemberResponse {
    pub success: bool,
}

/// Remove an exact member stub from a team.
async fn remove_member(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(team_id): Path<String>,
    Json(member): Json<TeamMember>,
) -> Result<Json<RemoveMemberResponse>> {
    require_teacher(&state, &auth).await?;

    state.directory.remove_member(&team_id, &member).await?;
    Ok(Json(RemoveMemberResponse { success: true }))
}

// ─── Catalog ─────────────────────────────────────────────────

/// Response for an explicit catalog seed request.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SeedCatalogResponse {
    /// Entries written; zero when the catalog already had any entry
    pub seeded: usize,
}

/// Seed the catalog from the shipped master list if it is empty.
///
/// Once any entry exists this is a visible no-op; later edits to the
/// master list do not propagate to an already-seeded deployment.
async fn seed_catalog(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<SeedCatalogResponse>> {
    require_teacher(&state, &auth).await?;

    let seeded = state.catalog.seed().await?;
    Ok(Json(SeedCatalogResponse { seeded }))
}
