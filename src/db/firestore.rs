// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Users (profiles keyed by login identity)
//! - Teams (rosters with array-union/array-remove member updates)
//! - Master tasks (the checkpoint catalog)
//! - Team progress (field-masked merge-writes keyed per team and checkpoint)

use crate::db::collections;
use crate::error::AppError;
use crate::models::{Checkpoint, ProgressRecord, Team, TeamMember, User};
use serde::{Deserialize, Serialize};

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

/// Masked single-field write for a user's team reference.
#[derive(Serialize, Deserialize)]
struct UserTeamField {
    #[serde(rename = "teamId")]
    team_id: Option<String>,
}

/// Masked single-field write for a user's sign-in stamp.
#[derive(Serialize, Deserialize)]
struct UserLoginField {
    #[serde(rename = "lastLogin")]
    last_login: String,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        // Use ExternalJwtFunctionSource to provide a dummy token without needing
        // a custom TokenSource implementation struct.
        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Get a user by their login identity id.
    pub async fn get_user(&self, uid: &str) -> Result<Option<User>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(uid)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create or replace a user profile.
    pub async fn upsert_user(&self, user: &User) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(&user.uid)
            .object(user)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Find a user by exact email match. Returns the first hit; the signup
    /// flow keys users by identity id, so duplicate emails do not occur in
    /// practice.
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let email = email.to_string();
        let users: Vec<User> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::USERS)
            .filter(move |q| q.for_all([q.field("email").eq(email.clone())]))
            .limit(1)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(users.into_iter().next())
    }

    /// Set or clear a user's team reference, leaving every other field alone.
    pub async fn set_user_team(&self, uid: &str, team_id: Option<&str>) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .fields(["teamId"])
            .in_col(collections::USERS)
            .document_id(uid)
            .object(&UserTeamField {
                team_id: team_id.map(|s| s.to_string()),
            })
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Stamp a user's most recent sign-in, leaving every other field alone.
    pub async fn touch_user_login(&self, uid: &str, stamp: &str) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .fields(["lastLogin"])
            .in_col(collections::USERS)
            .document_id(uid)
            .object(&UserLoginField {
                last_login: stamp.to_string(),
            })
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Team Operations ─────────────────────────────────────────

    /// Get a team by id.
    pub async fn get_team(&self, team_id: &str) -> Result<Option<Team>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::TEAMS)
            .obj()
            .one(team_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a team with a generated document id; returns the stored team.
    pub async fn insert_team(&self, team: &Team) -> Result<Team, AppError> {
        self.get_client()?
            .fluent()
            .insert()
            .into(collections::TEAMS)
            .generate_document_id()
            .object(team)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// All team records, unordered.
    pub async fn list_teams(&self) -> Result<Vec<Team>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::TEAMS)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Append a member stub to a team's roster (array-union; duplicate
    /// stubs are not added twice).
    pub async fn add_team_member(
        &self,
        team_id: &str,
        member: &TeamMember,
    ) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::TEAMS)
            .document_id(team_id)
            .transforms(|t| {
                t.fields([t
                    .field("members")
                    .append_missing_elements([member.clone()])])
            })
            .only_transform()
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Remove an exact member stub from a team's roster (array-remove).
    pub async fn remove_team_member(
        &self,
        team_id: &str,
        member: &TeamMember,
    ) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::TEAMS)
            .document_id(team_id)
            .transforms(|t| {
                t.fields([t
                    .field("members")
                    .remove_all_from_array([member.clone()])])
            })
            .only_transform()
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Delete a team document.
    pub async fn delete_team_doc(&self, team_id: &str) -> Result<(), AppError> {
        self.get_client()?
            .fluent()
            .delete()
            .from(collections::TEAMS)
            .document_id(team_id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Master Task Operations ──────────────────────────────────

    /// Whether the catalog collection has any entries at all.
    pub async fn catalog_is_empty(&self) -> Result<bool, AppError> {
        let entries: Vec<Checkpoint> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::MASTER_TASKS)
            .limit(1)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(entries.is_empty())
    }

    /// Insert one catalog entry with a generated document id.
    pub async fn insert_checkpoint(&self, checkpoint: &Checkpoint) -> Result<Checkpoint, AppError> {
        self.get_client()?
            .fluent()
            .insert()
            .into(collections::MASTER_TASKS)
            .generate_document_id()
            .object(checkpoint)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// All catalog entries in arrival order; callers sort by `orderIndex`.
    pub async fn list_checkpoints(&self) -> Result<Vec<Checkpoint>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::MASTER_TASKS)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ─── Team Progress Operations ────────────────────────────────

    /// Get one progress record by its composite document id.
    pub async fn get_progress(&self, doc_id: &str) -> Result<Option<ProgressRecord>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::TEAM_PROGRESS)
            .obj()
            .one(doc_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Merge-write a progress record: only the fields named in `mask` are
    /// written, so stored fields outside the mask survive. Creates the
    /// document on first save.
    pub async fn upsert_progress(
        &self,
        doc_id: &str,
        record: &ProgressRecord,
        mask: Vec<String>,
    ) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .fields(mask)
            .in_col(collections::TEAM_PROGRESS)
            .document_id(doc_id)
            .object(record)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// All progress records for one team. Touches only the documents whose
    /// `teamId` field matches, not the whole catalog.
    pub async fn get_progress_for_team(
        &self,
        team_id: &str,
    ) -> Result<Vec<ProgressRecord>, AppError> {
        let team_id = team_id.to_string();
        self.get_client()?
            .fluent()
            .select()
            .from(collections::TEAM_PROGRESS)
            .filter(move |q| q.for_all([q.field("teamId").eq(team_id.clone())]))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
