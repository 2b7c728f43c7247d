// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Team and user directory: roster CRUD and login sync.
//!
//! Member changes touch two documents (the user's `teamId` and the team's
//! `members` array) without a transaction. A failure between the writes
//! leaves one side stale; every caller treats these operations as
//! at-least-one-side-effect, not atomic.

use crate::db::FirestoreDb;
use crate::error::{AppError, Result};
use crate::models::{Role, Team, TeamMember, User};
use crate::services::google_oidc::GoogleIdentity;
use crate::time_utils::now_rfc3339;
use futures_util::{stream, StreamExt};

const MAX_CONCURRENT_DB_OPS: usize = 16;

/// Directory over the `users` and `teams` collections.
#[derive(Clone)]
pub struct DirectoryService {
    db: FirestoreDb,
}

impl DirectoryService {
    pub fn new(db: FirestoreDb) -> Self {
        Self { db }
    }

    /// Ensure a user record exists for a verified login identity.
    ///
    /// First login creates a student with no team. Later logins return the
    /// stored record with a fresh `lastLogin` stamp; role and team are
    /// never changed here.
    pub async fn sync_on_login(&self, identity: &GoogleIdentity) -> Result<User> {
        if let Some(mut user) = self.db.get_user(&identity.sub).await? {
            let stamp = now_rfc3339();
            self.db.touch_user_login(&identity.sub, &stamp).await?;
            user.last_login = stamp;
            return Ok(user);
        }

        let now = now_rfc3339();
        let user = User {
            uid: identity.sub.clone(),
            display_name: identity.display_name.clone(),
            email: identity.email.clone(),
            photo_url: identity.photo_url.clone(),
            role: Role::Student,
            team_id: None,
            created_at: now.clone(),
            last_login: now,
        };
        self.db.upsert_user(&user).await?;

        tracing::info!(uid = %user.uid, email = %user.email, "Created user on first login");
        Ok(user)
    }

    pub async fn get_user(&self, uid: &str) -> Result<Option<User>> {
        self.db.get_user(uid).await
    }

    /// Create a team with an empty roster.
    pub async fn create_team(&self, name: &str) -> Result<Team> {
        let team = Team {
            id: String::new(),
            name: name.to_string(),
            members: Vec::new(),
            created_at: now_rfc3339(),
        };

        let created = self.db.insert_team(&team).await?;
        tracing::info!(team_id = %created.id, name = %created.name, "Team created");
        Ok(created)
    }

    /// All teams, unordered.
    pub async fn list_teams(&self) -> Result<Vec<Team>> {
        self.db.list_teams().await
    }

    /// Add a student to a team by email.
    ///
    /// Students must have signed in at least once; an unknown email fails
    /// with `NotFound` before any write happens. On success the user's
    /// `teamId` is set first, then the stub is appended to the roster.
    pub async fn add_member(&self, team_id: &str, email: &str) -> Result<TeamMember> {
        let user = self.db.find_user_by_email(email).await?.ok_or_else(|| {
            AppError::NotFound(format!(
                "No account for {email}; the student must sign in once before being added"
            ))
        })?;

        self.db.set_user_team(&user.uid, Some(team_id)).await?;

        let member = TeamMember {
            email: user.email,
            uid: user.uid,
        };
        self.db.add_team_member(team_id, &member).await?;

        tracing::info!(team_id, uid = %member.uid, "Member added to team");
        Ok(member)
    }

    /// Remove an exact member stub from a team and clear that user's team
    /// reference.
    pub async fn remove_member(&self, team_id: &str, member: &TeamMember) -> Result<()> {
        self.db.remove_team_member(team_id, member).await?;
        self.db.set_user_team(&member.uid, None).await?;

        tracing::info!(team_id, uid = %member.uid, "Member removed from team");
        Ok(())
    }

    /// Delete a team: unassign every member, then remove the team document.
    ///
    /// If unassignment fails partway, the team document is left in place so
    /// the operation can be retried; progress records for the team are not
    /// purged and simply become unreachable once the team is gone.
    pub async fn delete_team(&self, team_id: &str) -> Result<()> {
        let members = self.get_members(team_id).await?;

        stream::iter(members)
            .map(|member| {
                let db = self.db.clone();
                async move { db.set_user_team(&member.uid, None).await }
            })
            .buffer_unordered(MAX_CONCURRENT_DB_OPS)
            .collect::<Vec<Result<()>>>()
            .await
            .into_iter()
            .collect::<Result<Vec<()>>>()?;

        self.db.delete_team_doc(team_id).await?;

        tracing::info!(team_id, "Team deleted and members unassigned");
        Ok(())
    }

    /// A team's member stubs, or empty if the team does not exist.
    pub async fn get_members(&self, team_id: &str) -> Result<Vec<TeamMember>> {
        Ok(self
            .db
            .get_team(team_id)
            .await?
            .map(|team| team.members)
            .unwrap_or_default())
    }
}
