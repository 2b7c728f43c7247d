// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Per-team progress store over the `teamProgress` collection.

use crate::db::FirestoreDb;
use crate::error::Result;
use crate::models::{ProgressPatch, ProgressRecord};
use crate::time_utils::now_rfc3339;
use std::collections::HashMap;

/// Store for per-(team, checkpoint) progress records.
#[derive(Clone)]
pub struct ProgressService {
    db: FirestoreDb,
}

impl ProgressService {
    pub fn new(db: FirestoreDb) -> Self {
        Self { db }
    }

    /// Document id for a (team, checkpoint) pair. One record per pair.
    pub fn doc_id(team_id: &str, checkpoint_id: &str) -> String {
        format!("{}_{}", team_id, checkpoint_id)
    }

    /// Merge a patch into the record for (team, checkpoint), stamping a new
    /// `lastUpdated`. Fields absent from the patch keep their stored
    /// values; fields present in the patch replace the stored field as a
    /// whole, so concurrent editors of the same map race at whole-map
    /// granularity (last writer wins).
    pub async fn save(
        &self,
        team_id: &str,
        checkpoint_id: &str,
        patch: &ProgressPatch,
    ) -> Result<()> {
        let mut record = ProgressRecord::new(team_id, checkpoint_id);
        patch.apply_to(&mut record);
        record.last_updated = now_rfc3339();

        let mut mask = patch.updated_fields();
        mask.push("teamId".to_string());
        mask.push("taskId".to_string());
        mask.push("lastUpdated".to_string());

        self.db
            .upsert_progress(&Self::doc_id(team_id, checkpoint_id), &record, mask)
            .await?;

        tracing::debug!(team_id, checkpoint_id, "Progress saved");
        Ok(())
    }

    /// One record by (team, checkpoint), if any save has happened.
    pub async fn get(&self, team_id: &str, checkpoint_id: &str) -> Result<Option<ProgressRecord>> {
        self.db
            .get_progress(&Self::doc_id(team_id, checkpoint_id))
            .await
    }

    /// Every record for a team, keyed by checkpoint id. Costs one query
    /// over the checkpoints the team has touched, not the whole catalog.
    pub async fn load_for_team(&self, team_id: &str) -> Result<HashMap<String, ProgressRecord>> {
        let records = self.db.get_progress_for_team(team_id).await?;

        Ok(records
            .into_iter()
            .map(|record| (record.task_id.clone(), record))
            .collect())
    }
}
