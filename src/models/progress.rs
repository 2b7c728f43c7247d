// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Per-(team, checkpoint) progress records and the merge patch applied to
//! them on save.
//!
//! Records live in the `teamProgress` collection keyed
//! `"<teamId>_<checkpointId>"`. Saves are merge-writes: a patch only ever
//! touches the fields it carries, so two edits to disjoint fields never
//! erase each other. Within a carried map field the whole map is replaced
//! (last writer wins at field granularity).

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{btree_set, BTreeMap, BTreeSet};

/// Canonical status values. The stored domain is an open string; historical
/// documents may contain other spellings and must still deserialize.
pub mod status {
    pub const NOT_STARTED: &str = "Not Started";
    pub const IN_PROGRESS: &str = "In Progress";
    pub const COMPLETE: &str = "Complete";
}

/// Named-role assignment keys used by the build checkpoints.
pub mod role_keys {
    pub const LEAD_BUILDER: &str = "leadBuilder";
    pub const SUPPORT_BUILDER: &str = "supportBuilder";
    pub const LEAD_CUTTER: &str = "leadCutter";
    pub const SUPPORT_CUTTER: &str = "supportCutter";
}

/// Progress state for one checkpoint of one team.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
    /// Owning team (also a query field)
    pub team_id: String,
    /// Checkpoint document ID
    pub task_id: String,
    /// Open string domain; see [`status`] for the canonical values
    #[serde(default)]
    pub status: Option<String>,
    /// Due date in `YYYY-MM-DD` form, or None when unset
    #[serde(default)]
    pub due_date: Option<String>,
    /// Sub-task name -> set of assignee uids
    #[serde(default)]
    pub task_assignments: BTreeMap<String, AssigneeSet>,
    /// Sub-task name -> done flag; absent means not done
    #[serde(default)]
    pub task_completions: BTreeMap<String, bool>,
    /// Role key -> single uid (build checkpoints only)
    #[serde(default)]
    pub roles: BTreeMap<String, String>,
    /// Stamped on every save
    #[serde(default)]
    pub last_updated: String,
}

impl ProgressRecord {
    /// An empty record for a (team, checkpoint) pair.
    pub fn new(team_id: impl Into<String>, task_id: impl Into<String>) -> Self {
        Self {
            team_id: team_id.into(),
            task_id: task_id.into(),
            ..Self::default()
        }
    }

    /// Status for display, defaulting to "Not Started".
    pub fn display_status(&self) -> &str {
        self.status.as_deref().unwrap_or(status::NOT_STARTED)
    }

    /// Whether a sub-task is marked complete.
    pub fn is_complete(&self, sub_task: &str) -> bool {
        self.task_completions.get(sub_task).copied().unwrap_or(false)
    }
}

/// A set of assignee uids for one sub-task.
///
/// Early deployments stored a single uid string per sub-task; those values
/// still exist in the collection and deserialize into a one-element set (or
/// an empty one for the old "unassigned" empty string).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AssigneeSet(BTreeSet<String>);

impl AssigneeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a uid; returns false (and changes nothing) if already present.
    pub fn insert(&mut self, uid: impl Into<String>) -> bool {
        let uid = uid.into();
        if uid.is_empty() {
            return false;
        }
        self.0.insert(uid)
    }

    /// Remove a uid; returns false if it was not present.
    pub fn remove(&mut self, uid: &str) -> bool {
        self.0.remove(uid)
    }

    pub fn contains(&self, uid: &str) -> bool {
        self.0.contains(uid)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> btree_set::Iter<'_, String> {
        self.0.iter()
    }
}

impl FromIterator<String> for AssigneeSet {
    fn from_iter<T: IntoIterator<Item = String>>(iter: T) -> Self {
        let mut set = Self::new();
        for uid in iter {
            set.insert(uid);
        }
        set
    }
}

impl<'a> FromIterator<&'a str> for AssigneeSet {
    fn from_iter<T: IntoIterator<Item = &'a str>>(iter: T) -> Self {
        iter.into_iter().map(str::to_string).collect()
    }
}

impl<'a> IntoIterator for &'a AssigneeSet {
    type Item = &'a String;
    type IntoIter = btree_set::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<'de> Deserialize<'de> for AssigneeSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Legacy single-uid values normalize to a set.
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            One(String),
            Many(Vec<String>),
        }

        let set = match Repr::deserialize(deserializer)? {
            Repr::One(uid) => [uid].into_iter().collect(),
            Repr::Many(uids) => uids.into_iter().collect(),
        };
        Ok(set)
    }
}

/// A merge patch for one progress record.
///
/// Absent fields preserve whatever is stored; present fields replace it
/// wholesale. `due_date` distinguishes "absent" (preserve) from an
/// explicitly empty string (clear the date).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_assignments: Option<BTreeMap<String, AssigneeSet>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_completions: Option<BTreeMap<String, bool>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roles: Option<BTreeMap<String, String>>,
}

impl ProgressPatch {
    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.due_date.is_none()
            && self.task_assignments.is_none()
            && self.task_completions.is_none()
            && self.roles.is_none()
    }

    /// Wire names of the fields this patch carries; the update mask for the
    /// merge-write.
    pub fn updated_fields(&self) -> Vec<String> {
        let mut fields = Vec::new();
        if self.status.is_some() {
            fields.push("status".to_string());
        }
        if self.due_date.is_some() {
            fields.push("dueDate".to_string());
        }
        if self.task_assignments.is_some() {
            fields.push("taskAssignments".to_string());
        }
        if self.task_completions.is_some() {
            fields.push("taskCompletions".to_string());
        }
        if self.roles.is_some() {
            fields.push("roles".to_string());
        }
        fields
    }

    /// Merge this patch into a record in place.
    pub fn apply_to(&self, record: &mut ProgressRecord) {
        if let Some(status) = &self.status {
            record.status = Some(status.clone());
        }
        if let Some(due_date) = &self.due_date {
            // An explicitly empty date clears the field.
            record.due_date = if due_date.is_empty() {
                None
            } else {
                Some(due_date.clone())
            };
        }
        if let Some(assignments) = &self.task_assignments {
            record.task_assignments = assignments.clone();
        }
        if let Some(completions) = &self.task_completions {
            record.task_completions = completions.clone();
        }
        if let Some(roles) = &self.roles {
            record.roles = roles.clone();
        }
    }
}
