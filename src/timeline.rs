// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client-session model for the roadmap timeline and checkpoint modal.
//!
//! The frontend renders from this state rather than scraping its form
//! controls: every interaction mutates a [`Draft`], and the whole draft is
//! serialized into one [`ProgressPatch`] when the user saves. The modal
//! itself is an explicit state machine,
//!
//! ```text
//! Closed -> Opening -> Open -> Saving -> Open -> Closing -> Closed
//! ```
//!
//! where `Opening` suspends on the team-membership fetch. A failed fetch
//! still opens the modal, but read-only. Membership responses carry the
//! generation token handed out by [`ModalSession::open`], so a response
//! for a superseded open is discarded instead of clobbering the current
//! checkpoint's state.

use crate::models::{status, AssigneeSet, Checkpoint, ProgressPatch, ProgressRecord, TeamMember};
use std::collections::{BTreeMap, HashMap};

// ─── Timeline ────────────────────────────────────────────────

/// One row of the rendered roadmap: a catalog entry with whatever progress
/// the team has recorded for it.
#[derive(Debug, Clone)]
pub struct TimelineEntry {
    pub checkpoint: Checkpoint,
    pub progress: Option<ProgressRecord>,
}

impl TimelineEntry {
    /// Status badge text, defaulting to "Not Started".
    pub fn status(&self) -> &str {
        self.progress
            .as_ref()
            .map(|p| p.display_status())
            .unwrap_or(status::NOT_STARTED)
    }

    pub fn due_date(&self) -> Option<&str> {
        self.progress.as_ref().and_then(|p| p.due_date.as_deref())
    }
}

/// Merge the catalog with a team's progress map, in catalog index order.
///
/// Progress for checkpoints that no longer exist in the catalog is simply
/// not rendered; catalog entries without progress render as not started.
pub fn build_timeline(
    mut catalog: Vec<Checkpoint>,
    mut progress: HashMap<String, ProgressRecord>,
) -> Vec<TimelineEntry> {
    catalog.sort_by_key(|c| c.order_index);

    catalog
        .into_iter()
        .map(|checkpoint| {
            let record = checkpoint.id.as_ref().and_then(|id| progress.remove(id));
            TimelineEntry {
                checkpoint,
                progress: record,
            }
        })
        .collect()
}

// ─── Modal draft ─────────────────────────────────────────────

/// In-memory working copy of one checkpoint's editable progress state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Draft {
    pub status: String,
    /// `YYYY-MM-DD`, or empty when unset
    pub due_date: String,
    pub assignments: BTreeMap<String, AssigneeSet>,
    pub completions: BTreeMap<String, bool>,
    pub roles: BTreeMap<String, String>,
}

impl Draft {
    /// Seed a draft from the stored record (or defaults when the team has
    /// not touched this checkpoint yet).
    pub fn from_record(progress: Option<&ProgressRecord>) -> Self {
        match progress {
            Some(record) => Self {
                status: record.display_status().to_string(),
                due_date: record.due_date.clone().unwrap_or_default(),
                assignments: record.task_assignments.clone(),
                completions: record.task_completions.clone(),
                roles: record.roles.clone(),
            },
            None => Self {
                status: status::NOT_STARTED.to_string(),
                ..Self::default()
            },
        }
    }

    /// Add an assignee tag for a sub-task. Adding a uid that is already
    /// present is a no-op; returns whether anything changed.
    pub fn add_assignee(&mut self, sub_task: &str, uid: &str) -> bool {
        self.assignments
            .entry(sub_task.to_string())
            .or_default()
            .insert(uid)
    }

    /// Remove an assignee tag; returns whether anything changed.
    pub fn remove_assignee(&mut self, sub_task: &str, uid: &str) -> bool {
        match self.assignments.get_mut(sub_task) {
            Some(set) => set.remove(uid),
            None => false,
        }
    }

    pub fn set_completion(&mut self, sub_task: &str, done: bool) {
        self.completions.insert(sub_task.to_string(), done);
    }

    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }

    pub fn set_due_date(&mut self, due_date: &str) {
        self.due_date = due_date.to_string();
    }

    /// Assign or clear a named role.
    pub fn set_role(&mut self, role_key: &str, uid: Option<&str>) {
        match uid {
            Some(uid) if !uid.is_empty() => {
                self.roles.insert(role_key.to_string(), uid.to_string());
            }
            _ => {
                self.roles.remove(role_key);
            }
        }
    }

    /// Serialize the whole draft into a save patch. Every editable field
    /// is carried, including empty maps, so stale tags removed in the
    /// modal are removed in the store too.
    pub fn to_patch(&self) -> ProgressPatch {
        ProgressPatch {
            status: Some(self.status.clone()),
            due_date: Some(self.due_date.clone()),
            task_assignments: Some(self.assignments.clone()),
            task_completions: Some(self.completions.clone()),
            roles: Some(self.roles.clone()),
        }
    }
}

// ─── Modal session ───────────────────────────────────────────

/// Modal lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalPhase {
    Closed,
    /// Waiting for the team-membership fetch
    Opening,
    Open,
    /// A save request is in flight
    Saving,
    /// Fade-out; edits are gone once `finish_close` runs
    Closing,
}

/// Transient feedback after a save attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flash {
    Saved,
    Error(String),
}

/// The checkpoint modal, one per signed-in session.
///
/// All mutation goes through the methods here; there is no other source
/// of truth for what the modal shows.
#[derive(Debug)]
pub struct ModalSession {
    team_id: Option<String>,
    phase: ModalPhase,
    checkpoint_id: Option<String>,
    generation: u64,
    members: Vec<TeamMember>,
    read_only: bool,
    draft: Draft,
    flash: Option<Flash>,
}

impl ModalSession {
    /// A closed modal for a user on the given team (or none).
    pub fn new(team_id: Option<String>) -> Self {
        Self {
            team_id,
            phase: ModalPhase::Closed,
            checkpoint_id: None,
            generation: 0,
            members: Vec::new(),
            read_only: true,
            draft: Draft::default(),
            flash: None,
        }
    }

    pub fn phase(&self) -> ModalPhase {
        self.phase
    }

    pub fn checkpoint_id(&self) -> Option<&str> {
        self.checkpoint_id.as_deref()
    }

    /// Members loaded for the current open, for the assignment dropdown.
    pub fn members(&self) -> &[TeamMember] {
        &self.members
    }

    /// Whether editing controls are disabled (no team, or the membership
    /// fetch failed).
    pub fn read_only(&self) -> bool {
        self.read_only
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn flash(&self) -> Option<&Flash> {
        self.flash.as_ref()
    }

    /// Open the modal for a checkpoint, seeding the draft from the stored
    /// record. Returns the generation token the membership fetch must echo
    /// back; a second `open` before the fetch resolves supersedes the
    /// first, and the old token no longer matches.
    ///
    /// With no team there is nothing to fetch: the modal opens directly,
    /// read-only.
    pub fn open(&mut self, checkpoint: &Checkpoint, progress: Option<&ProgressRecord>) -> u64 {
        self.generation += 1;
        self.checkpoint_id = checkpoint.id.clone();
        self.draft = Draft::from_record(progress);
        self.members.clear();
        self.flash = None;

        if self.team_id.is_some() {
            self.phase = ModalPhase::Opening;
            self.read_only = false;
        } else {
            self.phase = ModalPhase::Open;
            self.read_only = true;
        }

        self.generation
    }

    /// Deliver the membership fetch result. Responses for a superseded
    /// open (stale generation) are discarded.
    pub fn members_loaded(&mut self, generation: u64, members: Vec<TeamMember>) {
        if generation != self.generation || self.phase != ModalPhase::Opening {
            return;
        }
        self.members = members;
        self.phase = ModalPhase::Open;
    }

    /// Deliver a membership fetch failure: the modal still opens, but in
    /// degraded read-only mode (no save control, assignment disabled).
    pub fn members_failed(&mut self, generation: u64) {
        if generation != self.generation || self.phase != ModalPhase::Opening {
            return;
        }
        self.read_only = true;
        self.phase = ModalPhase::Open;
    }

    /// The draft, if the modal is open and editable.
    pub fn draft_mut(&mut self) -> Option<&mut Draft> {
        if self.phase == ModalPhase::Open && !self.read_only {
            Some(&mut self.draft)
        } else {
            None
        }
    }

    /// Start a save: serialize the whole draft into the patch to persist.
    /// Only valid while open and editable.
    pub fn begin_save(&mut self) -> Option<ProgressPatch> {
        if self.phase != ModalPhase::Open || self.read_only {
            return None;
        }
        self.phase = ModalPhase::Saving;
        self.flash = None;
        Some(self.draft.to_patch())
    }

    /// The save round trip succeeded.
    pub fn save_succeeded(&mut self) {
        if self.phase == ModalPhase::Saving {
            self.phase = ModalPhase::Open;
            self.flash = Some(Flash::Saved);
        }
    }

    /// The save round trip failed. The draft keeps every edit so the user
    /// can retry.
    pub fn save_failed(&mut self, message: impl Into<String>) {
        if self.phase == ModalPhase::Saving {
            self.phase = ModalPhase::Open;
            self.flash = Some(Flash::Error(message.into()));
        }
    }

    /// Begin closing (the fade-out). No-op while a save is in flight.
    pub fn close(&mut self) {
        if self.phase == ModalPhase::Open || self.phase == ModalPhase::Opening {
            self.phase = ModalPhase::Closing;
        }
    }

    /// Finish closing: drop the draft and flash.
    pub fn finish_close(&mut self) {
        if self.phase == ModalPhase::Closing {
            self.phase = ModalPhase::Closed;
            self.checkpoint_id = None;
            self.members.clear();
            self.draft = Draft::default();
            self.flash = None;
        }
    }
}
