// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Progress store integration tests.
//!
//! These tests require the Firestore emulator to be running.

use roadmap_tracker::models::{status, AssigneeSet, Checkpoint, ProgressPatch};
use roadmap_tracker::services::{DirectoryService, ProgressService};
use roadmap_tracker::timeline::ModalSession;
use std::collections::BTreeMap;

mod common;
use common::{test_db, unique_suffix};

fn team_id(tag: &str) -> String {
    format!("team-{tag}-{}", unique_suffix())
}

#[tokio::test]
async fn test_save_merges_instead_of_overwriting() {
    require_emulator!();

    let progress = ProgressService::new(test_db().await);
    let team = team_id("merge");

    let status_patch = ProgressPatch {
        status: Some(status::COMPLETE.to_string()),
        ..Default::default()
    };
    progress.save(&team, "cp-1", &status_patch).await.unwrap();

    let date_patch = ProgressPatch {
        due_date: Some("2025-05-01".to_string()),
        ..Default::default()
    };
    progress.save(&team, "cp-1", &date_patch).await.unwrap();

    // Merge, not replace: the second save must not erase the first.
    let record = progress.get(&team, "cp-1").await.unwrap().unwrap();
    assert_eq!(record.status.as_deref(), Some(status::COMPLETE));
    assert_eq!(record.due_date.as_deref(), Some("2025-05-01"));
    assert!(!record.last_updated.is_empty());
}

#[tokio::test]
async fn test_one_record_per_team_and_checkpoint() {
    require_emulator!();

    let progress = ProgressService::new(test_db().await);
    let team = team_id("unique");

    for status_value in [status::NOT_STARTED, status::IN_PROGRESS, status::COMPLETE] {
        let patch = ProgressPatch {
            status: Some(status_value.to_string()),
            ..Default::default()
        };
        progress.save(&team, "cp-1", &patch).await.unwrap();
    }

    let records = progress.load_for_team(&team).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(
        records["cp-1"].status.as_deref(),
        Some(status::COMPLETE),
        "last save wins on the status field"
    );
}

#[tokio::test]
async fn test_load_for_team_only_sees_own_records() {
    require_emulator!();

    let progress = ProgressService::new(test_db().await);
    let alpha = team_id("alpha");
    let beta = team_id("beta");

    let patch = ProgressPatch {
        status: Some(status::IN_PROGRESS.to_string()),
        ..Default::default()
    };
    progress.save(&alpha, "cp-1", &patch).await.unwrap();
    progress.save(&beta, "cp-2", &patch).await.unwrap();

    let records = progress.load_for_team(&alpha).await.unwrap();
    assert_eq!(records.len(), 1);
    assert!(records.contains_key("cp-1"));
}

/// The assignment scenario: team "Alpha" assigns two members to a
/// sub-task of "Build 1", checks it off, saves, and reloads.
#[tokio::test]
async fn test_assignment_and_completion_round_trip() {
    require_emulator!();

    let db = test_db().await;
    let directory = DirectoryService::new(db.clone());
    let progress = ProgressService::new(db);

    let suffix = unique_suffix();
    let mut uids = Vec::new();
    for name in ["a", "b"] {
        let identity = roadmap_tracker::services::GoogleIdentity {
            sub: format!("uid-{name}-{suffix}"),
            email: format!("{name}-{suffix}@x.com"),
            display_name: name.to_uppercase(),
            photo_url: None,
        };
        uids.push(directory.sync_on_login(&identity).await.unwrap().uid);
    }

    let team = directory.create_team("Alpha").await.unwrap();
    let checkpoint_id = format!("build1-{suffix}");
    let sub_task = "Install motors";

    let mut assignments = BTreeMap::new();
    assignments.insert(
        sub_task.to_string(),
        uids.iter().map(String::as_str).collect::<AssigneeSet>(),
    );
    let mut completions = BTreeMap::new();
    completions.insert(sub_task.to_string(), true);

    let patch = ProgressPatch {
        status: Some(status::IN_PROGRESS.to_string()),
        task_assignments: Some(assignments),
        task_completions: Some(completions),
        ..Default::default()
    };
    progress.save(&team.id, &checkpoint_id, &patch).await.unwrap();

    let records = progress.load_for_team(&team.id).await.unwrap();
    let record = &records[&checkpoint_id];

    // Order-independent set equality on the assignee uids.
    let expected: AssigneeSet = uids.iter().map(String::as_str).collect();
    assert_eq!(record.task_assignments[sub_task], expected);
    assert!(record.is_complete(sub_task));
}

/// Drive a save through the modal session against the real store: open,
/// edit the draft, persist the serialized patch, reload, reopen.
#[tokio::test]
async fn test_modal_edit_persists_through_store() {
    require_emulator!();

    let db = test_db().await;
    let directory = DirectoryService::new(db.clone());
    let progress = ProgressService::new(db);

    let team = directory.create_team("Modal Crew").await.unwrap();
    let checkpoint = Checkpoint {
        id: Some(format!("cp-modal-{}", unique_suffix())),
        order_index: 0,
        phase: 1,
        title: "Build 1".to_string(),
        subtitle: "Holonomic Drive".to_string(),
        description: "Build chassis frame.".to_string(),
        color: "#00C853".to_string(),
        tasks: vec!["Install motors".to_string()],
        resources: Vec::new(),
    };
    let checkpoint_id = checkpoint.id.clone().unwrap();

    let mut modal = ModalSession::new(Some(team.id.clone()));
    let generation = modal.open(&checkpoint, None);
    let members = directory.get_members(&team.id).await.unwrap();
    modal.members_loaded(generation, members);

    {
        let draft = modal.draft_mut().expect("modal should be editable");
        draft.set_status(status::IN_PROGRESS);
        draft.set_due_date("2025-04-15");
        draft.set_completion("Install motors", true);
    }

    let patch = modal.begin_save().unwrap();
    match progress.save(&team.id, &checkpoint_id, &patch).await {
        Ok(()) => modal.save_succeeded(),
        Err(e) => modal.save_failed(e.to_string()),
    }

    // Reload and reopen: the draft seeds from what was stored.
    let records = progress.load_for_team(&team.id).await.unwrap();
    let mut reopened = ModalSession::new(Some(team.id.clone()));
    let generation = reopened.open(&checkpoint, records.get(&checkpoint_id));
    reopened.members_loaded(generation, Vec::new());

    assert_eq!(reopened.draft().status, status::IN_PROGRESS);
    assert_eq!(reopened.draft().due_date, "2025-04-15");
    assert_eq!(reopened.draft().completions["Install motors"], true);
}
