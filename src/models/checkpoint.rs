// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Master task catalog entries ("checkpoints").

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// One stage of the build roadmap, stored in the `masterTasks` collection.
///
/// Checkpoints are written once by the catalog seeder and read-only
/// afterwards. `order_index` is assigned at seed time from the position in
/// the master list and drives rendering order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Checkpoint {
    /// Generated document ID (populated on reads)
    #[serde(alias = "_firestore_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Position in the master list; unique and total across the catalog
    #[serde(default)]
    pub order_index: u32,
    /// Phase number shown on the roadmap marker
    pub phase: u32,
    /// Display title (e.g. "Build 1")
    pub title: String,
    /// Short subtitle (e.g. "Holonomic Drive")
    pub subtitle: String,
    /// Descriptive text shown on the card
    pub description: String,
    /// Color tag for the card and marker
    pub color: String,
    /// Ordered sub-task names; the keys of per-team assignment/completion maps
    pub tasks: Vec<String>,
    /// Ordered reference links
    #[serde(default)]
    pub resources: Vec<CheckpointResource>,
}

/// A labelled reference link attached to a checkpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CheckpointResource {
    pub label: String,
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checkpoint_deserializes_without_generated_fields() {
        // Entries in the master list file carry no id or orderIndex.
        let json = r##"{
            "phase": 1,
            "title": "Build 1",
            "subtitle": "Holonomic Drive",
            "description": "Build chassis frame, install motors.",
            "color": "#00C853",
            "tasks": ["Build chassis frame", "Install 4 motors"],
            "resources": [{"label": "Pages 4-23", "url": "#"}]
        }"##;

        let cp: Checkpoint = serde_json::from_str(json).unwrap();
        assert_eq!(cp.id, None);
        assert_eq!(cp.order_index, 0);
        assert_eq!(cp.tasks.len(), 2);
        assert_eq!(cp.resources[0].label, "Pages 4-23");
    }

    #[test]
    fn test_checkpoint_reads_firestore_document_id() {
        let json = r##"{
            "_firestore_id": "abc123",
            "orderIndex": 3,
            "phase": 4,
            "title": "Build 2",
            "subtitle": "Indexer & Tower Base",
            "description": "Assemble the lower motor gearbox.",
            "color": "#00C853",
            "tasks": ["Build mechanism", "Install"]
        }"##;

        let cp: Checkpoint = serde_json::from_str(json).unwrap();
        assert_eq!(cp.id.as_deref(), Some("abc123"));
        assert_eq!(cp.order_index, 3);
        assert!(cp.resources.is_empty());
    }
}
