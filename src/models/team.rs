// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Team model and the denormalized member stub.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// A team stored in the `teams` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Team {
    /// Generated document ID (populated on reads)
    #[serde(alias = "_firestore_id", default, skip_serializing)]
    pub id: String,
    /// Display name; no uniqueness constraint
    pub name: String,
    /// Denormalized member stubs, kept in sync with each member's `teamId`
    #[serde(default)]
    pub members: Vec<TeamMember>,
    /// When the team was created
    #[serde(default)]
    pub created_at: String,
}

/// The `{email, uid}` pair cached on a team for quick display.
///
/// Array-remove on the team document matches the whole stub, so both
/// fields must round-trip exactly as written.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct TeamMember {
    pub email: String,
    pub uid: String,
}
