// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User model for storage and API.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// User role. Everyone starts as a student; promotion to teacher is a
/// manual document edit, never something the application does on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum Role {
    Student,
    Teacher,
}

impl Default for Role {
    fn default() -> Self {
        Role::Student
    }
}

/// User profile stored in the `users` collection, keyed by the Google
/// subject identifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Document ID (the stable login identity); populated on reads
    #[serde(alias = "_firestore_id", default, skip_serializing)]
    pub uid: String,
    /// Display name from the identity provider
    pub display_name: String,
    /// Email address (exact-match lookup key for team assignment)
    pub email: String,
    /// Profile picture URL
    #[serde(rename = "photoURL")]
    pub photo_url: Option<String>,
    /// Role; defaults to student on first login
    #[serde(default)]
    pub role: Role,
    /// Assigned team, or None when unassigned
    #[serde(default)]
    pub team_id: Option<String>,
    /// When the user first signed in
    #[serde(default)]
    pub created_at: String,
    /// Most recent sign-in timestamp
    #[serde(default)]
    pub last_login: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_wire_format_is_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Student).unwrap(), "\"student\"");
        assert_eq!(serde_json::to_string(&Role::Teacher).unwrap(), "\"teacher\"");
    }

    #[test]
    fn test_user_document_layout() {
        let user = User {
            uid: "uid-1".to_string(),
            display_name: "Ada".to_string(),
            email: "ada@school.edu".to_string(),
            photo_url: None,
            role: Role::Student,
            team_id: None,
            created_at: "2026-01-10T08:00:00Z".to_string(),
            last_login: "2026-01-10T08:00:00Z".to_string(),
        };

        let value = serde_json::to_value(&user).unwrap();
        // The uid is the document ID, not a stored field.
        assert!(value.get("uid").is_none());
        assert_eq!(value["displayName"], "Ada");
        assert_eq!(value["photoURL"], serde_json::Value::Null);
        assert_eq!(value["role"], "student");
        assert_eq!(value["teamId"], serde_json::Value::Null);
    }

    #[test]
    fn test_user_reads_document_id_into_uid() {
        let json = r#"{
            "_firestore_id": "google-sub-9",
            "displayName": "Grace",
            "email": "grace@school.edu",
            "photoURL": "https://example.com/g.png",
            "role": "teacher",
            "teamId": "team-1"
        }"#;

        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.uid, "google-sub-9");
        assert_eq!(user.role, Role::Teacher);
        assert_eq!(user.team_id.as_deref(), Some("team-1"));
    }
}
