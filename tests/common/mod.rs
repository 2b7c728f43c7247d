// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use roadmap_tracker::config::Config;
use roadmap_tracker::db::FirestoreDb;
use roadmap_tracker::routes::create_router;
use roadmap_tracker::services::{
    CatalogService, DirectoryService, GoogleOidcVerifier, ProgressService,
};
use roadmap_tracker::AppState;
use std::sync::Arc;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Create a mock database connection (offline).
#[allow(dead_code)]
pub fn test_db_offline() -> FirestoreDb {
    FirestoreDb::new_mock()
}

/// Unique suffix for test isolation on a shared emulator.
#[allow(dead_code)]
pub fn unique_suffix() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    format!(
        "{}",
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    )
}

/// Two-checkpoint master list for catalog tests.
#[allow(dead_code)]
pub const TEST_MASTER_LIST: &str = r##"[
    {
        "phase": 1,
        "title": "Build 1",
        "subtitle": "Holonomic Drive",
        "description": "Build chassis frame, install motors, and attach mecanum wheels.",
        "color": "#00C853",
        "tasks": ["Build chassis frame", "Install 4 motors"],
        "resources": [{"label": "Pages 4-23", "url": "#"}]
    },
    {
        "phase": 2,
        "title": "Planning",
        "subtitle": "Gantt Chart",
        "description": "Assign the remaining tasks.",
        "color": "#7269be",
        "tasks": ["Complete Gantt Chart"],
        "resources": []
    }
]"##;

/// Create a test app with offline mock dependencies.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    let config = Config::test_default();
    let db = test_db_offline();

    let catalog = CatalogService::load_from_json(db.clone(), TEST_MASTER_LIST)
        .expect("test master list should parse");
    let google_verifier =
        Arc::new(GoogleOidcVerifier::new(&config).expect("verifier should build"));

    let state = Arc::new(AppState {
        directory: DirectoryService::new(db.clone()),
        progress: ProgressService::new(db.clone()),
        catalog,
        google_verifier,
        config,
        db,
    });

    (create_router(state.clone()), state)
}
