// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Roadmap-Tracker API Server
//!
//! Serves the classroom robotics build roadmap: the master checkpoint
//! catalog, team rosters, and per-team progress records backed by
//! Firestore, behind Google Sign-In.

use roadmap_tracker::{
    config::Config,
    db::FirestoreDb,
    services::{CatalogService, DirectoryService, GoogleOidcVerifier, ProgressService},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging for GCP
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting Roadmap-Tracker API");

    // Initialize Firestore database
    let db = FirestoreDb::new(&config.gcp_project_id)
        .await
        .expect("Failed to connect to Firestore");

    // Load the master checkpoint list
    tracing::info!(path = %config.checkpoints_path, "Loading master checkpoint list");
    let catalog = CatalogService::load_from_file(db.clone(), &config.checkpoints_path)
        .expect("Failed to load master checkpoint list");

    // Seed the catalog collection on first boot. Any later boot (or a
    // concurrent instance that seeded first) sees a non-empty collection
    // and writes nothing.
    match catalog.seed().await {
        Ok(0) => tracing::info!("Catalog already seeded"),
        Ok(count) => tracing::info!(count, "Catalog seeded from master list"),
        Err(e) => tracing::warn!(error = %e, "Catalog seeding failed; continuing with whatever is stored"),
    }

    let google_verifier =
        Arc::new(GoogleOidcVerifier::new(&config).expect("Failed to initialize OIDC verifier"));

    // Build shared state
    let state = Arc::new(AppState {
        directory: DirectoryService::new(db.clone()),
        progress: ProgressService::new(db.clone()),
        catalog,
        google_verifier,
        config: config.clone(),
        db,
    });

    // Build router
    let app = roadmap_tracker::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging (GCP-compliant).
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("roadmap_tracker=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
