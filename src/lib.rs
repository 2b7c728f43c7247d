// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Roadmap-Tracker: classroom robotics build-progress tracker
//!
//! This crate provides the backend API for the checkpoint roadmap: the
//! master task catalog, team rosters, and per-team progress records.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;
pub mod timeline;

use std::sync::Arc;

use config::Config;
use db::FirestoreDb;
use services::{CatalogService, DirectoryService, GoogleOidcVerifier, ProgressService};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
    pub catalog: CatalogService,
    pub directory: DirectoryService,
    pub progress: ProgressService,
    pub google_verifier: Arc<GoogleOidcVerifier>,
}
