// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Master checkpoint catalog: loading, seeding, and ordered reads.

use crate::db::FirestoreDb;
use crate::error::AppError;
use crate::models::Checkpoint;
use std::fs;
use std::path::Path;

/// Service owning the static master list and the seeded catalog collection.
#[derive(Clone)]
pub struct CatalogService {
    db: FirestoreDb,
    master: Vec<Checkpoint>,
}

impl CatalogService {
    /// Load the master checkpoint list from a JSON file.
    pub fn load_from_file<P: AsRef<Path>>(db: FirestoreDb, path: P) -> Result<Self, CatalogError> {
        let json_data =
            fs::read_to_string(path.as_ref()).map_err(|e| CatalogError::Io(e.to_string()))?;
        Self::load_from_json(db, &json_data)
    }

    /// Load the master checkpoint list from a JSON string.
    pub fn load_from_json(db: FirestoreDb, json_data: &str) -> Result<Self, CatalogError> {
        let master: Vec<Checkpoint> =
            serde_json::from_str(json_data).map_err(|e| CatalogError::Parse(e.to_string()))?;

        if master.is_empty() {
            return Err(CatalogError::EmptyMasterList);
        }

        tracing::info!(count = master.len(), "Loaded master checkpoint list");
        Ok(Self { db, master })
    }

    /// The static master list this deployment was built with.
    pub fn master_list(&self) -> &[Checkpoint] {
        &self.master
    }

    /// Seed the catalog collection from the master list if, and only if,
    /// the collection is empty. Returns the number of entries written
    /// (zero when the catalog already has any entry — even one from an
    /// older, shorter master list).
    ///
    /// The emptiness check and the writes are not atomic; two clients
    /// seeding at the same instant can both pass the check. The original
    /// deployment lived with that race and so does this one.
    pub async fn seed(&self) -> Result<usize, AppError> {
        if !self.db.catalog_is_empty().await? {
            tracing::debug!("Catalog already seeded; skipping");
            return Ok(0);
        }

        tracing::info!("Seeding catalog collection");
        for (index, entry) in self.master.iter().enumerate() {
            let mut doc = entry.clone();
            doc.id = None;
            doc.order_index = index as u32;
            self.db.insert_checkpoint(&doc).await?;
        }

        tracing::info!(count = self.master.len(), "Catalog seeded");
        Ok(self.master.len())
    }

    /// Every catalog entry, ascending by `orderIndex`. Store failures
    /// propagate to the caller.
    pub async fn get_all(&self) -> Result<Vec<Checkpoint>, AppError> {
        let mut checkpoints = self.db.list_checkpoints().await?;
        checkpoints.sort_by_key(|c| c.order_index);
        Ok(checkpoints)
    }
}

/// Errors loading the master checkpoint list.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to read checkpoint file: {0}")]
    Io(String),

    #[error("Failed to parse checkpoint file: {0}")]
    Parse(String),

    #[error("Master checkpoint list is empty")]
    EmptyMasterList,
}
