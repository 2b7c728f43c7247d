// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod catalog;
pub mod directory;
pub mod google_oidc;
pub mod progress;

pub use catalog::{CatalogError, CatalogService};
pub use directory::DirectoryService;
pub use google_oidc::{GoogleIdentity, GoogleOidcVerifier, OidcError};
pub use progress::ProgressService;
