//! # Application State
//!
//! Shared state for the Axum application, passed to every route
//! handler via the `State` extractor. Holds the two single-owner
//! repositories: the certificate service (over the registry file) and
//! the administrator directory. Both are internally synchronized, so
//! `AppState` is cheaply cloneable.

use soulcert_registry::{AdminDirectory, CertificateRegistry, CertificateService};

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Issuance and verification engine over the registry.
    pub service: CertificateService,
    /// Administrator credential directory.
    pub admins: AdminDirectory,
}

impl AppState {
    /// Build state from already-opened stores.
    pub fn new(service: CertificateService, admins: AdminDirectory) -> Self {
        Self { service, admins }
    }

    /// Fully ephemeral state: empty registry, default administrator.
    /// Used by tests and demo deployments.
    pub fn in_memory() -> Self {
        Self {
            service: CertificateService::new(CertificateRegistry::in_memory()),
            admins: AdminDirectory::in_memory(),
        }
    }
}
