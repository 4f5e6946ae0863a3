//! # Certificate Registry Store
//!
//! [`CertificateRegistry`] is the single-owner repository around the
//! backing registry file. The full record set stays resident in memory
//! behind a `parking_lot::RwLock`; every mutation rewrites the file as
//! a whole before the operation reports success. Confining the file
//! handle and the in-memory mirror to this one type keeps the shared-
//! mutable-state concern in a single component — no caller ever touches
//! the file or the records directly.
//!
//! ## Durability Contract
//!
//! `create` and `revoke` persist synchronously under the write lock and
//! roll their in-memory change back if the write fails, so a record is
//! never observable in memory without being on disk. The file is
//! replaced via temp-file + rename; a concurrent reader of the path
//! sees either the old snapshot or the new one, never a torn file.
//!
//! The lock gives per-record atomicity for in-process readers. The
//! store does not coordinate between processes; it assumes one owning
//! process, which is the deployment model of the reference registry.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;
use thiserror::Error;

use soulcert_core::{AdminId, CertificateId, Timestamp};

use crate::record::{CertificateRecord, CertificateStatus};

/// Error raised by registry store operations.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// The registry file exists but could not be read.
    #[error("registry file {path} could not be read: {source}")]
    Read {
        /// The registry file path.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The registry file exists but does not parse as a record array.
    #[error("registry file {path} is malformed: {source}")]
    Malformed {
        /// The registry file path.
        path: PathBuf,
        /// The underlying parse error.
        source: serde_json::Error,
    },

    /// Persisting the registry file failed. The triggering mutation has
    /// been rolled back.
    #[error("registry write to {path} failed: {source}")]
    Write {
        /// The registry file path.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A record with this identifier already exists.
    ///
    /// Identifier minting is 128-bit random, so hitting this indicates
    /// a caller bug (reusing an id), not a collision.
    #[error("certificate {id} is already present in the registry")]
    DuplicateId {
        /// The offending identifier.
        id: CertificateId,
    },
}

/// Result of a revocation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevocationOutcome {
    /// The record transitioned `ACTIVE → REVOKED`.
    Revoked,
    /// The record was already revoked; nothing changed. The original
    /// revocation metadata is preserved.
    AlreadyRevoked,
    /// No record with that identifier exists.
    NotFound,
}

struct RegistryInner {
    records: Vec<CertificateRecord>,
    /// Backing file; `None` for an ephemeral in-memory registry.
    path: Option<PathBuf>,
}

/// Thread-safe registry of issued certificates, mirrored in memory and
/// persisted to a single JSON file.
#[derive(Clone)]
pub struct CertificateRegistry {
    inner: Arc<RwLock<RegistryInner>>,
}

impl CertificateRegistry {
    /// An ephemeral registry with no backing file.
    pub fn in_memory() -> Self {
        Self {
            inner: Arc::new(RwLock::new(RegistryInner {
                records: Vec::new(),
                path: None,
            })),
        }
    }

    /// Open a registry backed by the given file.
    ///
    /// Loads the existing record array if the file is present; starts
    /// empty otherwise (the file is created on first mutation).
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, RegistryError> {
        let path = path.into();
        let records = if path.exists() {
            let data = std::fs::read_to_string(&path).map_err(|source| RegistryError::Read {
                path: path.clone(),
                source,
            })?;
            serde_json::from_str::<Vec<CertificateRecord>>(&data).map_err(|source| {
                RegistryError::Malformed {
                    path: path.clone(),
                    source,
                }
            })?
        } else {
            Vec::new()
        };
        tracing::info!(
            count = records.len(),
            path = %path.display(),
            "loaded certificate registry"
        );
        Ok(Self {
            inner: Arc::new(RwLock::new(RegistryInner {
                records,
                path: Some(path),
            })),
        })
    }

    /// Insert a freshly issued record and persist.
    ///
    /// If the file write fails the insert is rolled back and the error
    /// returned — issuance must not report success for a record that
    /// exists only in memory.
    pub fn create(&self, record: CertificateRecord) -> Result<(), RegistryError> {
        let mut inner = self.inner.write();
        if inner
            .records
            .iter()
            .any(|r| r.certificate_id == record.certificate_id)
        {
            return Err(RegistryError::DuplicateId {
                id: record.certificate_id,
            });
        }
        inner.records.push(record);
        if let Err(e) = persist(&inner) {
            inner.records.pop();
            return Err(e);
        }
        Ok(())
    }

    /// Look up a record by identifier. No side effects.
    pub fn find(&self, id: &CertificateId) -> Option<CertificateRecord> {
        self.inner
            .read()
            .records
            .iter()
            .find(|r| r.certificate_id == *id)
            .cloned()
    }

    /// Transition a record to `REVOKED` and persist.
    ///
    /// Idempotent: revoking an already-revoked record reports
    /// [`RevocationOutcome::AlreadyRevoked`] and leaves the original
    /// revocation metadata untouched. On write failure the transition
    /// is rolled back.
    pub fn revoke(
        &self,
        id: &CertificateId,
        revoked_by: AdminId,
        now: Timestamp,
    ) -> Result<RevocationOutcome, RegistryError> {
        let mut inner = self.inner.write();
        let Some(pos) = inner.records.iter().position(|r| r.certificate_id == *id) else {
            return Ok(RevocationOutcome::NotFound);
        };
        if inner.records[pos].status == CertificateStatus::Revoked {
            return Ok(RevocationOutcome::AlreadyRevoked);
        }
        inner.records[pos].status = CertificateStatus::Revoked;
        inner.records[pos].revoked_at = Some(now);
        inner.records[pos].revoked_by = Some(revoked_by);
        if let Err(e) = persist(&inner) {
            inner.records[pos].status = CertificateStatus::Active;
            inner.records[pos].revoked_at = None;
            inner.records[pos].revoked_by = None;
            return Err(e);
        }
        tracing::info!(certificate_id = %id, "certificate revoked");
        Ok(RevocationOutcome::Revoked)
    }

    /// Snapshot of every record, in issuance order.
    pub fn list(&self) -> Vec<CertificateRecord> {
        self.inner.read().records.clone()
    }

    /// Number of records in the registry.
    pub fn len(&self) -> usize {
        self.inner.read().records.len()
    }

    /// Whether the registry holds no records.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for CertificateRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.read();
        f.debug_struct("CertificateRegistry")
            .field("records", &inner.records.len())
            .field("path", &inner.path)
            .finish()
    }
}

/// Rewrite the whole registry file from the in-memory records.
///
/// Writes a sibling temp file and renames it over the target so the
/// file on disk is always a complete snapshot.
fn persist(inner: &RegistryInner) -> Result<(), RegistryError> {
    let Some(path) = &inner.path else {
        return Ok(());
    };
    let write_err = |source| RegistryError::Write {
        path: path.clone(),
        source,
    };
    let json = serde_json::to_vec_pretty(&inner.records).map_err(|e| RegistryError::Write {
        path: path.clone(),
        source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
    })?;
    let tmp = tmp_path(path);
    std::fs::write(&tmp, &json).map_err(write_err)?;
    std::fs::rename(&tmp, path).map_err(write_err)?;
    Ok(())
}

/// Sibling temp path for atomic replacement.
fn tmp_path(path: &Path) -> PathBuf {
    let mut os = path.as_os_str().to_os_string();
    os.push(".tmp");
    PathBuf::from(os)
}
