//! # Issuance and Verification Engine
//!
//! [`CertificateService`] implements the two protocols the registry
//! exists for.
//!
//! **Issuance** validates the caller's inputs, mints an identifier,
//! assembles the canonical certificate content, fingerprints it, and
//! persists the registry record. For structured certificates the
//! server-assigned identifier and timestamp are part of the digested
//! content; for file certificates the digest covers the raw bytes only.
//!
//! **Verification** is a strict, ordered, short-circuiting pipeline:
//!
//! 1. lookup — `NOT_FOUND` if the identifier was never issued
//! 2. integrity — `TAMPERED` if the recomputed digest differs
//! 3. ownership — `OWNERSHIP_MISMATCH` if the claimed owner is not the
//!    bound owner
//! 4. revocation — `REVOKED` if the record is no longer active
//!
//! All four stages pass → `VALID`. Every outcome is an ordinary value:
//! a tampered or revoked certificate is an expected business result,
//! not a failure of the verification call. Only malformed input
//! (status `ERROR`) and store faults break that pattern.
//!
//! The revocation stage runs in both the structured and the file
//! pipeline — there is exactly one pipeline, so no presentation mode
//! can dodge a stage.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use soulcert_core::{
    sha256_digest, AdminId, CanonicalBytes, CanonicalizationError, CertificateId, ContentDigest,
    OwnerId, Timestamp, ValidationError,
};

use crate::record::{CertificateDocument, CertificateKind, CertificateRecord, CertificateStatus};
use crate::store::{CertificateRegistry, RegistryError, RevocationOutcome};

/// Terminal outcome of a verification call.
///
/// Stable wire vocabulary; these exact strings are the contract with
/// every consumer of the verification API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerificationStatus {
    /// Authentic, unaltered, owned by the claimant, not revoked.
    Valid,
    /// No registry record for the presented identifier.
    NotFound,
    /// The recomputed fingerprint differs from the stored one.
    Tampered,
    /// The bound owner is not the claimed owner.
    OwnershipMismatch,
    /// The certificate was revoked by an administrator.
    Revoked,
    /// The verification request itself was malformed — not a
    /// verification result.
    Error,
}

impl VerificationStatus {
    /// The wire representation of this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Valid => "VALID",
            Self::NotFound => "NOT_FOUND",
            Self::Tampered => "TAMPERED",
            Self::OwnershipMismatch => "OWNERSHIP_MISMATCH",
            Self::Revoked => "REVOKED",
            Self::Error => "ERROR",
        }
    }
}

impl std::fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The result a verifier receives: the outcome, a short human-readable
/// message, and the issuer once a registry record was located.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationReport {
    /// The terminal outcome.
    pub status: VerificationStatus,
    /// Human-readable explanation of the outcome.
    pub message: String,
    /// The issuing entity, present whenever a record was found.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,
}

impl VerificationReport {
    /// Build the `ERROR` report for a malformed verification request.
    ///
    /// Public so hosting layers can report missing request fields with
    /// the same shape the engine uses, before the pipeline is reached.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self {
            status: VerificationStatus::Error,
            message: message.into(),
            issuer: None,
        }
    }

    fn not_found() -> Self {
        Self {
            status: VerificationStatus::NotFound,
            message: "Certificate not found in registry".to_string(),
            issuer: None,
        }
    }

    fn of_record(status: VerificationStatus, message: &str, record: &CertificateRecord) -> Self {
        Self {
            status,
            message: message.to_string(),
            issuer: Some(record.issuer.clone()),
        }
    }
}

/// A freshly issued structured certificate: the complete document the
/// holder must retain for later verification, plus its fingerprint.
#[derive(Debug, Clone, Serialize)]
pub struct IssuedCertificate {
    /// The full certificate content, including the server-assigned
    /// identifier and timestamp.
    pub document: CertificateDocument,
    /// Fingerprint recorded in the registry.
    pub digest: ContentDigest,
}

/// A freshly issued file certificate. The holder keeps the file itself;
/// only the identifier and fingerprint come back.
#[derive(Debug, Clone, Serialize)]
pub struct IssuedFileCertificate {
    /// The minted identifier, needed to verify the file later.
    pub certificate_id: CertificateId,
    /// Fingerprint of the file bytes.
    pub digest: ContentDigest,
}

/// Error raised by the issuance operation.
#[derive(Error, Debug)]
pub enum IssueError {
    /// A required input was missing or empty. No state was changed.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The certificate content could not be canonically serialized.
    #[error("certificate content could not be canonicalized: {0}")]
    Canonicalization(#[from] CanonicalizationError),

    /// The registry could not be persisted. No record is visible.
    #[error(transparent)]
    Storage(#[from] RegistryError),
}

/// Error raised by the revocation operation.
#[derive(Error, Debug)]
pub enum RevokeError {
    /// A required input was missing or empty.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The registry could not be persisted; the record is unchanged.
    #[error(transparent)]
    Storage(#[from] RegistryError),
}

/// The issuance and verification engine, bound to one registry.
#[derive(Debug, Clone)]
pub struct CertificateService {
    registry: CertificateRegistry,
}

impl CertificateService {
    /// Create a service over the given registry.
    pub fn new(registry: CertificateRegistry) -> Self {
        Self { registry }
    }

    /// Access the underlying registry.
    pub fn registry(&self) -> &CertificateRegistry {
        &self.registry
    }

    /// Issue a structured certificate binding `skill_name` to `owner_id`.
    ///
    /// The returned document is the exact content that was digested —
    /// identifier and timestamp included — and is what must be
    /// presented at verification.
    pub fn issue(
        &self,
        skill_name: &str,
        owner_id: &str,
        issuer: &str,
    ) -> Result<IssuedCertificate, IssueError> {
        let skill_name = require("skillName", skill_name)?;
        let owner_id = OwnerId::new(owner_id)?;
        let issuer = require("issuer", issuer)?;

        let document = CertificateDocument {
            certificate_id: CertificateId::mint(),
            skill_name,
            issuer,
            owner_id,
            issued_at: Timestamp::now(),
        };
        let digest = document.digest()?;

        self.registry.create(CertificateRecord {
            certificate_id: document.certificate_id,
            digest,
            owner_id: document.owner_id.clone(),
            issuer: document.issuer.clone(),
            kind: CertificateKind::Structured,
            status: CertificateStatus::Active,
            issued_at: document.issued_at,
            revoked_at: None,
            revoked_by: None,
        })?;

        tracing::info!(certificate_id = %document.certificate_id, "certificate issued");
        Ok(IssuedCertificate { document, digest })
    }

    /// Issue a file certificate. The digest covers the raw bytes only;
    /// identifier and timestamp are stored alongside it, not hashed in.
    pub fn issue_file(
        &self,
        bytes: &[u8],
        owner_id: &str,
        issuer: &str,
    ) -> Result<IssuedFileCertificate, IssueError> {
        if bytes.is_empty() {
            return Err(ValidationError::EmptyField {
                field: "certificate",
            }
            .into());
        }
        let owner_id = OwnerId::new(owner_id)?;
        let issuer = require("issuer", issuer)?;

        let certificate_id = CertificateId::mint();
        let digest = sha256_digest(&CanonicalBytes::from_raw(bytes.to_vec()));

        self.registry.create(CertificateRecord {
            certificate_id,
            digest,
            owner_id,
            issuer,
            kind: CertificateKind::File,
            status: CertificateStatus::Active,
            issued_at: Timestamp::now(),
            revoked_at: None,
            revoked_by: None,
        })?;

        tracing::info!(certificate_id = %certificate_id, "file certificate issued");
        Ok(IssuedFileCertificate {
            certificate_id,
            digest,
        })
    }

    /// Verify a presented structured certificate against the registry.
    pub fn verify_document(
        &self,
        document: &CertificateDocument,
        claimed_owner_id: &str,
    ) -> VerificationReport {
        let Ok(claimed) = OwnerId::new(claimed_owner_id) else {
            return VerificationReport::malformed("Missing certificate or claimedOwnerId");
        };
        let recomputed = match document.digest() {
            Ok(d) => d,
            Err(e) => {
                return VerificationReport::malformed(format!(
                    "Certificate content could not be canonicalized: {e}"
                ))
            }
        };
        self.run_pipeline(&document.certificate_id, recomputed, &claimed)
    }

    /// Verify a presented file certificate against the registry.
    ///
    /// The identifier travels outside the file, so it is a separate
    /// input here. An identifier that does not parse was never issued
    /// by this registry and reports `NOT_FOUND`; an absent identifier
    /// is a malformed request and reports `ERROR`.
    pub fn verify_file(
        &self,
        certificate_id: &str,
        bytes: &[u8],
        claimed_owner_id: &str,
    ) -> VerificationReport {
        if certificate_id.trim().is_empty() || bytes.is_empty() {
            return VerificationReport::malformed("Missing required fields");
        }
        let Ok(claimed) = OwnerId::new(claimed_owner_id) else {
            return VerificationReport::malformed("Missing required fields");
        };
        let Ok(id) = CertificateId::parse(certificate_id) else {
            return VerificationReport::not_found();
        };
        let recomputed = sha256_digest(&CanonicalBytes::from_raw(bytes.to_vec()));
        self.run_pipeline(&id, recomputed, &claimed)
    }

    /// The four-stage check sequence shared by both presentation modes.
    /// First failing stage wins; later stages never run.
    fn run_pipeline(
        &self,
        id: &CertificateId,
        recomputed: ContentDigest,
        claimed: &OwnerId,
    ) -> VerificationReport {
        // Stage 1: lookup.
        let Some(record) = self.registry.find(id) else {
            return VerificationReport::not_found();
        };

        // Stage 2: integrity.
        if recomputed != record.digest {
            return VerificationReport::of_record(
                VerificationStatus::Tampered,
                "Certificate content has been modified",
                &record,
            );
        }

        // Stage 3: ownership (the soulbound rule).
        if record.owner_id != *claimed {
            return VerificationReport::of_record(
                VerificationStatus::OwnershipMismatch,
                "Certificate does not belong to the claimed owner",
                &record,
            );
        }

        // Stage 4: revocation.
        if !record.is_active() {
            return VerificationReport::of_record(
                VerificationStatus::Revoked,
                "Certificate has been revoked by the issuer",
                &record,
            );
        }

        VerificationReport::of_record(
            VerificationStatus::Valid,
            "Certificate is authentic and belongs to the claimed owner",
            &record,
        )
    }

    /// Revoke a certificate. Idempotent for already-revoked records.
    pub fn revoke(
        &self,
        certificate_id: &str,
        revoked_by: &str,
    ) -> Result<RevocationOutcome, RevokeError> {
        if certificate_id.trim().is_empty() {
            return Err(ValidationError::EmptyField {
                field: "certificateId",
            }
            .into());
        }
        let revoked_by = AdminId::new(revoked_by)?;
        let Ok(id) = CertificateId::parse(certificate_id) else {
            return Ok(RevocationOutcome::NotFound);
        };
        Ok(self.registry.revoke(&id, revoked_by, Timestamp::now())?)
    }

    /// Every record in the registry, for dashboard display.
    pub fn list(&self) -> Vec<CertificateRecord> {
        self.registry.list()
    }
}

/// Validate a required free-text field.
fn require(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField { field });
    }
    Ok(trimmed.to_string())
}
