//! # Certificate Records and Documents
//!
//! [`CertificateRecord`] is what the registry persists — digest, owner
//! binding, issuer, status. [`CertificateDocument`] is the full
//! structured certificate content handed back to the holder at
//! issuance and presented again at verification.
//!
//! Field names serialize in camelCase, the layout the registry file
//! has always used.

use serde::{Deserialize, Serialize};

use soulcert_core::{
    sha256_digest, AdminId, CanonicalBytes, CanonicalizationError, CertificateId, ContentDigest,
    OwnerId, Timestamp,
};

/// Lifecycle status of an issued certificate.
///
/// The transition is one-way: `ACTIVE → REVOKED`. There is no un-revoke
/// and no other state. A closed enum (rather than a free string) makes
/// an invalid status unrepresentable in the registry file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CertificateStatus {
    /// Issued and never revoked.
    Active,
    /// Revoked by an administrator. Terminal.
    Revoked,
}

impl CertificateStatus {
    /// The wire representation of this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Revoked => "REVOKED",
        }
    }
}

impl std::fmt::Display for CertificateStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a certificate's digest was computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CertificateKind {
    /// Digest over the canonical serialization of a [`CertificateDocument`].
    Structured,
    /// Digest over raw file bytes (e.g. an uploaded PDF).
    File,
}

impl CertificateKind {
    /// The wire representation of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Structured => "STRUCTURED",
            Self::File => "FILE",
        }
    }
}

impl std::fmt::Display for CertificateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One persisted registry entry.
///
/// `certificateId`, `digest`, `ownerId`, `issuer`, `kind` and
/// `issuedAt` are immutable once written — the owner binding in
/// particular is the soulbound invariant. Only the revocation fields
/// are ever updated, exactly once, by the revoke operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateRecord {
    /// Globally unique identifier, minted at issuance.
    pub certificate_id: CertificateId,
    /// Fingerprint of the certificate content at issuance time.
    pub digest: ContentDigest,
    /// The bound owner. Never changes.
    pub owner_id: OwnerId,
    /// The issuing entity.
    pub issuer: String,
    /// How the digest was computed.
    pub kind: CertificateKind,
    /// Lifecycle status.
    pub status: CertificateStatus,
    /// Issuance time.
    pub issued_at: Timestamp,
    /// Set once, on revocation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revoked_at: Option<Timestamp>,
    /// The administrator who revoked, set once on revocation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revoked_by: Option<AdminId>,
}

impl CertificateRecord {
    /// Whether this certificate is still active.
    pub fn is_active(&self) -> bool {
        self.status == CertificateStatus::Active
    }
}

/// The full structured certificate content.
///
/// Assembled at issuance — including the server-minted identifier and
/// timestamp — and digested as a whole, so verification must be handed
/// back this exact document, not just the originally submitted fields.
///
/// Unknown fields in a presented document are rejected at parse time:
/// the canonical content of a structured certificate is exactly these
/// five fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CertificateDocument {
    /// Server-minted identifier, covered by the digest.
    pub certificate_id: CertificateId,
    /// The certified skill.
    pub skill_name: String,
    /// The issuing entity.
    pub issuer: String,
    /// The bound owner.
    pub owner_id: OwnerId,
    /// Issuance time, covered by the digest.
    pub issued_at: Timestamp,
}

impl CertificateDocument {
    /// Canonical bytes of this document — the digest input.
    ///
    /// The one serialization routine shared by issuance and
    /// verification. JCS key ordering makes the result independent of
    /// the field order in any presented JSON.
    pub fn canonical_bytes(&self) -> Result<CanonicalBytes, CanonicalizationError> {
        CanonicalBytes::new(self)
    }

    /// The content fingerprint of this document.
    pub fn digest(&self) -> Result<ContentDigest, CanonicalizationError> {
        Ok(sha256_digest(&self.canonical_bytes()?))
    }
}
