//! # Domain Identity Newtypes
//!
//! Newtype wrappers for the identifier namespaces in Soulcert. You
//! cannot pass an `OwnerId` where an `AdminId` is expected, and a
//! `CertificateId` is always a 128-bit random UUID — never a caller-
//! chosen string.
//!
//! Certificate identifiers are minted with UUID v4 (122 random bits),
//! which is what makes registry keys collision-free without any
//! uniqueness check at insert time.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// Unique identifier for an issued certificate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CertificateId(Uuid);

impl CertificateId {
    /// Mint a fresh random certificate identifier.
    pub fn mint() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an identifier from its canonical hyphenated form.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|_| ValidationError::InvalidId(s.to_string()))
    }

    /// Access the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl std::fmt::Display for CertificateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque identity of a certificate's bound owner.
///
/// The soulbound invariant lives here: a record's `OwnerId` is written
/// once at issuance and never changes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OwnerId(String);

impl OwnerId {
    /// Create a validated owner identifier. Trims surrounding
    /// whitespace; rejects empty input.
    pub fn new(s: impl Into<String>) -> Result<Self, ValidationError> {
        let trimmed = s.into().trim().to_string();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyField { field: "ownerId" });
        }
        Ok(Self(trimmed))
    }

    /// The owner identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OwnerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<&str> for OwnerId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Identity of an administrator in the credential directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AdminId(String);

impl AdminId {
    /// Create a validated administrator identifier.
    pub fn new(s: impl Into<String>) -> Result<Self, ValidationError> {
        let trimmed = s.into().trim().to_string();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyField { field: "adminId" });
        }
        Ok(Self(trimmed))
    }

    /// The administrator identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AdminId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<&str> for AdminId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
