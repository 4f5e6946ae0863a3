//! # soulcert-registry — Registry and Verification Engine
//!
//! Owns the mapping from certificate identifier to registry record and
//! implements the issuance and verification protocols on top of the
//! fingerprint primitives in `soulcert-core`.
//!
//! ## Components
//!
//! - [`record`] — the persisted [`CertificateRecord`], its status
//!   lifecycle, and the [`CertificateDocument`] handed to holders.
//! - [`store`] — [`CertificateRegistry`], the single-owner repository
//!   around the backing JSON file. All registry mutation flows through
//!   it; nothing else touches the file.
//! - [`engine`] — [`CertificateService`], the issuance operation and
//!   the ordered verification pipeline
//!   (lookup → integrity → ownership → revocation).
//! - [`admins`] — [`AdminDirectory`], the administrator credential
//!   store with salted password digests.
//!
//! ## Crate Policy
//!
//! - Depends only on `soulcert-core` internally.
//! - Verification outcomes are values, never `Err` — a tampered
//!   certificate is an expected business result, not a fault.
//! - No `unwrap()` or `expect()` outside tests.

pub mod admins;
pub mod engine;
pub mod record;
pub mod store;

pub use admins::{AdminDirectory, AdminError, AdminProfile};
pub use engine::{
    CertificateService, IssueError, IssuedCertificate, IssuedFileCertificate, RevokeError,
    VerificationReport, VerificationStatus,
};
pub use record::{CertificateDocument, CertificateKind, CertificateRecord, CertificateStatus};
pub use store::{CertificateRegistry, RegistryError, RevocationOutcome};
