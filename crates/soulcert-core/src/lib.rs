//! # soulcert-core — Foundational Types for Soulcert
//!
//! Defines the primitives every other crate in the workspace builds on:
//! canonical byte production for digest computation, SHA-256 content
//! digests, identifier newtypes, and UTC-only timestamps.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for domain primitives.** `CertificateId`,
//!    `OwnerId`, `AdminId` — all newtypes with validated constructors.
//!    No bare strings for identifiers.
//!
//! 2. **`CanonicalBytes` newtype.** ALL digest computation flows through
//!    `CanonicalBytes`. No raw `serde_json::to_vec()` for digests, ever.
//!    Issuance and verification cannot disagree on serialization because
//!    there is exactly one serialization routine.
//!
//! 3. **`sha256_digest()` accepts only `&CanonicalBytes`.** Compile-time
//!    enforcement that every digest path flows through canonicalization.
//!
//! 4. **UTC-only timestamps.** The `Timestamp` type enforces UTC with Z
//!    suffix and seconds precision — timestamps participate in digests,
//!    so their encoding must be deterministic.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `soulcert-*` crates (leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod canonical;
pub mod digest;
pub mod error;
pub mod identity;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use canonical::CanonicalBytes;
pub use digest::{sha256_digest, sha256_hex, ContentDigest};
pub use error::{CanonicalizationError, ValidationError};
pub use identity::{AdminId, CertificateId, OwnerId};
pub use temporal::Timestamp;
