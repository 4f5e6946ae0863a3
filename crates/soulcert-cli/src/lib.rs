//! # soulcert-cli — Command-Line Tooling
//!
//! Drives the issuance and verification engine directly against a
//! local registry file, without the HTTP layer. Useful for scripted
//! issuance, offline verification, and poking at a registry snapshot.

pub mod commands;
