//! # Subcommand Handlers
//!
//! Each `run_*` function opens the registry file, performs one
//! operation, and returns the process exit code. Verification maps its
//! outcome to the exit code (0 for `VALID`, 1 otherwise) so scripts
//! can branch on it without parsing output.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use soulcert_registry::{
    CertificateDocument, CertificateRegistry, CertificateService, RevocationOutcome,
    VerificationReport, VerificationStatus,
};

/// Arguments for `soulcert issue`.
#[derive(Args, Debug)]
pub struct IssueArgs {
    /// The skill being certified.
    #[arg(long)]
    pub skill: String,
    /// The owner the certificate is soulbound to.
    #[arg(long)]
    pub owner: String,
    /// The issuing entity.
    #[arg(long)]
    pub issuer: String,
    /// Write the issued certificate document to this file for later
    /// verification.
    #[arg(long, value_name = "FILE")]
    pub out: Option<PathBuf>,
}

/// Arguments for `soulcert issue-file`.
#[derive(Args, Debug)]
pub struct IssueFileArgs {
    /// Path to the certificate file (e.g. a PDF).
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
    /// The owner the certificate is soulbound to.
    #[arg(long)]
    pub owner: String,
    /// The issuing entity.
    #[arg(long)]
    pub issuer: String,
}

/// Arguments for `soulcert verify`.
#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Path to the certificate document JSON saved at issuance.
    #[arg(value_name = "FILE")]
    pub certificate: PathBuf,
    /// The claimed owner identity.
    #[arg(long)]
    pub owner: String,
}

/// Arguments for `soulcert verify-file`.
#[derive(Args, Debug)]
pub struct VerifyFileArgs {
    /// The certificate identifier issued with the file.
    #[arg(long)]
    pub id: String,
    /// Path to the certificate file.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
    /// The claimed owner identity.
    #[arg(long)]
    pub owner: String,
}

/// Arguments for `soulcert revoke`.
#[derive(Args, Debug)]
pub struct RevokeArgs {
    /// The certificate identifier to revoke.
    #[arg(long)]
    pub id: String,
    /// The administrator performing the revocation.
    #[arg(long)]
    pub admin: String,
}

/// Open the service over the registry file.
fn open_service(registry_path: &Path) -> Result<CertificateService> {
    let registry = CertificateRegistry::open(registry_path)
        .with_context(|| format!("opening registry {}", registry_path.display()))?;
    Ok(CertificateService::new(registry))
}

/// Print a verification report and map it to an exit code.
fn finish_verification(report: &VerificationReport) -> u8 {
    println!("{}: {}", report.status, report.message);
    if let Some(issuer) = &report.issuer {
        println!("issuer: {issuer}");
    }
    match report.status {
        VerificationStatus::Valid => 0,
        _ => 1,
    }
}

/// `soulcert issue` — issue a structured certificate.
pub fn run_issue(args: &IssueArgs, registry_path: &Path) -> Result<u8> {
    let service = open_service(registry_path)?;
    let issued = service.issue(&args.skill, &args.owner, &args.issuer)?;

    let document_json = serde_json::to_string_pretty(&issued.document)?;
    if let Some(out) = &args.out {
        std::fs::write(out, &document_json)
            .with_context(|| format!("writing certificate document to {}", out.display()))?;
        tracing::info!(path = %out.display(), "certificate document written");
    }

    println!("{document_json}");
    println!("digest: {}", issued.digest);
    Ok(0)
}

/// `soulcert issue-file` — issue a file certificate.
pub fn run_issue_file(args: &IssueFileArgs, registry_path: &Path) -> Result<u8> {
    let bytes = std::fs::read(&args.file)
        .with_context(|| format!("reading {}", args.file.display()))?;
    let service = open_service(registry_path)?;
    let issued = service.issue_file(&bytes, &args.owner, &args.issuer)?;

    println!("certificateId: {}", issued.certificate_id);
    println!("digest: {}", issued.digest);
    Ok(0)
}

/// `soulcert verify` — verify a saved certificate document.
pub fn run_verify(args: &VerifyArgs, registry_path: &Path) -> Result<u8> {
    let data = std::fs::read_to_string(&args.certificate)
        .with_context(|| format!("reading {}", args.certificate.display()))?;
    let document: CertificateDocument = serde_json::from_str(&data)
        .with_context(|| format!("parsing certificate document {}", args.certificate.display()))?;

    let service = open_service(registry_path)?;
    let report = service.verify_document(&document, &args.owner);
    Ok(finish_verification(&report))
}

/// `soulcert verify-file` — verify a certificate file.
pub fn run_verify_file(args: &VerifyFileArgs, registry_path: &Path) -> Result<u8> {
    let bytes = std::fs::read(&args.file)
        .with_context(|| format!("reading {}", args.file.display()))?;
    let service = open_service(registry_path)?;
    let report = service.verify_file(&args.id, &bytes, &args.owner);
    Ok(finish_verification(&report))
}

/// `soulcert revoke` — revoke a certificate.
pub fn run_revoke(args: &RevokeArgs, registry_path: &Path) -> Result<u8> {
    let service = open_service(registry_path)?;
    match service.revoke(&args.id, &args.admin)? {
        RevocationOutcome::Revoked => {
            println!("certificate {} revoked", args.id);
            Ok(0)
        }
        RevocationOutcome::AlreadyRevoked => {
            println!("certificate {} was already revoked", args.id);
            Ok(0)
        }
        RevocationOutcome::NotFound => {
            println!("certificate {} not found", args.id);
            Ok(1)
        }
    }
}

/// `soulcert list` — dump every registry record.
pub fn run_list(registry_path: &Path) -> Result<u8> {
    let service = open_service(registry_path)?;
    let records = service.list();
    println!("{}", serde_json::to_string_pretty(&records)?);
    Ok(0)
}
