//! # soulcert CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand
//! handlers. Uses clap derive macros; all subcommands operate on the
//! registry file named by the global `--registry` flag.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use soulcert_cli::commands::{
    run_issue, run_issue_file, run_list, run_revoke, run_verify, run_verify_file, IssueArgs,
    IssueFileArgs, RevokeArgs, VerifyArgs, VerifyFileArgs,
};

/// Soulcert — soulbound skill certificates
///
/// Issue certificates bound to an owner identity, verify presented
/// certificates against the registry, and revoke them. Verification
/// exits 0 only for a VALID outcome.
#[derive(Parser, Debug)]
#[command(name = "soulcert", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to the certificate registry file.
    #[arg(long, global = true, default_value = "registry.json")]
    registry: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Issue a structured certificate.
    Issue(IssueArgs),

    /// Issue a certificate over a file's bytes.
    IssueFile(IssueFileArgs),

    /// Verify a saved certificate document.
    Verify(VerifyArgs),

    /// Verify a certificate file.
    VerifyFile(VerifyFileArgs),

    /// Revoke a certificate.
    Revoke(RevokeArgs),

    /// Dump every registry record.
    List,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity level.
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let result = match cli.command {
        Commands::Issue(args) => run_issue(&args, &cli.registry),
        Commands::IssueFile(args) => run_issue_file(&args, &cli.registry),
        Commands::Verify(args) => run_verify(&args, &cli.registry),
        Commands::VerifyFile(args) => run_verify_file(&args, &cli.registry),
        Commands::Revoke(args) => run_revoke(&args, &cli.registry),
        Commands::List => run_list(&cli.registry),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
