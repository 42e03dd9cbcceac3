// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Wipeseal — certificate issuance and offline verification CLI.
//
// The wipe itself is performed by external tooling; this binary covers the
// certificate side: provisioning the signing key pair, issuing the artifact
// triple for a completed wipe, and re-verifying a manifest against the
// public key.

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::Utc;
use clap::{Parser, Subcommand};

use wipeseal_artifact::ManifestFile;
use wipeseal_core::config::AppConfig;
use wipeseal_core::error::Result;
use wipeseal_engine::CertificateService;
use wipeseal_security::{
    AuditLog, KeyManager, VerificationOutcome, Verifier, generate_key_files,
};

/// Wipeseal — tamper-evident wipe certificates.
#[derive(Parser, Debug)]
#[command(name = "wipeseal")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Directory certificate artifacts are written into
    #[arg(long, default_value = "certs")]
    artifact_dir: PathBuf,

    /// Path to the PKCS#8 PEM private signing key
    #[arg(long, default_value = "keys/private.pem")]
    private_key: PathBuf,

    /// Path to the SPKI PEM public key
    #[arg(long, default_value = "keys/public.pem")]
    public_key: PathBuf,

    /// Path to the SQLite audit trail database
    #[arg(long, default_value = "wipeseal_audit.db")]
    audit_db: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate and persist a fresh P-384 signing key pair
    Keygen,

    /// Issue the certificate artifact triple for a completed wipe
    Issue {
        /// Device id to certify (e.g. "sda1")
        device: String,

        /// Wipe method label recorded on the certificate
        #[arg(long, default_value = "DoD 3-Pass")]
        method: String,
    },

    /// Re-verify a certificate manifest against the public key
    Verify {
        /// Path to the `<device>_cert.json` manifest file
        manifest: PathBuf,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config = AppConfig {
        private_key_path: cli.private_key,
        public_key_path: cli.public_key,
        artifact_dir: cli.artifact_dir,
        audit_db_path: cli.audit_db,
        ..AppConfig::default()
    };

    match cli.command {
        Commands::Keygen => keygen(&config),
        Commands::Issue { device, method } => issue(&config, &device, &method),
        Commands::Verify { manifest } => verify(&config, &manifest),
    }
}

fn keygen(config: &AppConfig) -> Result<ExitCode> {
    for path in [&config.private_key_path, &config.public_key_path] {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
    }

    generate_key_files(&config.private_key_path, &config.public_key_path)?;
    println!(
        "Keys generated: {} and {}",
        config.private_key_path.display(),
        config.public_key_path.display()
    );
    println!("Keep the private key secure — anyone holding it can issue certificates.");
    Ok(ExitCode::SUCCESS)
}

fn issue(config: &AppConfig, device: &str, method: &str) -> Result<ExitCode> {
    let keys = KeyManager::load(&config.private_key_path, &config.public_key_path)?;
    let service = CertificateService::new(config, &keys);

    let cert = service.issue(device, method, Utc::now())?;
    let fingerprint = cert.manifest.canonical_form().fingerprint();

    audit(config, "issue", device, Some(&fingerprint), true, None);

    println!("Certificate issued for {device}");
    println!("  fingerprint: {fingerprint}");
    for (kind, path) in cert.artifacts.entries() {
        println!("  {kind}: {}", path.display());
    }
    Ok(ExitCode::SUCCESS)
}

fn verify(config: &AppConfig, manifest_path: &std::path::Path) -> Result<ExitCode> {
    let verifier = Verifier::from_public_key_file(&config.public_key_path)?;
    let file = ManifestFile::read(manifest_path)?;

    let outcome = verifier.verify_transport(&file.data, &file.signature);

    // Best effort: the device id is inside the canonical form, which may be
    // exactly what is corrupt — fall back to the file name.
    let device = manifest_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unknown")
        .to_owned();
    audit(
        config,
        "verify",
        &device,
        None,
        outcome == VerificationOutcome::Valid,
        Some(&outcome.to_string()),
    );

    println!("{outcome}");
    match outcome {
        VerificationOutcome::Valid => Ok(ExitCode::SUCCESS),
        VerificationOutcome::Invalid | VerificationOutcome::Malformed => Ok(ExitCode::FAILURE),
    }
}

/// Record an audit entry; audit problems are logged, never fatal to the
/// operation they describe.
fn audit(
    config: &AppConfig,
    action: &str,
    device: &str,
    fingerprint: Option<&str>,
    success: bool,
    details: Option<&str>,
) {
    let result = AuditLog::open(&config.audit_db_path)
        .and_then(|log| log.record(action, device, fingerprint, success, details));
    if let Err(e) = result {
        tracing::warn!(error = %e, "audit entry not recorded");
    }
}
