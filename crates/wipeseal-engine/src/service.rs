// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Certificate issuance for one device: record → canonical form → signature
// → artifact triple.

use chrono::{DateTime, Utc};
use tracing::{info, instrument};

use wipeseal_artifact::ArtifactEmitter;
use wipeseal_core::config::AppConfig;
use wipeseal_core::error::Result;
use wipeseal_core::types::{ArtifactSet, WipeRecord, WipeStatus};
use wipeseal_security::{CertificateManifest, KeyManager, Signer, canonicalize};

/// A freshly issued certificate: the authoritative manifest plus the paths
/// of its derived artifacts.
#[derive(Debug, Clone)]
pub struct IssuedCertificate {
    pub record: WipeRecord,
    pub manifest: CertificateManifest,
    pub artifacts: ArtifactSet,
}

/// Issues one certificate per completed wipe.
///
/// Stateless beyond the borrowed signing keys: issuing twice for equal
/// inputs yields two independently valid certificates whose signatures
/// differ (ECDSA is randomized) but whose canonical forms are identical.
pub struct CertificateService<'k> {
    keys: &'k KeyManager,
    app_label: String,
    emitter: ArtifactEmitter,
}

impl<'k> CertificateService<'k> {
    pub fn new(config: &AppConfig, keys: &'k KeyManager) -> Self {
        Self {
            keys,
            app_label: config.app_label.clone(),
            emitter: ArtifactEmitter::new(&config.artifact_dir),
        }
    }

    /// Issue a certificate for a wipe that completed at `completed_at`.
    ///
    /// The wipe itself must already have succeeded — issuance records the
    /// fact, it does not check it.
    #[instrument(skip_all, fields(device_id, method))]
    pub fn issue(
        &self,
        device_id: &str,
        method: &str,
        completed_at: DateTime<Utc>,
    ) -> Result<IssuedCertificate> {
        let record = WipeRecord::new(
            &self.app_label,
            device_id,
            method,
            completed_at,
            WipeStatus::Completed,
        );

        let form = canonicalize(&record)?;
        let manifest = Signer::new(self.keys).sign(&form)?;
        let artifacts = self.emitter.emit_all(&record, &manifest)?;

        info!(
            device_id,
            fingerprint = form.fingerprint(),
            "certificate issued"
        );
        Ok(IssuedCertificate {
            record,
            manifest,
            artifacts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use wipeseal_security::{VerificationOutcome, Verifier};

    fn config(dir: &std::path::Path) -> AppConfig {
        AppConfig {
            artifact_dir: dir.to_path_buf(),
            ..AppConfig::default()
        }
    }

    fn completed_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 10, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn issue_produces_three_verifiable_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let keys = KeyManager::generate().unwrap();
        let service = CertificateService::new(&config(dir.path()), &keys);

        let cert = service
            .issue("sda1", "DoD 3-Pass", completed_at())
            .expect("issue");

        for (kind, path) in cert.artifacts.entries() {
            let meta = std::fs::metadata(path)
                .unwrap_or_else(|_| panic!("{kind} artifact missing"));
            assert!(meta.len() > 0, "{kind} artifact is empty");
        }

        // The manifest file alone is enough to re-verify.
        let file = wipeseal_artifact::ManifestFile::read(&cert.artifacts.manifest).unwrap();
        let verifier = Verifier::from_key_manager(&keys);
        assert_eq!(
            verifier.verify_transport(&file.data, &file.signature),
            VerificationOutcome::Valid
        );
    }

    #[test]
    fn equal_inputs_yield_independent_certificates() {
        let dir = tempfile::tempdir().unwrap();
        let keys = KeyManager::generate().unwrap();
        let service = CertificateService::new(&config(dir.path()), &keys);

        let a = service.issue("sda1", "DoD 3-Pass", completed_at()).unwrap();
        let b = service.issue("sda1", "DoD 3-Pass", completed_at()).unwrap();

        assert_eq!(
            a.manifest.canonical_form().as_bytes(),
            b.manifest.canonical_form().as_bytes(),
            "equal facts must canonicalize identically"
        );
        assert_ne!(
            a.manifest.signature().as_bytes(),
            b.manifest.signature().as_bytes(),
            "signatures must be independently randomized"
        );

        let verifier = Verifier::from_key_manager(&keys);
        assert_eq!(verifier.verify_manifest(&a.manifest), VerificationOutcome::Valid);
        assert_eq!(verifier.verify_manifest(&b.manifest), VerificationOutcome::Valid);
    }

    #[test]
    fn record_carries_configured_label_and_completed_status() {
        let dir = tempfile::tempdir().unwrap();
        let keys = KeyManager::generate().unwrap();
        let mut cfg = config(dir.path());
        cfg.app_label = "Secure Wipe".into();
        let service = CertificateService::new(&cfg, &keys);

        let cert = service.issue("sda1", "DoD 3-Pass", completed_at()).unwrap();
        assert_eq!(cert.record.app_label(), "Secure Wipe");
        assert_eq!(cert.record.status(), WipeStatus::Completed);
        assert_eq!(
            cert.manifest.canonical_form().as_str(),
            r#"{"app":"Secure Wipe","device_id":"sda1","method":"DoD 3-Pass","status":"Completed","timestamp":"2023-10-01T12:00:00Z"}"#
        );
    }
}
