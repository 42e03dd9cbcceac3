// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// wipeseal-artifact — Renders a signed certificate into its artifact triple:
// PDF document, QR optical code, and JSON manifest.
//
// Every write is an atomic replace (temp file in the destination directory,
// then rename), so a reader never observes a partially written artifact.
// Artifact emissions are independent: a failure on one never prevents or
// corrupts the others, and each can be retried alone.  Concurrent callers
// must serialise per device id — two in-flight emissions for the same
// device would race on the same three paths.

pub mod document;
pub mod manifest;
pub mod optical;

use std::io::Write as _;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};

use wipeseal_core::error::{Result, WipesealError};
use wipeseal_core::types::{ArtifactKind, ArtifactSet, WipeRecord};
use wipeseal_security::CertificateManifest;

pub use manifest::ManifestFile;

/// File-name stem for a device id.
///
/// Device ids may arrive as full paths (`/dev/sda1`); path separators and
/// other non-filename characters become underscores so artifacts stay inside
/// the output directory.
pub fn artifact_stem(device_id: &str) -> String {
    device_id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Write `bytes` to `path` via a temp file in the same directory plus an
/// atomic rename.
fn atomic_write(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Emits the artifact triple for signed certificates into one directory.
pub struct ArtifactEmitter {
    output_dir: PathBuf,
}

impl ArtifactEmitter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// The deterministic paths for a device's artifact triple.
    pub fn artifact_set(&self, device_id: &str) -> ArtifactSet {
        let stem = artifact_stem(device_id);
        ArtifactSet {
            document: self.output_dir.join(format!("{stem}_cert.pdf")),
            optical_code: self.output_dir.join(format!("{stem}_qr.png")),
            manifest: self.output_dir.join(format!("{stem}_cert.json")),
        }
    }

    fn write_artifact(&self, kind: ArtifactKind, path: &Path, bytes: &[u8]) -> Result<()> {
        atomic_write(path, bytes).map_err(|e| WipesealError::ArtifactWrite {
            artifact: kind.as_str().into(),
            detail: e.to_string(),
        })?;
        debug!(kind = %kind, path = %path.display(), bytes = bytes.len(), "artifact written");
        Ok(())
    }

    /// Emit the human-readable PDF certificate.
    pub fn emit_document(
        &self,
        record: &WipeRecord,
        manifest: &CertificateManifest,
    ) -> Result<PathBuf> {
        let path = self.artifact_set(record.device_id()).document;
        let pdf = document::render(record, &manifest.canonical_form().fingerprint());
        self.write_artifact(ArtifactKind::Document, &path, &pdf)?;
        Ok(path)
    }

    /// Emit the QR code carrying the canonical form.
    pub fn emit_optical_code(
        &self,
        record: &WipeRecord,
        manifest: &CertificateManifest,
    ) -> Result<PathBuf> {
        let path = self.artifact_set(record.device_id()).optical_code;
        let png = optical::render(manifest.canonical_form().as_str())?;
        self.write_artifact(ArtifactKind::OpticalCode, &path, &png)?;
        Ok(path)
    }

    /// Emit the JSON manifest — the only artifact re-verification needs.
    pub fn emit_manifest(
        &self,
        record: &WipeRecord,
        manifest: &CertificateManifest,
    ) -> Result<PathBuf> {
        let path = self.artifact_set(record.device_id()).manifest;
        let json = ManifestFile::from_manifest(manifest).to_json()?;
        self.write_artifact(ArtifactKind::Manifest, &path, json.as_bytes())?;
        Ok(path)
    }

    /// Emit all three artifacts for one certificate.
    ///
    /// Every artifact is attempted regardless of earlier failures; whatever
    /// succeeded stays on disk for independent retry.  On any failure the
    /// error names each failed artifact, and only those.
    #[instrument(skip_all, fields(device_id = record.device_id()))]
    pub fn emit_all(
        &self,
        record: &WipeRecord,
        manifest: &CertificateManifest,
    ) -> Result<ArtifactSet> {
        std::fs::create_dir_all(&self.output_dir)?;

        let mut failures: Vec<(ArtifactKind, String)> = Vec::new();
        let mut note_failure = |kind: ArtifactKind, err: WipesealError| {
            warn!(artifact = %kind, error = %err, "artifact emission failed");
            failures.push((kind, err.to_string()));
        };

        if let Err(e) = self.emit_document(record, manifest) {
            note_failure(ArtifactKind::Document, e);
        }
        if let Err(e) = self.emit_optical_code(record, manifest) {
            note_failure(ArtifactKind::OpticalCode, e);
        }
        if let Err(e) = self.emit_manifest(record, manifest) {
            note_failure(ArtifactKind::Manifest, e);
        }

        if !failures.is_empty() {
            let artifacts: Vec<&str> = failures.iter().map(|(k, _)| k.as_str()).collect();
            let details: Vec<String> = failures
                .iter()
                .map(|(k, d)| format!("{k}: {d}"))
                .collect();
            return Err(WipesealError::ArtifactWrite {
                artifact: artifacts.join(", "),
                detail: details.join("; "),
            });
        }

        let set = self.artifact_set(record.device_id());
        info!(device_id = record.device_id(), "artifact triple emitted");
        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use wipeseal_core::types::WipeStatus;
    use wipeseal_security::{KeyManager, Signer, canonicalize};

    fn record(device_id: &str) -> WipeRecord {
        WipeRecord::new(
            "Wipeseal",
            device_id,
            "DoD 3-Pass",
            Utc.with_ymd_and_hms(2023, 10, 1, 12, 0, 0).unwrap(),
            WipeStatus::Completed,
        )
    }

    fn signed(record: &WipeRecord) -> (KeyManager, CertificateManifest) {
        let keys = KeyManager::generate().unwrap();
        let form = canonicalize(record).unwrap();
        let manifest = Signer::new(&keys).sign(&form).unwrap();
        (keys, manifest)
    }

    #[test]
    fn stem_sanitises_device_paths() {
        assert_eq!(artifact_stem("sda1"), "sda1");
        assert_eq!(artifact_stem("/dev/sda1"), "_dev_sda1");
        assert_eq!(artifact_stem(r"\\.\PhysicalDrive0"), "____PhysicalDrive0");
    }

    #[test]
    fn emit_all_produces_three_nonempty_files() {
        let dir = tempfile::tempdir().unwrap();
        let emitter = ArtifactEmitter::new(dir.path());
        let rec = record("sda1");
        let (_keys, manifest) = signed(&rec);

        let set = emitter.emit_all(&rec, &manifest).expect("emit_all");

        for (kind, path) in set.entries() {
            let meta = std::fs::metadata(path)
                .unwrap_or_else(|_| panic!("{kind} artifact missing"));
            assert!(meta.len() > 0, "{kind} artifact is empty");
        }
        assert!(set.document.ends_with("sda1_cert.pdf"));
        assert!(set.optical_code.ends_with("sda1_qr.png"));
        assert!(set.manifest.ends_with("sda1_cert.json"));
    }

    #[test]
    fn manifest_file_verifies_against_issuing_key() {
        let dir = tempfile::tempdir().unwrap();
        let emitter = ArtifactEmitter::new(dir.path());
        let rec = record("sda1");
        let (keys, manifest) = signed(&rec);

        let set = emitter.emit_all(&rec, &manifest).unwrap();
        let file = ManifestFile::read(&set.manifest).expect("read manifest");

        let verifier = wipeseal_security::Verifier::from_key_manager(&keys);
        assert_eq!(
            verifier.verify_transport(&file.data, &file.signature),
            wipeseal_security::VerificationOutcome::Valid
        );
    }

    #[test]
    fn no_temp_files_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        let emitter = ArtifactEmitter::new(dir.path());
        let rec = record("sda1");
        let (_keys, manifest) = signed(&rec);

        emitter.emit_all(&rec, &manifest).unwrap();

        let entries: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(entries.len(), 3, "unexpected files: {entries:?}");
    }

    #[test]
    fn one_failed_artifact_does_not_block_siblings() {
        let dir = tempfile::tempdir().unwrap();
        let emitter = ArtifactEmitter::new(dir.path());
        let rec = record("sda1");
        let (_keys, manifest) = signed(&rec);

        // Occupy the manifest path with a directory so its rename fails.
        let set = emitter.artifact_set("sda1");
        std::fs::create_dir_all(&set.manifest).unwrap();

        let err = emitter.emit_all(&rec, &manifest).expect_err("must fail");
        match err {
            WipesealError::ArtifactWrite { artifact, .. } => {
                assert!(artifact.contains("manifest"));
                assert!(!artifact.contains("document"));
                assert!(!artifact.contains("optical-code"));
            }
            other => panic!("unexpected error variant: {other}"),
        }

        // The siblings were still written and are intact.
        assert!(set.document.is_file());
        assert!(set.optical_code.is_file());
    }

    #[test]
    fn emission_overwrites_previous_artifacts_atomically() {
        let dir = tempfile::tempdir().unwrap();
        let emitter = ArtifactEmitter::new(dir.path());
        let rec = record("sda1");
        let (_keys, manifest) = signed(&rec);

        let set1 = emitter.emit_all(&rec, &manifest).unwrap();
        let first = std::fs::read(&set1.manifest).unwrap();

        // Re-issue (fresh randomized signature) and re-emit to the same paths.
        let (_keys2, manifest2) = signed(&rec);
        let set2 = emitter.emit_all(&rec, &manifest2).unwrap();
        assert_eq!(set1, set2);

        let second = std::fs::read(&set2.manifest).unwrap();
        assert_ne!(first, second, "signature should differ across issuances");
    }
}
