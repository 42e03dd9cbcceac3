// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Manifest file — the `{ "data", "signature" }` JSON pair that is the sole
// artifact required to re-run verification.

use serde::{Deserialize, Serialize};
use std::path::Path;

use wipeseal_core::error::Result;
use wipeseal_security::CertificateManifest;

/// On-disk manifest layout.
///
/// `data` is the canonical form verbatim; `signature` is hex.  Readers feed
/// both straight into `Verifier::verify_transport`, which is also why the
/// canonical string is embedded as a JSON *string* rather than a nested
/// object — re-parsing must not get a chance to reorder its keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestFile {
    pub data: String,
    pub signature: String,
}

impl ManifestFile {
    pub fn from_manifest(manifest: &CertificateManifest) -> Self {
        Self {
            data: manifest.canonical_form().as_str().to_owned(),
            signature: manifest.signature().to_hex(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Read and parse a manifest file (offline verification entry point).
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}
