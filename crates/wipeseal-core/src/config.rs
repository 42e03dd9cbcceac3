// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Settings for the certificate subsystem.
///
/// Constructed once at startup and passed by reference into each component's
/// constructor — nothing re-reads configuration after initialisation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Issuer label embedded in every certificate's canonical form.
    pub app_label: String,
    /// Path to the PKCS#8 PEM private signing key.
    pub private_key_path: PathBuf,
    /// Path to the SPKI PEM public key distributed to verifiers.
    pub public_key_path: PathBuf,
    /// Directory certificate artifacts are written into.
    pub artifact_dir: PathBuf,
    /// Path to the SQLite audit trail database.
    pub audit_db_path: PathBuf,
    /// Default number of overwrite passes for a wipe request.
    pub wipe_passes: u32,
    /// Default wipe method label recorded on certificates.
    pub wipe_method: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app_label: "Wipeseal".into(),
            private_key_path: "keys/private.pem".into(),
            public_key_path: "keys/public.pem".into(),
            artifact_dir: "certs".into(),
            audit_db_path: "wipeseal_audit.db".into(),
            wipe_passes: 3,
            wipe_method: "DoD 3-Pass".into(),
        }
    }
}
