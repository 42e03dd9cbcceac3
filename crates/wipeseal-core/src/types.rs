// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Wipeseal certificate subsystem.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Outcome of a wipe operation, as recorded on the certificate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WipeStatus {
    /// All erase passes and hidden-area handling completed.
    Completed,
    /// The wipe did not complete — never certified, kept for record types.
    Failed,
}

impl WipeStatus {
    /// The exact string rendered into the canonical form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Completed => "Completed",
            Self::Failed => "Failed",
        }
    }
}

impl std::fmt::Display for WipeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The facts of one completed wipe, frozen at certificate issuance.
///
/// Immutable once constructed — the canonical encoder depends on equal
/// records always carrying identical field values, so there are no setters.
/// The timestamp is truncated to whole seconds at construction; canonical
/// encoding must not depend on sub-second precision the certificate never
/// displays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WipeRecord {
    app_label: String,
    device_id: String,
    method: String,
    timestamp: DateTime<Utc>,
    status: WipeStatus,
}

impl WipeRecord {
    pub fn new(
        app_label: impl Into<String>,
        device_id: impl Into<String>,
        method: impl Into<String>,
        timestamp: DateTime<Utc>,
        status: WipeStatus,
    ) -> Self {
        Self {
            app_label: app_label.into(),
            device_id: device_id.into(),
            method: method.into(),
            timestamp: timestamp.trunc_subsecs(0),
            status,
        }
    }

    pub fn app_label(&self) -> &str {
        &self.app_label
    }

    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn status(&self) -> WipeStatus {
        self.status
    }
}

/// The three derived renderings of one signed certificate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArtifactKind {
    /// Human-readable PDF certificate.
    Document,
    /// Scannable QR code carrying the canonical form.
    OpticalCode,
    /// JSON manifest — the sole artifact needed for re-verification.
    Manifest,
}

impl ArtifactKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Document => "document",
            Self::OpticalCode => "optical-code",
            Self::Manifest => "manifest",
        }
    }
}

impl std::fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// On-disk locations of one certificate's artifact triple.
///
/// Non-authoritative: every file here can be regenerated from the manifest
/// without re-signing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactSet {
    pub document: PathBuf,
    pub optical_code: PathBuf,
    pub manifest: PathBuf,
}

impl ArtifactSet {
    /// The paths in a fixed order, tagged by kind.
    pub fn entries(&self) -> [(ArtifactKind, &std::path::Path); 3] {
        [
            (ArtifactKind::Document, self.document.as_path()),
            (ArtifactKind::OpticalCode, self.optical_code.as_path()),
            (ArtifactKind::Manifest, self.manifest.as_path()),
        ]
    }

    /// Plain path list for API responses.
    pub fn paths(&self) -> Vec<PathBuf> {
        vec![
            self.document.clone(),
            self.optical_code.clone(),
            self.manifest.clone(),
        ]
    }
}
