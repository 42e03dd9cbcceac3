// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Request/response shapes consumed by the external HTTP layer.
//
// Transport, routing, and authentication live outside this subsystem; these
// types only fix the wire shape so the adapter stays thin.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::batch::{BatchErrorKind, BatchResult};
use wipeseal_core::config::AppConfig;
use wipeseal_security::VerificationOutcome;

/// Bulk wipe request.  `passes` and `method` fall back to the configured
/// defaults when omitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkWipeRequest {
    pub devices: Vec<String>,
    #[serde(default)]
    pub passes: Option<u32>,
    #[serde(default)]
    pub method: Option<String>,
}

impl BulkWipeRequest {
    pub fn passes_or(&self, config: &AppConfig) -> u32 {
        self.passes.unwrap_or(config.wipe_passes)
    }

    pub fn method_or<'a>(&'a self, config: &'a AppConfig) -> &'a str {
        self.method.as_deref().unwrap_or(&config.wipe_method)
    }
}

/// One certified device in a bulk wipe response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WipedDevice {
    pub device_id: String,
    pub artifact_paths: Vec<PathBuf>,
}

/// One failed device in a bulk wipe response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailedDevice {
    pub device_id: String,
    pub error_kind: BatchErrorKind,
}

/// Bulk wipe response: both partitions, in request order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkWipeResponse {
    pub succeeded: Vec<WipedDevice>,
    pub failed: Vec<FailedDevice>,
}

impl From<BatchResult> for BulkWipeResponse {
    fn from(result: BatchResult) -> Self {
        Self {
            succeeded: result
                .succeeded
                .into_iter()
                .map(|(device_id, artifacts)| WipedDevice {
                    device_id,
                    artifact_paths: artifacts.paths(),
                })
                .collect(),
            failed: result
                .failed
                .into_iter()
                .map(|(device_id, error_kind)| FailedDevice {
                    device_id,
                    error_kind,
                })
                .collect(),
        }
    }
}

/// Certificate verification request: a canonical form as transported, and
/// the hex signature.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyRequest {
    pub canonical_form: String,
    pub signature_hex: String,
}

/// Verification response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyResponse {
    pub outcome: VerificationOutcome,
}
