// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Batch orchestration — drives the wipe engine and certificate issuance
// across a device list, aggregating per-device outcomes.
//
// A failure on one device never aborts the rest of the batch: a caller who
// requested ten devices learns the outcome of all ten.  Devices are
// processed strictly in request order, one at a time — the wipe engine is a
// blocking collaborator.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::device::normalize_device_path;
use crate::service::CertificateService;
use crate::traits::WipeEngine;
use wipeseal_core::types::ArtifactSet;

/// Which step failed for a device, with the collaborator's reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BatchErrorKind {
    /// The erase passes failed; hidden areas were not touched.
    Erase(String),
    /// Erase succeeded but HPA/DCO unlock failed — the wipe is incomplete
    /// and must not be certified.
    HiddenAreaUnlock(String),
    /// The wipe completed but certificate issuance failed; the device can
    /// be re-issued without re-wiping.
    Certificate(String),
}

impl std::fmt::Display for BatchErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Erase(detail) => write!(f, "erase: {detail}"),
            Self::HiddenAreaUnlock(detail) => write!(f, "hidden-area unlock: {detail}"),
            Self::Certificate(detail) => write!(f, "certificate: {detail}"),
        }
    }
}

/// Complete outcome of one batch: every requested device appears exactly
/// once, in request order, in exactly one partition.
#[derive(Debug, Default)]
pub struct BatchResult {
    pub succeeded: Vec<(String, ArtifactSet)>,
    pub failed: Vec<(String, BatchErrorKind)>,
}

impl BatchResult {
    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }
}

/// Runs wipe + certificate issuance across a batch of devices.
pub struct BatchWipeOrchestrator<'a, E: WipeEngine> {
    engine: &'a E,
    certs: &'a CertificateService<'a>,
}

impl<'a, E: WipeEngine> BatchWipeOrchestrator<'a, E> {
    pub fn new(engine: &'a E, certs: &'a CertificateService<'a>) -> Self {
        Self { engine, certs }
    }

    /// Process every device in order: erase, unlock hidden areas, then
    /// issue the certificate.  Certificates are only issued for devices
    /// whose wipe steps both succeeded.
    #[instrument(skip_all, fields(devices = devices.len(), passes, method))]
    pub fn run(&self, devices: &[String], passes: u32, method: &str) -> BatchResult {
        let mut result = BatchResult::default();

        for device_id in devices {
            let device_path = normalize_device_path(device_id);

            if let Err(e) = self.engine.erase(&device_path, passes) {
                warn!(device_id, error = %e, "erase failed");
                result
                    .failed
                    .push((device_id.clone(), BatchErrorKind::Erase(e.to_string())));
                continue;
            }

            if let Err(e) = self.engine.unlock_hidden_areas(&device_path) {
                warn!(device_id, error = %e, "hidden-area unlock failed");
                result.failed.push((
                    device_id.clone(),
                    BatchErrorKind::HiddenAreaUnlock(e.to_string()),
                ));
                continue;
            }

            match self.certs.issue(device_id, method, Utc::now()) {
                Ok(cert) => result.succeeded.push((device_id.clone(), cert.artifacts)),
                Err(e) => {
                    warn!(device_id, error = %e, "certificate issuance failed");
                    result
                        .failed
                        .push((device_id.clone(), BatchErrorKind::Certificate(e.to_string())));
                }
            }
        }

        info!(
            succeeded = result.succeeded.len(),
            failed = result.failed.len(),
            "batch complete"
        );
        result
    }
}
