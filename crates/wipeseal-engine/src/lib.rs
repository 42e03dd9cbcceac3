// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// wipeseal-engine — Orchestration over the injected wipe engine: one-device
// certificate issuance and batch processing with per-device outcomes.

pub mod api;
pub mod batch;
pub mod device;
pub mod service;
pub mod traits;

pub use batch::{BatchErrorKind, BatchResult, BatchWipeOrchestrator};
pub use service::{CertificateService, IssuedCertificate};
pub use traits::{WipeEngine, WipeError};
