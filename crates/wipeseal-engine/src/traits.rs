// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Wipe-engine boundary — the injected capability that performs the actual
// erasure.
//
// The erasure implementation lives outside this subsystem (native tooling,
// hdparm, vendor SDKs).  Orchestration only sees these two operations, which
// keeps the batch logic testable with a scripted double and keeps platform
// quirks out of certificate issuance.

use thiserror::Error;

/// Failure from the external wipe collaborator.
///
/// Converted into a per-device entry in the batch result — never aborts the
/// rest of a batch.
#[derive(Debug, Error)]
pub enum WipeError {
    #[error("device not found: {0}")]
    DeviceNotFound(String),

    #[error("device busy: {0}")]
    DeviceBusy(String),

    #[error("erase command failed: {0}")]
    CommandFailed(String),

    #[error("hidden-area handling not supported on this platform")]
    Unsupported,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Capability contract for the device-erasure engine.
///
/// Both operations block until the device operation completes or fails;
/// timeouts, if any, belong to the implementation's contract.  There is no
/// cancellation mid-wipe.  Implementations that support concurrent operation
/// must still expect at most one in-flight call per device path.
pub trait WipeEngine {
    /// Overwrite the device with `passes` erase passes.
    fn erase(&self, device_path: &str, passes: u32) -> Result<(), WipeError>;

    /// Unlock and erase HPA/DCO hidden regions, so the erase covers the
    /// device's full addressable space.
    fn unlock_hidden_areas(&self, device_path: &str) -> Result<(), WipeError>;
}
