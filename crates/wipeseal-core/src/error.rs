// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Wipeseal.

use thiserror::Error;

/// Top-level error type for all Wipeseal operations.
///
/// Verification outcomes are deliberately NOT represented here — a tampered
/// certificate is an expected, returnable result
/// (`wipeseal_security::VerificationOutcome`), never an error.
#[derive(Debug, Error)]
pub enum WipesealError {
    // -- Key material --
    /// Fatal: the process can neither issue nor verify certificates.
    #[error("key load failed: {0}")]
    KeyLoad(String),

    #[error("signing failed: {0}")]
    Signing(String),

    // -- Canonical encoding --
    #[error("canonical encoding failed: {0}")]
    Canonical(String),

    // -- Artifact emission --
    #[error("artifact write failed ({artifact}): {detail}")]
    ArtifactWrite { artifact: String, detail: String },

    // -- Storage / persistence --
    #[error("database error: {0}")]
    Database(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, WipesealError>;
