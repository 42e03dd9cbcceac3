// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// wipeseal-security — Cryptographic core of the certificate subsystem.
//
// Canonical encoding, ECDSA P-384 key management, signing, tri-state
// verification, and the tamper-evident audit trail.  The invariant the rest
// of the workspace leans on: equal wipe records canonicalize to identical
// bytes, and only those bytes are ever signed or verified.

pub mod audit;
pub mod canonical;
pub mod keys;
pub mod signature;

pub use audit::AuditLog;
pub use canonical::{CanonicalForm, canonicalize};
pub use keys::{KeyManager, generate_key_files, load_public_key};
pub use signature::{
    CertificateManifest, Signature, Signer, VerificationOutcome, Verifier,
};
