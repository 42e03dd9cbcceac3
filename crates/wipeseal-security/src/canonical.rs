// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Canonical encoding — the deterministic byte form of a wipe record.
//
// This is the load-bearing invariant of the whole subsystem: the canonical
// form is the only thing ever signed or verified, so two encodings of equal
// records must be byte-identical.  Determinism comes from three fixed
// choices: compact JSON (no separators beyond `,` and `:`), keys in
// lexicographic order, and RFC 3339 timestamps truncated to whole seconds
// in UTC with a `Z` suffix.

use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;

use wipeseal_core::error::Result;
use wipeseal_core::types::WipeRecord;

/// Wire layout of the canonical form.
///
/// serde_json serialises struct fields in declaration order, so declaration
/// order here IS the byte order on the wire.  Keep it lexicographic.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
struct CanonicalFields {
    app: String,
    device_id: String,
    method: String,
    status: String,
    timestamp: String,
}

/// A deterministic, signable byte encoding of one [`WipeRecord`].
///
/// Holds the exact transport string — never re-serialised after
/// construction, because verification runs over these bytes verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalForm(String);

impl CanonicalForm {
    /// Validate that `input` has the structure of a canonical form and wrap
    /// it without altering a single byte.
    ///
    /// Returns the serde error when the input is not a JSON object with
    /// exactly the canonical field set.  Field *values* are not judged here:
    /// a structurally sound form with a forged status must reach signature
    /// verification and fail there as `Invalid`, not short-circuit as
    /// `Malformed`.
    pub fn parse(input: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str::<CanonicalFields>(input)?;
        Ok(Self(input.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Lowercase hex SHA-256 of the canonical bytes.
    ///
    /// A human-comparable handle for a certificate — printed on the PDF and
    /// recorded in the audit trail so operators can match artifacts without
    /// decoding signatures.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.0.as_bytes());
        hex::encode(hasher.finalize())
    }
}

impl std::fmt::Display for CanonicalForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Encode `record` into its canonical form.
///
/// Infallible for any well-typed record in practice; the `Result` covers the
/// structurally-impossible serialisation failure without panicking.
pub fn canonicalize(record: &WipeRecord) -> Result<CanonicalForm> {
    let fields = CanonicalFields {
        app: record.app_label().to_owned(),
        device_id: record.device_id().to_owned(),
        method: record.method().to_owned(),
        status: record.status().as_str().to_owned(),
        timestamp: record
            .timestamp()
            .to_rfc3339_opts(SecondsFormat::Secs, true),
    };

    let json = serde_json::to_string(&fields)
        .map_err(|e| wipeseal_core::error::WipesealError::Canonical(e.to_string()))?;
    debug!(
        device_id = record.device_id(),
        canonical_len = json.len(),
        "record canonicalized"
    );
    Ok(CanonicalForm(json))
}
