// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Signing and verification over canonical bytes.
//
// Verification is tri-state, never an error: `Invalid` is evidence of
// tampering or a wrong key, `Malformed` is evidence of client error or
// transport corruption.  Callers must not conflate the two, and no input —
// however mangled — makes verification panic or return `Err`.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::canonical::CanonicalForm;
use crate::keys::{KeyManager, load_public_key};
use wipeseal_core::error::Result;

/// An ASN.1 DER ECDSA signature over a canonical form's digest.
///
/// Not reproducible bit-for-bit across signing calls (the scheme is
/// randomized), but always verifies against the bytes it was produced from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature(Vec<u8>);

impl Signature {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Lowercase hex, the transport encoding used in manifests and API
    /// requests.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    pub fn from_hex(hex_str: &str) -> std::result::Result<Self, hex::FromHexError> {
        hex::decode(hex_str).map(Self)
    }
}

/// The minimal authoritative proof artifact: one canonical form paired with
/// its signature.  Every on-disk artifact is a rendering of this value and
/// can be regenerated from it without re-signing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateManifest {
    canonical_form: CanonicalForm,
    signature: Signature,
}

impl CertificateManifest {
    pub fn new(canonical_form: CanonicalForm, signature: Signature) -> Self {
        Self {
            canonical_form,
            signature,
        }
    }

    pub fn canonical_form(&self) -> &CanonicalForm {
        &self.canonical_form
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }
}

/// Signs canonical forms with the process signing key.
pub struct Signer<'k> {
    keys: &'k KeyManager,
}

impl<'k> Signer<'k> {
    pub fn new(keys: &'k KeyManager) -> Self {
        Self { keys }
    }

    /// Sign the exact canonical bytes, producing the manifest for one
    /// certificate.
    #[instrument(skip_all, fields(canonical_len = form.as_bytes().len()))]
    pub fn sign(&self, form: &CanonicalForm) -> Result<CertificateManifest> {
        let signature = self.keys.sign(form.as_bytes())?;
        debug!(
            fingerprint = form.fingerprint(),
            signature_len = signature.as_bytes().len(),
            "canonical form signed"
        );
        Ok(CertificateManifest::new(form.clone(), signature))
    }
}

/// Tri-state verification result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerificationOutcome {
    /// Signature matches the canonical bytes under this public key.
    Valid,
    /// Well-formed input, cryptographic mismatch — tampering or wrong key.
    Invalid,
    /// Input could not be parsed at all: corrupt hex, or not a canonical
    /// form.  Client error or transport corruption, not tampering evidence.
    Malformed,
}

impl std::fmt::Display for VerificationOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Valid => "Valid",
            Self::Invalid => "Invalid",
            Self::Malformed => "Malformed",
        };
        f.write_str(s)
    }
}

/// Re-checks certificates against a public key.
///
/// Needs no private key — third parties construct one from the distributed
/// `public.pem` alone.
pub struct Verifier {
    /// Uncompressed SEC1 P-384 point.
    public_key: Vec<u8>,
}

impl Verifier {
    pub fn new(public_key: impl Into<Vec<u8>>) -> Self {
        Self {
            public_key: public_key.into(),
        }
    }

    /// Verifier for the issuing side's own key pair.
    pub fn from_key_manager(keys: &KeyManager) -> Self {
        Self::new(keys.public_key())
    }

    /// Load the public key from a SPKI PEM file (offline verification).
    pub fn from_public_key_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        Ok(Self::new(load_public_key(path)?))
    }

    /// Verify an already-typed canonical form.  `Malformed` cannot occur
    /// here: a `CanonicalForm` is structurally valid by construction.
    pub fn verify_canonical(
        &self,
        form: &CanonicalForm,
        signature: &Signature,
    ) -> VerificationOutcome {
        if KeyManager::verify(form.as_bytes(), signature, &self.public_key) {
            VerificationOutcome::Valid
        } else {
            VerificationOutcome::Invalid
        }
    }

    /// Verify a manifest against this verifier's public key.
    pub fn verify_manifest(&self, manifest: &CertificateManifest) -> VerificationOutcome {
        self.verify_canonical(manifest.canonical_form(), manifest.signature())
    }

    /// Verify transport-encoded input: the canonical string as received and
    /// a hex signature.
    ///
    /// The received string is verified verbatim — it is never re-serialised,
    /// so any byte an attacker touched is a byte the signature check sees.
    #[instrument(skip_all, fields(data_len = data.len()))]
    pub fn verify_transport(&self, data: &str, signature_hex: &str) -> VerificationOutcome {
        let signature = match Signature::from_hex(signature_hex) {
            Ok(sig) => sig,
            Err(e) => {
                debug!(error = %e, "signature hex did not decode");
                return VerificationOutcome::Malformed;
            }
        };

        let form = match CanonicalForm::parse(data) {
            Ok(form) => form,
            Err(e) => {
                debug!(error = %e, "input is not a canonical form");
                return VerificationOutcome::Malformed;
            }
        };

        self.verify_canonical(&form, &signature)
    }
}
