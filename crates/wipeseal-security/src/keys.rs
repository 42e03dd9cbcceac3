// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Key management — ECDSA P-384 signing key pair for certificate issuance.
//
// The private key lives in a PKCS#8 v1 PEM file, the public key in a SPKI
// PEM file, both loaded once at startup.  `ring` signs and verifies raw
// SEC1 points rather than ASN.1 documents, so the SPKI wrapper is stripped
// on load and re-applied on write; for P-384 the SPKI DER is always the
// fixed 23-byte header followed by the 97-byte uncompressed point.
//
// Transient key buffers are wrapped in `zeroize::Zeroizing` so the PEM/DER
// bytes are cleared when the scope ends.  Key material is never logged.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use ring::rand::SystemRandom;
use ring::signature::{
    ECDSA_P384_SHA384_ASN1, ECDSA_P384_SHA384_ASN1_SIGNING, EcdsaKeyPair, KeyPair,
    UnparsedPublicKey,
};
use rustls_pki_types::pem::PemObject;
use rustls_pki_types::{PrivateKeyDer, SubjectPublicKeyInfoDer};
use std::path::Path;
use tracing::{debug, instrument};
use zeroize::Zeroizing;

use crate::signature::Signature;
use wipeseal_core::error::{Result, WipesealError};

/// DER header of a P-384 SubjectPublicKeyInfo: SEQUENCE { AlgorithmIdentifier
/// { id-ecPublicKey, secp384r1 }, BIT STRING (zero pad) }, immediately
/// followed by the uncompressed point.
const P384_SPKI_PREFIX: [u8; 23] = [
    0x30, 0x76, 0x30, 0x10, 0x06, 0x07, 0x2a, 0x86, 0x48, 0xce, 0x3d, 0x02, 0x01, 0x06, 0x05,
    0x2b, 0x81, 0x04, 0x00, 0x22, 0x03, 0x62, 0x00,
];

/// Uncompressed SEC1 P-384 point: 0x04 || x || y.
const P384_POINT_LEN: usize = 97;

fn key_load_err(detail: impl std::fmt::Display) -> WipesealError {
    WipesealError::KeyLoad(detail.to_string())
}

/// Holds the process-wide signing key pair.
///
/// Loaded once at startup and read-only afterwards; concurrent readers need
/// no locking.  `KeyLoad` failures are fatal — without keys the process can
/// neither issue nor verify certificates.
pub struct KeyManager {
    key_pair: EcdsaKeyPair,
    /// Uncompressed SEC1 public key point, as distributed to verifiers.
    public_key: Vec<u8>,
    rng: SystemRandom,
}

impl KeyManager {
    /// Load the key pair from PEM files at the configured paths.
    ///
    /// Fails with `KeyLoad` if either file is missing, is not valid PEM, is
    /// not the expected encoding (PKCS#8 private / P-384 SPKI public), or if
    /// the two files do not belong to the same key pair.
    #[instrument(skip_all, fields(
        private = %private_path.as_ref().display(),
        public = %public_path.as_ref().display(),
    ))]
    pub fn load(private_path: impl AsRef<Path>, public_path: impl AsRef<Path>) -> Result<Self> {
        let rng = SystemRandom::new();

        let pem = Zeroizing::new(std::fs::read(private_path.as_ref()).map_err(|e| {
            key_load_err(format!(
                "cannot read {}: {e}",
                private_path.as_ref().display()
            ))
        })?);

        let der = PrivateKeyDer::from_pem_slice(&pem)
            .map_err(|e| key_load_err(format!("private key PEM: {e}")))?;
        let PrivateKeyDer::Pkcs8(pkcs8) = &der else {
            return Err(key_load_err("private key must be PKCS#8 encoded"));
        };

        let key_pair = EcdsaKeyPair::from_pkcs8(
            &ECDSA_P384_SHA384_ASN1_SIGNING,
            pkcs8.secret_pkcs8_der(),
            &rng,
        )
        .map_err(|e| key_load_err(format!("private key rejected: {e}")))?;

        let public_key = load_public_key(public_path.as_ref())?;
        if public_key != key_pair.public_key().as_ref() {
            return Err(key_load_err("public key file does not match private key"));
        }

        debug!(public_len = public_key.len(), "signing key pair loaded");
        Ok(Self {
            key_pair,
            public_key,
            rng,
        })
    }

    /// Generate a fresh in-memory P-384 key pair using the OS CSPRNG.
    ///
    /// Nothing touches disk; use [`generate_key_files`] to provision the
    /// persisted pair.
    pub fn generate() -> Result<Self> {
        let rng = SystemRandom::new();

        let pkcs8 = EcdsaKeyPair::generate_pkcs8(&ECDSA_P384_SHA384_ASN1_SIGNING, &rng)
            .map_err(|e| key_load_err(format!("key generation failed: {e}")))?;
        let pkcs8 = Zeroizing::new(pkcs8.as_ref().to_vec());

        let key_pair = EcdsaKeyPair::from_pkcs8(&ECDSA_P384_SHA384_ASN1_SIGNING, &pkcs8, &rng)
            .map_err(|e| key_load_err(format!("generated key rejected: {e}")))?;

        let public_key = key_pair.public_key().as_ref().to_vec();
        debug!(public_len = public_key.len(), "ephemeral key pair generated");
        Ok(Self {
            key_pair,
            public_key,
            rng,
        })
    }

    /// Sign `message` with the private key (ECDSA P-384 + SHA-384, ASN.1 DER
    /// signature).
    ///
    /// The scheme is randomized per call: two signatures over identical bytes
    /// differ, but both verify against the same message and public key.
    pub fn sign(&self, message: &[u8]) -> Result<Signature> {
        let sig = self
            .key_pair
            .sign(&self.rng, message)
            .map_err(|_| WipesealError::Signing("ECDSA signing failed".into()))?;
        Ok(Signature::from_bytes(sig.as_ref()))
    }

    /// Check `signature` over `message` under an arbitrary public key point.
    pub fn verify(message: &[u8], signature: &Signature, public_key: &[u8]) -> bool {
        UnparsedPublicKey::new(&ECDSA_P384_SHA384_ASN1, public_key)
            .verify(message, signature.as_bytes())
            .is_ok()
    }

    /// The uncompressed SEC1 public key point, for distribution to verifiers.
    pub fn public_key(&self) -> &[u8] {
        &self.public_key
    }
}

/// Load a P-384 public key point from a SPKI PEM file.
///
/// Shared with [`crate::signature::Verifier`], which re-verifies
/// certificates without any private key present.
pub fn load_public_key(path: impl AsRef<Path>) -> Result<Vec<u8>> {
    let pem = std::fs::read(path.as_ref()).map_err(|e| {
        key_load_err(format!("cannot read {}: {e}", path.as_ref().display()))
    })?;

    let spki = SubjectPublicKeyInfoDer::from_pem_slice(&pem)
        .map_err(|e| key_load_err(format!("public key PEM: {e}")))?;
    let der = spki.as_ref();

    if der.len() != P384_SPKI_PREFIX.len() + P384_POINT_LEN || der[..23] != P384_SPKI_PREFIX {
        return Err(key_load_err("public key is not a P-384 SPKI"));
    }

    Ok(der[P384_SPKI_PREFIX.len()..].to_vec())
}

/// Generate a fresh key pair and persist it as `private.pem` (PKCS#8) and
/// `public.pem` (SPKI) at the given paths.
///
/// The private key file is written unencrypted with owner-only permissions;
/// protecting it further is the deployment's concern.
#[instrument(skip_all, fields(
    private = %private_path.as_ref().display(),
    public = %public_path.as_ref().display(),
))]
pub fn generate_key_files(
    private_path: impl AsRef<Path>,
    public_path: impl AsRef<Path>,
) -> Result<()> {
    let rng = SystemRandom::new();

    let pkcs8 = EcdsaKeyPair::generate_pkcs8(&ECDSA_P384_SHA384_ASN1_SIGNING, &rng)
        .map_err(|e| key_load_err(format!("key generation failed: {e}")))?;
    let pkcs8 = Zeroizing::new(pkcs8.as_ref().to_vec());

    let key_pair = EcdsaKeyPair::from_pkcs8(&ECDSA_P384_SHA384_ASN1_SIGNING, &pkcs8, &rng)
        .map_err(|e| key_load_err(format!("generated key rejected: {e}")))?;

    let private_pem = Zeroizing::new(pem_encode("PRIVATE KEY", &pkcs8));

    let mut spki = Vec::with_capacity(P384_SPKI_PREFIX.len() + P384_POINT_LEN);
    spki.extend_from_slice(&P384_SPKI_PREFIX);
    spki.extend_from_slice(key_pair.public_key().as_ref());
    let public_pem = pem_encode("PUBLIC KEY", &spki);

    std::fs::write(private_path.as_ref(), private_pem.as_bytes())?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(
            private_path.as_ref(),
            std::fs::Permissions::from_mode(0o600),
        )?;
    }
    std::fs::write(public_path.as_ref(), public_pem)?;

    debug!("key pair written");
    Ok(())
}

/// Encode DER bytes as a PEM block with 64-column base64 lines.
fn pem_encode(label: &str, der: &[u8]) -> String {
    let body = BASE64.encode(der);
    let mut pem = String::with_capacity(body.len() + label.len() * 2 + 40);
    pem.push_str("-----BEGIN ");
    pem.push_str(label);
    pem.push_str("-----\n");
    for chunk in body.as_bytes().chunks(64) {
        // chunks of an ASCII string are valid UTF-8
        pem.push_str(std::str::from_utf8(chunk).expect("base64 is ASCII"));
        pem.push('\n');
    }
    pem.push_str("-----END ");
    pem.push_str(label);
    pem.push_str("-----\n");
    pem
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_sign_verify() {
        let keys = KeyManager::generate().expect("generate");
        let message = b"wipe certificate payload";

        let sig = keys.sign(message).expect("sign");
        assert!(KeyManager::verify(message, &sig, keys.public_key()));
    }

    #[test]
    fn signatures_are_randomized_but_both_verify() {
        let keys = KeyManager::generate().expect("generate");
        let message = b"same bytes twice";

        let a = keys.sign(message).expect("sign a");
        let b = keys.sign(message).expect("sign b");

        assert_ne!(a.as_bytes(), b.as_bytes(), "ECDSA must be randomized");
        assert!(KeyManager::verify(message, &a, keys.public_key()));
        assert!(KeyManager::verify(message, &b, keys.public_key()));
    }

    #[test]
    fn cross_key_verification_fails() {
        let keys_a = KeyManager::generate().expect("generate a");
        let keys_b = KeyManager::generate().expect("generate b");
        let message = b"signed under key A";

        let sig = keys_a.sign(message).expect("sign");
        assert!(!KeyManager::verify(message, &sig, keys_b.public_key()));
    }

    #[test]
    fn public_key_is_uncompressed_p384_point() {
        let keys = KeyManager::generate().expect("generate");
        assert_eq!(keys.public_key().len(), P384_POINT_LEN);
        assert_eq!(keys.public_key()[0], 0x04, "must be uncompressed point");
    }

    #[test]
    fn key_files_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let private = dir.path().join("private.pem");
        let public = dir.path().join("public.pem");

        generate_key_files(&private, &public).expect("generate files");
        let keys = KeyManager::load(&private, &public).expect("load");

        let message = b"round trip through PEM files";
        let sig = keys.sign(message).expect("sign");
        assert!(KeyManager::verify(message, &sig, keys.public_key()));

        // And the standalone public loader agrees.
        let point = load_public_key(&public).expect("load public");
        assert_eq!(point, keys.public_key());
    }

    #[test]
    fn missing_key_file_is_key_load_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let result = KeyManager::load(dir.path().join("nope.pem"), dir.path().join("nope.pub"));
        assert!(matches!(
            result,
            Err(WipesealError::KeyLoad(_))
        ));
    }

    #[test]
    fn malformed_pem_is_key_load_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let private = dir.path().join("private.pem");
        let public = dir.path().join("public.pem");
        std::fs::write(&private, "-----BEGIN GARBAGE-----\nAAAA\n-----END GARBAGE-----\n")
            .unwrap();
        std::fs::write(&public, "not pem at all").unwrap();

        assert!(matches!(
            KeyManager::load(&private, &public),
            Err(WipesealError::KeyLoad(_))
        ));
    }

    #[test]
    fn mismatched_key_files_are_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let private_a = dir.path().join("a_private.pem");
        let public_a = dir.path().join("a_public.pem");
        let private_b = dir.path().join("b_private.pem");
        let public_b = dir.path().join("b_public.pem");

        generate_key_files(&private_a, &public_a).expect("generate a");
        generate_key_files(&private_b, &public_b).expect("generate b");

        let result = KeyManager::load(&private_a, &public_b);
        assert!(matches!(result, Err(WipesealError::KeyLoad(_))));
    }

    #[test]
    fn pem_encode_wraps_at_64_columns() {
        let pem = pem_encode("PUBLIC KEY", &[0xAB; 120]);
        assert!(pem.starts_with("-----BEGIN PUBLIC KEY-----\n"));
        assert!(pem.ends_with("-----END PUBLIC KEY-----\n"));
        for line in pem.lines().filter(|l| !l.starts_with("-----")) {
            assert!(line.len() <= 64);
        }
    }
}
