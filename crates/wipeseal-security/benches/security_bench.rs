// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for canonical encoding, signing, and verification in
// the wipeseal-security crate.

use chrono::{TimeZone, Utc};
use criterion::{Criterion, black_box, criterion_group, criterion_main};

use wipeseal_core::types::{WipeRecord, WipeStatus};
use wipeseal_security::{KeyManager, Signer, VerificationOutcome, Verifier, canonicalize};

fn record() -> WipeRecord {
    WipeRecord::new(
        "Wipeseal",
        "sda1",
        "DoD 3-Pass",
        Utc.with_ymd_and_hms(2023, 10, 1, 12, 0, 0).unwrap(),
        WipeStatus::Completed,
    )
}

/// Benchmark canonical encoding alone — the hot path of every issuance and
/// verification.
fn bench_canonicalize(c: &mut Criterion) {
    let rec = record();

    c.bench_function("canonicalize", |b| {
        b.iter(|| {
            let form = canonicalize(black_box(&rec)).expect("canonicalize failed");
            black_box(form);
        });
    });
}

/// Benchmark a full sign-then-verify round trip.
///
/// This exercises the randomized ECDSA P-384 signing path and the
/// corresponding public-key verification.
fn bench_sign_verify_roundtrip(c: &mut Criterion) {
    let keys = KeyManager::generate().expect("key generation failed");
    let form = canonicalize(&record()).expect("canonicalize failed");
    let verifier = Verifier::from_key_manager(&keys);

    c.bench_function("sign_verify_roundtrip", |b| {
        b.iter(|| {
            let manifest = Signer::new(&keys).sign(black_box(&form)).expect("sign failed");
            let outcome = verifier.verify_manifest(&manifest);
            assert_eq!(outcome, VerificationOutcome::Valid);
            black_box(manifest);
        });
    });
}

/// Benchmark transport-level verification, including hex decode and
/// canonical-form structure validation.
fn bench_verify_transport(c: &mut Criterion) {
    let keys = KeyManager::generate().expect("key generation failed");
    let form = canonicalize(&record()).expect("canonicalize failed");
    let manifest = Signer::new(&keys).sign(&form).expect("sign failed");
    let verifier = Verifier::from_key_manager(&keys);
    let data = manifest.canonical_form().as_str().to_owned();
    let sig_hex = manifest.signature().to_hex();

    c.bench_function("verify_transport", |b| {
        b.iter(|| {
            let outcome = verifier.verify_transport(black_box(&data), black_box(&sig_hex));
            assert_eq!(outcome, VerificationOutcome::Valid);
        });
    });
}

criterion_group!(
    benches,
    bench_canonicalize,
    bench_sign_verify_roundtrip,
    bench_verify_transport,
);
criterion_main!(benches);
