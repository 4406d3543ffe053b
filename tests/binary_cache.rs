#![cfg(feature = "binary-cache")]

use deltalog::serial::DeserializeError;
use deltalog::{CompiledPolicy, Compiler, Source};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const POLICY: &str = "connected(x, y) :- link(x, y).\n\
                      connected(x, z) :- link(x, y), connected(y, z).\n\
                      error(x) :- host(x), not trusted(x).\n\
                      mutual(x) :- peer(x, y), peer(y, x).\n\
                      link(\"a\", \"b\").\n\
                      threshold(0.75).";

fn compiled_policy() -> CompiledPolicy {
    let mut compiler = Compiler::compile(&[Source::text(POLICY)]);
    assert!(compiler.errors().is_empty(), "{:?}", compiler.errors());
    compiler.compute_delta_rules();
    compiler.into_policy()
}

// ---------------------------------------------------------------------------
// Round-trips
// ---------------------------------------------------------------------------

#[test]
fn round_trip() {
    let original = compiled_policy();
    let bytes = original.to_bytes(None).unwrap();
    let restored = CompiledPolicy::from_bytes(&bytes).unwrap();
    assert_eq!(restored, original);
}

#[test]
fn round_trip_with_source_digest() {
    let original = compiled_policy();
    let bytes = original.to_bytes(Some(POLICY)).unwrap();
    let restored = CompiledPolicy::from_bytes(&bytes).unwrap();
    assert_eq!(restored, original);
}

#[test]
fn empty_policy_round_trip() {
    let original = CompiledPolicy {
        theory: Vec::new(),
        delta_rules: Vec::new(),
    };
    let bytes = original.to_bytes(None).unwrap();
    let restored = CompiledPolicy::from_bytes(&bytes).unwrap();
    assert_eq!(restored, original);
}

#[test]
fn file_round_trip() {
    let dir = std::env::temp_dir().join("deltalog_test_binary_cache");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("policy.dlbin");

    let original = compiled_policy();
    original.to_binary_file(&path, Some(POLICY)).unwrap();
    let restored = CompiledPolicy::from_binary_file(&path).unwrap();
    assert_eq!(restored, original);

    let _ = std::fs::remove_dir_all(&dir);
}

// ---------------------------------------------------------------------------
// Corruption and compatibility
// ---------------------------------------------------------------------------

#[test]
fn corruption_byte_flip() {
    let bytes = compiled_policy().to_bytes(None).unwrap();
    let mut corrupted = bytes.clone();
    let last = corrupted.len() - 1;
    corrupted[last] ^= 0xFF;

    let err = CompiledPolicy::from_bytes(&corrupted).unwrap_err();
    assert!(
        matches!(err, DeserializeError::ChecksumMismatch),
        "expected ChecksumMismatch, got: {err}"
    );
}

#[test]
fn corruption_truncation() {
    let bytes = compiled_policy().to_bytes(None).unwrap();
    let truncated = &bytes[..33];

    let err = CompiledPolicy::from_bytes(truncated).unwrap_err();
    assert!(
        matches!(err, DeserializeError::LengthMismatch { .. }),
        "expected LengthMismatch, got: {err}"
    );
}

#[test]
fn bad_magic() {
    let bytes = compiled_policy().to_bytes(None).unwrap();
    let mut bad = bytes.clone();
    bad[0..4].copy_from_slice(b"BAAD");

    let err = CompiledPolicy::from_bytes(&bad).unwrap_err();
    assert!(
        matches!(err, DeserializeError::BadMagic),
        "expected BadMagic, got: {err}"
    );
}

#[test]
fn version_mismatch() {
    let bytes = compiled_policy().to_bytes(None).unwrap();
    let mut bad = bytes.clone();
    bad[4] = 99;
    bad[5] = 0;

    let err = CompiledPolicy::from_bytes(&bad).unwrap_err();
    assert!(
        matches!(
            err,
            DeserializeError::IncompatibleVersion {
                blob: 99,
                supported: 1
            }
        ),
        "expected IncompatibleVersion, got: {err}"
    );
}

#[test]
fn empty_input_rejected() {
    let err = CompiledPolicy::from_bytes(&[]).unwrap_err();
    assert!(
        matches!(err, DeserializeError::LengthMismatch { .. }),
        "expected LengthMismatch, got: {err}"
    );
}

// ---------------------------------------------------------------------------
// Determinism
// ---------------------------------------------------------------------------

#[test]
fn encoding_determinism() {
    let policy = compiled_policy();
    let bytes1 = policy.to_bytes(Some(POLICY)).unwrap();
    let bytes2 = policy.to_bytes(Some(POLICY)).unwrap();
    assert_eq!(bytes1, bytes2);
}

// ---------------------------------------------------------------------------
// Large theory round-trip
// ---------------------------------------------------------------------------

#[test]
fn large_theory_round_trip() {
    let mut text = String::new();
    for i in 0..200 {
        text.push_str(&format!("t{i}(x) :- t{}(x), seen(x), seen(x).\n", i + 1));
    }
    let mut compiler = Compiler::compile(&[Source::text(&text)]);
    assert!(compiler.errors().is_empty());
    compiler.compute_delta_rules();
    let original = compiler.into_policy();

    let bytes = original.to_bytes(None).unwrap();
    let restored = CompiledPolicy::from_bytes(&bytes).unwrap();
    assert_eq!(restored, original);
}
