//! Binary serialization and deserialization of compiled policies.
//!
//! Provides a stable binary format for persisting [`CompiledPolicy`] values,
//! so a host can compile once and reload the artifact without re-running the
//! pipeline. The format is a 32-byte fixed header followed by a
//! bincode-encoded payload.
//!
//! ## Wire Format
//!
//! ```text
//! Offset  Size  Field
//! 0       4     Magic bytes: b"DLOG"
//! 4       2     Format version (u16, little-endian)
//! 6       2     Engine version (u16, little-endian)
//! 8       4     Flags (u32, reserved)
//! 12      4     Payload length in bytes (u32, little-endian)
//! 16      16    BLAKE3 hash of the payload (truncated to 16 bytes)
//! 32..    var   Bincode-encoded payload
//! ```
//!
//! ## Versioning
//!
//! The format version in the header must match exactly; a mismatch fails
//! immediately with [`DeserializeError::IncompatibleVersion`]. The engine
//! version is informational only.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{Atom, CompiledPolicy, DeltaRule, Literal, Rule, Term, Value};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const MAGIC: &[u8; 4] = b"DLOG";
const FORMAT_VERSION: u16 = 1;
const ENGINE_VERSION: u16 = 1;
const HEADER_SIZE: usize = 32;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur when serializing a [`CompiledPolicy`] to bytes.
#[derive(Debug, Error)]
pub enum SerializeError {
    #[error("failed to encode policy: {0}")]
    Encode(#[from] bincode::error::EncodeError),

    #[error("I/O error during serialization: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur when deserializing a [`CompiledPolicy`] from bytes.
#[derive(Debug, Error)]
pub enum DeserializeError {
    #[error("not a deltalog binary: invalid magic bytes")]
    BadMagic,

    #[error("incompatible format version: blob is v{blob}, engine supports v{supported}")]
    IncompatibleVersion { blob: u16, supported: u16 },

    #[error("integrity check failed: BLAKE3 checksum mismatch")]
    ChecksumMismatch,

    #[error("payload length mismatch: expected {expected} bytes, got {actual}")]
    LengthMismatch { expected: u32, actual: usize },

    #[error("failed to decode payload: {0}")]
    Decode(#[from] bincode::error::DecodeError),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("I/O error during deserialization: {0}")]
    Io(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Serialized type hierarchy
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize)]
struct SerializedPolicy {
    metadata: PolicyMetadata,
    rules: Vec<SerializedRule>,
    delta_rules: Vec<SerializedDeltaRule>,
}

#[derive(Debug, Serialize, Deserialize)]
struct PolicyMetadata {
    rule_count: usize,
    delta_rule_count: usize,
    source_digest: Option<[u8; 32]>,
}

#[derive(Debug, Serialize, Deserialize)]
struct SerializedRule {
    head: SerializedAtom,
    body: Vec<SerializedLiteral>,
}

#[derive(Debug, Serialize, Deserialize)]
struct SerializedDeltaRule {
    trigger: SerializedLiteral,
    head: SerializedAtom,
    body: Vec<SerializedLiteral>,
    origin: usize,
}

#[derive(Debug, Serialize, Deserialize)]
struct SerializedLiteral {
    atom: SerializedAtom,
    negated: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct SerializedAtom {
    table: String,
    args: Vec<SerializedTerm>,
}

#[derive(Debug, Serialize, Deserialize)]
enum SerializedTerm {
    Var(String),
    Int(i64),
    Float(f64),
    Str(String),
}

// ---------------------------------------------------------------------------
// AST conversion
// ---------------------------------------------------------------------------

fn serialize_term(term: &Term) -> SerializedTerm {
    match term {
        Term::Variable { name, .. } => SerializedTerm::Var(name.clone()),
        Term::Constant { value, .. } => match value {
            Value::Int(v) => SerializedTerm::Int(*v),
            Value::Float(v) => SerializedTerm::Float(*v),
            Value::String(v) => SerializedTerm::Str(v.clone()),
        },
    }
}

fn deserialize_term(term: SerializedTerm) -> Term {
    match term {
        SerializedTerm::Var(name) => Term::variable(name),
        SerializedTerm::Int(v) => Term::constant(v),
        SerializedTerm::Float(v) => Term::constant(v),
        SerializedTerm::Str(v) => Term::constant(v.as_str()),
    }
}

fn serialize_atom(atom: &Atom) -> SerializedAtom {
    SerializedAtom {
        table: atom.table.clone(),
        args: atom.args.iter().map(serialize_term).collect(),
    }
}

fn deserialize_atom(atom: SerializedAtom) -> Atom {
    Atom::new(
        atom.table,
        atom.args.into_iter().map(deserialize_term).collect(),
    )
}

fn serialize_literal(literal: &Literal) -> SerializedLiteral {
    SerializedLiteral {
        atom: serialize_atom(&literal.atom),
        negated: literal.negated,
    }
}

fn deserialize_literal(literal: SerializedLiteral) -> Literal {
    Literal {
        atom: deserialize_atom(literal.atom),
        negated: literal.negated,
    }
}

fn policy_to_serialized(policy: &CompiledPolicy, source_text: Option<&str>) -> SerializedPolicy {
    let source_digest = source_text.map(|s| *blake3::hash(s.as_bytes()).as_bytes());

    let rules: Vec<SerializedRule> = policy
        .theory
        .iter()
        .map(|rule| SerializedRule {
            head: serialize_atom(&rule.head),
            body: rule.body.iter().map(serialize_literal).collect(),
        })
        .collect();

    let delta_rules: Vec<SerializedDeltaRule> = policy
        .delta_rules
        .iter()
        .map(|delta| SerializedDeltaRule {
            trigger: serialize_literal(&delta.trigger),
            head: serialize_atom(&delta.head),
            body: delta.body.iter().map(serialize_literal).collect(),
            origin: delta.origin,
        })
        .collect();

    SerializedPolicy {
        metadata: PolicyMetadata {
            rule_count: rules.len(),
            delta_rule_count: delta_rules.len(),
            source_digest,
        },
        rules,
        delta_rules,
    }
}

fn serialized_to_policy(ser: SerializedPolicy) -> Result<CompiledPolicy, DeserializeError> {
    validate(&ser)?;

    let theory = ser
        .rules
        .into_iter()
        .map(|rule| {
            Rule::new(
                deserialize_atom(rule.head),
                rule.body.into_iter().map(deserialize_literal).collect(),
            )
        })
        .collect();

    let delta_rules = ser
        .delta_rules
        .into_iter()
        .map(|delta| DeltaRule {
            trigger: deserialize_literal(delta.trigger),
            head: deserialize_atom(delta.head),
            body: delta.body.into_iter().map(deserialize_literal).collect(),
            origin: delta.origin,
        })
        .collect();

    Ok(CompiledPolicy {
        theory,
        delta_rules,
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(ser: &SerializedPolicy) -> Result<(), DeserializeError> {
    let rule_count = ser.rules.len();

    if ser.metadata.rule_count != rule_count {
        return Err(DeserializeError::Validation(format!(
            "metadata says {} rules but payload has {}",
            ser.metadata.rule_count, rule_count
        )));
    }
    if ser.metadata.delta_rule_count != ser.delta_rules.len() {
        return Err(DeserializeError::Validation(format!(
            "metadata says {} delta rules but payload has {}",
            ser.metadata.delta_rule_count,
            ser.delta_rules.len()
        )));
    }

    // Delta-rule count must match the body lengths of the non-fact rules.
    let expected: usize = ser.rules.iter().map(|r| r.body.len()).sum();
    if ser.delta_rules.len() != expected {
        return Err(DeserializeError::Validation(format!(
            "theory body literals total {expected} but payload has {} delta rules",
            ser.delta_rules.len()
        )));
    }

    for delta in &ser.delta_rules {
        if delta.origin >= rule_count {
            return Err(DeserializeError::Validation(format!(
                "delta rule origin {} out of bounds (only {rule_count} rules exist)",
                delta.origin
            )));
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Header I/O
// ---------------------------------------------------------------------------

/// Decoded view of the fixed-size header.
struct Header {
    format_version: u16,
    payload_len: u32,
    payload_hash: [u8; 16],
}

#[allow(clippy::cast_possible_truncation)] // compiled policies stay far below 4 GiB
fn header_bytes(payload: &[u8]) -> [u8; HEADER_SIZE] {
    let digest = blake3::hash(payload);
    let mut header = [0u8; HEADER_SIZE];
    header[0..4].copy_from_slice(MAGIC);
    header[4..6].copy_from_slice(&FORMAT_VERSION.to_le_bytes());
    header[6..8].copy_from_slice(&ENGINE_VERSION.to_le_bytes());
    // bytes 8..12 stay zeroed: the reserved flag word
    header[12..16].copy_from_slice(&(payload.len() as u32).to_le_bytes());
    header[16..32].copy_from_slice(&digest.as_bytes()[..16]);
    header
}

#[allow(clippy::cast_possible_truncation)]
fn read_header(bytes: &[u8]) -> Result<Header, DeserializeError> {
    let Some(raw) = bytes.get(..HEADER_SIZE) else {
        return Err(DeserializeError::LengthMismatch {
            expected: HEADER_SIZE as u32,
            actual: bytes.len(),
        });
    };
    if &raw[0..4] != MAGIC {
        return Err(DeserializeError::BadMagic);
    }

    let mut payload_hash = [0u8; 16];
    payload_hash.copy_from_slice(&raw[16..32]);
    Ok(Header {
        format_version: u16::from_le_bytes([raw[4], raw[5]]),
        // raw[6..8] is the engine version and raw[8..12] the flag word;
        // neither participates in compatibility checks yet.
        payload_len: u32::from_le_bytes([raw[12], raw[13], raw[14], raw[15]]),
        payload_hash,
    })
}

// ---------------------------------------------------------------------------
// Public encode/decode
// ---------------------------------------------------------------------------

pub(crate) fn encode(
    policy: &CompiledPolicy,
    source_text: Option<&str>,
) -> Result<Vec<u8>, SerializeError> {
    let serialized = policy_to_serialized(policy, source_text);
    let payload = bincode::serde::encode_to_vec(&serialized, bincode::config::standard())?;

    let mut buf = Vec::with_capacity(HEADER_SIZE + payload.len());
    buf.extend_from_slice(&header_bytes(&payload));
    buf.extend_from_slice(&payload);
    Ok(buf)
}

pub(crate) fn decode(bytes: &[u8]) -> Result<CompiledPolicy, DeserializeError> {
    let header = read_header(bytes)?;

    if header.format_version != FORMAT_VERSION {
        return Err(DeserializeError::IncompatibleVersion {
            blob: header.format_version,
            supported: FORMAT_VERSION,
        });
    }

    let payload = bytes[HEADER_SIZE..]
        .get(..header.payload_len as usize)
        .ok_or(DeserializeError::LengthMismatch {
            expected: header.payload_len,
            actual: bytes.len() - HEADER_SIZE,
        })?;

    if blake3::hash(payload).as_bytes()[..16] != header.payload_hash {
        return Err(DeserializeError::ChecksumMismatch);
    }

    let (serialized, _): (SerializedPolicy, usize) =
        bincode::serde::decode_from_slice(payload, bincode::config::standard())?;

    serialized_to_policy(serialized)
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
