use std::fmt;

use super::atom::{Atom, Literal};
use super::rule::Theory;

/// One incremental-update rule, derived from a source rule by singling out
/// one body literal as the trigger.
///
/// When the trigger's relation receives an update, new derivations of `head`
/// are computed by joining the trigger's delta against the current values of
/// the remaining `body` literals (relative order preserved). `origin` is the
/// index of the source rule in the compiled theory and exists for
/// diagnostics and provenance only; it plays no part in matching.
#[derive(Debug, Clone, PartialEq)]
pub struct DeltaRule {
    pub trigger: Literal,
    pub head: Atom,
    pub body: Vec<Literal>,
    pub origin: usize,
}

impl fmt::Display for DeltaRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "delta[{}] {} :- ", self.trigger, self.head)?;
        for (i, lit) in self.body.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{lit}")?;
        }
        Ok(())
    }
}

/// The finished compilation artifact: the self-join-free theory together
/// with its delta rules, ready to hand to an evaluation runtime.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledPolicy {
    pub theory: Theory,
    pub delta_rules: Vec<DeltaRule>,
}

impl fmt::Display for CompiledPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "CompiledPolicy({} rules, {} delta rules)",
            self.theory.len(),
            self.delta_rules.len()
        )
    }
}

#[cfg(feature = "binary-cache")]
impl CompiledPolicy {
    /// Serialize this compiled policy to a byte vector.
    ///
    /// The optional `source_text` is hashed (BLAKE3) and embedded in the
    /// payload metadata. Callers can use this to detect when the original
    /// policy text has changed and the cache should be rebuilt.
    ///
    /// # Errors
    ///
    /// Returns [`SerializeError`](crate::serial::SerializeError) if encoding fails.
    pub fn to_bytes(
        &self,
        source_text: Option<&str>,
    ) -> Result<Vec<u8>, crate::serial::SerializeError> {
        crate::serial::encode(self, source_text)
    }

    /// Deserialize a compiled policy from a byte slice previously
    /// produced by [`to_bytes`](Self::to_bytes).
    ///
    /// # Errors
    ///
    /// Returns [`DeserializeError`](crate::serial::DeserializeError) on
    /// format, integrity, or validation failure.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, crate::serial::DeserializeError> {
        crate::serial::decode(bytes)
    }

    /// Serialize this compiled policy and write it to a file.
    ///
    /// # Errors
    ///
    /// Returns [`SerializeError`](crate::serial::SerializeError) on
    /// encoding or I/O failure.
    pub fn to_binary_file(
        &self,
        path: impl AsRef<std::path::Path>,
        source_text: Option<&str>,
    ) -> Result<(), crate::serial::SerializeError> {
        let bytes = self.to_bytes(source_text)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Read a file and deserialize the compiled policy it contains.
    ///
    /// # Errors
    ///
    /// Returns [`DeserializeError`](crate::serial::DeserializeError) on
    /// I/O, format, integrity, or validation failure.
    pub fn from_binary_file(
        path: impl AsRef<std::path::Path>,
    ) -> Result<Self, crate::serial::DeserializeError> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes)
    }
}
