//! A compiler turning Datalog-style policy text into delta rules for
//! incremental evaluation.
//!
//! The pipeline parses policy sources into a concrete syntax tree,
//! translates the tree into a theory of rules, rewrites rule bodies so no
//! relation appears twice per body (self-join elimination), and then derives
//! one delta rule per body literal. An evaluation runtime can apply the
//! delta rules to recompute only what an update to a single relation
//! affects.
//!
//! ```
//! use deltalog::{Compiler, Source};
//!
//! let mut compiler = Compiler::compile(&[Source::text(
//!     "connected(x, y) :- link(x, y).\n\
//!      connected(x, z) :- link(x, y), connected(y, z).",
//! )]);
//! compiler.raise_if_errors()?;
//! compiler.compute_delta_rules();
//! assert_eq!(compiler.delta_rules().len(), 3);
//! # Ok::<(), deltalog::CompileError>(())
//! ```

mod compile;
mod delta;
pub mod parse;
mod selfjoin;
#[cfg(feature = "binary-cache")]
pub mod serial;
mod translate;
mod tree;
mod types;

pub use compile::{Compiler, Source};
pub use tree::{NodeKind, SyntaxNode};
pub use types::{
    Atom, CompileError, CompiledPolicy, DeltaRule, Diagnostic, Literal, Location, Rule, Term,
    Theory, Value, var,
};
