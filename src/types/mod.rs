mod atom;
mod delta;
mod diagnostic;
mod error;
mod rule;
mod term;

pub use atom::{Atom, Literal};
pub use delta::{CompiledPolicy, DeltaRule};
pub use diagnostic::Diagnostic;
pub use error::CompileError;
pub use rule::{Rule, Theory};
pub use term::{Location, Term, Value, var};
