use std::fmt;

use super::term::{Location, Term};

/// A predicate application, e.g. `p(x, 17)`.
///
/// The table name is a colon-joined namespaced path (`nova:virtual_machine`).
/// Argument order is positional parameter binding; the `(table, arity)` pair
/// is the identity used for matching across the whole theory.
#[derive(Debug, Clone)]
pub struct Atom {
    pub table: String,
    pub args: Vec<Term>,
    pub location: Option<Location>,
}

impl Atom {
    #[must_use]
    pub fn new(table: impl Into<String>, args: Vec<Term>) -> Self {
        Self {
            table: table.into(),
            args,
            location: None,
        }
    }

    /// Attach a source location for diagnostics.
    #[must_use]
    pub fn at(mut self, loc: Location) -> Self {
        self.location = Some(loc);
        self
    }

    #[must_use]
    pub fn arity(&self) -> usize {
        self.args.len()
    }

    /// The `(table, arity)` identity of the relation this atom references.
    #[must_use]
    pub fn key(&self) -> (&str, usize) {
        (self.table.as_str(), self.args.len())
    }
}

impl PartialEq for Atom {
    fn eq(&self, other: &Self) -> bool {
        self.table == other.table && self.args == other.args
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.table)?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{arg}")?;
        }
        write!(f, ")")
    }
}

/// An atom together with its polarity.
///
/// The compiler never evaluates negation; the flag is propagated unchanged
/// for the evaluation runtime to interpret.
#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    pub atom: Atom,
    pub negated: bool,
}

impl Literal {
    #[must_use]
    pub fn positive(atom: Atom) -> Self {
        Self {
            atom,
            negated: false,
        }
    }

    #[must_use]
    pub fn negative(atom: Atom) -> Self {
        Self {
            atom,
            negated: true,
        }
    }

    #[must_use]
    pub fn is_negated(&self) -> bool {
        self.negated
    }

    #[must_use]
    pub fn key(&self) -> (&str, usize) {
        self.atom.key()
    }
}

impl From<Atom> for Literal {
    fn from(atom: Atom) -> Self {
        Literal::positive(atom)
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negated {
            write!(f, "not {}", self.atom)
        } else {
            write!(f, "{}", self.atom)
        }
    }
}
