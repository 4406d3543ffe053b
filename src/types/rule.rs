use std::fmt;

use super::atom::{Atom, Literal};
use super::term::Location;

/// A rule, e.g. `p(x) :- q(x), not r(x)`. A rule with an empty body is a
/// fact, asserting its head unconditionally.
///
/// Rules own their head and body exclusively; no AST substructure is shared
/// across rules, which is what lets self-join elimination rename literal
/// tables in place.
#[derive(Debug, Clone)]
pub struct Rule {
    pub head: Atom,
    pub body: Vec<Literal>,
    pub location: Option<Location>,
}

impl Rule {
    #[must_use]
    pub fn new(head: Atom, body: Vec<Literal>) -> Self {
        Self {
            head,
            body,
            location: None,
        }
    }

    /// A fact: a rule with an empty body.
    #[must_use]
    pub fn fact(head: Atom) -> Self {
        Self::new(head, Vec::new())
    }

    /// Attach a source location for diagnostics.
    #[must_use]
    pub fn at(mut self, loc: Location) -> Self {
        self.location = Some(loc);
        self
    }

    #[must_use]
    pub fn is_fact(&self) -> bool {
        self.body.is_empty()
    }
}

impl PartialEq for Rule {
    fn eq(&self, other: &Self) -> bool {
        self.head == other.head && self.body == other.body
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_fact() {
            return write!(f, "{}", self.head);
        }
        write!(f, "{} :- ", self.head)?;
        for (i, lit) in self.body.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{lit}")?;
        }
        Ok(())
    }
}

/// The full ordered sequence of rules being compiled. Facts are rules with
/// empty bodies. Self-join elimination mutates the sequence in place:
/// existing order is preserved and alias rules are appended at the end.
pub type Theory = Vec<Rule>;
