use std::fmt;

/// A position in the policy source, used for diagnostics only.
///
/// Locations are carried alongside AST nodes but never participate in
/// structural equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub line: u32,
    pub col: u32,
}

impl Location {
    #[must_use]
    pub fn new(line: u32, col: u32) -> Self {
        Self { line, col }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line: {} col: {}", self.line, self.col)
    }
}

/// The fixed value carried by an object constant.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A 64-bit signed integer.
    Int(i64),
    /// A 64-bit floating-point number.
    Float(f64),
    /// A UTF-8 string.
    String(String),
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::String(v) => write!(f, "\"{v}\""),
        }
    }
}

/// An argument of an atom: an unbound logical variable scoped to its rule,
/// or an object constant with a fixed value.
///
/// Terms are immutable once constructed. Equality is structural and ignores
/// the source location: two variables are equal iff they share a name, two
/// constants iff they hold the same value of the same kind.
#[derive(Debug, Clone)]
pub enum Term {
    Variable {
        name: String,
        location: Option<Location>,
    },
    Constant {
        value: Value,
        location: Option<Location>,
    },
}

impl Term {
    #[must_use]
    pub fn variable(name: impl Into<String>) -> Self {
        Term::Variable {
            name: name.into(),
            location: None,
        }
    }

    #[must_use]
    pub fn constant(value: impl Into<Value>) -> Self {
        Term::Constant {
            value: value.into(),
            location: None,
        }
    }

    /// Attach a source location for diagnostics.
    #[must_use]
    pub fn at(mut self, loc: Location) -> Self {
        match &mut self {
            Term::Variable { location, .. } | Term::Constant { location, .. } => {
                *location = Some(loc);
            }
        }
        self
    }

    #[must_use]
    pub fn is_variable(&self) -> bool {
        matches!(self, Term::Variable { .. })
    }

    #[must_use]
    pub fn is_constant(&self) -> bool {
        matches!(self, Term::Constant { .. })
    }

    #[must_use]
    pub fn location(&self) -> Option<Location> {
        match self {
            Term::Variable { location, .. } | Term::Constant { location, .. } => *location,
        }
    }
}

impl PartialEq for Term {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Term::Variable { name: a, .. }, Term::Variable { name: b, .. }) => a == b,
            (Term::Constant { value: a, .. }, Term::Constant { value: b, .. }) => a == b,
            _ => false,
        }
    }
}

impl From<i64> for Term {
    fn from(v: i64) -> Self {
        Term::constant(v)
    }
}

impl From<f64> for Term {
    fn from(v: f64) -> Self {
        Term::constant(v)
    }
}

impl From<&str> for Term {
    fn from(v: &str) -> Self {
        Term::constant(v)
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Variable { name, .. } => write!(f, "{name}"),
            Term::Constant { value, .. } => write!(f, "{value}"),
        }
    }
}

/// Shorthand for building a variable term, mirroring how atoms are written
/// in source: `Atom::new("p", vec![var("x"), 17.into()])`.
#[must_use]
pub fn var(name: &str) -> Term {
    Term::variable(name)
}
