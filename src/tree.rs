use std::fmt;

use crate::types::Location;

/// The closed set of concrete-syntax-tree node kinds.
///
/// Any front end feeding the compiler must produce trees over exactly this
/// set; the translator treats a kind appearing outside its expected position
/// as a [`MalformedTree`](crate::CompileError::MalformedTree) failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Root node; children are `Rule` and `Atom` statements.
    Theory,
    /// A rule; first child is the head `Atom`, the rest are body literals.
    Rule,
    /// A negated literal; single child is the `Atom` being negated.
    Not,
    /// A predicate application; first child is a `StructuredName`, the rest
    /// are term nodes.
    Atom,
    /// A namespaced predicate name; children are `Token` path segments
    /// joined by `:`.
    StructuredName,
    /// A string constant; single `Token` child holds the quoted text.
    StringObj,
    /// An integer constant; single `Token` child holds the digits.
    IntegerObj,
    /// A float constant; single `Token` child holds the literal text.
    FloatObj,
    /// A variable; single `Token` child holds the name.
    Variable,
    /// A raw text leaf under a name or term node.
    Token,
    /// End-of-input marker; a lone `Eof` root denotes an empty program.
    Eof,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            NodeKind::Theory => "THEORY",
            NodeKind::Rule => "RULE",
            NodeKind::Not => "NOT",
            NodeKind::Atom => "ATOM",
            NodeKind::StructuredName => "STRUCTURED_NAME",
            NodeKind::StringObj => "STRING_OBJ",
            NodeKind::IntegerObj => "INTEGER_OBJ",
            NodeKind::FloatObj => "FLOAT_OBJ",
            NodeKind::Variable => "VARIABLE",
            NodeKind::Token => "TOKEN",
            NodeKind::Eof => "EOF",
        };
        write!(f, "{tag}")
    }
}

/// A generic tagged syntax-tree node: a kind, the token text for leaves,
/// ordered children, and a source position for leaf-bearing nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxNode {
    pub kind: NodeKind,
    pub text: String,
    pub children: Vec<SyntaxNode>,
    pub location: Option<Location>,
}

impl SyntaxNode {
    /// An interior node with the given children.
    #[must_use]
    pub fn interior(kind: NodeKind, children: Vec<SyntaxNode>) -> Self {
        Self {
            kind,
            text: String::new(),
            children,
            location: None,
        }
    }

    /// A text-bearing leaf node.
    #[must_use]
    pub fn leaf(kind: NodeKind, text: impl Into<String>, location: Option<Location>) -> Self {
        Self {
            kind,
            text: text.into(),
            children: Vec::new(),
            location,
        }
    }

    /// A term or name node wrapping a single token leaf.
    #[must_use]
    pub fn wrap(kind: NodeKind, token: SyntaxNode) -> Self {
        Self::interior(kind, vec![token])
    }
}
