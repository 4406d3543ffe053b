//! Tree-to-AST translation.
//!
//! Consumes the generic concrete syntax tree and produces the internal
//! theory. Dispatch is an exhaustive match over [`NodeKind`]; a kind
//! appearing outside its position's closed set means the front end violated
//! the tree contract and translation of that source fails outright.

use crate::tree::{NodeKind, SyntaxNode};
use crate::types::{Atom, CompileError, Literal, Rule, Term, Theory};

fn malformed(kind: NodeKind) -> CompileError {
    CompileError::MalformedTree {
        tag: kind.to_string(),
    }
}

/// Build a theory from the root of a concrete syntax tree.
///
/// A lone end-of-input marker yields an empty theory. Facts arrive as bare
/// `Atom` statements and become rules with empty bodies.
pub(crate) fn build_theory(root: &SyntaxNode) -> Result<Theory, CompileError> {
    match root.kind {
        NodeKind::Eof => Ok(Theory::new()),
        NodeKind::Theory => root.children.iter().map(build_statement).collect(),
        other => Err(malformed(other)),
    }
}

fn build_statement(node: &SyntaxNode) -> Result<Rule, CompileError> {
    match node.kind {
        NodeKind::Rule => build_rule(node),
        NodeKind::Atom => Ok(Rule::fact(build_atom(node)?)),
        other => Err(malformed(other)),
    }
}

fn build_rule(node: &SyntaxNode) -> Result<Rule, CompileError> {
    let (head_node, body_nodes) = node
        .children
        .split_first()
        .ok_or_else(|| malformed(NodeKind::Rule))?;
    if head_node.kind != NodeKind::Atom {
        return Err(malformed(head_node.kind));
    }
    let head = build_atom(head_node)?;
    let body = body_nodes
        .iter()
        .map(build_literal)
        .collect::<Result<Vec<_>, _>>()?;
    let location = head.location;
    let mut rule = Rule::new(head, body);
    rule.location = location;
    Ok(rule)
}

fn build_literal(node: &SyntaxNode) -> Result<Literal, CompileError> {
    match node.kind {
        NodeKind::Not => {
            let inner = node
                .children
                .first()
                .ok_or_else(|| malformed(NodeKind::Not))?;
            if inner.kind != NodeKind::Atom {
                return Err(malformed(inner.kind));
            }
            Ok(Literal::negative(build_atom(inner)?))
        }
        NodeKind::Atom => Ok(Literal::positive(build_atom(node)?)),
        other => Err(malformed(other)),
    }
}

fn build_atom(node: &SyntaxNode) -> Result<Atom, CompileError> {
    let (name_node, term_nodes) = node
        .children
        .split_first()
        .ok_or_else(|| malformed(NodeKind::Atom))?;
    if name_node.kind != NodeKind::StructuredName {
        return Err(malformed(name_node.kind));
    }
    let table = name_node
        .children
        .iter()
        .map(|t| t.text.as_str())
        .collect::<Vec<_>>()
        .join(":");
    let location = name_node.children.first().and_then(|t| t.location);
    let args = term_nodes
        .iter()
        .map(build_term)
        .collect::<Result<Vec<_>, _>>()?;
    let mut atom = Atom::new(table, args);
    atom.location = location;
    Ok(atom)
}

fn build_term(node: &SyntaxNode) -> Result<Term, CompileError> {
    let leaf = node
        .children
        .first()
        .ok_or_else(|| malformed(node.kind))?;
    let term = match node.kind {
        NodeKind::StringObj => {
            // The token text still carries the enclosing quotes.
            let text = &leaf.text;
            let stripped = text.get(1..text.len().saturating_sub(1)).unwrap_or("");
            Term::constant(stripped)
        }
        NodeKind::IntegerObj => {
            let value: i64 = leaf
                .text
                .parse()
                .map_err(|_| malformed(NodeKind::IntegerObj))?;
            Term::constant(value)
        }
        NodeKind::FloatObj => {
            let value: f64 = leaf
                .text
                .parse()
                .map_err(|_| malformed(NodeKind::FloatObj))?;
            Term::constant(value)
        }
        NodeKind::Variable => Term::variable(leaf.text.clone()),
        other => return Err(malformed(other)),
    };
    Ok(match leaf.location {
        Some(loc) => term.at(loc),
        None => term,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Location, Value, var};

    fn token(text: &str) -> SyntaxNode {
        SyntaxNode::leaf(NodeKind::Token, text, Some(Location::new(1, 0)))
    }

    fn name(segments: &[&str]) -> SyntaxNode {
        SyntaxNode::interior(
            NodeKind::StructuredName,
            segments.iter().map(|s| token(s)).collect(),
        )
    }

    fn atom_node(table: &[&str], terms: Vec<SyntaxNode>) -> SyntaxNode {
        let mut children = vec![name(table)];
        children.extend(terms);
        SyntaxNode::interior(NodeKind::Atom, children)
    }

    #[test]
    fn eof_yields_empty_theory() {
        let root = SyntaxNode::leaf(NodeKind::Eof, "<EOF>", None);
        assert_eq!(build_theory(&root).unwrap(), Theory::new());
    }

    #[test]
    fn unexpected_top_level_kind_is_malformed() {
        let root = SyntaxNode::wrap(NodeKind::Variable, token("x"));
        let err = build_theory(&root).unwrap_err();
        match err {
            CompileError::MalformedTree { tag } => assert_eq!(tag, "VARIABLE"),
            other => panic!("expected MalformedTree, got {other:?}"),
        }
    }

    #[test]
    fn unexpected_statement_kind_is_malformed() {
        let bad = SyntaxNode::wrap(NodeKind::StringObj, token("\"x\""));
        let root = SyntaxNode::interior(NodeKind::Theory, vec![bad]);
        let err = build_theory(&root).unwrap_err();
        assert!(matches!(
            err,
            CompileError::MalformedTree { tag } if tag == "STRING_OBJ"
        ));
    }

    #[test]
    fn fact_becomes_empty_body_rule() {
        let fact = atom_node(
            &["p"],
            vec![SyntaxNode::wrap(NodeKind::IntegerObj, token("1"))],
        );
        let root = SyntaxNode::interior(NodeKind::Theory, vec![fact]);
        let theory = build_theory(&root).unwrap();
        assert_eq!(theory.len(), 1);
        assert!(theory[0].is_fact());
        assert_eq!(theory[0].head, Atom::new("p", vec![1_i64.into()]));
    }

    #[test]
    fn rule_with_negated_literal() {
        let head = atom_node(&["p"], vec![SyntaxNode::wrap(NodeKind::Variable, token("x"))]);
        let pos = atom_node(&["q"], vec![SyntaxNode::wrap(NodeKind::Variable, token("x"))]);
        let neg = SyntaxNode::wrap(
            NodeKind::Not,
            atom_node(&["r"], vec![SyntaxNode::wrap(NodeKind::Variable, token("x"))]),
        );
        let rule = SyntaxNode::interior(NodeKind::Rule, vec![head, pos, neg]);
        let root = SyntaxNode::interior(NodeKind::Theory, vec![rule]);

        let theory = build_theory(&root).unwrap();
        assert_eq!(theory[0].to_string(), "p(x) :- q(x), not r(x)");
        assert!(!theory[0].body[0].is_negated());
        assert!(theory[0].body[1].is_negated());
    }

    #[test]
    fn structured_name_joined_with_colons() {
        let fact = atom_node(&["a", "b", "c"], vec![]);
        let root = SyntaxNode::interior(NodeKind::Theory, vec![fact]);
        let theory = build_theory(&root).unwrap();
        assert_eq!(theory[0].head.table, "a:b:c");
    }

    #[test]
    fn string_quotes_stripped() {
        let fact = atom_node(
            &["p"],
            vec![SyntaxNode::wrap(NodeKind::StringObj, token("\"hello\""))],
        );
        let root = SyntaxNode::interior(NodeKind::Theory, vec![fact]);
        let theory = build_theory(&root).unwrap();
        match &theory[0].head.args[0] {
            Term::Constant { value, .. } => assert_eq!(*value, Value::from("hello")),
            other => panic!("expected constant, got {other:?}"),
        }
    }

    #[test]
    fn term_kinds_convert() {
        let fact = atom_node(
            &["p"],
            vec![
                SyntaxNode::wrap(NodeKind::Variable, token("x")),
                SyntaxNode::wrap(NodeKind::IntegerObj, token("-7")),
                SyntaxNode::wrap(NodeKind::FloatObj, token("2.5")),
            ],
        );
        let root = SyntaxNode::interior(NodeKind::Theory, vec![fact]);
        let theory = build_theory(&root).unwrap();
        assert_eq!(
            theory[0].head.args,
            vec![var("x"), Term::constant(-7_i64), Term::constant(2.5_f64)]
        );
    }

    #[test]
    fn rule_location_comes_from_head_name() {
        let head_name = SyntaxNode::interior(
            NodeKind::StructuredName,
            vec![SyntaxNode::leaf(NodeKind::Token, "p", Some(Location::new(4, 2)))],
        );
        let head = SyntaxNode::interior(NodeKind::Atom, vec![head_name]);
        let body = atom_node(&["q"], vec![]);
        let rule = SyntaxNode::interior(NodeKind::Rule, vec![head, body]);
        let root = SyntaxNode::interior(NodeKind::Theory, vec![rule]);

        let theory = build_theory(&root).unwrap();
        assert_eq!(theory[0].location, Some(Location::new(4, 2)));
    }

    #[test]
    fn non_numeric_integer_leaf_is_malformed() {
        let fact = atom_node(
            &["p"],
            vec![SyntaxNode::wrap(NodeKind::IntegerObj, token("abc"))],
        );
        let root = SyntaxNode::interior(NodeKind::Theory, vec![fact]);
        assert!(matches!(
            build_theory(&root),
            Err(CompileError::MalformedTree { tag }) if tag == "INTEGER_OBJ"
        ));
    }
}
