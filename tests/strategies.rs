use deltalog::{Atom, Literal, Rule, Term, Theory, var};
use proptest::prelude::*;

// --- Fixed vocabulary ---
// Table names and variable names are drawn from small pools so generated
// theories contain self-joins and shared relations often enough to exercise
// the interesting paths.

const TABLES: &[&str] = &["p", "q", "r", "s", "link", "host", "trusted"];
const VARS: &[&str] = &["x", "y", "z", "w"];

fn arb_variable() -> impl Strategy<Value = Term> {
    prop::sample::select(VARS).prop_map(var)
}

/// Generate a term whose `Display` output re-parses to an equal term.
/// Floats always carry a nonzero fractional digit so they print with a
/// decimal point and come back as floats, not integers.
pub fn arb_term() -> impl Strategy<Value = Term> {
    prop_oneof![
        3 => arb_variable(),
        1 => (-1000_i64..1000).prop_map(Term::from),
        1 => (0_i64..100, 1_u32..=9, prop::bool::ANY).prop_map(|(whole, frac, neg)| {
            let magnitude = whole as f64 + f64::from(frac) / 10.0;
            Term::from(if neg { -magnitude } else { magnitude })
        }),
        1 => "[a-z][a-z ]{0,7}".prop_map(|s| Term::from(s.as_str())),
    ]
}

pub fn arb_atom() -> impl Strategy<Value = Atom> {
    (
        prop::sample::select(TABLES),
        prop::collection::vec(arb_term(), 0..=3),
    )
        .prop_map(|(table, args)| Atom::new(table, args))
}

pub fn arb_literal() -> impl Strategy<Value = Literal> {
    (arb_atom(), prop::bool::ANY).prop_map(|(atom, negated)| {
        if negated {
            Literal::negative(atom)
        } else {
            Literal::positive(atom)
        }
    })
}

fn arb_rule() -> impl Strategy<Value = Rule> {
    (
        (
            prop::sample::select(TABLES),
            prop::collection::vec(arb_variable(), 0..=3),
        ),
        prop::collection::vec(arb_literal(), 0..=4),
    )
        .prop_map(|((table, args), body)| Rule::new(Atom::new(table, args), body))
}

/// A generated theory together with its policy-text rendering.
#[derive(Debug, Clone)]
pub struct GenTheory {
    pub rules: Theory,
}

impl GenTheory {
    /// Render as policy source text, one statement per line.
    #[must_use]
    pub fn text(&self) -> String {
        let mut text = String::new();
        for rule in &self.rules {
            text.push_str(&rule.to_string());
            text.push_str(".\n");
        }
        text
    }
}

pub fn arb_theory() -> impl Strategy<Value = GenTheory> {
    prop::collection::vec(arb_rule(), 1..=6).prop_map(|rules| GenTheory { rules })
}

/// Theories guaranteed to contain at least one self-join.
pub fn arb_self_join_theory() -> impl Strategy<Value = GenTheory> {
    (
        arb_theory(),
        arb_atom(),
        prop::collection::vec(arb_variable(), 1..=2),
        2_usize..=4,
    )
        .prop_map(|(mut gen, joined, head_args, copies)| {
            let body = (0..copies)
                .map(|_| Literal::positive(joined.clone()))
                .collect();
            gen.rules.push(Rule::new(Atom::new("p", head_args), body));
            gen
        })
}
