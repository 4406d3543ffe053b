//! Self-join elimination.
//!
//! Delta-rule generation assumes each body literal names a distinct
//! relation: "drop this literal, join the delta against the rest" would be
//! ambiguous about which occurrence changed if a body mentioned the same
//! `(table, arity)` twice. Renaming occurrences after the first and
//! re-deriving them through alias rules restores that assumption while the
//! original predicate stays the single source of truth.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::types::{Atom, Literal, Rule, Term, Theory};

/// The reserved naming scheme for synthesized alias predicates. A
/// user-defined predicate that happens to use this prefix can collide;
/// nothing guards against that.
fn alias_table(table: &str, arity: usize, index: usize) -> String {
    format!("___{table}_{arity}_{index}")
}

fn positional_vars(arity: usize) -> Vec<Term> {
    (0..arity).map(|i| Term::variable(format!("x{i}"))).collect()
}

/// Rewrite `theory` in place so no rule body references the same
/// `(table, arity)` pair more than once.
///
/// Literal tables are renamed in place; rules and literals are never
/// reordered. Alias rules are appended after all originals, grouped by
/// relation in first-rename order and then by index ascending, so output is
/// deterministic. Total over any well-formed theory, and idempotent: a
/// second pass finds nothing left to rename.
pub(crate) fn eliminate_self_joins(theory: &mut Theory) {
    // Highest rename index needed per relation across the whole theory,
    // with keys remembered in first-rename order.
    let mut global_max: HashMap<(String, usize), usize> = HashMap::new();
    let mut rename_order: Vec<(String, usize)> = Vec::new();

    for rule in theory.iter_mut() {
        let mut occurrences: HashMap<(String, usize), usize> = HashMap::new();
        for literal in &mut rule.body {
            let key = (literal.atom.table.clone(), literal.atom.arity());
            let seen = occurrences.entry(key.clone()).or_insert(0);
            *seen += 1;
            let prior = *seen - 1;
            if prior == 0 {
                continue;
            }
            literal.atom.table = alias_table(&key.0, key.1, prior);
            match global_max.entry(key.clone()) {
                Entry::Occupied(mut entry) => {
                    let max = entry.get_mut();
                    if prior > *max {
                        *max = prior;
                    }
                }
                Entry::Vacant(entry) => {
                    rename_order.push(key);
                    entry.insert(prior);
                }
            }
        }
    }

    // Definitions for the renamed relations: ___t_a_i(x0..) :- t(x0..).
    for key in rename_order {
        let max = global_max[&key];
        let (table, arity) = key;
        for index in 1..=max {
            let args = positional_vars(arity);
            let head = Atom::new(alias_table(&table, arity, index), args.clone());
            let body = vec![Literal::positive(Atom::new(table.clone(), args))];
            theory.push(Rule::new(head, body));
        }
    }
}
