//! Delta-rule generation.
//!
//! The standard decomposition for incremental evaluation: when a relation
//! receives an update, only the rules whose body mentions it need
//! re-evaluation, and only the join of that relation's delta against the
//! current values of the remaining literals. Never the delta of more than
//! one literal at a time, which would double-count combined updates.

use crate::types::{DeltaRule, Theory};

/// For each non-fact rule and each body literal, emit one delta rule pairing
/// that literal as the trigger with the remainder of the body.
///
/// Requires a self-join-free theory: removing a literal by body position
/// then removes exactly one occurrence of its relation, so "the remaining
/// literals" is unambiguous. Output is grouped by rule in theory order and
/// within a rule by body position ascending; the evaluation runtime relies
/// on that order for deterministic update batching.
pub(crate) fn compute_delta_rules(theory: &Theory) -> Vec<DeltaRule> {
    let mut delta_rules = Vec::new();
    for (origin, rule) in theory.iter().enumerate() {
        for (position, trigger) in rule.body.iter().enumerate() {
            let body = rule
                .body
                .iter()
                .enumerate()
                .filter(|&(i, _)| i != position)
                .map(|(_, lit)| lit.clone())
                .collect();
            delta_rules.push(DeltaRule {
                trigger: trigger.clone(),
                head: rule.head.clone(),
                body,
                origin,
            });
        }
    }
    delta_rules
}
