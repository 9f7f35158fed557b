//! Disjunction elimination.
//!
//! Rule bodies are flattened into a disjunction of conjunctions; one
//! rule is emitted per conjunct list, all sharing the head and its
//! markers. After this pass every rule body is exactly one conjunction
//! with no disjunction at any depth.

use crate::syntax::{Proposition, Rule};

/// Expands every rule into its disjunctive normal form.
#[must_use]
pub fn rewrite(rules: Vec<Rule>) -> Vec<Rule> {
    let mut result = Vec::new();
    for rule in rules {
        let Some(body) = &rule.body else {
            result.push(rule);
            continue;
        };
        for conjuncts in proposition_to_dnf(body) {
            let mut new_rule = rule.clone();
            new_rule.body = Some(Proposition::Conjunction(conjuncts));
            result.push(new_rule);
        }
    }
    result
}

/// A DNF is a list of conjunct lists.
fn proposition_to_dnf(proposition: &Proposition) -> Vec<Vec<Proposition>> {
    match proposition {
        Proposition::Conjunction(conjuncts) => {
            let dnfs: Vec<_> = conjuncts.iter().map(proposition_to_dnf).collect();
            conjunction_of_dnfs(&dnfs)
        }
        Proposition::Disjunction(disjuncts) => {
            disjuncts.iter().flat_map(proposition_to_dnf).collect()
        }
        other => vec![vec![other.clone()]],
    }
}

/// Cross product of DNFs: every way to pick one conjunct list from
/// each.
fn conjunction_of_dnfs(dnfs: &[Vec<Vec<Proposition>>]) -> Vec<Vec<Proposition>> {
    match dnfs {
        [] => vec![Vec::new()],
        [single] => single.clone(),
        [first, rest @ ..] => {
            let other = conjunction_of_dnfs(rest);
            let mut result = Vec::new();
            for a in first {
                for b in &other {
                    let mut merged = a.clone();
                    merged.extend(b.iter().cloned());
                    result.push(merged);
                }
            }
            result
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::Dialect;
    use crate::span::Span;
    use crate::syntax::parse_rule;

    fn rules(text: &str) -> Vec<Rule> {
        vec![parse_rule(&Span::synthetic(text), Dialect::standard()).unwrap()]
    }

    fn contains_disjunction(p: &Proposition) -> bool {
        match p {
            Proposition::Disjunction(_) => true,
            Proposition::Conjunction(ps) => ps.iter().any(contains_disjunction),
            _ => false,
        }
    }

    #[test]
    fn disjunction_splits_into_two_rules() {
        let rewritten = rewrite(rules("Q(x) :- P(x) | R(x)"));
        assert_eq!(rewritten.len(), 2);
        for rule in &rewritten {
            assert_eq!(rule.head().predicate_name(), "Q");
            let Some(Proposition::Conjunction(conjuncts)) = rule.body() else {
                panic!("expected a conjunction body");
            };
            assert_eq!(conjuncts.len(), 1);
        }
    }

    #[test]
    fn nested_disjunction_distributes() {
        // (A | B), C  =>  {A, C} and {B, C}
        let rewritten = rewrite(rules("Q(x) :- (P(x) | R(x)), S(x)"));
        assert_eq!(rewritten.len(), 2);
        for rule in &rewritten {
            let Some(Proposition::Conjunction(conjuncts)) = rule.body() else {
                panic!("expected a conjunction body");
            };
            assert_eq!(conjuncts.len(), 2);
        }
    }

    #[test]
    fn no_disjunction_survives_at_any_depth() {
        let rewritten = rewrite(rules(
            "Q(x) :- (P(x) | R(x) | T(x)), (S(x) | U(x)), V(x)",
        ));
        assert_eq!(rewritten.len(), 6);
        for rule in &rewritten {
            assert!(!contains_disjunction(rule.body().unwrap()));
        }
    }

    #[test]
    fn bodiless_rules_pass_through() {
        let rewritten = rewrite(rules("Fact(x: 1)"));
        assert_eq!(rewritten.len(), 1);
        assert!(rewritten[0].body().is_none());
    }
}
