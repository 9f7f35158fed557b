//! Predicate renaming across whole syntax trees.
//!
//! The import resolver rewrites predicate names wholesale: every call,
//! every predicate literal, and (for functors) every matching record
//! field name. The rename count matters; zero renames of an imported
//! name means the import is unused.

use crate::syntax::{
    Call, Combine, ExprNode, Expression, Field, FieldValue, Literal, Proposition, Record, Rule,
    Value,
};
use std::collections::BTreeSet;

/// Renames `old` to `new` everywhere in the given rules, returning how
/// many sites changed.
pub fn rename_predicate(rules: &mut [Rule], old: &str, new: &str) -> usize {
    let mut count = 0;
    for rule in rules {
        count += rename_in_rule(rule, old, new);
    }
    count
}

fn rename_in_rule(rule: &mut Rule, old: &str, new: &str) -> usize {
    let mut count = rename_in_call(&mut rule.head, old, new);
    if let Some(body) = &mut rule.body {
        count += rename_in_proposition(body, old, new);
    }
    if let Some(order_by) = &mut rule.orderby_denoted {
        count += rename_in_record(order_by, old, new);
    }
    if let Some(limit) = &mut rule.limit_denoted {
        count += rename_in_record(limit, old, new);
    }
    count
}

fn rename_in_call(call: &mut Call, old: &str, new: &str) -> usize {
    let mut count = 0;
    if call.predicate_name == old {
        call.predicate_name = new.to_string();
        count += 1;
    }
    count + rename_in_record(&mut call.record, old, new)
}

fn rename_in_record(record: &mut Record, old: &str, new: &str) -> usize {
    let mut count = 0;
    for fv in &mut record.field_values {
        count += rename_in_field_value(fv, old, new);
    }
    count
}

fn rename_in_field_value(fv: &mut FieldValue, old: &str, new: &str) -> usize {
    let mut count = 0;
    // Field names double as predicate names for functor arguments.
    if let Field::Name(name) = &mut fv.field {
        if name == old {
            *name = new.to_string();
            count += 1;
        }
    }
    match &mut fv.value {
        Value::Expression(e) => count += rename_in_expression(e, old, new),
        Value::Aggregation(a) => count += rename_in_expression(&mut a.argument, old, new),
    }
    count
}

fn rename_in_expression(expression: &mut Expression, old: &str, new: &str) -> usize {
    match &mut expression.node {
        ExprNode::Literal(literal) => rename_in_literal(literal, old, new),
        ExprNode::Variable(_) => 0,
        ExprNode::Record(record) => rename_in_record(record, old, new),
        ExprNode::Call(call) => rename_in_call(call, old, new),
        ExprNode::Subscript { record, subscript } => {
            rename_in_expression(record, old, new) + rename_in_expression(subscript, old, new)
        }
        ExprNode::Implication(implication) => {
            let mut count = 0;
            for arm in &mut implication.if_thens {
                count += rename_in_expression(&mut arm.condition, old, new);
                count += rename_in_expression(&mut arm.consequence, old, new);
            }
            count + rename_in_expression(&mut implication.otherwise, old, new)
        }
        ExprNode::Combine(combine) => rename_in_combine(combine, old, new),
    }
}

fn rename_in_literal(literal: &mut Literal, old: &str, new: &str) -> usize {
    match literal {
        Literal::Predicate(name) if name == old => {
            *name = new.to_string();
            1
        }
        Literal::List(elements) => elements
            .iter_mut()
            .map(|e| rename_in_expression(e, old, new))
            .sum(),
        _ => 0,
    }
}

fn rename_in_combine(combine: &mut Combine, old: &str, new: &str) -> usize {
    let mut count = rename_in_call(&mut combine.head, old, new);
    if let Some(body) = &mut combine.body {
        count += rename_in_proposition(body, old, new);
    }
    count
}

fn rename_in_proposition(proposition: &mut Proposition, old: &str, new: &str) -> usize {
    match proposition {
        Proposition::Predicate(call) => rename_in_call(call, old, new),
        Proposition::Unification {
            left_hand_side,
            right_hand_side,
        } => {
            rename_in_expression(left_hand_side, old, new)
                + rename_in_expression(right_hand_side, old, new)
        }
        Proposition::Inclusion { list, element } => {
            rename_in_expression(list, old, new) + rename_in_expression(element, old, new)
        }
        Proposition::Conjunction(props) | Proposition::Disjunction(props) => props
            .iter_mut()
            .map(|p| rename_in_proposition(p, old, new))
            .sum(),
    }
}

/// Names of all predicates the rules define (head predicate names).
#[must_use]
pub fn defined_predicates(rules: &[Rule]) -> BTreeSet<String> {
    rules
        .iter()
        .map(|r| r.head().predicate_name().to_string())
        .collect()
}

/// Names of predicates constructed via `@Make` rules.
#[must_use]
pub fn made_predicates(rules: &[Rule]) -> BTreeSet<String> {
    let mut result = BTreeSet::new();
    for rule in rules {
        if rule.head().predicate_name() != "@Make" {
            continue;
        }
        let Some(fv) = rule.head().record().field_values().first() else {
            continue;
        };
        let Value::Expression(e) = fv.value() else {
            continue;
        };
        if let ExprNode::Literal(Literal::Predicate(name)) = e.node() {
            result.insert(name.clone());
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::Dialect;
    use crate::span::Span;
    use crate::syntax::{parse_functor_rule, parse_rule};

    fn rule(text: &str) -> Rule {
        parse_rule(&Span::synthetic(text), Dialect::standard()).unwrap()
    }

    #[test]
    fn renames_heads_and_bodies() {
        let mut rules = vec![rule("Q(x) :- P(x), P(y) | R(x)")];
        let count = rename_predicate(&mut rules, "P", "Lib_P");
        assert_eq!(count, 2);
        assert_eq!(rename_predicate(&mut rules, "Q", "Lib_Q"), 1);
        assert_eq!(rules[0].head().predicate_name(), "Lib_Q");
    }

    #[test]
    fn renames_inside_nested_expressions() {
        let mut rules = vec![rule("Q(v: [F(x), G(y)].foo) :- z == ~P(x)")];
        assert_eq!(rename_predicate(&mut rules, "P", "M_P"), 1);
        assert_eq!(rename_predicate(&mut rules, "F", "M_F"), 1);
        // The negation desugars to IsNull; it is rename-visible too.
        assert_eq!(rename_predicate(&mut rules, "IsNull", "X"), 1);
    }

    #[test]
    fn renames_predicate_literals_and_functor_fields() {
        let functor = parse_functor_rule(
            &Span::synthetic("A := F(P: Q)"),
            Dialect::standard(),
        )
        .unwrap()
        .expect("functor rule");
        let mut rules = vec![functor];
        // Q appears as a predicate literal argument; P as a field name.
        assert_eq!(rename_predicate(&mut rules, "Q", "M_Q"), 1);
        assert_eq!(rename_predicate(&mut rules, "P", "M_P"), 1);
        assert_eq!(rename_predicate(&mut rules, "F", "M_F"), 1);
    }

    #[test]
    fn variables_are_not_renamed() {
        let mut rules = vec![rule("Q(p) :- R(p)")];
        assert_eq!(rename_predicate(&mut rules, "p", "nope"), 0);
    }

    #[test]
    fn defined_and_made_predicates() {
        let rules = vec![
            rule("Q(x) :- P(x)"),
            parse_functor_rule(&Span::synthetic("A := F(x: 1)"), Dialect::standard())
                .unwrap()
                .expect("functor rule"),
        ];
        let defined = defined_predicates(&rules);
        assert!(defined.contains("Q"));
        assert!(defined.contains("@Make"));
        let made = made_predicates(&rules);
        assert_eq!(made.len(), 1);
        assert!(made.contains("A"));
    }
}
