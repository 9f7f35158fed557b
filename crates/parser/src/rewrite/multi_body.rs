//! Multi-body aggregation.
//!
//! A distinct predicate defined by several rules aggregates over the
//! union of its bodies. Each body becomes an auxiliary
//! `P_MultBodyAggAux` rule with aggregations replaced by their
//! arguments, and a single synthesized rule re-aggregates over the
//! auxiliary predicate. Head signatures must agree across the bodies,
//! heritage aside.

use crate::error::{ErrorKind, ParseError, Result};
use crate::span::Span;
use crate::syntax::{
    Aggregation, Call, ExprNode, Expression, Field, FieldValue, Proposition, Record, Rule, Value,
    Variable,
};
use std::collections::HashMap;

/// Suffix of the auxiliary per-body predicate.
pub const AUX_SUFFIX: &str = "_MultBodyAggAux";

/// Rewrites multi-body distinct predicates through auxiliary rules.
pub fn rewrite(rules: Vec<Rule>) -> Result<Vec<Rule>> {
    let mut names_in_order: Vec<String> = Vec::new();
    let mut rule_count: HashMap<String, usize> = HashMap::new();
    let mut first_is_distinct: HashMap<String, bool> = HashMap::new();
    for rule in &rules {
        let name = rule.head().predicate_name().to_string();
        if !rule_count.contains_key(&name) {
            names_in_order.push(name.clone());
            first_is_distinct.insert(name.clone(), rule.distinct_denoted());
        }
        *rule_count.entry(name).or_insert(0) += 1;
    }
    let multi_body: Vec<String> = names_in_order
        .into_iter()
        .filter(|name| {
            rule_count.get(name).copied().unwrap_or(0) > 1
                && first_is_distinct.get(name).copied().unwrap_or(false)
        })
        .collect();

    let mut new_rules = Vec::with_capacity(rules.len());
    let mut signature_by_name: HashMap<String, Vec<FieldValue>> = HashMap::new();
    let mut signature_text_by_name: HashMap<String, String> = HashMap::new();
    let mut full_text_by_name: HashMap<String, Span> = HashMap::new();

    for rule in rules {
        let name = rule.head().predicate_name().to_string();
        full_text_by_name.insert(name.clone(), rule.full_text().clone());
        if !multi_body.contains(&name) {
            new_rules.push(rule);
            continue;
        }
        let full_text = rule.full_text().clone();
        let (signature, aux_rule) = split_aggregation(rule)?;
        let observed = signature_text(&signature);
        match signature_text_by_name.get(&name) {
            Some(expected) if *expected != observed => {
                return Err(ParseError::new(
                    ErrorKind::MultiBodySignature {
                        predicate: name.clone(),
                    },
                    full_text,
                ));
            }
            Some(_) => {}
            None => {
                signature_by_name.insert(name.clone(), signature);
                signature_text_by_name.insert(name.clone(), observed);
            }
        }
        new_rules.push(aux_rule);
    }

    for name in &multi_body {
        let Some(signature) = signature_by_name.remove(name) else {
            continue;
        };
        let Some(full_text) = full_text_by_name.remove(name) else {
            continue;
        };
        let pass_fields: Vec<FieldValue> = signature
            .iter()
            .map(|fv| {
                FieldValue::new(
                    fv.field().clone(),
                    Value::Expression(field_variable(fv.field(), &full_text)),
                )
            })
            .collect();
        let aux_call = Call::new(
            format!("{name}{AUX_SUFFIX}"),
            Record::new(pass_fields),
        );
        let mut aggregating_rule = Rule::new(
            Call::new(name.clone(), Record::new(signature)),
            full_text,
        );
        aggregating_rule.body = Some(Proposition::Conjunction(vec![Proposition::Predicate(
            aux_call,
        )]));
        aggregating_rule.distinct_denoted = true;
        new_rules.push(aggregating_rule);
    }

    Ok(new_rules)
}

/// Replaces the aggregations of one body rule with their arguments,
/// renaming the head onto the auxiliary predicate. Returns the
/// signature (the aggregating head of the synthesized rule) and the
/// transformed body rule.
fn split_aggregation(mut rule: Rule) -> Result<(Vec<FieldValue>, Rule)> {
    if !rule.distinct_denoted {
        return Err(ParseError::new(
            ErrorKind::DistinctInconsistency {
                predicate: rule.head().predicate_name().to_string(),
            },
            rule.full_text().clone(),
        ));
    }
    rule.distinct_denoted = false;
    let full_text = rule.full_text().clone();
    rule.head.predicate_name = format!("{}{AUX_SUFFIX}", rule.head.predicate_name);

    let mut transformation = Vec::new();
    let mut signature = Vec::new();
    for fv in std::mem::take(&mut rule.head.record.field_values) {
        match fv.value {
            Value::Aggregation(aggregation) => {
                signature.push(FieldValue::new(
                    fv.field.clone(),
                    Value::Aggregation(Aggregation::new(
                        aggregation.operator.clone(),
                        field_variable(&fv.field, &full_text),
                        aggregation.heritage.clone(),
                    )),
                ));
                transformation.push(FieldValue::new(
                    fv.field,
                    Value::Expression(aggregation.argument),
                ));
            }
            Value::Expression(_) => {
                signature.push(FieldValue::new(
                    fv.field.clone(),
                    Value::Expression(field_variable(&fv.field, &full_text)),
                ));
                transformation.push(fv);
            }
        }
    }
    rule.head.record.field_values = transformation;
    Ok((signature, rule))
}

/// The variable named after a head field, used to pass values between
/// the auxiliary and the aggregating rule.
fn field_variable(field: &Field, heritage: &Span) -> Expression {
    Expression::new(
        ExprNode::Variable(Variable::new(field.to_string())),
        heritage.clone(),
    )
}

/// Canonical rendering of a signature; `Display` excludes heritage, so
/// equal texts mean equal signatures modulo heritage.
fn signature_text(signature: &[FieldValue]) -> String {
    signature
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
