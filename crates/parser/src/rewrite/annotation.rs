//! Denotation-to-annotation extraction.
//!
//! `order_by(…)` and `limit(…)` denotations on a rule head become
//! parallel `@OrderBy` / `@Limit` annotation rules. The annotation's
//! record puts the annotated predicate literal at position 0, so the
//! denotation's positional arguments shift up by one.

use crate::span::Span;
use crate::syntax::{Call, ExprNode, Expression, Field, FieldValue, Literal, Record, Rule};

/// Extracts annotation rules from a rule's denotations. The rule's own
/// denotation records keep the shifted fields.
pub fn annotations_from_denotations(rule: &mut Rule) -> Vec<Rule> {
    let mut annotations = Vec::new();
    let head_name = rule.head().predicate_name().to_string();
    let full_text = rule.full_text().clone();

    if let Some(record) = &mut rule.orderby_denoted {
        shift_positional_fields(record);
        annotations.push(annotation_rule("@OrderBy", &head_name, record, &full_text));
    }
    if let Some(record) = &mut rule.limit_denoted {
        shift_positional_fields(record);
        annotations.push(annotation_rule("@Limit", &head_name, record, &full_text));
    }
    annotations
}

fn shift_positional_fields(record: &mut Record) {
    for fv in &mut record.field_values {
        if let Field::Position(idx) = &mut fv.field {
            *idx += 1;
        }
    }
}

fn annotation_rule(
    annotation: &str,
    predicate: &str,
    arguments: &Record,
    full_text: &Span,
) -> Rule {
    let mut field_values = vec![FieldValue::positional(
        0,
        Expression::new(
            ExprNode::Literal(Literal::Predicate(predicate.to_string())),
            full_text.clone(),
        ),
    )];
    field_values.extend(arguments.field_values().iter().cloned());
    Rule::new(
        Call::new(annotation, Record::new(field_values)),
        full_text.clone(),
    )
}
