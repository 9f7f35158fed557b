//! Aggregation-to-call normalization.
//!
//! After DNF and multi-body processing, the concise aggregation slots
//! are no longer needed: every `{ operator, argument }` becomes a plain
//! expression calling the aggregating predicate. The operator map keeps
//! `+` and `++` apart from their scalar namesakes.

use crate::syntax::{
    Call, Combine, ExprNode, Expression, FieldValue, Implication, Literal, Proposition, Record,
    Rule, Value,
};

/// Converts every aggregation slot in the rules into a call expression.
pub fn rewrite(rules: &mut [Rule]) {
    for rule in rules {
        rewrite_rule(rule);
    }
}

/// Aggregating predicate name for a raw operator.
#[must_use]
pub fn operator_name(raw: &str) -> String {
    match raw {
        "+" => "Agg+".to_string(),
        "++" => "Agg++".to_string(),
        "*" => "`*`".to_string(),
        other => other.to_string(),
    }
}

fn rewrite_rule(rule: &mut Rule) {
    rewrite_call(&mut rule.head);
    if let Some(body) = &mut rule.body {
        rewrite_proposition(body);
    }
    if let Some(order_by) = &mut rule.orderby_denoted {
        rewrite_record(order_by);
    }
    if let Some(limit) = &mut rule.limit_denoted {
        rewrite_record(limit);
    }
}

fn rewrite_call(call: &mut Call) {
    rewrite_record(&mut call.record);
}

fn rewrite_record(record: &mut Record) {
    for fv in &mut record.field_values {
        rewrite_field_value(fv);
    }
}

fn rewrite_field_value(fv: &mut FieldValue) {
    let converted = match &fv.value {
        Value::Aggregation(a) => {
            let call = Call::new(
                operator_name(&a.operator),
                Record::new(vec![FieldValue::positional(0, a.argument.clone())]),
            );
            Some(Expression::new(ExprNode::Call(call), a.heritage.clone()))
        }
        Value::Expression(_) => None,
    };
    if let Some(expression) = converted {
        fv.value = Value::Expression(expression);
    }
    // Recurse into the (possibly freshly converted) expression, so
    // aggregations nested in combine heads convert too.
    if let Value::Expression(e) = &mut fv.value {
        rewrite_expression(e);
    }
}

fn rewrite_expression(expression: &mut Expression) {
    match &mut expression.node {
        ExprNode::Literal(Literal::List(elements)) => {
            elements.iter_mut().for_each(rewrite_expression);
        }
        ExprNode::Literal(_) | ExprNode::Variable(_) => {}
        ExprNode::Record(record) => rewrite_record(record),
        ExprNode::Call(call) => rewrite_call(call),
        ExprNode::Subscript { record, subscript } => {
            rewrite_expression(record);
            rewrite_expression(subscript);
        }
        ExprNode::Implication(implication) => rewrite_implication(implication),
        ExprNode::Combine(combine) => rewrite_combine(combine),
    }
}

fn rewrite_implication(implication: &mut Implication) {
    for arm in &mut implication.if_thens {
        rewrite_expression(&mut arm.condition);
        rewrite_expression(&mut arm.consequence);
    }
    rewrite_expression(&mut implication.otherwise);
}

fn rewrite_combine(combine: &mut Combine) {
    rewrite_call(&mut combine.head);
    if let Some(body) = &mut combine.body {
        rewrite_proposition(body);
    }
}

fn rewrite_proposition(proposition: &mut Proposition) {
    match proposition {
        Proposition::Predicate(call) => rewrite_call(call),
        Proposition::Unification {
            left_hand_side,
            right_hand_side,
        } => {
            rewrite_expression(left_hand_side);
            rewrite_expression(right_hand_side);
        }
        Proposition::Inclusion { list, element } => {
            rewrite_expression(list);
            rewrite_expression(element);
        }
        Proposition::Conjunction(props) | Proposition::Disjunction(props) => {
            props.iter_mut().for_each(rewrite_proposition);
        }
    }
}
