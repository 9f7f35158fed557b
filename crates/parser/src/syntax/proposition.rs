//! Proposition parsing.
//!
//! Propositions are the building blocks of rule bodies: predicate
//! calls, unification, inclusion, conjunction, and disjunction.
//! Negation and propositional implication do not survive parsing as
//! their own shapes; both desugar into aggregate-and-test trees.

use super::expression::{
    build_combine, parse_call, parse_expression, parse_implication, parse_infix, Call, ExprNode,
    Expression,
};
use super::literal::Literal;
use super::record::{FieldValue, Record};
use crate::dialect::Dialect;
use crate::error::{ErrorKind, ParseError, Result};
use crate::span::Span;
use crate::split::{split, split_in_one_or_two, split_on_whitespace, strip};
use std::fmt;

/// A proposition.
#[derive(Debug, Clone)]
pub enum Proposition {
    Predicate(Call),
    Unification {
        left_hand_side: Expression,
        right_hand_side: Expression,
    },
    Inclusion {
        list: Expression,
        element: Expression,
    },
    Conjunction(Vec<Proposition>),
    Disjunction(Vec<Proposition>),
}

impl fmt::Display for Proposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Predicate(call) => write!(f, "{call}"),
            Self::Unification {
                left_hand_side,
                right_hand_side,
            } => write!(f, "{left_hand_side} == {right_hand_side}"),
            Self::Inclusion { list, element } => write!(f, "{element} in {list}"),
            Self::Conjunction(conjuncts) => {
                for (i, c) in conjuncts.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{c}")?;
                }
                Ok(())
            }
            Self::Disjunction(disjuncts) => {
                for (i, d) in disjuncts.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" | ")?;
                    }
                    write!(f, "{d}")?;
                }
                Ok(())
            }
        }
    }
}

/// Parses a proposition, trying each shape in a fixed order.
pub fn parse_proposition(s: &Span, dialect: Dialect) -> Result<Proposition> {
    if let Some(disjuncts) = parse_disjunction(s, dialect)? {
        return Ok(Proposition::Disjunction(disjuncts));
    }
    if let Some(conjuncts) = parse_conjunction(s, dialect)? {
        return Ok(Proposition::Conjunction(conjuncts));
    }
    if dialect.extended_operators() {
        if let Some(equivalence) = parse_propositional_equivalence(s, dialect)? {
            return Ok(Proposition::Conjunction(vec![equivalence]));
        }
    }
    if let Some(implication) = parse_propositional_implication(s, dialect)? {
        return Ok(implication);
    }
    if parse_implication(s, dialect)?.is_some() {
        return Err(ParseError::new(
            ErrorKind::ImplicationAsProposition,
            s.clone(),
        ));
    }
    if let Some(call) = parse_call(s, false, dialect)? {
        return Ok(Proposition::Predicate(call));
    }
    if let Some(call) = parse_infix(s, Some(&["&&", "||"]), &[], dialect)? {
        return Ok(Proposition::Predicate(call));
    }
    if let Some(unification) = parse_unification(s, dialect)? {
        return Ok(unification);
    }
    if let Some(inclusion) = parse_inclusion(s, dialect)? {
        return Ok(inclusion);
    }
    if let Some(unification) = parse_concise_combine(s, dialect)? {
        return Ok(unification);
    }
    if let Some(call) = parse_infix(s, None, &["~"], dialect)? {
        return Ok(Proposition::Predicate(call));
    }
    if let Some(negation) = parse_negation(s, dialect)? {
        return Ok(negation);
    }
    Err(ParseError::new(ErrorKind::PropositionUnparsable, s.clone()))
}

/// Parses a top-level `|` disjunction, `None` when there is a single
/// part.
pub fn parse_disjunction(s: &Span, dialect: Dialect) -> Result<Option<Vec<Proposition>>> {
    let parts = split(s, "|")?;
    if parts.len() == 1 {
        return Ok(None);
    }
    let mut disjuncts = Vec::with_capacity(parts.len());
    for part in &parts {
        disjuncts.push(parse_proposition(part, dialect)?);
    }
    Ok(Some(disjuncts))
}

/// Parses a top-level `,` conjunction. A bare proposition without a
/// top-level comma is not a conjunction here.
pub fn parse_conjunction(s: &Span, dialect: Dialect) -> Result<Option<Vec<Proposition>>> {
    let parts = split(s, ",")?;
    if parts.len() == 1 {
        return Ok(None);
    }
    let mut conjuncts = Vec::with_capacity(parts.len());
    for part in &parts {
        conjuncts.push(parse_proposition(part, dialect)?);
    }
    Ok(Some(conjuncts))
}

/// Parses a rule or combine body: always a conjunction, singletons
/// included.
pub(crate) fn parse_conjunction_body(s: &Span, dialect: Dialect) -> Result<Proposition> {
    let mut conjuncts = Vec::new();
    for part in split(s, ",")? {
        conjuncts.push(parse_proposition(&part, dialect)?);
    }
    Ok(Proposition::Conjunction(conjuncts))
}

/// Parses unification `a == b`.
pub fn parse_unification(s: &Span, dialect: Dialect) -> Result<Option<Proposition>> {
    let parts = split(s, "==")?;
    if parts.len() != 2 {
        return Ok(None);
    }
    Ok(Some(Proposition::Unification {
        left_hand_side: parse_expression(&parts[0], dialect)?,
        right_hand_side: parse_expression(&parts[1], dialect)?,
    }))
}

/// Parses inclusion `x in xs`.
pub fn parse_inclusion(s: &Span, dialect: Dialect) -> Result<Option<Proposition>> {
    let parts = split(s, " in ")?;
    if parts.len() != 2 {
        return Ok(None);
    }
    Ok(Some(Proposition::Inclusion {
        list: parse_expression(&parts[1], dialect)?,
        element: parse_expression(&parts[0], dialect)?,
    }))
}

/// Parses the concise combine `lhs Op = expr [:- body]`, equivalent to
/// `lhs == (combine Op = expr [:- body])`.
pub fn parse_concise_combine(s: &Span, dialect: Dialect) -> Result<Option<Proposition>> {
    let parts = split(s, "=")?;
    if parts.len() != 2 {
        return Ok(None);
    }
    let left_parts = split_on_whitespace(&parts[0])?;
    if left_parts.len() <= 1 {
        return Ok(None);
    }
    let operator = &left_parts[left_parts.len() - 1];
    // These arise from comparison operators split on their '='; bail so
    // the comparison parse gets its chance.
    if matches!(operator.as_str(), "!" | "<" | ">") {
        return Ok(None);
    }
    if operator.byte_at(0).is_some_and(|b| b.is_ascii_lowercase()) {
        return Ok(None);
    }
    let lhs = s.with_bounds(s.start(), left_parts[left_parts.len() - 2].stop());
    let left_expression = parse_expression(&lhs, dialect)?;

    let combine = &parts[1];
    let (first, second) = split_in_one_or_two(combine, ":-")?;
    let (value, body) = match second {
        Some(body) => (first, Some(body)),
        None => (combine.clone(), None),
    };
    let argument = parse_expression(&value, dialect)?;
    let body = match body {
        Some(body) => Some(parse_conjunction_body(&body, dialect)?),
        None => None,
    };
    let combine_tree = build_combine(operator.as_str(), argument, body, s.clone());
    Ok(Some(Proposition::Unification {
        left_hand_side: left_expression,
        right_hand_side: Expression::new(ExprNode::Combine(Box::new(combine_tree)), s.clone()),
    }))
}

/// The desugared form of a negated proposition: aggregate a constant 1
/// over the negated body and test that the result is null.
pub(crate) fn negation_tree(s: &Span, negated: Proposition) -> Proposition {
    let one = Expression::new(
        ExprNode::Literal(Literal::Number("1".to_string())),
        s.clone(),
    );
    let combine = build_combine("Min", one, Some(negated), s.clone());
    let is_null = Call::new(
        "IsNull",
        Record::new(vec![FieldValue::positional(
            0,
            Expression::new(ExprNode::Combine(Box::new(combine)), s.clone()),
        )]),
    );
    Proposition::Predicate(is_null)
}

/// Parses unary negation `~prop`. A nonempty left side or more than one
/// `~` is an error.
pub fn parse_negation(s: &Span, dialect: Dialect) -> Result<Option<Proposition>> {
    let parts = split(s, "~")?;
    if parts.len() == 1 {
        return Ok(None);
    }
    if parts.len() != 2 || !parts[0].is_empty() {
        return Err(ParseError::new(ErrorKind::NonUnaryNegation, s.clone()));
    }
    let negated = strip(&parts[1]);
    let body = parse_conjunction_body(&negated, dialect)?;
    Ok(Some(negation_tree(s, body)))
}

/// `a => b` becomes `¬(a ∧ ¬b)`.
fn implication_tree(
    s: &Span,
    consequence_span: &Span,
    condition: Proposition,
    consequence: Proposition,
) -> Proposition {
    let ensure_conjunction = |p: Proposition| match p {
        Proposition::Conjunction(_) => p,
        other => Proposition::Conjunction(vec![other]),
    };
    let mut conjuncts = match condition {
        Proposition::Conjunction(conjuncts) => conjuncts,
        other => vec![other],
    };
    conjuncts.push(negation_tree(
        consequence_span,
        ensure_conjunction(consequence),
    ));
    negation_tree(s, Proposition::Conjunction(conjuncts))
}

/// Parses propositional implication `cond => cons`.
pub fn parse_propositional_implication(
    s: &Span,
    dialect: Dialect,
) -> Result<Option<Proposition>> {
    let parts = split(s, "=>")?;
    if parts.len() != 2 {
        return Ok(None);
    }
    let condition = parse_proposition(&parts[0], dialect)?;
    let consequence = parse_proposition(&parts[1], dialect)?;
    Ok(Some(implication_tree(
        s, &parts[1], condition, consequence,
    )))
}

/// Parses propositional equivalence `a <=> b` as `(a => b), (b => a)`.
pub fn parse_propositional_equivalence(
    s: &Span,
    dialect: Dialect,
) -> Result<Option<Proposition>> {
    let parts = split(s, "<=>")?;
    if parts.len() != 2 {
        return Ok(None);
    }
    let forward = implication_tree(
        s,
        &parts[1],
        parse_proposition(&parts[0], dialect)?,
        parse_proposition(&parts[1], dialect)?,
    );
    let backward = implication_tree(
        s,
        &parts[0],
        parse_proposition(&parts[1], dialect)?,
        parse_proposition(&parts[0], dialect)?,
    );
    Ok(Some(Proposition::Conjunction(vec![forward, backward])))
}
