//! Rule parsing.
//!
//! A rule is `head [:- body]`. The head carries a predicate call, an
//! optional value or aggregation (`= expr` / `Op = expr`), a `distinct`
//! marker, and trailing denotations (`couldbe`, `cantbe`, `shouldbe`,
//! `limit(…)`, `order_by(…)`). Two special statement forms are handled
//! here as well: functor rules (`R := F(…)`) and function rules
//! (`H(…) --> expr`).

use super::expression::{parse_call, parse_expression, Call, ExprNode, Expression};
use super::literal::Literal;
use super::proposition::{parse_proposition, Proposition};
use super::record::{parse_record_internals, Aggregation, Field, FieldValue, Record, Value};
use crate::dialect::Dialect;
use crate::error::{ErrorKind, ParseError, Result};
use crate::span::Span;
use crate::split::{split, split_raw, strip, strip_spaces};
use crate::traverse::{Context, Status, Traverser};
use std::fmt;

/// A parsed rule.
#[derive(Debug, Clone)]
pub struct Rule {
    pub(crate) head: Call,
    pub(crate) body: Option<Proposition>,
    pub(crate) distinct_denoted: bool,
    pub(crate) couldbe_denoted: bool,
    pub(crate) cantbe_denoted: bool,
    pub(crate) shouldbe_denoted: bool,
    pub(crate) orderby_denoted: Option<Record>,
    pub(crate) limit_denoted: Option<Record>,
    pub(crate) full_text: Span,
}

impl Rule {
    /// A bare rule with the given head and no body, markers, or
    /// denotations.
    #[must_use]
    pub fn new(head: Call, full_text: Span) -> Self {
        Self {
            head,
            body: None,
            distinct_denoted: false,
            couldbe_denoted: false,
            cantbe_denoted: false,
            shouldbe_denoted: false,
            orderby_denoted: None,
            limit_denoted: None,
            full_text,
        }
    }

    #[must_use]
    #[inline]
    pub fn head(&self) -> &Call {
        &self.head
    }

    #[must_use]
    #[inline]
    pub fn body(&self) -> Option<&Proposition> {
        self.body.as_ref()
    }

    #[must_use]
    #[inline]
    pub fn distinct_denoted(&self) -> bool {
        self.distinct_denoted
    }

    #[must_use]
    #[inline]
    pub fn couldbe_denoted(&self) -> bool {
        self.couldbe_denoted
    }

    #[must_use]
    #[inline]
    pub fn cantbe_denoted(&self) -> bool {
        self.cantbe_denoted
    }

    #[must_use]
    #[inline]
    pub fn shouldbe_denoted(&self) -> bool {
        self.shouldbe_denoted
    }

    #[must_use]
    #[inline]
    pub fn orderby_denoted(&self) -> Option<&Record> {
        self.orderby_denoted.as_ref()
    }

    #[must_use]
    #[inline]
    pub fn limit_denoted(&self) -> Option<&Record> {
        self.limit_denoted.as_ref()
    }

    /// The statement text this rule was parsed from.
    #[must_use]
    #[inline]
    pub fn full_text(&self) -> &Span {
        &self.full_text
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.head)?;
        if self.distinct_denoted {
            f.write_str(" distinct")?;
        }
        if self.couldbe_denoted {
            f.write_str(" couldbe")?;
        }
        if self.cantbe_denoted {
            f.write_str(" cantbe")?;
        }
        if self.shouldbe_denoted {
            f.write_str(" shouldbe")?;
        }
        if let Some(order_by) = &self.orderby_denoted {
            write!(f, " order_by({order_by})")?;
        }
        if let Some(limit) = &self.limit_denoted {
            write!(f, " limit({limit})")?;
        }
        if let Some(body) = &self.body {
            write!(f, " :- {body}")?;
        }
        Ok(())
    }
}

/// Errors unless every head field is a plain expression; called for
/// heads of rules that are not marked distinct.
fn reject_head_aggregation(call: &Call, location: &Span) -> Result<()> {
    for fv in call.record().field_values() {
        if matches!(fv.value(), Value::Aggregation(_)) {
            return Err(ParseError::new(
                ErrorKind::AggregationWithoutDistinct,
                location.clone(),
            ));
        }
    }
    Ok(())
}

/// Parses a rule head up to and including its value: the first balanced
/// `( … )` delimits the call, the tail may carry `= expr` or
/// `Op = expr`. Returns the call and whether the value aggregation made
/// the rule distinct.
pub fn parse_head_call(
    s: &Span,
    distinct_from_outside: bool,
    dialect: Dialect,
) -> Result<(Call, bool)> {
    let mut saw_open = false;
    let mut call_end = None;
    for step in Traverser::new(s) {
        match step.status {
            Status::Ok => {}
            Status::Unmatched => {
                return Err(ParseError::new(
                    ErrorKind::UnmatchedBracket,
                    s.slice(step.idx..step.idx + 1),
                ))
            }
            Status::EolInString => {
                return Err(ParseError::new(
                    ErrorKind::EolInString,
                    s.slice(step.idx..step.idx),
                ))
            }
        }
        if step.single(Context::Paren) {
            saw_open = true;
        }
        if saw_open && step.at_top_level() {
            call_end = Some(step.idx);
            break;
        }
    }
    let Some(call_end) = call_end else {
        return Err(ParseError::new(ErrorKind::NoCallInHead, s.clone()));
    };

    let call_str = s.slice_to(call_end + 1);
    let post_call_str = s.slice_from(call_end + 1);
    let Some(mut call) = parse_call(&call_str, true, dialect)? else {
        return Err(ParseError::new(ErrorKind::HeadCallUnparsable, call_str));
    };

    let operator_expression = split(&post_call_str, "=")?;
    match operator_expression.len() {
        1 => {
            if !operator_expression[0].is_empty() {
                return Err(ParseError::new(
                    ErrorKind::UnexpectedHeadText,
                    operator_expression[0].clone(),
                ));
            }
            if !distinct_from_outside {
                reject_head_aggregation(&call, &call_str)?;
            }
            Ok((call, false))
        }
        2 => {
            let operator = &operator_expression[0];
            let expression = &operator_expression[1];
            if operator.is_empty() {
                call.record.field_values.push(FieldValue::named(
                    "logica_value",
                    parse_expression(expression, dialect)?,
                ));
                if !distinct_from_outside {
                    reject_head_aggregation(&call, &call_str)?;
                }
                return Ok((call, false));
            }
            call.record.field_values.push(FieldValue::new(
                Field::Name("logica_value".to_string()),
                Value::Aggregation(Aggregation::new(
                    operator.as_str(),
                    parse_expression(expression, dialect)?,
                    post_call_str.clone(),
                )),
            ));
            Ok((call, true))
        }
        _ => Err(ParseError::new(ErrorKind::TooManyEquals, post_call_str)),
    }
}

/// Grabs one denotation off the head tail. Flag denotations must end
/// the head; argument denotations parse their record internals.
fn grab_denotation(
    head: &Span,
    denotation: &str,
    with_arguments: bool,
    dialect: Dialect,
) -> Result<(Span, bool, Option<Record>)> {
    let parts = split(head, denotation)?;
    if parts.len() > 2 {
        return Err(ParseError::new(
            ErrorKind::TooManyDenotations {
                denotation: denotation.to_string(),
            },
            head.clone(),
        ));
    }
    if with_arguments {
        if parts.len() == 2 {
            let argument = strip(&parts[1]);
            if argument.byte_at(0) == Some(b'(') {
                return Err(ParseError::new(
                    ErrorKind::DenotationArguments {
                        denotation: denotation.to_string(),
                    },
                    head.clone(),
                ));
            }
            let record = parse_record_internals(&argument, false, false, dialect)?;
            return Ok((parts[0].clone(), true, Some(record)));
        }
        return Ok((head.clone(), false, None));
    }
    if parts.len() == 2 {
        if !strip_spaces(&parts[1]).is_empty() {
            return Err(ParseError::new(
                ErrorKind::MisplacedDenotation {
                    denotation: denotation.to_string(),
                },
                head.clone(),
            ));
        }
        return Ok((parts[0].clone(), true, None));
    }
    Ok((head.clone(), false, None))
}

/// Parses an ordinary rule `head [:- body]`.
pub fn parse_rule(s: &Span, dialect: Dialect) -> Result<Rule> {
    let parts = split(s, ":-")?;
    if parts.len() > 2 {
        return Err(ParseError::new(ErrorKind::TooManyRuleParts, s.clone()));
    }

    let head = parts[0].clone();
    let (head, couldbe, _) = grab_denotation(&head, "couldbe", false, dialect)?;
    let (head, cantbe, _) = grab_denotation(&head, "cantbe", false, dialect)?;
    let (head, shouldbe, _) = grab_denotation(&head, "shouldbe", false, dialect)?;
    let (head, _, limit) = grab_denotation(&head, "limit", true, dialect)?;
    let (head, _, order_by) = grab_denotation(&head, "order_by", true, dialect)?;

    let head_distinct = split(&head, "distinct")?;
    let (call, distinct) = match head_distinct.len() {
        1 => parse_head_call(&head, false, dialect)?,
        2 if head_distinct[1].is_empty() => {
            let (call, _) = parse_head_call(&head_distinct[0], true, dialect)?;
            (call, true)
        }
        _ => return Err(ParseError::new(ErrorKind::BadDistinct, head.clone())),
    };

    let mut rule = Rule::new(call, s.clone());
    rule.distinct_denoted = distinct;
    rule.couldbe_denoted = couldbe;
    rule.cantbe_denoted = cantbe;
    rule.shouldbe_denoted = shouldbe;
    rule.orderby_denoted = order_by;
    rule.limit_denoted = limit;
    if parts.len() == 2 {
        rule.body = Some(parse_proposition(&parts[1], dialect)?);
    }
    Ok(rule)
}

/// Parses a functor rule `R := F(A: V, …)` into its `@Make` form.
pub fn parse_functor_rule(s: &Span, dialect: Dialect) -> Result<Option<Rule>> {
    let parts = split(s, ":=")?;
    if parts.len() != 2 {
        return Ok(None);
    }
    let new_predicate = parse_expression(&parts[0], dialect)?;
    if !matches!(new_predicate.node(), ExprNode::Literal(Literal::Predicate(_))) {
        return Err(ParseError::new(ErrorKind::FunctorSyntax, parts[0].clone()));
    }
    let definition_expression = parse_expression(&parts[1], dialect)?;
    let ExprNode::Call(definition) = definition_expression.node() else {
        return Err(ParseError::new(ErrorKind::FunctorSyntax, parts[1].clone()));
    };

    let applicant = Expression::new(
        ExprNode::Literal(Literal::Predicate(definition.predicate_name().to_string())),
        parts[1].clone(),
    );
    let arguments = Expression::new(
        ExprNode::Record(definition.record().clone()),
        parts[1].clone(),
    );
    let head = Call::new(
        "@Make",
        Record::new(vec![
            FieldValue::positional(0, new_predicate),
            FieldValue::positional(1, applicant),
            FieldValue::positional(2, arguments),
        ]),
    );
    Ok(Some(Rule::new(head, s.clone())))
}

/// Parses a function rule `H(…) --> expr` into an `@CompileAsUdf(H)`
/// annotation plus the ordinary rule `H(…) = expr`.
pub fn parse_function_rule(s: &Span, dialect: Dialect) -> Result<Option<(Rule, Rule)>> {
    let parts = split_raw(s, "-->")?;
    if parts.len() != 2 {
        return Ok(None);
    }
    let Some(call) = parse_call(&parts[0], false, dialect)? else {
        return Err(ParseError::new(ErrorKind::FunctionRuleLhs, parts[0].clone()));
    };
    let annotation = parse_rule(
        &Span::synthetic(format!("@CompileAsUdf({})", call.predicate_name())),
        dialect,
    )?;
    let rule = parse_rule(
        &Span::synthetic(format!("{} = {}", parts[0].as_str(), parts[1].as_str())),
        dialect,
    )?;
    Ok(Some((annotation, rule)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(text: &str) -> Span {
        Span::synthetic(text)
    }

    fn rule(text: &str) -> Rule {
        parse_rule(&span(text), Dialect::standard()).unwrap()
    }

    #[test]
    fn plain_rule_with_body() {
        let r = rule("Q(x) :- P(x), R(x)");
        assert_eq!(r.head().predicate_name(), "Q");
        assert!(!r.distinct_denoted());
        assert!(matches!(r.body(), Some(Proposition::Conjunction(c)) if c.len() == 2));
        assert_eq!(r.full_text().as_str(), "Q(x) :- P(x), R(x)");
    }

    #[test]
    fn fact_rule_has_no_body() {
        let r = rule("Greeting(word: \"hello\")");
        assert!(r.body().is_none());
    }

    #[test]
    fn too_many_rule_parts() {
        let err = parse_rule(&span("A() :- B() :- C()"), Dialect::standard()).unwrap_err();
        assert_eq!(*err.kind(), ErrorKind::TooManyRuleParts);
    }

    #[test]
    fn head_value_becomes_logica_value_field() {
        let r = rule("F(x) = x + 1 :- P(x)");
        let fields = r.head().record().field_values();
        assert_eq!(fields.len(), 2);
        assert_eq!(*fields[1].field(), Field::Name("logica_value".to_string()));
        assert!(matches!(fields[1].value(), Value::Expression(_)));
        assert!(!r.distinct_denoted());
    }

    #[test]
    fn aggregated_head_value_implies_distinct() {
        let r = rule("Total(key:) Sum= x :- P(key:, x:)");
        assert!(r.distinct_denoted());
        let fields = r.head().record().field_values();
        let Value::Aggregation(a) = fields[1].value() else {
            panic!("expected aggregation");
        };
        assert_eq!(a.operator(), "Sum");
        assert_eq!(a.heritage().as_str(), " Sum= x");
    }

    #[test]
    fn distinct_suffix_marks_the_rule() {
        let r = rule("Q(y? Max= x) distinct :- P(x)");
        assert!(r.distinct_denoted());
    }

    #[test]
    fn aggregation_without_distinct_is_rejected() {
        let err = parse_rule(&span("Q(y? Max= x) :- P(x)"), Dialect::standard()).unwrap_err();
        assert_eq!(*err.kind(), ErrorKind::AggregationWithoutDistinct);
    }

    #[test]
    fn trailing_text_after_head_is_rejected() {
        let err = parse_rule(&span("Q(x) garbage :- P(x)"), Dialect::standard()).unwrap_err();
        assert_eq!(*err.kind(), ErrorKind::UnexpectedHeadText);
    }

    #[test]
    fn too_many_equals_in_value() {
        let err = parse_rule(&span("Q(x) = a = b"), Dialect::standard()).unwrap_err();
        assert_eq!(*err.kind(), ErrorKind::TooManyEquals);
    }

    #[test]
    fn flag_denotations_must_end_the_head() {
        let r = rule("Q(x) couldbe :- P(x)");
        assert!(r.couldbe_denoted());

        let err = parse_rule(&span("Q(x) couldbe junk"), Dialect::standard()).unwrap_err();
        assert_eq!(
            *err.kind(),
            ErrorKind::MisplacedDenotation {
                denotation: "couldbe".to_string()
            }
        );
    }

    #[test]
    fn argument_denotations_parse_their_records() {
        let r = rule("Q(x) order_by(x) limit(5) :- P(x)");
        let order_by = r.orderby_denoted().expect("order_by recorded");
        assert_eq!(order_by.field_values().len(), 1);
        let limit = r.limit_denoted().expect("limit recorded");
        assert_eq!(limit.field_values().len(), 1);
    }

    #[test]
    fn functor_rule_becomes_make() {
        let r = parse_functor_rule(&span("A := F(x: 1)"), Dialect::standard())
            .unwrap()
            .expect("functor rule");
        assert_eq!(r.head().predicate_name(), "@Make");
        let fields = r.head().record().field_values();
        assert_eq!(fields.len(), 3);
        let Value::Expression(target) = fields[0].value() else {
            panic!("expected expression");
        };
        assert!(matches!(
            target.node(),
            ExprNode::Literal(Literal::Predicate(n)) if n == "A"
        ));
    }

    #[test]
    fn functor_rule_requires_predicate_shapes() {
        let err = parse_functor_rule(&span("a := F(x: 1)"), Dialect::standard()).unwrap_err();
        assert_eq!(*err.kind(), ErrorKind::FunctorSyntax);

        let err = parse_functor_rule(&span("A := 42"), Dialect::standard()).unwrap_err();
        assert_eq!(*err.kind(), ErrorKind::FunctorSyntax);
    }

    #[test]
    fn function_rule_produces_annotation_and_rule() {
        let (annotation, r) = parse_function_rule(&span("Inc(x) --> x + 1"), Dialect::standard())
            .unwrap()
            .expect("function rule");
        assert_eq!(annotation.head().predicate_name(), "@CompileAsUdf");
        assert_eq!(r.head().predicate_name(), "Inc");
        let fields = r.head().record().field_values();
        assert_eq!(
            *fields.last().unwrap().field(),
            Field::Name("logica_value".to_string())
        );
    }

    #[test]
    fn head_without_call_is_rejected() {
        let err = parse_rule(&span("nocall"), Dialect::standard()).unwrap_err();
        assert_eq!(*err.kind(), ErrorKind::NoCallInHead);
    }
}
