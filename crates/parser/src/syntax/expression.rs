//! Expression parsing.
//!
//! Expressions cover literals, variables, records, calls, infix
//! algebra, `if … then … else`, the three `combine` forms, subscripts,
//! and array subscripts. Productions are tried in a fixed order; the
//! first match wins and attaches the full original span as heritage.

use super::literal::{parse_literal, parse_variable, Literal, Variable};
use super::proposition::{
    parse_conjunction_body, parse_negation, parse_propositional_implication, Proposition,
};
use super::record::{
    parse_record, parse_record_internals, Aggregation, Field, FieldValue, Record, Value,
};
use crate::dialect::Dialect;
use crate::error::{ErrorKind, ParseError, Result};
use crate::span::Span;
use crate::split::{split, split_in_one_or_two, split_in_two, split_raw, strip};
use crate::traverse::{is_whole, Context, Status, Traverser};
use std::fmt;

/// The standard infix operator table, loosest binding first.
const INFIX_OPERATORS: &[&str] = &[
    "||", "&&", "->", "==", "<=", ">=", "<", ">", "!=", "=", "~", " in ", " is not ", " is ",
    "++?", "++", "+", "-", "*", "/", "%", "^", "!",
];

/// Operators that act as unary when nothing stands to their left.
const UNARY_OPERATORS: &[&str] = &["-", "!"];

/// An expression node together with the source text it came from.
#[derive(Debug, Clone)]
pub struct Expression {
    pub(crate) node: ExprNode,
    pub(crate) heritage: Span,
}

impl Expression {
    #[must_use]
    pub fn new(node: ExprNode, heritage: Span) -> Self {
        Self { node, heritage }
    }

    #[must_use]
    #[inline]
    pub fn node(&self) -> &ExprNode {
        &self.node
    }

    /// The original source substring this expression was built from.
    #[must_use]
    #[inline]
    pub fn heritage(&self) -> &Span {
        &self.heritage
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.node)
    }
}

/// The shapes an expression can take.
#[derive(Debug, Clone)]
pub enum ExprNode {
    Literal(Literal),
    Variable(Variable),
    Record(Record),
    Call(Call),
    Subscript {
        record: Box<Expression>,
        subscript: Box<Expression>,
    },
    Implication(Implication),
    Combine(Box<Combine>),
}

impl fmt::Display for ExprNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(literal) => write!(f, "{literal}"),
            Self::Variable(variable) => write!(f, "{variable}"),
            Self::Record(record) => write!(f, "{{{record}}}"),
            Self::Call(call) => write!(f, "{call}"),
            Self::Subscript { record, subscript } => write!(f, "{record}.{subscript}"),
            Self::Implication(implication) => write!(f, "{implication}"),
            Self::Combine(combine) => write!(f, "{combine}"),
        }
    }
}

/// A predicate call: name plus argument record.
#[derive(Debug, Clone)]
pub struct Call {
    pub(crate) predicate_name: String,
    pub(crate) record: Record,
}

impl Call {
    #[must_use]
    pub fn new(predicate_name: impl Into<String>, record: Record) -> Self {
        Self {
            predicate_name: predicate_name.into(),
            record,
        }
    }

    #[must_use]
    #[inline]
    pub fn predicate_name(&self) -> &str {
        &self.predicate_name
    }

    #[must_use]
    #[inline]
    pub fn record(&self) -> &Record {
        &self.record
    }
}

impl fmt::Display for Call {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.predicate_name, self.record)
    }
}

/// One `if cond then cons` arm of an implication.
#[derive(Debug, Clone)]
pub struct IfThen {
    pub(crate) condition: Expression,
    pub(crate) consequence: Expression,
}

impl IfThen {
    #[must_use]
    #[inline]
    pub fn condition(&self) -> &Expression {
        &self.condition
    }

    #[must_use]
    #[inline]
    pub fn consequence(&self) -> &Expression {
        &self.consequence
    }
}

/// `if … then … [else if … then …]* else …`.
#[derive(Debug, Clone)]
pub struct Implication {
    pub(crate) if_thens: Vec<IfThen>,
    pub(crate) otherwise: Box<Expression>,
}

impl Implication {
    #[must_use]
    #[inline]
    pub fn if_thens(&self) -> &[IfThen] {
        &self.if_thens
    }

    #[must_use]
    #[inline]
    pub fn otherwise(&self) -> &Expression {
        &self.otherwise
    }
}

impl fmt::Display for Implication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, arm) in self.if_thens.iter().enumerate() {
            let keyword = if i == 0 { "if" } else { " else if" };
            write!(f, "{keyword} {} then {}", arm.condition, arm.consequence)?;
        }
        write!(f, " else {}", self.otherwise)
    }
}

/// A `combine` expression: an implicitly distinct aggregating head with
/// an optional body.
#[derive(Debug, Clone)]
pub struct Combine {
    pub(crate) head: Call,
    pub(crate) body: Option<Proposition>,
    pub(crate) full_text: Span,
}

impl Combine {
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
    pub fn full_text(&self) -> &Span {
        &self.full_text
    }
}

impl fmt::Display for Combine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "combine {}", self.head.record())?;
        if let Some(body) = &self.body {
            write!(f, " :- {body}")?;
        }
        Ok(())
    }
}

/// Parses an expression, attaching the span as heritage.
pub fn parse_expression(s: &Span, dialect: Dialect) -> Result<Expression> {
    let node = actually_parse_expression(s, dialect)?;
    Ok(Expression::new(node, s.clone()))
}

fn actually_parse_expression(s: &Span, dialect: Dialect) -> Result<ExprNode> {
    if let Some(combine) = parse_combine(s, dialect)? {
        return Ok(ExprNode::Combine(Box::new(combine)));
    }
    if let Some(implication) = parse_implication(s, dialect)? {
        return Ok(ExprNode::Implication(implication));
    }
    if let Some(literal) = parse_literal(s, dialect)? {
        return Ok(ExprNode::Literal(literal));
    }
    if let Some(variable) = parse_variable(s)? {
        return Ok(ExprNode::Variable(variable));
    }
    if let Some(record) = parse_record(s, dialect)? {
        return Ok(ExprNode::Record(record));
    }
    if let Some(Proposition::Predicate(call)) = parse_propositional_implication(s, dialect)? {
        return Ok(ExprNode::Call(call));
    }
    if let Some(call) = parse_call(s, false, dialect)? {
        return Ok(ExprNode::Call(call));
    }
    if let Some(combine) = parse_ultra_concise_combine(s, dialect)? {
        return Ok(ExprNode::Combine(Box::new(combine)));
    }
    if let Some(call) = parse_infix(s, None, &["~"], dialect)? {
        return Ok(ExprNode::Call(call));
    }
    if let Some(subscript) = parse_subscript(s, dialect)? {
        return Ok(subscript);
    }
    if let Some(call) = parse_negation_expression(s, dialect)? {
        return Ok(ExprNode::Call(call));
    }
    if let Some(call) = parse_array_subscript(s, dialect)? {
        return Ok(ExprNode::Call(call));
    }
    Err(ParseError::new(ErrorKind::ExpressionUnparsable, s.clone()))
}

/// Characters allowed in a call's predicate position.
fn is_predicate_char(byte: u8, dialect: Dialect) -> bool {
    if byte.is_ascii_alphanumeric() || b"@_.${}+-`".contains(&byte) {
        return true;
    }
    dialect.extended_operators() && b"*^%/".contains(&byte)
}

/// Finds `prefix(interior)`-shaped spans for an arbitrary bracket pair:
/// the predicate text before the first top-level opener, and the whole
/// interior. Handles the `->` prefix, `!`, `++?`, and backticked names.
pub(crate) fn parse_generic_call(
    s: &Span,
    opening: u8,
    closing: u8,
    dialect: Dialect,
) -> Result<Option<(String, Span)>> {
    let s = strip(s);
    if s.is_empty() {
        return Ok(None);
    }

    let mut predicate;
    let idx;
    if s.starts_with("->") {
        idx = 2;
        predicate = "->".to_string();
    } else {
        let Some(open_context) = Context::opener(opening) else {
            return Ok(None);
        };
        let mut found = None;
        for step in Traverser::new(&s) {
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
            if step.single(open_context) {
                found = Some(step.idx);
                break;
            }
            // A prefix may pass through a single `{ … }` or a backticked
            // name, but nothing else.
            if !step.at_top_level()
                && !step.single(Context::Brace)
                && step.stack.first() != Some(&Context::Backtick)
            {
                return Ok(None);
            }
        }
        let Some(found) = found else {
            return Ok(None);
        };
        idx = found;

        let prefix = s.slice_to(idx);
        let all_good = prefix.bytes().iter().all(|b| is_predicate_char(*b, dialect));
        let backticked = idx >= 2
            && s.byte_at(0) == Some(b'`')
            && s.byte_at(idx - 1) == Some(b'`');
        if !((idx > 0 && all_good)
            || prefix.as_str() == "!"
            || prefix.as_str() == "++?"
            || backticked)
        {
            return Ok(None);
        }
        predicate = prefix.as_str().to_string();
    }

    let interior = s.slice(idx + 1..s.len().saturating_sub(1));
    if s.byte_at(idx) == Some(opening)
        && s.byte_at(s.len() - 1) == Some(closing)
        && is_whole(&interior)
    {
        if predicate == "`=`" {
            predicate = "=".to_string();
        }
        if predicate == "`~`" {
            predicate = "~".to_string();
        }
        return Ok(Some((predicate, interior)));
    }
    Ok(None)
}

/// Parses a predicate call `P(args)`.
pub fn parse_call(s: &Span, aggregation_allowed: bool, dialect: Dialect) -> Result<Option<Call>> {
    let Some((predicate, interior)) = parse_generic_call(s, b'(', b')', dialect)? else {
        return Ok(None);
    };
    let record = parse_record_internals(&interior, false, aggregation_allowed, dialect)?;
    Ok(Some(Call::new(predicate, record)))
}

/// Parses an infix operator expression into a left-associated call.
///
/// `operators` overrides the standard table; `disallow` excludes
/// entries from it.
pub fn parse_infix(
    s: &Span,
    operators: Option<&[&str]>,
    disallow: &[&str],
    dialect: Dialect,
) -> Result<Option<Call>> {
    let mut table: Vec<&str> = Vec::new();
    match operators {
        Some(ops) => table.extend_from_slice(ops),
        None => {
            if dialect.extended_operators() {
                table.extend_from_slice(Dialect::EXTENDED_INFIX);
            }
            table.extend_from_slice(INFIX_OPERATORS);
        }
    }

    for op in table {
        if disallow.contains(&op) {
            continue;
        }
        let parts = split_raw(s, op)?;
        if parts.len() < 2 {
            continue;
        }
        // The rightmost operand stands alone; everything to its left is
        // re-parsed as one expression, giving left associativity:
        // a / b / c == (a / b) / c.
        let left = s.with_bounds(s.start(), parts[parts.len() - 2].stop());
        let right = s.with_bounds(parts[parts.len() - 1].start(), s.stop());

        // `!~` is a different operator.
        if op == "~" && left.ends_with("!") {
            continue;
        }

        let left = strip(&left);
        let right = strip(&right);

        if UNARY_OPERATORS.contains(&op) && left.is_empty() {
            let record = parse_record_internals(&right, false, false, dialect)?;
            return Ok(Some(Call::new(op, record)));
        }
        if op == "~" && left.is_empty() {
            // Unary negation is handled by the proposition layer.
            return Ok(None);
        }

        let left_expr = parse_expression(&left, dialect)?;
        let right_expr = parse_expression(&right, dialect)?;
        let record = Record::new(vec![
            FieldValue::named("left", left_expr),
            FieldValue::named("right", right_expr),
        ]);
        return Ok(Some(Call::new(op.trim(), record)));
    }
    Ok(None)
}

/// Builds the combine tree shared by all three combine forms: a
/// `Combine` head whose `logica_value` carries the aggregation.
pub(crate) fn build_combine(
    operator: &str,
    argument: Expression,
    body: Option<Proposition>,
    full_text: Span,
) -> Combine {
    let aggregation = Aggregation::new(operator, argument, full_text.clone());
    let head = Call::new(
        "Combine",
        Record::new(vec![FieldValue::new(
            Field::Name("logica_value".to_string()),
            Value::Aggregation(aggregation),
        )]),
    );
    Combine {
        head,
        body,
        full_text,
    }
}

/// Parses `combine Op = expr [:- body]`.
pub fn parse_combine(s: &Span, dialect: Dialect) -> Result<Option<Combine>> {
    if !s.starts_with("combine ") {
        return Ok(None);
    }
    let s = s.slice_from("combine ".len());
    let (first, second) = split_in_one_or_two(&s, ":-")?;
    let (value, body) = match second {
        Some(body) => (first, Some(body)),
        None => (s.clone(), None),
    };
    let (operator, expression) = split_in_two(&value, "=")?;
    let argument = parse_expression(&expression, dialect)?;
    let body = match body {
        Some(body) => Some(parse_conjunction_body(&body, dialect)?),
        None => None,
    };
    Ok(Some(build_combine(operator.as_str(), argument, body, s)))
}

/// Parses the ultra-concise combine `Op{ expr [:- body] }`.
pub fn parse_ultra_concise_combine(s: &Span, dialect: Dialect) -> Result<Option<Combine>> {
    let Some((operator, multiset)) = parse_generic_call(s, b'{', b'}', dialect)? else {
        return Ok(None);
    };
    let (first, second) = split_in_one_or_two(&multiset, ":-")?;
    let (value, body) = match second {
        Some(body) => (first, Some(body)),
        None => (multiset.clone(), None),
    };
    let argument = parse_expression(&value, dialect)?;
    let body = match body {
        Some(body) => Some(parse_conjunction_body(&body, dialect)?),
        None => None,
    };
    Ok(Some(build_combine(&operator, argument, body, s.clone())))
}

/// Parses `if cond then cons [else if …]* else alt`.
pub fn parse_implication(s: &Span, dialect: Dialect) -> Result<Option<Implication>> {
    if !(s.starts_with("if ") || s.starts_with("if\n")) {
        return Ok(None);
    }
    let inner = s.slice_from(3);
    let mut arms = split(&inner, "else if")?;
    let Some(last_arm) = arms.pop() else {
        return Ok(None);
    };
    let (last_if_then, last_else) = split_in_two(&last_arm, "else")?;
    arms.push(last_if_then);

    let mut if_thens = Vec::with_capacity(arms.len());
    for arm in &arms {
        let (condition, consequence) = split_in_two(arm, "then")?;
        if_thens.push(IfThen {
            condition: parse_expression(&condition, dialect)?,
            consequence: parse_expression(&consequence, dialect)?,
        });
    }
    Ok(Some(Implication {
        if_thens,
        otherwise: Box::new(parse_expression(&last_else, dialect)?),
    }))
}

/// Parses `expr.field`: everything before the last top-level dot is the
/// record, the final piece must be a lowercase identifier.
pub fn parse_subscript(s: &Span, dialect: Dialect) -> Result<Option<ExprNode>> {
    let path = split_raw(s, ".")?;
    if path.len() < 2 {
        return Ok(None);
    }
    let record_span = s.with_bounds(s.start(), path[path.len() - 2].stop());
    let record = parse_expression(&strip(&record_span), dialect)?;
    let last = &path[path.len() - 1];
    if !last
        .bytes()
        .iter()
        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || *b == b'_')
    {
        return Err(ParseError::new(ErrorKind::UppercaseSubscript, s.clone()));
    }
    let subscript = Expression::new(
        ExprNode::Literal(Literal::Symbol(last.as_str().to_string())),
        last.clone(),
    );
    Ok(Some(ExprNode::Subscript {
        record: Box::new(record),
        subscript: Box::new(subscript),
    }))
}

/// Parses `expr[k0, k1, …]`, desugaring to nested `Element` calls:
/// `Element(Element(expr, k0), k1)`.
pub fn parse_array_subscript(s: &Span, dialect: Dialect) -> Result<Option<Call>> {
    let Some((array_text, args_span)) = parse_generic_call(s, b'[', b']', dialect)? else {
        return Ok(None);
    };
    let args = parse_record_internals(&args_span, false, false, dialect)?;
    let array = parse_expression(&Span::synthetic(array_text), dialect)?;

    let mut result: Option<Call> = None;
    for (i, fv) in args.field_values.into_iter().enumerate() {
        if *fv.field() != Field::Position(i) {
            return Err(ParseError::new(
                ErrorKind::PositionalArraySubscript,
                s.clone(),
            ));
        }
        let Value::Expression(key) = fv.value else {
            return Err(ParseError::new(
                ErrorKind::PositionalArraySubscript,
                s.clone(),
            ));
        };
        let first_argument = match result.take() {
            Some(call) => Expression::new(ExprNode::Call(call), s.clone()),
            None => array.clone(),
        };
        result = Some(Call::new(
            "Element",
            Record::new(vec![
                FieldValue::positional(0, first_argument),
                FieldValue::positional(1, key),
            ]),
        ));
    }
    Ok(result)
}

/// Parses `~prop` at expression position, exposing the desugared
/// `IsNull(…)` call.
pub fn parse_negation_expression(s: &Span, dialect: Dialect) -> Result<Option<Call>> {
    if let Some(Proposition::Predicate(call)) = parse_negation(s, dialect)? {
        return Ok(Some(call));
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(text: &str) -> Span {
        Span::synthetic(text)
    }

    fn expr(text: &str) -> Expression {
        parse_expression(&span(text), Dialect::standard()).unwrap()
    }

    #[test]
    fn heritage_is_preserved() {
        let e = expr("a + b * c");
        assert_eq!(e.heritage().as_str(), "a + b * c");
    }

    #[test]
    fn calls_parse_with_arguments() {
        let e = expr("Greeting(word: \"hello\")");
        let ExprNode::Call(call) = e.node() else {
            panic!("expected a call");
        };
        assert_eq!(call.predicate_name(), "Greeting");
        assert_eq!(call.record().field_values().len(), 1);
    }

    #[test]
    fn backticked_operator_names_unquote() {
        let (name, _) = parse_generic_call(&span("`=`(a, b)"), b'(', b')', Dialect::standard())
            .unwrap()
            .unwrap();
        assert_eq!(name, "=");

        let (name, _) =
            parse_generic_call(&span("`my pred`(a)"), b'(', b')', Dialect::standard())
                .unwrap()
                .unwrap();
        assert_eq!(name, "`my pred`");
    }

    #[test]
    fn arrow_call_is_special_cased() {
        let e = expr("->(a, b)");
        assert!(matches!(e.node(), ExprNode::Call(c) if c.predicate_name() == "->"));
    }

    #[test]
    fn infix_is_left_associated() {
        let e = expr("a - b - c");
        let ExprNode::Call(call) = e.node() else {
            panic!("expected a call");
        };
        assert_eq!(call.predicate_name(), "-");
        let Value::Expression(left) = call.record().field_values()[0].value() else {
            panic!("expected expression");
        };
        assert_eq!(left.heritage().as_str(), "a - b");
    }

    #[test]
    fn precedence_puts_loose_operators_on_top() {
        let e = expr("a + b == c");
        let ExprNode::Call(call) = e.node() else {
            panic!("expected a call");
        };
        assert_eq!(call.predicate_name(), "==");
    }

    #[test]
    fn unary_minus_applies_to_its_operand() {
        let e = expr("-(x)");
        let ExprNode::Call(call) = e.node() else {
            panic!("expected a call");
        };
        assert_eq!(call.predicate_name(), "-");
        assert_eq!(call.record().field_values().len(), 1);
    }

    #[test]
    fn negative_numbers_stay_literals() {
        assert!(matches!(
            expr("-1.5").node(),
            ExprNode::Literal(Literal::Number(n)) if n == "-1.5"
        ));
    }

    #[test]
    fn worded_operators_trim_to_bare_names() {
        let e = expr("x in l");
        let ExprNode::Call(call) = e.node() else {
            panic!("expected a call");
        };
        assert_eq!(call.predicate_name(), "in");

        let e = expr("x is not null");
        let ExprNode::Call(call) = e.node() else {
            panic!("expected a call");
        };
        assert_eq!(call.predicate_name(), "is not");
    }

    #[test]
    fn combine_parses_with_and_without_body() {
        let e = expr("combine Max= x :- P(x)");
        let ExprNode::Combine(combine) = e.node() else {
            panic!("expected a combine");
        };
        assert!(combine.body().is_some());
        let Value::Aggregation(a) = combine.head().record().field_values()[0].value() else {
            panic!("expected aggregation");
        };
        assert_eq!(a.operator(), "Max");

        let e = expr("combine Sum= y");
        assert!(matches!(e.node(), ExprNode::Combine(c) if c.body().is_none()));
    }

    #[test]
    fn ultra_concise_combine() {
        let e = expr("List{x :- P(x)}");
        let ExprNode::Combine(combine) = e.node() else {
            panic!("expected a combine");
        };
        let Value::Aggregation(a) = combine.head().record().field_values()[0].value() else {
            panic!("expected aggregation");
        };
        assert_eq!(a.operator(), "List");
        assert!(combine.body().is_some());
    }

    #[test]
    fn implication_chains() {
        let e = expr("if a then 1 else if b then 2 else 3");
        let ExprNode::Implication(implication) = e.node() else {
            panic!("expected an implication");
        };
        assert_eq!(implication.if_thens().len(), 2);
        assert_eq!(implication.otherwise().heritage().as_str(), "3");
    }

    #[test]
    fn implication_is_an_expression_only_shape() {
        // At proposition position this errors; here it parses.
        let e = expr("if a then b else c");
        assert!(matches!(e.node(), ExprNode::Implication(_)));
    }

    #[test]
    fn subscripts_take_the_last_dot() {
        let e = expr("person.address.city");
        let ExprNode::Subscript { record, subscript } = e.node() else {
            panic!("expected a subscript");
        };
        assert_eq!(record.heritage().as_str(), "person.address");
        assert!(
            matches!(subscript.node(), ExprNode::Literal(Literal::Symbol(sym)) if sym == "city")
        );
    }

    #[test]
    fn uppercase_subscript_is_rejected() {
        let err = parse_expression(&span("r.Field"), Dialect::standard()).unwrap_err();
        assert_eq!(*err.kind(), ErrorKind::UppercaseSubscript);
    }

    #[test]
    fn array_subscript_desugars_to_element_calls() {
        let e = expr("arr[i, j]");
        let ExprNode::Call(outer) = e.node() else {
            panic!("expected a call");
        };
        assert_eq!(outer.predicate_name(), "Element");
        let Value::Expression(inner) = outer.record().field_values()[0].value() else {
            panic!("expected expression");
        };
        assert!(matches!(inner.node(), ExprNode::Call(c) if c.predicate_name() == "Element"));
    }

    #[test]
    fn array_subscript_rejects_named_arguments() {
        let err = parse_expression(&span("arr[k: 1]"), Dialect::standard()).unwrap_err();
        assert_eq!(*err.kind(), ErrorKind::PositionalArraySubscript);
    }

    #[test]
    fn extended_operators_need_the_incantation() {
        assert!(parse_expression(&span("a --- b"), Dialect::standard()).is_err());

        let dialect = Dialect::from_source(Dialect::INCANTATION);
        let e = parse_expression(&span("a --- b"), dialect).unwrap();
        assert!(matches!(e.node(), ExprNode::Call(c) if c.predicate_name() == "---"));
    }

    #[test]
    fn record_literals_are_expressions() {
        let e = expr("{a: 1, b: x}");
        assert!(matches!(e.node(), ExprNode::Record(r) if r.field_values().len() == 2));
    }

    #[test]
    fn unparsable_expression_reports_generic_error() {
        let err = parse_expression(&span("y? Max"), Dialect::standard()).unwrap_err();
        assert_eq!(*err.kind(), ErrorKind::ExpressionUnparsable);
    }
}
