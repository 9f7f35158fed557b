//! Records: the argument structure of calls and the `{ … }` literal.
//!
//! A record is a list of field/value entries. Fields are named,
//! positional (0-based), or the terminal rest-of `..`; values are plain
//! expressions or, in rule heads only, aggregation slots
//! (`field ? Op = expr`).

use super::expression::{parse_expression, Expression};
use crate::dialect::Dialect;
use crate::error::{ErrorKind, ParseError, Result};
use crate::span::Span;
use crate::split::{split, split_in_one_or_two, split_in_two, strip};
use crate::traverse::is_whole;
use std::fmt;

/// A record field key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    Name(String),
    Position(usize),
    /// The terminal `..rest` entry; `except` lists the named fields that
    /// preceded it.
    RestOf { except: Vec<String> },
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => f.write_str(name),
            Self::Position(idx) => write!(f, "{idx}"),
            Self::RestOf { .. } => f.write_str(".."),
        }
    }
}

/// An aggregation slot: `operator = argument` attached to a head field.
#[derive(Debug, Clone)]
pub struct Aggregation {
    pub(crate) operator: String,
    pub(crate) argument: Expression,
    pub(crate) heritage: Span,
}

impl Aggregation {
    #[must_use]
    pub fn new(operator: impl Into<String>, argument: Expression, heritage: Span) -> Self {
        Self {
            operator: operator.into(),
            argument,
            heritage,
        }
    }

    #[must_use]
    #[inline]
    pub fn operator(&self) -> &str {
        &self.operator
    }

    #[must_use]
    #[inline]
    pub fn argument(&self) -> &Expression {
        &self.argument
    }

    #[must_use]
    #[inline]
    pub fn heritage(&self) -> &Span {
        &self.heritage
    }
}

impl fmt::Display for Aggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}= {}", self.operator, self.argument)
    }
}

/// The value side of a record entry.
#[derive(Debug, Clone)]
pub enum Value {
    Expression(Expression),
    Aggregation(Aggregation),
}

/// One record entry.
#[derive(Debug, Clone)]
pub struct FieldValue {
    pub(crate) field: Field,
    pub(crate) value: Value,
}

impl FieldValue {
    #[must_use]
    pub fn new(field: Field, value: Value) -> Self {
        Self { field, value }
    }

    #[must_use]
    pub fn named(name: impl Into<String>, expression: Expression) -> Self {
        Self::new(Field::Name(name.into()), Value::Expression(expression))
    }

    #[must_use]
    pub fn positional(idx: usize, expression: Expression) -> Self {
        Self::new(Field::Position(idx), Value::Expression(expression))
    }

    #[must_use]
    #[inline]
    pub fn field(&self) -> &Field {
        &self.field
    }

    #[must_use]
    #[inline]
    pub fn value(&self) -> &Value {
        &self.value
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.field, &self.value) {
            (Field::Position(_), Value::Expression(e)) => write!(f, "{e}"),
            (Field::RestOf { .. }, Value::Expression(e)) => write!(f, "..{e}"),
            (field, Value::Expression(e)) => write!(f, "{field}: {e}"),
            (field, Value::Aggregation(a)) => write!(f, "{field}? {a}"),
        }
    }
}

/// An ordered list of record entries. Displays as its comma-joined
/// internals; the `{ … }` braces belong to the record-literal
/// expression.
#[derive(Debug, Clone, Default)]
pub struct Record {
    pub(crate) field_values: Vec<FieldValue>,
}

impl Record {
    #[must_use]
    pub fn new(field_values: Vec<FieldValue>) -> Self {
        Self { field_values }
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    #[inline]
    pub fn field_values(&self) -> &[FieldValue] {
        &self.field_values
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, fv) in self.field_values.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{fv}")?;
        }
        Ok(())
    }
}

/// Parses a record literal `{ … }` with a whole interior.
pub fn parse_record(s: &Span, dialect: Dialect) -> Result<Option<Record>> {
    let s = strip(s);
    let inner = s.slice(1..s.len().saturating_sub(1));
    if s.len() >= 2
        && s.byte_at(0) == Some(b'{')
        && s.byte_at(s.len() - 1) == Some(b'}')
        && is_whole(&inner)
    {
        return Ok(Some(parse_record_internals(&inner, true, false, dialect)?));
    }
    Ok(None)
}

/// Parses the comma-separated internals of a record.
///
/// `is_record_literal` forbids the rest-of entry; `aggregation_allowed`
/// admits `field ? Op = expr` entries (rule heads only).
pub fn parse_record_internals(
    s: &Span,
    is_record_literal: bool,
    aggregation_allowed: bool,
    dialect: Dialect,
) -> Result<Record> {
    let s = strip(s);
    if split(&s, ":-")?.len() > 1 {
        return Err(ParseError::new(ErrorKind::CombineInRecord, s.clone()));
    }
    if s.is_empty() || !is_whole(&s) {
        return Ok(Record::empty());
    }

    let mut result = Vec::new();
    let mut had_rest_of = false;
    let mut positional_ok = true;
    let mut observed_fields: Vec<String> = Vec::new();

    for (idx, field_value) in split(&s, ",")?.into_iter().enumerate() {
        if had_rest_of {
            return Err(ParseError::new(ErrorKind::RestOfNotLast, field_value));
        }
        if field_value.starts_with("..") {
            if is_record_literal {
                return Err(ParseError::new(
                    ErrorKind::RestOfInRecordLiteral,
                    field_value,
                ));
            }
            let expression = parse_expression(&field_value.slice_from(2), dialect)?;
            result.push(FieldValue::new(
                Field::RestOf {
                    except: observed_fields.clone(),
                },
                Value::Expression(expression),
            ));
            had_rest_of = true;
            positional_ok = false;
            continue;
        }

        let observed_field;
        let (field, colon_split) = split_in_one_or_two(&field_value, ":")?;
        if let Some(value) = colon_split {
            positional_ok = false;
            observed_field = field.as_str().to_string();
            let value = if value.is_empty() {
                if field.byte_at(0).is_some_and(|b| b.is_ascii_uppercase()) {
                    return Err(ParseError::new(ErrorKind::CapitalizedField, field));
                }
                if field.byte_at(0) == Some(b'`') {
                    return Err(ParseError::new(ErrorKind::BacktickedField, field));
                }
                field.clone()
            } else {
                value
            };
            result.push(FieldValue::named(
                field.as_str(),
                parse_expression(&value, dialect)?,
            ));
        } else {
            let (field, question_split) = split_in_one_or_two(&field_value, "?")?;
            if let Some(value) = question_split {
                if !aggregation_allowed {
                    return Err(ParseError::new(
                        ErrorKind::AggregationOutsideHead,
                        field_value,
                    ));
                }
                positional_ok = false;
                if field.is_empty() {
                    return Err(ParseError::new(
                        ErrorKind::UnnamedAggregatedField,
                        field_value,
                    ));
                }
                observed_field = field.as_str().to_string();
                let (operator, expression) = split_in_two(&value, "=")?;
                let operator = strip(&operator);
                result.push(FieldValue::new(
                    Field::Name(field.as_str().to_string()),
                    Value::Aggregation(Aggregation::new(
                        operator.as_str(),
                        parse_expression(&expression, dialect)?,
                        value.clone(),
                    )),
                ));
            } else if positional_ok {
                result.push(FieldValue::positional(
                    idx,
                    parse_expression(&field_value, dialect)?,
                ));
                observed_field = format!("col{idx}");
            } else {
                return Err(ParseError::new(
                    ErrorKind::PositionalAfterNamed,
                    field_value,
                ));
            }
        }
        observed_fields.push(observed_field);
    }

    Ok(Record::new(result))
}
