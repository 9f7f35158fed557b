//! Syntax tree nodes and their parsers.
//!
//! Types and the functions that parse them live together, one concern
//! per file:
//! - [`literal`]: literal values and variables
//! - [`record`]: records, fields, and aggregation slots
//! - [`expression`]: expressions, calls, infix algebra, combine forms
//! - [`proposition`]: rule-body propositions and negation desugaring
//! - [`rule`]: rules, denotations, functor and function rules

pub mod expression;
pub mod literal;
pub mod proposition;
pub mod record;
pub mod rule;

// Re-exports for a convenient public surface.
pub use expression::{
    parse_call, parse_expression, parse_infix, Call, Combine, ExprNode, Expression, IfThen,
    Implication,
};
pub use literal::{parse_literal, parse_variable, Literal, Variable};
pub use proposition::{parse_proposition, Proposition};
pub use record::{
    parse_record, parse_record_internals, Aggregation, Field, FieldValue, Record, Value,
};
pub use rule::{parse_function_rule, parse_functor_rule, parse_rule, Rule};
