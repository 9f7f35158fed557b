//! Parsing errors.
//!
//! Every error carries the span it points at, so callers can render the
//! offending text with its surroundings. The parser fails fast: the
//! first error surfaces unchanged, no recovery is attempted and no
//! partial tree is produced. Color rendering is left to the caller;
//! [`ParseError::context`] produces the plain-text decomposition.

use crate::span::Span;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ParseError>;

/// How much surrounding text [`ParseError::context`] shows on each side.
const CONTEXT_CLAMP: usize = 300;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    // Lexical.
    #[error("Parenthesis matches nothing.")]
    UnmatchedBracket,
    #[error("End of line in string.")]
    EolInString,

    // Structural.
    #[error("I expected string to be split by '{separator}' in two.")]
    SplitNotInTwo { separator: String },
    #[error("String should have been split by '{separator}' in 1 or 2 pieces.")]
    SplitNotInOneOrTwo { separator: String },
    #[error("Too many ':-' in a rule. Did you forget a semicolon?")]
    TooManyRuleParts,
    #[error("Found no call in rule head.")]
    NoCallInHead,
    #[error("Could not parse predicate call.")]
    HeadCallUnparsable,
    #[error("Unexpected text in the head of a rule.")]
    UnexpectedHeadText,
    #[error("Too many '=' in predicate value.")]
    TooManyEquals,
    #[error("Can not parse rule head. Something is wrong with how 'distinct' is used.")]
    BadDistinct,
    #[error("Too many '{denotation}' denotations in a rule head.")]
    TooManyDenotations { denotation: String },
    #[error("Denotation '{denotation}' takes no argument and must end the rule head.")]
    MisplacedDenotation { denotation: String },
    #[error("Could not parse arguments of '{denotation}'.")]
    DenotationArguments { denotation: String },

    // Semantic shape.
    #[error(
        "Variables starting with 'x_' are reserved for compiler internals. \
         Please use a different name."
    )]
    ReservedVariable,
    #[error(
        "Record fields may not start with a capital letter, as it is reserved \
         for predicate literals. Backtick the field name if you need it \
         capitalized, e.g. Q(`A`: 1)."
    )]
    CapitalizedField,
    #[error(
        "Backticks in variable names are disallowed. Please give an explicit \
         variable for the value of the column."
    )]
    BacktickedField,
    #[error("Positional argument can not go after non-positional arguments.")]
    PositionalAfterNamed,
    #[error("Field '..<rest_of>' must go last.")]
    RestOfNotLast,
    #[error("Field '..<rest_of>' in record literals is not currently supported.")]
    RestOfInRecordLiteral,
    #[error("Aggregated fields have to be named.")]
    UnnamedAggregatedField,
    #[error("Aggregation of fields is only allowed in the head of a rule.")]
    AggregationOutsideHead,
    #[error("Aggregation appears in a non-distinct predicate. Did you forget 'distinct'?")]
    AggregationWithoutDistinct,
    #[error(
        "Unexpected ':-' in record internals. If you apply a function to a \
         'combine' statement, place it in an auxiliary variable first."
    )]
    CombineInRecord,
    #[error("Negation '~' is a unary operator.")]
    NonUnaryNegation,
    #[error("Subscript must be lowercase.")]
    UppercaseSubscript,
    #[error("Array subscription must only have positional arguments.")]
    PositionalArraySubscript,
    #[error("If-then-else clause is only supported as an expression, not as a proposition.")]
    ImplicationAsProposition,
    #[error(
        "Incorrect syntax for functor call. Functor call to be made as\n\
         \x20 R := F(A: V, ...)\n\
         or\n\
         \x20 @Make(R, F, {{A: V, ...}})\n\
         Where R, F, A's and V's are all predicate names."
    )]
    FunctorSyntax,
    #[error("Left hand side of a function definition must be a predicate call.")]
    FunctionRuleLhs,

    // Imports.
    #[error("Imported file not found. Considered:\n{considered}")]
    ImportNotFound { considered: String },
    #[error("Imported file could not be read: {path}.")]
    ImportUnreadable { path: String },
    #[error("Too many 'as' in import.")]
    TooManyAs,
    #[error("One import per predicate please.")]
    OneImportPerPredicate,
    #[error("Circular imports are not allowed: {chain}.")]
    CircularImport { chain: String },
    #[error("Predicate {predicate} from file {file} is imported by {importer}, but is not defined.")]
    UndefinedImport {
        predicate: String,
        file: String,
        importer: String,
    },
    #[error("Predicate {predicate} from file {file} is imported by {importer}, but not used.")]
    UnusedImport {
        predicate: String,
        file: String,
        importer: String,
    },
    #[error(
        "Some import paths are equal modulo '_' and '/'. This confuses me: {prefix}."
    )]
    PrefixExhausted { prefix: String },
    #[error("Empty import prefix for '{file}'.")]
    EmptyImportPrefix { file: String },
    #[error("Predicate from file {file} is overridden by the importer.")]
    DuplicateDefinition { file: String },

    // Rewrites.
    #[error("Signature differs between bodies of '{predicate}'.")]
    MultiBodySignature { predicate: String },
    #[error("Inconsistency in 'distinct' denoting for predicate '{predicate}'.")]
    DistinctInconsistency { predicate: String },

    // Generic.
    #[error("Could not parse expression of a value.")]
    ExpressionUnparsable,
    #[error("Could not parse proposition.")]
    PropositionUnparsable,
}

/// A parsing failure: what went wrong and where.
#[derive(Error, Debug, Clone)]
#[error("{kind}")]
pub struct ParseError {
    kind: ErrorKind,
    location: Span,
}

impl ParseError {
    #[must_use]
    pub fn new(kind: ErrorKind, location: Span) -> Self {
        Self { kind, location }
    }

    #[must_use]
    #[inline]
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    #[must_use]
    #[inline]
    pub fn location(&self) -> &Span {
        &self.location
    }

    /// Plain-text context around the error location, clamped to
    /// [`CONTEXT_CLAMP`] characters on each side. An empty location is
    /// shown as `<EMPTY>`.
    #[must_use]
    pub fn context(&self) -> String {
        let (before, mid, after) = self.location.pieces();
        let before = tail_chars(before, CONTEXT_CLAMP);
        let after = head_chars(after, CONTEXT_CLAMP);
        let mid = if mid.is_empty() { "<EMPTY>" } else { mid };
        format!("{before}{mid}{after}")
    }
}

fn head_chars(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

fn tail_chars(s: &str, n: usize) -> &str {
    let count = s.chars().count();
    if count <= n {
        return s;
    }
    match s.char_indices().nth(count - n) {
        Some((idx, _)) => &s[idx..],
        None => s,
    }
}
