//! The incantation-controlled dialect bit.
//!
//! A specific phrase in the top-level source enables an extended set of
//! infix operators, extra characters in operator-style predicate names,
//! and propositional equivalence. The bit is extracted once before
//! parsing starts and passed explicitly into every parsing routine; it
//! is never global state.

/// Parsing dialect, fixed for the duration of one top-level parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Dialect {
    extended_operators: bool,
}

impl Dialect {
    /// The phrase that unlocks the extended operator set.
    pub const INCANTATION: &'static str = "Signa inter verba conjugo, symbolum infixus evoco!";

    /// Extra infix operators available under the extended dialect, tried
    /// before the standard table.
    pub const EXTENDED_INFIX: &'static [&'static str] =
        &["---", "-+-", "-*-", "-/-", "-%-", "-^-"];

    /// Scans the top-level source for the incantation.
    #[must_use]
    pub fn from_source(content: &str) -> Self {
        Self {
            extended_operators: content.contains(Self::INCANTATION),
        }
    }

    /// The standard dialect, with no extensions.
    #[must_use]
    pub fn standard() -> Self {
        Self::default()
    }

    /// Whether the extended operator set (and propositional
    /// equivalence) is enabled.
    #[must_use]
    #[inline]
    pub fn extended_operators(&self) -> bool {
        self.extended_operators
    }
}
