// src/data/token.rs

//! A [`Token`] is one classified lexical unit of an input string as split by
//! the tokenizer oracle.

use std::fmt;
use std::ops::Range;

use crate::error::{
    FixtureError,
    FixtureResult,
};

/// The decimal separators the oracle accepts within a numeric run.
pub const DECIMAL_SEPARATORS: [char; 2] = ['.', ','];

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum TokenKind {
    /// first character is alphabetic
    Alpha,
    /// first character is numeric
    Numeric,
    /// exactly one character that is neither alphabetic nor numeric
    Separator,
}

impl TokenKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Alpha => "Alpha",
            TokenKind::Numeric => "Numeric",
            TokenKind::Separator => "Separator",
        }
    }

    /// Classify raw oracle token `text` split from `input`.
    ///
    /// * `Alpha` iff the first character is alphabetic
    /// * `Numeric` iff the first character is numeric; the run may contain at
    ///   most one of the [`DECIMAL_SEPARATORS`]
    /// * `Separator` otherwise, and then `text` must be one character
    ///
    /// Anything else is a [`FixtureError::TokenClassificationViolation`].
    pub fn classify(input: &str, text: &str) -> FixtureResult<TokenKind> {
        let violation = |reason: &'static str| {
            Err(FixtureError::TokenClassificationViolation {
                input: input.to_string(),
                token: text.to_string(),
                reason,
            })
        };
        let mut chars = text.chars();
        let first: char = match chars.next() {
            Some(c) => c,
            None => return violation("token is empty"),
        };
        if first.is_alphabetic() {
            return Ok(TokenKind::Alpha);
        }
        if first.is_numeric() {
            let mut separators: usize = 0;
            for c in chars {
                if c.is_numeric() {
                    continue;
                }
                if DECIMAL_SEPARATORS.contains(&c) {
                    separators += 1;
                    if separators > 1 {
                        return violation("numeric run has more than one decimal separator");
                    }
                    continue;
                }
                return violation("numeric run has a character that is not numeric");
            }
            return Ok(TokenKind::Numeric);
        }
        if chars.next().is_some() {
            return violation("separator is longer than one character");
        }

        Ok(TokenKind::Separator)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A classified token.
///
/// `text` is exactly what the oracle returned. `span` is the byte range of
/// the input the token was split from; usually `&input[span] == text`
/// except where the oracle normalized a character (whitespace as `" "`,
/// a decimal `,` as `.`).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Token {
    kind: TokenKind,
    text: String,
    span: Range<usize>,
}

impl Token {
    pub fn new(kind: TokenKind, text: &str, span: Range<usize>) -> Token {
        Token {
            kind,
            text: text.to_string(),
            span,
        }
    }

    pub const fn kind(&self) -> TokenKind {
        self.kind
    }

    pub fn text(&self) -> &str {
        self.text.as_str()
    }

    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({:?})", self.kind, self.text)
    }
}
