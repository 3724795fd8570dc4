// src/data/parseresult.rs

//! What the parser oracle derived from one input.

use std::fmt;

use crate::data::token::Token;

/// The date/time fields of a parse, plus the UTC offset when the input
/// carried resolvable timezone information and timezones were not ignored.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct ParseResult {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    pub microsecond: u32,
    /// whole seconds east of UTC
    pub utc_offset_seconds: Option<i32>,
}

impl fmt::Display for ParseResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}.{:06}",
            self.year, self.month, self.day,
            self.hour, self.minute, self.second, self.microsecond,
        )?;
        match self.utc_offset_seconds {
            Some(offset) => write!(f, " offset {}s", offset),
            None => write!(f, " naive"),
        }
    }
}

/// A [`ParseResult`] plus, only for fuzzy-with-tokens parses, the literal
/// substrings of the input the oracle did not attribute to the date/time,
/// in original left-to-right order.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct OracleParse {
    pub result: ParseResult,
    pub leftover_tokens: Option<Vec<String>>,
}

/// The oracle output for one case, handed to the emitter.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CaseOutcome {
    Tokens(Vec<Token>),
    Parsed(OracleParse),
}
