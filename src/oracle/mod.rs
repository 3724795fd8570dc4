// src/oracle/mod.rs

//! The oracles: the trusted reference tokenizer and parser whose observed
//! behavior becomes the expected values of the fixtures.
//!
//! [`TokenizerOracle`] and [`ParserOracle`] only transport raw oracle output.
//! The adapters [`tokenize`] and [`parse`] normalize and check that output
//! against the data model, so every oracle implementation, including the
//! in-process fakes used by tests, is held to the same rules.

pub mod dateutil;
pub mod wire;

#[allow(unused_imports)]
use ::si_trace_print::{
    defn,
    defo,
    defx,
    defñ,
};

use crate::data::params::ParameterSet;
use crate::data::parseresult::OracleParse;
use crate::data::token::{
    Token,
    TokenKind,
};
use crate::error::{
    FixtureError,
    FixtureResult,
};

/// The oracle either derived a value, or failed with a message.
/// A failure to communicate with the oracle is the outer `FixtureResult`.
pub type OracleAnswer<T> = Result<T, String>;

/// The reference lexical splitter.
pub trait TokenizerOracle {
    /// Split `input` into raw token texts, in order.
    fn split(&mut self, input: &str) -> FixtureResult<Vec<String>>;
}

/// The reference date/time parser.
pub trait ParserOracle {
    /// Parse `input` under `params`.
    fn parse(&mut self, input: &str, params: &ParameterSet) -> FixtureResult<OracleAnswer<OracleParse>>;
}

/// Split `input` with the tokenizer oracle and classify every token.
///
/// Each token is aligned with the input to compute its span. The oracle
/// reports any whitespace character as `" "` and a decimal `,` within a
/// numeric run as `.`; otherwise a token must match the input exactly.
/// The tokens must cover the whole input with no gap, so concatenating the
/// spans reproduces `input`.
pub fn tokenize(oracle: &mut dyn TokenizerOracle, input: &str) -> FixtureResult<Vec<Token>> {
    defn!("{:?}", input);
    let raw: Vec<String> = oracle.split(input)?;
    let violation = |token: &str, reason: &'static str| {
        defx!("{:?} {}", token, reason);
        Err(FixtureError::TokenClassificationViolation {
            input: input.to_string(),
            token: token.to_string(),
            reason,
        })
    };

    let mut tokens: Vec<Token> = Vec::with_capacity(raw.len());
    let mut at: usize = 0;
    for text in raw.iter() {
        let kind: TokenKind = TokenKind::classify(input, text)?;
        let begin: usize = at;
        for tc in text.chars() {
            let ic: char = match input[at..].chars().next() {
                Some(c) => c,
                None => return violation(text, "token runs past the end of the input"),
            };
            let matched: bool = tc == ic
                || (tc == ' ' && ic.is_whitespace())
                || (kind == TokenKind::Numeric && tc == '.' && ic == ',');
            if !matched {
                return violation(text, "token does not match the input");
            }
            at += ic.len_utf8();
        }
        tokens.push(Token::new(kind, text, begin..at));
    }
    if at != input.len() {
        return violation(&input[at..], "input is not covered by the tokens");
    }
    defx!("{} tokens", tokens.len());

    Ok(tokens)
}

/// Parse `input` with the parser oracle and check the result agrees with
/// `params`: leftover tokens are present if and only if fuzzy-with-tokens was
/// requested, and there is no UTC offset when timezones are ignored.
pub fn parse(
    oracle: &mut dyn ParserOracle,
    input: &str,
    params: &ParameterSet,
) -> FixtureResult<OracleAnswer<OracleParse>> {
    defn!("{:?}", input);
    let parsed: OracleParse = match oracle.parse(input, params)? {
        Ok(parsed) => parsed,
        Err(message) => {
            defx!("oracle failed: {}", message);
            return Ok(Err(message));
        }
    };
    if params.fuzzy_with_tokens() != parsed.leftover_tokens.is_some() {
        defx!("leftover tokens disagree with fuzzy_with_tokens");
        return Err(FixtureError::OracleProtocol {
            message: format!(
                "leftover tokens {:?} for input {:?} with fuzzy_with_tokens {}",
                parsed.leftover_tokens, input, params.fuzzy_with_tokens(),
            ),
        });
    }
    if params.ignore_timezone() && parsed.result.utc_offset_seconds.is_some() {
        defx!("offset despite ignore_timezone");
        return Err(FixtureError::OracleProtocol {
            message: format!(
                "UTC offset {:?} for input {:?} although timezones are ignored",
                parsed.result.utc_offset_seconds, input,
            ),
        });
    }
    defx!("{}", parsed.result);

    Ok(Ok(parsed))
}
