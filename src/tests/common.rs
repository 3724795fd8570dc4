// src/tests/common.rs

//! common helpers for tests, chiefly the in-process [`FakeOracle`]

#![allow(non_snake_case)]

use std::collections::HashMap;

use crate::data::params::ParameterSet;
use crate::data::parseresult::{
    OracleParse,
    ParseResult,
};
use crate::error::{
    FixtureError,
    FixtureResult,
};
use crate::oracle::{
    OracleAnswer,
    ParserOracle,
    TokenizerOracle,
};

/// An oracle answering from canned replies, keyed by input.
/// An input without a canned reply is an `OracleProtocol` error.
#[derive(Debug, Default)]
pub struct FakeOracle {
    pub splits: HashMap<String, Vec<String>>,
    pub parses: HashMap<String, OracleAnswer<OracleParse>>,
    /// every input asked about, in order, prefixed `T ` or `P `
    pub asked: Vec<String>,
    /// every `ParameterSet` passed to `parse`, in order
    pub params_seen: Vec<ParameterSet>,
}

impl FakeOracle {
    pub fn new() -> FakeOracle {
        FakeOracle::default()
    }

    pub fn split_as(mut self, input: &str, tokens: &[&str]) -> FakeOracle {
        self.splits.insert(input.to_string(), strings(tokens));
        self
    }

    pub fn parse_as(mut self, input: &str, result: ParseResult) -> FakeOracle {
        self.parses.insert(
            input.to_string(),
            Ok(OracleParse { result, leftover_tokens: None }),
        );
        self
    }

    pub fn parse_with_leftover(mut self, input: &str, result: ParseResult, leftover: &[&str]) -> FakeOracle {
        self.parses.insert(
            input.to_string(),
            Ok(OracleParse { result, leftover_tokens: Some(strings(leftover)) }),
        );
        self
    }

    pub fn parse_fails(mut self, input: &str, message: &str) -> FakeOracle {
        self.parses.insert(input.to_string(), Err(message.to_string()));
        self
    }
}

fn no_answer(input: &str) -> FixtureError {
    FixtureError::OracleProtocol {
        message: format!("FakeOracle has no answer for {:?}", input),
    }
}

impl TokenizerOracle for FakeOracle {
    fn split(&mut self, input: &str) -> FixtureResult<Vec<String>> {
        self.asked.push(format!("T {}", input));
        match self.splits.get(input) {
            Some(tokens) => Ok(tokens.clone()),
            None => Err(no_answer(input)),
        }
    }
}

impl ParserOracle for FakeOracle {
    fn parse(&mut self, input: &str, params: &ParameterSet) -> FixtureResult<OracleAnswer<OracleParse>> {
        self.asked.push(format!("P {}", input));
        self.params_seen.push(params.clone());
        match self.parses.get(input) {
            Some(answer) => Ok(answer.clone()),
            None => Err(no_answer(input)),
        }
    }
}

pub fn strings(s: &[&str]) -> Vec<String> {
    s.iter().map(|s| s.to_string()).collect()
}

/// a naive `ParseResult`
pub fn ymdhms(year: i32, month: u32, day: u32, hour: u32, minute: u32, second: u32) -> ParseResult {
    ParseResult {
        year,
        month,
        day,
        hour,
        minute,
        second,
        microsecond: 0,
        utc_offset_seconds: None,
    }
}

/// a `ParseResult` with microseconds and a UTC offset
pub fn ymdhmsu_o(
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: u32,
    microsecond: u32,
    offset: Option<i32>,
) -> ParseResult {
    ParseResult {
        year,
        month,
        day,
        hour,
        minute,
        second,
        microsecond,
        utc_offset_seconds: offset,
    }
}
