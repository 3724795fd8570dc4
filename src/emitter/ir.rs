// src/emitter/ir.rs

//! Intermediate representation of one fixture: everything the rendered test
//! function contains, as structured values, before serialization.
//!
//! Field assertions are only ever created by [`assertions_for`].

use ::chrono::{
    Datelike,
    NaiveDateTime,
    Timelike,
};

use crate::catalog::Invocation;
use crate::data::params::ParameterSet;
use crate::data::parseresult::{
    CaseOutcome,
    ParseResult,
};
use crate::data::token::Token;
use crate::emitter::escape::rust_str_literal;

/// binding of the input string in the emitted test
pub const BIND_INPUT: &str = "s";
/// binding of the expected value
pub const BIND_EXPECTED: &str = "expected";
/// binding of the expected leftover tokens
pub const BIND_EXPECTED_TOKENS: &str = "expected_tokens";
/// binding of the value returned by the implementation under test
pub const BIND_ACTUAL: &str = "actual";
/// binding of the default baseline
pub const BIND_DEFAULT: &str = "default";
/// binding of the timezone alias map
pub const BIND_TZINFOS: &str = "tzinfos";

/// What the oracle said, as the emitted test will spell it out.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Expected {
    DateTime {
        result: ParseResult,
        /// only for fuzzy-with-tokens
        leftover_tokens: Option<Vec<String>>,
    },
    Tokens(Vec<Token>),
}

impl From<CaseOutcome> for Expected {
    fn from(outcome: CaseOutcome) -> Expected {
        match outcome {
            CaseOutcome::Tokens(tokens) => Expected::Tokens(tokens),
            CaseOutcome::Parsed(parsed) => Expected::DateTime {
                result: parsed.result,
                leftover_tokens: parsed.leftover_tokens,
            },
        }
    }
}

/// One `assert_eq!` comparing a single field.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FieldAssertion {
    /// names the field in the failure message, e.g. `Year`
    pub label: String,
    pub expected: String,
    pub actual: String,
}

impl FieldAssertion {
    fn new(label: &str, expected: &str, actual: &str) -> FieldAssertion {
        FieldAssertion {
            label: label.to_string(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }
}

/// One emitted test function.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Fixture {
    pub name: String,
    pub skip: bool,
    pub input: String,
    pub expected: Expected,
    /// statements between the expected value and the invocation
    pub setup: Vec<String>,
    /// expression calling the implementation under test
    pub invocation: String,
    /// the invocation returns a `Result` that must be unwrapped
    pub fallible: bool,
    pub assertions: Vec<FieldAssertion>,
}

impl Fixture {
    /// Build the fixture of one case.
    pub fn new(
        name: String,
        skip: bool,
        input: &str,
        invocation: Invocation,
        params: &ParameterSet,
        outcome: CaseOutcome,
    ) -> Fixture {
        let expected: Expected = Expected::from(outcome);
        let assertions: Vec<FieldAssertion> = assertions_for(&expected);
        let (setup, call, fallible) = match invocation {
            Invocation::Tokenize => {
                (Vec::new(), format!("tokenize({})", BIND_INPUT), false)
            }
            Invocation::TopLevel => {
                (Vec::new(), format!("parse({})", BIND_INPUT), true)
            }
            Invocation::Parser => {
                let (setup, call) = parser_call(params);
                (setup, call, true)
            }
        };

        Fixture {
            name,
            skip,
            input: input.to_string(),
            expected,
            setup,
            invocation: call,
            fallible,
            assertions,
        }
    }
}

fn option_bool(value: Option<bool>) -> String {
    match value {
        Some(b) => format!("Some({})", b),
        None => String::from("None"),
    }
}

/// constructor expression of `baseline`
pub fn baseline_literal(baseline: &NaiveDateTime) -> String {
    format!(
        "NaiveDate::from_ymd_opt({}, {}, {}).unwrap().and_hms_micro_opt({}, {}, {}, {}).unwrap()",
        baseline.year(),
        baseline.month(),
        baseline.day(),
        baseline.hour(),
        baseline.minute(),
        baseline.second(),
        baseline.nanosecond() / 1_000,
    )
}

/// setup statements and the `Parser::parse` call spelling out every parameter
fn parser_call(params: &ParameterSet) -> (Vec<String>, String) {
    let mut setup: Vec<String> = Vec::new();
    let default: String = match params.default_baseline() {
        Some(baseline) => {
            setup.push(format!("let {} = {};", BIND_DEFAULT, baseline_literal(&baseline)));
            format!("Some(&{})", BIND_DEFAULT)
        }
        None => String::from("None"),
    };
    if params.tz_aliases().is_empty() {
        setup.push(format!("let {}: HashMap<String, i32> = HashMap::new();", BIND_TZINFOS));
    } else {
        setup.push(format!("let mut {}: HashMap<String, i32> = HashMap::new();", BIND_TZINFOS));
        // `TzAliasMap` is sorted so inserts are always in the same order
        for (name, offset) in params.tz_aliases().iter() {
            setup.push(format!(
                "{}.insert({}.to_owned(), {});",
                BIND_TZINFOS, rust_str_literal(name), offset,
            ));
        }
    }
    setup.push(String::from("let parser = Parser::new(ParserInfo::default());"));
    let call: String = format!(
        "parser.parse({}, {}, {}, {}, {}, {}, {}, &{})",
        BIND_INPUT,
        option_bool(params.day_first()),
        option_bool(params.year_first()),
        params.fuzzy(),
        params.fuzzy_with_tokens(),
        default,
        params.ignore_timezone(),
        BIND_TZINFOS,
    );

    (setup, call)
}

/// The field assertions of `expected`, in fixed order.
///
/// A date/time always yields year, month, day, hour, minute, second,
/// microsecond and timezone offset. Leftover tokens, when present, yield
/// their presence, their count, then each token by index.
/// A token list yields the token count, then each token by index.
pub fn assertions_for(expected: &Expected) -> Vec<FieldAssertion> {
    let e = BIND_EXPECTED;
    let a = BIND_ACTUAL;
    match expected {
        Expected::DateTime { leftover_tokens, .. } => {
            let mut assertions: Vec<FieldAssertion> = vec![
                FieldAssertion::new("Year", &format!("{e}.year"), &format!("{a}.0.year()")),
                FieldAssertion::new("Month", &format!("{e}.month"), &format!("{a}.0.month()")),
                FieldAssertion::new("Day", &format!("{e}.day"), &format!("{a}.0.day()")),
                FieldAssertion::new("Hour", &format!("{e}.hour"), &format!("{a}.0.hour()")),
                FieldAssertion::new("Minute", &format!("{e}.minute"), &format!("{a}.0.minute()")),
                FieldAssertion::new("Second", &format!("{e}.second"), &format!("{a}.0.second()")),
                FieldAssertion::new("Microsecond", &format!("{e}.micros"), &format!("{a}.0.nanosecond() / 1_000")),
                FieldAssertion::new(
                    "Timezone offset",
                    &format!("{e}.tzo"),
                    &format!("{a}.1.map(|o| o.local_minus_utc())"),
                ),
            ];
            if let Some(tokens) = leftover_tokens {
                let t = BIND_EXPECTED_TOKENS;
                assertions.push(FieldAssertion::new(
                    "Leftover tokens presence",
                    "true",
                    &format!("{a}.2.is_some()"),
                ));
                assertions.push(FieldAssertion::new(
                    "Leftover token count",
                    &format!("Some({t}.len())"),
                    &format!("{a}.2.as_ref().map(|v| v.len())"),
                ));
                for index in 0..tokens.len() {
                    assertions.push(FieldAssertion::new(
                        &format!("Leftover token {}", index),
                        &format!("Some({t}[{index}])"),
                        &format!("{a}.2.as_ref().map(|v| v[{index}].as_str())"),
                    ));
                }
            }

            assertions
        }
        Expected::Tokens(tokens) => {
            let mut assertions: Vec<FieldAssertion> = Vec::with_capacity(tokens.len() + 1);
            assertions.push(FieldAssertion::new("Token count", &format!("{e}.len()"), &format!("{a}.len()")));
            for (index, token) in tokens.iter().enumerate() {
                assertions.push(FieldAssertion::new(
                    &format!("Token {} ({})", index, token.kind()),
                    &format!("{e}[{index}]"),
                    &format!("{a}[{index}]"),
                ));
            }

            assertions
        }
    }
}
