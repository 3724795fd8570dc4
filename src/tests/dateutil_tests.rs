// src/tests/dateutil_tests.rs

//! tests for [`src/oracle/dateutil.rs`] against a real `dateutil`
//!
//! The interpreter is found as the CLI finds it; set `PYCOMPAT_PYTHON` to
//! choose one with `python-dateutil` installed.
//!
//! [`src/oracle/dateutil.rs`]: crate::oracle::dateutil

#![allow(non_snake_case)]

#[allow(unused_imports)]
use ::si_trace_print::printers::{
    defn,
    defo,
    defx,
};
use ::si_trace_print::stack::stack_offset_set;
use ::test_case::test_case;

use crate::catalog::{
    CategoryKind,
    TestCategory,
};
use crate::catalog::default::default_catalog;
use crate::data::params::{
    ParameterSet,
    ymd_midnight,
};
use crate::data::token::TokenKind;
use crate::error::FixtureError;
use crate::generator::{
    GenerateOptions,
    generate,
};
use crate::oracle::{
    parse,
    tokenize,
};
use crate::oracle::dateutil::DateutilOracle;
use crate::python::pyrunner::PythonToUse;
use crate::tests::common::{
    ymdhms,
    ymdhmsu_o,
};

fn oracle() -> DateutilOracle {
    DateutilOracle::new(PythonToUse::EnvVenvPath, None).expect("failed to start the dateutil oracle")
}

/// each leftover token is found in `input` in order without overlap
fn leftover_in_order(input: &str, leftover: &[String]) -> bool {
    let mut at: usize = 0;
    for token in leftover.iter() {
        match input[at..].find(token.as_str()) {
            Some(offset) => at += offset + token.len(),
            None => return false,
        }
    }

    true
}

#[test_case(
    "2018.5.15",
    &[(TokenKind::Numeric, "2018"), (TokenKind::Separator, "."), (TokenKind::Numeric, "5"),
      (TokenKind::Separator, "."), (TokenKind::Numeric, "15")];
    "2018.5.15"
)]
#[test_case(
    "May 5, 2018",
    &[(TokenKind::Alpha, "May"), (TokenKind::Separator, " "), (TokenKind::Numeric, "5"),
      (TokenKind::Separator, ","), (TokenKind::Separator, " "), (TokenKind::Numeric, "2018")];
    "May 5, 2018"
)]
#[test_case(
    "Mar. 5, 2018",
    &[(TokenKind::Alpha, "Mar"), (TokenKind::Separator, "."), (TokenKind::Separator, " "),
      (TokenKind::Numeric, "5"), (TokenKind::Separator, ","), (TokenKind::Separator, " "),
      (TokenKind::Numeric, "2018")];
    "Mar. 5, 2018"
)]
#[ignore = "requires python3 with python-dateutil"]
fn test_DateutilOracle_tokenize(input: &str, expect: &[(TokenKind, &str)]) {
    stack_offset_set(Some(2));
    defn!("{:?}", input);
    let mut oracle = oracle();
    let tokens = tokenize(&mut oracle, input).unwrap();
    let actual: Vec<(TokenKind, &str)> = tokens.iter().map(|t| (t.kind(), t.text())).collect();
    assert_eq!(actual, expect);
    assert_eq!(oracle.requests(), 1);
    oracle.close().unwrap();
    defx!();
}

#[test]
#[ignore = "requires python3 with python-dateutil"]
fn test_DateutilOracle_parse_scenarios() {
    let mut oracle = oracle();

    let params = ParameterSet::builder()
        .default_baseline(ymd_midnight(2003, 9, 25).unwrap())
        .build("test_default")
        .unwrap();
    let parsed = parse(&mut oracle, "2003-09-25", &params).unwrap().unwrap();
    assert_eq!(parsed.result, ymdhms(2003, 9, 25, 0, 0, 0));
    assert_eq!(parsed.leftover_tokens, None);

    let params = ParameterSet::builder()
        .tz_alias("BRST", -10800)
        .build("test_tzinfo")
        .unwrap();
    let parsed = parse(&mut oracle, "Thu Sep 25 10:36:28 BRST 2003", &params).unwrap().unwrap();
    assert_eq!(parsed.result, ymdhmsu_o(2003, 9, 25, 10, 36, 28, 0, Some(-10800)));

    let params = ParameterSet::builder().fuzzy(true).build("test_fuzzy").unwrap();
    let parsed = parse(&mut oracle, "I have a meeting on March 1, 1974", &params).unwrap().unwrap();
    assert_eq!((parsed.result.year, parsed.result.month, parsed.result.day), (1974, 3, 1));
    assert_eq!(parsed.leftover_tokens, None);

    oracle.close().unwrap();
}

#[test]
#[ignore = "requires python3 with python-dateutil"]
fn test_DateutilOracle_parse_fuzzy_with_tokens() {
    let mut oracle = oracle();
    let input = "Today is 25 of September of 2003, exactly at 10:49:41 with timezone -03:00.";
    let params = CategoryKind::FuzzyWithTokens.handler().parameters("test_fwt").unwrap();
    let parsed = parse(&mut oracle, input, &params).unwrap().unwrap();
    assert_eq!(parsed.result, ymdhmsu_o(2003, 9, 25, 10, 49, 41, 0, Some(-10800)));
    let leftover = parsed.leftover_tokens.unwrap();
    defo!("leftover {:?}", leftover);
    assert!(!leftover.is_empty());
    assert!(leftover_in_order(input, &leftover), "{:?}", leftover);
    oracle.close().unwrap();
}

#[test]
#[ignore = "requires python3 with python-dateutil"]
fn test_DateutilOracle_parse_failure() {
    let mut oracle = oracle();
    let answer = parse(&mut oracle, "not a date", &ParameterSet::default()).unwrap();
    assert!(answer.is_err(), "{:?}", answer);
    // the oracle keeps serving after a failed parse
    let parsed = parse(&mut oracle, "2003", &ParameterSet::default()).unwrap();
    assert!(parsed.is_ok());
    oracle.close().unwrap();
}

#[test]
#[ignore = "requires python3 with python-dateutil"]
fn test_DateutilOracle_ignoretz() {
    let mut oracle = oracle();
    let params = CategoryKind::IgnoreTz.handler().parameters("test_ignoretz").unwrap();
    let parsed = parse(&mut oracle, "1994-11-05T08:15:30-05:00", &params).unwrap().unwrap();
    assert_eq!(parsed.result, ymdhms(1994, 11, 5, 8, 15, 30));
    oracle.close().unwrap();
}

#[test]
#[ignore = "requires python3 with python-dateutil"]
fn test_generate_default_catalog() {
    let catalog = default_catalog().unwrap();
    let mut oracle = oracle();
    let generated = generate(&catalog, &mut oracle, &GenerateOptions::default()).unwrap();
    assert_eq!(generated.units.len(), catalog.len());
    assert_eq!(generated.summary.fixtures(), catalog.case_count());
    assert_eq!(oracle.requests(), catalog.case_count() as u64);
    let process = oracle.close().unwrap();
    assert!(process.duration_proc_run.is_some());
}

#[test]
#[ignore = "requires python3 with python-dateutil"]
fn test_generate_oracle_parse_failure() {
    let mut catalog = crate::catalog::TestCatalog::new();
    catalog.push(TestCategory::new("test_bad", CategoryKind::Fuzzy, &["2003", "no date at all"]).unwrap()).unwrap();
    let mut oracle = oracle();
    match generate(&catalog, &mut oracle, &GenerateOptions::default()) {
        Err(FixtureError::OracleParseFailure { category, index, input, .. }) => {
            assert_eq!(category, "test_bad");
            assert_eq!(index, 1);
            assert_eq!(input, "no date at all");
        }
        other => panic!("expected OracleParseFailure, got {:?}", other.map(|g| g.units.len())),
    }
}
