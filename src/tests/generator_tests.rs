// src/tests/generator_tests.rs

//! tests for [`src/generator/mod.rs`] and [`src/generator/summary.rs`]
//!
//! [`src/generator/mod.rs`]: crate::generator
//! [`src/generator/summary.rs`]: crate::generator::summary

#![allow(non_snake_case)]

use std::time::Duration;

#[allow(unused_imports)]
use ::si_trace_print::printers::{
    defn,
    defo,
    defx,
};

use crate::catalog::{
    CategoryKind,
    TestCatalog,
    TestCategory,
};
use crate::error::FixtureError;
use crate::generator::{
    GenerateOptions,
    generate,
};
use crate::generator::summary::print_summary;
use crate::python::pyrunner::SummaryPyRunner;
use crate::tests::common::{
    FakeOracle,
    ymdhms,
    ymdhmsu_o,
};

fn catalog() -> TestCatalog {
    let mut catalog = TestCatalog::new();
    catalog.push(TestCategory::new("test_split_string", CategoryKind::Tokenize, &["2018.5.15"]).unwrap()).unwrap();
    catalog.push(TestCategory::new("test_parse_tzinfo", CategoryKind::Tzinfo, &[
        "Thu Sep 25 10:36:28 BRST 2003",
        "2003 10:36:28 BRST 25 Sep Thu",
    ]).unwrap()).unwrap();
    catalog.push(TestCategory::new("test_fuzzy_simple", CategoryKind::Fuzzy, &[
        "I have a meeting on March 1, 1974",
    ]).unwrap()).unwrap();
    catalog.push(TestCategory::new("test_parse_default_ignore", CategoryKind::DefaultIgnore, &[]).unwrap()).unwrap();

    catalog
}

fn oracle() -> FakeOracle {
    FakeOracle::new()
        .split_as("2018.5.15", &["2018", ".", "5", ".", "15"])
        .parse_as("Thu Sep 25 10:36:28 BRST 2003", ymdhmsu_o(2003, 9, 25, 10, 36, 28, 0, Some(-10800)))
        .parse_as("2003 10:36:28 BRST 25 Sep Thu", ymdhmsu_o(2003, 9, 25, 10, 36, 28, 0, Some(-10800)))
        .parse_as("I have a meeting on March 1, 1974", ymdhms(1974, 3, 1, 0, 0, 0))
}

#[test]
fn test_generate_all() {
    let catalog = catalog();
    let mut oracle = oracle();
    let generated = generate(&catalog, &mut oracle, &GenerateOptions::default()).unwrap();
    let categories: Vec<&str> = generated.units.iter().map(|u| u.category.as_str()).collect();
    assert_eq!(
        categories,
        vec!["test_split_string", "test_parse_tzinfo", "test_fuzzy_simple", "test_parse_default_ignore"],
    );
    // oracle consulted in declaration order
    assert_eq!(
        oracle.asked,
        vec![
            "T 2018.5.15",
            "P Thu Sep 25 10:36:28 BRST 2003",
            "P 2003 10:36:28 BRST 25 Sep Thu",
            "P I have a meeting on March 1, 1974",
        ],
    );
    // the category parameters are what the oracle sees
    assert_eq!(oracle.params_seen[0].tz_aliases().get("BRST"), Some(&-10800));
    assert!(oracle.params_seen[2].fuzzy());

    let summary = &generated.summary;
    assert_eq!(summary.categories.len(), 4);
    assert_eq!(summary.fixtures(), 4);
    assert_eq!(summary.fixtures_ignored(), 0);
    assert_eq!(summary.oracle_requests, 4);
    assert_eq!(
        summary.emitted_bytes,
        generated.units.iter().map(|u| u.text.len()).sum::<usize>(),
    );
    assert!(summary.categories[3].skip);
    assert_eq!(summary.categories[1].kind, "tzinfo");
    // no oracle process behind a fake oracle
    assert_eq!(summary.process, None);
    print_summary(summary, &[]);
}

#[test]
fn test_print_summary_process() {
    let mut generated = generate(&catalog(), &mut oracle(), &GenerateOptions::default()).unwrap();
    generated.summary.process = Some(SummaryPyRunner {
        count_proc_writes: 4,
        count_proc_polls: 9,
        duration_proc_wait: Duration::from_millis(12),
        duration_proc_run: Some(Duration::from_millis(250)),
    });
    print_summary(&generated.summary, &[String::from("fixtures/pycompat.rs")]);
}

#[test]
fn test_generate_deterministic() {
    let catalog = catalog();
    let generated1 = generate(&catalog, &mut oracle(), &GenerateOptions::default()).unwrap();
    let generated2 = generate(&catalog, &mut oracle(), &GenerateOptions::default()).unwrap();
    assert_eq!(generated1.units, generated2.units);
}

#[test]
fn test_generate_select() {
    let catalog = catalog();
    let mut oracle = oracle();
    let options = GenerateOptions {
        categories: vec![String::from("fuzzy"), String::from("test_split_string")],
        ..Default::default()
    };
    let generated = generate(&catalog, &mut oracle, &options).unwrap();
    let categories: Vec<&str> = generated.units.iter().map(|u| u.category.as_str()).collect();
    assert_eq!(categories, vec!["test_split_string", "test_fuzzy_simple"]);
    assert_eq!(oracle.asked.len(), 2);
}

#[test]
fn test_generate_select_unknown() {
    let catalog = catalog();
    let mut oracle = oracle();
    let options = GenerateOptions {
        categories: vec![String::from("test_nope")],
        ..Default::default()
    };
    let result = generate(&catalog, &mut oracle, &options);
    assert!(matches!(result, Err(FixtureError::CatalogConfiguration { .. })));
    assert!(oracle.asked.is_empty(), "oracle consulted before the selection failed");
}

#[test]
fn test_generate_oracle_parse_failure_fails_fast() {
    let catalog = catalog();
    let mut oracle = oracle()
        .parse_fails("2003 10:36:28 BRST 25 Sep Thu", "Unknown string format: 2003 10:36:28 BRST 25 Sep Thu");
    let result = generate(&catalog, &mut oracle, &GenerateOptions::default());
    match result {
        Err(FixtureError::OracleParseFailure { category, index, input, message }) => {
            assert_eq!(category, "test_parse_tzinfo");
            assert_eq!(index, 1);
            assert_eq!(input, "2003 10:36:28 BRST 25 Sep Thu");
            assert!(message.starts_with("Unknown string format"));
        }
        other => panic!("expected OracleParseFailure, got {:?}", other.map(|g| g.units.len())),
    }
    // nothing after the failing case was asked
    assert_eq!(oracle.asked.len(), 3);
}

#[test]
fn test_generate_token_violation_fails_fast() {
    let catalog = catalog();
    let mut oracle = oracle().split_as("2018.5.15", &["2018", ".", "5", "..", "15"]);
    let result = generate(&catalog, &mut oracle, &GenerateOptions::default());
    match result {
        Err(FixtureError::TokenClassificationViolation { input, token, .. }) => {
            assert_eq!(input, "2018.5.15");
            assert_eq!(token, "..");
        }
        other => panic!("expected TokenClassificationViolation, got {:?}", other.map(|g| g.units.len())),
    }
    assert_eq!(oracle.asked.len(), 1);
}

#[test]
fn test_generate_error_message_names_case() {
    let catalog = catalog();
    let mut oracle = oracle().parse_fails("I have a meeting on March 1, 1974", "no date");
    let err = generate(&catalog, &mut oracle, &GenerateOptions::default()).err().unwrap();
    let message = err.to_string();
    defo!("{}", message);
    assert!(message.contains("test_fuzzy_simple"), "{}", message);
    assert!(message.contains("I have a meeting on March 1, 1974"), "{}", message);
    assert!(message.contains("no date"), "{}", message);
}
