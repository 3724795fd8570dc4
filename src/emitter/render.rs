// src/emitter/render.rs

//! Serialize a [`Fixture`] into Rust test source text.
//!
//! All formatting decisions live here: 4-space indentation, `\n` line
//! endings, one blank line before each test function.

use crate::data::parseresult::ParseResult;
use crate::data::token::Token;
use crate::emitter::escape::rust_str_literal;
use crate::emitter::ir::{
    BIND_ACTUAL,
    BIND_EXPECTED,
    BIND_EXPECTED_TOKENS,
    BIND_INPUT,
    Expected,
    FieldAssertion,
    Fixture,
};

/// one level of indentation
pub const INDENT: &str = "    ";

/// Render one fixture as a test function, preceded by a blank line.
pub fn render_fixture(fixture: &Fixture) -> String {
    let mut out = String::with_capacity(1024);
    out.push('\n');
    out.push_str("#[test]\n");
    if fixture.skip {
        out.push_str("#[ignore]\n");
    }
    line(&mut out, 0, &format!("fn {}() {{", fixture.name));
    line(&mut out, 1, &format!("let {} = {};", BIND_INPUT, rust_str_literal(&fixture.input)));
    render_expected(&mut out, &fixture.expected);
    for statement in fixture.setup.iter() {
        line(&mut out, 1, statement);
    }
    if fixture.fallible {
        line(&mut out, 1, &format!("let {} = {}", BIND_ACTUAL, fixture.invocation));
        line(
            &mut out,
            2,
            &format!(
                ".unwrap_or_else(|e| panic!(\"Unable to parse date in Rust '{{}}': {{:?}}\", {}, e));",
                BIND_INPUT,
            ),
        );
    } else {
        line(&mut out, 1, &format!("let {} = {};", BIND_ACTUAL, fixture.invocation));
    }
    for assertion in fixture.assertions.iter() {
        line(&mut out, 1, &render_assertion(assertion));
    }
    line(&mut out, 0, "}");

    out
}

fn line(out: &mut String, depth: usize, text: &str) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
    out.push_str(text);
    out.push('\n');
}

fn render_assertion(assertion: &FieldAssertion) -> String {
    format!(
        "assert_eq!({}, {}, \"{} mismatch for '{{}}'\", {});",
        assertion.expected, assertion.actual, assertion.label, BIND_INPUT,
    )
}

fn render_expected(out: &mut String, expected: &Expected) {
    match expected {
        Expected::DateTime { result, leftover_tokens } => {
            render_datetime(out, result);
            if let Some(tokens) = leftover_tokens {
                render_leftover(out, tokens);
            }
        }
        Expected::Tokens(tokens) => render_tokens(out, tokens),
    }
}

fn render_datetime(out: &mut String, result: &ParseResult) {
    let tzo: String = match result.utc_offset_seconds {
        Some(offset) => format!("Some({})", offset),
        None => String::from("None"),
    };
    line(out, 1, &format!("let {} = PyDateTime {{", BIND_EXPECTED));
    line(out, 2, &format!("year: {}, month: {}, day: {},", result.year, result.month, result.day));
    line(out, 2, &format!("hour: {}, minute: {}, second: {},", result.hour, result.minute, result.second));
    line(out, 2, &format!("micros: {}, tzo: {},", result.microsecond, tzo));
    line(out, 1, "};");
}

fn render_leftover(out: &mut String, tokens: &[String]) {
    if tokens.is_empty() {
        line(out, 1, &format!("let {}: [&str; 0] = [];", BIND_EXPECTED_TOKENS));
        return;
    }
    line(out, 1, &format!("let {}: [&str; {}] = [", BIND_EXPECTED_TOKENS, tokens.len()));
    for token in tokens.iter() {
        line(out, 2, &format!("{},", rust_str_literal(token)));
    }
    line(out, 1, "];");
}

fn render_tokens(out: &mut String, tokens: &[Token]) {
    if tokens.is_empty() {
        line(out, 1, &format!("let {}: [&str; 0] = [];", BIND_EXPECTED));
        return;
    }
    line(out, 1, &format!("let {}: [&str; {}] = [", BIND_EXPECTED, tokens.len()));
    for token in tokens.iter() {
        line(out, 2, &format!("{}, // {}", rust_str_literal(token.text()), token.kind()));
    }
    line(out, 1, "];");
}
