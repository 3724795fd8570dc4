// src/tests/wire_tests.rs

//! tests for [`src/oracle/wire.rs`]
//!
//! [`src/oracle/wire.rs`]: crate::oracle::wire

#![allow(non_snake_case)]

use ::test_case::test_case;

use crate::data::params::{
    ParameterSet,
    ymd_midnight,
};
use crate::data::parseresult::ParseResult;
use crate::error::FixtureError;
use crate::oracle::wire::{
    FIELD_SEPARATOR,
    ITEM_SEPARATOR,
    Reply,
    decode_items,
    decode_offset,
    decode_parse,
    decode_reply,
    decode_tokens,
    format_baseline,
    hex_decode,
    hex_encode,
    parse_request,
    tokenize_request,
};
use crate::tests::common::strings;

/// join `fields` with the field separator
fn rs(fields: &[&str]) -> String {
    fields.join(&FIELD_SEPARATOR.to_string())
}

/// join `items` with the item separator
fn us(items: &[&str]) -> String {
    items.join(&ITEM_SEPARATOR.to_string())
}

fn assert_protocol_error<T: std::fmt::Debug>(result: Result<T, FixtureError>) {
    assert!(
        matches!(result, Err(FixtureError::OracleProtocol { .. })),
        "expected OracleProtocol, got {:?}", result,
    );
}

#[test_case("", ""; "empty")]
#[test_case("2018", "32303138")]
#[test_case("a b", "612062")]
#[test_case("Mär", "4dc3a472"; "non-ASCII")]
#[test_case("\n", "0a"; "newline")]
fn test_hex_encode_decode(s: &str, hex: &str) {
    assert_eq!(hex_encode(s), hex);
    assert_eq!(hex_decode(hex).unwrap(), s);
}

#[test_case("abc"; "odd length")]
#[test_case("zz"; "not hex")]
#[test_case("ff"; "not UTF-8")]
#[test_case("c3a"; "odd UTF-8")]
fn test_hex_decode_error(hex: &str) {
    assert_protocol_error(hex_decode(hex));
}

#[test]
fn test_tokenize_request() {
    let line = tokenize_request("May 5");
    assert_eq!(line, format!("{}\n", rs(&["T", "4d61792035"])));
}

#[test]
fn test_parse_request_unset() {
    let params = ParameterSet::default();
    let line = parse_request("2003", &params);
    assert_eq!(line, format!("{}\n", rs(&["P", "32303033", "-", "-", "-", "-", "-", "-", "-"])));
}

#[test]
fn test_parse_request_all_set() {
    let params = ParameterSet::builder()
        .day_first(true)
        .year_first(false)
        .fuzzy(true)
        .fuzzy_with_tokens(true)
        .default_baseline(ymd_midnight(2003, 9, 25).unwrap())
        .tz_alias("EST", -18000)
        .tz_alias("BRST", -10800)
        .build("test_x")
        .unwrap();
    let line = parse_request("x", &params);
    let tzinfos = us(&["BRST=-10800", "EST=-18000"]);
    assert_eq!(
        line,
        format!(
            "{}\n",
            rs(&["P", "78", "1", "0", "1", "1", "2003-09-25T00:00:00.000000", "-", tzinfos.as_str()]),
        ),
    );
}

#[test]
fn test_parse_request_ignoretz() {
    let params = ParameterSet::builder()
        .ignore_timezone(true)
        .build("test_x")
        .unwrap();
    let line = parse_request("x", &params);
    assert_eq!(line, format!("{}\n", rs(&["P", "78", "-", "-", "-", "-", "-", "1", "-"])));
}

#[test]
fn test_format_baseline() {
    let baseline = ymd_midnight(2010, 1, 31).unwrap();
    assert_eq!(format_baseline(&baseline), "2010-01-31T00:00:00.000000");
}

#[test]
fn test_decode_reply_ok() {
    let line = format!("{}\n", rs(&["OK", "32303138", "2e"]));
    assert_eq!(decode_reply(&line).unwrap(), Reply::Ok(strings(&["32303138", "2e"])));
}

#[test]
fn test_decode_reply_ok_crlf() {
    let line = format!("{}\r\n", rs(&["OK", "61"]));
    assert_eq!(decode_reply(&line).unwrap(), Reply::Ok(strings(&["61"])));
}

#[test]
fn test_decode_reply_err() {
    let line = rs(&["ERR", &hex_encode("String does not contain a date: x")]);
    assert_eq!(
        decode_reply(&line).unwrap(),
        Reply::Err(String::from("String does not contain a date: x")),
    );
}

#[test_case(""; "empty")]
#[test_case("HELLO"; "unknown")]
#[test_case("Traceback (most recent call last):"; "traceback")]
fn test_decode_reply_unknown(line: &str) {
    assert_protocol_error(decode_reply(line));
}

#[test]
fn test_decode_items() {
    assert_eq!(decode_items("").unwrap(), Vec::<String>::new());
    assert_eq!(decode_items(&us(&["61", "20", "62"])).unwrap(), strings(&["a", " ", "b"]));
    assert_protocol_error(decode_items(&us(&["61", "6"])));
}

#[test]
fn test_decode_tokens() {
    let fields = strings(&[&us(&["32303138", "2e", "35"])]);
    assert_eq!(decode_tokens(&fields).unwrap(), strings(&["2018", ".", "5"]));
    assert_protocol_error(decode_tokens(&strings(&["61", "62"])));
    assert_protocol_error(decode_tokens(&[]));
}

#[test_case("-", Some(None))]
#[test_case("0", Some(Some(0)))]
#[test_case("-10800", Some(Some(-10800)))]
#[test_case("86399", Some(Some(86399)))]
#[test_case("86400", None; "a full day")]
#[test_case("-3600.5", None; "fractional")]
#[test_case("x", None; "not a number")]
fn test_decode_offset(field: &str, expect: Option<Option<i32>>) {
    let result = decode_offset(field);
    match expect {
        Some(offset) => assert_eq!(result.unwrap(), offset),
        None => assert_protocol_error(result),
    }
}

#[test]
fn test_decode_parse() {
    let fields = strings(&["2003", "9", "25", "10", "49", "41", "500000", "-10800", "-"]);
    let parsed = decode_parse(&fields).unwrap();
    assert_eq!(
        parsed.result,
        ParseResult {
            year: 2003,
            month: 9,
            day: 25,
            hour: 10,
            minute: 49,
            second: 41,
            microsecond: 500000,
            utc_offset_seconds: Some(-10800),
        },
    );
    assert_eq!(parsed.leftover_tokens, None);
}

#[test]
fn test_decode_parse_leftover() {
    let leftover = us(&[&hex_encode("Today is "), &hex_encode(" of ")]);
    let fields = strings(&["2003", "9", "25", "10", "49", "41", "0", "-", &leftover]);
    let parsed = decode_parse(&fields).unwrap();
    assert_eq!(parsed.leftover_tokens, Some(strings(&["Today is ", " of "])));
}

#[test]
fn test_decode_parse_leftover_empty() {
    let fields = strings(&["2003", "9", "25", "0", "0", "0", "0", "-", ""]);
    let parsed = decode_parse(&fields).unwrap();
    assert_eq!(parsed.leftover_tokens, Some(Vec::new()));
}

#[test_case(&["2003", "9", "25", "0", "0", "0", "0", "-"]; "too few fields")]
#[test_case(&["2003", "9", "25", "0", "0", "0", "0", "-", "-", "-"]; "too many fields")]
#[test_case(&["2003", "2", "30", "0", "0", "0", "0", "-", "-"]; "impossible date")]
#[test_case(&["2003", "9", "25", "24", "0", "0", "0", "-", "-"]; "impossible hour")]
#[test_case(&["2003", "9", "25", "0", "0", "0", "1000000", "-", "-"]; "microsecond overflow")]
#[test_case(&["year", "9", "25", "0", "0", "0", "0", "-", "-"]; "year not a number")]
#[test_case(&["2003", "9", "25", "0", "0", "0", "0", "100000", "-"]; "offset too large")]
fn test_decode_parse_error(fields: &[&str]) {
    assert_protocol_error(decode_parse(&strings(fields)));
}
