// src/oracle/wire.rs

//! Line protocol spoken with the oracle script `src/python/dateutil_oracle.py`.
//!
//! One request and one reply per line. Fields are separated by
//! [`FIELD_SEPARATOR`], list items by [`ITEM_SEPARATOR`]. Free text is hex
//! encoded UTF-8 so neither separator nor a newline can appear within a field.
//!
//! ```text
//! T␞<hex input>                                   → OK␞<hex token>␟<hex token>…
//! P␞<hex input>␞<dayfirst>␞<yearfirst>␞<fuzzy>␞<fuzzy_with_tokens>␞<default>␞<ignoretz>␞<tzinfos>
//!                                                 → OK␞Y␞M␞D␞h␞m␞s␞us␞<offset|->␞<tokens|->
//! failure                                         → ERR␞<hex message>
//! ```

use std::fmt::Write;

use ::chrono::{
    NaiveDate,
    NaiveDateTime,
    NaiveTime,
};
use ::itertools::Itertools;
#[allow(unused_imports)]
use ::si_trace_print::{
    defn,
    defo,
    defx,
    defñ,
};

use crate::data::params::{
    ParameterSet,
    TZ_OFFSET_MAX_SECONDS,
};
use crate::data::parseresult::{
    OracleParse,
    ParseResult,
};
use crate::error::{
    FixtureError,
    FixtureResult,
};

/// ASCII Record Separator
pub const FIELD_SEPARATOR: char = '\u{1E}';
/// ASCII Unit Separator
pub const ITEM_SEPARATOR: char = '\u{1F}';
/// an unset field
pub const UNSET: &str = "-";

pub const REQUEST_TOKENIZE: &str = "T";
pub const REQUEST_PARSE: &str = "P";
pub const REPLY_OK: &str = "OK";
pub const REPLY_ERR: &str = "ERR";

/// `strftime` format of the default baseline
pub const BASELINE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// count of fields of a parse reply following `OK`
const PARSE_REPLY_FIELDS: usize = 9;

fn protocol_error<T>(message: String) -> FixtureResult<T> {
    defñ!("{}", message);
    Err(FixtureError::OracleProtocol { message })
}

/// lowercase hex of the UTF-8 bytes of `s`
pub fn hex_encode(s: &str) -> String {
    let mut out = String::with_capacity(s.len() * 2);
    for b in s.as_bytes() {
        // writing to a `String` cannot fail
        let _ = write!(out, "{:02x}", b);
    }

    out
}

/// inverse of [`hex_encode`]
pub fn hex_decode(hex: &str) -> FixtureResult<String> {
    if hex.len() % 2 != 0 {
        return protocol_error(format!("hex field {:?} has odd length", hex));
    }
    let mut bytes: Vec<u8> = Vec::with_capacity(hex.len() / 2);
    for pair in hex.as_bytes().chunks(2) {
        let digits: &str = match std::str::from_utf8(pair) {
            Ok(d) => d,
            Err(_) => return protocol_error(format!("hex field {:?} is not ASCII", hex)),
        };
        match u8::from_str_radix(digits, 16) {
            Ok(b) => bytes.push(b),
            Err(_) => return protocol_error(format!("hex field {:?} has non-hex digits {:?}", hex, digits)),
        }
    }
    match String::from_utf8(bytes) {
        Ok(s) => Ok(s),
        Err(err) => protocol_error(format!("hex field {:?} is not UTF-8; {}", hex, err)),
    }
}

fn tristate(value: Option<bool>) -> &'static str {
    match value {
        None => UNSET,
        Some(false) => "0",
        Some(true) => "1",
    }
}

/// `fuzzy`, `fuzzy_with_tokens` and `ignoretz` are only passed to the oracle
/// when set, otherwise the oracle's own default applies
fn flag(value: bool) -> &'static str {
    tristate(if value { Some(true) } else { None })
}

/// request line to split `input`, including the newline
pub fn tokenize_request(input: &str) -> String {
    format!("{}{}{}\n", REQUEST_TOKENIZE, FIELD_SEPARATOR, hex_encode(input))
}

/// request line to parse `input` under `params`, including the newline
pub fn parse_request(input: &str, params: &ParameterSet) -> String {
    let baseline: String = match params.default_baseline() {
        Some(dt) => format_baseline(&dt),
        None => String::from(UNSET),
    };
    let tzinfos: String = if params.tz_aliases().is_empty() {
        String::from(UNSET)
    } else {
        params
            .tz_aliases()
            .iter()
            .map(|(name, offset)| format!("{}={}", name, offset))
            .join(&ITEM_SEPARATOR.to_string())
    };
    let fields: [&str; 9] = [
        REQUEST_PARSE,
        &hex_encode(input),
        tristate(params.day_first()),
        tristate(params.year_first()),
        flag(params.fuzzy()),
        flag(params.fuzzy_with_tokens()),
        &baseline,
        flag(params.ignore_timezone()),
        &tzinfos,
    ];
    let mut line: String = fields.iter().join(&FIELD_SEPARATOR.to_string());
    line.push('\n');

    line
}

/// A decoded reply line.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Reply {
    /// the fields following `OK`
    Ok(Vec<String>),
    /// the decoded failure message following `ERR`
    Err(String),
}

/// decode one reply line, with or without its line ending
pub fn decode_reply(line: &str) -> FixtureResult<Reply> {
    defn!("{:?}", line);
    let line: &str = line.trim_end_matches(['\r', '\n']);
    let mut fields = line.split(FIELD_SEPARATOR);
    let reply = match fields.next() {
        Some(REPLY_OK) => Reply::Ok(fields.map(String::from).collect()),
        Some(REPLY_ERR) => {
            let message: &str = fields.next().unwrap_or("");
            Reply::Err(hex_decode(message)?)
        }
        _ => {
            defx!("unknown reply");
            return protocol_error(format!("unknown reply {:?}", line));
        }
    };
    defx!("{:?}", reply);

    Ok(reply)
}

/// decode a list of hex items; an empty field is an empty list
pub fn decode_items(field: &str) -> FixtureResult<Vec<String>> {
    if field.is_empty() {
        return Ok(Vec::new());
    }
    field.split(ITEM_SEPARATOR).map(hex_decode).collect()
}

/// decode the fields of a tokenize reply
pub fn decode_tokens(fields: &[String]) -> FixtureResult<Vec<String>> {
    match fields {
        [items] => decode_items(items),
        _ => protocol_error(format!("tokenize reply has {} fields, expected 1", fields.len())),
    }
}

fn decode_number<T: std::str::FromStr>(name: &str, field: &str) -> FixtureResult<T> {
    match field.parse::<T>() {
        Ok(n) => Ok(n),
        Err(_) => protocol_error(format!("{} {:?} is not an integer", name, field)),
    }
}

/// decode the UTC offset field; only whole seconds within a day are accepted
pub fn decode_offset(field: &str) -> FixtureResult<Option<i32>> {
    if field == UNSET {
        return Ok(None);
    }
    let offset: i32 = match field.parse::<i32>() {
        Ok(n) => n,
        Err(_) => return protocol_error(format!("UTC offset {:?} is not a whole number of seconds", field)),
    };
    if offset.abs() > TZ_OFFSET_MAX_SECONDS {
        return protocol_error(format!("UTC offset {} is beyond ±{} seconds", offset, TZ_OFFSET_MAX_SECONDS));
    }

    Ok(Some(offset))
}

/// decode the fields of a parse reply
pub fn decode_parse(fields: &[String]) -> FixtureResult<OracleParse> {
    defn!("{:?}", fields);
    if fields.len() != PARSE_REPLY_FIELDS {
        defx!("bad field count");
        return protocol_error(format!(
            "parse reply has {} fields, expected {}", fields.len(), PARSE_REPLY_FIELDS,
        ));
    }
    let result = ParseResult {
        year: decode_number("year", &fields[0])?,
        month: decode_number("month", &fields[1])?,
        day: decode_number("day", &fields[2])?,
        hour: decode_number("hour", &fields[3])?,
        minute: decode_number("minute", &fields[4])?,
        second: decode_number("second", &fields[5])?,
        microsecond: decode_number("microsecond", &fields[6])?,
        utc_offset_seconds: decode_offset(&fields[7])?,
    };
    // the target represents the result as a `NaiveDateTime`
    let date: Option<NaiveDate> = NaiveDate::from_ymd_opt(result.year, result.month, result.day);
    let time: Option<NaiveTime> = NaiveTime::from_hms_micro_opt(
        result.hour, result.minute, result.second, result.microsecond,
    );
    if date.is_none() || time.is_none() {
        defx!("impossible date/time");
        return protocol_error(format!("impossible date/time {}", result));
    }
    let leftover_tokens: Option<Vec<String>> = match fields[8].as_str() {
        UNSET => None,
        items => Some(decode_items(items)?),
    };
    defx!("{}", result);

    Ok(OracleParse { result, leftover_tokens })
}

/// The baseline as the oracle receives it, e.g. `2003-09-25T00:00:00.000000`.
pub fn format_baseline(baseline: &NaiveDateTime) -> String {
    baseline.format(BASELINE_FORMAT).to_string()
}
