// src/catalog/default.rs

//! The catalog of inputs checked against `dateutil`.
//!
//! Only the case lists here should need changing. Inputs are kept in the
//! order they were added, duplicates included, so that fixture names stay
//! stable as the lists grow at the end.

#[allow(unused_imports)]
use ::si_trace_print::{
    defn,
    defx,
};

use crate::catalog::{
    CategoryKind,
    TestCatalog,
    TestCategory,
};
use crate::error::FixtureResult;

pub const SPLIT_STRING: &[&str] = &[
    "2018.5.15",
    "May 5, 2018",
    "Mar. 5, 2018",
    "19990101T23",
    "19990101T2359",
];

pub const PARSE_DEFAULT: &[&str] = &[
    "Thu Sep 25 10:36:28",
    "Sep 10:36:28", "10:36:28", "10:36", "Sep 2003", "Sep", "2003",
    "10h36m28.5s", "10h36m28s", "10h36m", "10h", "10 h 36", "10 h 36.5",
    "36 m 5", "36 m 5 s", "36 m 05", "36 m 05 s", "10h am", "10h pm",
    "10am", "10pm", "10:00 am", "10:00 pm", "10:00am", "10:00pm",
    "10:00a.m", "10:00p.m", "10:00a.m.", "10:00p.m.",
    "October", "31-Dec-00", "0:01:02", "12h 01m02s am", "12:08 PM",
    "01h02m03", "01h02", "01h02s", "01m02", "01m02h", "2004 10 Apr 11h30m",
    // pertain
    "Sep 03", "Sep of 03",
    // hour minute before a day-month-year run
    "02:17NOV2017",
    // weekdays
    "Thu Sep 10:36:28", "Thu 10:36:28", "Wed", "Wednesday",
];

pub const PARSE_SIMPLE: &[&str] = &[
    "Thu Sep 25 10:36:28 2003", "Thu Sep 25 2003", "2003-09-25T10:49:41",
    "2003-09-25T10:49", "2003-09-25T10", "2003-09-25", "20030925T104941",
    "20030925T1049", "20030925T10", "20030925", "2003-09-25 10:49:41,502",
    "199709020908", "19970902090807", "2003-09-25", "09-25-2003",
    "25-09-2003", "10-09-2003", "10-09-03", "2003.09.25", "09.25.2003",
    "25.09.2003", "10.09.2003", "10.09.03", "2003/09/25", "09/25/2003",
    "25/09/2003", "10/09/2003", "10/09/03", "2003 09 25", "09 25 2003",
    "25 09 2003", "10 09 2003", "10 09 03", "25 09 03", "03 25 Sep",
    "25 03 Sep", "  July   4 ,  1976   12:01:02   am  ",
    "Wed, July 10, '96", "1996.July.10 AD 12:08 PM", "July 4, 1976",
    "7 4 1976", "4 jul 1976", "7-4-76", "19760704",
    "0:01:02 on July 4, 1976", "0:01:02 on July 4, 1976",
    "July 4, 1976 12:01:02 am", "Mon Jan  2 04:24:27 1995",
    "04.04.95 00:22", "Jan 1 1999 11:23:34.578", "950404 122212",
    "3rd of May 2001", "5th of March 2001", "1st of May 2003",
    "0099-01-01T00:00:00", "0031-01-01T00:00:00",
    "20080227T21:26:01.123456789", "13NOV2017", "0003-03-04",
    "December.0031.30",
    // neither year first nor day first
    "090107",
    // month name in the last position
    "2015-15-May",
];

pub const PARSE_TZINFO: &[&str] = &[
    "Thu Sep 25 10:36:28 BRST 2003", "2003 10:36:28 BRST 25 Sep Thu",
];

pub const PARSE_OFFSET: &[&str] = &[
    "Thu, 25 Sep 2003 10:49:41 -0300", "2003-09-25T10:49:41.5-03:00",
    "2003-09-25T10:49:41-03:00", "20030925T104941.5-0300",
    "20030925T104941-0300",
];

pub const PARSE_DAYFIRST: &[&str] = &[
    "10-09-2003", "10.09.2003", "10/09/2003", "10 09 2003",
    "090107",
    // unambiguous
    "2015 09 25",
];

pub const PARSE_YEARFIRST: &[&str] = &[
    "10-09-03", "10.09.03", "10/09/03", "10 09 03",
    "090107",
    // unambiguous
    "2015 09 25",
];

pub const PARSE_DFYF: &[&str] = &[
    "090107",
    // unambiguous
    "2015 09 25",
];

pub const UNSPECIFIED_FALLBACK: &[&str] = &[
    "April 2009", "Feb 2007", "Feb 2008",
];

pub const PARSE_IGNORETZ: &[&str] = &[
    "Thu Sep 25 10:36:28 BRST 2003", "1996.07.10 AD at 15:08:56 PDT",
    "Tuesday, April 12, 1952 AD 3:30:42pm PST",
    "November 5, 1994, 8:15:30 am EST", "1994-11-05T08:15:30-05:00",
    "1994-11-05T08:15:30Z", "1976-07-04T00:01:02Z",
    "Tue Apr 4 00:22:12 PDT 1995",
];

pub const FUZZY_TZINFO: &[&str] = &[
    "Today is 25 of September of 2003, exactly at 10:49:41 with timezone -03:00.",
];

pub const FUZZY_TOKENS_TZINFO: &[&str] = &[
    "Today is 25 of September of 2003, exactly at 10:49:41 with timezone -03:00.",
];

pub const FUZZY_SIMPLE: &[&str] = &[
    // AM/PM words away from the time
    "I have a meeting on March 1, 1974",
    "On June 8th, 2020, I am going to be the first man on Mars",
    "Meet me at the AM/PM on Sunset at 3:00 AM on December 3rd, 2003",
    "Meet me at 3:00 AM on December 3rd, 2003 at the AM/PM on Sunset",
    // AM after a 24-hour time is ignored
    "Jan 29, 1945 14:45 AM I going to see you there?",
    // trailing separator
    "2017-07-17 06:15:",
];

/// Known divergences between `dateutil` and the parser under test go here.
/// These fixtures are generated but do not gate the build.
pub const PARSE_DEFAULT_IGNORE: &[&str] = &[];

/// The catalog in declaration order.
pub fn default_catalog() -> FixtureResult<TestCatalog> {
    defn!();
    let declarations: [(&str, CategoryKind, &[&str]); 14] = [
        ("test_split_string", CategoryKind::Tokenize, SPLIT_STRING),
        ("test_parse_default", CategoryKind::Default, PARSE_DEFAULT),
        ("test_parse_simple", CategoryKind::Simple, PARSE_SIMPLE),
        ("test_parse_tzinfo", CategoryKind::Tzinfo, PARSE_TZINFO),
        ("test_parse_offset", CategoryKind::Offset, PARSE_OFFSET),
        ("test_parse_dayfirst", CategoryKind::DayFirst, PARSE_DAYFIRST),
        ("test_parse_yearfirst", CategoryKind::YearFirst, PARSE_YEARFIRST),
        ("test_parse_dfyf", CategoryKind::DayFirstYearFirst, PARSE_DFYF),
        ("test_unspecified_fallback", CategoryKind::UnspecifiedFallback, UNSPECIFIED_FALLBACK),
        ("test_parse_ignoretz", CategoryKind::IgnoreTz, PARSE_IGNORETZ),
        ("test_fuzzy_tzinfo", CategoryKind::Fuzzy, FUZZY_TZINFO),
        ("test_fuzzy_tokens_tzinfo", CategoryKind::FuzzyWithTokens, FUZZY_TOKENS_TZINFO),
        ("test_fuzzy_simple", CategoryKind::Fuzzy, FUZZY_SIMPLE),
        ("test_parse_default_ignore", CategoryKind::DefaultIgnore, PARSE_DEFAULT_IGNORE),
    ];
    let mut catalog = TestCatalog::new();
    for (name, kind, cases) in declarations.into_iter() {
        catalog.push(TestCategory::new(name, kind, cases)?)?;
    }
    defx!("{} categories, {} cases", catalog.len(), catalog.case_count());

    Ok(catalog)
}
