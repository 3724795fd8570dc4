// src/emitter/header.rs

//! Assemble [`TestUnit`]s into one source file: a banner, the imports the
//! units need, the expected-value struct, then the units in order.

use std::collections::BTreeSet;

use crate::emitter::TestUnit;
use crate::emitter::render::INDENT;

/// first lines of every emitted file
pub const BANNER: &str = "\
// WARNING
// This file was generated by `pycompat` from the output of python-dateutil.
// Please do not edit it manually.
";

/// the fields of the expected value of a parser fixture
const PY_DATETIME_FIELDS: [(&str, &str); 8] = [
    ("year", "i32"),
    ("month", "u32"),
    ("day", "u32"),
    ("hour", "u32"),
    ("minute", "u32"),
    ("second", "u32"),
    ("micros", "u32"),
    ("tzo", "Option<i32>"),
];

/// the `PyDateTime` struct declaration
pub fn py_datetime_struct() -> String {
    let mut out = String::from("struct PyDateTime {\n");
    for (name, type_) in PY_DATETIME_FIELDS.iter() {
        out.push_str(INDENT);
        out.push_str(&format!("{}: {},\n", name, type_));
    }
    out.push_str("}\n");

    out
}

/// Render a complete source file of `units`.
///
/// Imports are the sorted union of what the units need. The `PyDateTime`
/// struct is only declared when a unit compares date/times.
pub fn render_file(units: &[TestUnit]) -> String {
    let imports: BTreeSet<&str> = units
        .iter()
        .flat_map(|u| u.imports.iter().map(String::as_str))
        .collect();
    let needs_py_datetime: bool = units.iter().any(|u| u.needs_py_datetime);

    let mut out = String::from(BANNER);
    if !imports.is_empty() {
        out.push('\n');
        for import in imports.iter() {
            out.push_str(&format!("use {};\n", import));
        }
    }
    if needs_py_datetime {
        out.push('\n');
        out.push_str(&py_datetime_struct());
    }
    for unit in units.iter() {
        out.push_str(&unit.text);
    }

    out
}
