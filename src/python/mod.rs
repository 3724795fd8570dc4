// src/python/mod.rs

//! Host for the Python `dateutil` oracle: find a Python interpreter, run it
//! as a child process, and create a virtual environment with `dateutil`
//! installed.

pub mod pyrunner;
pub mod venv;

/// the oracle program, passed to the interpreter with `-c`.
/// Passing `--self-check` runs a quick check of `dateutil` then exits.
pub const ORACLE_SCRIPT: &str = include_str!("dateutil_oracle.py");

/// Python package providing the oracle
pub const ORACLE_PACKAGE: &str = "python-dateutil";
