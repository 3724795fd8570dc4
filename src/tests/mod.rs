// src/tests/mod.rs

//! Tests for _pycompatlib_.
//!
//! Tests are placed at `src/tests/`, inside the `pycompatlib`. The author
//! concluded this is a reasonable trade-off of separation and access.
//!
//! Tests placed at top-level path `tests/` do not have crate-internal
//! visibility. While it is recommended to not require internal visibility for
//! testing, in practice that often makes tests difficult or impossible to
//! implement.
//!
//! Tests that run a Python interpreter are `#[ignore]`d, run them with
//! `cargo test -- --ignored`.

pub mod common;
pub mod dateutil_tests;
pub mod generator_tests;
pub mod venv_tests;
pub mod wire_tests;
pub mod writer_tests;
