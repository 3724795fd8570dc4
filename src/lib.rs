// src/lib.rs

//! _pycompatlib_ generates conformance test fixtures for a Rust port of
//! Python's `dateutil` parser and tokenizer.
//!
//! The pipeline, leaf-first:
//!
//! * [`oracle`] asks the reference `dateutil` to tokenize or parse each input
//! * [`catalog`] declares the categories of inputs and their parameters
//! * [`emitter`] renders one `#[test]` function per case
//! * [`generator`] drives the catalog through the oracles and the emitter
//! * [`writer`] persists the emitted fixtures
//!
//! The oracle is hosted by [`python`].

pub mod catalog;
pub mod common;
pub mod data;
pub mod debug;
pub mod emitter;
pub mod error;
pub mod generator;
pub mod oracle;
pub mod python;
#[cfg(test)]
pub mod tests;
pub mod writer;
