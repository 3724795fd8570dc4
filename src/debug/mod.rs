// src/debug/mod.rs

//! The `debug` module is functions and macros for printing in debug builds
//! and test builds, and a few macros for printing errors for the user.

pub mod printers;
