// src/data/mod.rs

//! The data model shared by the oracles, the catalog, and the emitter.
//!
//! * a [`Token`] is one classified lexical unit of an input string
//! * a [`ParameterSet`] holds the fixed parsing configuration of a category
//! * a [`ParseResult`] and [`OracleParse`] hold what the parser oracle derived
//!
//! [`Token`]: crate::data::token::Token
//! [`ParameterSet`]: crate::data::params::ParameterSet
//! [`ParseResult`]: crate::data::parseresult::ParseResult
//! [`OracleParse`]: crate::data::parseresult::OracleParse

pub mod params;
pub mod parseresult;
pub mod token;
