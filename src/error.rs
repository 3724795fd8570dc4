// src/error.rs

//! The error taxonomy of fixture generation.
//!
//! None of these errors are recovered locally. Each propagates to the driver
//! which terminates the run without writing any fixtures.

use std::fmt;
use std::io::Error;

use crate::common::FPath;
use crate::debug::printers::str_to_String_noraw;

#[derive(Debug)]
pub enum FixtureError {
    /// The parser oracle could not derive a date/time for a case.
    OracleParseFailure {
        category: String,
        index: usize,
        input: String,
        message: String,
    },
    /// A token returned by the tokenizer oracle is not Alpha, Numeric,
    /// or a single-character Separator.
    TokenClassificationViolation {
        input: String,
        token: String,
        reason: &'static str,
    },
    /// An invalid declaration in the catalog, detected before any oracle
    /// invocation.
    CatalogConfiguration {
        category: String,
        message: String,
    },
    /// The oracle replied with something that does not follow the
    /// wire protocol.
    OracleProtocol {
        message: String,
    },
    /// The oracle process could not be started or died.
    OracleProcess(Error),
    /// Writing fixtures failed.
    Write {
        path: FPath,
        source: Error,
    },
}

impl fmt::Display for FixtureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FixtureError::OracleParseFailure { category, index, input, message } => {
                write!(
                    f,
                    "oracle failed to parse case {}{} input {:?}: {}",
                    category, index, input, message,
                )
            }
            FixtureError::TokenClassificationViolation { input, token, reason } => {
                write!(
                    f,
                    "oracle token {:?} of input {:?} cannot be classified: {}",
                    token, input, reason,
                )
            }
            FixtureError::CatalogConfiguration { category, message } => {
                write!(f, "invalid catalog category {:?}: {}", category, message)
            }
            FixtureError::OracleProtocol { message } => {
                write!(f, "oracle protocol error: {}", str_to_String_noraw(message))
            }
            FixtureError::OracleProcess(err) => {
                write!(f, "oracle process error: {}", err)
            }
            FixtureError::Write { path, source } => {
                write!(f, "failed to write fixtures to {:?}: {}", path, source)
            }
        }
    }
}

impl std::error::Error for FixtureError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FixtureError::OracleProcess(err) => Some(err),
            FixtureError::Write { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<Error> for FixtureError {
    fn from(err: Error) -> Self {
        FixtureError::OracleProcess(err)
    }
}

pub type FixtureResult<T> = std::result::Result<T, FixtureError>;
