// src/emitter/mod.rs

//! The fixture emitter turns the oracle outcomes of one category into a
//! [`TestUnit`]: one independently named test function per case.
//!
//! Emission is a pure function of its inputs. The same outcomes always
//! produce byte-identical text.

pub mod escape;
pub mod header;
pub mod ir;
pub mod render;

use std::collections::BTreeSet;

#[allow(unused_imports)]
use ::si_trace_print::{
    defn,
    defo,
    defx,
    defñ,
};

use crate::catalog::{
    Invocation,
    OracleUse,
    TestCategory,
};
use crate::data::parseresult::CaseOutcome;
use crate::error::{
    FixtureError,
    FixtureResult,
};
use crate::emitter::ir::Fixture;
use crate::emitter::render::render_fixture;

/// default Rust path of the crate under test, as seen from the fixtures
pub const TARGET_PATH_DEFAULT: &str = "crate";

/// Settings of the emitted code.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EmitConfig {
    /// Rust path that provides `Parser`, `ParserInfo`, `parse` and `tokenize`
    pub target_path: String,
}

impl Default for EmitConfig {
    fn default() -> Self {
        EmitConfig {
            target_path: String::from(TARGET_PATH_DEFAULT),
        }
    }
}

/// The emitted fixtures of one category.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TestUnit {
    pub category: String,
    pub skip: bool,
    /// paths to `use`, e.g. `chrono::Datelike`
    pub imports: BTreeSet<String>,
    /// the fixtures compare against a `PyDateTime`
    pub needs_py_datetime: bool,
    /// the rendered test functions
    pub text: String,
}

/// Emits [`TestUnit`]s.
#[derive(Clone, Debug, Default)]
pub struct Emitter {
    config: EmitConfig,
}

impl Emitter {
    pub fn new(config: EmitConfig) -> Emitter {
        Emitter { config }
    }

    pub fn config(&self) -> &EmitConfig {
        &self.config
    }

    /// the imports the fixtures of `category` need
    fn imports(&self, category: &TestCategory) -> BTreeSet<String> {
        let target: &str = self.config.target_path.as_str();
        let mut imports: BTreeSet<String> = BTreeSet::new();
        if category.cases().is_empty() {
            return imports;
        }
        match category.kind().handler().invocation {
            Invocation::Tokenize => {
                imports.insert(format!("{}::tokenize", target));
            }
            Invocation::TopLevel => {
                imports.insert(String::from("chrono::Datelike"));
                imports.insert(String::from("chrono::Timelike"));
                imports.insert(format!("{}::parse", target));
            }
            Invocation::Parser => {
                imports.insert(String::from("chrono::Datelike"));
                imports.insert(String::from("chrono::Timelike"));
                imports.insert(String::from("std::collections::HashMap"));
                imports.insert(format!("{}::Parser", target));
                imports.insert(format!("{}::ParserInfo", target));
                if category.parameters().default_baseline().is_some() {
                    imports.insert(String::from("chrono::NaiveDate"));
                }
            }
        }

        imports
    }

    /// Emit the fixtures of `category`.
    ///
    /// `results` holds, in case order, each input with its oracle outcome.
    /// It must pair one-to-one with the cases of `category`, and each outcome
    /// must come from the oracle serving the category.
    pub fn emit(
        &self,
        category: &TestCategory,
        results: Vec<(String, CaseOutcome)>,
    ) -> FixtureResult<TestUnit> {
        defn!("{:?} {} results", category.name(), results.len());
        let mismatch = |message: String| {
            defx!("{}", message);
            Err(FixtureError::CatalogConfiguration {
                category: category.name().to_string(),
                message,
            })
        };
        if results.len() != category.cases().len() {
            return mismatch(format!(
                "{} results for {} cases", results.len(), category.cases().len(),
            ));
        }
        let handler = category.kind().handler();

        let mut text = String::with_capacity(results.len() * 1024 + 64);
        text.push_str(&format!(
            "\n// {} ({}{})\n",
            category.name(),
            category.kind().slug(),
            if category.skip() { ", ignored" } else { "" },
        ));
        for (index, ((input, outcome), case)) in results.into_iter().zip(category.cases()).enumerate() {
            if input != *case {
                return mismatch(format!("result {} is for input {:?}, not {:?}", index, input, case));
            }
            let from_tokenizer: bool = matches!(outcome, CaseOutcome::Tokens(_));
            if from_tokenizer != (handler.oracle == OracleUse::Tokenizer) {
                return mismatch(format!("result {} is not from the {:?} oracle", index, handler.oracle));
            }
            let fixture = Fixture::new(
                category.fixture_name(index),
                category.skip(),
                &input,
                handler.invocation,
                category.parameters(),
                outcome,
            );
            defo!("fixture {:?}", fixture.name);
            text.push_str(&render_fixture(&fixture));
        }

        let unit = TestUnit {
            category: category.name().to_string(),
            skip: category.skip(),
            imports: self.imports(category),
            needs_py_datetime: handler.oracle == OracleUse::Parser && !category.cases().is_empty(),
            text,
        };
        defx!("{} bytes", unit.text.len());

        Ok(unit)
    }
}
