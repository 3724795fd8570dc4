// src/generator/mod.rs

//! Drive the oracles over the catalog and emit the fixtures.
//!
//! Categories, and cases within a category, are processed strictly in
//! declaration order. The first failure ends the run and no units are
//! returned, so a partial fixture set is never produced.

pub mod summary;

use std::time::Instant;

#[allow(unused_imports)]
use ::si_trace_print::{
    defn,
    defo,
    defx,
    defñ,
};

use crate::catalog::{
    OracleUse,
    TestCatalog,
    TestCategory,
};
use crate::data::parseresult::CaseOutcome;
use crate::emitter::{
    EmitConfig,
    Emitter,
    TestUnit,
};
use crate::error::{
    FixtureError,
    FixtureResult,
};
use crate::generator::summary::{
    CategorySummary,
    Summary,
};
use crate::oracle::{
    self,
    ParserOracle,
    TokenizerOracle,
};

/// Options of one run.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct GenerateOptions {
    /// category names or kind slugs to generate; empty is all
    pub categories: Vec<String>,
    pub emit: EmitConfig,
}

/// The units of a successful run, in catalog order.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Generated {
    pub units: Vec<TestUnit>,
    pub summary: Summary,
}

/// Ask the oracle about every case of `category`.
fn consult<O>(category: &TestCategory, oracle: &mut O) -> FixtureResult<Vec<(String, CaseOutcome)>>
where
    O: TokenizerOracle + ParserOracle,
{
    defn!("{:?}", category.name());
    let use_: OracleUse = category.kind().handler().oracle;
    let mut results: Vec<(String, CaseOutcome)> = Vec::with_capacity(category.cases().len());
    for (index, input) in category.cases().iter().enumerate() {
        defo!("case {}{} {:?}", category.name(), index, input);
        let outcome: CaseOutcome = match use_ {
            OracleUse::Tokenizer => CaseOutcome::Tokens(oracle::tokenize(oracle, input)?),
            OracleUse::Parser => {
                match oracle::parse(oracle, input, category.parameters())? {
                    Ok(parsed) => CaseOutcome::Parsed(parsed),
                    Err(message) => {
                        defx!("parse failure at {}", index);
                        return Err(FixtureError::OracleParseFailure {
                            category: category.name().to_string(),
                            index,
                            input: input.clone(),
                            message,
                        });
                    }
                }
            }
        };
        results.push((input.clone(), outcome));
    }
    defx!("{} results", results.len());

    Ok(results)
}

/// Generate the fixtures of the categories of `catalog` selected by
/// `options`.
pub fn generate<O>(catalog: &TestCatalog, oracle: &mut O, options: &GenerateOptions) -> FixtureResult<Generated>
where
    O: TokenizerOracle + ParserOracle,
{
    defn!("{} categories, selectors {:?}", catalog.len(), options.categories);
    let start: Instant = Instant::now();
    let selected: TestCatalog = catalog.select(&options.categories)?;
    let emitter = Emitter::new(options.emit.clone());

    let mut units: Vec<TestUnit> = Vec::with_capacity(selected.len());
    let mut summary = Summary::default();
    for category in selected.iter() {
        let results = consult(category, oracle)?;
        summary.oracle_requests += results.len() as u64;
        let unit: TestUnit = emitter.emit(category, results)?;
        summary.emitted_bytes += unit.text.len();
        summary.categories.push(CategorySummary {
            name: category.name().to_string(),
            kind: category.kind().slug(),
            cases: category.cases().len(),
            skip: category.skip(),
        });
        units.push(unit);
    }
    summary.elapsed = start.elapsed();
    defx!("{} units", units.len());

    Ok(Generated { units, summary })
}
