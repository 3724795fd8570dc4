// src/catalog/mod.rs

//! The test catalog: an ordered registry of named categories, each bound to a
//! [`CategoryKind`], a [`ParameterSet`], and an ordered list of input strings.
//!
//! Declaration order is significant. It drives the order of oracle
//! invocations and of the emitted fixtures, and the fixture names
//! (`<category name><zero-based index>`).
//!
//! Each `CategoryKind` resolves statically to a [`CategoryHandler`] that
//! names which oracle serves the category, how the implementation under test
//! is invoked, the kind's parameter set, and whether fixtures gate the build.

pub mod default;

use ::chrono::NaiveDateTime;
use ::phf::{
    phf_map,
    phf_set,
};
#[allow(unused_imports)]
use ::si_trace_print::{
    defn,
    defo,
    defx,
    defñ,
};

use crate::data::params::{
    ParameterSet,
    ymd_midnight,
};
use crate::error::{
    FixtureError,
    FixtureResult,
};

/// baseline used by the `default` and `default-ignore` kinds
pub const BASELINE_DEFAULT: (i32, u32, u32) = (2003, 9, 25);
/// baseline used by the `unspecified-fallback` kind
pub const BASELINE_FALLBACK: (i32, u32, u32) = (2010, 1, 31);
/// timezone alias used by the `tzinfo` kind
pub const TZ_ALIAS_BRST: (&str, i32) = ("BRST", -10800);

/// Which oracle serves a category.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum OracleUse {
    Tokenizer,
    Parser,
}

/// How an emitted fixture invokes the implementation under test.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Invocation {
    /// `tokenize(s)`
    Tokenize,
    /// top-level `parse(s)`, the parser's own defaults for unset fields
    TopLevel,
    /// `Parser::parse(s, …)` with every parameter spelled out
    Parser,
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum CategoryKind {
    Tokenize,
    Default,
    Simple,
    Tzinfo,
    Offset,
    DayFirst,
    YearFirst,
    DayFirstYearFirst,
    UnspecifiedFallback,
    IgnoreTz,
    DefaultIgnore,
    Fuzzy,
    FuzzyWithTokens,
}

/// Static handler of a [`CategoryKind`].
#[derive(Clone, Copy, Debug)]
pub struct CategoryHandler {
    pub oracle: OracleUse,
    pub invocation: Invocation,
    /// fixtures are generated but do not gate build success
    pub skip: bool,
    parameters: fn(&str) -> FixtureResult<ParameterSet>,
}

impl CategoryHandler {
    /// The parameter set of the kind, validated for category `name`.
    pub fn parameters(&self, name: &str) -> FixtureResult<ParameterSet> {
        (self.parameters)(name)
    }
}

fn baseline(ymd: (i32, u32, u32), category: &str) -> FixtureResult<NaiveDateTime> {
    match ymd_midnight(ymd.0, ymd.1, ymd.2) {
        Some(dt) => Ok(dt),
        None => Err(FixtureError::CatalogConfiguration {
            category: category.to_string(),
            message: format!("impossible baseline date {:?}", ymd),
        }),
    }
}

fn params_none(name: &str) -> FixtureResult<ParameterSet> {
    ParameterSet::builder().build(name)
}

fn params_default(name: &str) -> FixtureResult<ParameterSet> {
    ParameterSet::builder()
        .default_baseline(baseline(BASELINE_DEFAULT, name)?)
        .build(name)
}

fn params_tzinfo(name: &str) -> FixtureResult<ParameterSet> {
    ParameterSet::builder()
        .tz_alias(TZ_ALIAS_BRST.0, TZ_ALIAS_BRST.1)
        .build(name)
}

fn params_dayfirst(name: &str) -> FixtureResult<ParameterSet> {
    ParameterSet::builder().day_first(true).build(name)
}

fn params_yearfirst(name: &str) -> FixtureResult<ParameterSet> {
    ParameterSet::builder().year_first(true).build(name)
}

fn params_dfyf(name: &str) -> FixtureResult<ParameterSet> {
    ParameterSet::builder()
        .day_first(true)
        .year_first(true)
        .build(name)
}

fn params_fallback(name: &str) -> FixtureResult<ParameterSet> {
    ParameterSet::builder()
        .default_baseline(baseline(BASELINE_FALLBACK, name)?)
        .build(name)
}

fn params_ignoretz(name: &str) -> FixtureResult<ParameterSet> {
    ParameterSet::builder().ignore_timezone(true).build(name)
}

fn params_fuzzy(name: &str) -> FixtureResult<ParameterSet> {
    ParameterSet::builder().fuzzy(true).build(name)
}

fn params_fuzzy_tokens(name: &str) -> FixtureResult<ParameterSet> {
    ParameterSet::builder()
        .fuzzy(true)
        .fuzzy_with_tokens(true)
        .build(name)
}

const fn handler(
    oracle: OracleUse,
    invocation: Invocation,
    skip: bool,
    parameters: fn(&str) -> FixtureResult<ParameterSet>,
) -> CategoryHandler {
    CategoryHandler { oracle, invocation, skip, parameters }
}

static HANDLER_TOKENIZE: CategoryHandler =
    handler(OracleUse::Tokenizer, Invocation::Tokenize, false, params_none);
static HANDLER_DEFAULT: CategoryHandler =
    handler(OracleUse::Parser, Invocation::Parser, false, params_default);
static HANDLER_SIMPLE: CategoryHandler =
    handler(OracleUse::Parser, Invocation::TopLevel, false, params_none);
static HANDLER_TZINFO: CategoryHandler =
    handler(OracleUse::Parser, Invocation::Parser, false, params_tzinfo);
static HANDLER_OFFSET: CategoryHandler =
    handler(OracleUse::Parser, Invocation::Parser, false, params_none);
static HANDLER_DAYFIRST: CategoryHandler =
    handler(OracleUse::Parser, Invocation::Parser, false, params_dayfirst);
static HANDLER_YEARFIRST: CategoryHandler =
    handler(OracleUse::Parser, Invocation::Parser, false, params_yearfirst);
static HANDLER_DFYF: CategoryHandler =
    handler(OracleUse::Parser, Invocation::Parser, false, params_dfyf);
static HANDLER_FALLBACK: CategoryHandler =
    handler(OracleUse::Parser, Invocation::Parser, false, params_fallback);
static HANDLER_IGNORETZ: CategoryHandler =
    handler(OracleUse::Parser, Invocation::Parser, false, params_ignoretz);
static HANDLER_DEFAULT_IGNORE: CategoryHandler =
    handler(OracleUse::Parser, Invocation::Parser, true, params_default);
static HANDLER_FUZZY: CategoryHandler =
    handler(OracleUse::Parser, Invocation::Parser, false, params_fuzzy);
static HANDLER_FUZZY_TOKENS: CategoryHandler =
    handler(OracleUse::Parser, Invocation::Parser, false, params_fuzzy_tokens);

/// kind slug to `CategoryKind`
static KIND_SLUGS: phf::Map<&'static str, CategoryKind> = phf_map! {
    "tokenize" => CategoryKind::Tokenize,
    "default" => CategoryKind::Default,
    "simple" => CategoryKind::Simple,
    "tzinfo" => CategoryKind::Tzinfo,
    "offset" => CategoryKind::Offset,
    "dayfirst" => CategoryKind::DayFirst,
    "yearfirst" => CategoryKind::YearFirst,
    "dayfirst+yearfirst" => CategoryKind::DayFirstYearFirst,
    "unspecified-fallback" => CategoryKind::UnspecifiedFallback,
    "ignoretz" => CategoryKind::IgnoreTz,
    "default-ignore" => CategoryKind::DefaultIgnore,
    "fuzzy" => CategoryKind::Fuzzy,
    "fuzzy-with-tokens" => CategoryKind::FuzzyWithTokens,
};

impl CategoryKind {
    pub const ALL: [CategoryKind; 13] = [
        CategoryKind::Tokenize,
        CategoryKind::Default,
        CategoryKind::Simple,
        CategoryKind::Tzinfo,
        CategoryKind::Offset,
        CategoryKind::DayFirst,
        CategoryKind::YearFirst,
        CategoryKind::DayFirstYearFirst,
        CategoryKind::UnspecifiedFallback,
        CategoryKind::IgnoreTz,
        CategoryKind::DefaultIgnore,
        CategoryKind::Fuzzy,
        CategoryKind::FuzzyWithTokens,
    ];

    pub fn handler(&self) -> &'static CategoryHandler {
        match self {
            CategoryKind::Tokenize => &HANDLER_TOKENIZE,
            CategoryKind::Default => &HANDLER_DEFAULT,
            CategoryKind::Simple => &HANDLER_SIMPLE,
            CategoryKind::Tzinfo => &HANDLER_TZINFO,
            CategoryKind::Offset => &HANDLER_OFFSET,
            CategoryKind::DayFirst => &HANDLER_DAYFIRST,
            CategoryKind::YearFirst => &HANDLER_YEARFIRST,
            CategoryKind::DayFirstYearFirst => &HANDLER_DFYF,
            CategoryKind::UnspecifiedFallback => &HANDLER_FALLBACK,
            CategoryKind::IgnoreTz => &HANDLER_IGNORETZ,
            CategoryKind::DefaultIgnore => &HANDLER_DEFAULT_IGNORE,
            CategoryKind::Fuzzy => &HANDLER_FUZZY,
            CategoryKind::FuzzyWithTokens => &HANDLER_FUZZY_TOKENS,
        }
    }

    pub const fn slug(&self) -> &'static str {
        match self {
            CategoryKind::Tokenize => "tokenize",
            CategoryKind::Default => "default",
            CategoryKind::Simple => "simple",
            CategoryKind::Tzinfo => "tzinfo",
            CategoryKind::Offset => "offset",
            CategoryKind::DayFirst => "dayfirst",
            CategoryKind::YearFirst => "yearfirst",
            CategoryKind::DayFirstYearFirst => "dayfirst+yearfirst",
            CategoryKind::UnspecifiedFallback => "unspecified-fallback",
            CategoryKind::IgnoreTz => "ignoretz",
            CategoryKind::DefaultIgnore => "default-ignore",
            CategoryKind::Fuzzy => "fuzzy",
            CategoryKind::FuzzyWithTokens => "fuzzy-with-tokens",
        }
    }

    pub fn from_slug(slug: &str) -> Option<CategoryKind> {
        KIND_SLUGS.get(slug).copied()
    }
}

/// One named category of the catalog.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TestCategory {
    name: String,
    kind: CategoryKind,
    parameters: ParameterSet,
    cases: Vec<String>,
    skip: bool,
}

impl TestCategory {
    /// Create a category using the parameter set and skip flag of `kind`.
    pub fn new(name: &str, kind: CategoryKind, cases: &[&str]) -> FixtureResult<TestCategory> {
        let parameters: ParameterSet = kind.handler().parameters(name)?;

        TestCategory::with_parameters(name, kind, parameters, cases)
    }

    /// Create a category with an explicit parameter set.
    pub fn with_parameters(
        name: &str,
        kind: CategoryKind,
        parameters: ParameterSet,
        cases: &[&str],
    ) -> FixtureResult<TestCategory> {
        defn!("{:?} {:?} {} cases", name, kind, cases.len());
        let category = TestCategory {
            name: name.to_string(),
            kind,
            parameters,
            cases: cases.iter().map(|s| s.to_string()).collect(),
            skip: kind.handler().skip,
        };
        category.validate()?;
        defx!();

        Ok(category)
    }

    /// Override whether the fixtures gate build success.
    pub fn set_skip(mut self, skip: bool) -> TestCategory {
        self.skip = skip;
        self
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub const fn kind(&self) -> CategoryKind {
        self.kind
    }

    pub const fn parameters(&self) -> &ParameterSet {
        &self.parameters
    }

    pub fn cases(&self) -> &[String] {
        self.cases.as_slice()
    }

    pub const fn skip(&self) -> bool {
        self.skip
    }

    /// Name of the fixture of case `index`.
    pub fn fixture_name(&self, index: usize) -> String {
        format!("{}{}", self.name, index)
    }

    fn validate(&self) -> FixtureResult<()> {
        let error = |message: String| {
            Err(FixtureError::CatalogConfiguration {
                category: self.name.clone(),
                message,
            })
        };
        if !is_rust_identifier(&self.name) {
            return error(String::from("name is not a valid Rust identifier"));
        }
        self.parameters.validate(&self.name)?;
        let handler = self.kind.handler();
        if handler.oracle == OracleUse::Tokenizer && self.parameters != ParameterSet::default() {
            return error(String::from("tokenizer categories take no parameters"));
        }
        if handler.invocation == Invocation::TopLevel && self.parameters != ParameterSet::default() {
            return error(String::from("top-level parse categories take no parameters"));
        }

        Ok(())
    }
}

/// Rust 2021 strict and reserved keywords
static RUST_KEYWORDS: phf::Set<&'static str> = phf_set! {
    "as", "async", "await", "break", "const", "continue", "crate", "dyn",
    "else", "enum", "extern", "false", "fn", "for", "if", "impl", "in",
    "let", "loop", "match", "mod", "move", "mut", "pub", "ref", "return",
    "self", "Self", "static", "struct", "super", "trait", "true", "type",
    "unsafe", "use", "where", "while",
    "abstract", "become", "box", "do", "final", "macro", "override", "priv",
    "try", "typeof", "unsized", "virtual", "yield",
};

/// A Rust identifier that can name an emitted test function and, in
/// directory output, a module.
fn is_rust_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    if name == "_" || RUST_KEYWORDS.contains(name) {
        return false;
    }

    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// The ordered list of categories.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TestCatalog {
    categories: Vec<TestCategory>,
}

impl TestCatalog {
    pub fn new() -> TestCatalog {
        TestCatalog::default()
    }

    /// Append a category. Category names must be unique.
    pub fn push(&mut self, category: TestCategory) -> FixtureResult<()> {
        defñ!("{:?}", category.name());
        if self.get(category.name()).is_some() {
            return Err(FixtureError::CatalogConfiguration {
                category: category.name().to_string(),
                message: String::from("duplicate category name"),
            });
        }
        self.categories.push(category);

        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&TestCategory> {
        self.categories.iter().find(|c| c.name() == name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TestCategory> {
        self.categories.iter()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Count of cases across all categories.
    pub fn case_count(&self) -> usize {
        self.categories.iter().map(|c| c.cases().len()).sum()
    }

    /// Keep only categories matching any of `selectors`, where a selector is
    /// a category name or a kind slug (e.g. `"fuzzy"`). Declaration order is
    /// kept. A selector matching nothing is an error.
    pub fn select(&self, selectors: &[String]) -> FixtureResult<TestCatalog> {
        defn!("{:?}", selectors);
        if selectors.is_empty() {
            defx!("no selectors; return all");
            return Ok(self.clone());
        }
        for selector in selectors.iter() {
            let kind: Option<CategoryKind> = CategoryKind::from_slug(selector);
            let matched: bool = self.categories.iter().any(|c|
                c.name() == selector.as_str() || Some(c.kind()) == kind
            );
            if !matched {
                defx!("selector {:?} matched nothing", selector);
                return Err(FixtureError::CatalogConfiguration {
                    category: selector.clone(),
                    message: String::from("no category has this name or kind"),
                });
            }
        }
        let categories: Vec<TestCategory> = self.categories
            .iter()
            .filter(|c|
                selectors.iter().any(|s|
                    c.name() == s.as_str() || CategoryKind::from_slug(s) == Some(c.kind())
                )
            )
            .cloned()
            .collect();
        defx!("selected {} of {} categories", categories.len(), self.categories.len());

        Ok(TestCatalog { categories })
    }
}

impl<'a> IntoIterator for &'a TestCatalog {
    type Item = &'a TestCategory;
    type IntoIter = std::slice::Iter<'a, TestCategory>;

    fn into_iter(self) -> Self::IntoIter {
        self.categories.iter()
    }
}
