// src/data/params.rs

//! The [`ParameterSet`] is the fixed configuration under which the cases of
//! one catalog category are handed to the parser oracle, and later to the
//! parser under test.
//!
//! A `ParameterSet` can only be created through [`ParameterSetBuilder::build`]
//! which rejects contradictory declarations, so an invalid combination is a
//! [`FixtureError::CatalogConfiguration`] at catalog construction rather than
//! a failure deep inside an oracle invocation.

use std::collections::BTreeMap;

use ::chrono::{
    Datelike,
    NaiveDate,
    NaiveDateTime,
    Timelike,
};
#[allow(unused_imports)]
use ::si_trace_print::{
    defn,
    defo,
    defx,
    defñ,
};

use crate::error::{
    FixtureError,
    FixtureResult,
};

/// timezone alias name to UTC offset in seconds, e.g. `"BRST"` → `-10800`.
/// Sorted so the map is echoed into fixtures in the same order every run.
pub type TzAliasMap = BTreeMap<String, i32>;

/// Largest absolute UTC offset the oracle accepts, one second short of a day.
pub const TZ_OFFSET_MAX_SECONDS: i32 = 86_399;

/// Smallest and largest year the oracle can represent.
pub const YEAR_MIN: i32 = 1;
pub const YEAR_MAX: i32 = 9999;

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ParameterSet {
    day_first: Option<bool>,
    year_first: Option<bool>,
    fuzzy: bool,
    fuzzy_with_tokens: bool,
    default_baseline: Option<NaiveDateTime>,
    ignore_timezone: bool,
    tz_aliases: TzAliasMap,
}

impl ParameterSet {
    pub fn builder() -> ParameterSetBuilder {
        ParameterSetBuilder::default()
    }

    pub const fn day_first(&self) -> Option<bool> {
        self.day_first
    }

    pub const fn year_first(&self) -> Option<bool> {
        self.year_first
    }

    pub const fn fuzzy(&self) -> bool {
        self.fuzzy
    }

    pub const fn fuzzy_with_tokens(&self) -> bool {
        self.fuzzy_with_tokens
    }

    pub const fn default_baseline(&self) -> Option<NaiveDateTime> {
        self.default_baseline
    }

    pub const fn ignore_timezone(&self) -> bool {
        self.ignore_timezone
    }

    pub fn tz_aliases(&self) -> &TzAliasMap {
        &self.tz_aliases
    }

    /// Check the declaration is coherent. `category` names the catalog
    /// category for the error message.
    pub fn validate(&self, category: &str) -> FixtureResult<()> {
        defn!("{:?}", category);
        let error = |message: String| {
            defx!("invalid: {}", message);
            Err(FixtureError::CatalogConfiguration {
                category: category.to_string(),
                message,
            })
        };

        if self.fuzzy_with_tokens && !self.fuzzy {
            return error(String::from("fuzzy_with_tokens requires fuzzy"));
        }
        if self.ignore_timezone && !self.tz_aliases.is_empty() {
            return error(format!(
                "ignore_timezone discards the {} timezone aliases",
                self.tz_aliases.len(),
            ));
        }
        for (name, offset) in self.tz_aliases.iter() {
            if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric()) {
                return error(format!("timezone alias {:?} must be ASCII alphanumeric", name));
            }
            if offset.abs() > TZ_OFFSET_MAX_SECONDS {
                return error(format!(
                    "timezone alias {:?} offset {} is beyond ±{} seconds",
                    name, offset, TZ_OFFSET_MAX_SECONDS,
                ));
            }
        }
        if let Some(baseline) = self.default_baseline {
            if baseline.year() < YEAR_MIN || baseline.year() > YEAR_MAX {
                return error(format!(
                    "default baseline year {} is outside {}..={}",
                    baseline.year(), YEAR_MIN, YEAR_MAX,
                ));
            }
            // a leap second or sub-microsecond value cannot be represented by the oracle
            if baseline.nanosecond() >= 1_000_000_000 || baseline.nanosecond() % 1_000 != 0 {
                return error(format!(
                    "default baseline {} is not of microsecond precision",
                    baseline,
                ));
            }
        }
        defx!("valid");

        Ok(())
    }
}

/// Builds a validated [`ParameterSet`].
#[derive(Clone, Debug, Default)]
pub struct ParameterSetBuilder {
    params: ParameterSet,
}

impl ParameterSetBuilder {
    pub fn day_first(mut self, value: bool) -> Self {
        self.params.day_first = Some(value);
        self
    }

    pub fn year_first(mut self, value: bool) -> Self {
        self.params.year_first = Some(value);
        self
    }

    pub fn fuzzy(mut self, value: bool) -> Self {
        self.params.fuzzy = value;
        self
    }

    pub fn fuzzy_with_tokens(mut self, value: bool) -> Self {
        self.params.fuzzy_with_tokens = value;
        self
    }

    pub fn default_baseline(mut self, value: NaiveDateTime) -> Self {
        self.params.default_baseline = Some(value);
        self
    }

    pub fn ignore_timezone(mut self, value: bool) -> Self {
        self.params.ignore_timezone = value;
        self
    }

    pub fn tz_alias(mut self, name: &str, offset_seconds: i32) -> Self {
        self.params.tz_aliases.insert(name.to_string(), offset_seconds);
        self
    }

    /// Validate and return the `ParameterSet`.
    pub fn build(self, category: &str) -> FixtureResult<ParameterSet> {
        self.params.validate(category)?;

        Ok(self.params)
    }
}

/// Helper to create a baseline at midnight, e.g. `ymd_midnight(2003, 9, 25)`.
/// Returns `None` for an impossible date.
pub fn ymd_midnight(year: i32, month: u32, day: u32) -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(0, 0, 0)
}
