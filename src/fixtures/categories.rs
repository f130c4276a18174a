//! Test categories and category-based selection.
//!
//! The set of categories is closed. Selection is driven by
//! `DOCLINGTAXA_TEST_CATEGORIES`, a comma-separated list where `name`
//! includes a category and `!name` excludes one:
//!
//! ```text
//! DOCLINGTAXA_TEST_CATEGORIES=unit,contract   # only unit and contract tests
//! DOCLINGTAXA_TEST_CATEGORIES=!slow           # everything except slow tests
//! ```

use crate::errors::{DoclingtaxaError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Environment variable holding the category selection
pub const CATEGORIES_ENV: &str = "DOCLINGTAXA_TEST_CATEGORIES";

/// Category a test may be tagged with
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestCategory {
    /// API/schema validation
    Contract,
    /// End-to-end scenarios
    Integration,
    /// Individual components
    Unit,
    /// Long-running
    Slow,
}

impl TestCategory {
    pub const ALL: &'static [TestCategory] =
        &[TestCategory::Contract, TestCategory::Integration, TestCategory::Unit, TestCategory::Slow];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Contract => "contract",
            Self::Integration => "integration",
            Self::Unit => "unit",
            Self::Slow => "slow",
        }
    }

    pub const fn description(&self) -> &'static str {
        match self {
            Self::Contract => "Contract tests for API/schema validation",
            Self::Integration => "Integration tests for end-to-end scenarios",
            Self::Unit => "Unit tests for individual components",
            Self::Slow => "Tests that take significant time to run",
        }
    }

    /// Registration line, `name: description`
    pub fn marker_line(&self) -> String {
        format!("{}: {}", self.as_str(), self.description())
    }
}

impl fmt::Display for TestCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TestCategory {
    type Err = DoclingtaxaError;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim().to_lowercase();
        TestCategory::ALL.iter().copied().find(|c| c.as_str() == name).ok_or_else(|| {
            DoclingtaxaError::validation_field(
                format!(
                    "Unknown test category '{}', expected one of: contract, integration, unit, slow",
                    s.trim()
                ),
                "categories",
            )
        })
    }
}

/// Registered category lines, in declaration order
pub fn registered_markers() -> Vec<String> {
    TestCategory::ALL.iter().map(TestCategory::marker_line).collect()
}

/// Which categories the current run selects
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryFilter {
    include: BTreeSet<TestCategory>,
    exclude: BTreeSet<TestCategory>,
}

impl CategoryFilter {
    /// Select every test
    pub fn all() -> Self {
        Self::default()
    }

    /// Parse a selection such as `unit,!slow`
    pub fn parse(spec: &str) -> Result<Self> {
        let mut filter = Self::default();

        for token in spec.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            match token.strip_prefix('!') {
                Some(excluded) => {
                    filter.exclude.insert(excluded.parse()?);
                }
                None => {
                    filter.include.insert(token.parse()?);
                }
            }
        }

        Ok(filter)
    }

    /// Resolve from `DOCLINGTAXA_TEST_CATEGORIES`
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        match lookup(CATEGORIES_ENV) {
            Some(spec) => Self::parse(&spec),
            None => Ok(Self::all()),
        }
    }

    pub fn is_unrestricted(&self) -> bool {
        self.include.is_empty() && self.exclude.is_empty()
    }

    /// Whether a test tagged with `categories` should run
    pub fn allows(&self, categories: &[TestCategory]) -> bool {
        self.skip_reason(categories).is_none()
    }

    /// Why a test tagged with `categories` is deselected, if it is
    pub fn skip_reason(&self, categories: &[TestCategory]) -> Option<String> {
        if let Some(excluded) = categories.iter().find(|c| self.exclude.contains(*c)) {
            return Some(format!("category '{}' is excluded by {}", excluded, CATEGORIES_ENV));
        }

        if !self.include.is_empty() && !categories.iter().any(|c| self.include.contains(c)) {
            let selected: Vec<&str> = self.include.iter().map(TestCategory::as_str).collect();
            return Some(format!(
                "{} selects only [{}]",
                CATEGORIES_ENV,
                selected.join(", ")
            ));
        }

        None
    }
}

/// Skip the current test unless the filter selects one of the given categories.
///
/// ```rust,ignore
/// require_category!(env.categories, [TestCategory::Integration, TestCategory::Slow]);
/// ```
#[macro_export]
macro_rules! require_category {
    ($filter:expr, [$($category:expr),+ $(,)?]) => {
        $crate::require_category!($filter, [$($category),+], ())
    };
    ($filter:expr, [$($category:expr),+ $(,)?], $ret:expr) => {
        if let Some(reason) = $filter.skip_reason(&[$($category),+]) {
            eprintln!("skipping {}: {}", module_path!(), reason);
            return $ret;
        }
    };
}
