//! Normalization options

use serde::{Deserialize, Serialize};

use super::rules::{KeywordLocale, RuleTable};

/// Heading policy determines how converted section markers are leveled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HeadingPolicy {
    /// Assign h1/h2/fallback by keyword lookup in the rule table
    #[default]
    Keyword,
    /// Assign level 2 to every converted marker, ignoring the table
    Flat,
}

impl std::fmt::Display for HeadingPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HeadingPolicy::Keyword => write!(f, "keyword"),
            HeadingPolicy::Flat => write!(f, "flat"),
        }
    }
}

/// Options for report normalization
#[derive(Debug, Clone, Default)]
pub struct NormalizeOptions {
    /// Heading policy (keyword lookup or flat h2)
    pub policy: HeadingPolicy,
    /// Rule table consulted under the keyword policy
    pub table: RuleTable,
}

impl NormalizeOptions {
    /// Create options with the given policy and the default table
    pub fn new(policy: HeadingPolicy) -> Self {
        Self {
            policy,
            table: RuleTable::default(),
        }
    }

    /// Replace the rule table
    pub fn with_table(mut self, table: RuleTable) -> Self {
        self.table = table;
        self
    }

    /// Use the built-in table for a locale
    pub fn with_locale(mut self, locale: KeywordLocale) -> Self {
        self.table = RuleTable::builtin(locale);
        self
    }
}
