//! Configurable heading rule tables

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Markdown heading level assigned to a converted section marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadingLevel {
    /// Report title
    H1,
    /// Major section
    H2,
    /// Any other section
    H3,
}

impl HeadingLevel {
    /// Markdown marker for this level
    pub fn marker(&self) -> &'static str {
        match self {
            HeadingLevel::H1 => "#",
            HeadingLevel::H2 => "##",
            HeadingLevel::H3 => "###",
        }
    }
}

impl std::fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HeadingLevel::H1 => write!(f, "h1"),
            HeadingLevel::H2 => write!(f, "h2"),
            HeadingLevel::H3 => write!(f, "h3"),
        }
    }
}

/// Built-in keyword locale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum KeywordLocale {
    /// English report keywords
    #[default]
    English,
    /// Hindi report keywords
    Hindi,
}

impl std::fmt::Display for KeywordLocale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeywordLocale::English => write!(f, "english"),
            KeywordLocale::Hindi => write!(f, "hindi"),
        }
    }
}

/// One keyword set and the level it assigns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadingRule {
    /// Substrings that select this rule
    pub keywords: Vec<String>,
    /// Level assigned when any keyword matches
    pub level: HeadingLevel,
}

/// Ordered rule list with a fallback level
///
/// Labels are matched by case-sensitive substring search, rules in order,
/// first rule with any matching keyword wins. Labels no rule matches get
/// the fallback level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleTable {
    /// Rules in evaluation order
    #[serde(default, rename = "rule")]
    pub rules: Vec<HeadingRule>,
    /// Level for labels no rule matches
    pub fallback: HeadingLevel,
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::builtin(KeywordLocale::English)
    }
}

impl RuleTable {
    /// Create an empty table with the given fallback level
    pub fn new(fallback: HeadingLevel) -> Self {
        Self {
            rules: Vec::new(),
            fallback,
        }
    }

    /// Append a rule (builder style)
    pub fn with_rule(mut self, keywords: &[&str], level: HeadingLevel) -> Self {
        self.push_rule(keywords, level);
        self
    }

    /// Append a rule
    pub fn push_rule(&mut self, keywords: &[&str], level: HeadingLevel) {
        self.rules.push(HeadingRule {
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            level,
        });
    }

    /// Built-in table for a locale: one title rule (h1), one
    /// major-section rule (h2), fallback h3
    pub fn builtin(locale: KeywordLocale) -> Self {
        match locale {
            KeywordLocale::English => Self::new(HeadingLevel::H3)
                .with_rule(&["Diagnostic Report"], HeadingLevel::H1)
                .with_rule(
                    &[
                        "Output",
                        "Observations",
                        "Analysis",
                        "Precautions",
                        "Solutions",
                        "Cause",
                    ],
                    HeadingLevel::H2,
                ),
            KeywordLocale::Hindi => Self::new(HeadingLevel::H3)
                .with_rule(&["नैदानिक रिपोर्ट"], HeadingLevel::H1)
                .with_rule(
                    &[
                        "परिणाम",
                        "अवलोकन",
                        "विश्लेषण",
                        "सावधानियां",
                        "समाधान",
                        "कारण",
                    ],
                    HeadingLevel::H2,
                ),
        }
    }

    /// Level for a label
    pub fn level_for(&self, label: &str) -> HeadingLevel {
        self.match_for(label).0
    }

    /// Level for a label plus the keyword that selected it, if any
    pub fn match_for(&self, label: &str) -> (HeadingLevel, Option<&str>) {
        for rule in &self.rules {
            for keyword in &rule.keywords {
                if label.contains(keyword.as_str()) {
                    return (rule.level, Some(keyword.as_str()));
                }
            }
        }
        (self.fallback, None)
    }

    /// Parse a table from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self, RulesError> {
        let table: RuleTable =
            toml::from_str(text).map_err(|source| RulesError::Parse { source })?;
        table.validate()?;
        Ok(table)
    }

    /// Load a table from a TOML file
    pub fn load(path: &Path) -> Result<Self, RulesError> {
        log::debug!("loading rule table from {}", path.display());
        let text = fs::read_to_string(path).map_err(|source| RulesError::Io {
            source,
            path: path.to_path_buf(),
        })?;
        Self::from_toml_str(&text)
    }

    fn validate(&self) -> Result<(), RulesError> {
        for (index, rule) in self.rules.iter().enumerate() {
            if rule.keywords.is_empty() {
                return Err(RulesError::EmptyRule { index });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum RulesError {
    #[error("failed to read rule table at {path:?}: {source}")]
    Io {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to parse rule table: {source}")]
    Parse {
        #[source]
        source: toml::de::Error,
    },
    #[error("rule {index} has an empty keyword list")]
    EmptyRule { index: usize },
}
