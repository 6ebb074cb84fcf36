//! Report markdown normalizer module
//!
//! Turns raw model-generated report text into consistent markdown. Each
//! line is classified independently and transformed under a policy:
//! - Keyword: heading levels come from rule-table keyword lookup
//! - Flat: every converted section marker becomes level 2
//!
//! Markup the classifier does not recognize always passes through
//! unchanged.

mod classifier;
mod normalize;
mod options;
mod report;
mod rules;

pub use classifier::{LineClass, LineClassifier};
pub use normalize::{normalize_report, NormalizeResult, ReportNormalizer};
pub use options::{HeadingPolicy, NormalizeOptions};
pub use report::{NormalizeNote, NormalizeReport, NormalizeStatistics, NoteKind};
pub use rules::{HeadingLevel, HeadingRule, KeywordLocale, RuleTable, RulesError};
