//! Normalization report types

use super::options::HeadingPolicy;
use super::rules::HeadingLevel;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Kind of note generated during normalization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoteKind {
    /// A section marker was converted to a heading
    HeadingConverted,
    /// A line opens a section marker but never closes it
    SuspectHeading,
}

impl std::fmt::Display for NoteKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NoteKind::HeadingConverted => write!(f, "heading_converted"),
            NoteKind::SuspectHeading => write!(f, "suspect_heading"),
        }
    }
}

/// A note generated during normalization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizeNote {
    /// Line number (1-indexed)
    pub line: usize,
    /// Kind of note
    pub kind: NoteKind,
    /// Rule-table keyword that matched (converted headings only)
    pub keyword: Option<String>,
    /// Human-readable message
    pub message: String,
    /// Suggestion for fixing (optional)
    pub suggestion: Option<String>,
}

impl std::fmt::Display for NormalizeNote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Line {}: {}", self.line, self.message)
    }
}

/// Statistics about one normalization run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NormalizeStatistics {
    /// Total lines in input
    pub total_lines: usize,
    /// Section markers converted to headings
    pub converted_headings: usize,
    /// Lines emitted unchanged
    pub passthrough_lines: usize,
    /// Blank lines preserved
    pub blank_lines: usize,
    /// Number of notes
    pub note_count: usize,
    /// Count of each line class seen
    pub class_counts: HashMap<String, usize>,
    /// Count of converted headings per level
    pub level_counts: HashMap<String, usize>,
}

impl NormalizeStatistics {
    /// Increment the count for a line class
    pub fn increment_class(&mut self, class: &str) {
        *self.class_counts.entry(class.to_string()).or_insert(0) += 1;
    }

    /// Increment the count for a converted heading level
    pub fn increment_level(&mut self, level: HeadingLevel) {
        *self.level_counts.entry(level.to_string()).or_insert(0) += 1;
    }
}

/// Complete normalization report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizeReport {
    /// Input name (file path or "stdin")
    pub input_name: String,
    /// Output name (file path or "stdout")
    pub output_name: String,
    /// Heading policy used
    pub policy: HeadingPolicy,
    /// Timestamp of the run
    pub timestamp: String,
    /// Duration in milliseconds
    pub duration_ms: u64,
    /// Line statistics
    pub statistics: NormalizeStatistics,
    /// All notes generated
    pub notes: Vec<NormalizeNote>,
}

impl NormalizeReport {
    /// Create a new empty report
    pub fn new(input: &str, output: &str, policy: HeadingPolicy) -> Self {
        Self {
            input_name: input.to_string(),
            output_name: output.to_string(),
            policy,
            timestamp: chrono::Utc::now().to_rfc3339(),
            duration_ms: 0,
            statistics: NormalizeStatistics::default(),
            notes: Vec::new(),
        }
    }

    /// Add a note to the report
    pub fn add_note(&mut self, note: NormalizeNote) {
        self.statistics.note_count += 1;
        self.notes.push(note);
    }

    /// Number of suspect lines noted
    pub fn suspect_count(&self) -> usize {
        self.notes
            .iter()
            .filter(|note| note.kind == NoteKind::SuspectHeading)
            .count()
    }

    /// Convert to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Convert to human-readable text format
    pub fn to_text(&self) -> String {
        let mut output = String::new();

        output.push_str("Report Normalization\n");
        output.push_str("====================\n");
        output.push_str(&format!("Input:  {}\n", self.input_name));
        output.push_str(&format!("Output: {}\n", self.output_name));
        output.push_str(&format!("Policy: {}\n", self.policy));
        output.push_str(&format!("Date:   {}\n", self.timestamp));
        output.push_str(&format!("Time:   {}ms\n\n", self.duration_ms));

        output.push_str("Statistics\n");
        output.push_str("----------\n");
        output.push_str(&format!(
            "Total lines:     {}\n",
            self.statistics.total_lines
        ));
        output.push_str(&format!(
            "Converted:       {}\n",
            self.statistics.converted_headings
        ));
        output.push_str(&format!(
            "Passed through:  {}\n",
            self.statistics.passthrough_lines
        ));
        output.push_str(&format!(
            "Blank:           {}\n",
            self.statistics.blank_lines
        ));
        output.push_str(&format!(
            "Notes:           {}\n\n",
            self.statistics.note_count
        ));

        if !self.statistics.class_counts.is_empty() {
            output.push_str("Line Classes\n");
            output.push_str("------------\n");
            let mut classes: Vec<_> = self.statistics.class_counts.iter().collect();
            classes.sort_by(|a, b| b.1.cmp(a.1));
            for (class, count) in classes {
                output.push_str(&format!("✓ {}: {}\n", class, count));
            }
            output.push('\n');
        }

        if !self.statistics.level_counts.is_empty() {
            output.push_str("Converted Headings\n");
            output.push_str("------------------\n");
            let mut levels: Vec<_> = self.statistics.level_counts.iter().collect();
            levels.sort();
            for (level, count) in levels {
                output.push_str(&format!("✓ {}: {}\n", level, count));
            }
            output.push('\n');
        }

        if !self.notes.is_empty() {
            output.push_str("Notes\n");
            output.push_str("-----\n");
            for note in &self.notes {
                output.push_str(&format!("⚠ {}\n", note));
                if let Some(suggestion) = &note.suggestion {
                    output.push_str(&format!("  Suggestion: {}\n", suggestion));
                }
            }
            output.push('\n');
        }

        output.push_str("Result\n");
        output.push_str("------\n");
        if self.suspect_count() > 0 {
            output.push_str("✓ Normalization completed with suspect lines\n");
            output.push_str(&format!("✓ Output written to {}\n", self.output_name));
            output.push_str("ℹ Review notes and close broken section markers if needed\n");
        } else {
            output.push_str("✓ Normalization completed successfully\n");
            output.push_str(&format!("✓ Output written to {}\n", self.output_name));
        }

        output
    }
}
