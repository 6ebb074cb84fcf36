//! Per-line classification

use regex::Regex;

/// Classification of one input line, in rule priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineClass {
    /// Already a markdown heading (1 to 6 # followed by whitespace)
    Heading,
    /// Bold-delimited section marker (label wrapped in **), converted
    SectionMarker,
    /// Starts with ## but missed the stricter heading pattern
    SectionPrefix,
    /// Markdown list item
    ListItem,
    /// Contains inline bold somewhere in the line
    InlineBold,
    /// Any other non-empty text
    Plain,
    /// Empty or whitespace-only
    Blank,
}

impl LineClass {
    /// Stable name used in report statistics
    pub fn as_str(&self) -> &'static str {
        match self {
            LineClass::Heading => "heading",
            LineClass::SectionMarker => "section_marker",
            LineClass::SectionPrefix => "section_prefix",
            LineClass::ListItem => "list_item",
            LineClass::InlineBold => "inline_bold",
            LineClass::Plain => "plain",
            LineClass::Blank => "blank",
        }
    }
}

/// Line classifier holding the compiled heading pattern
#[derive(Debug)]
pub struct LineClassifier {
    heading: Regex,
}

impl Default for LineClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl LineClassifier {
    pub fn new() -> Self {
        Self {
            heading: Regex::new(r"^#{1,6}\s").unwrap(),
        }
    }

    /// Classify one line; rules are checked in priority order and the
    /// first match wins
    pub fn classify(&self, line: &str) -> LineClass {
        let trimmed = line.trim();
        if self.heading.is_match(trimmed) {
            LineClass::Heading
        } else if trimmed.starts_with("**") && trimmed.ends_with("**") {
            LineClass::SectionMarker
        } else if trimmed.starts_with("##") {
            LineClass::SectionPrefix
        } else if trimmed.starts_with("* ") {
            LineClass::ListItem
        } else if line.contains("**") {
            LineClass::InlineBold
        } else if !trimmed.is_empty() {
            LineClass::Plain
        } else {
            LineClass::Blank
        }
    }
}

/// Strip the two leading and two trailing marker characters from a
/// trimmed section marker line. Inner whitespace is kept as is.
pub fn marker_label(trimmed: &str) -> &str {
    let label = trimmed.strip_prefix("**").unwrap_or(trimmed);
    label.strip_suffix("**").unwrap_or(label)
}
