//! Report text normalization engine

use std::time::Instant;

use super::classifier::{marker_label, LineClass, LineClassifier};
use super::options::{HeadingPolicy, NormalizeOptions};
use super::report::{NormalizeNote, NormalizeReport, NoteKind};
use super::rules::HeadingLevel;

/// Result of report normalization
#[derive(Debug)]
pub struct NormalizeResult {
    /// Normalized markdown text
    pub markdown: String,
    /// Normalization report
    pub report: NormalizeReport,
}

/// Report text normalizer
pub struct ReportNormalizer {
    options: NormalizeOptions,
    classifier: LineClassifier,
}

impl ReportNormalizer {
    /// Create a new normalizer with the given options
    pub fn new(options: NormalizeOptions) -> Self {
        Self {
            options,
            classifier: LineClassifier::new(),
        }
    }

    /// Options in use
    pub fn options(&self) -> &NormalizeOptions {
        &self.options
    }

    /// Normalize report text to markdown
    ///
    /// Each line is classified independently: section markers become
    /// headings, everything else passes through unchanged. The output has
    /// the same number of lines as the input, and markup the classifier
    /// does not recognize is preserved rather than rejected.
    pub fn normalize(&self, text: &str, input_name: &str, output_name: &str) -> NormalizeResult {
        let start_time = Instant::now();
        let mut report = NormalizeReport::new(input_name, output_name, self.options.policy);

        if text.is_empty() {
            report.duration_ms = start_time.elapsed().as_millis() as u64;
            return NormalizeResult {
                markdown: String::new(),
                report,
            };
        }

        let mut markdown_lines = Vec::new();
        for (index, line) in text.split('\n').enumerate() {
            let class = self.classifier.classify(line);
            report.statistics.total_lines += 1;
            report.statistics.increment_class(class.as_str());

            match class {
                LineClass::SectionMarker => {
                    let label = marker_label(line.trim());
                    let (level, keyword) = match self.options.policy {
                        HeadingPolicy::Keyword => self.options.table.match_for(label),
                        HeadingPolicy::Flat => (HeadingLevel::H2, None),
                    };
                    report.statistics.converted_headings += 1;
                    report.statistics.increment_level(level);
                    report.add_note(NormalizeNote {
                        line: index + 1,
                        kind: NoteKind::HeadingConverted,
                        keyword: keyword.map(|k| k.to_string()),
                        message: format!("converted \"{}\" to {} heading", label, level),
                        suggestion: None,
                    });
                    markdown_lines.push(format!("{} {}", level.marker(), label));
                }
                LineClass::Blank => {
                    report.statistics.blank_lines += 1;
                    markdown_lines.push(String::new());
                }
                _ => {
                    report.statistics.passthrough_lines += 1;
                    let trimmed = line.trim();
                    if trimmed.starts_with("**") && !trimmed[2..].contains("**") {
                        report.add_note(NormalizeNote {
                            line: index + 1,
                            kind: NoteKind::SuspectHeading,
                            keyword: None,
                            message: format!(
                                "section marker opens with ** but never closes: \"{}\"",
                                trimmed
                            ),
                            suggestion: Some(
                                "close the line with ** to convert it into a heading".to_string(),
                            ),
                        });
                    }
                    markdown_lines.push(line.to_string());
                }
            }
        }

        report.duration_ms = start_time.elapsed().as_millis() as u64;
        NormalizeResult {
            markdown: markdown_lines.join("\n"),
            report,
        }
    }
}

/// Normalize report text with the default options, returning only the
/// markdown
pub fn normalize_report(text: &str) -> String {
    ReportNormalizer::new(NormalizeOptions::default())
        .normalize(text, "input", "output")
        .markdown
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        assert_eq!(normalize_report(""), "");
    }

    #[test]
    fn test_title_conversion() {
        assert_eq!(
            normalize_report("**Diagnostic Report**"),
            "# Diagnostic Report"
        );
    }

    #[test]
    fn test_flat_policy() {
        let normalizer = ReportNormalizer::new(NormalizeOptions::new(HeadingPolicy::Flat));
        let result = normalizer.normalize("**Diagnostic Report**", "input", "output");
        assert_eq!(result.markdown, "## Diagnostic Report");
    }

    #[test]
    fn test_statistics_sum_to_total() {
        let normalizer = ReportNormalizer::new(NormalizeOptions::default());
        let result = normalizer.normalize("**Observations**\ntext\n\n* item", "input", "output");
        let stats = &result.report.statistics;
        assert_eq!(stats.total_lines, 4);
        assert_eq!(stats.converted_headings, 1);
        assert_eq!(stats.passthrough_lines, 2);
        assert_eq!(stats.blank_lines, 1);
        assert_eq!(
            stats.converted_headings + stats.passthrough_lines + stats.blank_lines,
            stats.total_lines
        );
    }

    #[test]
    fn test_suspect_heading_noted_but_preserved() {
        let normalizer = ReportNormalizer::new(NormalizeOptions::default());
        let result = normalizer.normalize("**Observations", "input", "output");
        assert_eq!(result.markdown, "**Observations");
        assert_eq!(result.report.notes.len(), 1);
        assert_eq!(result.report.notes[0].kind, NoteKind::SuspectHeading);
        assert_eq!(result.report.suspect_count(), 1);
    }

    #[test]
    fn test_inline_bold_is_not_suspect() {
        let normalizer = ReportNormalizer::new(NormalizeOptions::default());
        let result = normalizer.normalize("**Verdict:** affected", "input", "output");
        assert_eq!(result.markdown, "**Verdict:** affected");
        assert!(result.report.notes.is_empty());
    }
}
