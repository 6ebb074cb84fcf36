//! Integration tests for report normalization
//!
//! Covers line classification, both heading policies, structural
//! properties of the output, and the compose/scrub/normalize pipeline.

use vetmark::compose::{compose_report, CaseContext, CaseFeatures, ModelFindings, Verdict};
use vetmark::normalizer::{
    normalize_report, HeadingLevel, HeadingPolicy, KeywordLocale, NormalizeOptions,
    NormalizeReport, NormalizeResult, NoteKind, ReportNormalizer, RuleTable,
};
use vetmark::scrub::strip_model_fences;

/// Helper to normalize with explicit options
fn normalize_with(text: &str, options: NormalizeOptions) -> NormalizeResult {
    ReportNormalizer::new(options).normalize(text, "test.txt", "test.md")
}

/// Helper to normalize under the flat policy
fn normalize_flat(text: &str) -> String {
    normalize_with(text, NormalizeOptions::new(HeadingPolicy::Flat)).markdown
}

// =============================================================================
// Line Classification Tests
// =============================================================================

mod classification {
    use super::*;

    #[test]
    fn test_title_marker_becomes_h1() {
        assert_eq!(
            normalize_report("**Diagnostic Report**"),
            "# Diagnostic Report"
        );
    }

    #[test]
    fn test_section_marker_becomes_h2() {
        assert_eq!(normalize_report("**Observations**"), "## Observations");
        assert_eq!(
            normalize_report("**Clinical Observations**"),
            "## Clinical Observations"
        );
    }

    #[test]
    fn test_unknown_marker_becomes_h3() {
        assert_eq!(
            normalize_report("**Patient History**"),
            "### Patient History"
        );
    }

    #[test]
    fn test_title_rule_beats_section_rule() {
        assert_eq!(
            normalize_report("**Diagnostic Report Output**"),
            "# Diagnostic Report Output"
        );
    }

    #[test]
    fn test_keyword_matching_is_case_sensitive() {
        assert_eq!(normalize_report("**observations**"), "### observations");
    }

    #[test]
    fn test_existing_headings_pass_through() {
        assert_eq!(normalize_report("# Title"), "# Title");
        assert_eq!(normalize_report("###### Deep"), "###### Deep");
        assert_eq!(normalize_report("   ## Indented"), "   ## Indented");
    }

    #[test]
    fn test_deep_heading_is_not_releveled() {
        // an existing h4 stays h4 even though the table would say h3
        assert_eq!(normalize_report("#### Patient History"), "#### Patient History");
    }

    #[test]
    fn test_seven_hashes_pass_through() {
        assert_eq!(normalize_report("####### seven"), "####### seven");
    }

    #[test]
    fn test_list_items_pass_through() {
        assert_eq!(normalize_report("* item one"), "* item one");
    }

    #[test]
    fn test_inline_bold_passes_through() {
        assert_eq!(
            normalize_report("plain **bold** line"),
            "plain **bold** line"
        );
    }

    #[test]
    fn test_plain_text_passes_through() {
        assert_eq!(normalize_report("ordinary text"), "ordinary text");
    }

    #[test]
    fn test_bare_marker_pairs() {
        assert_eq!(normalize_report("**"), "### ");
        assert_eq!(normalize_report("***"), "### *");
        assert_eq!(normalize_report("****"), "### ");
    }

    #[test]
    fn test_padded_label_keeps_inner_whitespace() {
        assert_eq!(normalize_report("** Padded **"), "###  Padded ");
    }

    #[test]
    fn test_carriage_returns() {
        // CR is trimmed off converted lines but survives on passthrough
        assert_eq!(
            normalize_report("**Observations**\r\nplain\r"),
            "## Observations\nplain\r"
        );
    }
}

// =============================================================================
// Heading Policy Tests
// =============================================================================

mod policies {
    use super::*;

    #[test]
    fn test_flat_policy_levels_everything_h2() {
        assert_eq!(
            normalize_flat("**Diagnostic Report**"),
            "## Diagnostic Report"
        );
        assert_eq!(normalize_flat("**Observations**"), "## Observations");
        assert_eq!(normalize_flat("**Patient History**"), "## Patient History");
    }

    #[test]
    fn test_hindi_locale() {
        let options = NormalizeOptions::default().with_locale(KeywordLocale::Hindi);
        let result = normalize_with(
            "**नैदानिक रिपोर्ट**\n**परिणाम**\n**Observations**",
            options,
        );
        assert_eq!(
            result.markdown,
            "# नैदानिक रिपोर्ट\n## परिणाम\n### Observations"
        );
    }

    #[test]
    fn test_custom_rule_table() {
        let table = RuleTable::new(HeadingLevel::H2).with_rule(&["Summary"], HeadingLevel::H1);
        let options = NormalizeOptions::default().with_table(table);
        let result = normalize_with("**Summary**\n**anything else**", options);
        assert_eq!(result.markdown, "# Summary\n## anything else");
    }
}

// =============================================================================
// Structural Property Tests
// =============================================================================

mod properties {
    use super::*;

    #[test]
    fn test_line_count_preserved() {
        let input = "**Diagnostic Report**\n\ntext\n* item\n**Observations**\n####### seven\n**unclosed\n   \nend";
        let output = normalize_report(input);
        assert_eq!(input.split('\n').count(), output.split('\n').count());
    }

    #[test]
    fn test_empty_input_stays_empty() {
        assert_eq!(normalize_report(""), "");
    }

    #[test]
    fn test_whitespace_only_lines_become_empty() {
        assert_eq!(normalize_report("   "), "");
        assert_eq!(normalize_report("a\n   \nb"), "a\n\nb");
    }

    #[test]
    fn test_trailing_newline_preserved() {
        assert_eq!(normalize_report("**Observations**\n"), "## Observations\n");
    }

    #[test]
    fn test_normalizing_twice_is_stable() {
        let inputs = [
            "**Diagnostic Report**\nSome text\n\n* item one\n**Observations**\nplain **bold** line",
            "**",
            "****",
            "** Padded **",
            "**unclosed marker",
            "####### seven",
        ];
        for input in inputs {
            let once = normalize_report(input);
            let twice = normalize_report(&once);
            assert_eq!(once, twice, "input {:?} did not stabilize", input);
        }
    }

    #[test]
    fn test_representative_report() {
        let input =
            "**Diagnostic Report**\nSome text\n\n* item one\n**Observations**\nplain **bold** line";
        let expected =
            "# Diagnostic Report\nSome text\n\n* item one\n## Observations\nplain **bold** line";
        assert_eq!(normalize_report(input), expected);
    }
}

// =============================================================================
// Compose / Scrub / Normalize Pipeline Tests
// =============================================================================

mod pipeline {
    use super::*;

    fn findings() -> ModelFindings {
        ModelFindings {
            clinical: Verdict::Lumpy,
            image: Verdict::NotLumpy,
        }
    }

    #[test]
    fn test_composed_report_normalizes_cleanly() {
        let raw = compose_report(&findings(), &CaseFeatures::default(), &CaseContext::default());
        let markdown = normalize_report(&raw);

        assert!(markdown.starts_with("# Lumpy Skin Disease Diagnostic Report\n"));
        assert!(markdown.contains("\n### Input Data\n"));
        assert!(markdown.contains("**Clinical Model Prediction:** Lumpy"));
        assert!(markdown.contains("**Image Model Prediction:** Not Lumpy"));
        assert!(markdown.contains("* Longitude: not available"));
        assert_eq!(raw.split('\n').count(), markdown.split('\n').count());
    }

    #[test]
    fn test_composed_report_with_context() {
        let context = CaseContext {
            city: Some("Nagpur".to_string()),
            temperature: Some(31.0),
            language: None,
        };
        let raw = compose_report(&findings(), &CaseFeatures::default(), &context);
        let markdown = normalize_report(&raw);

        assert!(markdown.contains("\n### Case Context\n"));
        assert!(markdown.contains("* Location: Nagpur"));
    }

    #[test]
    fn test_composed_report_flat_policy() {
        let raw = compose_report(&findings(), &CaseFeatures::default(), &CaseContext::default());
        let markdown = normalize_flat(&raw);

        assert!(markdown.starts_with("## Lumpy Skin Disease Diagnostic Report\n"));
        assert!(markdown.contains("\n## Input Data\n"));
    }

    #[test]
    fn test_scrubbed_model_output_normalizes() {
        let wrapped = "```markdown\n**Diagnostic Report**\n**Observations**\n* item\n```";
        let markdown = normalize_report(&strip_model_fences(wrapped));
        assert_eq!(markdown, "\n# Diagnostic Report\n## Observations\n* item\n");
    }
}

// =============================================================================
// Report Tests
// =============================================================================

mod report {
    use super::*;

    #[test]
    fn test_statistics_account_for_every_line() {
        let input = "**Diagnostic Report**\n\ntext\n* item\n**Observations**\n**unclosed";
        let result = normalize_with(input, NormalizeOptions::default());
        let stats = &result.report.statistics;

        assert_eq!(stats.total_lines, 6);
        assert_eq!(stats.converted_headings, 2);
        assert_eq!(
            stats.converted_headings + stats.passthrough_lines + stats.blank_lines,
            stats.total_lines
        );
        assert_eq!(stats.class_counts.values().sum::<usize>(), stats.total_lines);
    }

    #[test]
    fn test_conversion_notes() {
        let result = normalize_with(
            "**Diagnostic Report**\n\n**Observations**",
            NormalizeOptions::default(),
        );
        let notes = &result.report.notes;

        assert_eq!(notes.len(), 2);
        assert_eq!(notes[0].line, 1);
        assert_eq!(notes[0].kind, NoteKind::HeadingConverted);
        assert_eq!(notes[0].keyword.as_deref(), Some("Diagnostic Report"));
        assert_eq!(notes[1].line, 3);
        assert_eq!(notes[1].keyword.as_deref(), Some("Observations"));
    }

    #[test]
    fn test_suspect_note_has_suggestion() {
        let result = normalize_with("**Observations", NormalizeOptions::default());

        assert_eq!(result.markdown, "**Observations");
        assert_eq!(result.report.suspect_count(), 1);
        let note = &result.report.notes[0];
        assert_eq!(note.kind, NoteKind::SuspectHeading);
        assert!(note.suggestion.is_some());
    }

    #[test]
    fn test_report_text_format() {
        let result = normalize_with("**Observations**\ntext", NormalizeOptions::default());
        let text = result.report.to_text();

        assert!(text.contains("Report Normalization"));
        assert!(text.contains("Input:  test.txt"));
        assert!(text.contains("Output: test.md"));
        assert!(text.contains("Policy: keyword"));
        assert!(text.contains("Total lines:     2"));
    }

    #[test]
    fn test_report_json_round_trip() {
        let result = normalize_with("**Observations**\n**unclosed", NormalizeOptions::default());
        let json = result.report.to_json().unwrap();
        let parsed: NormalizeReport = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.input_name, "test.txt");
        assert_eq!(parsed.policy, HeadingPolicy::Keyword);
        assert_eq!(parsed.statistics.total_lines, 2);
        assert_eq!(parsed.notes.len(), 2);
        assert_eq!(parsed.suspect_count(), 1);
    }
}
