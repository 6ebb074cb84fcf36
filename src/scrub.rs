//! Model output scrubbing

/// Strip the code-fence wrappers that text-generation models add around
/// markdown reports.
///
/// Every triple-backtick markdown opener is removed first, then every
/// remaining bare triple-backtick, wherever they appear in the text.
/// Pure and idempotent; input without fences comes back unchanged.
pub fn strip_model_fences(text: &str) -> String {
    text.replace("```markdown", "").replace("```", "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_wrapped_report() {
        let wrapped = "```markdown\n# Report\ntext\n```";
        assert_eq!(strip_model_fences(wrapped), "\n# Report\ntext\n");
    }

    #[test]
    fn test_strips_bare_fences() {
        assert_eq!(strip_model_fences("```\ntext\n```"), "\ntext\n");
    }

    #[test]
    fn test_untouched_without_fences() {
        let text = "# Report\n**bold** text";
        assert_eq!(strip_model_fences(text), text);
    }

    #[test]
    fn test_idempotent() {
        let wrapped = "```markdown\ntext\n```";
        let once = strip_model_fences(wrapped);
        assert_eq!(strip_model_fences(&once), once);
    }
}
