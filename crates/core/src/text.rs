//! Small text helpers for legal display strings.

use std::sync::OnceLock;

use regex::Regex;

const CITATION_REGEX: &str = r"\d+\s+\w+\.?\s+\d+";

static CITATION_PATTERN: OnceLock<Option<Regex>> = OnceLock::new();

/// Volume, single-word reporter, page: `12 Cal. 345`, `5 Wend 42`.
///
/// Built once. `None` only if the constant fails to compile, which the tests rule out.
fn citation_pattern() -> Option<&'static Regex> {
    CITATION_PATTERN
        .get_or_init(|| Regex::new(CITATION_REGEX).ok())
        .as_ref()
}

/// Uppercase the first character, leaving the rest untouched.
#[must_use]
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `contract_law` -> `Contract Law`.
#[must_use]
pub fn format_legal_area_name(area_id: &str) -> String {
    area_id
        .split('_')
        .map(capitalize_first)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Cut `text` to `max_chars` characters and append `...` when it was longer.
#[must_use]
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_owned(),
    }
}

/// Trim and collapse internal whitespace runs in a case name.
#[must_use]
pub fn format_case_name(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// First reporter citation found in `text`, if any.
#[must_use]
pub fn extract_case_citation(text: &str) -> Option<&str> {
    citation_pattern()?.find(text).map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn citation_pattern_compiles() {
        assert!(Regex::new(CITATION_REGEX).is_ok());
        assert!(citation_pattern().is_some());
    }

    #[test]
    fn legal_area_names_are_title_cased() {
        assert_eq!(format_legal_area_name("contract_law"), "Contract Law");
        assert_eq!(format_legal_area_name("torts"), "Torts");
        assert_eq!(format_legal_area_name(""), "");
    }

    #[test]
    fn truncate_counts_chars() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("abcdef", 3), "abc...");
        assert_eq!(truncate_text("§§§§", 2), "§§...");
        assert_eq!(truncate_text("exact", 5), "exact");
    }

    #[test]
    fn case_names_collapse_whitespace() {
        assert_eq!(format_case_name("  Roe   v.\n Wade "), "Roe v. Wade");
    }

    #[test]
    fn citation_extraction() {
        assert_eq!(
            extract_case_citation("Smith v. Jones, 12 Cal. 345 (1859)."),
            Some("12 Cal. 345")
        );
        assert_eq!(extract_case_citation("no citation here"), None);
    }

    #[test]
    fn capitalize_handles_empty() {
        assert_eq!(capitalize_first(""), "");
        assert_eq!(capitalize_first("beginner"), "Beginner");
    }
}
