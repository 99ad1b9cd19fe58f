use std::ops::Range;

use regex::Regex;

use crate::error::{Result, VersionSyncError};

/// Key used for the version in `pyproject.toml`
pub const CONFIG_VERSION_KEY: &str = "version";

/// Key used for the version in the package's `__init__.py`
pub const MODULE_VERSION_KEY: &str = "__version__";

/// A textual `key = "value"` version assignment.
///
/// Matches at the start of a line (leading blanks and a byte order mark
/// allowed) with either single or double quotes, so `python_version = "3.8"`
/// never matches the `version` key.
#[derive(Debug, Clone)]
pub struct AssignmentPattern {
    key: String,
    regex: Regex,
}

/// One assignment found in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment<'t> {
    /// The quoted value, without quotes
    pub value: &'t str,
    /// Byte range of the value inside the document
    pub value_range: Range<usize>,
}

impl AssignmentPattern {
    /// Build a pattern for the given key
    pub fn new(key: impl Into<String>) -> Result<Self> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(VersionSyncError::config("version key must not be empty"));
        }

        let source = format!(
            r#"(?m)^\x{{FEFF}}?[ \t]*{}[ \t]*=[ \t]*(?:"([^"\r\n]+)"|'([^'\r\n]+)')"#,
            regex::escape(&key)
        );
        let regex = Regex::new(&source).map_err(|e| {
            VersionSyncError::config(format!("invalid version key '{}': {}", key, e))
        })?;

        Ok(AssignmentPattern { key, regex })
    }

    /// Pattern for `version = "X.Y.Z"` in a TOML config document
    pub fn toml_style() -> Result<Self> {
        Self::new(CONFIG_VERSION_KEY)
    }

    /// Pattern for `__version__ = "X.Y.Z"` in a Python module
    pub fn module_style() -> Result<Self> {
        Self::new(MODULE_VERSION_KEY)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// All assignments in document order
    pub fn find_all<'t>(&self, text: &'t str) -> Vec<Assignment<'t>> {
        self.find_all_in(text, 0..text.len())
    }

    /// All assignments inside `span`, with ranges relative to the whole text.
    ///
    /// `span` must start at a line boundary.
    pub fn find_all_in<'t>(&self, text: &'t str, span: Range<usize>) -> Vec<Assignment<'t>> {
        let offset = span.start;
        self.regex
            .captures_iter(&text[span])
            .filter_map(|captures| captures.get(1).or_else(|| captures.get(2)))
            .map(|m| Assignment {
                value: m.as_str(),
                value_range: m.start() + offset..m.end() + offset,
            })
            .collect()
    }

    /// First assignment in the document
    pub fn find_first<'t>(&self, text: &'t str) -> Option<Assignment<'t>> {
        self.find_all(text).into_iter().next()
    }

    /// First assignment inside `span` whose value is exactly `value`
    pub fn find_value_in<'t>(
        &self,
        text: &'t str,
        span: Range<usize>,
        value: &str,
    ) -> Option<Assignment<'t>> {
        self.find_all_in(text, span)
            .into_iter()
            .find(|a| a.value == value)
    }
}

/// Replace the value at `value_range` with `new_value`, keeping every other byte.
pub fn splice_value(text: &str, value_range: Range<usize>, new_value: &str) -> String {
    let mut out = String::with_capacity(text.len() + new_value.len());
    out.push_str(&text[..value_range.start]);
    out.push_str(new_value);
    out.push_str(&text[value_range.end..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finds_double_quoted_toml_version() {
        let text = "[project]\nname = \"mqtt-docker-controller\"\nversion = \"0.1.0\"\n";
        let found = AssignmentPattern::toml_style().unwrap().find_first(text).unwrap();
        assert_eq!(found.value, "0.1.0");
        assert_eq!(&text[found.value_range], "0.1.0");
    }

    #[test]
    fn test_finds_single_quoted_module_version() {
        let text = "\"\"\"Package.\"\"\"\n\n__version__ = '2.3.4'\n";
        let found = AssignmentPattern::module_style().unwrap().find_first(text).unwrap();
        assert_eq!(found.value, "2.3.4");
    }

    #[test]
    fn test_tolerates_spacing_and_indentation() {
        let text = "  version=\"1.0\"\n";
        let found = AssignmentPattern::toml_style().unwrap().find_first(text).unwrap();
        assert_eq!(found.value, "1.0");
    }

    #[test]
    fn test_ignores_keys_that_only_end_with_version() {
        let text = "python_version = \"3.8\"\ntarget-version = \"py38\"\nversion = \"0.4.2\"\n";
        let found = AssignmentPattern::toml_style().unwrap().find_first(text).unwrap();
        assert_eq!(found.value, "0.4.2");
    }

    #[test]
    fn test_mismatched_quotes_do_not_match() {
        let text = "version = \"1.0.0'\n";
        assert!(AssignmentPattern::toml_style().unwrap().find_first(text).is_none());
    }

    #[test]
    fn test_empty_value_does_not_match() {
        let text = "__version__ = \"\"\n";
        assert!(AssignmentPattern::module_style().unwrap().find_first(text).is_none());
    }

    #[test]
    fn test_only_first_of_multiple_is_reported_first() {
        let text = "version = \"1.0.0\"\nversion = \"2.0.0\"\n";
        let pattern = AssignmentPattern::toml_style().unwrap();
        assert_eq!(pattern.find_first(text).unwrap().value, "1.0.0");
        assert_eq!(pattern.find_all(text).len(), 2);
        let whole = 0..text.len();
        assert_eq!(
            pattern.find_value_in(text, whole, "2.0.0").unwrap().value_range,
            29..34
        );
    }

    #[test]
    fn test_byte_order_mark_before_first_line() {
        let text = "\u{feff}__version__ = \"1.0.0\"\n";
        let found = AssignmentPattern::module_style().unwrap().find_first(text).unwrap();
        assert_eq!(found.value, "1.0.0");
        assert_eq!(&text[found.value_range], "1.0.0");
    }

    #[test]
    fn test_find_all_in_span_reports_absolute_ranges() {
        let text = "version = \"1.0.0\"\n[project]\nversion = \"2.0.0\"\n";
        let span = text.find("[project]\n").unwrap() + "[project]\n".len()..text.len();
        let found = AssignmentPattern::toml_style().unwrap().find_all_in(text, span);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].value, "2.0.0");
        assert_eq!(&text[found[0].value_range.clone()], "2.0.0");
    }

    #[test]
    fn test_splice_keeps_surrounding_bytes() {
        let text = "a\r\n__version__ = \"0.1.0\"  # keep\r\n";
        let found = AssignmentPattern::module_style().unwrap().find_first(text).unwrap();
        let out = splice_value(text, found.value_range, "0.2.0");
        assert_eq!(out, "a\r\n__version__ = \"0.2.0\"  # keep\r\n");
    }

    #[test]
    fn test_custom_key_is_escaped() {
        let pattern = AssignmentPattern::new("tool.version").unwrap();
        assert!(pattern.find_first("toolxversion = \"1\"\n").is_none());
        assert_eq!(
            pattern.find_first("tool.version = \"1\"\n").unwrap().value,
            "1"
        );
    }

    #[test]
    fn test_empty_key_is_rejected() {
        assert!(AssignmentPattern::new("  ").is_err());
    }
}
