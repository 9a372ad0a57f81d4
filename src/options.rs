#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub const DEFAULT_SUGGESTIONS_MARKER: &str = "[[SUGGESTIONS]]";
pub const DEFAULT_PLACEHOLDER: &str = "...";
pub const DEFAULT_ERROR_PREFIX: &str = "Sorry, something went wrong: ";

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SuggestionOptions {
    /// Sentinel line introducing the suggestions section.
    ///
    /// Compared against each trimmed line of the raw text. This is a contract with the
    /// prompt that asks the model for follow-up questions, so keep the two in sync.
    pub marker: String,
    /// Strip a leading `-`, `*` or `1.` (followed by whitespace) from each suggestion.
    pub strip_list_markers: bool,
}

impl Default for SuggestionOptions {
    fn default() -> Self {
        Self {
            marker: DEFAULT_SUGGESTIONS_MARKER.to_string(),
            strip_list_markers: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Options {
    pub suggestions: SuggestionOptions,
    /// Stored message text meaning "awaiting the first chunk".
    pub placeholder: String,
    /// Prepended to transport failure messages shown at the end of a failed turn.
    pub error_prefix: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            suggestions: SuggestionOptions::default(),
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            error_prefix: DEFAULT_ERROR_PREFIX.to_string(),
        }
    }
}

impl Options {
    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.suggestions.marker = marker.into();
        self
    }
}

#[cfg(all(test, feature = "serde"))]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_keeps_defaults() {
        let opts: Options = toml::from_str(
            r#"
            error_prefix = "Error: "

            [suggestions]
            marker = "Follow-up questions:"
            "#,
        )
        .unwrap();
        assert_eq!(opts.suggestions.marker, "Follow-up questions:");
        assert!(opts.suggestions.strip_list_markers);
        assert_eq!(opts.placeholder, DEFAULT_PLACEHOLDER);
        assert_eq!(opts.error_prefix, "Error: ");
    }

    #[test]
    fn empty_toml_is_default() {
        let opts: Options = toml::from_str("").unwrap();
        assert_eq!(opts, Options::default());
    }

    #[test]
    fn markdown_heading_marker_round_trips() {
        let opts = Options::default().with_marker("### Follow-up");
        let text = toml::to_string(&opts).unwrap();
        let back: Options = toml::from_str(&text).unwrap();
        assert_eq!(back.suggestions.marker, "### Follow-up");
    }
}
