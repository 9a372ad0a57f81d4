//! Separates the trailing follow-up suggestions section from the main body.
//!
//! The section is introduced by a sentinel line (see [`SuggestionOptions::marker`]);
//! every non-empty line after the last sentinel is one suggestion. While a reply is
//! still streaming the sentinel has usually not arrived yet, so "no suggestions" is
//! the common result.

use crate::options::SuggestionOptions;
use crate::syntax;
use crate::types::ParseResult;

/// Extract suggestions using the default sentinel.
pub fn extract(raw: &str) -> ParseResult {
    extract_with(raw, &SuggestionOptions::default())
}

/// Split `raw` into main content and suggestions.
///
/// Without a sentinel line, `content` is `raw` unchanged. With one, `content` is the
/// text before the last sentinel with trailing whitespace removed, and `suggestions`
/// holds the trimmed non-empty lines after it, in order, duplicates included.
pub fn extract_with(raw: &str, opts: &SuggestionOptions) -> ParseResult {
    let Some((marker_start, marker_end)) = find_last_marker(raw, &opts.marker) else {
        return ParseResult {
            content: raw.to_string(),
            suggestions: Vec::new(),
        };
    };

    let suggestions = raw[marker_end..]
        .lines()
        .map(str::trim)
        .map(|line| {
            if opts.strip_list_markers {
                syntax::strip_list_marker(line)
            } else {
                line
            }
        })
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();

    ParseResult {
        content: raw[..marker_start].trim_end().to_string(),
        suggestions,
    }
}

/// Byte range of the last line whose trimmed form equals the trimmed marker.
fn find_last_marker(raw: &str, marker: &str) -> Option<(usize, usize)> {
    let marker = marker.trim();
    if marker.is_empty() {
        return None;
    }
    let mut found = None;
    let mut start = 0usize;
    for line in raw.split_inclusive('\n') {
        let end = start + line.len();
        if line.trim() == marker {
            found = Some((start, end));
        }
        start = end;
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    const MARKER: &str = crate::options::DEFAULT_SUGGESTIONS_MARKER;

    #[test]
    fn splits_content_and_questions() {
        let raw = format!("Hello\n{MARKER}\nQ1?\nQ2?");
        let r = extract(&raw);
        assert_eq!(r.content, "Hello");
        assert_eq!(r.suggestions, vec!["Q1?", "Q2?"]);
    }

    #[test]
    fn no_marker_returns_input_unchanged() {
        let raw = "Hello\n\n- item\n  ";
        let r = extract(raw);
        assert_eq!(r.content, raw);
        assert!(r.suggestions.is_empty());
    }

    #[test]
    fn strips_list_markers_and_keeps_duplicates() {
        let raw = format!("Body\n\n  {MARKER}  \n\n- A?\n* A?\n3. B?\n   \n");
        let r = extract(&raw);
        assert_eq!(r.content, "Body");
        assert_eq!(r.suggestions, vec!["A?", "A?", "B?"]);
    }

    #[test]
    fn marker_without_questions_yet() {
        let raw = format!("Body text\n{MARKER}");
        let r = extract(&raw);
        assert_eq!(r.content, "Body text");
        assert!(r.suggestions.is_empty());
    }

    #[test]
    fn last_marker_wins() {
        let raw = format!("a\n{MARKER}\nx\n{MARKER}\ny");
        let r = extract(&raw);
        assert_eq!(r.content, format!("a\n{MARKER}\nx"));
        assert_eq!(r.suggestions, vec!["y"]);
    }

    #[test]
    fn marker_must_be_the_whole_line() {
        let raw = format!("see {MARKER} inline\nnext");
        let r = extract(&raw);
        assert_eq!(r.content, raw);
        assert!(r.suggestions.is_empty());
    }

    #[test]
    fn custom_marker_without_stripping() {
        let opts = SuggestionOptions {
            marker: "Follow-up questions:".to_string(),
            strip_list_markers: false,
        };
        let r = extract_with("Answer\nFollow-up questions:\n- keep dash", &opts);
        assert_eq!(r.content, "Answer");
        assert_eq!(r.suggestions, vec!["- keep dash"]);
    }

    #[test]
    fn blank_marker_never_matches() {
        let opts = SuggestionOptions {
            marker: "   ".to_string(),
            strip_list_markers: true,
        };
        let r = extract_with("a\n\nb", &opts);
        assert_eq!(r.content, "a\n\nb");
        assert!(r.suggestions.is_empty());
    }
}
