//! Line classifiers shared by the block parser and the suggestion extractor.
//!
//! Every function takes a single line (no `\n`) and never fails: a line that does not
//! match simply returns `None`/`false`.

use crate::types::HeadingLevel;

const FENCE: &str = "```";

fn is_space_or_tab(b: u8) -> bool {
    b == b' ' || b == b'\t'
}

/// Opening fence: the line starts with three backticks. Returns the language tag
/// (the trimmed rest of the line, possibly empty).
pub fn fence_open(line: &str) -> Option<&str> {
    let s = line.trim();
    if !s.starts_with(FENCE) {
        return None;
    }
    // A longer backtick run is still one fence; the tag starts after it.
    Some(s.trim_start_matches('`').trim())
}

/// Closing fence: exactly three backticks once surrounding whitespace is removed.
pub fn is_fence_close(line: &str) -> bool {
    line.trim() == FENCE
}

/// A candidate table row: trimmed form starts and ends with `|`. A lone `|` counts.
pub fn is_table_row(line: &str) -> bool {
    let s = line.trim();
    s.starts_with('|') && s.ends_with('|')
}

/// Header/body separator such as `|---|:---:|`.
///
/// Grammar: `|` followed by one or more groups of optional `:`, one or more `-`,
/// optional `:`, `|`. Spaces and tabs are allowed around each group.
pub fn is_table_separator(line: &str) -> bool {
    let bytes = line.trim().as_bytes();
    if bytes.first() != Some(&b'|') {
        return false;
    }
    let mut i = 1usize;
    let mut groups = 0usize;
    while i < bytes.len() {
        while i < bytes.len() && is_space_or_tab(bytes[i]) {
            i += 1;
        }
        if i < bytes.len() && bytes[i] == b':' {
            i += 1;
        }
        let dashes_start = i;
        while i < bytes.len() && bytes[i] == b'-' {
            i += 1;
        }
        if i == dashes_start {
            return false;
        }
        if i < bytes.len() && bytes[i] == b':' {
            i += 1;
        }
        while i < bytes.len() && is_space_or_tab(bytes[i]) {
            i += 1;
        }
        if i >= bytes.len() || bytes[i] != b'|' {
            return false;
        }
        i += 1;
        groups += 1;
    }
    groups > 0
}

/// Cells of a table row: outer pipes stripped, split on inner `|`, each trimmed.
///
/// A lone `|` has no cells; `||` has one empty cell.
pub fn table_cells(line: &str) -> impl Iterator<Item = &str> {
    line.trim()
        .strip_prefix('|')
        .and_then(|s| s.strip_suffix('|'))
        .into_iter()
        .flat_map(|inner| inner.split('|'))
        .map(str::trim)
}

/// List item start. Returns `(ordered, item_text)`.
///
/// Recognized prefixes (after leading whitespace): `* `, `- `, `<digits>. `.
pub fn list_item(line: &str) -> Option<(bool, &str)> {
    let s = line.trim_start();
    let bytes = s.as_bytes();
    if bytes.len() < 2 {
        return None;
    }
    match bytes[0] {
        b'*' | b'-' => {
            if bytes[1] == b' ' {
                Some((false, s[2..].trim_end()))
            } else {
                None
            }
        }
        b'0'..=b'9' => {
            let mut i = 0usize;
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                i += 1;
            }
            if i + 1 >= bytes.len() || bytes[i] != b'.' || !is_space_or_tab(bytes[i + 1]) {
                return None;
            }
            Some((true, s[i + 2..].trim_end()))
        }
        _ => None,
    }
}

/// ATX heading of level 1 or 2. Deeper levels are not part of the dialect.
pub fn heading(line: &str) -> Option<(HeadingLevel, &str)> {
    let s = line.trim_start();
    if let Some(rest) = s.strip_prefix("## ") {
        return Some((HeadingLevel::H2, rest.trim()));
    }
    if let Some(rest) = s.strip_prefix("# ") {
        return Some((HeadingLevel::H1, rest.trim()));
    }
    None
}

/// Horizontal rule: a line beginning with `***` or `---`.
pub fn is_rule(line: &str) -> bool {
    let s = line.trim_start();
    s.starts_with("***") || s.starts_with("---")
}

pub fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Strip one leading list marker (`-`, `*`, `<digits>.`) followed by whitespace.
///
/// Text such as `-5 degrees?` or `1.5 litres?` is left alone.
pub fn strip_list_marker(line: &str) -> &str {
    let s = line.trim_start();
    let bytes = s.as_bytes();
    let marker_len = match bytes.first() {
        Some(b'-') | Some(b'*') => 1,
        Some(b'0'..=b'9') => {
            let mut i = 0usize;
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                i += 1;
            }
            if i < bytes.len() && bytes[i] == b'.' {
                i + 1
            } else {
                return s;
            }
        }
        _ => return s,
    };
    match bytes.get(marker_len) {
        Some(&b) if is_space_or_tab(b) => s[marker_len..].trim_start(),
        None => "",
        Some(_) => s,
    }
}
