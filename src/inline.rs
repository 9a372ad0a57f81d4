//! Inline span parsing for one line or table cell.
//!
//! Precedence, highest first: inline code, links, bold, italic. Each stage only sees
//! the text the previous stage left unclaimed, so code contents are never scanned for
//! links or emphasis, and link labels and bold contents are never scanned for italic.
//! Delimiters that do not pair up stay in the output as literal text.

use crate::types::InlineSpan;

pub fn parse_inline(line: &str) -> Vec<InlineSpan> {
    let mut out = Vec::new();
    let mut rest = line;
    while let Some((open, close)) = find_code_span(rest) {
        parse_links(&rest[..open], &mut out);
        out.push(InlineSpan::InlineCode(rest[open + 1..close].to_string()));
        rest = &rest[close + 1..];
    }
    parse_links(rest, &mut out);
    out
}

/// Byte offsets of the opening and closing backtick of the first non-empty code span.
fn find_code_span(s: &str) -> Option<(usize, usize)> {
    let mut from = 0usize;
    loop {
        let open = from + s[from..].find('`')?;
        let close = open + 1 + s[open + 1..].find('`')?;
        if close > open + 1 {
            return Some((open, close));
        }
        // "``" encloses nothing; the second backtick may still open a span.
        from = close;
    }
}

fn parse_links(s: &str, out: &mut Vec<InlineSpan>) {
    let mut rest = s;
    while let Some((open, label_end, url_end)) = find_link(rest) {
        parse_bold(&rest[..open], out);
        let label = &rest[open + 1..label_end];
        let url = &rest[label_end + 2..url_end];
        let mut label_spans = Vec::new();
        push_text(&mut label_spans, label);
        out.push(InlineSpan::Link {
            label: label_spans,
            url: url.to_string(),
        });
        rest = &rest[url_end + 1..];
    }
    parse_bold(rest, out);
}

/// `[label](url)`: offsets of `[`, of the `]` in `](`, and of the closing `)`.
///
/// Label and URL are matched lazily: the label ends at the first `](` and the URL at
/// the first `)` after it.
fn find_link(s: &str) -> Option<(usize, usize, usize)> {
    let open = s.find('[')?;
    let label_end = open + 1 + s[open + 1..].find("](")?;
    let url_end = label_end + 2 + s[label_end + 2..].find(')')?;
    Some((open, label_end, url_end))
}

fn parse_bold(s: &str, out: &mut Vec<InlineSpan>) {
    let mut rest = s;
    while let Some(open) = rest.find("**") {
        let Some(len) = rest[open + 2..].find("**") else {
            break;
        };
        let close = open + 2 + len;
        parse_italic(&rest[..open], out);
        // Bold contents are literal; italic only applies outside bold.
        let mut children = Vec::new();
        push_text(&mut children, &rest[open + 2..close]);
        out.push(InlineSpan::Bold(children));
        rest = &rest[close + 2..];
    }
    parse_italic(rest, out);
}

fn parse_italic(s: &str, out: &mut Vec<InlineSpan>) {
    let mut rest = s;
    while let Some(open) = rest.find('*') {
        let Some(len) = rest[open + 1..].find('*') else {
            break;
        };
        if len == 0 {
            // `**` left over from bold matching: literal.
            push_text(out, &rest[..open + 1]);
            rest = &rest[open + 1..];
            continue;
        }
        let close = open + 1 + len;
        push_text(out, &rest[..open]);
        out.push(InlineSpan::Italic(vec![InlineSpan::text(
            &rest[open + 1..close],
        )]));
        rest = &rest[close + 1..];
    }
    push_text(out, rest);
}

/// Append literal text, merging with a preceding text span.
fn push_text(out: &mut Vec<InlineSpan>, s: &str) {
    if s.is_empty() {
        return;
    }
    if let Some(InlineSpan::Text(prev)) = out.last_mut() {
        prev.push_str(s);
        return;
    }
    out.push(InlineSpan::text(s));
}
