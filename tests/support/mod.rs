#![allow(dead_code)]

use chatmark::{BlockNode, Options, RenderUpdate, StreamRenderer};

/// A complete reply in the shape the assistant produces, suggestions included.
pub const REPLY: &str = concat!(
    "# Sample size\n",
    "\n",
    "A **good** sample is *large enough*; see [the guide](https://example.org/guide) or run `n = N/(1+Ne^2)`.\n",
    "\n",
    "## Steps\n",
    "1. Define the population\n",
    "2. Pick **e**\n",
    "\n",
    "- Yamane\n",
    "* Krejcie & Morgan\n",
    "\n",
    "| Method | Use |\n",
    "|:---|---:|\n",
    "| Yamane | *known* N |\n",
    "| Cochran | unknown N |\n",
    "---\n",
    "```python\n",
    "def yamane(n, e):\n",
    "    return n / (1 + n * e ** 2)\n",
    "```\n",
    "Done.\n",
    "[[SUGGESTIONS]]\n",
    "- How do I pick e?\n",
    "- What about stratified samples?\n",
);

pub fn render_chunks(chunks: impl IntoIterator<Item = String>, opts: Options) -> RenderUpdate {
    let mut r = StreamRenderer::new(opts);
    for chunk in chunks {
        r.append(&chunk);
    }
    r.finish()
}

pub fn chunk_whole(text: &str) -> Vec<String> {
    vec![text.to_string()]
}

pub fn chunk_lines(text: &str) -> Vec<String> {
    text.split_inclusive('\n').map(|s| s.to_string()).collect()
}

pub fn chunk_chars(text: &str) -> Vec<String> {
    text.chars().map(|c| c.to_string()).collect()
}

fn fnv1a64(s: &str) -> u64 {
    let mut h: u64 = 0xcbf29ce484222325;
    for &b in s.as_bytes() {
        h ^= b as u64;
        h = h.wrapping_mul(0x100000001b3);
    }
    h
}

fn xorshift64(state: &mut u64) -> u64 {
    let mut x = *state;
    x ^= x << 13;
    x ^= x >> 7;
    x ^= x << 17;
    *state = x;
    x
}

pub fn chunk_pseudo_random(
    text: &str,
    seed_label: &str,
    trial: u64,
    max_bytes: usize,
) -> Vec<String> {
    assert!(max_bytes > 0);
    let mut state = fnv1a64(seed_label) ^ (trial.wrapping_mul(0x9e3779b97f4a7c15)) | 1;

    let mut out = Vec::new();
    let mut start = 0usize;
    while start < text.len() {
        let want = (xorshift64(&mut state) as usize % max_bytes) + 1;
        let mut end = (start + want).min(text.len());
        while end < text.len() && !text.is_char_boundary(end) {
            end += 1;
        }
        out.push(text[start..end].to_string());
        start = end;
    }
    out
}

/// Every prefix of `text` ending on a char boundary, shortest first.
pub fn prefixes(text: &str) -> impl Iterator<Item = &str> {
    text.char_indices()
        .map(|(i, _)| i)
        .skip(1)
        .chain(std::iter::once(text.len()))
        .map(move |end| &text[..end])
}

/// `new` still holds everything `old` held: equal, or the same container with its
/// items, rows or lines extended.
pub fn extends(old: &BlockNode, new: &BlockNode) -> bool {
    match (old, new) {
        (
            BlockNode::List {
                ordered: a,
                items: old_items,
            },
            BlockNode::List {
                ordered: b,
                items: new_items,
            },
        ) => a == b && new_items.starts_with(old_items),
        (
            BlockNode::Table {
                header: old_header,
                rows: old_rows,
            },
            BlockNode::Table {
                header: new_header,
                rows: new_rows,
            },
        ) => old_header == new_header && new_rows.starts_with(old_rows),
        (BlockNode::CodeBlock(old_code), BlockNode::CodeBlock(new_code)) => {
            old_code.language == new_code.language && new_code.lines.starts_with(&old_code.lines)
        }
        _ => old == new,
    }
}

/// Like [`extends`], but for the last block of a prefix, whose final entry may come
/// from a line that is still being typed.
pub fn keeps_completed_lines(old: &BlockNode, new: Option<&BlockNode>) -> bool {
    match old {
        BlockNode::List { ordered, items } if items.len() > 1 => match new {
            Some(BlockNode::List {
                ordered: o,
                items: new_items,
            }) => o == ordered && new_items.starts_with(&items[..items.len() - 1]),
            _ => false,
        },
        BlockNode::Table { header, rows } if !rows.is_empty() => match new {
            Some(BlockNode::Table {
                header: new_header,
                rows: new_rows,
            }) => new_header == header && new_rows.starts_with(&rows[..rows.len() - 1]),
            _ => false,
        },
        BlockNode::CodeBlock(code) if code.lines.len() > 1 => match new {
            Some(BlockNode::CodeBlock(new_code)) => {
                new_code.language == code.language
                    && new_code
                        .lines
                        .starts_with(&code.lines[..code.lines.len() - 1])
            }
            _ => false,
        },
        _ => true,
    }
}
