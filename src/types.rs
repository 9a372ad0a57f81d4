#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One unit of styled text within a block.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum InlineSpan {
    Text(String),
    Bold(Vec<InlineSpan>),
    Italic(Vec<InlineSpan>),
    /// Literal code text. Never parsed further.
    InlineCode(String),
    Link {
        /// Plain text only; labels never carry emphasis.
        label: Vec<InlineSpan>,
        url: String,
    },
}

impl InlineSpan {
    pub fn text(s: impl Into<String>) -> Self {
        InlineSpan::Text(s.into())
    }

    /// Flatten the span to the text a reader would see, dropping markup and URLs.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        self.push_plain_text(&mut out);
        out
    }

    fn push_plain_text(&self, out: &mut String) {
        match self {
            InlineSpan::Text(s) | InlineSpan::InlineCode(s) => out.push_str(s),
            InlineSpan::Bold(children)
            | InlineSpan::Italic(children)
            | InlineSpan::Link {
                label: children, ..
            } => {
                for child in children {
                    child.push_plain_text(out);
                }
            }
        }
    }
}

/// Flatten a span sequence (a line, list item, or table cell) to plain text.
pub fn spans_plain_text(spans: &[InlineSpan]) -> String {
    let mut out = String::new();
    for span in spans {
        span.push_plain_text(&mut out);
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum HeadingLevel {
    H1,
    H2,
}

impl HeadingLevel {
    pub fn as_u8(self) -> u8 {
        match self {
            HeadingLevel::H1 => 1,
            HeadingLevel::H2 => 2,
        }
    }
}

/// A fenced code block. `lines` holds the source lines between the fences, verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CodeBlock {
    /// Declared language tag; empty when the fence carried none.
    pub language: String,
    pub lines: Vec<String>,
}

impl CodeBlock {
    /// Header label shown above the block.
    pub fn label(&self) -> &str {
        if self.language.is_empty() {
            "code"
        } else {
            &self.language
        }
    }

    /// Source text as a copy action would place it on the clipboard.
    pub fn code(&self) -> String {
        self.lines.join("\n")
    }
}

/// One top-level structural unit of a rendered document.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BlockNode {
    Heading {
        level: HeadingLevel,
        spans: Vec<InlineSpan>,
    },
    Paragraph(Vec<InlineSpan>),
    List {
        ordered: bool,
        items: Vec<Vec<InlineSpan>>,
    },
    CodeBlock(CodeBlock),
    Table {
        header: Vec<Vec<InlineSpan>>,
        rows: Vec<Vec<Vec<InlineSpan>>>,
    },
    Rule,
    /// Vertical rhythm emitted for each blank source line.
    Spacer,
}

/// Ordered block nodes produced by one parse call.
///
/// Each parse yields an independent tree. Consumers replace the previous document
/// wholesale; node identity carries no meaning across parses.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Document {
    pub blocks: Vec<BlockNode>,
}

impl Document {
    pub fn new(blocks: Vec<BlockNode>) -> Self {
        Self { blocks }
    }

    pub fn blocks(&self) -> &[BlockNode] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BlockNode> {
        self.blocks.iter()
    }

    pub fn code_blocks(&self) -> impl Iterator<Item = &CodeBlock> {
        self.blocks.iter().filter_map(|b| match b {
            BlockNode::CodeBlock(code) => Some(code),
            _ => None,
        })
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = &'a BlockNode;
    type IntoIter = std::slice::Iter<'a, BlockNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks.iter()
    }
}

/// Output of suggestion extraction: the main body (still unparsed) plus the
/// follow-up questions found after the sentinel line.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ParseResult {
    pub content: String,
    pub suggestions: Vec<String>,
}
