//! Block-level parsing.
//!
//! The parser walks the text line by line. At most one multi-line construct (list,
//! table or code fence) is open at a time; it is flushed into the output when a line
//! does not continue it, and at end of input. Everything else is one node per source
//! line, so a growing prefix only ever changes the tail of the document.

use crate::inline::parse_inline;
use crate::syntax;
use crate::types::{BlockNode, CodeBlock, Document, InlineSpan};

type Row = Vec<Vec<InlineSpan>>;

#[derive(Debug, Default)]
enum OpenBlock {
    #[default]
    None,
    List {
        ordered: bool,
        items: Vec<Vec<InlineSpan>>,
    },
    Table {
        header: Option<Row>,
        rows: Vec<Row>,
    },
    Code(CodeBlock),
}

#[derive(Debug, Default)]
struct BlockParser {
    blocks: Vec<BlockNode>,
    open: OpenBlock,
}

/// Parse `text` into a [`Document`].
///
/// Total over any input. An unterminated code fence is emitted with the lines seen so
/// far, a header-only table is emitted with no body rows, and a dangling list item is
/// kept, so content visible for one prefix never disappears for a longer one.
///
/// Lines are split as by [`str::lines`]: a trailing newline does not start an extra
/// (blank) line.
pub fn parse_blocks(text: &str) -> Document {
    let mut parser = BlockParser::default();
    for line in text.lines() {
        parser.push_line(line);
    }
    parser.finish()
}

impl BlockParser {
    fn push_line(&mut self, line: &str) {
        if let OpenBlock::Code(code) = &mut self.open {
            if syntax::is_fence_close(line) {
                self.flush();
            } else {
                code.lines.push(line.to_string());
            }
            return;
        }

        if let Some(language) = syntax::fence_open(line) {
            self.flush();
            self.open = OpenBlock::Code(CodeBlock {
                language: language.to_string(),
                lines: Vec::new(),
            });
            return;
        }

        if syntax::is_table_row(line) {
            self.push_table_line(line);
            return;
        }

        if syntax::is_rule(line) {
            self.emit(BlockNode::Rule);
            return;
        }

        if let Some((level, content)) = syntax::heading(line) {
            self.emit(BlockNode::Heading {
                level,
                spans: parse_inline(content),
            });
            return;
        }

        if let Some((ordered, item)) = syntax::list_item(line) {
            self.push_list_item(ordered, item);
            return;
        }

        if syntax::is_blank(line) {
            self.emit(BlockNode::Spacer);
            return;
        }

        self.emit(BlockNode::Paragraph(parse_inline(line)));
    }

    fn push_table_line(&mut self, line: &str) {
        if !matches!(self.open, OpenBlock::Table { .. }) {
            self.flush();
            self.open = OpenBlock::Table {
                header: None,
                rows: Vec::new(),
            };
        }
        // Separators only mark the end of the header; they never become rows.
        if syntax::is_table_separator(line) {
            return;
        }
        let row: Row = syntax::table_cells(line).map(parse_inline).collect();
        if let OpenBlock::Table { header, rows } = &mut self.open {
            if header.is_none() {
                *header = Some(row);
            } else {
                rows.push(row);
            }
        }
    }

    fn push_list_item(&mut self, ordered: bool, item: &str) {
        let spans = parse_inline(item);
        if let OpenBlock::List {
            ordered: open_ordered,
            items,
        } = &mut self.open
        {
            if *open_ordered == ordered {
                items.push(spans);
                return;
            }
        }
        // Marker style changed (or no list open): start a new block.
        self.flush();
        self.open = OpenBlock::List {
            ordered,
            items: vec![spans],
        };
    }

    /// Flush the open construct, then append a single-line node.
    fn emit(&mut self, node: BlockNode) {
        self.flush();
        self.blocks.push(node);
    }

    fn flush(&mut self) {
        match std::mem::take(&mut self.open) {
            OpenBlock::None => {}
            OpenBlock::List { ordered, items } => {
                self.blocks.push(BlockNode::List { ordered, items });
            }
            OpenBlock::Table { header, rows } => {
                // A table that has only seen separator lines has nothing to show yet.
                if let Some(header) = header {
                    self.blocks.push(BlockNode::Table { header, rows });
                }
            }
            OpenBlock::Code(code) => {
                self.blocks.push(BlockNode::CodeBlock(code));
            }
        }
    }

    fn finish(mut self) -> Document {
        self.flush();
        Document::new(self.blocks)
    }
}
