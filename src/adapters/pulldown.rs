//! Bridge to rendering layers built on `pulldown-cmark`.
//!
//! A [`Document`] is lowered to the `pulldown_cmark` event stream, so existing
//! event consumers (including `pulldown_cmark::html`) can draw it. Spacers have no
//! event equivalent and are skipped.

use pulldown_cmark::{
    Alignment, CodeBlockKind, CowStr, Event, HeadingLevel as PdHeadingLevel, LinkType, Tag,
    TagEnd,
};

use crate::types::{BlockNode, Document, HeadingLevel, InlineSpan};

/// Lower a document to events. Text is borrowed from `doc`.
pub fn document_events(doc: &Document) -> Vec<Event<'_>> {
    let mut out = Vec::new();
    for block in doc {
        push_block(block, &mut out);
    }
    out
}

/// Render a document to HTML, appending to `buf`.
pub fn push_html(buf: &mut String, doc: &Document) {
    pulldown_cmark::html::push_html(buf, document_events(doc).into_iter());
}

fn heading_level(level: HeadingLevel) -> PdHeadingLevel {
    match level {
        HeadingLevel::H1 => PdHeadingLevel::H1,
        HeadingLevel::H2 => PdHeadingLevel::H2,
    }
}

fn push_block<'a>(block: &'a BlockNode, out: &mut Vec<Event<'a>>) {
    match block {
        BlockNode::Heading { level, spans } => {
            let level = heading_level(*level);
            out.push(Event::Start(Tag::Heading {
                level,
                id: None,
                classes: Vec::new(),
                attrs: Vec::new(),
            }));
            push_spans(spans, out);
            out.push(Event::End(TagEnd::Heading(level)));
        }
        BlockNode::Paragraph(spans) => {
            out.push(Event::Start(Tag::Paragraph));
            push_spans(spans, out);
            out.push(Event::End(TagEnd::Paragraph));
        }
        BlockNode::List { ordered, items } => {
            out.push(Event::Start(Tag::List(if *ordered { Some(1) } else { None })));
            for item in items {
                out.push(Event::Start(Tag::Item));
                push_spans(item, out);
                out.push(Event::End(TagEnd::Item));
            }
            out.push(Event::End(TagEnd::List(*ordered)));
        }
        BlockNode::CodeBlock(code) => {
            out.push(Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(
                CowStr::Borrowed(&code.language),
            ))));
            for line in &code.lines {
                out.push(Event::Text(CowStr::Borrowed(line)));
                out.push(Event::Text(CowStr::Borrowed("\n")));
            }
            out.push(Event::End(TagEnd::CodeBlock));
        }
        BlockNode::Table { header, rows } => {
            let columns = rows
                .iter()
                .map(Vec::len)
                .chain(std::iter::once(header.len()))
                .max()
                .unwrap_or_default();
            out.push(Event::Start(Tag::Table(vec![Alignment::None; columns])));
            out.push(Event::Start(Tag::TableHead));
            for cell in header {
                push_cell(cell, out);
            }
            out.push(Event::End(TagEnd::TableHead));
            for row in rows {
                out.push(Event::Start(Tag::TableRow));
                for cell in row {
                    push_cell(cell, out);
                }
                out.push(Event::End(TagEnd::TableRow));
            }
            out.push(Event::End(TagEnd::Table));
        }
        BlockNode::Rule => out.push(Event::Rule),
        BlockNode::Spacer => {}
    }
}

fn push_cell<'a>(cell: &'a [InlineSpan], out: &mut Vec<Event<'a>>) {
    out.push(Event::Start(Tag::TableCell));
    push_spans(cell, out);
    out.push(Event::End(TagEnd::TableCell));
}

fn push_spans<'a>(spans: &'a [InlineSpan], out: &mut Vec<Event<'a>>) {
    for span in spans {
        match span {
            InlineSpan::Text(s) => out.push(Event::Text(CowStr::Borrowed(s))),
            InlineSpan::InlineCode(s) => out.push(Event::Code(CowStr::Borrowed(s))),
            InlineSpan::Bold(children) => {
                out.push(Event::Start(Tag::Strong));
                push_spans(children, out);
                out.push(Event::End(TagEnd::Strong));
            }
            InlineSpan::Italic(children) => {
                out.push(Event::Start(Tag::Emphasis));
                push_spans(children, out);
                out.push(Event::End(TagEnd::Emphasis));
            }
            InlineSpan::Link { label, url } => {
                out.push(Event::Start(Tag::Link {
                    link_type: LinkType::Inline,
                    dest_url: CowStr::Borrowed(url),
                    title: CowStr::Borrowed(""),
                    id: CowStr::Borrowed(""),
                }));
                push_spans(label, out);
                out.push(Event::End(TagEnd::Link));
            }
        }
    }
}
