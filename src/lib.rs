//! Markdown-ish rendering for assistant replies that arrive as a token stream.
//!
//! The pipeline is stateless: on every chunk the whole accumulated text is run
//! through [`extract_with`] (splitting off the follow-up suggestions section) and
//! [`parse_blocks`] (block and inline structure), and the result replaces the
//! previous render. The parsers are total, so every prefix of a reply yields a valid
//! document. [`StreamRenderer`] owns the accumulator for one turn.

pub mod block;
pub mod inline;
pub mod options;
pub mod render;
pub mod suggest;
pub mod syntax;
pub mod types;

#[cfg(feature = "pulldown")]
pub mod adapters;

pub use block::parse_blocks;
pub use inline::parse_inline;
pub use options::*;
pub use render::*;
pub use suggest::{extract, extract_with};
pub use types::*;
