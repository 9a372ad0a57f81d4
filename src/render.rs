mod newlines;

use std::fmt;

use crate::block::parse_blocks;
use crate::options::Options;
use crate::suggest::extract_with;
use crate::types::{Document, ParseResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnStatus {
    /// No text has arrived yet; the busy indicator is shown.
    Waiting,
    Streaming,
    Complete,
    /// The transport reported an error. Any partial document is kept.
    Failed,
}

impl TurnStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, TurnStatus::Complete | TurnStatus::Failed)
    }
}

/// What the rendering layer should display for a turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    Busy,
    Document(Document),
}

impl View {
    pub fn document(&self) -> Option<&Document> {
        match self {
            View::Busy => None,
            View::Document(doc) => Some(doc),
        }
    }
}

/// Render a stored message.
///
/// The placeholder text renders as the busy indicator. Stored messages have already
/// had their suggestions section removed, so the text is block-parsed as-is.
pub fn render_message(text: &str, opts: &Options) -> View {
    if text == opts.placeholder {
        View::Busy
    } else {
        View::Document(parse_blocks(text))
    }
}

/// Full replacement for whatever was previously displayed for the turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderUpdate {
    pub status: TurnStatus,
    pub view: View,
    /// Suggestions found by this parse. Usually empty until the reply is complete.
    pub suggestions: Vec<String>,
    /// User-visible error line for a failed turn.
    pub error: Option<String>,
}

impl RenderUpdate {
    pub fn document(&self) -> Option<&Document> {
        self.view.document()
    }

    pub fn is_final(&self) -> bool {
        self.status.is_terminal()
    }
}

/// Owns the accumulated text of one assistant turn and re-renders it per chunk.
///
/// Every call re-runs suggestion extraction and block parsing over the whole
/// accumulator; nothing else is carried between calls. Create one renderer per turn,
/// or [`reset`](Self::reset) it when a new turn starts.
pub struct StreamRenderer {
    opts: Options,
    raw: String,
    pending_cr: bool,
    status: TurnStatus,
    chunks: usize,
    parsed: ParseResult,
    document: Document,
    error: Option<String>,
}

impl fmt::Debug for StreamRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamRenderer")
            .field("raw_len", &self.raw.len())
            .field("status", &self.status)
            .field("chunks", &self.chunks)
            .field("blocks", &self.document.len())
            .field("suggestions", &self.parsed.suggestions.len())
            .field("pending_cr", &self.pending_cr)
            .finish()
    }
}

impl Default for StreamRenderer {
    fn default() -> Self {
        Self::new(Options::default())
    }
}

impl StreamRenderer {
    pub fn new(opts: Options) -> Self {
        Self {
            opts,
            raw: String::new(),
            pending_cr: false,
            status: TurnStatus::Waiting,
            chunks: 0,
            parsed: ParseResult::default(),
            document: Document::default(),
            error: None,
        }
    }

    pub fn options(&self) -> &Options {
        &self.opts
    }

    /// Accumulated source text, as copy and export actions need it.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Main content of the latest parse (the accumulator minus any suggestions section).
    ///
    /// Once the turn is complete this is the text to persist for the message.
    pub fn content(&self) -> &str {
        &self.parsed.content
    }

    pub fn status(&self) -> TurnStatus {
        self.status
    }

    pub fn chunks(&self) -> usize {
        self.chunks
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// The turn's follow-up suggestions. Only available once the stream has completed.
    pub fn turn_suggestions(&self) -> Option<&[String]> {
        if self.status == TurnStatus::Complete {
            Some(&self.parsed.suggestions)
        } else {
            None
        }
    }

    pub fn append(&mut self, chunk: &str) -> RenderUpdate {
        if self.status.is_terminal() {
            tracing::warn!(
                status = ?self.status,
                bytes = chunk.len(),
                "chunk arrived after the turn ended; ignoring"
            );
            return self.snapshot();
        }

        self.chunks += 1;
        if !chunk.is_empty() {
            let chunk = self.normalize_newlines(chunk);
            self.raw.push_str(&chunk);
        }
        if !self.raw.is_empty() {
            self.status = TurnStatus::Streaming;
        }

        self.reparse();
        tracing::trace!(
            bytes = self.raw.len(),
            blocks = self.document.len(),
            suggestions = self.parsed.suggestions.len(),
            "re-rendered turn"
        );
        self.snapshot()
    }

    /// End of stream: one last parse whose suggestions become the turn's suggestions.
    pub fn finish(&mut self) -> RenderUpdate {
        if self.status.is_terminal() {
            tracing::warn!(status = ?self.status, "turn already ended");
            return self.snapshot();
        }

        self.flush_pending_cr();
        self.status = TurnStatus::Complete;
        self.reparse();
        tracing::debug!(
            bytes = self.raw.len(),
            chunks = self.chunks,
            blocks = self.document.len(),
            suggestions = self.parsed.suggestions.len(),
            "turn complete"
        );
        self.snapshot()
    }

    /// End the turn because the transport failed.
    ///
    /// Whatever arrived stays visible; the busy indicator is dropped and the error
    /// line is attached to the update.
    pub fn fail(&mut self, message: impl fmt::Display) -> RenderUpdate {
        if self.status.is_terminal() {
            tracing::warn!(status = ?self.status, "turn already ended");
            return self.snapshot();
        }

        self.flush_pending_cr();
        self.status = TurnStatus::Failed;
        self.error = Some(format!("{}{}", self.opts.error_prefix, message));
        self.reparse();
        tracing::debug!(
            bytes = self.raw.len(),
            chunks = self.chunks,
            error = self.error.as_deref().unwrap_or_default(),
            "turn failed"
        );
        self.snapshot()
    }

    /// Current state without consuming input.
    pub fn snapshot(&self) -> RenderUpdate {
        let view = if self.status == TurnStatus::Waiting {
            View::Busy
        } else {
            View::Document(self.document.clone())
        };
        let suggestions = if self.status == TurnStatus::Failed {
            Vec::new()
        } else {
            self.parsed.suggestions.clone()
        };
        RenderUpdate {
            status: self.status,
            view,
            suggestions,
            error: self.error.clone(),
        }
    }

    /// Drop the accumulator and start over for a new turn.
    pub fn reset(&mut self) {
        self.raw.clear();
        self.pending_cr = false;
        self.status = TurnStatus::Waiting;
        self.chunks = 0;
        self.parsed = ParseResult::default();
        self.document = Document::default();
        self.error = None;
    }

    fn reparse(&mut self) {
        self.parsed = extract_with(&self.raw, &self.opts.suggestions);
        self.document = parse_blocks(&self.parsed.content);
    }
}
