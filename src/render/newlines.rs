use std::borrow::Cow;

use super::StreamRenderer;

impl StreamRenderer {
    /// Convert `\r\n` and lone `\r` to `\n`.
    ///
    /// A chunk ending in `\r` may be the first half of a `\r\n` pair, so the decision
    /// is deferred to the next chunk (or to the end of the turn).
    pub(super) fn normalize_newlines<'a>(&mut self, chunk: &'a str) -> Cow<'a, str> {
        if !chunk.contains('\r') && !self.pending_cr {
            return Cow::Borrowed(chunk);
        }

        let mut out = String::with_capacity(chunk.len() + 1);
        let mut chars = chunk.chars().peekable();

        if self.pending_cr {
            if chars.peek() == Some(&'\n') {
                chars.next();
            }
            out.push('\n');
            self.pending_cr = false;
        }

        while let Some(c) = chars.next() {
            if c != '\r' {
                out.push(c);
                continue;
            }
            if chars.peek() == Some(&'\n') {
                chars.next();
                out.push('\n');
                continue;
            }
            if chars.peek().is_none() {
                self.pending_cr = true;
                continue;
            }
            out.push('\n');
        }

        Cow::Owned(out)
    }

    /// Resolve a deferred `\r` at the end of the turn.
    pub(super) fn flush_pending_cr(&mut self) {
        if self.pending_cr {
            self.raw.push('\n');
            self.pending_cr = false;
        }
    }
}
