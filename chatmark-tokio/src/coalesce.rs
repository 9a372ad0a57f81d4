use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::Instant;

use crate::Delta;

/// When buffered reply text is handed to the renderer.
///
/// Every hand-over costs one full re-parse of the turn, so fewer, larger chunks are
/// cheaper; the delay bound keeps a slow trickle of tokens visible.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CoalesceOptions {
    /// Hand over as soon as a line is complete.
    pub flush_on_newline: bool,
    /// Longest time the first buffered byte may wait.
    pub max_delay: Duration,
    /// Hand over once this many bytes are buffered.
    pub max_bytes: usize,
}

impl Default for CoalesceOptions {
    fn default() -> Self {
        CoalescePreset::Lines.options()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CoalescePreset {
    /// Re-render per completed line; lists and tables grow row by row.
    Lines,
    /// Re-render often enough that a word appears as it is typed.
    Typing,
    /// Re-render on a fixed cadence regardless of line breaks, for very long replies.
    Paced,
}

impl CoalescePreset {
    pub fn label(self) -> &'static str {
        match self {
            CoalescePreset::Lines => "lines",
            CoalescePreset::Typing => "typing",
            CoalescePreset::Paced => "paced",
        }
    }

    pub fn options(self) -> CoalesceOptions {
        let (flush_on_newline, delay_ms, max_bytes) = match self {
            CoalescePreset::Lines => (true, 50, 8 * 1024),
            CoalescePreset::Typing => (true, 16, 1024),
            CoalescePreset::Paced => (false, 120, 32 * 1024),
        };
        CoalesceOptions {
            flush_on_newline,
            max_delay: Duration::from_millis(delay_ms),
            max_bytes,
        }
    }
}

impl From<CoalescePreset> for CoalesceOptions {
    fn from(preset: CoalescePreset) -> Self {
        preset.options()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlushReason {
    Newline,
    MaxDelay,
    MaxBytes,
    /// A failure arrived; buffered text is handed over before it.
    Failure,
    ChannelClosed,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CoalescedChunk {
    pub text: String,
    pub reason: FlushReason,
    /// Number of deltas merged into this chunk.
    pub deltas: usize,
}

/// What [`CoalescingReceiver::recv`] yields.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Coalesced {
    Chunk(CoalescedChunk),
    Failed(String),
}

/// Counters for one turn's channel; `reparses` is how many times the renderer will
/// re-parse the accumulator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CoalesceStats {
    pub deltas: u64,
    pub reparses: u64,
    pub bytes: u64,
    pub failures: u64,
    pub last_reason: Option<FlushReason>,
}

/// Merges high-frequency deltas into fewer, larger chunks.
///
/// Order is preserved: text received before a failure is always yielded before the
/// failure itself.
pub struct CoalescingReceiver {
    rx: mpsc::Receiver<Delta>,
    opts: CoalesceOptions,
    buf: String,
    deadline: Option<Instant>,
    failure: Option<String>,
    stats: CoalesceStats,
}

impl CoalescingReceiver {
    pub fn new(rx: mpsc::Receiver<Delta>, opts: CoalesceOptions) -> Self {
        Self {
            rx,
            opts,
            buf: String::new(),
            deadline: None,
            failure: None,
            stats: CoalesceStats::default(),
        }
    }

    pub fn options(&self) -> CoalesceOptions {
        self.opts
    }

    pub fn stats(&self) -> CoalesceStats {
        self.stats
    }

    /// Next chunk or failure; `None` once the channel is closed and drained.
    pub async fn recv(&mut self) -> Option<Coalesced> {
        if let Some(message) = self.failure.take() {
            return Some(self.failed(message));
        }

        let mut deltas = 0usize;
        loop {
            if !self.buf.is_empty() {
                if let Some(reason) = self.ready() {
                    return Some(self.emit(reason, deltas));
                }
            }

            let next = match self.deadline {
                Some(deadline) => match tokio::time::timeout_at(deadline, self.rx.recv()).await {
                    Ok(next) => next,
                    Err(_) => return Some(self.emit(FlushReason::MaxDelay, deltas)),
                },
                None => self.rx.recv().await,
            };

            match next {
                Some(Delta::Text(s)) => {
                    if self.deadline.is_none() {
                        self.deadline = Some(Instant::now() + self.opts.max_delay);
                    }
                    self.buf.push_str(&s);
                    deltas += 1;
                }
                Some(Delta::Failed(message)) if self.buf.is_empty() => {
                    return Some(self.failed(message));
                }
                Some(Delta::Failed(message)) => {
                    self.failure = Some(message);
                    return Some(self.emit(FlushReason::Failure, deltas));
                }
                None if self.buf.is_empty() => return None,
                None => return Some(self.emit(FlushReason::ChannelClosed, deltas)),
            }
        }
    }

    fn ready(&self) -> Option<FlushReason> {
        if self.buf.len() >= self.opts.max_bytes {
            Some(FlushReason::MaxBytes)
        } else if self.opts.flush_on_newline && self.buf.contains('\n') {
            Some(FlushReason::Newline)
        } else {
            None
        }
    }

    fn failed(&mut self, message: String) -> Coalesced {
        self.stats.failures += 1;
        Coalesced::Failed(message)
    }

    fn emit(&mut self, reason: FlushReason, deltas: usize) -> Coalesced {
        self.deadline = None;
        let text = std::mem::take(&mut self.buf);
        self.stats.deltas += deltas as u64;
        self.stats.reparses += 1;
        self.stats.bytes += text.len() as u64;
        self.stats.last_reason = Some(reason);
        Coalesced::Chunk(CoalescedChunk {
            text,
            reason,
            deltas,
        })
    }
}
