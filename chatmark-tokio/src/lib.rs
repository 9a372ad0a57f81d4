//! Tokio glue for `chatmark`.
//!
//! `chatmark` is runtime-agnostic: a [`StreamRenderer`](chatmark::StreamRenderer) is owned
//! by whoever draws the turn. This crate sits at the transport boundary:
//!
//! - [`DeltaSender`] applies a backpressure policy on the producer side.
//! - [`CoalescingReceiver`] merges tiny deltas into larger chunks (newline-gated and/or
//!   time-window flush) so the full re-parse runs less often.
//! - [`spawn_turn`] runs an actor task that owns the renderer for one turn, and
//!   [`TurnGate`] discards the output of turns that were superseded.

mod coalesce;
mod sender;
mod turn;

pub use coalesce::{
    CoalesceOptions, CoalescePreset, CoalesceStats, Coalesced, CoalescedChunk,
    CoalescingReceiver, FlushReason,
};
pub use sender::{BackpressurePolicy, DeltaSender, SendError, SendOutcome};
pub use turn::{TurnGate, TurnId, TurnUpdate, spawn_turn};

/// One message on the transport channel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Delta {
    /// A piece of the reply text, of any size.
    Text(String),
    /// The backend gave up. Ends the turn.
    Failed(String),
}

impl From<&str> for Delta {
    fn from(s: &str) -> Self {
        Delta::Text(s.to_string())
    }
}

impl From<String> for Delta {
    fn from(s: String) -> Self {
        Delta::Text(s)
    }
}
