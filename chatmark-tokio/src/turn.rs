use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chatmark::{Options, RenderUpdate, StreamRenderer};
use tokio::sync::mpsc;

use crate::Delta;
use crate::coalesce::{CoalesceOptions, Coalesced, CoalescingReceiver};

/// Identifies one assistant turn within a [`TurnGate`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TurnId(u64);

impl TurnId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TurnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "turn#{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TurnUpdate {
    pub turn: TurnId,
    pub update: RenderUpdate,
}

/// Tracks which turn of a conversation is active.
///
/// Starting a new turn (the user sent another message) or abandoning the current one
/// (the user switched conversations) makes every earlier turn stale. Stale actors stop
/// reading their transport, and their late updates are rejected by [`TurnGate::accept`].
/// Clones share the same state.
#[derive(Clone, Debug, Default)]
pub struct TurnGate {
    current: Arc<AtomicU64>,
}

impl TurnGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new turn, superseding the previous one.
    pub fn begin(&self) -> TurnId {
        let id = TurnId(self.current.fetch_add(1, Ordering::AcqRel) + 1);
        tracing::debug!(turn = %id, "turn started");
        id
    }

    /// Leave the active turn without starting another.
    pub fn abandon(&self) {
        let prev = self.current.fetch_add(1, Ordering::AcqRel);
        tracing::debug!(turn = prev, "turn abandoned");
    }

    pub fn is_current(&self, turn: TurnId) -> bool {
        self.current.load(Ordering::Acquire) == turn.0
    }

    /// The update to apply, or `None` when it belongs to an inactive turn.
    pub fn accept(&self, update: TurnUpdate) -> Option<RenderUpdate> {
        if self.is_current(update.turn) {
            Some(update.update)
        } else {
            tracing::debug!(turn = %update.turn, "discarding update of inactive turn");
            None
        }
    }
}

/// Spawn a task that owns the [`StreamRenderer`] for a new turn and emits one
/// [`TurnUpdate`] per coalesced chunk.
///
/// The first update is the busy view. The last one is `Complete` when the delta channel
/// closes, or `Failed` when a [`Delta::Failed`] arrives. If the turn is superseded the
/// task stops reading `rx` and emits nothing further, so the producer sees
/// [`SendError::Closed`](crate::SendError::Closed).
pub fn spawn_turn(
    gate: &TurnGate,
    opts: Options,
    rx: mpsc::Receiver<Delta>,
    coalesce: CoalesceOptions,
) -> (TurnId, mpsc::Receiver<TurnUpdate>) {
    let turn = gate.begin();
    let gate = gate.clone();
    let (tx_out, rx_out) = mpsc::channel::<TurnUpdate>(64);

    tokio::spawn(async move {
        let mut renderer = StreamRenderer::new(opts);
        let mut rx = CoalescingReceiver::new(rx, coalesce);

        let busy = TurnUpdate {
            turn,
            update: renderer.snapshot(),
        };
        if tx_out.send(busy).await.is_err() {
            return;
        }

        while let Some(item) = rx.recv().await {
            if !gate.is_current(turn) {
                tracing::debug!(turn = %turn, "turn superseded, no longer reading");
                return;
            }
            let update = match item {
                Coalesced::Chunk(chunk) => renderer.append(&chunk.text),
                Coalesced::Failed(message) => {
                    let update = renderer.fail(message);
                    let _ = tx_out.send(TurnUpdate { turn, update }).await;
                    return;
                }
            };
            if tx_out.send(TurnUpdate { turn, update }).await.is_err() {
                tracing::debug!(turn = %turn, "update receiver dropped");
                return;
            }
        }

        if !gate.is_current(turn) {
            return;
        }
        let update = renderer.finish();
        let _ = tx_out.send(TurnUpdate { turn, update }).await;
        tracing::debug!(
            turn = %turn,
            stats = ?rx.stats(),
            "turn actor finished"
        );
    });

    (turn, rx_out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BackpressurePolicy, DeltaSender, SendError};
    use chatmark::{BlockNode, InlineSpan, TurnStatus, View, parse_blocks};
    use std::time::Duration;

    async fn drain(mut rx: mpsc::Receiver<TurnUpdate>) -> Vec<TurnUpdate> {
        let mut out = Vec::new();
        while let Some(u) = rx.recv().await {
            out.push(u);
        }
        out
    }

    #[tokio::test]
    async fn turn_streams_to_completion() {
        let gate = TurnGate::new();
        let (tx, rx) = mpsc::channel::<Delta>(16);
        let (turn, updates) = spawn_turn(&gate, Options::default(), rx, CoalesceOptions::default());

        let mut s = DeltaSender::new(tx, BackpressurePolicy::Block);
        for delta in [
            "## Re", "sult\n", "- one\n", "- two\n", "[[SUGG", "ESTIONS]]\n", "- Why?\n",
        ] {
            s.send(delta).await.unwrap();
        }
        drop(s);

        let updates = drain(updates).await;
        assert!(updates.iter().all(|u| u.turn == turn));

        let first = &updates[0].update;
        assert_eq!(first.status, TurnStatus::Waiting);
        assert_eq!(first.view, View::Busy);

        let last = &updates[updates.len() - 1].update;
        assert_eq!(last.status, TurnStatus::Complete);
        assert_eq!(last.suggestions, vec!["Why?"]);
        assert_eq!(last.document(), Some(&parse_blocks("## Result\n- one\n- two")));
        assert!(gate.accept(updates[updates.len() - 1].clone()).is_some());
    }

    #[tokio::test]
    async fn failure_keeps_partial_document() {
        let gate = TurnGate::new();
        let (tx, rx) = mpsc::channel::<Delta>(16);
        let (_, updates) = spawn_turn(&gate, Options::default(), rx, CoalesceOptions::default());

        let mut s = DeltaSender::new(tx, BackpressurePolicy::CoalesceLocal);
        s.send("Half a sen").await.unwrap();
        s.fail("upstream timeout").await.unwrap();

        let updates = drain(updates).await;
        let last = &updates[updates.len() - 1].update;
        assert_eq!(last.status, TurnStatus::Failed);
        assert_eq!(
            last.error.as_deref(),
            Some("Sorry, something went wrong: upstream timeout")
        );
        assert_eq!(
            last.document().map(|d| d.blocks.clone()),
            Some(vec![BlockNode::Paragraph(vec![InlineSpan::text("Half a sen")])])
        );
        assert!(last.suggestions.is_empty());
    }

    #[tokio::test]
    async fn superseded_turn_stops_reading_and_is_discarded() {
        let gate = TurnGate::new();
        let (tx, rx) = mpsc::channel::<Delta>(1);
        let (old, mut updates) = spawn_turn(&gate, Options::default(), rx, CoalesceOptions::default());

        let busy = updates.recv().await.expect("busy snapshot");
        let new = gate.begin();
        assert_ne!(old, new);
        assert!(!gate.is_current(old));
        assert_eq!(gate.accept(busy), None);

        let mut s = DeltaSender::new(tx, BackpressurePolicy::Block);
        let closed = tokio::time::timeout(Duration::from_secs(1), async {
            loop {
                if let Err(e) = s.send("late\n").await {
                    return e;
                }
                tokio::time::sleep(Duration::from_millis(1)).await;
            }
        })
        .await
        .expect("superseded actor drops its receiver");
        assert_eq!(closed, SendError::Closed);
        assert_eq!(updates.recv().await, None);
    }

    #[test]
    fn abandon_invalidates_the_active_turn() {
        let gate = TurnGate::new();
        let turn = gate.begin();
        assert!(gate.is_current(turn));
        gate.clone().abandon();
        assert!(!gate.is_current(turn));
        assert_eq!(turn.to_string(), "turn#1");
    }
}
