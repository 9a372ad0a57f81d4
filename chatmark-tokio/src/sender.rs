use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use crate::Delta;

/// How a [`DeltaSender`] behaves when the turn's channel is full.
///
/// Both policies deliver every byte: the renderer's accumulator must be the exact
/// concatenation of the reply.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackpressurePolicy {
    /// Await capacity for each delta.
    Block,
    /// Hold text locally and hand it over once it holds a newline or reaches
    /// `local_max_bytes`, without waiting when the channel is full.
    ///
    /// Suited to token streams. Call [`DeltaSender::flush`] at end of stream.
    CoalesceLocal,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SendOutcome {
    Sent,
    Buffered,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SendError {
    /// The turn's receiver is gone (turn finished, superseded or abandoned).
    #[error("delta channel closed")]
    Closed,
}

impl<T> From<mpsc::error::SendError<T>> for SendError {
    fn from(_: mpsc::error::SendError<T>) -> Self {
        SendError::Closed
    }
}

/// Producer half of a turn: feeds reply text and, at most once, a failure.
pub struct DeltaSender {
    tx: mpsc::Sender<Delta>,
    policy: BackpressurePolicy,
    pending: String,
    local_max_bytes: usize,
}

impl DeltaSender {
    pub fn new(tx: mpsc::Sender<Delta>, policy: BackpressurePolicy) -> Self {
        Self {
            tx,
            policy,
            pending: String::new(),
            local_max_bytes: 16 * 1024,
        }
    }

    pub fn set_local_max_bytes(&mut self, max: usize) {
        self.local_max_bytes = max.max(1);
    }

    pub fn policy(&self) -> BackpressurePolicy {
        self.policy
    }

    /// Text held back by [`BackpressurePolicy::CoalesceLocal`].
    pub fn pending(&self) -> &str {
        &self.pending
    }

    pub async fn send(&mut self, delta: &str) -> Result<SendOutcome, SendError> {
        match self.policy {
            BackpressurePolicy::Block => {
                self.tx.send(Delta::from(delta)).await?;
                Ok(SendOutcome::Sent)
            }
            BackpressurePolicy::CoalesceLocal => {
                self.pending.push_str(delta);
                if self.pending.len() >= self.local_max_bytes || delta.contains('\n') {
                    self.try_hand_over()
                } else {
                    Ok(SendOutcome::Buffered)
                }
            }
        }
    }

    /// Hand over held-back text, waiting for capacity.
    pub async fn flush(&mut self) -> Result<(), SendError> {
        if !self.pending.is_empty() {
            let text = std::mem::take(&mut self.pending);
            self.tx.send(Delta::Text(text)).await?;
        }
        Ok(())
    }

    /// Report a transport failure after any held-back text.
    pub async fn fail(&mut self, message: impl Into<String>) -> Result<(), SendError> {
        self.flush().await?;
        self.tx.send(Delta::Failed(message.into())).await?;
        Ok(())
    }

    fn try_hand_over(&mut self) -> Result<SendOutcome, SendError> {
        let text = std::mem::take(&mut self.pending);
        match self.tx.try_send(Delta::Text(text)) {
            Ok(()) => Ok(SendOutcome::Sent),
            Err(TrySendError::Full(rejected)) => {
                if let Delta::Text(text) = rejected {
                    tracing::trace!(bytes = text.len(), "turn channel full, holding text");
                    self.pending = text;
                }
                Ok(SendOutcome::Buffered)
            }
            Err(TrySendError::Closed(_)) => Err(SendError::Closed),
        }
    }
}
