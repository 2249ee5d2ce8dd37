use tokio::sync::mpsc::{Receiver, Sender};

use crate::error::EngineError;
use crate::quote::QuotePair;
use crate::row::{Row, SignalEngine};

/// Summary returned when a dispatcher loop ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchStats {
    pub processed: u64,
    pub rejected: u64,
}

/// What the dispatcher does with a pair the engine rejects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RejectPolicy {
    /// Log the error and continue with the next pair.
    #[default]
    Skip,

    /// Stop the stream and hand the error back to the caller.
    Halt,
}

/// Single consumer for one quote stream.
///
/// Any number of producers may hold clones of the `Sender<QuotePair>`;
/// the dispatcher drains them one pair at a time in arrival order, so the
/// engine's window sees a strictly serialized sequence of pushes.
pub struct RowDispatcher {
    engine: SignalEngine,
    rx: Receiver<QuotePair>,
    tx: Sender<Row>,
    policy: RejectPolicy,
}

impl RowDispatcher {
    pub fn new(engine: SignalEngine, rx: Receiver<QuotePair>, tx: Sender<Row>) -> Self {
        Self {
            engine,
            rx,
            tx,
            policy: RejectPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: RejectPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Main loop: consumes quote pairs and forwards rows downstream.
    ///
    /// Rejected pairs are handled per [`RejectPolicy`]. The loop ends when
    /// every producer has hung up or the row receiver is dropped.
    ///
    /// # Errors
    /// Only under [`RejectPolicy::Halt`]: the first engine error.
    pub async fn run(mut self) -> Result<DispatchStats, EngineError> {
        let mut stats = DispatchStats::default();

        let bounds = self.engine.bounds();
        tracing::info!(
            window_capacity = self.engine.config().window_capacity,
            upper = bounds.upper,
            lower = bounds.lower,
            policy = ?self.policy,
            "quote stream started"
        );

        while let Some(pair) = self.rx.recv().await {
            match self.engine.process(&pair) {
                Ok(row) => {
                    stats.processed += 1;
                    if self.tx.send(row).await.is_err() {
                        tracing::debug!("row receiver dropped; stopping dispatcher");
                        break;
                    }
                }
                Err(err) => {
                    stats.rejected += 1;
                    tracing::warn!(
                        error = %err,
                        instrument_a = %pair.a.instrument,
                        instrument_b = %pair.b.instrument,
                        "quote pair rejected"
                    );

                    if self.policy == RejectPolicy::Halt {
                        return Err(err);
                    }
                }
            }
        }

        tracing::info!(
            processed = stats.processed,
            rejected = stats.rejected,
            "quote stream ended"
        );

        Ok(stats)
    }
}
