use std::sync::Arc;

use crate::row::Row;

/// Thread-safe callback notified with every assembled row.
pub type SignalHandler = Arc<dyn Fn(&Row) + Send + Sync + 'static>;

/// Downstream subscribers of the row stream.
///
/// Handlers are untrusted: each call runs under `catch_unwind`, so one bad
/// handler neither stops the others nor changes the row returned to the caller.
#[derive(Default, Clone)]
pub struct HandlerSet {
    handlers: Vec<SignalHandler>,
}

impl HandlerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, handler: SignalHandler) {
        self.handlers.push(handler);
    }

    /// Run every handler against `row`. Returns how many of them panicked.
    pub fn notify(&self, row: &Row) -> usize {
        let mut failed = 0;

        for (idx, handler) in self.handlers.iter().enumerate() {
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                handler(row);
            }));

            if result.is_err() {
                failed += 1;
                tracing::error!(
                    handler = idx,
                    signal = %row.signal,
                    "signal handler panicked; row unaffected"
                );
            }
        }

        failed
    }
}

impl std::fmt::Debug for HandlerSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerSet")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}
