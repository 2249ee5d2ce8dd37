use std::collections::VecDeque;

use crate::config::DEFAULT_WINDOW_CAPACITY;

/// Fixed-capacity FIFO of recent ratios with a running average.
///
/// - `push` appends the newest value and evicts the single oldest one once
///   the window is over capacity, so `len() <= capacity()` always holds.
/// - The mean itself is tracked, not the sum, so finite inputs near
///   `f64::MAX` never overflow into `inf`:
///
/// ```text
/// grow:  mean += (v - mean) / len
/// slide: mean += (v - oldest) / capacity
/// ```
///
/// The mean is rebuilt from the window every `capacity` evictions so float
/// drift from repeated updates stays bounded.
///
/// One tracker belongs to exactly one quote stream. It is never reset
/// implicitly.
#[derive(Debug, Clone)]
pub struct MovingAverageTracker {
    values: VecDeque<f64>,
    capacity: usize,
    mean: f64,
    evictions_since_resync: usize,
}

impl Default for MovingAverageTracker {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_CAPACITY)
    }
}

impl MovingAverageTracker {
    /// `capacity` is clamped to at least 1; `EngineConfig` rejects 0 before it gets here.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            values: VecDeque::with_capacity(capacity + 1),
            capacity,
            mean: 0.0,
            evictions_since_resync: 0,
        }
    }

    /// Append `value` and return the average of the window after the push.
    ///
    /// Values are ratios of non-negative prices, so `value - oldest` is
    /// always representable.
    pub fn push(&mut self, value: f64) -> f64 {
        self.values.push_back(value);

        // Pushes are serialized, so the window overflows by at most one.
        let evicted = if self.values.len() > self.capacity {
            self.values.pop_front()
        } else {
            None
        };

        match evicted {
            Some(oldest) => {
                self.mean += (value - oldest) / self.capacity as f64;
                self.evictions_since_resync += 1;
            }
            None => {
                self.mean += (value - self.mean) / self.values.len() as f64;
            }
        }

        if self.evictions_since_resync >= self.capacity {
            self.resync();
        }

        self.mean
    }

    fn resync(&mut self) {
        let len = self.values.len() as f64;
        self.mean = self.values.iter().map(|v| v / len).sum();
        self.evictions_since_resync = 0;
    }

    /// Current average, `None` before the first push.
    pub fn average(&self) -> Option<f64> {
        if self.values.is_empty() {
            None
        } else {
            Some(self.mean)
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn latest(&self) -> Option<f64> {
        self.values.back().copied()
    }

    pub fn oldest(&self) -> Option<f64> {
        self.values.front().copied()
    }

    /// Window contents, oldest first.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().copied()
    }
}
