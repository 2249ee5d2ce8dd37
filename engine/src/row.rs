//! Row assembly.
//!
//! `SignalEngine` owns the per-stream state (moving-average window, bounds,
//! handlers) and turns each [`QuotePair`] into one [`Row`]:
//!
//! ```text
//! mid_a, mid_b  <- ask / 2 + bid / 2
//! ratio         <- mid_a / mid_b
//! average       <- window.push(ratio)
//! signal        <- classify(ratio, average, bounds)
//! trigger_alert <- ratio if out of bounds
//! ```
//!
//! Every fallible step runs before the window is touched, so a rejected pair
//! leaves the engine exactly as it was.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::{Bounds, EngineConfig};
use crate::error::EngineError;
use crate::quote::QuotePair;
use crate::ratio::compute_ratio;
use crate::rolling_window::MovingAverageTracker;
use crate::signal::{self, HandlerSet, Signal, SignalHandler};

/// Output record for one processed quote pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub instrument_a: String,
    pub instrument_b: String,

    pub mid_a: f64,
    pub mid_b: f64,

    /// `mid_a / mid_b`.
    pub ratio: f64,

    /// Later of the two quote timestamps.
    pub timestamp: DateTime<Utc>,

    pub upper_bound: f64,
    pub lower_bound: f64,

    /// The ratio when it is outside the bounds.
    pub trigger_alert: Option<f64>,

    /// Average of the window including this ratio.
    pub moving_average: f64,

    pub signal: Signal,
}

/// One engine per logical quote stream.
#[derive(Debug)]
pub struct SignalEngine {
    config: EngineConfig,
    bounds: Bounds,
    window: MovingAverageTracker,
    handlers: HandlerSet,
}

impl SignalEngine {
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;

        Ok(Self {
            bounds: config.bounds(),
            window: MovingAverageTracker::new(config.window_capacity),
            handlers: HandlerSet::new(),
            config,
        })
    }

    pub fn with_handler(mut self, handler: SignalHandler) -> Self {
        self.handlers.register(handler);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn window(&self) -> &MovingAverageTracker {
        &self.window
    }

    /// Run one quote pair through the pipeline.
    ///
    /// # Errors
    /// - [`EngineError::InvalidQuote`] if either quote has a bad price
    /// - [`EngineError::DivisionByZero`] if the second mid price is zero
    ///
    /// On error the moving-average window is not modified.
    pub fn process(&mut self, pair: &QuotePair) -> Result<Row, EngineError> {
        let mid_a = pair.a.mid_price()?;
        let mid_b = pair.b.mid_price()?;
        let ratio = compute_ratio(mid_a, mid_b)?;

        // ---- Stateful step (infallible from here on) ----
        let moving_average = self.window.push(ratio);

        let signal = signal::classify(ratio, moving_average, &self.bounds);
        let trigger_alert = signal::trigger_alert(ratio, &self.bounds);

        let row = Row {
            instrument_a: pair.a.instrument.clone(),
            instrument_b: pair.b.instrument.clone(),
            mid_a,
            mid_b,
            ratio,
            timestamp: pair.timestamp(),
            upper_bound: self.bounds.upper,
            lower_bound: self.bounds.lower,
            trigger_alert,
            moving_average,
            signal,
        };

        self.notify(&row);

        Ok(row)
    }

    fn notify(&self, row: &Row) {
        let pair = format!("{}/{}", row.instrument_a, row.instrument_b);

        if row.trigger_alert.is_some() {
            tracing::warn!(
                pair = %pair,
                ratio = row.ratio,
                moving_average = row.moving_average,
                upper = row.upper_bound,
                lower = row.lower_bound,
                signal = %row.signal,
                "ratio breached bounds"
            );
        } else {
            tracing::info!(
                pair = %pair,
                ratio = row.ratio,
                moving_average = row.moving_average,
                signal = %row.signal,
                "ratio within bounds"
            );
        }

        self.handlers.notify(row);
    }
}
