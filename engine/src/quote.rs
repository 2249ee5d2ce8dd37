use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Top-of-book quote for a single instrument.
///
/// ## Mid price
/// ```text
/// mid = (ask_price + bid_price) / 2
/// ```
///
/// Both prices must be finite and non-negative. A crossed book (bid above ask)
/// is accepted as-is; the mid price is still well defined. Each side is halved
/// before adding so prices near `f64::MAX` cannot overflow the sum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Instrument identifier, e.g. `"ABC"`.
    pub instrument: String,

    /// Best ask (top of the sell side).
    pub ask_price: f64,

    /// Best bid (top of the buy side).
    pub bid_price: f64,

    /// Feed timestamp. Non-decreasing per instrument.
    pub timestamp: DateTime<Utc>,
}

impl Quote {
    pub fn new(
        instrument: impl Into<String>,
        ask_price: f64,
        bid_price: f64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            instrument: instrument.into(),
            ask_price,
            bid_price,
            timestamp,
        }
    }

    /// Mid price of this quote.
    ///
    /// # Errors
    /// [`EngineError::InvalidQuote`] if either side is NaN, infinite or negative.
    pub fn mid_price(&self) -> Result<f64, EngineError> {
        check_price(&self.instrument, "ask_price", self.ask_price)?;
        check_price(&self.instrument, "bid_price", self.bid_price)?;

        Ok(self.ask_price / 2.0 + self.bid_price / 2.0)
    }
}

fn check_price(instrument: &str, field: &str, value: f64) -> Result<(), EngineError> {
    if !value.is_finite() {
        return Err(EngineError::InvalidQuote {
            instrument: instrument.to_string(),
            reason: format!("{field} is not finite ({value})"),
        });
    }

    if value < 0.0 {
        return Err(EngineError::InvalidQuote {
            instrument: instrument.to_string(),
            reason: format!("{field} is negative ({value})"),
        });
    }

    Ok(())
}

/// Quotes for the two correlated instruments from the same update cycle.
///
/// `a` is the numerator of the ratio, `b` the denominator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuotePair {
    pub a: Quote,
    pub b: Quote,
}

impl QuotePair {
    pub fn new(a: Quote, b: Quote) -> Self {
        Self { a, b }
    }

    /// The later of the two quote timestamps.
    ///
    /// Feeds are not synchronized across instruments, so the pair is stamped
    /// with whichever side arrived last.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.a.timestamp.max(self.b.timestamp)
    }
}
