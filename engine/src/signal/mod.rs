//! Signal classification.
//!
//! Maps a ratio, its trailing average and the breach bounds to a trading
//! decision. Rules are evaluated in order, first match wins:
//!
//! ```text
//! 1. ratio > upper && ratio > average  -> SELL
//! 2. ratio < lower && ratio < average  -> BUY
//! 3. ratio > upper || ratio < lower    -> HOLD
//! 4. otherwise                         -> None
//! ```
//!
//! Bounds are exclusive: a ratio exactly on a bound is not a breach.

pub mod handler;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::Bounds;

pub use handler::{HandlerSet, SignalHandler};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Signal {
    /// Ratio broke below the lower bound and is under its average.
    Buy,

    /// Ratio broke above the upper bound and is over its average.
    Sell,

    /// Ratio is out of bounds but moving back toward the average.
    Hold,

    /// Ratio is within bounds.
    #[default]
    None,
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Signal::Buy => "BUY",
            Signal::Sell => "SELL",
            Signal::Hold => "HOLD",
            Signal::None => "NONE",
        };
        f.write_str(s)
    }
}

pub fn classify(ratio: f64, average: f64, bounds: &Bounds) -> Signal {
    if ratio > bounds.upper && ratio > average {
        Signal::Sell
    } else if ratio < bounds.lower && ratio < average {
        Signal::Buy
    } else if bounds.is_breached(ratio) {
        Signal::Hold
    } else {
        Signal::None
    }
}

/// The ratio itself when it breaches a bound.
///
/// Derived from the breach condition only, independent of [`classify`].
pub fn trigger_alert(ratio: f64, bounds: &Bounds) -> Option<f64> {
    bounds.is_breached(ratio).then_some(ratio)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> Bounds {
        Bounds::from_threshold(0.05)
    }

    #[test]
    fn breach_above_and_over_average_sells() {
        let ratio = 99.0 / 89.0;
        assert_eq!(classify(ratio, 1.0, &bounds()), Signal::Sell);

        let alert = trigger_alert(ratio, &bounds()).unwrap();
        assert!((alert - 1.112_36).abs() < 1e-5);
    }

    #[test]
    fn breach_below_and_under_average_buys() {
        assert_eq!(classify(0.80, 0.90, &bounds()), Signal::Buy);
        assert_eq!(trigger_alert(0.80, &bounds()), Some(0.80));
    }

    #[test]
    fn breach_above_but_not_over_average_holds() {
        assert_eq!(classify(1.10, 1.20, &bounds()), Signal::Hold);
        assert_eq!(trigger_alert(1.10, &bounds()), Some(1.10));
    }

    #[test]
    fn breach_below_but_not_under_average_holds() {
        assert_eq!(classify(0.90, 0.85, &bounds()), Signal::Hold);
        assert_eq!(classify(0.90, 0.90, &bounds()), Signal::Hold);
    }

    #[test]
    fn ratio_equal_to_average_on_breach_holds() {
        assert_eq!(classify(1.10, 1.10, &bounds()), Signal::Hold);
    }

    #[test]
    fn inside_bounds_is_no_signal() {
        assert_eq!(classify(1.00, 0.50, &bounds()), Signal::None);
        assert_eq!(trigger_alert(1.00, &bounds()), None);
    }

    #[test]
    fn ratio_on_bound_is_not_a_breach() {
        let b = Bounds {
            upper: 1.05,
            lower: 0.95,
        };
        assert_eq!(classify(1.05, 0.0, &b), Signal::None);
        assert_eq!(classify(0.95, 2.0, &b), Signal::None);
        assert_eq!(trigger_alert(1.05, &b), None);
        assert_eq!(trigger_alert(0.95, &b), None);
    }

    #[test]
    fn signal_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&Signal::Buy).unwrap(), "\"BUY\"");
        assert_eq!(serde_json::to_string(&Signal::None).unwrap(), "\"NONE\"");
        assert_eq!(Signal::Hold.to_string(), "HOLD");
    }
}
