//! Pair ratio signal engine.
//!
//! Turns paired quotes from two correlated instruments into a [`row::Row`]:
//! mid prices, their ratio, a trailing moving average over a bounded window,
//! threshold breach detection and a BUY / SELL / HOLD classification.
//!
//! The pipeline is synchronous and owns all of its state. Feeding it from
//! several producers goes through [`dispatcher::RowDispatcher`], which
//! serializes pairs through a single-consumer queue.

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod quote;
pub mod ratio;
pub mod rolling_window;
pub mod row;
pub mod signal;

pub use config::{Bounds, EngineConfig};
pub use dispatcher::{DispatchStats, RejectPolicy, RowDispatcher};
pub use error::EngineError;
pub use quote::{Quote, QuotePair};
pub use row::{Row, SignalEngine};
pub use signal::Signal;
