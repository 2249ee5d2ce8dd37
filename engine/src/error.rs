use thiserror::Error;

/// Errors raised by the signal pipeline.
///
/// All variants are deterministic and depend only on the input; retrying the
/// same update always fails the same way.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("invalid quote for {instrument}: {reason}")]
    InvalidQuote { instrument: String, reason: String },

    #[error("division by zero: denominator mid price is {denominator}")]
    DivisionByZero { denominator: f64 },

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}
