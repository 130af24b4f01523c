use std::{
    error::Error,
    fmt::{self, Display},
};

/// The result type used in the entire aggregation module.
pub type Result<T> = std::result::Result<T, AggErr>;

/// The aggregation module's error type.
#[derive(Debug)]
pub enum AggErr {
    /// The current parameters and the client update differ in length.
    LengthMismatch { got: usize, expected: usize },
    /// The configured aggregator tag names no known algorithm.
    UnsupportedAggregator { tag: String },
}

impl Display for AggErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AggErr::LengthMismatch { got, expected } => write!(
                f,
                "client update has {got} elements, the current parameters have {expected}"
            ),
            AggErr::UnsupportedAggregator { tag } => {
                write!(f, "aggregator '{tag}' is not implemented")
            }
        }
    }
}

impl Error for AggErr {}
