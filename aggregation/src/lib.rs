pub mod error;
pub mod fedasync;
mod kind;

pub use error::{AggErr, Result};
pub use kind::AggregatorKind;
