pub mod checkpoint;
pub mod error;
mod eval;
mod generator;
pub mod names;
mod optimizer;
mod training;

pub use checkpoint::Checkpoint;
pub use error::{ArtifactErr, Result};
pub use generator::{ArtifactSet, generate, generate_with_partition};
