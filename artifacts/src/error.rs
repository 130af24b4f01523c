use std::{
    error::Error,
    fmt::{self, Display},
};

use model_graph::GraphErr;

/// The result type used in the entire artifacts module.
pub type Result<T> = std::result::Result<T, ArtifactErr>;

/// The artifacts module's error type.
#[derive(Debug)]
pub enum ArtifactErr {
    /// The base graph and the trainable-name partition disagree; no
    /// artifact set is produced at all under this condition.
    Generation { detail: String },
    /// An underlying graph error (decode, missing graph, bad tensor).
    Graph(GraphErr),
}

impl Display for ArtifactErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactErr::Generation { detail } => {
                write!(f, "artifact generation failed: {detail}")
            }
            ArtifactErr::Graph(e) => write!(f, "artifact generation failed: {e}"),
        }
    }
}

impl Error for ArtifactErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ArtifactErr::Graph(e) => Some(e),
            _ => None,
        }
    }
}

impl From<GraphErr> for ArtifactErr {
    fn from(e: GraphErr) -> Self {
        ArtifactErr::Graph(e)
    }
}
