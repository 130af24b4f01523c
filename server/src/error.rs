use std::{
    error::Error,
    fmt::{self, Display},
};

use aggregation::AggErr;
use artifacts::ArtifactErr;
use model_graph::GraphErr;

use crate::storage::StorageErr;

/// The result type for update handling and task lookup.
pub type Result<T> = std::result::Result<T, UpdateErr>;

/// Every failure `submit_update` and task lookup can surface. All variants
/// are reported to the caller as distinct kinds; none are swallowed and
/// none are retried here.
#[derive(Debug)]
pub enum UpdateErr {
    TaskNotFound { id: String },
    Storage(StorageErr),
    Graph(GraphErr),
    Aggregation(AggErr),
    Artifacts(ArtifactErr),
}

impl UpdateErr {
    /// Stable kind string for diagnostics at the HTTP boundary.
    pub fn kind(&self) -> &'static str {
        match self {
            UpdateErr::TaskNotFound { .. } => "task_not_found",
            UpdateErr::Storage(_) => "storage_error",
            UpdateErr::Graph(GraphErr::ParameterNotFound { .. }) => "parameter_not_found",
            UpdateErr::Graph(GraphErr::LengthMismatch { .. }) => "length_mismatch",
            UpdateErr::Graph(_) => "model_graph_error",
            UpdateErr::Aggregation(AggErr::LengthMismatch { .. }) => "length_mismatch",
            UpdateErr::Aggregation(AggErr::UnsupportedAggregator { .. }) => {
                "unsupported_aggregator"
            }
            UpdateErr::Artifacts(_) => "artifact_generation_error",
        }
    }
}

impl Display for UpdateErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpdateErr::TaskNotFound { id } => write!(f, "task '{id}' not found"),
            UpdateErr::Storage(e) => write!(f, "{e}"),
            UpdateErr::Graph(e) => write!(f, "{e}"),
            UpdateErr::Aggregation(e) => write!(f, "{e}"),
            UpdateErr::Artifacts(e) => write!(f, "{e}"),
        }
    }
}

impl Error for UpdateErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            UpdateErr::TaskNotFound { .. } => None,
            UpdateErr::Storage(e) => Some(e),
            UpdateErr::Graph(e) => Some(e),
            UpdateErr::Aggregation(e) => Some(e),
            UpdateErr::Artifacts(e) => Some(e),
        }
    }
}

impl From<StorageErr> for UpdateErr {
    fn from(e: StorageErr) -> Self {
        UpdateErr::Storage(e)
    }
}

impl From<GraphErr> for UpdateErr {
    fn from(e: GraphErr) -> Self {
        UpdateErr::Graph(e)
    }
}

impl From<AggErr> for UpdateErr {
    fn from(e: AggErr) -> Self {
        UpdateErr::Aggregation(e)
    }
}

impl From<ArtifactErr> for UpdateErr {
    fn from(e: ArtifactErr) -> Self {
        UpdateErr::Artifacts(e)
    }
}
