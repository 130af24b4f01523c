//! Builds the evaluation graph from the base graph.
//!
//! Normalization nodes keep only their primary output: the auxiliary
//! running-statistic outputs must be stripped, or loading the training
//! session against this graph fails downstream. This is a structural
//! compatibility fix-up, not an optimization.

use model_graph::{ModelProto, Result};

use crate::training::BATCH_NORM_OP;

pub(crate) fn build(base: &ModelProto) -> Result<ModelProto> {
    let mut model = base.clone();
    let graph = model.graph_mut()?;

    for node in graph.node.iter_mut().filter(|n| n.op_type == BATCH_NORM_OP) {
        node.output.truncate(1);
    }

    Ok(model)
}
