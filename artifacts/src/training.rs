//! Builds the training-mode graph from the base eval-mode graph.
//!
//! The architecture is unchanged; normalization nodes are switched into
//! training mode, a cross-entropy loss is appended over the model output,
//! and one gradient output is declared per trainable tensor. Initializer
//! order is the base graph's order, untouched — the codec's flattening
//! order must stay valid against the regenerated graph.

use model_graph::{AttributeProto, ModelProto, NodeProto, Result, ValueInfoProto};

use crate::names;

pub const BATCH_NORM_OP: &str = "BatchNormalization";
const TRAINING_MODE_ATTR: &str = "training_mode";
const LOSS_OP: &str = "SoftmaxCrossEntropyLoss";

pub const LABELS_INPUT: &str = "labels";
pub const LOSS_OUTPUT: &str = "loss";

pub(crate) fn build(base: &ModelProto, trainable_names: &[String]) -> Result<ModelProto> {
    let mut model = base.clone();
    let graph = model.graph_mut()?;

    if !graph.name.is_empty() {
        graph.name = format!("{}_training", graph.name);
    }

    for node in graph.node.iter_mut().filter(|n| n.op_type == BATCH_NORM_OP) {
        set_training_mode(node);
        declare_running_stats(node);
    }

    let model_output = graph
        .output
        .first()
        .map(|v| v.name.clone())
        .unwrap_or_else(|| "output".to_string());

    graph.node.push(NodeProto {
        input: vec![model_output, LABELS_INPUT.to_string()],
        output: vec![LOSS_OUTPUT.to_string(), "log_prob".to_string()],
        name: LOSS_OUTPUT.to_string(),
        op_type: LOSS_OP.to_string(),
        attribute: Vec::new(),
    });
    graph.input.push(ValueInfoProto::named(LABELS_INPUT));
    graph.output.push(ValueInfoProto::named(LOSS_OUTPUT));

    for name in trainable_names {
        graph.output.push(ValueInfoProto::named(names::grad(name)));
    }

    Ok(model)
}

/// Sets `training_mode = 1`, replacing an exporter-written attribute if one
/// is already present.
fn set_training_mode(node: &mut NodeProto) {
    match node
        .attribute
        .iter_mut()
        .find(|a| a.name == TRAINING_MODE_ATTR)
    {
        Some(attr) => attr.i = 1,
        None => node.attribute.push(AttributeProto::int(TRAINING_MODE_ATTR, 1)),
    }
}

/// In training mode a normalization node also emits its running statistics;
/// an eval-mode export declares only the primary output.
fn declare_running_stats(node: &mut NodeProto) {
    if node.output.len() >= 3 {
        return;
    }
    let primary = node.output.first().cloned().unwrap_or_default();
    node.output = vec![
        primary.clone(),
        format!("{primary}_running_mean"),
        format!("{primary}_running_var"),
    ];
}
