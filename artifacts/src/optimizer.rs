//! Builds the optimizer graph: one AdamW step (decoupled weight decay)
//! over exactly the trainable tensors, in trainable-name order.

use model_graph::{
    AttributeProto, DataType, GraphProto, ModelProto, NodeProto, Result, TensorProto,
    ValueInfoProto, tensor,
};

use crate::names;

const ADAMW_OP: &str = "AdamWOptimizer";
const LEARNING_RATE_INPUT: &str = "learning_rate";
const STEP_INITIALIZER: &str = "step";

// AdamW defaults, matching the values the original training toolchain bakes in.
const BETA1: f32 = 0.9;
const BETA2: f32 = 0.999;
const EPSILON: f32 = 1e-8;
const WEIGHT_DECAY: f32 = 1e-2;

/// Builds the optimizer model for the given base model and trainable names.
///
/// Caller has already validated that every trainable name has an
/// initializer in the base graph.
pub(crate) fn build(base: &ModelProto, trainable_names: &[String]) -> Result<ModelProto> {
    let base_graph = base.graph()?;

    let mut graph = GraphProto {
        name: "optimizer".to_string(),
        ..Default::default()
    };
    graph.input.push(ValueInfoProto::named(LEARNING_RATE_INPUT));
    graph.initializer.push(step_counter());

    for name in trainable_names {
        let param = base_graph
            .find_initializer(name)
            .ok_or_else(|| model_graph::GraphErr::ParameterNotFound { name: name.clone() })?;
        let count = tensor::element_count(param)?;

        let exp_avg = zeros(format!("{name}.exp_avg"), &param.dims, count);
        let exp_avg_sq = zeros(format!("{name}.exp_avg_sq"), &param.dims, count);

        graph.input.push(ValueInfoProto::named(name.clone()));
        graph.input.push(ValueInfoProto::named(names::grad(name)));
        graph.output.push(ValueInfoProto::named(names::stepped(name)));

        graph.node.push(NodeProto {
            input: vec![
                LEARNING_RATE_INPUT.to_string(),
                STEP_INITIALIZER.to_string(),
                name.clone(),
                names::grad(name),
                exp_avg.name.clone(),
                exp_avg_sq.name.clone(),
            ],
            output: vec![
                names::stepped(name),
                format!("{}.out", exp_avg.name),
                format!("{}.out", exp_avg_sq.name),
            ],
            name: format!("{name}_optimizer"),
            op_type: ADAMW_OP.to_string(),
            attribute: vec![
                AttributeProto::float("alpha", BETA1),
                AttributeProto::float("beta", BETA2),
                AttributeProto::float("epsilon", EPSILON),
                AttributeProto::float("weight_decay", WEIGHT_DECAY),
            ],
        });

        graph.initializer.push(exp_avg);
        graph.initializer.push(exp_avg_sq);
    }

    Ok(ModelProto {
        ir_version: base.ir_version,
        producer_name: base.producer_name.clone(),
        producer_version: base.producer_version.clone(),
        graph: Some(graph),
        opset_import: base.opset_import.clone(),
    })
}

/// Zero-filled f32 moment tensor with the parameter's shape.
fn zeros(name: String, dims: &[i64], count: usize) -> TensorProto {
    TensorProto {
        dims: dims.to_vec(),
        data_type: DataType::FLOAT_TAG,
        name,
        raw_data: vec![0u8; count * size_of::<f32>()],
        ..Default::default()
    }
}

/// Scalar bias-correction step counter, starting at zero.
fn step_counter() -> TensorProto {
    TensorProto {
        dims: vec![1],
        data_type: 7, // int64, never routed through the parameter codec
        name: STEP_INITIALIZER.to_string(),
        int64_data: vec![0],
        ..Default::default()
    }
}
