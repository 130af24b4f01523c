//! Shared fixtures: a tiny conv+batchnorm model with one trainable and one
//! frozen tensor, and a task wired to a temp filesystem store.

// Not every test binary uses every fixture.
#![allow(dead_code)]

use std::sync::Arc;

use model_graph::{DataType, GraphProto, ModelProto, NodeProto, TensorProto, ValueInfoProto};
use server::storage::{FileStorage, FsStorage};
use server::task::{FlTask, TaskFiles};
use server::{Orchestrator, TaskRegistry};

pub const TASK_ID: &str = "tinynet";

pub fn f32_tensor(name: &str, dims: &[i64], values: &[f32]) -> TensorProto {
    TensorProto {
        dims: dims.to_vec(),
        data_type: DataType::FLOAT_TAG,
        name: name.to_string(),
        raw_data: values.iter().flat_map(|v| v.to_le_bytes()).collect(),
        ..Default::default()
    }
}

/// Base model: `w` (trainable, 4 elements), `b` (trainable, 2 elements),
/// batchnorm running stats frozen.
pub fn base_model() -> ModelProto {
    ModelProto {
        ir_version: 8,
        graph: Some(GraphProto {
            name: "tinynet".into(),
            node: vec![
                NodeProto {
                    input: vec!["input".into(), "w".into(), "b".into()],
                    output: vec!["dense_out".into()],
                    name: "dense".into(),
                    op_type: "Gemm".into(),
                    attribute: Vec::new(),
                },
                NodeProto {
                    input: vec![
                        "dense_out".into(),
                        "bn.scale".into(),
                        "bn.bias".into(),
                        "bn.mean".into(),
                        "bn.var".into(),
                    ],
                    output: vec!["output".into(), "out_mean".into(), "out_var".into()],
                    name: "bn".into(),
                    op_type: "BatchNormalization".into(),
                    attribute: Vec::new(),
                },
            ],
            initializer: vec![
                f32_tensor("w", &[2, 2], &[1.0, 2.0, 3.0, 4.0]),
                f32_tensor("b", &[2], &[0.5, -0.5]),
                f32_tensor("bn.scale", &[2], &[1.0, 1.0]),
                f32_tensor("bn.bias", &[2], &[0.0, 0.0]),
                f32_tensor("bn.mean", &[2], &[0.0, 0.0]),
                f32_tensor("bn.var", &[2], &[1.0, 1.0]),
            ],
            input: vec![ValueInfoProto::named("input")],
            output: vec![ValueInfoProto::named("output")],
        }),
        ..Default::default()
    }
}

pub fn trainable_names() -> Vec<String> {
    vec!["w".to_string(), "b".to_string()]
}

pub fn task() -> FlTask {
    FlTask {
        id: TASK_ID.to_string(),
        title: "Tiny Net".to_string(),
        aggregator: aggregation::AggregatorKind::FedAsync,
        mixing_param: 0.5,
        files: TaskFiles {
            model: format!("{TASK_ID}/model.onnx"),
            training: format!("{TASK_ID}/training_model.onnx"),
            optimizer: format!("{TASK_ID}/optimizer_model.onnx"),
            eval: format!("{TASK_ID}/eval_model.onnx"),
            checkpoint: format!("{TASK_ID}/checkpoint"),
        },
        batch_size: 4,
        local_epochs: 1,
        model_version: 0,
        trainable_parameter_names: trainable_names(),
        classes: vec!["cat".to_string(), "dog".to_string()],
        input_size: 224,
        norm_range: [0.0, 1.0],
    }
}

pub struct Fixture {
    // Held for its Drop; the store lives inside it.
    pub dir: tempfile::TempDir,
    pub storage: Arc<FsStorage>,
    pub orchestrator: Orchestrator,
}

/// Seeds the store with the base model, builds a one-task registry and
/// runs startup recovery so the initial artifact set exists.
pub async fn fixture() -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let storage = Arc::new(FsStorage::new(dir.path()).unwrap());

    let t = task();
    storage
        .write(&t.files.model, &base_model().to_bytes())
        .await
        .unwrap();

    let registry = Arc::new(TaskRegistry::new(vec![t]).unwrap());
    server::recovery::recover_all(storage.as_ref(), &registry)
        .await
        .unwrap();

    let orchestrator = Orchestrator::new(storage.clone(), registry);
    Fixture {
        dir,
        storage,
        orchestrator,
    }
}
