//! A federated-learning task: one global model, its aggregator
//! configuration, its on-disk file locations and its version counter.

use aggregation::AggregatorKind;
use serde::{Deserialize, Serialize};

/// Storage keys of the base model and its four derived training artifacts.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskFiles {
    pub model: String,
    pub training: String,
    pub optimizer: String,
    pub eval: String,
    pub checkpoint: String,
}

impl TaskFiles {
    /// The four derived artifact keys, model excluded.
    pub fn artifact_keys(&self) -> [&str; 4] {
        [
            self.training.as_str(),
            self.optimizer.as_str(),
            self.eval.as_str(),
            self.checkpoint.as_str(),
        ]
    }
}

/// All information and instructions for one federated-learning task.
///
/// Created once at startup from configuration; mutated in place by
/// successful aggregation (version bump, file contents); never deleted
/// during the process lifetime.
///
/// `trainable_parameter_names` is ordered, and the order is a cross-cutting
/// invariant: it is the flattening order of every client update and of the
/// generated training/optimizer graphs.
#[derive(Debug, Clone, Deserialize)]
pub struct FlTask {
    pub id: String,
    pub title: String,
    pub aggregator: AggregatorKind,
    pub mixing_param: f32,
    pub files: TaskFiles,
    pub batch_size: u32,
    pub local_epochs: u32,
    #[serde(default)]
    pub model_version: u64,
    pub trainable_parameter_names: Vec<String>,

    // Classification metadata handed to clients verbatim.
    pub classes: Vec<String>,
    pub input_size: u32,
    pub norm_range: [f32; 2],
}

/// Download locations for a task's files, as served to clients.
#[derive(Debug, Serialize)]
pub struct FileUris {
    pub model: String,
    pub training: String,
    pub optimizer: String,
    pub eval: String,
    pub checkpoint: String,
}

/// The task descriptor returned from the HTTP boundary.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDescriptor {
    pub id: String,
    pub title: String,
    pub aggregator: &'static str,
    pub model_version: u64,
    pub batch_size: u32,
    pub local_epochs: u32,
    pub classes: Vec<String>,
    pub input_size: u32,
    pub norm_range: [f32; 2],
    pub uris: FileUris,
}

impl FlTask {
    pub fn descriptor(&self) -> TaskDescriptor {
        let uri = |path: &str| format!("/download/{path}");
        TaskDescriptor {
            id: self.id.clone(),
            title: self.title.clone(),
            aggregator: self.aggregator.tag(),
            model_version: self.model_version,
            batch_size: self.batch_size,
            local_epochs: self.local_epochs,
            classes: self.classes.clone(),
            input_size: self.input_size,
            norm_range: self.norm_range,
            uris: FileUris {
                model: uri(&self.files.model),
                training: uri(&self.files.training),
                optimizer: uri(&self.files.optimizer),
                eval: uri(&self.files.eval),
                checkpoint: uri(&self.files.checkpoint),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_exposes_download_uris_and_tag() {
        let task: FlTask = toml::from_str(
            r#"
            id = "mobilenet"
            title = "MobileNet (pretrained)"
            aggregator = "fedasync"
            mixing_param = 0.5
            batch_size = 16
            local_epochs = 2
            trainable_parameter_names = ["classifier.weight", "classifier.bias"]
            classes = ["cat", "dog"]
            input_size = 224
            norm_range = [-1.0, 1.0]

            [files]
            model = "models/mobilenet/model.onnx"
            training = "models/mobilenet/training_model.onnx"
            optimizer = "models/mobilenet/optimizer_model.onnx"
            eval = "models/mobilenet/eval_model.onnx"
            checkpoint = "models/mobilenet/checkpoint"
            "#,
        )
        .unwrap();

        assert_eq!(task.model_version, 0);

        let desc = task.descriptor();
        assert_eq!(desc.aggregator, "fedasync");
        assert_eq!(desc.uris.model, "/download/models/mobilenet/model.onnx");
        assert_eq!(desc.norm_range, [-1.0, 1.0]);
    }
}
