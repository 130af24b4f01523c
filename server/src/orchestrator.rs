//! Sequences one client update into the global model as a single logical
//! transaction: codec extract → staleness-weighted aggregation → codec
//! write-back → artifact regeneration → version bump.

use std::sync::Arc;

use log::{info, warn};
use model_graph::{ModelProto, codec};

use crate::error::Result;
use crate::registry::TaskRegistry;
use crate::storage::FileStorage;

pub struct Orchestrator {
    storage: Arc<dyn FileStorage>,
    registry: Arc<TaskRegistry>,
}

impl Orchestrator {
    pub fn new(storage: Arc<dyn FileStorage>, registry: Arc<TaskRegistry>) -> Self {
        Self { storage, registry }
    }

    pub fn registry(&self) -> &TaskRegistry {
        &self.registry
    }

    /// Applies a client's flat update vector to the task's global model and
    /// returns the new model version.
    ///
    /// All-or-nothing: every fallible step runs before the version bump,
    /// and the artifact set is built in memory before the first storage
    /// write, so a failed call leaves the version untouched and never
    /// persists a model without a matching artifact refresh. The task slot
    /// stays locked for the whole sequence; submissions for the same task
    /// queue, other tasks proceed in parallel.
    ///
    /// Retrying a successful call bumps the version again — submissions are
    /// not deduplicated.
    ///
    /// # Arguments
    /// * `task_id` - The task whose model the update was trained from.
    /// * `update` - Flat update vector in the task's canonical order.
    /// * `client_version` - The model version the client trained against.
    ///
    /// # Errors
    /// Any of the update error kinds; see `UpdateErr`.
    pub async fn submit_update(
        &self,
        task_id: &str,
        update: &[f32],
        client_version: u64,
    ) -> Result<u64> {
        let slot = self.registry.get(task_id)?;
        let mut task = slot.lock().await;

        let model_bytes = self.storage.read(&task.files.model).await?;
        let mut model = ModelProto::from_bytes(&model_bytes)?;

        let staleness = aggregation::fedasync::staleness(task.model_version, client_version);
        let current = codec::extract(model.graph()?, &task.trainable_parameter_names)?;
        let new_params = task.aggregator.aggregate(
            &current,
            update,
            task.model_version,
            client_version,
            task.mixing_param,
        )?;
        codec::inject(model.graph_mut()?, &new_params, &task.trainable_parameter_names)?;

        let next_version = task.model_version + 1;
        let set = artifacts::generate(&model, &task.trainable_parameter_names, next_version)?;

        // Model graph first, then the derived artifacts: if the process
        // dies between the two, startup recovery regenerates the artifacts
        // from the graph, never the other way around.
        self.storage
            .write(&task.files.model, &model.to_bytes())
            .await?;
        self.storage.write(&task.files.training, &set.training).await?;
        self.storage.write(&task.files.optimizer, &set.optimizer).await?;
        self.storage.write(&task.files.eval, &set.eval).await?;
        self.storage.write(&task.files.checkpoint, &set.checkpoint).await?;

        task.model_version = next_version;
        info!(
            task = task_id,
            version = next_version,
            staleness = staleness;
            "aggregated client update"
        );

        Ok(next_version)
    }

    /// Task descriptor lookup for the HTTP boundary.
    pub async fn describe_task(&self, task_id: &str) -> Result<crate::task::TaskDescriptor> {
        let slot = self.registry.get(task_id).inspect_err(|_| {
            warn!(task = task_id; "descriptor requested for unknown task");
        })?;
        let task = slot.lock().await;
        Ok(task.descriptor())
    }
}
