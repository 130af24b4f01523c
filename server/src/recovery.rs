//! Startup consistency check between each task's model graph and its
//! derived artifacts.
//!
//! A crash between the model write and the artifact writes leaves the four
//! artifacts describing an older model. The checkpoint records the version
//! and the flattened parameters it was generated from, so on startup we
//! compare those against the model graph on disk; on any disagreement (or
//! a missing artifact) the artifact set is regenerated from the graph,
//! which is the single source of truth.

use log::{info, warn};
use model_graph::{ModelProto, codec};

use artifacts::Checkpoint;

use crate::error::Result;
use crate::registry::TaskRegistry;
use crate::storage::FileStorage;
use crate::task::FlTask;

/// Recovers every task in the registry. Fails startup on the first task
/// whose state can't be made consistent.
pub async fn recover_all(storage: &dyn FileStorage, registry: &TaskRegistry) -> Result<()> {
    for slot in registry.slots() {
        let mut task = slot.lock().await;
        recover_task(storage, &mut task).await?;
    }
    Ok(())
}

/// Checks (and if needed repairs) one task's artifacts, and adopts the
/// checkpoint's model version so the counter survives restarts.
pub async fn recover_task(storage: &dyn FileStorage, task: &mut FlTask) -> Result<()> {
    let model_bytes = storage.read(&task.files.model).await?;
    let model = ModelProto::from_bytes(&model_bytes)?;
    let params = codec::extract(model.graph()?, &task.trainable_parameter_names)?;

    if let Some(version) = consistent_version(storage, task, &params).await {
        task.model_version = task.model_version.max(version);
        info!(task = task.id.as_str(), version = task.model_version; "artifacts consistent");
        return Ok(());
    }

    let version = checkpoint_version(storage, task).await.max(task.model_version);
    warn!(task = task.id.as_str(), version = version; "artifacts stale or missing, regenerating");

    let set = artifacts::generate(&model, &task.trainable_parameter_names, version)?;
    storage.write(&task.files.training, &set.training).await?;
    storage.write(&task.files.optimizer, &set.optimizer).await?;
    storage.write(&task.files.eval, &set.eval).await?;
    storage.write(&task.files.checkpoint, &set.checkpoint).await?;

    task.model_version = version;
    Ok(())
}

/// The checkpoint's recorded version when the full artifact set agrees
/// with the model graph; `None` when anything is missing or stale.
async fn consistent_version(
    storage: &dyn FileStorage,
    task: &FlTask,
    model_params: &[f32],
) -> Option<u64> {
    for key in task.files.artifact_keys() {
        if storage.read(key).await.is_err() {
            return None;
        }
    }

    let bytes = storage.read(&task.files.checkpoint).await.ok()?;
    let checkpoint = Checkpoint::from_bytes(&bytes).ok()?;

    let names_match = checkpoint.trainable_names == task.trainable_parameter_names;
    let params_match = checkpoint.params == model_params;
    (names_match && params_match).then_some(checkpoint.model_version)
}

/// Best-effort version carried by a (possibly stale) checkpoint.
async fn checkpoint_version(storage: &dyn FileStorage, task: &FlTask) -> u64 {
    match storage.read(&task.files.checkpoint).await {
        Ok(bytes) => Checkpoint::from_bytes(&bytes)
            .map(|c| c.model_version)
            .unwrap_or(0),
        Err(_) => 0,
    }
}
