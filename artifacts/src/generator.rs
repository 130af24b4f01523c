//! Regenerates the four dependent artifacts from an updated base model:
//! training graph, optimizer graph, evaluation graph and checkpoint.
//! Either all four are produced or none is.

use std::collections::HashSet;

use log::debug;
use model_graph::{ModelProto, codec};

use crate::checkpoint::Checkpoint;
use crate::error::{ArtifactErr, Result};
use crate::{eval, optimizer, training};

/// The four generated blobs, built entirely in memory. Persisting them is
/// the caller's job, which keeps the generation step free of partial
/// on-disk states.
#[derive(Debug)]
pub struct ArtifactSet {
    pub training: Vec<u8>,
    pub optimizer: Vec<u8>,
    pub eval: Vec<u8>,
    pub checkpoint: Vec<u8>,
}

/// Generates the artifact set for a base eval-mode model and the ordered
/// trainable-name set. Tensors not named are treated as frozen.
///
/// # Arguments
/// * `base` - The base model, decoded, with the freshly aggregated weights.
/// * `trainable_names` - The ordered names participating in training.
/// * `model_version` - The version the checkpoint records as its origin.
///
/// # Errors
/// Returns `ArtifactErr::Generation` if any trainable name is absent from
/// the base graph; no artifact is produced under any failure.
pub fn generate(
    base: &ModelProto,
    trainable_names: &[String],
    model_version: u64,
) -> Result<ArtifactSet> {
    let graph = base.graph()?;
    let frozen: Vec<String> = graph
        .initializer
        .iter()
        .filter(|t| !trainable_names.contains(&t.name))
        .map(|t| t.name.clone())
        .collect();

    generate_with_partition(base, trainable_names, &frozen, model_version)
}

/// Like [`generate`], with an explicit trainable/frozen partition. The two
/// lists must be disjoint and together cover every initializer of the base
/// graph exactly; any disagreement fails the whole generation.
pub fn generate_with_partition(
    base: &ModelProto,
    trainable_names: &[String],
    frozen_names: &[String],
    model_version: u64,
) -> Result<ArtifactSet> {
    validate_partition(base, trainable_names, frozen_names)?;

    let params = codec::extract(base.graph()?, trainable_names)?;

    let training = training::build(base, trainable_names)?;
    let optimizer = optimizer::build(base, trainable_names)?;
    let eval = eval::build(base)?;
    let checkpoint = Checkpoint::fresh(model_version, trainable_names, params);

    debug!(
        model_version = model_version,
        trainable = trainable_names.len(),
        params = checkpoint.params.len();
        "generated artifact set"
    );

    Ok(ArtifactSet {
        training: training.to_bytes(),
        optimizer: optimizer.to_bytes(),
        eval: eval.to_bytes(),
        checkpoint: checkpoint.to_bytes(),
    })
}

fn validate_partition(
    base: &ModelProto,
    trainable_names: &[String],
    frozen_names: &[String],
) -> Result<()> {
    let graph = base.graph()?;
    let initializers: HashSet<&str> = graph.initializer.iter().map(|t| t.name.as_str()).collect();

    let mut seen = HashSet::new();
    for name in trainable_names.iter().chain(frozen_names) {
        if !initializers.contains(name.as_str()) {
            return Err(ArtifactErr::Generation {
                detail: format!("parameter '{name}' has no initializer in the base graph"),
            });
        }
        if !seen.insert(name.as_str()) {
            return Err(ArtifactErr::Generation {
                detail: format!("parameter '{name}' appears twice in the partition"),
            });
        }
    }

    if seen.len() != initializers.len() {
        let missing = graph
            .initializer
            .iter()
            .find(|t| !seen.contains(t.name.as_str()))
            .map(|t| t.name.clone())
            .unwrap_or_default();
        return Err(ArtifactErr::Generation {
            detail: format!("initializer '{missing}' is in neither the trainable nor frozen set"),
        });
    }

    Ok(())
}
