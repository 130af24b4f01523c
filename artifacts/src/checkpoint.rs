//! The optimizer checkpoint blob: the serialized state a client needs to
//! resume training against a given model version, and the marker the server
//! uses at startup to detect artifacts that lag the model graph.

use prost::Message;

use crate::error::Result;
use model_graph::GraphErr;

/// Serialized optimizer/model state.
///
/// `model_version` records the version of the model graph this checkpoint
/// (and its sibling artifacts) was generated from; a lag between it and a
/// task's current version means a crash landed between the model write and
/// the artifact write.
#[derive(Clone, PartialEq, Message)]
pub struct Checkpoint {
    #[prost(uint64, tag = "1")]
    pub model_version: u64,
    #[prost(uint64, tag = "2")]
    pub step: u64,
    #[prost(string, repeated, tag = "3")]
    pub trainable_names: Vec<String>,
    #[prost(float, repeated, tag = "4")]
    pub params: Vec<f32>,
    #[prost(float, repeated, tag = "5")]
    pub exp_avg: Vec<f32>,
    #[prost(float, repeated, tag = "6")]
    pub exp_avg_sq: Vec<f32>,
}

impl Checkpoint {
    /// Fresh state for newly generated artifacts: step zero and zeroed
    /// first/second moments, one per parameter element.
    pub fn fresh(model_version: u64, trainable_names: &[String], params: Vec<f32>) -> Self {
        let len = params.len();
        Self {
            model_version,
            step: 0,
            trainable_names: trainable_names.to_vec(),
            params,
            exp_avg: vec![0.0; len],
            exp_avg_sq: vec![0.0; len],
        }
    }

    /// Decodes a checkpoint from its serialized bytes.
    ///
    /// # Errors
    /// Returns a decode error if the buffer is not a valid checkpoint.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(Self::decode(bytes).map_err(GraphErr::Decode)?)
    }

    /// Serializes the checkpoint into bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.encode_to_vec()
    }
}
