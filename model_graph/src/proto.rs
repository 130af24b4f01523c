//! Hand-written wire messages for the subset of the ONNX graph format this
//! system touches: named initializer tensors plus node/operator enumeration.
//! Field tags match the upstream `onnx.proto`, so files produced by standard
//! exporters decode here and files encoded here load in standard runtimes.

use prost::Message;

use crate::error::{GraphErr, Result};

/// Top-level model container.
#[derive(Clone, PartialEq, Message)]
pub struct ModelProto {
    #[prost(int64, tag = "1")]
    pub ir_version: i64,
    #[prost(string, tag = "2")]
    pub producer_name: String,
    #[prost(string, tag = "3")]
    pub producer_version: String,
    #[prost(message, optional, tag = "7")]
    pub graph: Option<GraphProto>,
    #[prost(message, repeated, tag = "8")]
    pub opset_import: Vec<OperatorSetIdProto>,
}

#[derive(Clone, PartialEq, Message)]
pub struct OperatorSetIdProto {
    #[prost(string, tag = "1")]
    pub domain: String,
    #[prost(int64, tag = "2")]
    pub version: i64,
}

/// The computation graph: operator nodes plus named initializer tensors.
#[derive(Clone, PartialEq, Message)]
pub struct GraphProto {
    #[prost(message, repeated, tag = "1")]
    pub node: Vec<NodeProto>,
    #[prost(string, tag = "2")]
    pub name: String,
    #[prost(message, repeated, tag = "5")]
    pub initializer: Vec<TensorProto>,
    #[prost(message, repeated, tag = "11")]
    pub input: Vec<ValueInfoProto>,
    #[prost(message, repeated, tag = "12")]
    pub output: Vec<ValueInfoProto>,
}

#[derive(Clone, PartialEq, Message)]
pub struct NodeProto {
    #[prost(string, repeated, tag = "1")]
    pub input: Vec<String>,
    #[prost(string, repeated, tag = "2")]
    pub output: Vec<String>,
    #[prost(string, tag = "3")]
    pub name: String,
    #[prost(string, tag = "4")]
    pub op_type: String,
    #[prost(message, repeated, tag = "5")]
    pub attribute: Vec<AttributeProto>,
}

#[derive(Clone, PartialEq, Message)]
pub struct AttributeProto {
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(float, tag = "2")]
    pub f: f32,
    #[prost(int64, tag = "3")]
    pub i: i64,
    #[prost(bytes = "vec", tag = "4")]
    pub s: Vec<u8>,
    #[prost(int64, repeated, tag = "8")]
    pub ints: Vec<i64>,
    #[prost(int32, tag = "20")]
    pub r#type: i32,
}

/// Attribute type tags, matching `AttributeProto.AttributeType` upstream.
pub mod attribute_type {
    pub const FLOAT: i32 = 1;
    pub const INT: i32 = 2;
    pub const STRING: i32 = 3;
    pub const INTS: i32 = 7;
}

/// A named tensor with shape, numeric type tag and data.
///
/// Data may live in `raw_data` (little-endian bytes) or in the typed
/// repeated field matching `data_type`; both layouts occur in the wild.
#[derive(Clone, PartialEq, Message)]
pub struct TensorProto {
    #[prost(int64, repeated, tag = "1")]
    pub dims: Vec<i64>,
    #[prost(int32, tag = "2")]
    pub data_type: i32,
    #[prost(float, repeated, tag = "4")]
    pub float_data: Vec<f32>,
    #[prost(int64, repeated, tag = "7")]
    pub int64_data: Vec<i64>,
    #[prost(string, tag = "8")]
    pub name: String,
    #[prost(bytes = "vec", tag = "9")]
    pub raw_data: Vec<u8>,
    #[prost(double, repeated, tag = "10")]
    pub double_data: Vec<f64>,
}

#[derive(Clone, PartialEq, Message)]
pub struct ValueInfoProto {
    #[prost(string, tag = "1")]
    pub name: String,
}

impl ModelProto {
    /// Decodes a model from its serialized bytes.
    ///
    /// # Errors
    /// Returns `GraphErr::Decode` if the buffer is not a valid message.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(Self::decode(bytes)?)
    }

    /// Serializes the model back into bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.encode_to_vec()
    }

    /// Borrows the contained graph.
    ///
    /// # Errors
    /// Returns `GraphErr::MissingGraph` when the model carries none.
    pub fn graph(&self) -> Result<&GraphProto> {
        self.graph.as_ref().ok_or(GraphErr::MissingGraph)
    }

    /// Mutably borrows the contained graph.
    ///
    /// # Errors
    /// Returns `GraphErr::MissingGraph` when the model carries none.
    pub fn graph_mut(&mut self) -> Result<&mut GraphProto> {
        self.graph.as_mut().ok_or(GraphErr::MissingGraph)
    }
}

impl GraphProto {
    /// Finds the initializer tensor with the given name.
    pub fn find_initializer(&self, name: &str) -> Option<&TensorProto> {
        self.initializer.iter().find(|t| t.name == name)
    }

    /// Finds the initializer tensor with the given name, mutably.
    pub fn find_initializer_mut(&mut self, name: &str) -> Option<&mut TensorProto> {
        self.initializer.iter_mut().find(|t| t.name == name)
    }
}

impl AttributeProto {
    /// Shorthand for an integer attribute.
    pub fn int(name: &str, value: i64) -> Self {
        Self {
            name: name.to_string(),
            i: value,
            r#type: attribute_type::INT,
            ..Default::default()
        }
    }

    /// Shorthand for a float attribute.
    pub fn float(name: &str, value: f32) -> Self {
        Self {
            name: name.to_string(),
            f: value,
            r#type: attribute_type::FLOAT,
            ..Default::default()
        }
    }
}

impl ValueInfoProto {
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}
