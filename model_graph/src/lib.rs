pub mod codec;
pub mod error;
pub mod proto;
pub mod tensor;

pub use error::{GraphErr, Result};
pub use proto::{
    AttributeProto, GraphProto, ModelProto, NodeProto, OperatorSetIdProto, TensorProto,
    ValueInfoProto,
};
pub use tensor::DataType;
