use std::{
    error::Error,
    fmt::{self, Display},
};

/// The result type used in the entire model graph module.
pub type Result<T> = std::result::Result<T, GraphErr>;

/// The model graph module's error type.
#[derive(Debug)]
pub enum GraphErr {
    /// The byte buffer is not a valid model graph message.
    Decode(prost::DecodeError),
    /// The model message carries no graph at all.
    MissingGraph,
    /// A requested tensor name has no initializer in the graph.
    ParameterNotFound { name: String },
    /// A flat vector's length doesn't match what the named tensors require.
    LengthMismatch { got: usize, expected: usize },
    /// The tensor stores a numeric type the codec can't handle.
    UnsupportedDtype { name: String, data_type: i32 },
    /// A tensor dimension is zero or negative.
    InvalidDim { name: String, dim: i64 },
    /// The tensor's stored data doesn't match its declared shape and dtype.
    CorruptTensor {
        name: String,
        got: usize,
        expected: usize,
    },
}

impl Display for GraphErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphErr::Decode(e) => write!(f, "failed to decode model graph: {e}"),
            GraphErr::MissingGraph => f.write_str("model message carries no graph"),
            GraphErr::ParameterNotFound { name } => {
                write!(f, "parameter '{name}' not found in the graph initializers")
            }
            GraphErr::LengthMismatch { got, expected } => {
                write!(
                    f,
                    "flat parameter vector has {got} elements, the named tensors require {expected}"
                )
            }
            GraphErr::UnsupportedDtype { name, data_type } => {
                write!(f, "tensor '{name}' has unsupported data type tag {data_type}")
            }
            GraphErr::InvalidDim { name, dim } => {
                write!(f, "tensor '{name}' has invalid dimension {dim}")
            }
            GraphErr::CorruptTensor {
                name,
                got,
                expected,
            } => {
                write!(
                    f,
                    "tensor '{name}' holds {got} elements but its shape declares {expected}"
                )
            }
        }
    }
}

impl Error for GraphErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            GraphErr::Decode(e) => Some(e),
            _ => None,
        }
    }
}

impl From<prost::DecodeError> for GraphErr {
    fn from(e: prost::DecodeError) -> Self {
        GraphErr::Decode(e)
    }
}
