//! Element-level access to initializer tensors.
//!
//! Reads accept both storage layouts (`raw_data` bytes or the typed
//! repeated field); writes normalize into little-endian `raw_data` and
//! clear the typed field, preserving the tensor's shape and dtype.

use crate::error::{GraphErr, Result};
use crate::proto::TensorProto;

/// Numeric type tags the codec supports, matching `TensorProto.DataType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    Float,
    Double,
}

impl DataType {
    pub const FLOAT_TAG: i32 = 1;
    pub const DOUBLE_TAG: i32 = 11;

    /// Maps a wire tag to a supported data type.
    ///
    /// # Errors
    /// Returns `GraphErr::UnsupportedDtype` for any tag the codec can't
    /// handle; `name` is only used for the error message.
    pub fn from_tag(tag: i32, name: &str) -> Result<Self> {
        match tag {
            Self::FLOAT_TAG => Ok(DataType::Float),
            Self::DOUBLE_TAG => Ok(DataType::Double),
            other => Err(GraphErr::UnsupportedDtype {
                name: name.to_string(),
                data_type: other,
            }),
        }
    }

    pub fn tag(self) -> i32 {
        match self {
            DataType::Float => Self::FLOAT_TAG,
            DataType::Double => Self::DOUBLE_TAG,
        }
    }

    pub fn byte_size(self) -> usize {
        match self {
            DataType::Float => size_of::<f32>(),
            DataType::Double => size_of::<f64>(),
        }
    }
}

/// Number of elements the tensor's shape declares.
///
/// # Errors
/// Returns `GraphErr::InvalidDim` if any dimension is zero or negative.
pub fn element_count(tensor: &TensorProto) -> Result<usize> {
    let mut count = 1usize;
    for &dim in &tensor.dims {
        if dim <= 0 {
            return Err(GraphErr::InvalidDim {
                name: tensor.name.clone(),
                dim,
            });
        }
        count *= dim as usize;
    }
    Ok(count)
}

/// Reads the tensor's values, flattened row-major, widened/narrowed to `f32`.
///
/// # Errors
/// Fails if the dtype is unsupported, a dimension is invalid, or the stored
/// data doesn't match the declared shape.
pub fn read_values(tensor: &TensorProto) -> Result<Vec<f32>> {
    let dtype = DataType::from_tag(tensor.data_type, &tensor.name)?;
    let count = element_count(tensor)?;

    if !tensor.raw_data.is_empty() {
        let expected = count * dtype.byte_size();
        if tensor.raw_data.len() != expected {
            return Err(GraphErr::CorruptTensor {
                name: tensor.name.clone(),
                got: tensor.raw_data.len(),
                expected,
            });
        }

        // raw_data has no alignment guarantee, so read element by element.
        let values = match dtype {
            DataType::Float => tensor
                .raw_data
                .chunks_exact(size_of::<f32>())
                .map(bytemuck::pod_read_unaligned::<f32>)
                .collect(),
            DataType::Double => tensor
                .raw_data
                .chunks_exact(size_of::<f64>())
                .map(|chunk| bytemuck::pod_read_unaligned::<f64>(chunk) as f32)
                .collect(),
        };
        return Ok(values);
    }

    let (got, values): (usize, Vec<f32>) = match dtype {
        DataType::Float => (tensor.float_data.len(), tensor.float_data.clone()),
        DataType::Double => (
            tensor.double_data.len(),
            tensor.double_data.iter().map(|&v| v as f32).collect(),
        ),
    };

    if got != count {
        return Err(GraphErr::CorruptTensor {
            name: tensor.name.clone(),
            got,
            expected: count,
        });
    }

    Ok(values)
}

/// Replaces the tensor's data with `values`, cast to its stored dtype.
///
/// Shape and dtype are left untouched; the data is written into `raw_data`
/// and the typed repeated field is cleared.
///
/// # Errors
/// Fails if the dtype is unsupported, a dimension is invalid, or `values`
/// doesn't hold exactly one element per declared slot.
pub fn write_values(tensor: &mut TensorProto, values: &[f32]) -> Result<()> {
    let dtype = DataType::from_tag(tensor.data_type, &tensor.name)?;
    let count = element_count(tensor)?;

    if values.len() != count {
        return Err(GraphErr::LengthMismatch {
            got: values.len(),
            expected: count,
        });
    }

    let mut raw = Vec::with_capacity(count * dtype.byte_size());
    match dtype {
        DataType::Float => {
            for &v in values {
                raw.extend_from_slice(&v.to_le_bytes());
            }
            tensor.float_data.clear();
        }
        DataType::Double => {
            for &v in values {
                raw.extend_from_slice(&(v as f64).to_le_bytes());
            }
            tensor.double_data.clear();
        }
    }
    tensor.raw_data = raw;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn f32_tensor(name: &str, dims: &[i64], values: &[f32]) -> TensorProto {
        TensorProto {
            dims: dims.to_vec(),
            data_type: DataType::FLOAT_TAG,
            name: name.to_string(),
            raw_data: values.iter().flat_map(|v| v.to_le_bytes()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn reads_raw_f32_data() {
        let tensor = f32_tensor("w", &[2, 2], &[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(read_values(&tensor).unwrap(), vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn reads_typed_float_data() {
        let tensor = TensorProto {
            dims: vec![3],
            data_type: DataType::FLOAT_TAG,
            name: "w".into(),
            float_data: vec![0.5, -0.5, 2.0],
            ..Default::default()
        };
        assert_eq!(read_values(&tensor).unwrap(), vec![0.5, -0.5, 2.0]);
    }

    #[test]
    fn double_tensor_narrows_to_f32() {
        let tensor = TensorProto {
            dims: vec![2],
            data_type: DataType::DOUBLE_TAG,
            name: "w".into(),
            raw_data: [1.5f64, -2.25f64]
                .iter()
                .flat_map(|v| v.to_le_bytes())
                .collect(),
            ..Default::default()
        };
        assert_eq!(read_values(&tensor).unwrap(), vec![1.5, -2.25]);
    }

    #[test]
    fn write_preserves_shape_and_dtype() {
        let mut tensor = f32_tensor("w", &[2], &[1.0, 2.0]);
        write_values(&mut tensor, &[9.0, 8.0]).unwrap();
        assert_eq!(tensor.dims, vec![2]);
        assert_eq!(tensor.data_type, DataType::FLOAT_TAG);
        assert_eq!(read_values(&tensor).unwrap(), vec![9.0, 8.0]);
    }

    #[test]
    fn write_casts_into_double_storage() {
        let mut tensor = TensorProto {
            dims: vec![1],
            data_type: DataType::DOUBLE_TAG,
            name: "w".into(),
            double_data: vec![0.0],
            ..Default::default()
        };
        write_values(&mut tensor, &[3.5]).unwrap();
        assert!(tensor.double_data.is_empty());
        assert_eq!(tensor.raw_data, 3.5f64.to_le_bytes().to_vec());
    }

    #[test]
    fn wrong_value_count_is_rejected() {
        let mut tensor = f32_tensor("w", &[4], &[0.0; 4]);
        let err = write_values(&mut tensor, &[1.0, 2.0]).unwrap_err();
        assert!(matches!(
            err,
            GraphErr::LengthMismatch {
                got: 2,
                expected: 4
            }
        ));
    }

    #[test]
    fn zero_dim_is_rejected() {
        let tensor = f32_tensor("w", &[2, 0], &[]);
        assert!(matches!(
            read_values(&tensor).unwrap_err(),
            GraphErr::InvalidDim { dim: 0, .. }
        ));
    }

    #[test]
    fn int64_dtype_is_unsupported() {
        let tensor = TensorProto {
            dims: vec![1],
            data_type: 7,
            name: "step".into(),
            int64_data: vec![0],
            ..Default::default()
        };
        assert!(matches!(
            read_values(&tensor).unwrap_err(),
            GraphErr::UnsupportedDtype { data_type: 7, .. }
        ));
    }

    #[test]
    fn short_raw_data_is_corrupt() {
        let mut tensor = f32_tensor("w", &[2], &[1.0, 2.0]);
        tensor.raw_data.pop();
        assert!(matches!(
            read_values(&tensor).unwrap_err(),
            GraphErr::CorruptTensor { .. }
        ));
    }
}
