//! The parameter codec: converts between a structured model graph and a
//! flat ordered `f32` vector, restricted to a caller-supplied ordered set
//! of tensor names.
//!
//! The name ordering is load-bearing: `extract` and `inject` traverse the
//! names in the given order, and that order is the same one the training
//! and optimizer graphs are generated against. Callers must never reorder
//! the name set between a download and the matching update.

use crate::error::{GraphErr, Result};
use crate::proto::GraphProto;
use crate::tensor;

/// Flattens the named tensors, in name order, into one `f32` vector.
///
/// # Arguments
/// * `graph` - The graph to read from.
/// * `trainable_names` - The ordered tensor names to include.
///
/// # Errors
/// Returns `GraphErr::ParameterNotFound` if any name has no initializer,
/// or a tensor-level error if a tensor is malformed.
pub fn extract(graph: &GraphProto, trainable_names: &[String]) -> Result<Vec<f32>> {
    let mut params = Vec::new();

    for name in trainable_names {
        let tensor = graph
            .find_initializer(name)
            .ok_or_else(|| GraphErr::ParameterNotFound { name: name.clone() })?;
        params.extend(tensor::read_values(tensor)?);
    }

    Ok(params)
}

/// Total element count of the named tensors, i.e. the flat vector length
/// `extract` produces and `inject` consumes.
pub fn flat_len(graph: &GraphProto, trainable_names: &[String]) -> Result<usize> {
    let mut len = 0;
    for name in trainable_names {
        let tensor = graph
            .find_initializer(name)
            .ok_or_else(|| GraphErr::ParameterNotFound { name: name.clone() })?;
        len += tensor::element_count(tensor)?;
    }
    Ok(len)
}

/// Writes a flat parameter vector back into the named tensors, in name
/// order. Every tensor not named is left byte-identical; named tensors get
/// new data cast to their stored dtype, shape and dtype unchanged.
///
/// The vector must hold exactly one value per element of the named
/// tensors; a short or long vector is rejected before any tensor is
/// modified, so a failed call leaves the graph untouched.
///
/// # Errors
/// `GraphErr::ParameterNotFound` for an unknown name,
/// `GraphErr::LengthMismatch` when the vector length is off.
pub fn inject(graph: &mut GraphProto, values: &[f32], trainable_names: &[String]) -> Result<()> {
    let expected = flat_len(graph, trainable_names)?;
    if values.len() != expected {
        return Err(GraphErr::LengthMismatch {
            got: values.len(),
            expected,
        });
    }

    let mut offset = 0;
    for name in trainable_names {
        let tensor = graph
            .find_initializer_mut(name)
            .ok_or_else(|| GraphErr::ParameterNotFound { name: name.clone() })?;
        let count = tensor::element_count(tensor)?;
        tensor::write_values(tensor, &values[offset..offset + count])?;
        offset += count;
    }

    Ok(())
}
