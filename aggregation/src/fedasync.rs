//! The FedAsync staleness-weighted aggregation rule.

use rayon::prelude::*;

use crate::error::{AggErr, Result};

/// Staleness of a client update: how many versions behind the server's
/// current model the client trained. A client reporting a version ahead of
/// the server's is clamped to zero staleness rather than rejected.
pub fn staleness(current_version: u64, client_version: u64) -> u64 {
    current_version.saturating_sub(client_version)
}

/// Effective mixing weight for an update of the given staleness: the base
/// mixing parameter at staleness 0, down-weighted hyperbolically as the
/// update ages.
pub fn alpha(mixing_param: f32, staleness: u64) -> f32 {
    mixing_param / (staleness as f32 + 1.0)
}

/// Combines the current parameters with a client update into new
/// parameters using the staleness-weighted convex combination
/// `new[i] = (1 - alpha) * current[i] + alpha * update[i]`.
///
/// Pure: inputs are not mutated and identical inputs always produce
/// identical output.
///
/// # Arguments
/// * `current` - The server's current flat parameter vector.
/// * `update` - The client's flat update vector, same layout.
/// * `current_version` - The server's current model version.
/// * `client_version` - The model version the client trained against.
/// * `mixing_param` - Base weight for a maximally fresh update.
///
/// # Errors
/// Returns `AggErr::LengthMismatch` when the two vectors differ in length;
/// nothing is ever truncated or padded.
pub fn aggregate(
    current: &[f32],
    update: &[f32],
    current_version: u64,
    client_version: u64,
    mixing_param: f32,
) -> Result<Vec<f32>> {
    if current.len() != update.len() {
        return Err(AggErr::LengthMismatch {
            got: update.len(),
            expected: current.len(),
        });
    }

    let a = alpha(mixing_param, staleness(current_version, client_version));

    Ok(current
        .par_iter()
        .zip(update)
        .map(|(&w, &w_update)| (1.0 - a) * w + a * w_update)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(got: &[f32], want: &[f32]) {
        assert_eq!(got.len(), want.len());
        for (i, (g, w)) in got.iter().zip(want).enumerate() {
            assert!((g - w).abs() < 1e-6, "index {i}: got {g}, want {w}");
        }
    }

    #[test]
    fn zero_staleness_uses_full_mixing_param() {
        // Task version 3, client trained against version 3.
        let current = [1.0, 2.0, 3.0];
        let update = [3.0, 4.0, 5.0];

        let new = aggregate(&current, &update, 3, 3, 0.5).unwrap();
        assert_close(&new, &[2.0, 3.0, 4.0]);
        assert_eq!(alpha(0.5, 0), 0.5);
    }

    #[test]
    fn staleness_two_downweights_hyperbolically() {
        // Task version 3, client trained against version 1: alpha = 0.5 / 3.
        let current = [6.0];
        let update = [0.0];

        let new = aggregate(&current, &update, 3, 1, 0.5).unwrap();
        assert_close(&new, &[6.0 * (1.0 - 0.5 / 3.0)]);
    }

    #[test]
    fn alpha_strictly_decreases_with_staleness() {
        let mut prev = f32::INFINITY;
        for s in 0..10 {
            let a = alpha(0.5, s);
            assert!(a < prev, "alpha must strictly decrease, s={s}");
            assert!(a > 0.0);
            prev = a;
        }
    }

    #[test]
    fn future_client_version_clamps_to_zero_staleness() {
        assert_eq!(staleness(3, 5), 0);
        let new = aggregate(&[0.0], &[1.0], 3, 5, 0.5).unwrap();
        assert_close(&new, &[0.5]);
    }

    #[test]
    fn length_mismatch_is_an_error_not_a_truncation() {
        let err = aggregate(&[1.0, 2.0], &[1.0], 1, 1, 0.5).unwrap_err();
        assert!(matches!(
            err,
            AggErr::LengthMismatch {
                got: 1,
                expected: 2
            }
        ));
    }

    #[test]
    fn aggregation_is_reproducible() {
        let current: Vec<f32> = (0..1000).map(|i| i as f32 * 0.01).collect();
        let update: Vec<f32> = (0..1000).map(|i| (999 - i) as f32 * 0.01).collect();

        let a = aggregate(&current, &update, 7, 4, 0.3).unwrap();
        let b = aggregate(&current, &update, 7, 4, 0.3).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn inputs_are_not_mutated() {
        let current = vec![1.0, 2.0];
        let update = vec![3.0, 4.0];
        let _ = aggregate(&current, &update, 2, 1, 0.9).unwrap();
        assert_eq!(current, vec![1.0, 2.0]);
        assert_eq!(update, vec![3.0, 4.0]);
    }
}
