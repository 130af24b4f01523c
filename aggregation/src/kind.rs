use serde::{Deserialize, Serialize};

use crate::error::{AggErr, Result};
use crate::fedasync;

/// The aggregation algorithms a task can be configured with.
///
/// Dispatch is total: a tag that names no algorithm is rejected when the
/// task is registered, and again at dispatch. A configured aggregator that
/// silently leaves the parameters unchanged is the one failure mode this
/// type exists to rule out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregatorKind {
    FedAsync,
}

impl AggregatorKind {
    /// Parses a config-file tag.
    ///
    /// # Errors
    /// Returns `AggErr::UnsupportedAggregator` for an unknown tag.
    pub fn from_tag(tag: &str) -> Result<Self> {
        match tag {
            "fedasync" => Ok(AggregatorKind::FedAsync),
            other => Err(AggErr::UnsupportedAggregator {
                tag: other.to_string(),
            }),
        }
    }

    /// The wire/config tag for this algorithm.
    pub fn tag(self) -> &'static str {
        match self {
            AggregatorKind::FedAsync => "fedasync",
        }
    }

    /// Runs this algorithm over the current parameters and a client update.
    ///
    /// # Errors
    /// Propagates the algorithm's own errors (`LengthMismatch` for
    /// mismatched vectors).
    pub fn aggregate(
        self,
        current: &[f32],
        update: &[f32],
        current_version: u64,
        client_version: u64,
        mixing_param: f32,
    ) -> Result<Vec<f32>> {
        match self {
            AggregatorKind::FedAsync => {
                fedasync::aggregate(current, update, current_version, client_version, mixing_param)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_tag_parses() {
        assert_eq!(AggregatorKind::from_tag("fedasync").unwrap(), AggregatorKind::FedAsync);
        assert_eq!(AggregatorKind::FedAsync.tag(), "fedasync");
    }

    #[test]
    fn unknown_tag_is_a_reported_error() {
        let err = AggregatorKind::from_tag("fedbuff").unwrap_err();
        assert!(matches!(err, AggErr::UnsupportedAggregator { tag } if tag == "fedbuff"));
    }

    #[test]
    fn serde_tag_matches_config_format() {
        let kind: AggregatorKind = serde_json::from_str("\"fedasync\"").unwrap();
        assert_eq!(kind, AggregatorKind::FedAsync);
    }

    #[test]
    fn dispatch_runs_the_configured_algorithm() {
        let new = AggregatorKind::FedAsync
            .aggregate(&[0.0], &[1.0], 0, 0, 0.5)
            .unwrap();
        assert_eq!(new, vec![0.5]);
    }
}
