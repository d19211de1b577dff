//! Configuration management for the bootstrap pipeline

use std::path::PathBuf;

use crate::bootstrap::{ClusterInput, FeatureInit};
use crate::error::PipelineError;

/// Everything one pipeline invocation needs. Replaces ad-hoc process-level
/// driver state so runs are self-contained and unit-testable.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Path to the tab-separated edge list.
    pub input: PathBuf,

    /// Number of pseudo-label clusters K.
    pub clusters: usize,

    /// Seed for feature generation and clustering.
    pub seed: u64,

    /// Feature initialization strategy.
    pub feature_init: FeatureInit,

    /// Matrix the clustering partitions.
    pub cluster_input: ClusterInput,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("edges.tsv"),
            clusters: 4,
            seed: 42,
            feature_init: FeatureInit::RandomNormal { dim: 64 },
            cluster_input: ClusterInput::Features,
        }
    }
}

impl PipelineConfig {
    /// Check the parts of the configuration that do not depend on the input
    /// file. Node-count-dependent checks happen once the graph is built.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.clusters == 0 {
            return Err(PipelineError::InvalidClusterCount {
                requested: self.clusters,
                reason: "must be at least 1".to_string(),
            });
        }

        if let FeatureInit::RandomNormal { dim: 0 } = self.feature_init {
            return Err(PipelineError::InvalidFeatureDim(0));
        }

        if self.feature_init == FeatureInit::ClusterOneHot
            && self.cluster_input == ClusterInput::Features
        {
            return Err(PipelineError::Config(
                "one-hot cluster features require clustering over adjacency rows".to_string(),
            ));
        }

        Ok(())
    }
}
