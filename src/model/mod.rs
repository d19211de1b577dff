//! Boundary contract for the external model-training collaborator
//!
//! Training happens outside this crate. The pipeline hands over a
//! [`GraphDataset`]; this module fixes the shape of that hand-off: an
//! ordered layer-stack specification replacing per-variant model classes,
//! and the per-epoch metrics report the trainer returns.

use serde::{Deserialize, Serialize};

use crate::pipeline::GraphDataset;
use crate::Result;

/// Convolution flavors a trainer may stack. Each kind maps node features
/// and the edge-index list to updated node features.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LayerKind {
    /// Attention-weighted neighborhood aggregation.
    Attention,

    /// Sampled-neighborhood mean aggregation.
    NeighborSampling,

    /// Sum aggregation with learned epsilon (isomorphism-network style).
    Isomorphism,
}

/// Ordered layer-stack specification for one training run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSpec {
    /// Layers applied in order.
    pub layers: Vec<LayerKind>,

    /// Width of the hidden representations.
    pub hidden_dim: usize,

    /// Training epochs the collaborator should run.
    pub epochs: usize,
}

impl ModelSpec {
    pub fn new(layers: Vec<LayerKind>, hidden_dim: usize) -> Self {
        Self {
            layers,
            hidden_dim,
            epochs: 200,
        }
    }

    pub fn with_epochs(mut self, epochs: usize) -> Self {
        self.epochs = epochs;
        self
    }
}

/// Metrics observed after one training epoch.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EpochMetrics {
    pub epoch: usize,
    pub accuracy: f32,
    pub macro_f1: f32,
}

/// What the collaborator returns: per-epoch metrics over the run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrainingReport {
    pub epochs: Vec<EpochMetrics>,
}

impl TrainingReport {
    /// Accuracy of the last recorded epoch, if any.
    pub fn final_accuracy(&self) -> Option<f32> {
        self.epochs.last().map(|m| m.accuracy)
    }

    /// Best accuracy seen over the run, if any.
    pub fn best_accuracy(&self) -> Option<f32> {
        self.epochs
            .iter()
            .map(|m| m.accuracy)
            .fold(None, |best, acc| match best {
                Some(b) if b >= acc => Some(b),
                _ => Some(acc),
            })
    }
}

/// The external training component: consumes the dataset and a layer-stack
/// specification, returns trained-run metrics. Pseudo-labels are a fixed
/// target; trainers must not update them.
pub trait ModelTrainer {
    fn train(&mut self, dataset: &GraphDataset, spec: &ModelSpec) -> Result<TrainingReport>;
}
