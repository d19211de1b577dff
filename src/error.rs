//! Error types for the bootstrap pipeline

use thiserror::Error;

/// Errors surfaced by the pipeline stages.
///
/// Malformed input rows are not errors; they are dropped and counted during
/// ingestion. Everything here is fatal for the run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Input file could not be opened or read.
    #[error("failed to read edge list: {0}")]
    Io(#[from] std::io::Error),

    /// Ingestion produced zero usable rows or zero nodes.
    #[error("empty input: {0}")]
    EmptyInput(String),

    /// Cluster count is zero or exceeds the node count.
    #[error("invalid cluster count {requested}: {reason}")]
    InvalidClusterCount { requested: usize, reason: String },

    /// Feature dimension must be at least 1 for random initialization.
    #[error("invalid feature dimension {0}: must be at least 1")]
    InvalidFeatureDim(usize),

    /// Mutually exclusive configuration options were combined.
    #[error("incompatible configuration: {0}")]
    Config(String),

    /// Sampling distribution could not be constructed.
    #[error("invalid distribution parameters: {0}")]
    Distribution(String),

    /// Clustering could not produce the requested number of non-empty
    /// groups, typically because the input has fewer distinct points.
    #[error("clustering produced {produced} non-empty groups, expected {requested}")]
    DegenerateClustering { requested: usize, produced: usize },
}
