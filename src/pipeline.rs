//! End-to-end dataset construction
//!
//! Data flows strictly forward: ingestion → index assignment → graph
//! assembly → label/feature bootstrap. Each invocation is self-contained
//! given a configuration; the only side effect is reading the input file.

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::bootstrap::{self, Bootstrap};
use crate::config::PipelineConfig;
use crate::data::edgelist;
use crate::error::PipelineError;
use crate::graph::{self, CommGraph};

/// The complete boundary surface handed to the training collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphDataset {
    /// Node count plus the undirected edge-index list (and CSR adjacency).
    pub graph: CommGraph,

    /// N×D node feature matrix.
    pub features: Array2<f32>,

    /// Fixed pseudo-label per node, in `[0, K)`.
    pub labels: Vec<usize>,

    /// One-hot encoded training targets, N×K.
    pub targets: Array2<f32>,

    /// Malformed input rows dropped during ingestion.
    pub rejected_rows: usize,
}

impl GraphDataset {
    /// Number of pseudo-label clusters K.
    pub fn cluster_count(&self) -> usize {
        self.targets.ncols()
    }
}

/// Run the full pipeline.
pub fn run(config: &PipelineConfig) -> Result<GraphDataset, PipelineError> {
    config.validate()?;

    let edge_list = edgelist::load_edge_list(&config.input)?;
    let graph = graph::assemble_graph(&edge_list.edges)?;

    log::info!(
        "Assembled graph with {} nodes and {} directed entries ({} bytes)",
        graph.node_count,
        graph.edge_index.len(),
        graph.memory_usage()
    );

    let Bootstrap {
        features,
        labels,
        targets,
    } = bootstrap::bootstrap_labels(
        &graph,
        config.feature_init,
        config.cluster_input,
        config.clusters,
        config.seed,
    )?;

    Ok(GraphDataset {
        graph,
        features,
        labels,
        targets,
        rejected_rows: edge_list.rejected_rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bootstrap::{ClusterInput, FeatureInit};
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn write_fixture(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "pipeline-{}-{}.tsv",
            std::process::id(),
            name
        ));
        std::fs::write(&path, contents).expect("fixture write");
        path
    }

    fn config(input: PathBuf, clusters: usize) -> PipelineConfig {
        PipelineConfig {
            input,
            clusters,
            seed: 42,
            feature_init: FeatureInit::RandomNormal { dim: 8 },
            cluster_input: ClusterInput::Features,
        }
    }

    #[test]
    fn mixed_input_end_to_end() {
        let path = write_fixture("mixed", "1\t2\n2\t3\n#comment\n3\tbadval\n");
        let dataset = run(&config(path, 2)).expect("run");

        assert_eq!(dataset.graph.node_count, 4);
        assert_eq!(dataset.graph.edge_index.len(), 4);
        assert_eq!(dataset.rejected_rows, 1);
        assert_eq!(dataset.labels.len(), 4);
        assert_eq!(dataset.features.shape(), &[4, 8]);
        assert_eq!(dataset.targets.shape(), &[4, 2]);
        assert_eq!(dataset.cluster_count(), 2);
    }

    #[test]
    fn repeated_runs_agree_up_to_cluster_relabeling() {
        let path = write_fixture("repeat", "1\t10\n2\t10\n3\t11\n4\t11\n1\t11\n");
        let cfg = config(path, 3);

        let first = run(&cfg).expect("run");
        let second = run(&cfg).expect("run");

        let mut mapping: HashMap<usize, usize> = HashMap::new();
        let mut inverse: HashMap<usize, usize> = HashMap::new();
        for (&a, &b) in first.labels.iter().zip(second.labels.iter()) {
            assert_eq!(*mapping.entry(a).or_insert(b), b);
            assert_eq!(*inverse.entry(b).or_insert(a), a);
        }
    }

    #[test]
    fn cluster_count_equal_to_node_count_succeeds() {
        let path = write_fixture("k-equals-n", "1\t2\n3\t4\n");
        // 2 senders + 2 receivers = 4 nodes
        let dataset = run(&config(path, 4)).expect("run");

        let mut labels = dataset.labels.clone();
        labels.sort_unstable();
        assert_eq!(labels, vec![0, 1, 2, 3]);
    }

    #[test]
    fn cluster_count_above_node_count_fails() {
        let path = write_fixture("k-too-big", "1\t2\n");
        let err = run(&config(path, 3)).expect_err("should fail");

        assert!(matches!(err, PipelineError::InvalidClusterCount { .. }));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = run(&config(PathBuf::from("/nonexistent/edges.tsv"), 2))
            .expect_err("should fail");

        assert!(matches!(err, PipelineError::Io(_)));
    }
}
