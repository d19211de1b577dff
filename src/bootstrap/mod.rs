//! Feature initialization and pseudo-label bootstrapping

pub mod features;
pub mod kmeans;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::error::PipelineError;
use crate::graph::CommGraph;
use features::{identity_features, one_hot, random_normal_features};
use kmeans::KMeans;

/// Node feature initialization strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureInit {
    /// N×N identity basis.
    Identity,

    /// N×dim standard-normal samples.
    RandomNormal { dim: usize },

    /// One-hot encoding of the bootstrapped cluster assignment itself.
    ClusterOneHot,
}

/// Which matrix the pseudo-label clustering partitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClusterInput {
    /// Cluster the node feature matrix.
    Features,

    /// Cluster dense adjacency rows built from the edge-index list.
    Adjacency,
}

/// Artifacts of the bootstrap stage. Labels are computed once and stay
/// fixed as the supervised training target.
#[derive(Debug, Clone)]
pub struct Bootstrap {
    /// N×D node feature matrix.
    pub features: Array2<f32>,

    /// Cluster assignment in `[0, K)` per node.
    pub labels: Vec<usize>,

    /// One-hot encoded labels, N×K.
    pub targets: Array2<f32>,
}

/// Derive node features and pseudo-labels for a graph.
///
/// `clusters` must lie in `[1, node_count]`; `clusters == node_count` is
/// legal and gives every node its own cluster.
pub fn bootstrap_labels(
    graph: &CommGraph,
    init: FeatureInit,
    input: ClusterInput,
    clusters: usize,
    seed: u64,
) -> Result<Bootstrap, PipelineError> {
    let node_count = graph.node_count;

    if clusters == 0 {
        return Err(PipelineError::InvalidClusterCount {
            requested: clusters,
            reason: "must be at least 1".to_string(),
        });
    }
    if clusters > node_count {
        return Err(PipelineError::InvalidClusterCount {
            requested: clusters,
            reason: format!("exceeds node count {node_count}"),
        });
    }

    let kmeans = KMeans::new(clusters, seed);

    let (features, labels) = match init {
        FeatureInit::ClusterOneHot => {
            // The one-hot features do not exist before clustering runs.
            if input == ClusterInput::Features {
                return Err(PipelineError::Config(
                    "one-hot cluster features require clustering over adjacency rows".to_string(),
                ));
            }
            let labels = cluster_rows(&kmeans, &adjacency_matrix(graph))?;
            (one_hot(&labels, clusters), labels)
        }
        FeatureInit::Identity => {
            let features = identity_features(node_count);
            let labels = match input {
                ClusterInput::Features => cluster_rows(&kmeans, &features)?,
                ClusterInput::Adjacency => cluster_rows(&kmeans, &adjacency_matrix(graph))?,
            };
            (features, labels)
        }
        FeatureInit::RandomNormal { dim } => {
            let features = random_normal_features(node_count, dim, seed)?;
            let labels = match input {
                ClusterInput::Features => cluster_rows(&kmeans, &features)?,
                ClusterInput::Adjacency => cluster_rows(&kmeans, &adjacency_matrix(graph))?,
            };
            (features, labels)
        }
    };

    let targets = one_hot(&labels, clusters);

    log::info!(
        "Bootstrapped {} pseudo-labels over {} clusters",
        labels.len(),
        clusters
    );

    Ok(Bootstrap {
        features,
        labels,
        targets,
    })
}

fn cluster_rows(kmeans: &KMeans, data: &Array2<f32>) -> Result<Vec<usize>, PipelineError> {
    let fit = kmeans.fit(data)?;
    log::debug!(
        "k-means converged after {} iterations (inertia {:.3})",
        fit.n_iter,
        fit.inertia
    );
    Ok(fit.labels)
}

/// Dense adjacency rows used as the edge-based clustering input. Parallel
/// edges accumulate, so a row holds per-neighbor communication counts.
pub fn adjacency_matrix(graph: &CommGraph) -> Array2<f32> {
    let mut adjacency = Array2::zeros((graph.node_count, graph.node_count));
    for &(src, dst) in &graph.edge_index {
        adjacency[[src as usize, dst as usize]] += 1.0;
    }
    adjacency
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::edgelist::RawEdge;
    use crate::graph::assemble_graph;

    fn two_block_graph() -> CommGraph {
        // Two disconnected sender/receiver blocks.
        assemble_graph(&[
            RawEdge { sender: 1, receiver: 10 },
            RawEdge { sender: 2, receiver: 10 },
            RawEdge { sender: 1, receiver: 11 },
            RawEdge { sender: 2, receiver: 11 },
            RawEdge { sender: 5, receiver: 20 },
            RawEdge { sender: 6, receiver: 20 },
            RawEdge { sender: 5, receiver: 21 },
            RawEdge { sender: 6, receiver: 21 },
        ])
        .expect("assemble")
    }

    #[test]
    fn adjacency_rows_count_parallel_edges() {
        let graph = assemble_graph(&[
            RawEdge { sender: 1, receiver: 2 },
            RawEdge { sender: 1, receiver: 2 },
        ])
        .expect("assemble");

        let adjacency = adjacency_matrix(&graph);
        assert_eq!(adjacency.shape(), &[2, 2]);
        assert_eq!(adjacency[[0, 1]], 2.0);
        assert_eq!(adjacency[[1, 0]], 2.0);
        assert_eq!(adjacency[[0, 0]], 0.0);
    }

    #[test]
    fn cluster_count_above_node_count_fails_fast() {
        let graph = two_block_graph();
        let err = bootstrap_labels(
            &graph,
            FeatureInit::RandomNormal { dim: 4 },
            ClusterInput::Features,
            graph.node_count + 1,
            42,
        )
        .expect_err("should fail");

        assert!(matches!(err, PipelineError::InvalidClusterCount { .. }));
    }

    #[test]
    fn zero_clusters_fails_fast() {
        let graph = two_block_graph();
        let err = bootstrap_labels(
            &graph,
            FeatureInit::Identity,
            ClusterInput::Features,
            0,
            42,
        )
        .expect_err("should fail");

        assert!(matches!(err, PipelineError::InvalidClusterCount { .. }));
    }

    #[test]
    fn one_hot_features_require_adjacency_input() {
        let graph = two_block_graph();
        let err = bootstrap_labels(
            &graph,
            FeatureInit::ClusterOneHot,
            ClusterInput::Features,
            2,
            42,
        )
        .expect_err("should fail");

        assert!(matches!(err, PipelineError::Config(_)));
    }

    #[test]
    fn one_hot_features_equal_targets() {
        let graph = two_block_graph();
        let bootstrap = bootstrap_labels(
            &graph,
            FeatureInit::ClusterOneHot,
            ClusterInput::Adjacency,
            2,
            42,
        )
        .expect("bootstrap");

        assert_eq!(bootstrap.features.shape(), &[graph.node_count, 2]);
        assert_eq!(bootstrap.features, bootstrap.targets);
    }

    #[test]
    fn labels_stay_in_range_and_targets_match() {
        let graph = two_block_graph();
        let bootstrap = bootstrap_labels(
            &graph,
            FeatureInit::RandomNormal { dim: 8 },
            ClusterInput::Features,
            3,
            42,
        )
        .expect("bootstrap");

        assert_eq!(bootstrap.labels.len(), graph.node_count);
        for (row, &label) in bootstrap.labels.iter().enumerate() {
            assert!(label < 3);
            assert_eq!(bootstrap.targets[[row, label]], 1.0);
            assert_eq!(bootstrap.targets.row(row).sum(), 1.0);
        }
    }

    #[test]
    fn bootstrap_is_seed_deterministic() {
        let graph = two_block_graph();
        let run = |seed| {
            bootstrap_labels(
                &graph,
                FeatureInit::RandomNormal { dim: 8 },
                ClusterInput::Adjacency,
                2,
                seed,
            )
            .expect("bootstrap")
        };

        let first = run(42);
        let second = run(42);
        assert_eq!(first.labels, second.labels);
        assert_eq!(first.features, second.features);
    }
}
