//! Dataset artifact persistence

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use anyhow::Result;
use serde_json::{json, to_string_pretty};

use crate::graph::NodeRole;
use crate::pipeline::GraphDataset;

/// Save the bootstrapped dataset to the specified directory.
pub fn save_dataset(dataset: &GraphDataset, output_dir: &str) -> Result<()> {
    log::info!(
        "Saving dataset with {} nodes to {}",
        dataset.graph.node_count,
        output_dir
    );

    fs::create_dir_all(output_dir)?;

    save_summary(dataset, output_dir)?;
    save_labels(dataset, output_dir)?;
    save_snapshot(dataset, output_dir)?;

    log::info!("Dataset saved successfully");

    Ok(())
}

/// Save summary statistics
fn save_summary(dataset: &GraphDataset, output_dir: &str) -> Result<()> {
    log::info!("Saving summary information");

    let path = Path::new(output_dir).join("summary.json");
    let mut file = File::create(path)?;

    let graph = &dataset.graph;
    let clusters = dataset.cluster_count();

    // Label histogram
    let mut label_counts = vec![0usize; clusters];
    for &label in &dataset.labels {
        label_counts[label] += 1;
    }

    // Degree distribution, 0-100+ buckets
    let mut degree_dist = vec![0; 101];
    for node in 0..graph.node_count {
        let bucket = std::cmp::min(graph.degree(node), 100);
        degree_dist[bucket] += 1;
    }

    let summary = json!({
        "graph_stats": {
            "node_count": graph.node_count,
            "sender_count": graph.sender_count,
            "receiver_count": graph.receiver_count(),
            "edge_entries": graph.edge_index.len(),
            "raw_edge_count": graph.edge_index.len() / 2,
            "rejected_rows": dataset.rejected_rows,
            "avg_degree": graph.edge_index.len() as f64 / graph.node_count as f64,
            "degree_distribution": degree_dist,
        },
        "bootstrap_stats": {
            "cluster_count": clusters,
            "feature_dim": dataset.features.ncols(),
            "label_histogram": label_counts,
        }
    });

    file.write_all(to_string_pretty(&summary)?.as_bytes())?;

    Ok(())
}

/// Save per-node pseudo-label assignments
fn save_labels(dataset: &GraphDataset, output_dir: &str) -> Result<()> {
    log::info!("Saving pseudo-label assignments");

    let path = Path::new(output_dir).join("labels.json");
    let mut file = File::create(path)?;

    let graph = &dataset.graph;
    let nodes = dataset
        .labels
        .iter()
        .enumerate()
        .map(|(node, &cluster)| {
            let role = match graph.role(node) {
                NodeRole::Sender => "sender",
                NodeRole::Receiver => "receiver",
            };
            json!({
                "index": node,
                "id": graph.node_ids[node],
                "role": role,
                "cluster": cluster,
            })
        })
        .collect::<Vec<_>>();

    let labels = json!({ "nodes": nodes });

    file.write_all(to_string_pretty(&labels)?.as_bytes())?;

    Ok(())
}

/// Save a binary snapshot of the full dataset
fn save_snapshot(dataset: &GraphDataset, output_dir: &str) -> Result<()> {
    log::info!("Saving binary dataset snapshot");

    let path = Path::new(output_dir).join("dataset.bin");
    let mut file = File::create(path)?;

    let encoded = bincode::serialize(dataset)?;
    file.write_all(&encoded)?;

    Ok(())
}
