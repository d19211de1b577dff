//! GraphML export of the labeled graph

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use anyhow::Result;

use crate::graph::NodeRole;
use crate::pipeline::GraphDataset;

/// Write the bootstrapped graph as GraphML for external graph tools.
///
/// Nodes carry their role-qualified identifier, role, and cluster label.
/// Mirrored pairs are adjacent in the edge-index list, so each undirected
/// edge is emitted once.
pub fn export_graphml(dataset: &GraphDataset, output_dir: &str) -> Result<()> {
    log::info!("Exporting labeled graph to GraphML");

    fs::create_dir_all(output_dir)?;

    let path = Path::new(output_dir).join("graph.graphml");
    let mut file = File::create(path)?;

    let graph = &dataset.graph;

    writeln!(file, "<?xml version=\"1.0\" encoding=\"UTF-8\"?>")?;
    writeln!(
        file,
        "<graphml xmlns=\"http://graphml.graphdrawing.org/xmlns\">"
    )?;
    writeln!(
        file,
        "  <key id=\"label\" for=\"node\" attr.name=\"label\" attr.type=\"string\"/>"
    )?;
    writeln!(
        file,
        "  <key id=\"role\" for=\"node\" attr.name=\"role\" attr.type=\"string\"/>"
    )?;
    writeln!(
        file,
        "  <key id=\"cluster\" for=\"node\" attr.name=\"cluster\" attr.type=\"int\"/>"
    )?;
    writeln!(file, "  <graph id=\"G\" edgedefault=\"undirected\">")?;

    // Write nodes
    for node in 0..graph.node_count {
        let role = match graph.role(node) {
            NodeRole::Sender => "sender",
            NodeRole::Receiver => "receiver",
        };
        writeln!(file, "    <node id=\"n{}\">", node)?;
        writeln!(
            file,
            "      <data key=\"label\">{}</data>",
            graph.display_id(node)
        )?;
        writeln!(file, "      <data key=\"role\">{}</data>", role)?;
        writeln!(
            file,
            "      <data key=\"cluster\">{}</data>",
            dataset.labels[node]
        )?;
        writeln!(file, "    </node>")?;
    }

    // Write edges: one entry per mirrored pair
    let mut edge_id = 0;
    for pair in graph.edge_index.chunks_exact(2) {
        let (src, dst) = pair[0];
        writeln!(
            file,
            "    <edge id=\"e{}\" source=\"n{}\" target=\"n{}\"/>",
            edge_id, src, dst
        )?;
        edge_id += 1;
    }

    writeln!(file, "  </graph>")?;
    writeln!(file, "</graphml>")?;

    log::info!("GraphML export complete ({} edges)", edge_id);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bootstrap::{ClusterInput, FeatureInit};
    use crate::config::PipelineConfig;
    use crate::pipeline;

    #[test]
    fn writes_one_edge_per_mirrored_pair() {
        let input = std::env::temp_dir().join(format!("export-{}.tsv", std::process::id()));
        std::fs::write(&input, "1\t2\n2\t3\n").expect("fixture write");

        let dataset = pipeline::run(&PipelineConfig {
            input,
            clusters: 2,
            seed: 42,
            feature_init: FeatureInit::Identity,
            cluster_input: ClusterInput::Adjacency,
        })
        .expect("run");

        let out = std::env::temp_dir().join(format!("export-out-{}", std::process::id()));
        let out = out.to_string_lossy().to_string();
        export_graphml(&dataset, &out).expect("export");

        let contents =
            std::fs::read_to_string(Path::new(&out).join("graph.graphml")).expect("read");
        assert_eq!(contents.matches("<node ").count(), 4);
        assert_eq!(contents.matches("<edge ").count(), 2);
        assert!(contents.contains("edgedefault=\"undirected\""));
    }
}
