//! Memory-efficient representation of the communication graph

use std::mem;

use serde::{Deserialize, Serialize};

/// Which side of a communication an identifier was observed on.
///
/// Node identity is role-qualified: the same raw identifier appearing as
/// both a sender and a receiver maps to two distinct nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeRole {
    Sender,
    Receiver,
}

/// Undirected communication graph over the role-qualified node index space.
///
/// Connectivity is held twice. `edge_index` preserves emission order — each
/// ingested edge immediately followed by its mirror — and is the artifact
/// the training collaborator consumes. `offsets`/`targets` are a compressed
/// sparse (CSR) adjacency derived from the same list for degree and
/// neighbor queries: `targets[offsets[i]..offsets[i + 1]]` are the
/// neighbors of node `i`. Parallel edges are kept as-is in both forms.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommGraph {
    /// Number of nodes (senders + receivers).
    pub node_count: usize,

    /// Senders occupy indices `[0, sender_count)`, receivers the rest.
    pub sender_count: usize,

    /// (source, target) pairs; every pair has its mirror in the list.
    pub edge_index: Vec<(u32, u32)>,

    /// CSR offset array, `node_count + 1` entries.
    pub offsets: Vec<u32>,

    /// CSR target array, one entry per directed edge.
    pub targets: Vec<u32>,

    /// Raw identifier behind each node index.
    pub node_ids: Vec<i64>,
}

impl CommGraph {
    /// Role of a node index.
    pub fn role(&self, node: usize) -> NodeRole {
        if node < self.sender_count {
            NodeRole::Sender
        } else {
            NodeRole::Receiver
        }
    }

    /// Number of receiver-role nodes.
    pub fn receiver_count(&self) -> usize {
        self.node_count - self.sender_count
    }

    /// Human-readable role-qualified identifier, e.g. `s:142` or `r:9`.
    pub fn display_id(&self, node: usize) -> String {
        match self.role(node) {
            NodeRole::Sender => format!("s:{}", self.node_ids[node]),
            NodeRole::Receiver => format!("r:{}", self.node_ids[node]),
        }
    }

    /// Neighbors of a node.
    pub fn neighbors(&self, node: usize) -> &[u32] {
        let start = self.offsets[node] as usize;
        let end = self.offsets[node + 1] as usize;
        &self.targets[start..end]
    }

    /// Degree of a node (parallel edges counted individually).
    pub fn degree(&self, node: usize) -> usize {
        let start = self.offsets[node] as usize;
        let end = self.offsets[node + 1] as usize;
        end - start
    }

    /// Estimate memory usage in bytes.
    pub fn memory_usage(&self) -> usize {
        let base = mem::size_of::<Self>();
        let pairs = self.edge_index.capacity() * mem::size_of::<(u32, u32)>();
        let offsets = self.offsets.capacity() * mem::size_of::<u32>();
        let targets = self.targets.capacity() * mem::size_of::<u32>();
        let ids = self.node_ids.capacity() * mem::size_of::<i64>();

        base + pairs + offsets + targets + ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::edgelist::RawEdge;
    use crate::graph::builder::assemble_graph;

    fn small_graph() -> CommGraph {
        // senders {1, 2} -> 0, 1; receivers {2, 3} -> 2, 3
        assemble_graph(&[
            RawEdge { sender: 1, receiver: 2 },
            RawEdge { sender: 2, receiver: 3 },
        ])
        .expect("assemble")
    }

    #[test]
    fn roles_split_at_sender_count() {
        let graph = small_graph();

        assert_eq!(graph.role(0), NodeRole::Sender);
        assert_eq!(graph.role(1), NodeRole::Sender);
        assert_eq!(graph.role(2), NodeRole::Receiver);
        assert_eq!(graph.role(3), NodeRole::Receiver);
    }

    #[test]
    fn display_ids_are_role_qualified() {
        let graph = small_graph();

        assert_eq!(graph.display_id(1), "s:2");
        assert_eq!(graph.display_id(2), "r:2");
    }

    #[test]
    fn csr_agrees_with_edge_index() {
        let graph = small_graph();

        let total: usize = (0..graph.node_count).map(|n| graph.degree(n)).sum();
        assert_eq!(total, graph.edge_index.len());

        for &(src, dst) in &graph.edge_index {
            assert!(graph.neighbors(src as usize).contains(&dst));
        }
    }
}
