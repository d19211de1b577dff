//! Role-qualified index assignment and graph assembly

use std::collections::{HashMap, HashSet};

use itertools::Itertools;

use crate::data::edgelist::RawEdge;
use crate::error::PipelineError;
use crate::graph::CommGraph;

/// Disjoint index maps for sender-role and receiver-role identifiers.
///
/// Distinct senders receive indices `[0, sender_count)` and distinct
/// receivers `[sender_count, sender_count + receiver_count)`. Within each
/// role, identifiers are assigned in ascending numeric order, so the
/// mapping is deterministic across runs and independent of hash iteration
/// order.
#[derive(Debug, Clone)]
pub struct RoleIndex {
    sender_index: HashMap<i64, u32>,
    receiver_index: HashMap<i64, u32>,
    node_ids: Vec<i64>,
    sender_count: usize,
}

impl RoleIndex {
    /// Build the index maps from the ingested edges.
    pub fn from_edges(edges: &[RawEdge]) -> Self {
        let senders: Vec<i64> = edges
            .iter()
            .map(|e| e.sender)
            .collect::<HashSet<_>>()
            .into_iter()
            .sorted()
            .collect();
        let receivers: Vec<i64> = edges
            .iter()
            .map(|e| e.receiver)
            .collect::<HashSet<_>>()
            .into_iter()
            .sorted()
            .collect();

        let sender_count = senders.len();

        let sender_index = senders
            .iter()
            .enumerate()
            .map(|(i, &id)| (id, i as u32))
            .collect();
        let receiver_index = receivers
            .iter()
            .enumerate()
            .map(|(i, &id)| (id, (sender_count + i) as u32))
            .collect();

        let mut node_ids = senders;
        node_ids.extend(receivers);

        Self {
            sender_index,
            receiver_index,
            node_ids,
            sender_count,
        }
    }

    /// Node index of a sender-role identifier.
    pub fn sender(&self, id: i64) -> Option<u32> {
        self.sender_index.get(&id).copied()
    }

    /// Node index of a receiver-role identifier.
    pub fn receiver(&self, id: i64) -> Option<u32> {
        self.receiver_index.get(&id).copied()
    }

    /// Total number of role-qualified nodes.
    pub fn node_count(&self) -> usize {
        self.node_ids.len()
    }

    /// Number of sender-role nodes.
    pub fn sender_count(&self) -> usize {
        self.sender_count
    }

    /// Number of receiver-role nodes.
    pub fn receiver_count(&self) -> usize {
        self.node_ids.len() - self.sender_count
    }
}

/// Assemble the undirected communication graph.
///
/// Every raw edge (s, r) contributes both (index(s), index(r)) and
/// (index(r), index(s)) to the edge-index list, so the list holds exactly
/// twice the valid edge count. Parallel edges are kept; self-loops cannot
/// arise because the role ranges are disjoint.
pub fn assemble_graph(edges: &[RawEdge]) -> Result<CommGraph, PipelineError> {
    if edges.is_empty() {
        return Err(PipelineError::EmptyInput(
            "cannot assemble a graph from zero edges".to_string(),
        ));
    }

    let index = RoleIndex::from_edges(edges);
    let node_count = index.node_count();

    log::info!(
        "Assigned {} node indices ({} senders, {} receivers)",
        node_count,
        index.sender_count(),
        index.receiver_count()
    );

    // Emit each edge and its mirror in input order.
    let mut edge_index = Vec::with_capacity(edges.len() * 2);
    for edge in edges {
        if let (Some(src), Some(dst)) = (index.sender(edge.sender), index.receiver(edge.receiver)) {
            edge_index.push((src, dst));
            edge_index.push((dst, src));
        }
    }

    // First pass: count degrees to lay out the CSR offsets.
    let mut degrees = vec![0u32; node_count];
    for &(src, _) in &edge_index {
        degrees[src as usize] += 1;
    }

    let mut offsets = Vec::with_capacity(node_count + 1);
    offsets.push(0);
    let mut offset = 0;
    for &degree in &degrees {
        offset += degree;
        offsets.push(offset);
    }

    // Second pass: fill the target array.
    let mut targets = vec![0u32; edge_index.len()];
    let mut cursor = vec![0u32; node_count];
    for &(src, dst) in &edge_index {
        let pos = (offsets[src as usize] + cursor[src as usize]) as usize;
        targets[pos] = dst;
        cursor[src as usize] += 1;
    }

    Ok(CommGraph {
        node_count,
        sender_count: index.sender_count(),
        edge_index,
        offsets,
        targets,
        node_ids: index.node_ids,
    })
}
