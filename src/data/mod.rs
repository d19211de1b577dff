//! Input ingestion module

pub mod edgelist;

pub use edgelist::{load_edge_list, EdgeList, RawEdge};
