//! Graph representation and assembly module

pub mod builder;
pub mod compressed;

pub use builder::{assemble_graph, RoleIndex};
pub use compressed::{CommGraph, NodeRole};
