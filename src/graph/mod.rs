//! Graph representation and shortest-path algorithms module

pub mod compressed;
pub mod builder;
pub mod algorithms;

pub use builder::GraphBuilder;
pub use compressed::{CompressedGraph, GraphView, NodeId};
