//! Group brokerage (gefura) centrality on directed and undirected graphs

pub mod brokerage;
pub mod config;
pub mod data;
pub mod error;
pub mod graph;
pub mod groups;
pub mod storage;

pub use brokerage::{external_score, global_score, local_score, score};
pub use config::{BrokerageConfig, Direction, Measure, OverlapStrategy};
pub use error::{Result, ValidationError};
pub use graph::{CompressedGraph, GraphBuilder, NodeId};
pub use groups::{aggregate, decouple, groups_overlap};
