//! Input loading: edge lists from Parquet, groupings from JSON

pub mod groups;
pub mod parquet;

pub use groups::load_groups;
pub use parquet::load_edge_list;
