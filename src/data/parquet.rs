//! Parquet edge-list loading

use std::path::Path;

use anyhow::Result;
use polars::prelude::*;

use crate::graph::{CompressedGraph, GraphBuilder};

/// Column holding edge source node ids
pub const SOURCE_COLUMN: &str = "source";

/// Column holding edge target node ids
pub const TARGET_COLUMN: &str = "target";

/// Load an edge list into a graph keyed by node id strings.
///
/// `source` and `target` must be string columns. With `weight` set, that
/// column is cast to `f64` and stored under the same name; null weights read
/// as the default edge weight. Rows with a null endpoint are skipped.
pub fn load_edge_list(
    path: &str,
    directed: bool,
    weight: Option<&str>,
) -> Result<CompressedGraph<String>> {
    log::info!("Reading parquet file: {}", path);

    if !Path::new(path).exists() {
        return Err(anyhow::anyhow!("File not found: {}", path));
    }

    let df = LazyFrame::scan_parquet(path, Default::default())?.collect()?;
    log::debug!("File schema: {:?}", df.schema());
    log::info!("Loaded {} edge rows", df.height());

    let sources = df.column(SOURCE_COLUMN)?.str()?;
    let targets = df.column(TARGET_COLUMN)?.str()?;

    let weight_column = match weight {
        Some(name) => Some((name, df.column(name)?.cast(&DataType::Float64)?)),
        None => None,
    };
    let weights = match &weight_column {
        Some((name, column)) => Some((*name, column.f64()?)),
        None => None,
    };

    let mut builder = GraphBuilder::with_capacity(directed, df.height());
    let mut skipped = 0usize;

    for i in 0..df.height() {
        let (Some(src), Some(dst)) = (sources.get(i), targets.get(i)) else {
            skipped += 1;
            continue;
        };

        match weights {
            Some((name, values)) => {
                match values.get(i) {
                    Some(value) => {
                        let attrs = [(name, value)];
                        builder.add_edge_with_attrs(src.to_string(), dst.to_string(), &attrs);
                    }
                    // Missing values fall back to the default weight at build time
                    None => {
                        builder.add_edge(src.to_string(), dst.to_string());
                    }
                }
            }
            None => {
                builder.add_edge(src.to_string(), dst.to_string());
            }
        }
    }

    if skipped > 0 {
        log::warn!("Skipped {} rows with a missing source or target", skipped);
    }

    let graph = builder.build();
    log::info!(
        "Built {} graph with {} nodes and {} edges ({} bytes)",
        if directed { "directed" } else { "undirected" },
        graph.node_count(),
        graph.edge_count(),
        graph.memory_usage()
    );

    Ok(graph)
}
