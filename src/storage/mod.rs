//! Results persistence module

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use anyhow::Result;
use serde_json::{json, to_string_pretty};

use crate::config::{BrokerageConfig, Measure};
use crate::graph::CompressedGraph;
use crate::groups::groups_overlap;

/// Number of highest-scoring nodes listed in the summary
pub const TOP_NODES: usize = 5;

/// Save scores and a run summary to the specified directory
pub fn save_results(
    scores: &HashMap<String, f64>,
    graph: &CompressedGraph<String>,
    groups: &[Vec<String>],
    measure: Measure,
    config: &BrokerageConfig,
    output_dir: &str,
) -> Result<()> {
    log::info!("Saving {} scores to {}", scores.len(), output_dir);

    fs::create_dir_all(output_dir)?;

    save_scores(scores, output_dir)?;
    save_summary(scores, graph, groups, measure, config, output_dir)?;

    log::info!("Results saved successfully");

    Ok(())
}

/// Save node scores keyed and sorted by node id
fn save_scores(scores: &HashMap<String, f64>, output_dir: &str) -> Result<()> {
    let path = Path::new(output_dir).join("scores.json");
    let mut file = File::create(path)?;

    let sorted: BTreeMap<&str, f64> = scores
        .iter()
        .map(|(node, &score)| (node.as_str(), score))
        .collect();
    file.write_all(to_string_pretty(&sorted)?.as_bytes())?;

    Ok(())
}

fn save_summary(
    scores: &HashMap<String, f64>,
    graph: &CompressedGraph<String>,
    groups: &[Vec<String>],
    measure: Measure,
    config: &BrokerageConfig,
    output_dir: &str,
) -> Result<()> {
    log::info!("Saving summary information");

    let path = Path::new(output_dir).join("summary.json");
    let mut file = File::create(path)?;

    let node_count = graph.node_count();
    let avg_degree = if node_count == 0 {
        0.0
    } else {
        graph.edge_count() as f64 / node_count as f64
    };

    // Repeated members of one group count once
    let group_sizes: Vec<usize> = groups
        .iter()
        .map(|members| members.iter().collect::<HashSet<_>>().len())
        .collect();
    let memberships: usize = group_sizes.iter().sum();
    let avg_group_size = if groups.is_empty() {
        0.0
    } else {
        memberships as f64 / groups.len() as f64
    };

    let summary = json!({
        "graph_stats": {
            "node_count": node_count,
            "edge_count": graph.edge_count(),
            "directed": graph.is_directed(),
            "avg_degree": avg_degree,
        },
        "group_stats": {
            "group_count": groups.len(),
            "largest_group_size": group_sizes.iter().copied().max().unwrap_or(0),
            "smallest_group_size": group_sizes.iter().copied().min().unwrap_or(0),
            "avg_group_size": avg_group_size,
            "overlapping": groups_overlap(groups),
        },
        "settings": {
            "measure": measure,
            "config": config,
        },
        "top_nodes": top_nodes(scores, TOP_NODES)
            .into_iter()
            .map(|(node, score)| json!({ "node": node, "score": score }))
            .collect::<Vec<_>>(),
    });

    file.write_all(to_string_pretty(&summary)?.as_bytes())?;

    Ok(())
}

/// Highest scores first; ties broken by node id
fn top_nodes(scores: &HashMap<String, f64>, limit: usize) -> Vec<(&str, f64)> {
    let mut ranked: Vec<(&str, f64)> = scores
        .iter()
        .map(|(node, &score)| (node.as_str(), score))
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    ranked.truncate(limit);
    ranked
}
