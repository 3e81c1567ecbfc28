//! Group brokerage (gefura) scores
//!
//! Every measure runs one shortest-path search per source node, sweeps the
//! result backwards while counting which group pairs each path connects, and
//! rescales the summed totals.

pub mod accumulate;
pub mod rescale;

use std::collections::HashMap;

use crate::config::{BrokerageConfig, Direction, Measure, OverlapStrategy};
use crate::error::Result;
use crate::graph::{CompressedGraph, GraphView, NodeId};
use crate::groups::decouple::CloneId;
use crate::groups::{aggregate, decouple, groups_overlap, GroupIndex};

use accumulate::accumulate;
use rescale::{rescale_external, rescale_global, rescale_local};

/// Global brokerage of every node: its share of the shortest paths between
/// nodes of different groups.
///
/// With [`OverlapStrategy::Decouple`] and overlapping groups the score is
/// computed on the decoupled graph and summed per original node.
pub fn global_score<N, S>(
    graph: &CompressedGraph<N>,
    groups: &[S],
    config: &BrokerageConfig,
) -> Result<HashMap<N, f64>>
where
    N: NodeId,
    for<'a> &'a S: IntoIterator<Item = &'a N>,
{
    if config.overlap == OverlapStrategy::Decouple && groups_overlap(groups) {
        let (decoupled, decoupled_groups) = decouple(graph, groups)?;
        let scores =
            global_on::<CloneId<N>, Vec<CloneId<N>>>(&decoupled, &decoupled_groups, config)?;
        return Ok(aggregate(scores));
    }
    global_on(graph, groups, config)
}

/// Local brokerage of every node: the part of its global brokerage carried
/// by paths that start in (`Out`) or end in (`In`) one of its own groups.
///
/// `All` averages both when normalized and sums them otherwise. Direction is
/// ignored on undirected graphs.
///
/// Normalization divides by the size of a single own group, so overlapping
/// groups are always decoupled here, whatever the configured
/// [`OverlapStrategy`].
pub fn local_score<N, S>(
    graph: &CompressedGraph<N>,
    groups: &[S],
    config: &BrokerageConfig,
) -> Result<HashMap<N, f64>>
where
    N: NodeId,
    for<'a> &'a S: IntoIterator<Item = &'a N>,
{
    if groups_overlap(groups) {
        if config.overlap == OverlapStrategy::Direct {
            log::debug!("Local brokerage decouples overlapping groups under every strategy");
        }
        let (decoupled, decoupled_groups) = decouple(graph, groups)?;
        let scores =
            local_on::<CloneId<N>, Vec<CloneId<N>>>(&decoupled, &decoupled_groups, config)?;
        return Ok(aggregate(scores));
    }
    local_on(graph, groups, config)
}

/// External brokerage of every node: its share of the shortest paths between
/// two groups that both exclude it.
///
/// Always computed on the original graph; overlapping groups are handled
/// through set-valued memberships.
pub fn external_score<N, S>(
    graph: &CompressedGraph<N>,
    groups: &[S],
    config: &BrokerageConfig,
) -> Result<HashMap<N, f64>>
where
    N: NodeId,
    for<'a> &'a S: IntoIterator<Item = &'a N>,
{
    let index = GroupIndex::build(graph, groups)?;
    log_start(Measure::External, graph, &index, config);

    let view = graph.view(config.weight.as_deref());
    let raw = accumulate(&view, &index, Measure::External, config.max_path_length);
    let scores = rescale_external(raw, &index, graph.is_directed(), config.normalized);

    Ok(graph.label_scores(scores))
}

/// Dispatch on a measure chosen at runtime
pub fn score<N, S>(
    graph: &CompressedGraph<N>,
    groups: &[S],
    measure: Measure,
    config: &BrokerageConfig,
) -> Result<HashMap<N, f64>>
where
    N: NodeId,
    for<'a> &'a S: IntoIterator<Item = &'a N>,
{
    match measure {
        Measure::Global => global_score(graph, groups, config),
        Measure::Local => local_score(graph, groups, config),
        Measure::External => external_score(graph, groups, config),
    }
}

fn global_on<N, S>(
    graph: &CompressedGraph<N>,
    groups: &[S],
    config: &BrokerageConfig,
) -> Result<HashMap<N, f64>>
where
    N: NodeId,
    for<'a> &'a S: IntoIterator<Item = &'a N>,
{
    let index = GroupIndex::build(graph, groups)?;
    log_start(Measure::Global, graph, &index, config);

    let view = graph.view(config.weight.as_deref());
    let raw = accumulate(&view, &index, Measure::Global, config.max_path_length);
    let scores = rescale_global(raw, &index, graph.is_directed(), config.normalized);

    Ok(graph.label_scores(scores))
}

fn local_on<N, S>(
    graph: &CompressedGraph<N>,
    groups: &[S],
    config: &BrokerageConfig,
) -> Result<HashMap<N, f64>>
where
    N: NodeId,
    for<'a> &'a S: IntoIterator<Item = &'a N>,
{
    let index = GroupIndex::build(graph, groups)?;
    log_start(Measure::Local, graph, &index, config);

    let weight = config.weight.as_deref();
    let run = |view: GraphView<'_>| {
        let raw = accumulate(&view, &index, Measure::Local, config.max_path_length);
        rescale_local(raw, &index, config.normalized)
    };

    let scores = if !graph.is_directed() {
        run(graph.view(weight))
    } else {
        match config.direction {
            Direction::Out => run(graph.view(weight)),
            Direction::In => run(graph.reversed_view(weight)),
            Direction::All => {
                let norm = if config.normalized { 2.0 } else { 1.0 };
                let outgoing = run(graph.view(weight));
                let incoming = run(graph.reversed_view(weight));
                outgoing
                    .into_iter()
                    .zip(incoming)
                    .map(|(out, inc)| (out + inc) / norm)
                    .collect()
            }
        }
    };

    Ok(graph.label_scores(scores))
}

fn log_start<N: NodeId>(
    measure: Measure,
    graph: &CompressedGraph<N>,
    index: &GroupIndex,
    config: &BrokerageConfig,
) {
    log::info!(
        "Computing {} brokerage: {} nodes, {} edges, {} groups",
        measure,
        graph.node_count(),
        graph.edge_count(),
        index.group_count()
    );
    log::debug!("Brokerage settings: {:?}", config);
}
