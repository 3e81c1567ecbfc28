//! Reduce overlapping groups to disjoint ones by cloning shared nodes

use std::collections::HashMap;

use itertools::Itertools;

use crate::error::Result;
use crate::graph::compressed::DEFAULT_EDGE_WEIGHT;
use crate::graph::{CompressedGraph, GraphBuilder, NodeId};
use crate::groups::GroupIndex;

/// A node copy dedicated to one group: (original node, group index)
pub type CloneId<N> = (N, usize);

/// Rewrite a graph with overlapping groups into one with disjoint groups.
///
/// Node `n` in groups `i1..ik` becomes clones `(n, i1)..(n, ik)`. Clones of
/// one node are linked to each other, and every edge `(u, v)` is copied
/// between every clone of `u` and every clone of `v` with the same weights.
/// Decoupled group `i` holds exactly the clones `(n, i)`.
///
/// In each weight column a clone link weighs the smallest positive weight of
/// that column, so with positive weights a link is never part of a shortest
/// path between two other nodes and is always the shortest way between the
/// two clones it joins.
pub fn decouple<N, S>(
    graph: &CompressedGraph<N>,
    groups: &[S],
) -> Result<(CompressedGraph<CloneId<N>>, Vec<Vec<CloneId<N>>>)>
where
    N: NodeId,
    for<'a> &'a S: IntoIterator<Item = &'a N>,
{
    let index = GroupIndex::build(graph, groups)?;
    let node_count = graph.node_count();
    let clone_count: usize = (0..node_count)
        .map(|node| index.groups_of(node).len())
        .sum();

    log::info!(
        "Decoupling {} nodes in {} overlapping groups into {} clones",
        node_count,
        index.group_count(),
        clone_count
    );

    let mut builder = GraphBuilder::with_capacity(graph.is_directed(), clone_count);
    let mut decoupled_groups: Vec<Vec<CloneId<N>>> = vec![Vec::new(); index.group_count()];

    // One clone per membership, isolated nodes included
    for node in 0..node_count {
        for &group in index.groups_of(node) {
            let clone = (graph.node_id(node).clone(), group as usize);
            builder.add_node(clone.clone());
            decoupled_groups[group as usize].push(clone);
        }
    }

    let mut keys: Vec<&str> = graph.weight_keys().collect();
    keys.sort_unstable();

    // Replicate every edge between all clone combinations
    let mut attrs: Vec<(&str, f64)> = Vec::with_capacity(keys.len());
    for (src, dst, edge) in graph.edges() {
        attrs.clear();
        for &key in &keys {
            let weight = graph
                .edge_weights(key)
                .map_or(DEFAULT_EDGE_WEIGHT, |column| column[edge]);
            attrs.push((key, weight));
        }

        for &i in index.groups_of(src) {
            for &j in index.groups_of(dst) {
                builder.add_edge_with_attrs(
                    (graph.node_id(src).clone(), i as usize),
                    (graph.node_id(dst).clone(), j as usize),
                    &attrs,
                );
            }
        }
    }

    // Link the clones of each node; added last so links win over self-loop copies
    let link_attrs: Vec<(&str, f64)> = keys
        .iter()
        .map(|&key| {
            let weights = graph.edge_weights(key).unwrap_or(&[]);
            (key, clone_link_weight(weights))
        })
        .collect();

    for node in 0..node_count {
        let id = graph.node_id(node);
        for (&first, &second) in index.groups_of(node).iter().tuple_combinations() {
            let a = (id.clone(), first as usize);
            let b = (id.clone(), second as usize);
            builder.add_edge_with_attrs(a.clone(), b.clone(), &link_attrs);
            if graph.is_directed() {
                builder.add_edge_with_attrs(b, a, &link_attrs);
            }
        }
    }

    Ok((builder.build(), decoupled_groups))
}

/// Smallest strictly positive weight of a column, or the default weight
fn clone_link_weight(column: &[f64]) -> f64 {
    let lightest = column
        .iter()
        .copied()
        .filter(|&weight| weight > 0.0)
        .fold(f64::INFINITY, f64::min);

    if lightest.is_finite() {
        lightest
    } else {
        DEFAULT_EDGE_WEIGHT
    }
}

/// Sum clone scores back into one score per original node
pub fn aggregate<N: NodeId>(scores: HashMap<CloneId<N>, f64>) -> HashMap<N, f64> {
    let mut totals: HashMap<N, f64> = HashMap::with_capacity(scores.len());
    for ((node, _), score) in scores {
        *totals.entry(node).or_insert(0.0) += score;
    }
    totals
}
