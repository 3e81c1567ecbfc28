//! Memory-efficient graph representation

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::mem;

/// Identifier types usable as graph nodes
pub trait NodeId: Clone + Eq + Hash + Debug + Send + Sync {}

impl<T> NodeId for T where T: Clone + Eq + Hash + Debug + Send + Sync {}

/// Edge attribute read when a caller asks for "the" weight
pub const DEFAULT_WEIGHT_KEY: &str = "weight";

/// Value of a weight column for edges that never set it
pub const DEFAULT_EDGE_WEIGHT: f64 = 1.0;

/// Compressed sparse row adjacency
#[derive(Debug, Clone, Default)]
pub struct Adjacency {
    /// Offset array: index where each node's edges begin
    /// offsets[i] to offsets[i+1] defines the edge range for node i
    pub offsets: Vec<u32>,

    /// Edge array: concatenated lists of neighbour nodes
    pub targets: Vec<u32>,

    /// Logical edge id of each entry in `targets`, used to look up weights
    pub edge_ids: Vec<u32>,
}

impl Adjacency {
    /// Neighbours of a node
    pub fn neighbors(&self, node: usize) -> &[u32] {
        let start = self.offsets[node] as usize;
        let end = self.offsets[node + 1] as usize;
        &self.targets[start..end]
    }

    /// Logical edge ids aligned with [`Adjacency::neighbors`]
    pub fn edge_ids(&self, node: usize) -> &[u32] {
        let start = self.offsets[node] as usize;
        let end = self.offsets[node + 1] as usize;
        &self.edge_ids[start..end]
    }

    fn memory_usage(&self) -> usize {
        let offsets = self.offsets.capacity() * mem::size_of::<u32>();
        let targets = self.targets.capacity() * mem::size_of::<u32>();
        let edge_ids = self.edge_ids.capacity() * mem::size_of::<u32>();

        offsets + targets + edge_ids
    }
}

/// Compressed sparse representation of a directed or undirected graph.
///
/// Undirected edges are stored in both endpoints' adjacency lists under the
/// same logical edge id. Directed graphs additionally keep the transposed
/// adjacency, so a reversed view costs nothing to create.
#[derive(Debug, Clone)]
pub struct CompressedGraph<N> {
    pub(crate) directed: bool,

    /// Node identifiers, indexed by internal node index
    pub(crate) node_ids: Vec<N>,

    /// Identifier to internal index
    pub(crate) index: HashMap<N, u32>,

    pub(crate) outgoing: Adjacency,

    /// Transposed adjacency; `None` for undirected graphs
    pub(crate) incoming: Option<Adjacency>,

    /// Logical edges as (source, target) index pairs
    pub(crate) edges: Vec<(u32, u32)>,

    /// Per-edge numeric attributes, one column per key, indexed by edge id
    pub(crate) weights: HashMap<String, Vec<f64>>,
}

impl<N: NodeId> CompressedGraph<N> {
    /// Number of nodes in the graph
    pub fn node_count(&self) -> usize {
        self.node_ids.len()
    }

    /// Number of logical edges (an undirected edge counts once)
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_directed(&self) -> bool {
        self.directed
    }

    /// Node identifiers in index order
    pub fn node_ids(&self) -> &[N] {
        &self.node_ids
    }

    pub fn node_id(&self, node: usize) -> &N {
        &self.node_ids[node]
    }

    /// Internal index of a node identifier
    pub fn index_of(&self, id: &N) -> Option<usize> {
        self.index.get(id).map(|&idx| idx as usize)
    }

    /// Logical edges as (source index, target index, edge id)
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize, usize)> + '_ {
        self.edges
            .iter()
            .enumerate()
            .map(|(id, &(src, dst))| (src as usize, dst as usize, id))
    }

    /// Names of the stored weight columns
    pub fn weight_keys(&self) -> impl Iterator<Item = &str> {
        self.weights.keys().map(String::as_str)
    }

    /// Weight column indexed by edge id
    pub fn edge_weights(&self, key: &str) -> Option<&[f64]> {
        self.weights.get(key).map(Vec::as_slice)
    }

    /// Traversal view following edge direction.
    ///
    /// With `weight` set, neighbours carry that column's values; a key no
    /// edge carries gives every edge the default weight, which is the same
    /// as hop counting.
    pub fn view(&self, weight: Option<&str>) -> GraphView<'_> {
        GraphView {
            adjacency: &self.outgoing,
            weights: self.weight_column(weight),
            node_count: self.node_count(),
        }
    }

    /// Traversal view with every edge flipped. Same as [`CompressedGraph::view`]
    /// for undirected graphs.
    pub fn reversed_view(&self, weight: Option<&str>) -> GraphView<'_> {
        GraphView {
            adjacency: self.incoming.as_ref().unwrap_or(&self.outgoing),
            weights: self.weight_column(weight),
            node_count: self.node_count(),
        }
    }

    fn weight_column(&self, weight: Option<&str>) -> Option<&[f64]> {
        let key = weight?;
        let column = self.edge_weights(key);
        if column.is_none() && !self.edges.is_empty() {
            log::warn!("No edge carries weight '{}'; using unit weights", key);
        }
        column
    }

    /// Pair per-index scores with node identifiers
    pub fn label_scores(&self, scores: Vec<f64>) -> HashMap<N, f64> {
        self.node_ids.iter().cloned().zip(scores).collect()
    }

    /// Estimate memory usage in bytes (identifiers counted by their inline size)
    pub fn memory_usage(&self) -> usize {
        let base = mem::size_of::<Self>();
        let ids = self.node_ids.capacity() * mem::size_of::<N>();
        let index = self.index.capacity() * (mem::size_of::<N>() + mem::size_of::<u32>());
        let adjacency = self.outgoing.memory_usage()
            + self.incoming.as_ref().map_or(0, Adjacency::memory_usage);
        let edges = self.edges.capacity() * mem::size_of::<(u32, u32)>();
        let weights = self
            .weights
            .values()
            .map(|column| column.capacity() * mem::size_of::<f64>())
            .sum::<usize>();

        base + ids + index + adjacency + edges + weights
    }
}

/// Read-only traversal view over one adjacency orientation
#[derive(Debug, Clone, Copy)]
pub struct GraphView<'a> {
    adjacency: &'a Adjacency,
    weights: Option<&'a [f64]>,
    node_count: usize,
}

impl<'a> GraphView<'a> {
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// Whether distances come from a weight column rather than hop counts
    pub fn is_weighted(&self) -> bool {
        self.weights.is_some()
    }

    pub fn neighbors(&self, node: usize) -> &'a [u32] {
        self.adjacency.neighbors(node)
    }

    /// Neighbours with the weight of the connecting edge
    pub fn weighted_neighbors(&self, node: usize) -> impl Iterator<Item = (usize, f64)> + 'a {
        let weights = self.weights;
        self.adjacency
            .neighbors(node)
            .iter()
            .zip(self.adjacency.edge_ids(node))
            .map(move |(&target, &edge)| {
                let weight = weights.map_or(DEFAULT_EDGE_WEIGHT, |column| column[edge as usize]);
                (target as usize, weight)
            })
    }
}

#[cfg(test)]
mod tests {
    use crate::graph::GraphBuilder;

    #[test]
    fn undirected_edges_are_stored_once_and_seen_from_both_ends() {
        let mut builder = GraphBuilder::undirected();
        builder.add_edge("a", "b");
        builder.add_edge("b", "c");
        builder.add_edge("b", "a");
        let graph = builder.build();

        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 2);
        let a = graph.index_of(&"a").unwrap() as u32;
        let b = graph.index_of(&"b").unwrap();
        let c = graph.index_of(&"c").unwrap() as u32;
        assert_eq!(graph.view(None).neighbors(b), &[a, c]);
        assert_eq!(graph.reversed_view(None).neighbors(b), &[a, c]);
    }

    #[test]
    fn reversed_view_flips_directed_edges() {
        let mut builder = GraphBuilder::directed();
        builder.add_edge(1, 2);
        builder.add_edge(2, 3);
        let graph = builder.build();

        let one = graph.index_of(&1).unwrap();
        let two = graph.index_of(&2).unwrap();
        let forward = graph.view(None);
        let backward = graph.reversed_view(None);

        assert_eq!(forward.neighbors(one), &[two as u32]);
        assert!(backward.neighbors(one).is_empty());
        assert_eq!(backward.neighbors(two), &[one as u32]);
        assert!(!forward.neighbors(two).contains(&(one as u32)));
    }

    #[test]
    fn missing_weights_default_to_one() {
        let mut builder = GraphBuilder::undirected();
        builder.add_weighted_edge("a", "b", 3.0);
        builder.add_edge("b", "c");
        let graph = builder.build();

        let b = graph.index_of(&"b").unwrap();
        let c = graph.index_of(&"c").unwrap();
        let view = graph.view(Some("weight"));
        assert!(view.is_weighted());
        let weights: Vec<(usize, f64)> = view.weighted_neighbors(b).collect();
        assert!(weights.contains(&(c, 1.0)));
        assert!(weights.contains(&(graph.index_of(&"a").unwrap(), 3.0)));
    }

    #[test]
    fn unknown_weight_key_gives_unweighted_view() {
        let mut builder = GraphBuilder::undirected();
        builder.add_weighted_edge("a", "b", 3.0);
        let graph = builder.build();

        assert!(!graph.view(Some("capacity")).is_weighted());
        assert!(!graph.view(None).is_weighted());
    }

    #[test]
    fn repeated_edge_overwrites_attributes() {
        let mut builder = GraphBuilder::undirected();
        builder.add_weighted_edge("a", "b", 3.0);
        builder.add_weighted_edge("b", "a", 5.0);
        let graph = builder.build();

        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.edge_weights("weight"), Some(&[5.0][..]));
    }

    #[test]
    fn labels_scores_in_node_order() {
        let mut builder = GraphBuilder::undirected();
        builder.add_edge("x", "y");
        let graph = builder.build();

        let scores = graph.label_scores(vec![0.25, 0.75]);
        assert_eq!(scores[&"x"], 0.25);
        assert_eq!(scores[&"y"], 0.75);
        assert!(graph.memory_usage() > 0);
    }
}
