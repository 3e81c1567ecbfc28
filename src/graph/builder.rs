//! Graph construction module

use std::collections::HashMap;

use petgraph::visit::EdgeRef;

use crate::graph::compressed::{Adjacency, DEFAULT_EDGE_WEIGHT, DEFAULT_WEIGHT_KEY};
use crate::graph::{CompressedGraph, NodeId};

/// Builder for incrementally constructing a CompressedGraph
pub struct GraphBuilder<N> {
    directed: bool,

    /// Mapping from node identifiers to node indices
    id_to_index: HashMap<N, u32>,

    /// Node identifiers in insertion order
    node_ids: Vec<N>,

    /// Logical edges as (source, target) index pairs
    edges: Vec<(u32, u32)>,

    /// Edge endpoints to edge id; undirected keys are stored smaller index first
    edge_lookup: HashMap<(u32, u32), u32>,

    /// Weight columns indexed by edge id
    weights: HashMap<String, Vec<f64>>,
}

impl<N: NodeId> GraphBuilder<N> {
    /// Create a builder for an undirected graph
    pub fn undirected() -> Self {
        Self::with_capacity(false, 0)
    }

    /// Create a builder for a directed graph
    pub fn directed() -> Self {
        Self::with_capacity(true, 0)
    }

    /// Create a new graph builder with the given node capacity
    pub fn with_capacity(directed: bool, capacity: usize) -> Self {
        Self {
            directed,
            id_to_index: HashMap::with_capacity(capacity),
            node_ids: Vec::with_capacity(capacity),
            edges: Vec::new(),
            edge_lookup: HashMap::new(),
            weights: HashMap::new(),
        }
    }

    /// Copy a petgraph graph, reading each edge's weight with `weight`.
    ///
    /// Node weights become node identifiers, so nodes with equal weights merge.
    pub fn from_petgraph<E, Ty, Ix, F>(graph: &petgraph::Graph<N, E, Ty, Ix>, weight: F) -> Self
    where
        Ty: petgraph::EdgeType,
        Ix: petgraph::graph::IndexType,
        F: Fn(&E) -> f64,
    {
        let mut builder = Self::with_capacity(graph.is_directed(), graph.node_count());

        for node in graph.node_indices() {
            builder.add_node(graph[node].clone());
        }

        for edge in graph.edge_references() {
            let src = graph[edge.source()].clone();
            let dst = graph[edge.target()].clone();
            builder.add_weighted_edge(src, dst, weight(edge.weight()));
        }

        builder
    }

    pub fn node_count(&self) -> usize {
        self.node_ids.len()
    }

    /// Get or create the node index for the given identifier
    pub fn add_node(&mut self, id: N) -> u32 {
        if let Some(&idx) = self.id_to_index.get(&id) {
            return idx;
        }

        // Create a new node
        let idx = self.node_ids.len() as u32;
        self.id_to_index.insert(id.clone(), idx);
        self.node_ids.push(id);

        idx
    }

    /// Add an edge without attributes
    pub fn add_edge(&mut self, src: N, dst: N) -> u32 {
        self.add_edge_with_attrs(src, dst, &[])
    }

    /// Add an edge carrying a value in the default weight column
    pub fn add_weighted_edge(&mut self, src: N, dst: N, weight: f64) -> u32 {
        self.add_edge_with_attrs(src, dst, &[(DEFAULT_WEIGHT_KEY, weight)])
    }

    /// Add an edge with named numeric attributes and return its edge id.
    ///
    /// Adding an existing edge again keeps one edge and overwrites the
    /// attributes given here.
    pub fn add_edge_with_attrs(&mut self, src: N, dst: N, attrs: &[(&str, f64)]) -> u32 {
        let src_idx = self.add_node(src);
        let dst_idx = self.add_node(dst);

        let key = if self.directed || src_idx <= dst_idx {
            (src_idx, dst_idx)
        } else {
            (dst_idx, src_idx)
        };

        let edge_id = match self.edge_lookup.get(&key) {
            Some(&id) => id,
            None => {
                let id = self.edges.len() as u32;
                self.edges.push((src_idx, dst_idx));
                self.edge_lookup.insert(key, id);
                for column in self.weights.values_mut() {
                    column.push(DEFAULT_EDGE_WEIGHT);
                }
                id
            }
        };

        let edge_count = self.edges.len();
        for &(name, value) in attrs {
            let column = self
                .weights
                .entry(name.to_string())
                .or_insert_with(|| vec![DEFAULT_EDGE_WEIGHT; edge_count]);
            column[edge_id as usize] = value;
        }

        edge_id
    }

    /// Build the compressed graph
    pub fn build(self) -> CompressedGraph<N> {
        let node_count = self.node_ids.len();

        // Collect (neighbour, edge id) lists per node
        let mut outgoing_lists: Vec<Vec<(u32, u32)>> = vec![Vec::new(); node_count];
        let mut incoming_lists: Vec<Vec<(u32, u32)>> = if self.directed {
            vec![Vec::new(); node_count]
        } else {
            Vec::new()
        };

        for (id, &(src, dst)) in self.edges.iter().enumerate() {
            let id = id as u32;
            outgoing_lists[src as usize].push((dst, id));
            if self.directed {
                incoming_lists[dst as usize].push((src, id));
            } else if src != dst {
                outgoing_lists[dst as usize].push((src, id));
            }
        }

        let outgoing = compress(outgoing_lists);
        let incoming = if self.directed {
            Some(compress(incoming_lists))
        } else {
            None
        };

        let kind = if self.directed { "directed" } else { "undirected" };
        log::debug!(
            "Built {} graph with {} nodes and {} edges",
            kind,
            node_count,
            self.edges.len()
        );

        CompressedGraph {
            directed: self.directed,
            node_ids: self.node_ids,
            index: self.id_to_index,
            outgoing,
            incoming,
            edges: self.edges,
            weights: self.weights,
        }
    }
}

/// Flatten per-node lists into CSR arrays
fn compress(mut lists: Vec<Vec<(u32, u32)>>) -> Adjacency {
    let entry_count: usize = lists.iter().map(|list| list.len()).sum();

    // Create offsets array
    let mut offsets = Vec::with_capacity(lists.len() + 1);
    offsets.push(0);

    let mut offset = 0;
    for list in &lists {
        offset += list.len() as u32;
        offsets.push(offset);
    }

    // Create target and edge id arrays
    let mut targets = Vec::with_capacity(entry_count);
    let mut edge_ids = Vec::with_capacity(entry_count);
    for list in &mut lists {
        // Sort for binary search efficiency
        list.sort_unstable();
        for &(target, edge) in list.iter() {
            targets.push(target);
            edge_ids.push(edge);
        }
    }

    Adjacency {
        offsets,
        targets,
        edge_ids,
    }
}
