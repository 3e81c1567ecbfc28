//! Single-source shortest-path algorithms for dependency accumulation

use std::cmp::Reverse;
use std::collections::{BinaryHeap, VecDeque};

use crate::graph::GraphView;

/// Shortest-path structure rooted at one source node
#[derive(Debug, Clone)]
pub struct ShortestPaths {
    /// Reachable nodes in non-decreasing distance order, source first
    pub order: Vec<u32>,

    /// Immediate predecessors of each node on shortest paths from the source
    pub predecessors: Vec<Vec<u32>>,

    /// Number of shortest paths from the source; 0 for unreachable nodes
    pub sigma: Vec<f64>,
}

impl ShortestPaths {
    fn rooted_at(source: usize, node_count: usize) -> Self {
        let mut sigma = vec![0.0; node_count];
        sigma[source] = 1.0;

        Self {
            order: Vec::with_capacity(node_count),
            predecessors: vec![Vec::new(); node_count],
            sigma,
        }
    }
}

/// Shortest paths from `source`, by hop count or by the view's weights.
///
/// `max_path_length` bounds unweighted searches: nodes at that distance are
/// recorded but not expanded. Weighted searches ignore it.
pub fn single_source_shortest_paths(
    view: &GraphView<'_>,
    source: usize,
    max_path_length: Option<usize>,
) -> ShortestPaths {
    if view.is_weighted() {
        dijkstra_paths(view, source)
    } else {
        bfs_paths(view, source, max_path_length)
    }
}

/// Breadth-first search counting shortest paths
pub fn bfs_paths(
    view: &GraphView<'_>,
    source: usize,
    max_path_length: Option<usize>,
) -> ShortestPaths {
    let node_count = view.node_count();
    let mut paths = ShortestPaths::rooted_at(source, node_count);

    let mut dist: Vec<i64> = vec![-1; node_count];
    dist[source] = 0;

    let mut queue = VecDeque::with_capacity(node_count);
    queue.push_back(source);

    while let Some(v) = queue.pop_front() {
        paths.order.push(v as u32);
        let dist_v = dist[v];

        if let Some(limit) = max_path_length {
            if dist_v >= limit as i64 {
                continue;
            }
        }

        for &w in view.neighbors(v) {
            let w = w as usize;

            // Path discovery
            if dist[w] < 0 {
                dist[w] = dist_v + 1;
                queue.push_back(w);
            }

            // Path counting
            if dist[w] == dist_v + 1 {
                paths.sigma[w] += paths.sigma[v];
                paths.predecessors[w].push(v as u32);
            }
        }
    }

    paths
}

/// Dijkstra search counting shortest paths.
///
/// Weights must be non-negative. Equal distances are compared exactly; queue
/// ties are popped in push order.
pub fn dijkstra_paths(view: &GraphView<'_>, source: usize) -> ShortestPaths {
    let node_count = view.node_count();
    let mut paths = ShortestPaths::rooted_at(source, node_count);

    let mut dist = vec![f64::INFINITY; node_count];
    let mut settled = vec![false; node_count];
    dist[source] = 0.0;

    // Non-negative f64 bit patterns order like the values themselves
    let mut heap = BinaryHeap::new();
    let mut pushes: u64 = 0;
    heap.push(Reverse((0.0f64.to_bits(), pushes, source)));

    while let Some(Reverse((d_bits, _, v))) = heap.pop() {
        if settled[v] {
            continue;
        }
        settled[v] = true;
        paths.order.push(v as u32);

        let dist_v = f64::from_bits(d_bits);
        for (w, weight) in view.weighted_neighbors(v) {
            if settled[w] {
                continue;
            }

            let candidate = dist_v + weight;
            if candidate < dist[w] {
                dist[w] = candidate;
                paths.sigma[w] = paths.sigma[v];
                paths.predecessors[w].clear();
                paths.predecessors[w].push(v as u32);
                pushes += 1;
                heap.push(Reverse((candidate.to_bits(), pushes, w)));
            } else if candidate == dist[w] {
                paths.sigma[w] += paths.sigma[v];
                paths.predecessors[w].push(v as u32);
            }
        }
    }

    paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphBuilder;

    #[test]
    fn diamond_has_two_shortest_paths() {
        let mut builder = GraphBuilder::undirected();
        builder.add_edge("s", "a");
        builder.add_edge("s", "b");
        builder.add_edge("a", "t");
        builder.add_edge("b", "t");
        let graph = builder.build();

        let s = graph.index_of(&"s").unwrap();
        let t = graph.index_of(&"t").unwrap();
        let paths = single_source_shortest_paths(&graph.view(None), s, None);

        assert_eq!(paths.order.len(), 4);
        assert_eq!(paths.order[0] as usize, s);
        assert_eq!(*paths.order.last().unwrap() as usize, t);
        assert_eq!(paths.sigma[s], 1.0);
        assert_eq!(paths.sigma[t], 2.0);
        assert_eq!(paths.predecessors[t].len(), 2);
    }

    #[test]
    fn unreachable_nodes_are_left_out() {
        let mut builder = GraphBuilder::directed();
        builder.add_edge(1, 2);
        builder.add_node(3);
        let graph = builder.build();

        let two = graph.index_of(&2).unwrap();
        let three = graph.index_of(&3).unwrap();
        let paths = single_source_shortest_paths(&graph.view(None), two, None);

        assert_eq!(paths.order, vec![two as u32]);
        assert_eq!(paths.sigma[three], 0.0);
        assert_eq!(paths.sigma[graph.index_of(&1).unwrap()], 0.0);
    }

    #[test]
    fn cutoff_stops_expansion() {
        let mut builder = GraphBuilder::undirected();
        builder.add_edge(0, 1);
        builder.add_edge(1, 2);
        builder.add_edge(2, 3);
        let graph = builder.build();

        let paths = bfs_paths(&graph.view(None), 0, Some(2));

        assert_eq!(paths.order.len(), 3);
        assert!(!paths.order.contains(&(graph.index_of(&3).unwrap() as u32)));
    }

    #[test]
    fn dijkstra_prefers_light_detour() {
        let mut builder = GraphBuilder::undirected();
        builder.add_weighted_edge("a", "b", 5.0);
        builder.add_weighted_edge("a", "c", 1.0);
        builder.add_weighted_edge("c", "b", 1.0);
        let graph = builder.build();

        let a = graph.index_of(&"a").unwrap();
        let b = graph.index_of(&"b").unwrap();
        let c = graph.index_of(&"c").unwrap();
        let paths = single_source_shortest_paths(&graph.view(Some("weight")), a, None);

        assert_eq!(paths.order, vec![a as u32, c as u32, b as u32]);
        assert_eq!(paths.predecessors[b], vec![c as u32]);
        assert_eq!(paths.sigma[b], 1.0);
    }

    #[test]
    fn dijkstra_counts_equal_weight_paths() {
        let mut builder = GraphBuilder::undirected();
        builder.add_weighted_edge("a", "b", 1.0);
        builder.add_weighted_edge("b", "d", 2.0);
        builder.add_weighted_edge("a", "c", 2.0);
        builder.add_weighted_edge("c", "d", 1.0);
        let graph = builder.build();

        let a = graph.index_of(&"a").unwrap();
        let d = graph.index_of(&"d").unwrap();
        let paths = dijkstra_paths(&graph.view(Some("weight")), a);

        assert_eq!(paths.sigma[d], 2.0);
        assert_eq!(paths.predecessors[d].len(), 2);
    }

    #[test]
    fn sigma_is_sum_over_predecessors() {
        let mut builder = GraphBuilder::undirected();
        for (u, v) in [(0, 1), (0, 2), (1, 3), (2, 3), (3, 4), (1, 4), (4, 5), (2, 5)] {
            builder.add_edge(u, v);
        }
        let graph = builder.build();

        let paths = bfs_paths(&graph.view(None), 0, None);
        for &w in paths.order.iter().skip(1) {
            let w = w as usize;
            let total: f64 = paths.predecessors[w]
                .iter()
                .map(|&v| paths.sigma[v as usize])
                .sum();
            assert_eq!(paths.sigma[w], total);
        }
    }
}
