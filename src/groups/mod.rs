//! Node groups and group membership lookup

pub mod decouple;

use std::collections::HashSet;
use std::hash::Hash;

use itertools::Itertools;

use crate::error::{Result, ValidationError};
use crate::graph::{CompressedGraph, NodeId};

pub use decouple::{aggregate, decouple};

/// Membership of every graph node, by group position in the grouping
#[derive(Debug, Clone)]
pub struct GroupIndex {
    /// Sorted group indices per node index
    memberships: Vec<Vec<u32>>,

    /// Number of distinct members per group
    sizes: Vec<usize>,

    /// Pairwise intersection sizes, `intersections[a][b] == intersections[b][a]`
    intersections: Vec<Vec<usize>>,
}

impl GroupIndex {
    /// Index a grouping against the graph's node set.
    ///
    /// Every group member must be a graph node and every graph node must be in
    /// at least one group. Repeated members of one group count once.
    pub fn build<N, S>(graph: &CompressedGraph<N>, groups: &[S]) -> Result<Self>
    where
        N: NodeId,
        for<'a> &'a S: IntoIterator<Item = &'a N>,
    {
        let node_count = graph.node_count();
        let mut memberships: Vec<Vec<u32>> = vec![Vec::new(); node_count];
        let mut sizes = Vec::with_capacity(groups.len());

        for (group, members) in groups.iter().enumerate() {
            let mut size = 0;
            for id in members {
                let node = graph
                    .index_of(id)
                    .ok_or_else(|| ValidationError::UnknownNode {
                        group,
                        node: format!("{:?}", id),
                    })?;

                // Groups are visited in order, so a repeat shows up last
                let node_groups = &mut memberships[node];
                if node_groups.last() == Some(&(group as u32)) {
                    continue;
                }
                node_groups.push(group as u32);
                size += 1;
            }

            if size == 0 {
                return Err(ValidationError::EmptyGroup { group });
            }
            sizes.push(size);
        }

        if let Some(node) = memberships.iter().position(|groups| groups.is_empty()) {
            return Err(ValidationError::UngroupedNode {
                node: format!("{:?}", graph.node_id(node)),
            });
        }

        let group_count = sizes.len();
        let mut intersections = vec![vec![0usize; group_count]; group_count];
        for node_groups in &memberships {
            for (&a, &b) in node_groups.iter().tuple_combinations() {
                intersections[a as usize][b as usize] += 1;
                intersections[b as usize][a as usize] += 1;
            }
        }

        let shared = memberships.iter().filter(|groups| groups.len() > 1).count();
        log::debug!(
            "Indexed {} groups over {} nodes ({} in more than one group)",
            group_count,
            node_count,
            shared
        );

        Ok(Self {
            memberships,
            sizes,
            intersections,
        })
    }

    pub fn node_count(&self) -> usize {
        self.memberships.len()
    }

    pub fn group_count(&self) -> usize {
        self.sizes.len()
    }

    /// Groups containing a node, ascending
    pub fn groups_of(&self, node: usize) -> &[u32] {
        &self.memberships[node]
    }

    pub fn contains(&self, node: usize, group: usize) -> bool {
        self.memberships[node].binary_search(&(group as u32)).is_ok()
    }

    pub fn group_size(&self, group: usize) -> usize {
        self.sizes[group]
    }

    /// Number of nodes shared by two groups
    pub fn intersection_size(&self, a: usize, b: usize) -> usize {
        if a == b {
            self.sizes[a]
        } else {
            self.intersections[a][b]
        }
    }

    /// Lowest-indexed group containing a node
    pub fn own_group(&self, node: usize) -> usize {
        self.memberships[node][0] as usize
    }

    /// Number of ordered group pairs (A, B), A != B, with `s` in A and `w` in B
    pub fn crossing_pairs(&self, s: usize, w: usize) -> usize {
        let s_groups = &self.memberships[s];
        let w_groups = &self.memberships[w];
        s_groups.len() * w_groups.len() - count_common(s_groups, w_groups)
    }
}

/// Size of the intersection of two ascending slices
fn count_common(a: &[u32], b: &[u32]) -> usize {
    let (mut i, mut j, mut common) = (0, 0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                common += 1;
                i += 1;
                j += 1;
            }
        }
    }
    common
}

/// Whether any node is listed in more than one group.
///
/// True iff the summed group sizes exceed the size of their union.
pub fn groups_overlap<N, S>(groups: &[S]) -> bool
where
    N: Eq + Hash,
    for<'a> &'a S: IntoIterator<Item = &'a N>,
{
    let mut union: HashSet<&N> = HashSet::new();
    let mut total = 0;

    for members in groups {
        let distinct: HashSet<&N> = members.into_iter().collect();
        total += distinct.len();
        union.extend(distinct);
    }

    total > union.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphBuilder;

    fn path_graph(n: u32) -> CompressedGraph<u32> {
        let mut builder = GraphBuilder::undirected();
        for i in 1..n {
            builder.add_edge(i - 1, i);
        }
        builder.build()
    }

    #[test]
    fn indexes_disjoint_groups() {
        let graph = path_graph(5);
        let groups = vec![vec![0, 2], vec![1], vec![3, 4]];
        let index = GroupIndex::build(&graph, &groups).unwrap();

        assert_eq!(index.group_count(), 3);
        assert_eq!(index.groups_of(graph.index_of(&2).unwrap()), &[0]);
        assert_eq!(index.group_size(2), 2);
        assert!(!groups_overlap(&groups));
        assert_eq!(index.intersection_size(0, 2), 0);
    }

    #[test]
    fn crossing_pairs_counts_distinct_group_pairs() {
        let graph = path_graph(4);
        let groups = vec![vec![0, 1, 2], vec![1, 2, 3], vec![3]];
        let index = GroupIndex::build(&graph, &groups).unwrap();

        // 0 in {0}, 1 in {0,1}, 3 in {1,2}
        assert_eq!(index.crossing_pairs(0, 1), 1);
        assert_eq!(index.crossing_pairs(1, 2), 2);
        assert_eq!(index.crossing_pairs(1, 3), 3);
        assert_eq!(index.crossing_pairs(0, 0), 0);
        assert_eq!(index.intersection_size(0, 1), 2);
        assert!(groups_overlap(&groups));
    }

    #[test]
    fn rejects_node_missing_from_graph() {
        let graph = path_graph(2);
        let groups = vec![vec![0], vec![1, 7]];
        let err = GroupIndex::build(&graph, &groups).unwrap_err();

        assert_eq!(
            err,
            ValidationError::UnknownNode {
                group: 1,
                node: "7".to_string()
            }
        );
    }

    #[test]
    fn rejects_ungrouped_node() {
        let graph = path_graph(3);
        let groups = vec![vec![0], vec![1]];
        let err = GroupIndex::build(&graph, &groups).unwrap_err();

        assert_eq!(
            err,
            ValidationError::UngroupedNode {
                node: "2".to_string()
            }
        );
    }

    #[test]
    fn rejects_empty_group() {
        let graph = path_graph(2);
        let groups: Vec<Vec<u32>> = vec![vec![0, 1], vec![]];

        assert_eq!(
            GroupIndex::build(&graph, &groups).unwrap_err(),
            ValidationError::EmptyGroup { group: 1 }
        );
    }

    #[test]
    fn repeated_members_count_once() {
        let graph = path_graph(3);
        let groups = vec![vec![0, 0, 1], vec![2]];
        let index = GroupIndex::build(&graph, &groups).unwrap();

        assert_eq!(index.group_size(0), 2);
        assert!(!groups_overlap(&groups));
    }

    #[test]
    fn overlap_detection_uses_sizes_against_union() {
        let disjoint = vec![HashSet::from(["a", "b"]), HashSet::from(["c"])];
        let shared = vec![HashSet::from(["a", "b"]), HashSet::from(["b", "c"])];

        assert!(!groups_overlap(&disjoint));
        assert!(groups_overlap(&shared));
    }

    #[test]
    fn common_count_on_sorted_slices() {
        assert_eq!(count_common(&[0, 2, 5], &[1, 2, 5, 7]), 2);
        assert_eq!(count_common(&[], &[1]), 0);
    }
}
