//! Normalization of raw brokerage totals

use itertools::Itertools;

use crate::groups::GroupIndex;

/// Divisor shared by the global and external measures.
///
/// Undirected paths are seen from both endpoints, so unnormalized scores are
/// halved. Normalized scores divide by 2 in every case, counting both
/// A -> B and B -> A for each unordered group pair.
pub fn base_factor(directed: bool, normalized: bool) -> f64 {
    if directed && !normalized {
        1.0
    } else {
        2.0
    }
}

fn divide_or_zero(value: f64, factor: f64) -> f64 {
    if factor == 0.0 {
        0.0
    } else {
        value / factor
    }
}

/// Rescale raw global totals.
///
/// The normalized divisor of node s is the number of shortest-path endpoint
/// pairs in different groups that exclude s.
pub fn rescale_global(
    raw: Vec<f64>,
    index: &GroupIndex,
    directed: bool,
    normalized: bool,
) -> Vec<f64> {
    let base = base_factor(directed, normalized);

    raw.into_iter()
        .enumerate()
        .map(|(s, score)| {
            let factor = if normalized {
                base * cross_pairs_without(index, s) as f64
            } else {
                base
            };
            divide_or_zero(score, factor)
        })
        .collect()
}

/// Σ over unordered group pairs (A, B) of |A\{s}|·|B\{s}| - |A∩B\{s}|
fn cross_pairs_without(index: &GroupIndex, s: usize) -> usize {
    (0..index.group_count())
        .tuple_combinations()
        .map(|(a, b)| {
            let in_a = index.contains(s, a) as usize;
            let in_b = index.contains(s, b) as usize;
            let size_a = index.group_size(a) - in_a;
            let size_b = index.group_size(b) - in_b;
            let shared = index.intersection_size(a, b) - in_a * in_b;
            size_a * size_b - shared
        })
        .sum()
}

/// Rescale raw local totals by the most paths a node of its own group's size
/// can broker: (|own| - 1) · (|V| - |own|)
pub fn rescale_local(raw: Vec<f64>, index: &GroupIndex, normalized: bool) -> Vec<f64> {
    if !normalized {
        return raw;
    }

    let node_count = index.node_count();
    raw.into_iter()
        .enumerate()
        .map(|(s, score)| {
            let own = index.group_size(index.own_group(s));
            let factor = ((own - 1) * (node_count - own)) as f64;
            divide_or_zero(score, factor)
        })
        .collect()
}

/// Rescale raw external totals.
///
/// The normalized divisor counts endpoint pairs between two groups that both
/// exclude s: Σ over such unordered pairs (A, B) of |A|·|B| - |A∩B|.
pub fn rescale_external(
    raw: Vec<f64>,
    index: &GroupIndex,
    directed: bool,
    normalized: bool,
) -> Vec<f64> {
    let base = base_factor(directed, normalized);

    raw.into_iter()
        .enumerate()
        .map(|(s, score)| {
            let factor = if normalized {
                base * external_pairs(index, s) as f64
            } else {
                base
            };
            divide_or_zero(score, factor)
        })
        .collect()
}

fn external_pairs(index: &GroupIndex, s: usize) -> usize {
    (0..index.group_count())
        .filter(|&group| !index.contains(s, group))
        .tuple_combinations()
        .map(|(a, b)| {
            index.group_size(a) * index.group_size(b) - index.intersection_size(a, b)
        })
        .sum()
}
