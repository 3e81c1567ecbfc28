//! Brandes-style dependency accumulation with group-pair bookkeeping

use rayon::prelude::*;

use crate::config::Measure;
use crate::graph::algorithms::{single_source_shortest_paths, ShortestPaths};
use crate::graph::GraphView;
use crate::groups::GroupIndex;

/// Graphs with fewer nodes are swept on the calling thread
pub const PARALLEL_THRESHOLD: usize = 1000;

/// Raw brokerage totals per node index, summed over every source node
pub fn accumulate(
    view: &GraphView<'_>,
    index: &GroupIndex,
    measure: Measure,
    max_path_length: Option<usize>,
) -> Vec<f64> {
    let parallel = view.node_count() >= PARALLEL_THRESHOLD;
    accumulate_sources(view, index, measure, max_path_length, parallel)
}

pub(crate) fn accumulate_sources(
    view: &GraphView<'_>,
    index: &GroupIndex,
    measure: Measure,
    max_path_length: Option<usize>,
    parallel: bool,
) -> Vec<f64> {
    let node_count = view.node_count();
    log::debug!(
        "Accumulating {} brokerage over {} sources ({})",
        measure,
        node_count,
        if parallel { "parallel" } else { "sequential" }
    );

    if !parallel {
        let mut totals = vec![0.0; node_count];
        for source in 0..node_count {
            accumulate_source(view, index, measure, max_path_length, source, &mut totals);
        }
        return totals;
    }

    // Per-worker partial totals, summed at the end
    (0..node_count)
        .into_par_iter()
        .fold(
            || vec![0.0; node_count],
            |mut totals, source| {
                accumulate_source(view, index, measure, max_path_length, source, &mut totals);
                totals
            },
        )
        .reduce(
            || vec![0.0; node_count],
            |mut a, b| {
                for (x, y) in a.iter_mut().zip(b.iter()) {
                    *x += y;
                }
                a
            },
        )
}

fn accumulate_source(
    view: &GraphView<'_>,
    index: &GroupIndex,
    measure: Measure,
    max_path_length: Option<usize>,
    source: usize,
    totals: &mut [f64],
) {
    let paths = single_source_shortest_paths(view, source, max_path_length);
    match measure {
        Measure::Global => sweep_crossing(&paths, index, source, false, totals),
        Measure::Local => sweep_crossing(&paths, index, source, true, totals),
        Measure::External => sweep_external(&paths, index, source, totals),
    }
}

/// Backward sweep injecting, at each node w, the number of distinct group
/// pairs the path source -> w connects.
///
/// With `own_group_only`, a node only collects dependency from sources that
/// share one of its groups.
fn sweep_crossing(
    paths: &ShortestPaths,
    index: &GroupIndex,
    source: usize,
    own_group_only: bool,
    totals: &mut [f64],
) {
    let mut delta = vec![0.0; paths.sigma.len()];

    for &w in paths.order.iter().rev() {
        let w = w as usize;
        let crossing = index.crossing_pairs(source, w);
        let delta_w = delta[w];
        let coeff = (crossing as f64 + delta_w) / paths.sigma[w];

        for &v in &paths.predecessors[w] {
            let v = v as usize;
            delta[v] += paths.sigma[v] * coeff;
        }

        if w != source && (!own_group_only || crossing == 0) {
            totals[w] += delta_w;
        }
    }
}

/// Backward sweep keeping one dependency per target group, so each node can
/// count only the group pairs that exclude it
fn sweep_external(
    paths: &ShortestPaths,
    index: &GroupIndex,
    source: usize,
    totals: &mut [f64],
) {
    let group_count = index.group_count();
    let mut delta = vec![0.0; paths.sigma.len() * group_count];
    let mut carried = vec![0.0; group_count];

    for &w in paths.order.iter().rev() {
        let w = w as usize;
        let row = w * group_count..(w + 1) * group_count;

        // Dependency of w plus w itself as a target in each of its groups
        carried.copy_from_slice(&delta[row.clone()]);
        for &group in index.groups_of(w) {
            carried[group as usize] += 1.0;
        }

        for &v in &paths.predecessors[w] {
            let v = v as usize;
            let ratio = paths.sigma[v] / paths.sigma[w];
            let v_row = &mut delta[v * group_count..(v + 1) * group_count];
            for (d, c) in v_row.iter_mut().zip(&carried) {
                *d += ratio * c;
            }
        }

        if w == source {
            continue;
        }

        let w_delta = &delta[row];
        for &a in index.groups_of(source) {
            let a = a as usize;
            if index.contains(w, a) {
                continue;
            }
            for (b, &dependency) in w_delta.iter().enumerate() {
                if b != a && !index.contains(w, b) {
                    totals[w] += dependency;
                }
            }
        }
    }
}
