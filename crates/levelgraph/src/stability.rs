//! Vertex-cut resilience metrics.
//!
//! Every metric here is exhaustive: for an order `k` it removes each of the `C(|V|, k)` vertex
//! subsets from a private copy of the adjacency and checks whether the rest still hangs
//! together. Cost grows combinatorially, so keep `k` small (4 or less).
//!
//! Degenerate orders are defined rather than failing: an order of 0 or above the vertex count
//! has no subsets to remove and scores 1.0, and so does `stability_factor(0)`.

use crate::combinations::IndexCombinations;
use crate::config::AnalysisOptions;
use crate::graph::Graph;
use crate::graph::topology::Topology;
use serde::Serialize;
use std::time::Instant;
use tracing::debug;

#[derive(Debug, Clone, Copy)]
pub struct StabilityAnalyzer<'g> {
    topology: &'g Topology,
    parallel: bool,
}

impl<'g> StabilityAnalyzer<'g> {
    pub fn new(graph: &'g Graph) -> Self {
        Self {
            topology: graph.topology(),
            parallel: false,
        }
    }

    /// Run trials on the rayon pool. Has no effect unless built with the `parallel` feature.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    fn vertex_count(&self) -> usize {
        self.topology.vertex_count()
    }

    /// Vertex connectivity: the size of the smallest vertex set whose removal disconnects the
    /// graph.
    ///
    /// The smallest `k` in `1..|V|` for which some `k`-vertex removal leaves a disconnected
    /// remainder, or `|V|` when none does. A disconnected graph therefore scores 1, except two
    /// isolated vertices, which score 2.
    pub fn connectivity(&self) -> usize {
        let n = self.vertex_count();
        for k in 1..n {
            let mut subsets = IndexCombinations::new(n, k);
            while let Some(subset) = subsets.advance() {
                if !self.topology.without(subset).is_connected() {
                    debug!(connectivity = k, "found disconnecting cut");
                    return k;
                }
            }
        }
        n
    }

    /// Fraction of `order`-vertex subsets whose removal leaves the graph connected.
    pub fn cheeger_constant(&self, order: usize) -> f64 {
        let (total, disconnecting) = self.count_disconnecting(order);
        if total == 0 {
            return 1.0;
        }
        1.0 - disconnecting as f64 / total as f64
    }

    /// Cheeger constants for orders `1..=order`, weighted by `1 / i!` and averaged.
    pub fn stability_factor(&self, order: usize) -> f64 {
        let started = Instant::now();
        let values = self.cheeger_series(order);
        let factor = weighted_stability(&values);
        debug!(
            order,
            vertices = self.vertex_count(),
            factor,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "stability factor computed"
        );
        factor
    }

    /// `cheeger_constant(i)` for `i` in `1..=order`.
    pub fn cheeger_series(&self, order: usize) -> Vec<f64> {
        (1..=order).map(|i| self.cheeger_constant(i)).collect()
    }

    /// Returns `(subsets tried, subsets that disconnect)`.
    fn count_disconnecting(&self, order: usize) -> (u64, u64) {
        let n = self.vertex_count();
        if order == 0 || order > n {
            return (0, 0);
        }
        if self.parallel {
            #[cfg(feature = "parallel")]
            return self.count_disconnecting_parallel(n, order);
        }

        let mut subsets = IndexCombinations::new(n, order);
        let mut total = 0u64;
        let mut disconnecting = 0u64;
        while let Some(subset) = subsets.advance() {
            total += 1;
            if !self.topology.without(subset).is_connected() {
                disconnecting += 1;
            }
        }
        (total, disconnecting)
    }

    #[cfg(feature = "parallel")]
    fn count_disconnecting_parallel(&self, n: usize, order: usize) -> (u64, u64) {
        use rayon::prelude::*;

        let topology = self.topology;
        IndexCombinations::new(n, order)
            .par_bridge()
            .map(|subset| (1u64, u64::from(!topology.without(&subset).is_connected())))
            .reduce(|| (0, 0), |a, b| (a.0 + b.0, a.1 + b.1))
    }
}

/// `n!` as a float, computed iteratively.
pub fn factorial(n: usize) -> f64 {
    (2..=n).fold(1.0, |acc, i| acc * i as f64)
}

/// Weighted average of `values[i - 1]` with weight `1 / i!`; an empty series scores 1.0.
pub fn weighted_stability(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 1.0;
    }
    let mut top = 0.0;
    let mut bottom = 0.0;
    for (i, value) in values.iter().enumerate() {
        let weight = 1.0 / factorial(i + 1);
        top += weight * value;
        bottom += weight;
    }
    top / bottom
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CheegerEntry {
    pub order: usize,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StabilityReport {
    pub vertex_count: usize,
    pub edge_count: usize,
    pub connected: bool,
    pub connectivity: usize,
    pub cheeger: Vec<CheegerEntry>,
    pub stability_factor: f64,
}

/// Computes every metric once; the Cheeger series is shared with the stability factor.
pub fn analyze(graph: &Graph, options: &AnalysisOptions) -> StabilityReport {
    let analyzer = StabilityAnalyzer::new(graph).with_parallel(options.parallel);
    let started = Instant::now();
    let series = analyzer.cheeger_series(options.order);
    let report = StabilityReport {
        vertex_count: graph.vertex_count(),
        edge_count: graph.edge_count(),
        connected: graph.is_connected(),
        connectivity: analyzer.connectivity(),
        stability_factor: weighted_stability(&series),
        cheeger: series
            .into_iter()
            .enumerate()
            .map(|(i, value)| CheegerEntry {
                order: i + 1,
                value,
            })
            .collect(),
    };
    debug!(
        order = options.order,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "analysis finished"
    );
    report
}

impl Graph {
    /// See [`StabilityAnalyzer::connectivity`].
    pub fn connectivity(&self) -> usize {
        StabilityAnalyzer::new(self).connectivity()
    }

    /// See [`StabilityAnalyzer::cheeger_constant`].
    pub fn cheeger_constant(&self, order: usize) -> f64 {
        StabilityAnalyzer::new(self).cheeger_constant(order)
    }

    /// See [`StabilityAnalyzer::stability_factor`].
    pub fn stability_factor(&self, order: usize) -> f64 {
        StabilityAnalyzer::new(self).stability_factor(order)
    }
}
