//! Confidence propagation: precision-weighted fusion of expert estimates.

use std::collections::{HashMap, HashSet};

use crate::diagram::{DiagramGraph, NodeKind};
use crate::stats::{fuse_inverse_variance, product_of_independent};
use crate::survey::{ExpertStat, NodeStatistic};

/// Bottom-up confidence estimator for one aggregation run.
///
/// Structural mirror of the consensus propagator, with statistical
/// combination rules: for each rated strategy, the sub-goal estimates fuse
/// by inverse-variance weighting and propagate through the strategy's own
/// uncertain factor via the variance-of-a-product rule. The per-strategy
/// candidates then combine by plain unweighted averaging of means and of
/// variances; a goal with no usable strategy keeps its direct expert
/// statistic, absent or not.
pub struct ConfidencePropagator<'a> {
    graph: &'a DiagramGraph,
    stats: &'a HashMap<String, NodeStatistic>,
    memo: HashMap<String, Option<ExpertStat>>,
}

impl<'a> ConfidencePropagator<'a> {
    pub fn new(graph: &'a DiagramGraph, stats: &'a HashMap<String, NodeStatistic>) -> Self {
        Self {
            graph,
            stats,
            memo: HashMap::new(),
        }
    }

    /// Confidence for one goal, starting a fresh path. Results are memoized
    /// for the lifetime of this propagator.
    pub fn estimate(&mut self, goal_id: &str) -> Option<ExpertStat> {
        self.walk(goal_id, &HashSet::new())
    }

    fn walk(&mut self, goal_id: &str, trail: &HashSet<String>) -> Option<ExpertStat> {
        if let Some(&cached) = self.memo.get(goal_id) {
            return cached;
        }
        let result = self.compute(goal_id, trail);
        self.memo.insert(goal_id.to_string(), result);
        result
    }

    fn compute(&mut self, goal_id: &str, trail: &HashSet<String>) -> Option<ExpertStat> {
        if trail.contains(goal_id) {
            return None;
        }
        let direct = self.stats.get(goal_id).and_then(|s| s.expert);

        let graph = self.graph;
        let strategies: Vec<&str> = graph
            .children_of_kind(goal_id, NodeKind::Strategy)
            .filter(|s| !trail.contains(&s.id))
            .map(|s| s.id.as_str())
            .collect();
        if strategies.is_empty() {
            return direct;
        }

        let mut candidates: Vec<ExpertStat> = Vec::new();
        for strategy_id in strategies {
            let Some(branch) = self.stats.get(strategy_id).and_then(|s| s.expert) else {
                continue;
            };

            let mut extended = trail.clone();
            extended.insert(goal_id.to_string());
            extended.insert(strategy_id.to_string());

            let sub_ids: Vec<&str> = graph
                .children_of_kind(strategy_id, NodeKind::Goal)
                .map(|g| g.id.as_str())
                .collect();
            let sub_estimates: Vec<(f64, f64)> = sub_ids
                .into_iter()
                .filter_map(|sub_id| self.walk(sub_id, &extended))
                .map(|e| (e.mean, e.variance))
                .collect();
            let Some((fused_mean, fused_variance)) = fuse_inverse_variance(&sub_estimates)
            else {
                continue;
            };

            let (mean, variance) =
                product_of_independent(fused_mean, fused_variance, branch.mean, branch.variance);
            candidates.push(ExpertStat { mean, variance });
        }

        if candidates.is_empty() {
            return direct;
        }
        // Deliberately plain averaging here, not a second precision-weighted
        // fusion: strategies are alternative argument lines, not repeated
        // measurements of one quantity.
        let n = candidates.len() as f64;
        Some(ExpertStat {
            mean: candidates.iter().map(|c| c.mean).sum::<f64>() / n,
            variance: candidates.iter().map(|c| c.variance).sum::<f64>() / n,
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================
