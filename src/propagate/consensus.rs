//! Consensus propagation: arithmetic opinion mixing over the argument tree.

use std::collections::{HashMap, HashSet};

use crate::diagram::{DiagramGraph, NodeKind};
use crate::stats::mean;
use crate::survey::NodeStatistic;

/// Bottom-up consensus scorer for one aggregation run.
///
/// For a goal with direct mean A and strategy children S_i (mean B_i, whose
/// goal children resolve to mean C_i), the score is
/// (A + mean(B_i × C_i)) / 2; a goal without a usable strategy keeps A. A
/// goal whose own consensus mean is absent scores absent outright, whatever
/// its descendants hold.
pub struct ConsensusPropagator<'a> {
    graph: &'a DiagramGraph,
    stats: &'a HashMap<String, NodeStatistic>,
    memo: HashMap<String, Option<f64>>,
}

impl<'a> ConsensusPropagator<'a> {
    pub fn new(graph: &'a DiagramGraph, stats: &'a HashMap<String, NodeStatistic>) -> Self {
        Self {
            graph,
            stats,
            memo: HashMap::new(),
        }
    }

    /// Consensus for one goal, starting a fresh path. Results are memoized
    /// for the lifetime of this propagator.
    pub fn score(&mut self, goal_id: &str) -> Option<f64> {
        self.walk(goal_id, &HashSet::new())
    }

    fn walk(&mut self, goal_id: &str, trail: &HashSet<String>) -> Option<f64> {
        if let Some(&cached) = self.memo.get(goal_id) {
            return cached;
        }
        let result = self.compute(goal_id, trail);
        self.memo.insert(goal_id.to_string(), result);
        result
    }

    fn compute(&mut self, goal_id: &str, trail: &HashSet<String>) -> Option<f64> {
        if trail.contains(goal_id) {
            return None;
        }
        // Missing direct rating disqualifies the goal outright.
        let direct = self.stats.get(goal_id).and_then(|s| s.consensus_mean)?;

        let graph = self.graph;
        let strategies: Vec<&str> = graph
            .children_of_kind(goal_id, NodeKind::Strategy)
            .filter(|s| !trail.contains(&s.id))
            .map(|s| s.id.as_str())
            .collect();
        if strategies.is_empty() {
            return Some(direct);
        }

        let mut bottoms: Vec<f64> = Vec::new();
        for strategy_id in strategies {
            let Some(strategy_mean) = self.stats.get(strategy_id).and_then(|s| s.consensus_mean)
            else {
                continue;
            };

            let mut extended = trail.clone();
            extended.insert(goal_id.to_string());
            extended.insert(strategy_id.to_string());

            let sub_ids: Vec<&str> = graph
                .children_of_kind(strategy_id, NodeKind::Goal)
                .map(|g| g.id.as_str())
                .collect();
            let sub_scores: Vec<f64> = sub_ids
                .into_iter()
                .filter_map(|sub_id| self.walk(sub_id, &extended))
                .collect();
            let Some(sub_mean) = mean(&sub_scores) else {
                continue;
            };
            bottoms.push(strategy_mean * sub_mean);
        }

        match mean(&bottoms) {
            Some(bottom) => Some((direct + bottom) / 2.0),
            None => Some(direct),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
