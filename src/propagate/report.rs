//! Root selection and headline aggregates for one assessment run.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::diagram::{DiagramGraph, NodeKind};
use crate::survey::{ExpertStat, NodeStatistic};

use super::{ConfidencePropagator, ConsensusPropagator};

/// Everything one aggregation run produces for display.
///
/// Goals carry propagated values, strategies their raw direct statistics.
/// Absent entries are kept in the maps (serialized as nulls) so tabular UIs
/// can render "no data" rows without re-deriving node lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramAssessment {
    /// Mean consensus over root goals that resolve; absent when none do.
    pub aggregate_consensus: Option<f64>,
    /// Averaged (mean, variance) over root goals that resolve.
    pub aggregate_confidence: Option<ExpertStat>,
    /// Goal ids to propagated consensus, strategy ids to raw consensus mean.
    pub consensus_by_node: BTreeMap<String, Option<f64>>,
    /// Goal ids to propagated confidence, strategy ids to raw expert stat.
    pub confidence_by_node: BTreeMap<String, Option<ExpertStat>>,
}

/// Run both propagators over a prepared graph + statistics table.
///
/// One propagator (and thus one memo) of each kind serves the root sweep
/// and the per-node sweep, so a node resolves to the same value wherever it
/// is reached within the run.
pub fn assess(graph: &DiagramGraph, stats: &HashMap<String, NodeStatistic>) -> DiagramAssessment {
    let mut consensus = ConsensusPropagator::new(graph, stats);
    let mut confidence = ConfidencePropagator::new(graph, stats);

    let mut root_consensus: Vec<f64> = Vec::new();
    let mut root_confidence: Vec<ExpertStat> = Vec::new();
    let root_ids: Vec<&str> = graph.root_goals().map(|n| n.id.as_str()).collect();
    for root_id in &root_ids {
        if let Some(score) = consensus.score(root_id) {
            root_consensus.push(score);
        }
        if let Some(est) = confidence.estimate(root_id) {
            root_confidence.push(est);
        }
    }

    let aggregate_consensus = if root_consensus.is_empty() {
        None
    } else {
        Some(root_consensus.iter().sum::<f64>() / root_consensus.len() as f64)
    };
    let aggregate_confidence = if root_confidence.is_empty() {
        None
    } else {
        let n = root_confidence.len() as f64;
        Some(ExpertStat {
            mean: root_confidence.iter().map(|e| e.mean).sum::<f64>() / n,
            variance: root_confidence.iter().map(|e| e.variance).sum::<f64>() / n,
        })
    };

    let mut consensus_by_node: BTreeMap<String, Option<f64>> = BTreeMap::new();
    let mut confidence_by_node: BTreeMap<String, Option<ExpertStat>> = BTreeMap::new();
    for node in graph.nodes() {
        match node.kind {
            NodeKind::Goal => {
                consensus_by_node.insert(node.id.clone(), consensus.score(&node.id));
                confidence_by_node.insert(node.id.clone(), confidence.estimate(&node.id));
            }
            NodeKind::Strategy => {
                let stat = stats.get(&node.id);
                consensus_by_node
                    .insert(node.id.clone(), stat.and_then(|s| s.consensus_mean));
                confidence_by_node.insert(node.id.clone(), stat.and_then(|s| s.expert));
            }
            NodeKind::Other => {}
        }
    }

    debug!(
        roots = root_ids.len(),
        resolved_consensus = root_consensus.len(),
        resolved_confidence = root_confidence.len(),
        nodes = consensus_by_node.len(),
        "assessment complete"
    );

    DiagramAssessment {
        aggregate_consensus,
        aggregate_confidence,
        consensus_by_node,
        confidence_by_node,
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagram::{DiagramEdge, DiagramNode};

    fn node(id: &str, kind: NodeKind) -> DiagramNode {
        DiagramNode {
            id: id.to_string(),
            kind,
        }
    }

    fn edge(source: &str, target: &str) -> DiagramEdge {
        DiagramEdge {
            source_id: source.to_string(),
            target_id: target.to_string(),
        }
    }

    fn full_stat(mean: f64, variance: f64) -> NodeStatistic {
        NodeStatistic {
            consensus_mean: Some(mean),
            expert: Some(ExpertStat { mean, variance }),
        }
    }

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol
    }

    #[test]
    fn two_roots_average_simply() {
        let nodes = vec![node("g1", NodeKind::Goal), node("g2", NodeKind::Goal)];
        let graph = DiagramGraph::build(&nodes, &[]);
        let mut stats = HashMap::new();
        stats.insert("g1".to_string(), full_stat(0.9, 0.01));
        stats.insert("g2".to_string(), full_stat(0.7, 0.04));

        let assessment = assess(&graph, &stats);
        assert!(approx_eq(assessment.aggregate_consensus.unwrap(), 0.8, 1e-12));
        let confidence = assessment.aggregate_confidence.unwrap();
        assert!(approx_eq(confidence.mean, 0.8, 1e-12));
        assert!(approx_eq(confidence.variance, 0.025, 1e-12));
    }

    #[test]
    fn unresolved_roots_are_excluded_from_aggregates() {
        let nodes = vec![node("g1", NodeKind::Goal), node("g2", NodeKind::Goal)];
        let graph = DiagramGraph::build(&nodes, &[]);
        let mut stats = HashMap::new();
        stats.insert("g1".to_string(), full_stat(0.9, 0.01));

        let assessment = assess(&graph, &stats);
        assert_eq!(assessment.aggregate_consensus, Some(0.9));
        assert_eq!(assessment.consensus_by_node.get("g2"), Some(&None));
    }

    #[test]
    fn empty_diagram_yields_absent_aggregates() {
        let graph = DiagramGraph::build(&[], &[]);
        let stats = HashMap::new();
        let assessment = assess(&graph, &stats);
        assert_eq!(assessment.aggregate_consensus, None);
        assert_eq!(assessment.aggregate_confidence, None);
        assert!(assessment.consensus_by_node.is_empty());
    }

    #[test]
    fn strategies_expose_raw_statistics() {
        let nodes = vec![
            node("g1", NodeKind::Goal),
            node("s1", NodeKind::Strategy),
            node("g2", NodeKind::Goal),
            node("c1", NodeKind::Other),
        ];
        let edges = vec![edge("g1", "s1"), edge("s1", "g2"), edge("g1", "c1")];
        let graph = DiagramGraph::build(&nodes, &edges);
        let mut stats = HashMap::new();
        stats.insert("g1".to_string(), full_stat(0.6, 0.01));
        stats.insert("s1".to_string(), full_stat(0.8, 0.02));
        stats.insert("g2".to_string(), full_stat(0.5, 0.01));

        let assessment = assess(&graph, &stats);
        // Strategy entry is the raw mean, never propagated.
        assert_eq!(assessment.consensus_by_node.get("s1"), Some(&Some(0.8)));
        assert_eq!(
            assessment.confidence_by_node.get("s1"),
            Some(&Some(ExpertStat {
                mean: 0.8,
                variance: 0.02
            }))
        );
        // Goal entries are propagated: (0.6 + 0.8*0.5)/2.
        assert!(approx_eq(
            assessment.consensus_by_node.get("g1").unwrap().unwrap(),
            0.5,
            1e-12
        ));
        // Non-propagating kinds stay out of the maps.
        assert!(!assessment.consensus_by_node.contains_key("c1"));
    }

    #[test]
    fn rerun_on_identical_input_is_identical() {
        let nodes = vec![
            node("g1", NodeKind::Goal),
            node("s1", NodeKind::Strategy),
            node("g2", NodeKind::Goal),
        ];
        let edges = vec![edge("g1", "s1"), edge("s1", "g2")];
        let graph = DiagramGraph::build(&nodes, &edges);
        let mut stats = HashMap::new();
        stats.insert("g1".to_string(), full_stat(0.6, 0.01));
        stats.insert("s1".to_string(), full_stat(0.8, 0.02));
        stats.insert("g2".to_string(), full_stat(0.5, 0.01));

        let first = assess(&graph, &stats);
        let second = assess(&graph, &stats);
        assert_eq!(first, second);
    }
}
