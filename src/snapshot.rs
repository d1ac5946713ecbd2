//! JSON boundary for running one assessment offline.
//!
//! Collaborators (diagram editor, survey service) hand over one immutable
//! snapshot; the engine answers with aggregates, per-node maps, and any
//! boundary warnings it accumulated while silently degrading malformed
//! pieces of the input. Only genuinely ambiguous snapshots (duplicate ids)
//! are rejected outright.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::diagram::{DiagramEdge, DiagramGraph, DiagramNode};
use crate::propagate::{assess, DiagramAssessment};
use crate::survey::{aggregate_responses, ScaleKind, SurveyQuestion, SurveyResponse};

/// One immutable (diagram, survey) snapshot, as the collaborators serialize
/// it. Question catalog and responses default to empty so a bare diagram is
/// a valid snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramSnapshot {
    pub nodes: Vec<DiagramNode>,
    pub edges: Vec<DiagramEdge>,
    #[serde(default)]
    pub questions: Vec<SurveyQuestion>,
    #[serde(default)]
    pub responses: Vec<SurveyResponse>,
}

/// A snapshot the engine refuses to interpret.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SnapshotError {
    #[error("duplicate node id: {node_id}")]
    DuplicateNodeId { node_id: String },
    #[error("duplicate question id: {question_id}")]
    DuplicateQuestionId { question_id: String },
}

/// One boundary diagnostic. Warnings never abort an assessment; they mirror
/// exactly the inputs the engine drops while computing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotWarning {
    /// Id of the edge source / question / response the warning is about.
    pub subject_id: String,
    pub message: String,
}

/// Assessment plus the warnings gathered at the boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentReport {
    pub assessment: DiagramAssessment,
    pub warnings: Vec<SnapshotWarning>,
}

/// Check a snapshot for inputs the engine would silently drop.
pub fn validate_snapshot(snapshot: &DiagramSnapshot) -> Vec<SnapshotWarning> {
    let mut warnings = Vec::new();

    let node_ids: HashSet<&str> = snapshot.nodes.iter().map(|n| n.id.as_str()).collect();
    for edge in &snapshot.edges {
        if !node_ids.contains(edge.source_id.as_str()) {
            warnings.push(SnapshotWarning {
                subject_id: edge.source_id.clone(),
                message: format!(
                    "edge {} -> {} references an unknown source node",
                    edge.source_id, edge.target_id
                ),
            });
        }
        if !node_ids.contains(edge.target_id.as_str()) {
            warnings.push(SnapshotWarning {
                subject_id: edge.source_id.clone(),
                message: format!(
                    "edge {} -> {} references an unknown target node",
                    edge.source_id, edge.target_id
                ),
            });
        }
    }

    let mut question_ids: HashSet<&str> = HashSet::with_capacity(snapshot.questions.len());
    for question in &snapshot.questions {
        question_ids.insert(question.id.as_str());
        if !node_ids.contains(question.node_id.as_str()) {
            warnings.push(SnapshotWarning {
                subject_id: question.id.clone(),
                message: format!("question is bound to unknown node {}", question.node_id),
            });
        }
        if question.scale_kind == ScaleKind::Discrete0To3
            && (!question.scale_max.is_finite() || question.scale_max <= 0.0)
        {
            warnings.push(SnapshotWarning {
                subject_id: question.id.clone(),
                message: format!("question has unusable scale_max {}", question.scale_max),
            });
        }
    }

    for response in &snapshot.responses {
        for answer in &response.answers {
            if !question_ids.contains(answer.question_id.as_str()) {
                warnings.push(SnapshotWarning {
                    subject_id: response.id.clone(),
                    message: format!(
                        "answer references unknown question {}",
                        answer.question_id
                    ),
                });
            } else if !answer.raw_score.is_finite() {
                warnings.push(SnapshotWarning {
                    subject_id: response.id.clone(),
                    message: format!(
                        "answer to question {} has a non-finite score",
                        answer.question_id
                    ),
                });
            }
        }
    }

    warnings
}

/// Run one full aggregation over a snapshot.
///
/// Pure except for tracing: same snapshot in, same report out.
pub fn run_assessment(snapshot: &DiagramSnapshot) -> Result<AssessmentReport, SnapshotError> {
    let mut seen_nodes: HashSet<&str> = HashSet::with_capacity(snapshot.nodes.len());
    for node in &snapshot.nodes {
        if !seen_nodes.insert(node.id.as_str()) {
            return Err(SnapshotError::DuplicateNodeId {
                node_id: node.id.clone(),
            });
        }
    }
    let mut questions_by_id: HashMap<String, SurveyQuestion> =
        HashMap::with_capacity(snapshot.questions.len());
    for question in &snapshot.questions {
        if questions_by_id
            .insert(question.id.clone(), question.clone())
            .is_some()
        {
            return Err(SnapshotError::DuplicateQuestionId {
                question_id: question.id.clone(),
            });
        }
    }

    let warnings = validate_snapshot(snapshot);
    if !warnings.is_empty() {
        warn!(count = warnings.len(), "snapshot has degraded inputs");
    }

    let graph = DiagramGraph::build(&snapshot.nodes, &snapshot.edges);
    let stats = aggregate_responses(&snapshot.responses, &questions_by_id);
    let assessment = assess(&graph, &stats);

    Ok(AssessmentReport {
        assessment,
        warnings,
    })
}

// =============================================================================
// TESTS
// =============================================================================
