#![forbid(unsafe_code)]

//! # assent-engine
//!
//! Consensus and confidence aggregation for goal-structuring argument
//! diagrams with per-node survey feedback.
//!
//! A diagram is a tree of goals decomposed by strategies (in practice a
//! graph: malformed diagrams may contain cycles, and the engine tolerates
//! them). Two survey audiences rate individual nodes: general respondents on
//! a discrete agreement scale, domain experts on a continuous certainty
//! scale. From one immutable snapshot of diagram + responses the engine
//! derives, bottom-up:
//!
//! - a per-goal **consensus** score (arithmetic opinion mixing), and
//! - a per-goal **confidence** estimate as (mean, variance)
//!   (inverse-variance fusion + product-uncertainty propagation),
//!
//! plus headline aggregates over the diagram's root goals.
//!
//! The engine is synchronous and pure: every run builds its own graph index,
//! memo tables, and trail sets, and nothing is persisted. Missing data and
//! cycles degrade to absent per-node values, never to an error.

pub mod diagram;
pub mod propagate;
pub mod snapshot;
pub mod stats;
pub mod survey;

pub use diagram::{DiagramEdge, DiagramGraph, DiagramNode, NodeKind};
pub use propagate::{assess, ConfidencePropagator, ConsensusPropagator, DiagramAssessment};
pub use snapshot::{
    run_assessment, validate_snapshot, AssessmentReport, DiagramSnapshot, SnapshotError,
    SnapshotWarning,
};
pub use survey::{
    aggregate_responses, ExpertStat, NodeStatistic, ScaleKind, SurveyAnswer, SurveyQuestion,
    SurveyResponse,
};
