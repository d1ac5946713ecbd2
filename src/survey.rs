//! Survey boundary types and per-node response aggregation.
//!
//! Each survey question binds one rating scale to exactly one diagram node.
//! `aggregate_responses` normalizes every answer to the unit interval and
//! reduces them to per-node summary statistics: a consensus-source mean over
//! all answers, and a (mean, variance) pair over the continuous expert scale
//! only. Nodes with no qualifying answers get no entry at all; absence, not
//! zero, encodes "no data".

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::stats::{mean, sample_variance, VARIANCE_EPSILON};

/// Rating scale of a survey question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScaleKind {
    /// Stepped agreement scale used in the general-audience survey
    /// (0 = disagree .. scale_max = agree).
    #[serde(rename = "discrete_0_to_3")]
    Discrete0To3,
    /// Unit-interval certainty scale used in the expert survey.
    #[serde(rename = "continuous_0_to_1")]
    Continuous0To1,
}

/// A survey question bound to one diagram node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyQuestion {
    pub id: String,
    pub node_id: String,
    pub scale_kind: ScaleKind,
    pub scale_max: f64,
}

/// One answer within a submitted response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyAnswer {
    pub question_id: String,
    pub raw_score: f64,
    #[serde(default)]
    pub comment: Option<String>,
}

/// One submitted survey response: an ordered sequence of answers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyResponse {
    pub id: String,
    pub answers: Vec<SurveyAnswer>,
}

/// Expert-audience estimate for one node: mean plus strictly positive
/// variance (the aggregator floors variance at `VARIANCE_EPSILON`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExpertStat {
    pub mean: f64,
    pub variance: f64,
}

/// Per-node summary derived from one response set. Recomputed fresh for
/// every (snapshot, response set) pair and discarded with the run.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NodeStatistic {
    /// Mean of all normalized answers for the node, any scale.
    pub consensus_mean: Option<f64>,
    /// Mean and variance over continuous-scale answers only.
    pub expert: Option<ExpertStat>,
}

/// Reduce raw survey answers to per-node statistics.
///
/// Answers referencing unknown questions, non-finite scores, and questions
/// with a non-positive `scale_max` are skipped; the snapshot validator
/// reports them as warnings.
pub fn aggregate_responses(
    responses: &[SurveyResponse],
    questions_by_id: &HashMap<String, SurveyQuestion>,
) -> HashMap<String, NodeStatistic> {
    let mut all_scores: HashMap<String, Vec<f64>> = HashMap::new();
    let mut expert_scores: HashMap<String, Vec<f64>> = HashMap::new();

    for response in responses {
        for answer in &response.answers {
            let Some(question) = questions_by_id.get(&answer.question_id) else {
                continue;
            };
            if !answer.raw_score.is_finite() {
                continue;
            }
            let normalized = match question.scale_kind {
                ScaleKind::Discrete0To3 => {
                    if !question.scale_max.is_finite() || question.scale_max <= 0.0 {
                        continue;
                    }
                    answer.raw_score / question.scale_max
                }
                ScaleKind::Continuous0To1 => answer.raw_score,
            };
            all_scores
                .entry(question.node_id.clone())
                .or_default()
                .push(normalized);
            if question.scale_kind == ScaleKind::Continuous0To1 {
                expert_scores
                    .entry(question.node_id.clone())
                    .or_default()
                    .push(normalized);
            }
        }
    }

    let mut out: HashMap<String, NodeStatistic> = HashMap::with_capacity(all_scores.len());
    for (node_id, scores) in all_scores {
        let expert = expert_scores.get(&node_id).and_then(|samples| {
            let m = mean(samples)?;
            Some(ExpertStat {
                mean: m,
                variance: sample_variance(samples, m) + VARIANCE_EPSILON,
            })
        });
        out.insert(
            node_id,
            NodeStatistic {
                consensus_mean: mean(&scores),
                expert,
            },
        );
    }
    out
}

// =============================================================================
// TESTS
// =============================================================================
