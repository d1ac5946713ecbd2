//! Bottom-up propagation of per-node statistics through the argument graph.
//!
//! Both propagators walk goal → strategy → sub-goal recursively with the
//! same two guards:
//!
//! - a **trail**: the set of node ids on the current recursive path. A node
//!   reappearing in its own trail yields an absent value for that branch, so
//!   cyclic diagrams terminate without ever throwing.
//! - a **memo**: one per-run cache keyed by node id, shared between the
//!   root sweep and the per-node display sweep.
//!
//! The combination rules differ: consensus mixes arithmetically, confidence
//! fuses by precision and propagates uncertainty through products.

pub mod confidence;
pub mod consensus;
pub mod report;

pub use confidence::ConfidencePropagator;
pub use consensus::ConsensusPropagator;
pub use report::{assess, DiagramAssessment};
