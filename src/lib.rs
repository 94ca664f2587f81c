//! Robustness scoring for large undirected networks
//!
//! Evaluates structural robustness under vertex-removal attacks and compares
//! each empirical network against a population of size-matched random
//! controls:
//! - Removal-order planning (static, adaptive and random strategies)
//! - Percolation curves via incremental union-find reconstruction
//! - Uniform G(n,m) synthesis without duplicate-edge rejection
//! - Standardized deviation against the baseline population

pub mod artifacts;
pub mod attack;
pub mod gnm;
pub mod graph;
pub mod percolation;
pub mod pipeline;
pub mod stats;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of checkpoints in a robustness curve (1% .. 100% of vertices removed).
pub const CURVE_POINTS: usize = 100;

/// Vertex-removal strategy for attack simulation.
///
/// The string form of each variant is the identifier used in artifact paths
/// and reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttackStrategy {
    /// Remove vertices by initial degree, highest first, degrees computed once.
    StaticTargeted,
    /// Remove the vertex with the highest current degree, recomputing neighbor
    /// degrees after every deletion.
    AdaptiveTargeted,
    /// Remove vertices in uniformly random order.
    RandomFailure,
}

/// All strategies, in the order they are reported.
pub const ALL_STRATEGIES: [AttackStrategy; 3] = [
    AttackStrategy::StaticTargeted,
    AttackStrategy::AdaptiveTargeted,
    AttackStrategy::RandomFailure,
];

impl AttackStrategy {
    /// Stable identifier used for artifact paths and report keys.
    pub fn name(&self) -> &'static str {
        match self {
            AttackStrategy::StaticTargeted => "static-targeted-attack",
            AttackStrategy::AdaptiveTargeted => "adaptive-targeted-attack",
            AttackStrategy::RandomFailure => "random-failure",
        }
    }
}

impl std::fmt::Display for AttackStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Error for unrecognized strategy identifiers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown attack strategy: {0}")]
pub struct UnknownStrategy(pub String);

impl std::str::FromStr for AttackStrategy {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "static-targeted-attack" => Ok(AttackStrategy::StaticTargeted),
            "adaptive-targeted-attack" => Ok(AttackStrategy::AdaptiveTargeted),
            "random-failure" => Ok(AttackStrategy::RandomFailure),
            other => Err(UnknownStrategy(other.to_string())),
        }
    }
}
