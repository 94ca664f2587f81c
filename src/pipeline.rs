//! Unit-of-work pipeline
//!
//! Every piece of the analysis runs as an independent unit: score one graph
//! under all three strategies, or synthesize one random control and score
//! it. Units are pure functions of their inputs plus a pre-drawn seed, so
//! the orchestration layer may dispatch them across any number of workers
//! in any order. A failing unit reports its identifying key and never takes
//! the rest of the batch down with it.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info};

use crate::artifacts::{ArtifactError, CurveStore, ScoreRecord, StrategyCurves};
use crate::gnm::{self, RandomGraphSpec, SynthesisError};
use crate::graph::Graph;
use crate::percolation::PercolationError;
use crate::stats::{self, StatsError};
use crate::{attack, percolation, AttackStrategy, ALL_STRATEGIES};

/// Identifying key of one unit of work.
///
/// `index` 0 is the empirical network itself; 1..K are its size-matched
/// random replicas. The key travels with the unit's outcome so failures can
/// be logged and excluded without halting the batch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkKey {
    pub category: String,
    pub subcategory: String,
    pub network: String,
    pub subnetwork: String,
    /// Replica index: 0 = empirical, 1..K = baseline replicas.
    pub index: u32,
    /// Pre-drawn seed for the unit's generator.
    pub seed: u64,
}

impl std::fmt::Display for WorkKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}#{} (seed {})",
            self.category, self.subcategory, self.network, self.subnetwork, self.index, self.seed
        )
    }
}

/// Outcome of one unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnitStatus {
    Completed,
    Failed,
}

/// Status plus identifying key, as consumed by the orchestration layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitReport {
    pub key: WorkKey,
    pub status: UnitStatus,
}

impl UnitReport {
    pub fn succeeded(&self) -> bool {
        self.status == UnitStatus::Completed
    }
}

/// Any failure local to a single unit.
#[derive(Error, Debug)]
pub enum UnitError {
    #[error(transparent)]
    Percolation(#[from] PercolationError),
    #[error(transparent)]
    Synthesis(#[from] SynthesisError),
    #[error(transparent)]
    Artifact(#[from] ArtifactError),
}

/// Standardized deviations of one network at a single checkpoint fraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZScorePoint {
    /// Identifying key of the network (empirical unit key).
    pub network: String,
    /// Checkpoint fraction the deviations were computed at.
    pub fraction: f64,
    pub static_targeted: f64,
    pub adaptive_targeted: f64,
    pub random_failure: f64,
}

/// Score a graph under all three strategies with one seeded generator.
///
/// Mirrors the per-network scoring unit: a single generator drawn from
/// `seed` feeds the static tie-break noise, the adaptive simulation and the
/// random permutation in a fixed strategy order, so one seed pins all three
/// curves.
pub fn score_all_strategies(
    graph: &Graph,
    seed: u64,
) -> Result<StrategyCurves, PercolationError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let static_order = attack::plan(graph, AttackStrategy::StaticTargeted, &mut rng);
    let adaptive_order = attack::plan(graph, AttackStrategy::AdaptiveTargeted, &mut rng);
    let random_order = attack::plan(graph, AttackStrategy::RandomFailure, &mut rng);
    Ok(StrategyCurves {
        static_targeted: percolation::score(graph, &static_order)?,
        adaptive_targeted: percolation::score(graph, &adaptive_order)?,
        random_failure: percolation::score(graph, &random_order)?,
    })
}

/// Run one scoring unit against an already-built graph, persisting its three
/// curves under the unit's replica index.
pub fn run_score_unit(store: &CurveStore, graph: &Graph, key: &WorkKey) -> UnitReport {
    let result = (|| -> Result<(), UnitError> {
        let curves = score_all_strategies(graph, key.seed)?;
        for strategy in ALL_STRATEGIES {
            store.write_curve(strategy, key.index, curves.get(strategy))?;
        }
        Ok(())
    })();
    report_outcome(key, "score", result)
}

/// Run one baseline unit: synthesize the random control for `spec`, then
/// score and persist it. The unit's pre-drawn seed drives both stages.
pub fn run_baseline_unit(store: &CurveStore, spec: &RandomGraphSpec, key: &WorkKey) -> UnitReport {
    let result = (|| -> Result<(), UnitError> {
        let graph = gnm::synthesize(spec)?;
        let curves = score_all_strategies(&graph, key.seed)?;
        for strategy in ALL_STRATEGIES {
            store.write_curve(strategy, key.index, curves.get(strategy))?;
        }
        Ok(())
    })();
    report_outcome(key, "baseline", result)
}

/// Compute the three standardized deviations of a network's record at a
/// checkpoint fraction.
pub fn zscore_point(
    network: &str,
    record: &ScoreRecord,
    fraction: f64,
) -> Result<ZScorePoint, StatsError> {
    let at = |strategy: AttackStrategy| -> Result<f64, StatsError> {
        let value = record.main.get(strategy).at_fraction(fraction);
        let baseline: Vec<f64> = record
            .baseline(strategy)
            .iter()
            .map(|curve| curve.at_fraction(fraction))
            .collect();
        stats::zscore(value, &baseline)
    };
    Ok(ZScorePoint {
        network: network.to_string(),
        fraction,
        static_targeted: at(AttackStrategy::StaticTargeted)?,
        adaptive_targeted: at(AttackStrategy::AdaptiveTargeted)?,
        random_failure: at(AttackStrategy::RandomFailure)?,
    })
}

fn report_outcome(key: &WorkKey, kind: &str, result: Result<(), UnitError>) -> UnitReport {
    match result {
        Ok(()) => {
            info!(key = %key, kind, "unit completed");
            UnitReport {
                key: key.clone(),
                status: UnitStatus::Completed,
            }
        }
        Err(err) => {
            error!(key = %key, kind, error = %err, "unit failed");
            UnitReport {
                key: key.clone(),
                status: UnitStatus::Failed,
            }
        }
    }
}
