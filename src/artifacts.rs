//! Persisted robustness artifacts
//!
//! On-disk layout mirrors the scoring pipeline: one binary curve file per
//! (strategy, replica index) under the store root, where index 0 is the
//! empirical network and 1..K are its size-matched random controls. Once all
//! curves of a network exist they are assembled into a `ScoreRecord` and
//! persisted as a single `scores.bin` artifact for downstream aggregation.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::percolation::RobustnessCurve;
use crate::{AttackStrategy, CURVE_POINTS};

/// File name of the assembled per-network record.
pub const RECORD_FILE: &str = "scores.bin";

/// Errors from artifact persistence.
#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("artifact io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("artifact encoding error: {0}")]
    Codec(#[from] bincode::Error),
    /// A curve file decoded to something other than 100 points.
    #[error("malformed curve at {}: {points} points", path.display())]
    MalformedCurve { path: PathBuf, points: usize },
}

/// Robustness curves of one network under all three strategies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyCurves {
    pub static_targeted: RobustnessCurve,
    pub adaptive_targeted: RobustnessCurve,
    pub random_failure: RobustnessCurve,
}

impl StrategyCurves {
    /// Curve for a strategy.
    pub fn get(&self, strategy: AttackStrategy) -> &RobustnessCurve {
        match strategy {
            AttackStrategy::StaticTargeted => &self.static_targeted,
            AttackStrategy::AdaptiveTargeted => &self.adaptive_targeted,
            AttackStrategy::RandomFailure => &self.random_failure,
        }
    }
}

/// Assembled robustness scores of one empirical network.
///
/// `main` holds the empirical curves; `baseline` holds the K control curves
/// per strategy, ordered by replica index. Assembled only once every
/// constituent curve exists; networks missing any constituent are excluded
/// upstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub main: StrategyCurves,
    pub baseline_static_targeted: Vec<RobustnessCurve>,
    pub baseline_adaptive_targeted: Vec<RobustnessCurve>,
    pub baseline_random_failure: Vec<RobustnessCurve>,
}

impl ScoreRecord {
    /// Baseline curves for a strategy, ordered by replica index.
    pub fn baseline(&self, strategy: AttackStrategy) -> &[RobustnessCurve] {
        match strategy {
            AttackStrategy::StaticTargeted => &self.baseline_static_targeted,
            AttackStrategy::AdaptiveTargeted => &self.baseline_adaptive_targeted,
            AttackStrategy::RandomFailure => &self.baseline_random_failure,
        }
    }

    /// Number of baseline replicas per strategy.
    pub fn replica_count(&self) -> usize {
        self.baseline_static_targeted.len()
    }
}

/// Directory-backed store for the curves of a single network.
#[derive(Debug, Clone)]
pub struct CurveStore {
    root: PathBuf,
}

impl CurveStore {
    /// Open a store rooted at `root`. The directory is created lazily on the
    /// first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Store root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of one curve file: `<root>/<strategy>/<index>.curve`.
    pub fn curve_path(&self, strategy: AttackStrategy, index: u32) -> PathBuf {
        self.root
            .join(strategy.name())
            .join(format!("{}.curve", index))
    }

    /// Persist a curve keyed by strategy and replica index.
    pub fn write_curve(
        &self,
        strategy: AttackStrategy,
        index: u32,
        curve: &RobustnessCurve,
    ) -> Result<(), ArtifactError> {
        let path = self.curve_path(strategy, index);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = BufWriter::new(File::create(path)?);
        bincode::serialize_into(file, curve)?;
        Ok(())
    }

    /// Load a curve, validating its length.
    pub fn read_curve(
        &self,
        strategy: AttackStrategy,
        index: u32,
    ) -> Result<RobustnessCurve, ArtifactError> {
        let path = self.curve_path(strategy, index);
        let file = BufReader::new(File::open(&path)?);
        let curve: RobustnessCurve = bincode::deserialize_from(file)?;
        if curve.points().len() != CURVE_POINTS {
            return Err(ArtifactError::MalformedCurve {
                path,
                points: curve.points().len(),
            });
        }
        Ok(curve)
    }

    /// Assemble the full record of a network from its persisted curves.
    ///
    /// Requires the empirical curve (index 0) and `replicas` baseline curves
    /// (indices 1..=replicas) for every strategy; any missing file fails the
    /// assembly.
    pub fn assemble(&self, replicas: u32) -> Result<ScoreRecord, ArtifactError> {
        let baseline = |strategy| -> Result<Vec<RobustnessCurve>, ArtifactError> {
            (1..=replicas).map(|i| self.read_curve(strategy, i)).collect()
        };
        Ok(ScoreRecord {
            main: StrategyCurves {
                static_targeted: self.read_curve(AttackStrategy::StaticTargeted, 0)?,
                adaptive_targeted: self.read_curve(AttackStrategy::AdaptiveTargeted, 0)?,
                random_failure: self.read_curve(AttackStrategy::RandomFailure, 0)?,
            },
            baseline_static_targeted: baseline(AttackStrategy::StaticTargeted)?,
            baseline_adaptive_targeted: baseline(AttackStrategy::AdaptiveTargeted)?,
            baseline_random_failure: baseline(AttackStrategy::RandomFailure)?,
        })
    }

    /// Persist an assembled record as `<root>/scores.bin`.
    pub fn write_record(&self, record: &ScoreRecord) -> Result<(), ArtifactError> {
        fs::create_dir_all(&self.root)?;
        let file = BufWriter::new(File::create(self.root.join(RECORD_FILE))?);
        bincode::serialize_into(file, record)?;
        Ok(())
    }

    /// Load a previously assembled record.
    pub fn read_record(&self) -> Result<ScoreRecord, ArtifactError> {
        let file = BufReader::new(File::open(self.root.join(RECORD_FILE))?);
        Ok(bincode::deserialize_from(file)?)
    }
}
