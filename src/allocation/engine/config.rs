use serde::{Deserialize, Serialize};

use crate::allocation::domain::ScoreDimension;

const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Per-dimension weights combined into the composite score. Validated once at
/// engine construction: non-negative, summing to 1 within tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub availability: f64,
    pub bandwidth: f64,
    pub velocity: f64,
    pub performance: f64,
    pub proximity: f64,
    pub cultural_fit: f64,
    pub timezone: f64,
}

impl Default for ScoreWeights {
    /// Equal weighting across all seven dimensions.
    fn default() -> Self {
        let share = 1.0 / 7.0;
        Self {
            availability: share,
            bandwidth: share,
            velocity: share,
            performance: share,
            proximity: share,
            cultural_fit: share,
            timezone: share,
        }
    }
}

impl ScoreWeights {
    pub fn get(&self, dimension: ScoreDimension) -> f64 {
        match dimension {
            ScoreDimension::Availability => self.availability,
            ScoreDimension::Bandwidth => self.bandwidth,
            ScoreDimension::Velocity => self.velocity,
            ScoreDimension::Performance => self.performance,
            ScoreDimension::Proximity => self.proximity,
            ScoreDimension::CulturalFit => self.cultural_fit,
            ScoreDimension::Timezone => self.timezone,
        }
    }

    pub fn sum(&self) -> f64 {
        ScoreDimension::ALL
            .iter()
            .map(|dimension| self.get(*dimension))
            .sum()
    }

    pub(crate) fn validate(&self) -> Result<(), EngineConfigError> {
        for dimension in ScoreDimension::ALL {
            let weight = self.get(dimension);
            if !weight.is_finite() || weight < 0.0 {
                return Err(EngineConfigError::NegativeWeight { dimension, weight });
            }
        }
        let sum = self.sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(EngineConfigError::WeightSum { sum });
        }
        Ok(())
    }
}

/// Normalization curve parameters for the distance- and offset-based scorers,
/// plus the throughput reference used by the velocity scorer. The source data
/// carries no ground truth for these, so they are configuration with
/// conservative defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveConfig {
    /// Distance at which proximity bottoms out at 0.0, in kilometers.
    pub max_distance_km: f64,
    /// Absolute offset difference at which timezone bottoms out, in hours.
    pub max_offset_hours: f64,
    /// Weekly throughput at which velocity saturates at 1.0.
    pub reference_throughput: f64,
}

impl Default for CurveConfig {
    fn default() -> Self {
        Self {
            max_distance_km: 10_000.0,
            max_offset_hours: 12.0,
            reference_throughput: 50.0,
        }
    }
}

impl CurveConfig {
    pub(crate) fn validate(&self) -> Result<(), EngineConfigError> {
        for (parameter, value) in [
            ("max_distance_km", self.max_distance_km),
            ("max_offset_hours", self.max_offset_hours),
            ("reference_throughput", self.reference_throughput),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(EngineConfigError::InvalidCurve { parameter, value });
            }
        }
        Ok(())
    }
}

/// Constants shaping how the winner's margin over the runner-up dampens the
/// reported confidence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceConfig {
    /// Margin at or beyond which confidence is undamped.
    pub margin_threshold: f64,
    /// Lower bound of the damping factor so a dead heat still reports
    /// meaningful confidence.
    pub floor: f64,
}

impl Default for ConfidenceConfig {
    fn default() -> Self {
        Self {
            margin_threshold: 0.1,
            floor: 0.5,
        }
    }
}

impl ConfidenceConfig {
    pub(crate) fn validate(&self) -> Result<(), EngineConfigError> {
        if !self.margin_threshold.is_finite() || self.margin_threshold <= 0.0 {
            return Err(EngineConfigError::InvalidCurve {
                parameter: "margin_threshold",
                value: self.margin_threshold,
            });
        }
        if !self.floor.is_finite() || !(0.0..=1.0).contains(&self.floor) {
            return Err(EngineConfigError::InvalidCurve {
                parameter: "floor",
                value: self.floor,
            });
        }
        Ok(())
    }
}

/// Immutable engine configuration assembled at startup.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    pub weights: ScoreWeights,
    pub curves: CurveConfig,
    pub confidence: ConfidenceConfig,
}

impl EngineConfig {
    pub(crate) fn validate(&self) -> Result<(), EngineConfigError> {
        self.weights.validate()?;
        self.curves.validate()?;
        self.confidence.validate()
    }
}

/// Construction-time configuration failures. These are the only errors the
/// engine ever raises; per-call allocation is total.
#[derive(Debug, thiserror::Error)]
pub enum EngineConfigError {
    #[error("weight for {} must be a finite non-negative number, got {weight}", .dimension.label())]
    NegativeWeight {
        dimension: ScoreDimension,
        weight: f64,
    },
    #[error("dimension weights must sum to 1.0, got {sum}")]
    WeightSum { sum: f64 },
    #[error("curve parameter {parameter} is out of range: {value}")]
    InvalidCurve {
        parameter: &'static str,
        value: f64,
    },
}
