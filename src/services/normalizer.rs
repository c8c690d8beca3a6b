//! Scoring normalizer
//!
//! Maps raw assessment inputs (Likert ratings, survey percentages, binary
//! flags) onto the [0,1] importance/performance axes:
//! - `(value - min) / (max - min)`, clamped to [0,1]
//! - values outside `[min, max]` by more than `tolerance` (raw units) are
//!   rejected rather than clamped, so data-entry errors surface

use crate::domain::error::{AssessmentError, Location, Result};
use crate::domain::touchpoint::{RawScore, RawTouchpoint, Touchpoint};
use crate::domain::types::{Axis, Scale};
use tracing::debug;

/// Default tolerance: no slack outside the declared scale
pub const DEFAULT_TOLERANCE: f64 = 0.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalizer {
    tolerance: f64,
}

impl Normalizer {
    pub fn new(tolerance: f64) -> Result<Self> {
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(AssessmentError::InvalidTolerance(tolerance));
        }
        Ok(Self { tolerance })
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Normalize a single raw value against its declared scale
    pub fn normalize(&self, value: f64, scale: Scale) -> Result<f64> {
        let Scale { min, max } = scale;
        if !min.is_finite() || !max.is_finite() || max <= min {
            return Err(AssessmentError::InvalidScale { at: Location::default(), min, max });
        }

        let below = min - value;
        let above = value - max;
        if !value.is_finite() || below > self.tolerance || above > self.tolerance {
            return Err(AssessmentError::OutOfRange {
                at: Location::default(),
                value,
                min,
                max,
                tolerance: self.tolerance,
            });
        }

        Ok(((value - min) / scale.span()).clamp(0.0, 1.0))
    }

    #[inline]
    pub fn normalize_score(&self, score: RawScore) -> Result<f64> {
        self.normalize(score.value, score.scale)
    }

    /// Normalize both axes of a raw record into a touchpoint
    pub fn normalize_record(&self, raw: &RawTouchpoint) -> Result<Touchpoint> {
        let importance =
            self.normalize_score(raw.importance).map_err(|e| e.at(&raw.id, Axis::Importance))?;
        let performance =
            self.normalize_score(raw.performance).map_err(|e| e.at(&raw.id, Axis::Performance))?;

        debug!(
            id = %raw.id,
            importance = %importance,
            performance = %performance,
            "record_normalized"
        );

        Ok(Touchpoint {
            id: raw.id.clone(),
            name: raw.name.clone(),
            stage: raw.stage.clone(),
            channel: raw.channel,
            customer_importance: importance,
            current_performance: performance,
            owner: raw.owner.clone(),
        })
    }

    /// Normalize a batch of records; the first failing record aborts the batch
    pub fn normalize_records(&self, raws: &[RawTouchpoint]) -> Result<Vec<Touchpoint>> {
        raws.iter().map(|raw| self.normalize_record(raw)).collect()
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self { tolerance: DEFAULT_TOLERANCE }
    }
}
