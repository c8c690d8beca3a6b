//! Assessment error taxonomy
//!
//! Every variant is an input-validation failure: it is raised before any
//! classification happens and is not retryable. The caller has to correct
//! the record or the configuration.

use crate::domain::types::{Axis, Stage, TouchpointId};
use thiserror::Error;

/// Where an offending value came from
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    pub touchpoint: Option<TouchpointId>,
    pub axis: Option<Axis>,
}

impl Location {
    pub fn new(touchpoint: &TouchpointId, axis: Axis) -> Self {
        Self { touchpoint: Some(touchpoint.clone()), axis: Some(axis) }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.touchpoint, &self.axis) {
            (Some(id), Some(axis)) => write!(f, "touchpoint {} {}", id, axis),
            (Some(id), None) => write!(f, "touchpoint {}", id),
            (None, Some(axis)) => write!(f, "{}", axis),
            (None, None) => f.write_str("raw value"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AssessmentError {
    /// Declared scale has no usable width
    #[error("{at}: invalid scale [{min}, {max}], max must be greater than min")]
    InvalidScale { at: Location, min: f64, max: f64 },

    /// Value lies outside its expected range by more than the tolerance
    #[error("{at}: value {value} outside [{min}, {max}] (tolerance {tolerance})")]
    OutOfRange { at: Location, value: f64, min: f64, max: f64, tolerance: f64 },

    /// Classification threshold outside [0, 1]
    #[error("{axis} threshold {value} outside [0, 1]")]
    InvalidThreshold { axis: Axis, value: f64 },

    /// Normalizer tolerance must be finite and non-negative
    #[error("tolerance {0} must be finite and non-negative")]
    InvalidTolerance(f64),

    /// Two records in one catalog share an id
    #[error("duplicate touchpoint id {0}")]
    DuplicateId(TouchpointId),

    /// Stage not present in the configured journey
    #[error("touchpoint {id}: stage '{stage}' is not a configured journey stage")]
    UnknownStage { id: TouchpointId, stage: Stage },
}

impl AssessmentError {
    /// Attach touchpoint and axis context to a scale/range error
    pub fn at(self, touchpoint: &TouchpointId, axis: Axis) -> Self {
        let loc = Location::new(touchpoint, axis);
        match self {
            AssessmentError::InvalidScale { min, max, .. } => {
                AssessmentError::InvalidScale { at: loc, min, max }
            }
            AssessmentError::OutOfRange { value, min, max, tolerance, .. } => {
                AssessmentError::OutOfRange { at: loc, value, min, max, tolerance }
            }
            other => other,
        }
    }

    /// Stable short name for logs and metrics labels
    pub fn kind(&self) -> &'static str {
        match self {
            AssessmentError::InvalidScale { .. } => "invalid_scale",
            AssessmentError::OutOfRange { .. } => "out_of_range",
            AssessmentError::InvalidThreshold { .. } => "invalid_threshold",
            AssessmentError::InvalidTolerance(_) => "invalid_tolerance",
            AssessmentError::DuplicateId(_) => "duplicate_id",
            AssessmentError::UnknownStage { .. } => "unknown_stage",
        }
    }
}

pub type Result<T> = std::result::Result<T, AssessmentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_message_names_touchpoint_and_axis() {
        let err = AssessmentError::OutOfRange {
            at: Location::default(),
            value: 120.0,
            min: 0.0,
            max: 100.0,
            tolerance: 0.0,
        }
        .at(&TouchpointId::from("TC-007"), Axis::Performance);

        let msg = err.to_string();
        assert!(msg.contains("TC-007"));
        assert!(msg.contains("performance"));
        assert!(msg.contains("[0, 100]"));
        assert_eq!(err.kind(), "out_of_range");
    }

    #[test]
    fn test_at_leaves_other_variants_alone() {
        let err = AssessmentError::InvalidTolerance(-1.0);
        let same = err.clone().at(&TouchpointId::from("X"), Axis::Importance);
        assert_eq!(err, same);
    }

    #[test]
    fn test_location_display() {
        assert_eq!(Location::default().to_string(), "raw value");
        let loc = Location::new(&TouchpointId::from("A"), Axis::Importance);
        assert_eq!(loc.to_string(), "touchpoint A importance");
    }
}
