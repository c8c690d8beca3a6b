//! Quadrant classifier
//!
//! Midpoint split on the importance/performance plane. A value exactly on a
//! threshold counts as meeting it (`>=`) on both axes:
//!
//! ```text
//!                 performance < tp     performance >= tp
//! importance>=ti  FixFirst             MaintainExcellence
//! importance< ti  Deprioritize         OverInvestment
//! ```

use crate::domain::error::{AssessmentError, Result};
use crate::domain::touchpoint::{ClassifiedTouchpoint, Touchpoint};
use crate::domain::types::{Axis, Quadrant, Stage, TouchpointId};
use rustc_hash::FxHashSet;
use std::thread;
use tracing::debug;

pub const DEFAULT_THRESHOLD: f64 = 0.5;

/// Validated classification thresholds, both within [0,1]
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct Thresholds {
    importance: f64,
    performance: f64,
}

impl Thresholds {
    pub fn new(importance: f64, performance: f64) -> Result<Self> {
        check_threshold(Axis::Importance, importance)?;
        check_threshold(Axis::Performance, performance)?;
        Ok(Self { importance, performance })
    }

    pub fn importance(&self) -> f64 {
        self.importance
    }

    pub fn performance(&self) -> f64 {
        self.performance
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self { importance: DEFAULT_THRESHOLD, performance: DEFAULT_THRESHOLD }
    }
}

fn check_threshold(axis: Axis, value: f64) -> Result<()> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(AssessmentError::InvalidThreshold { axis, value })
    }
}

/// Quadrant for a pair of normalized scores
#[inline]
pub fn quadrant_for(importance: f64, performance: f64, thresholds: &Thresholds) -> Quadrant {
    let important = importance >= thresholds.importance;
    let performing = performance >= thresholds.performance;
    match (important, performing) {
        (true, false) => Quadrant::FixFirst,
        (true, true) => Quadrant::MaintainExcellence,
        (false, true) => Quadrant::OverInvestment,
        (false, false) => Quadrant::Deprioritize,
    }
}

/// Classify one touchpoint. Scores are assumed valid; use
/// [`validate_catalog`] or [`classify_catalog`] for untrusted input.
pub fn classify(touchpoint: &Touchpoint, thresholds: &Thresholds) -> ClassifiedTouchpoint {
    let quadrant = quadrant_for(
        touchpoint.customer_importance,
        touchpoint.current_performance,
        thresholds,
    );
    ClassifiedTouchpoint { touchpoint: touchpoint.clone(), quadrant, priority_score: touchpoint.gap() }
}

/// Validate a whole catalog before anything is classified:
/// - every score finite and within [0,1]
/// - ids unique
/// - stage listed in `stages`, when `stages` is non-empty
pub fn validate_catalog(touchpoints: &[Touchpoint], stages: &[Stage]) -> Result<()> {
    let mut seen: FxHashSet<&TouchpointId> = FxHashSet::default();
    for tp in touchpoints {
        tp.validate()?;
        if !seen.insert(&tp.id) {
            return Err(AssessmentError::DuplicateId(tp.id.clone()));
        }
        if !stages.is_empty() && !stages.contains(&tp.stage) {
            return Err(AssessmentError::UnknownStage { id: tp.id.clone(), stage: tp.stage.clone() });
        }
    }
    Ok(())
}

/// Validate then classify, preserving input order
pub fn classify_catalog(
    touchpoints: &[Touchpoint],
    thresholds: &Thresholds,
    stages: &[Stage],
) -> Result<Vec<ClassifiedTouchpoint>> {
    validate_catalog(touchpoints, stages)?;
    Ok(touchpoints.iter().map(|tp| classify(tp, thresholds)).collect())
}

/// Validate then classify on up to `workers` scoped threads.
///
/// Each touchpoint is classified independently, so chunks are processed
/// without coordination and concatenated in input order. The result equals
/// [`classify_catalog`].
pub fn classify_parallel(
    touchpoints: &[Touchpoint],
    thresholds: &Thresholds,
    stages: &[Stage],
    workers: usize,
) -> Result<Vec<ClassifiedTouchpoint>> {
    validate_catalog(touchpoints, stages)?;

    let workers = workers.max(1);
    if workers == 1 || touchpoints.len() < workers * 2 {
        return Ok(touchpoints.iter().map(|tp| classify(tp, thresholds)).collect());
    }

    let chunk_size = touchpoints.len().div_ceil(workers);
    debug!(workers = %workers, chunk_size = %chunk_size, total = %touchpoints.len(), "classify_parallel");

    let chunks: Vec<Vec<ClassifiedTouchpoint>> = thread::scope(|s| {
        let handles: Vec<_> = touchpoints
            .chunks(chunk_size)
            .map(|chunk| {
                s.spawn(move || {
                    chunk.iter().map(|tp| classify(tp, thresholds)).collect::<Vec<_>>()
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|h| match h.join() {
                Ok(chunk) => chunk,
                Err(panic) => std::panic::resume_unwind(panic),
            })
            .collect()
    });

    Ok(chunks.into_iter().flatten().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::Channel;

    fn tp(id: &str, importance: f64, performance: f64) -> Touchpoint {
        Touchpoint::new(id, "Core Usage", Channel::Digital, importance, performance)
    }

    #[test]
    fn test_four_quadrants() {
        let t = Thresholds::default();
        assert_eq!(quadrant_for(0.9, 0.2, &t), Quadrant::FixFirst);
        assert_eq!(quadrant_for(0.9, 0.8, &t), Quadrant::MaintainExcellence);
        assert_eq!(quadrant_for(0.1, 0.8, &t), Quadrant::OverInvestment);
        assert_eq!(quadrant_for(0.1, 0.2, &t), Quadrant::Deprioritize);
    }

    #[test]
    fn test_threshold_is_inclusive_on_both_axes() {
        let t = Thresholds::default();
        assert_eq!(quadrant_for(0.5, 0.5, &t), Quadrant::MaintainExcellence);
        assert_eq!(quadrant_for(0.5, 0.49, &t), Quadrant::FixFirst);
        assert_eq!(quadrant_for(0.49, 0.5, &t), Quadrant::OverInvestment);

        for threshold in [0.0, 0.25, 0.7, 1.0] {
            let t = Thresholds::new(threshold, threshold).unwrap();
            assert_eq!(quadrant_for(threshold, threshold, &t), Quadrant::MaintainExcellence);
        }
    }

    #[test]
    fn test_priority_score_is_gap() {
        let c = classify(&tp("TC-001", 0.9, 0.2), &Thresholds::default());
        assert_eq!(c.quadrant, Quadrant::FixFirst);
        assert!((c.priority_score - 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_threshold() {
        assert_eq!(
            Thresholds::new(1.5, 0.5),
            Err(AssessmentError::InvalidThreshold { axis: Axis::Importance, value: 1.5 })
        );
        assert_eq!(
            Thresholds::new(0.5, -0.01),
            Err(AssessmentError::InvalidThreshold { axis: Axis::Performance, value: -0.01 })
        );
        assert!(Thresholds::new(f64::NAN, 0.5).is_err());
    }

    #[test]
    fn test_validate_catalog_rejects_duplicates() {
        let catalog = vec![tp("A", 0.5, 0.5), tp("A", 0.6, 0.6)];
        assert_eq!(
            validate_catalog(&catalog, &[]),
            Err(AssessmentError::DuplicateId(TouchpointId::from("A")))
        );
    }

    #[test]
    fn test_validate_catalog_checks_stage_membership() {
        let catalog = vec![tp("A", 0.5, 0.5)];
        let stages = vec![Stage::from("Awareness"), Stage::from("Support")];
        assert!(matches!(
            validate_catalog(&catalog, &stages),
            Err(AssessmentError::UnknownStage { .. })
        ));
        let stages = vec![Stage::from("Core Usage")];
        assert!(validate_catalog(&catalog, &stages).is_ok());
    }

    #[test]
    fn test_classify_catalog_validates_before_classifying() {
        let catalog = vec![tp("A", 0.9, 0.1), tp("B", 0.9, 1.3)];
        let err = classify_catalog(&catalog, &Thresholds::default(), &[]).unwrap_err();
        assert_eq!(err.kind(), "out_of_range");
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let catalog: Vec<Touchpoint> = (0..103)
            .map(|i| {
                let importance = (i % 11) as f64 / 10.0;
                let performance = (i % 7) as f64 / 6.0;
                tp(&format!("TP-{:03}", i), importance, performance)
            })
            .collect();
        let t = Thresholds::default();

        let sequential = classify_catalog(&catalog, &t, &[]).unwrap();
        for workers in [1, 2, 4, 16] {
            let parallel = classify_parallel(&catalog, &t, &[], workers).unwrap();
            assert_eq!(parallel, sequential, "workers={}", workers);
        }
    }
}
