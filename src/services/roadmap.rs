//! Roadmap builder - ordered improvement list from classified touchpoints
//!
//! Ordering:
//! 1. `FixFirst` by descending priority score
//! 2. `MaintainExcellence`, then `OverInvestment`, then `Deprioritize`,
//!    each by descending importance
//!
//! Scores are compared at 1e-9 resolution, so gaps that are equal in decimal
//! but differ in the last bit still tie. Remaining ties are broken by
//! ascending id so that the same catalog always yields the same roadmap.

use crate::domain::touchpoint::ClassifiedTouchpoint;
use crate::domain::types::{Quadrant, TouchpointId};
use serde::Serialize;
use std::cmp::Ordering;

/// Resolution at which scores are considered equal for ordering
const SCORE_RESOLUTION: f64 = 1e-9;

#[inline]
fn score_key(score: f64) -> i64 {
    (score / SCORE_RESOLUTION).round() as i64
}

/// Per-quadrant totals
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct QuadrantCounts {
    pub fix_first: usize,
    pub maintain_excellence: usize,
    pub over_investment: usize,
    pub deprioritize: usize,
}

impl QuadrantCounts {
    #[inline]
    pub fn record(&mut self, quadrant: Quadrant) {
        *self.slot(quadrant) += 1;
    }

    pub fn get(&self, quadrant: Quadrant) -> usize {
        match quadrant {
            Quadrant::FixFirst => self.fix_first,
            Quadrant::MaintainExcellence => self.maintain_excellence,
            Quadrant::OverInvestment => self.over_investment,
            Quadrant::Deprioritize => self.deprioritize,
        }
    }

    pub fn total(&self) -> usize {
        self.fix_first + self.maintain_excellence + self.over_investment + self.deprioritize
    }

    fn slot(&mut self, quadrant: Quadrant) -> &mut usize {
        match quadrant {
            Quadrant::FixFirst => &mut self.fix_first,
            Quadrant::MaintainExcellence => &mut self.maintain_excellence,
            Quadrant::OverInvestment => &mut self.over_investment,
            Quadrant::Deprioritize => &mut self.deprioritize,
        }
    }
}

/// Ordered, fully materialized improvement roadmap
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Roadmap {
    items: Vec<ClassifiedTouchpoint>,
    counts: QuadrantCounts,
}

impl Roadmap {
    /// Build a roadmap from classified touchpoints. The input slice is not
    /// modified.
    pub fn build(classified: &[ClassifiedTouchpoint]) -> Self {
        let mut items = classified.to_vec();
        items.sort_by(roadmap_order);

        let mut counts = QuadrantCounts::default();
        for item in &items {
            counts.record(item.quadrant);
        }

        Self { items, counts }
    }

    pub fn items(&self) -> &[ClassifiedTouchpoint] {
        &self.items
    }

    pub fn counts(&self) -> &QuadrantCounts {
        &self.counts
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Entries of one quadrant, in roadmap order
    pub fn quadrant(&self, quadrant: Quadrant) -> &[ClassifiedTouchpoint] {
        let start: usize =
            Quadrant::ALL[..quadrant.rank()].iter().map(|q| self.counts.get(*q)).sum();
        &self.items[start..start + self.counts.get(quadrant)]
    }

    /// Remediation actions: the `FixFirst` group
    pub fn actions(&self) -> &[ClassifiedTouchpoint] {
        self.quadrant(Quadrant::FixFirst)
    }

    /// 1-based position of a touchpoint in the roadmap
    pub fn rank_of(&self, id: &TouchpointId) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id).map(|i| i + 1)
    }
}

/// Total order used by the roadmap
pub fn roadmap_order(a: &ClassifiedTouchpoint, b: &ClassifiedTouchpoint) -> Ordering {
    a.quadrant
        .rank()
        .cmp(&b.quadrant.rank())
        .then_with(|| match a.quadrant {
            Quadrant::FixFirst => {
                score_key(b.priority_score).cmp(&score_key(a.priority_score))
            }
            _ => score_key(b.importance()).cmp(&score_key(a.importance())),
        })
        .then_with(|| a.id().cmp(b.id()))
}
