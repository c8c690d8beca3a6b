//! Journey synthesis - per-stage rollup of a classification run
//!
//! Produces one row per journey stage: the stage x channel touchpoint matrix
//! counts, quadrant distribution, average scores, and the stage's top pain
//! point. Configured stages keep their configured order and are listed even
//! when empty; stages outside the configuration follow in lexical order.

use crate::domain::touchpoint::ClassifiedTouchpoint;
use crate::domain::types::{Channel, Quadrant, Stage, TouchpointId};
use crate::services::roadmap::{roadmap_order, QuadrantCounts};
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::collections::BTreeSet;

/// Touchpoint counts per channel, in `Channel::ALL` order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ChannelMix([usize; 4]);

impl ChannelMix {
    pub fn get(&self, channel: Channel) -> usize {
        self.0[channel.index()]
    }

    fn record(&mut self, channel: Channel) {
        self.0[channel.index()] += 1;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageSummary {
    pub stage: Stage,
    pub touchpoints: usize,
    pub quadrants: QuadrantCounts,
    pub channels: ChannelMix,
    /// None when the stage has no touchpoints
    pub mean_importance: Option<f64>,
    pub mean_performance: Option<f64>,
    pub mean_gap: Option<f64>,
    /// Highest-priority FixFirst touchpoint of the stage
    pub pain_point: Option<TouchpointId>,
}

#[derive(Default)]
struct Accumulator<'a> {
    touchpoints: usize,
    quadrants: QuadrantCounts,
    channels: ChannelMix,
    importance_sum: f64,
    performance_sum: f64,
    pain_point: Option<&'a ClassifiedTouchpoint>,
}

impl<'a> Accumulator<'a> {
    fn add(&mut self, item: &'a ClassifiedTouchpoint) {
        self.touchpoints += 1;
        self.quadrants.record(item.quadrant);
        self.channels.record(item.touchpoint.channel);
        self.importance_sum += item.importance();
        self.performance_sum += item.performance();

        if item.quadrant == Quadrant::FixFirst {
            let better = match self.pain_point {
                None => true,
                Some(current) => roadmap_order(item, current).is_lt(),
            };
            if better {
                self.pain_point = Some(item);
            }
        }
    }

    fn finish(self, stage: Stage) -> StageSummary {
        let mean = |sum: f64| (self.touchpoints > 0).then(|| sum / self.touchpoints as f64);
        let mean_importance = mean(self.importance_sum);
        let mean_performance = mean(self.performance_sum);
        StageSummary {
            stage,
            touchpoints: self.touchpoints,
            quadrants: self.quadrants,
            channels: self.channels,
            mean_importance,
            mean_performance,
            mean_gap: mean_importance.zip(mean_performance).map(|(i, p)| i - p),
            pain_point: self.pain_point.map(|c| c.id().clone()),
        }
    }
}

/// Summarize classified touchpoints by journey stage
pub fn summarize_stages(
    classified: &[ClassifiedTouchpoint],
    stages: &[Stage],
) -> Vec<StageSummary> {
    let mut by_stage: FxHashMap<&Stage, Accumulator<'_>> = FxHashMap::default();
    for item in classified {
        by_stage.entry(&item.touchpoint.stage).or_default().add(item);
    }

    let extra: BTreeSet<&Stage> =
        by_stage.keys().copied().filter(|stage| !stages.contains(stage)).collect();

    let order: Vec<Stage> = stages.iter().cloned().chain(extra.into_iter().cloned()).collect();

    order
        .into_iter()
        .map(|stage| {
            let acc = by_stage.remove(&stage).unwrap_or_default();
            acc.finish(stage)
        })
        .collect()
}
