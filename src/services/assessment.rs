//! Assessment runner - validate, classify, order and summarize a catalog
//!
//! One `Assessor` is built from `Config` and may be shared across threads.
//! Every run either yields a complete `Assessment` or the first validation
//! error; nothing is classified from a catalog that fails validation.

use crate::domain::error::Result;
use crate::domain::touchpoint::{epoch_ms, new_uuid_v7, RawTouchpoint, Touchpoint};
use crate::infra::config::Config;
use crate::infra::metrics::Metrics;
use crate::services::classifier::{classify_parallel, Thresholds};
use crate::services::journey_synthesis::{summarize_stages, StageSummary};
use crate::services::roadmap::Roadmap;
use crate::services::store::TouchpointStore;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Result of one classification run
#[derive(Debug, Clone, Serialize)]
pub struct Assessment {
    pub run_id: String,
    pub generated_at: u64,
    pub thresholds: Thresholds,
    pub roadmap: Roadmap,
    pub stages: Vec<StageSummary>,
}

impl Assessment {
    /// Serialize to JSON string
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

pub struct Assessor {
    config: Config,
    metrics: Arc<Metrics>,
}

impl Assessor {
    pub fn new(config: Config, metrics: Arc<Metrics>) -> Self {
        Self { config, metrics }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.metrics
    }

    /// Normalize raw research records, then assess them. Records count as
    /// normalized only once the whole run succeeds.
    pub fn assess_raw(&self, records: &[RawTouchpoint]) -> Result<Assessment> {
        let touchpoints = match self.config.normalizer().normalize_records(records) {
            Ok(touchpoints) => touchpoints,
            Err(e) => {
                self.metrics.record_rejected();
                self.metrics.record_run_failed();
                warn!(kind = %e.kind(), error = %e, "record_rejected");
                return Err(e);
            }
        };
        let assessment = self.assess(&touchpoints)?;
        self.metrics.record_normalized(touchpoints.len() as u64);
        Ok(assessment)
    }

    /// Assess an immutable snapshot of the store
    pub fn assess_store(&self, store: &TouchpointStore) -> Result<Assessment> {
        let snapshot = store.snapshot();
        self.assess(snapshot.touchpoints())
    }

    /// Assess touchpoints that already carry normalized scores
    pub fn assess(&self, touchpoints: &[Touchpoint]) -> Result<Assessment> {
        let start = Instant::now();
        let thresholds = *self.config.thresholds();

        let classified = match classify_parallel(
            touchpoints,
            &thresholds,
            self.config.stages(),
            self.config.workers(),
        ) {
            Ok(classified) => classified,
            Err(e) => {
                self.metrics.record_run_failed();
                warn!(kind = %e.kind(), error = %e, "assessment_rejected");
                return Err(e);
            }
        };

        let stages = summarize_stages(&classified, self.config.stages());
        let roadmap = Roadmap::build(&classified);

        let duration_us = start.elapsed().as_micros() as u64;
        self.metrics.record_run(duration_us, roadmap.counts());

        let assessment = Assessment {
            run_id: new_uuid_v7(),
            generated_at: epoch_ms(),
            thresholds,
            roadmap,
            stages,
        };

        let counts = assessment.roadmap.counts();
        info!(
            run_id = %assessment.run_id,
            project = %self.config.project_id(),
            touchpoints = %counts.total(),
            fix_first = %counts.fix_first,
            maintain = %counts.maintain_excellence,
            over_investment = %counts.over_investment,
            deprioritize = %counts.deprioritize,
            duration_us = %duration_us,
            "assessment_completed"
        );

        Ok(assessment)
    }
}
