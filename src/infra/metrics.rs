//! Lock-free assessment metrics
//!
//! Uses atomics so concurrent assessment runs can record without contention.
//! `report()` swaps the periodic counters to zero and returns a summary.
//!
//! NOTE: All atomics use Relaxed ordering intentionally: these are statistical
//! counters only. Do NOT use these atomics for coordination or logic decisions.

use crate::domain::types::Quadrant;
use crate::services::roadmap::QuadrantCounts;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::info;

/// Run duration bucket boundaries (microseconds)
/// Buckets: ≤100, ≤200, ≤400, ≤800, ≤1600, ≤3200, ≤6400, ≤12800, ≤25600, ≤51200, >51200
const BUCKET_BOUNDS: [u64; 10] = [100, 200, 400, 800, 1600, 3200, 6400, 12800, 25600, 51200];
const NUM_BUCKETS: usize = 11;

/// Compute bucket index for a duration using binary search
#[inline]
fn bucket_index(duration_us: u64) -> usize {
    BUCKET_BOUNDS.partition_point(|&bound| bound < duration_us)
}

/// Update an atomic max value using compare-and-swap loop
#[inline]
fn update_atomic_max(atomic_max: &AtomicU64, new_value: u64) {
    let mut current_max = atomic_max.load(Ordering::Relaxed);
    while new_value > current_max {
        match atomic_max.compare_exchange_weak(
            current_max,
            new_value,
            Ordering::Relaxed,
            Ordering::Relaxed,
        ) {
            Ok(_) => break,
            Err(actual) => current_max = actual,
        }
    }
}

/// Swap all buckets to zero and return their values
#[inline]
fn swap_buckets(buckets: &[AtomicU64; NUM_BUCKETS]) -> [u64; NUM_BUCKETS] {
    let mut result = [0u64; NUM_BUCKETS];
    for (i, bucket) in buckets.iter().enumerate() {
        result[i] = bucket.swap(0, Ordering::Relaxed);
    }
    result
}

/// Upper bound of the bucket containing the percentile
fn percentile_from_buckets(buckets: &[u64; NUM_BUCKETS], percentile: f64) -> u64 {
    let total: u64 = buckets.iter().sum();
    if total == 0 {
        return 0;
    }

    let target = (total as f64 * percentile).ceil() as u64;
    let mut cumulative = 0u64;

    // Last bucket uses 2x the previous bound
    const BUCKET_UPPER_BOUNDS: [u64; NUM_BUCKETS] =
        [100, 200, 400, 800, 1600, 3200, 6400, 12800, 25600, 51200, 102400];

    for (i, &count) in buckets.iter().enumerate() {
        cumulative += count;
        if cumulative >= target {
            return BUCKET_UPPER_BOUNDS[i];
        }
    }
    BUCKET_UPPER_BOUNDS[NUM_BUCKETS - 1]
}

/// Lock-free metrics collector for assessment runs
pub struct Metrics {
    /// Completed runs (monotonic)
    runs_total: AtomicU64,
    /// Runs rejected by validation (monotonic)
    runs_failed: AtomicU64,
    /// Raw records normalized successfully (monotonic)
    records_normalized: AtomicU64,
    /// Raw records rejected by the normalizer (monotonic)
    records_rejected: AtomicU64,
    /// Touchpoints classified (monotonic)
    classified_total: AtomicU64,
    /// Classified touchpoints per quadrant, in `Quadrant::ALL` order (monotonic)
    quadrant_totals: [AtomicU64; 4],
    /// Runs since last report (reset on report)
    runs_since_report: AtomicU64,
    /// Sum of run durations (reset on report)
    duration_sum_us: AtomicU64,
    /// Max run duration (reset on report)
    duration_max_us: AtomicU64,
    /// Run duration histogram (reset on report)
    duration_buckets: [AtomicU64; NUM_BUCKETS],
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            runs_total: AtomicU64::new(0),
            runs_failed: AtomicU64::new(0),
            records_normalized: AtomicU64::new(0),
            records_rejected: AtomicU64::new(0),
            classified_total: AtomicU64::new(0),
            quadrant_totals: std::array::from_fn(|_| AtomicU64::new(0)),
            runs_since_report: AtomicU64::new(0),
            duration_sum_us: AtomicU64::new(0),
            duration_max_us: AtomicU64::new(0),
            duration_buckets: std::array::from_fn(|_| AtomicU64::new(0)),
        }
    }

    /// Record a completed run and its quadrant distribution
    #[inline]
    pub fn record_run(&self, duration_us: u64, counts: &QuadrantCounts) {
        self.runs_total.fetch_add(1, Ordering::Relaxed);
        self.runs_since_report.fetch_add(1, Ordering::Relaxed);
        self.duration_sum_us.fetch_add(duration_us, Ordering::Relaxed);
        self.duration_buckets[bucket_index(duration_us)].fetch_add(1, Ordering::Relaxed);
        update_atomic_max(&self.duration_max_us, duration_us);

        self.classified_total.fetch_add(counts.total() as u64, Ordering::Relaxed);
        for quadrant in Quadrant::ALL {
            self.quadrant_totals[quadrant.rank()]
                .fetch_add(counts.get(quadrant) as u64, Ordering::Relaxed);
        }
    }

    #[inline]
    pub fn record_run_failed(&self) {
        self.runs_failed.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_normalized(&self, count: u64) {
        self.records_normalized.fetch_add(count, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_rejected(&self) {
        self.records_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn runs_total(&self) -> u64 {
        self.runs_total.load(Ordering::Relaxed)
    }

    pub fn runs_failed(&self) -> u64 {
        self.runs_failed.load(Ordering::Relaxed)
    }

    pub fn classified_total(&self) -> u64 {
        self.classified_total.load(Ordering::Relaxed)
    }

    pub fn quadrant_total(&self, quadrant: Quadrant) -> u64 {
        self.quadrant_totals[quadrant.rank()].load(Ordering::Relaxed)
    }

    /// Build a summary without resetting anything
    pub fn snapshot(&self) -> MetricsSummary {
        let buckets: [u64; NUM_BUCKETS] =
            std::array::from_fn(|i| self.duration_buckets[i].load(Ordering::Relaxed));
        self.summary(
            self.runs_since_report.load(Ordering::Relaxed),
            self.duration_sum_us.load(Ordering::Relaxed),
            self.duration_max_us.load(Ordering::Relaxed),
            buckets,
        )
    }

    /// Build a summary and reset periodic counters
    pub fn report(&self) -> MetricsSummary {
        let runs = self.runs_since_report.swap(0, Ordering::Relaxed);
        let duration_sum = self.duration_sum_us.swap(0, Ordering::Relaxed);
        let duration_max = self.duration_max_us.swap(0, Ordering::Relaxed);
        let buckets = swap_buckets(&self.duration_buckets);
        self.summary(runs, duration_sum, duration_max, buckets)
    }

    fn summary(
        &self,
        runs: u64,
        duration_sum: u64,
        duration_max: u64,
        buckets: [u64; NUM_BUCKETS],
    ) -> MetricsSummary {
        MetricsSummary {
            runs_total: self.runs_total(),
            runs_failed: self.runs_failed(),
            records_normalized: self.records_normalized.load(Ordering::Relaxed),
            records_rejected: self.records_rejected.load(Ordering::Relaxed),
            classified_total: self.classified_total(),
            quadrant_totals: std::array::from_fn(|i| {
                self.quadrant_totals[i].load(Ordering::Relaxed)
            }),
            runs_since_report: runs,
            avg_run_us: if runs > 0 { duration_sum / runs } else { 0 },
            max_run_us: duration_max,
            run_buckets: buckets,
            run_p50_us: percentile_from_buckets(&buckets, 0.50),
            run_p99_us: percentile_from_buckets(&buckets, 0.99),
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
pub struct MetricsSummary {
    pub runs_total: u64,
    pub runs_failed: u64,
    pub records_normalized: u64,
    pub records_rejected: u64,
    pub classified_total: u64,
    /// Per quadrant, in `Quadrant::ALL` order
    pub quadrant_totals: [u64; 4],
    pub runs_since_report: u64,
    pub avg_run_us: u64,
    pub max_run_us: u64,
    /// Bounds: ≤100, ≤200, ≤400, ≤800, ≤1600, ≤3200, ≤6400, ≤12800, ≤25600, ≤51200, >51200 µs
    pub run_buckets: [u64; NUM_BUCKETS],
    pub run_p50_us: u64,
    pub run_p99_us: u64,
}

impl MetricsSummary {
    pub fn log(&self) {
        info!(
            runs_total = %self.runs_total,
            runs_failed = %self.runs_failed,
            records_normalized = %self.records_normalized,
            records_rejected = %self.records_rejected,
            classified = %self.classified_total,
            fix_first = %self.quadrant_totals[0],
            maintain = %self.quadrant_totals[1],
            over_investment = %self.quadrant_totals[2],
            deprioritize = %self.quadrant_totals[3],
            avg_run_us = %self.avg_run_us,
            p99_run_us = %self.run_p99_us,
            "metrics"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(f: usize, m: usize, o: usize, d: usize) -> QuadrantCounts {
        QuadrantCounts { fix_first: f, maintain_excellence: m, over_investment: o, deprioritize: d }
    }

    #[test]
    fn test_record_run() {
        let metrics = Metrics::new();
        metrics.record_run(150, &counts(2, 1, 0, 3));
        metrics.record_run(90, &counts(1, 0, 0, 0));

        assert_eq!(metrics.runs_total(), 2);
        assert_eq!(metrics.classified_total(), 7);
        assert_eq!(metrics.quadrant_total(Quadrant::FixFirst), 3);
        assert_eq!(metrics.quadrant_total(Quadrant::Deprioritize), 3);
        assert_eq!(metrics.quadrant_total(Quadrant::OverInvestment), 0);
    }

    #[test]
    fn test_report_resets_periodic_counters() {
        let metrics = Metrics::new();
        metrics.record_run(100, &counts(1, 0, 0, 0));
        metrics.record_run(300, &counts(1, 0, 0, 0));
        metrics.record_run_failed();

        let summary = metrics.report();
        assert_eq!(summary.runs_since_report, 2);
        assert_eq!(summary.avg_run_us, 200);
        assert_eq!(summary.max_run_us, 300);
        assert_eq!(summary.runs_failed, 1);
        assert_eq!(summary.quadrant_totals, [2, 0, 0, 0]);

        let summary = metrics.report();
        assert_eq!(summary.runs_since_report, 0);
        assert_eq!(summary.avg_run_us, 0);
        assert_eq!(summary.runs_total, 2);
    }

    #[test]
    fn test_snapshot_does_not_reset() {
        let metrics = Metrics::new();
        metrics.record_run(250, &counts(0, 1, 0, 0));
        metrics.record_normalized(3);

        let first = metrics.snapshot();
        let second = metrics.snapshot();
        assert_eq!(first.runs_since_report, 1);
        assert_eq!(second.runs_since_report, 1);
        assert_eq!(second.max_run_us, 250);
        assert_eq!(second.records_normalized, 3);
    }

    #[test]
    fn test_report_empty() {
        let summary = Metrics::new().report();
        summary.log();
        assert_eq!(summary.runs_total, 0);
        assert_eq!(summary.run_p50_us, 0);
        assert_eq!(summary.run_p99_us, 0);
    }

    #[test]
    fn test_bucket_index() {
        assert_eq!(bucket_index(0), 0);
        assert_eq!(bucket_index(100), 0);
        assert_eq!(bucket_index(101), 1);
        assert_eq!(bucket_index(51200), 9);
        assert_eq!(bucket_index(51201), 10);
    }

    #[test]
    fn test_percentile_computation() {
        let metrics = Metrics::new();
        for _ in 0..100 {
            metrics.record_run(150, &QuadrantCounts::default());
        }
        let summary = metrics.report();
        assert_eq!(summary.run_p50_us, 200);
        assert_eq!(summary.run_p99_us, 200);
    }

    #[test]
    fn test_concurrent_updates() {
        use std::sync::Arc;
        use std::thread;

        let metrics = Arc::new(Metrics::new());
        let mut handles = vec![];

        for _ in 0..8 {
            let m = metrics.clone();
            handles.push(thread::spawn(move || {
                for i in 0..500 {
                    m.record_run(i, &counts(1, 1, 0, 0));
                    m.record_rejected();
                }
            }));
        }

        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(metrics.runs_total(), 4_000);
        assert_eq!(metrics.classified_total(), 8_000);
        assert_eq!(metrics.report().records_rejected, 4_000);
    }
}
