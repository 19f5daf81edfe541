//! Point-in-time performance report

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::metrics::{LayoutShiftRecord, MetricsState};
use crate::scoring::{PerformanceScores, Thresholds};
use crate::timing::{MemoryUsage, ResourceSummary, TimingBreakdown};

/// The six headline metrics as currently accumulated
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CoreWebVitals {
    /// Largest Contentful Paint (ms)
    pub lcp: Option<f64>,
    /// First Input Delay (ms)
    pub fid: Option<f64>,
    /// Cumulative Layout Shift (unitless)
    pub cls: f64,
    /// First Contentful Paint (ms)
    pub fcp: Option<f64>,
    /// Interaction to Next Paint (ms)
    pub inp: Option<f64>,
    /// Time to First Byte (ms)
    pub ttfb: Option<f64>,
}

impl From<&MetricsState> for CoreWebVitals {
    fn from(state: &MetricsState) -> Self {
        Self {
            lcp: state.lcp(),
            fid: state.fid(),
            cls: state.cls(),
            fcp: state.fcp(),
            inp: state.inp(),
            ttfb: state.ttfb(),
        }
    }
}

impl CoreWebVitals {
    /// Rate these values against `thresholds`
    pub fn score(&self, thresholds: &Thresholds) -> PerformanceScores {
        thresholds.score(self.lcp, self.fid, self.cls, self.ttfb)
    }
}

/// Everything known about the page at the moment of the snapshot
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub core_web_vitals: CoreWebVitals,
    /// `None` when the host has no navigation entry
    pub timing_breakdown: Option<TimingBreakdown>,
    pub resource_summary: ResourceSummary,
    /// `None` when the host does not expose memory
    pub memory: Option<MemoryUsage>,
    /// Shifts that counted toward CLS, shared with the aggregator
    pub layout_shifts: Arc<Vec<LayoutShiftRecord>>,
    pub performance_scores: PerformanceScores,
}
