//! Lighthouse-style classification of Core Web Vitals
//!
//! Each scored metric has two inclusive upper bounds: values at or below
//! `good` rate [`Rating::Good`], values at or below `needs_improvement` rate
//! [`Rating::NeedsImprovement`], anything above is [`Rating::Poor`].
//!
//! | Metric | good | needs improvement |
//! |--------|------|-------------------|
//! | LCP    | 2500 ms | 4000 ms |
//! | FID    | 100 ms  | 300 ms  |
//! | CLS    | 0.1     | 0.25    |
//! | TTFB   | 800 ms  | 1800 ms |
//!
//! INP is reported but never scored.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordinal rating of a metric value
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Rating {
    Good,
    NeedsImprovement,
    Poor,
}

impl Rating {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rating::Good => "good",
            Rating::NeedsImprovement => "needs-improvement",
            Rating::Poor => "poor",
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inclusive upper bounds for one metric
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct MetricThresholds {
    pub good: f64,
    pub needs_improvement: f64,
}

impl MetricThresholds {
    pub const fn new(good: f64, needs_improvement: f64) -> Self {
        Self {
            good,
            needs_improvement,
        }
    }

    /// Rate a value against these bounds
    pub fn rate(&self, value: f64) -> Rating {
        if value <= self.good {
            Rating::Good
        } else if value <= self.needs_improvement {
            Rating::NeedsImprovement
        } else {
            Rating::Poor
        }
    }
}

/// Thresholds for every scored metric
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Thresholds {
    pub lcp: MetricThresholds,
    pub fid: MetricThresholds,
    pub cls: MetricThresholds,
    pub ttfb: MetricThresholds,
}

impl Thresholds {
    pub const LCP: MetricThresholds = MetricThresholds::new(2500.0, 4000.0);
    pub const FID: MetricThresholds = MetricThresholds::new(100.0, 300.0);
    pub const CLS: MetricThresholds = MetricThresholds::new(0.1, 0.25);
    pub const TTFB: MetricThresholds = MetricThresholds::new(800.0, 1800.0);

    /// Score the current metric values
    ///
    /// CLS is always scored; LCP, FID and TTFB only when present.
    pub fn score(
        &self,
        lcp: Option<f64>,
        fid: Option<f64>,
        cls: f64,
        ttfb: Option<f64>,
    ) -> PerformanceScores {
        PerformanceScores {
            lcp: lcp.map(|value| self.lcp.rate(value)),
            fid: fid.map(|value| self.fid.rate(value)),
            cls: self.cls.rate(cls),
            ttfb: ttfb.map(|value| self.ttfb.rate(value)),
        }
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            lcp: Self::LCP,
            fid: Self::FID,
            cls: Self::CLS,
            ttfb: Self::TTFB,
        }
    }
}

/// Ratings for the scored metrics; absent metrics have no rating
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PerformanceScores {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lcp: Option<Rating>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fid: Option<Rating>,
    pub cls: Rating,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttfb: Option<Rating>,
}

/// Score metric values against the default thresholds
pub fn classify(
    lcp: Option<f64>,
    fid: Option<f64>,
    cls: f64,
    ttfb: Option<f64>,
) -> PerformanceScores {
    Thresholds::default().score(lcp, fid, cls, ttfb)
}
