//! Metrics aggregation for a single page-load session
//!
//! The [`VitalsAggregator`] owns the session's [`MetricsState`]. Observation
//! records are pushed into it one at a time with
//! [`on_record`](VitalsAggregator::on_record); each stream has its own
//! reduction rule:
//!
//! | Stream | Field | Rule |
//! |--------|-------|------|
//! | `paint` | `fcp` | first `first-contentful-paint` wins |
//! | `largest-contentful-paint` | `lcp` | latest candidate wins |
//! | `first-input` | `fid` | first `first-input` wins |
//! | `first-input` | `inp` | running max over interactions |
//! | `layout-shift` | `cls` | sum of shifts without recent input |
//!
//! TTFB is read once from the navigation entry when the aggregator is created.
//! A stream the host cannot deliver, or that the configuration disables, is
//! never subscribed and its metrics simply stay absent.
//!
//! # Example
//!
//! ```
//! use vitals_collector::host::CapturedHost;
//! use vitals_collector::metrics::{ObservationRecord, VitalsAggregator};
//! use vitals_collector::scoring::Rating;
//!
//! let mut aggregator = VitalsAggregator::new(CapturedHost::new());
//! aggregator.on_record(&ObservationRecord::largest_contentful_paint(1200.0));
//! aggregator.on_record(&ObservationRecord::layout_shift(0.02, 400.0, false));
//!
//! let report = aggregator.snapshot();
//! assert_eq!(report.core_web_vitals.lcp, Some(1200.0));
//! assert_eq!(report.performance_scores.lcp, Some(Rating::Good));
//! assert_eq!(report.layout_shifts.len(), 1);
//! ```

use std::collections::HashSet;
use tracing::{debug, instrument, trace, warn};

use super::record::{ObservationRecord, StreamKind};
use super::state::{non_negative, LayoutShiftRecord, LayoutShiftSource, MetricsState};
use crate::config::VitalsConfig;
use crate::error::VitalsError;
use crate::host::PerformanceHost;
use crate::report::{CoreWebVitals, Report};
use crate::scoring::Thresholds;
use crate::timing::{MemoryUsage, ResourceSummary};

/// Accumulates observation records into Core Web Vitals
pub struct VitalsAggregator<H> {
    host: H,
    state: MetricsState,
    subscriptions: HashSet<StreamKind>,
    navigation: bool,
    torn_down: bool,
    thresholds: Thresholds,
    session: String,
}

impl<H: PerformanceHost> VitalsAggregator<H> {
    /// Create an aggregator with the default configuration
    pub fn new(host: H) -> Self {
        Self::with_config(host, &VitalsConfig::default())
    }

    /// Create an aggregator, subscribing to every stream that is both
    /// enabled in `config` and supported by `host`
    #[instrument(skip(host, config), fields(session = %config.session.name))]
    pub fn with_config(host: H, config: &VitalsConfig) -> Self {
        let mut subscriptions = HashSet::new();

        for kind in StreamKind::ALL {
            if !config.streams.is_enabled(kind) {
                debug!("{} stream disabled by configuration", kind);
                continue;
            }
            if !host.supports(kind) {
                warn!("{}", VitalsError::CapabilityUnavailable(kind));
                continue;
            }
            subscriptions.insert(kind);
        }

        let navigation = subscriptions.contains(&StreamKind::Navigation);
        let ttfb = if navigation {
            host.navigation_entry().map(|entry| entry.ttfb())
        } else {
            None
        };

        let state = MetricsState::new(ttfb);
        match state.ttfb() {
            Some(ttfb) => debug!("TTFB: {:.2}ms", ttfb),
            None => debug!("No navigation entry; TTFB unavailable"),
        }

        Self {
            host,
            state,
            subscriptions,
            navigation,
            torn_down: false,
            thresholds: config.thresholds(),
            session: config.session.name.clone(),
        }
    }

    /// Fold one observation record into the metrics state
    ///
    /// Records for streams that are not subscribed, including every record
    /// after [`teardown`](Self::teardown), are ignored.
    pub fn on_record(&mut self, record: &ObservationRecord) {
        if !self.subscriptions.contains(&record.kind) {
            trace!(kind = %record.kind, "Ignoring record for unsubscribed stream");
            return;
        }

        match record.kind {
            StreamKind::Paint => self.on_paint(record),
            StreamKind::LargestContentfulPaint => self.on_largest_contentful_paint(record),
            StreamKind::FirstInput => self.on_input(record),
            StreamKind::LayoutShift => self.on_layout_shift(record),
            StreamKind::Navigation => {
                trace!("Navigation timing is read once at subscription; ignoring record")
            }
        }
    }

    fn on_paint(&mut self, record: &ObservationRecord) {
        if record.name.as_deref() != Some("first-contentful-paint") {
            trace!(name = ?record.name, "Ignoring paint entry");
            return;
        }

        match self.state.record_fcp(record.start_time) {
            Some(fcp) => debug!("FCP: {:.2}ms", fcp),
            None => trace!("FCP already recorded; ignoring later entry"),
        }
    }

    fn on_largest_contentful_paint(&mut self, record: &ObservationRecord) {
        let lcp = self.state.record_lcp(record.start_time);
        debug!("LCP: {:.2}ms", lcp);
    }

    fn on_input(&mut self, record: &ObservationRecord) {
        let first_input = record.is_first_input();
        let interaction = record.active_interaction();
        if !first_input && interaction.is_none() {
            trace!(name = ?record.name, "Ignoring input entry outside any interaction");
            return;
        }

        let delay = record.input_delay().unwrap_or_else(|err| {
            warn!("{}; counting as 0ms", err);
            0.0
        });

        if first_input {
            match self.state.record_fid(delay) {
                Some(fid) => debug!("FID: {:.2}ms", fid),
                None => trace!("FID already recorded; ignoring later first-input"),
            }
        }

        if let Some(interaction_id) = interaction {
            let inp = self.state.record_interaction(delay);
            debug!(interaction_id, "INP: {:.2}ms", inp);
        }
    }

    fn on_layout_shift(&mut self, record: &ObservationRecord) {
        if record.had_recent_input {
            trace!("Ignoring layout shift caused by recent input");
            return;
        }

        let value = match record.shift_value() {
            Ok(value) => non_negative(value),
            Err(err) => {
                warn!("{}; counting as 0", err);
                0.0
            }
        };

        let entry = LayoutShiftRecord {
            value,
            start_time: non_negative(record.start_time),
            sources: record.sources.iter().map(LayoutShiftSource::from).collect(),
        };

        let cls = self.state.record_layout_shift(entry);
        debug!("CLS: {:.4} (+{:.4})", cls, value);
    }

    /// Build a report from the accumulated metrics and the host's current
    /// navigation, resource and memory data
    pub fn snapshot(&self) -> Report {
        let core_web_vitals = CoreWebVitals::from(&self.state);

        let timing_breakdown = if self.navigation {
            self.host.navigation_entry().map(|entry| entry.breakdown())
        } else {
            None
        };

        Report {
            core_web_vitals,
            timing_breakdown,
            resource_summary: ResourceSummary::from_entries(&self.host.resource_entries()),
            memory: self.host.memory().map(MemoryUsage::from),
            layout_shifts: self.state.layout_shifts(),
            performance_scores: core_web_vitals.score(&self.thresholds),
        }
    }

    /// Unsubscribe from every stream
    ///
    /// Returns `true` if this call tore the session down, `false` if it was
    /// already torn down. Snapshots keep reflecting the last state.
    #[instrument(skip(self), fields(session = %self.session))]
    pub fn teardown(&mut self) -> bool {
        if self.torn_down {
            trace!("Already torn down");
            return false;
        }

        debug!(
            streams = self.subscriptions.len(),
            "Unsubscribing from observation streams"
        );
        self.subscriptions.clear();
        self.torn_down = true;
        true
    }

    /// Whether records on `kind` are currently accepted
    pub fn is_subscribed(&self, kind: StreamKind) -> bool {
        self.subscriptions.contains(&kind)
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// The accumulated metrics
    pub fn state(&self) -> &MetricsState {
        &self.state
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    pub fn session_name(&self) -> &str {
        &self.session
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable access to the host, e.g. to record late resources
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }
}
