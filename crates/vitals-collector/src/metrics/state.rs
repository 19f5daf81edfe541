//! Accumulated per-metric values for one page-load session

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::record::{Rect, ShiftSource};

/// A layout shift that counted toward CLS
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LayoutShiftRecord {
    /// Shift score
    pub value: f64,
    /// Milliseconds since navigation start
    pub start_time: f64,
    /// Elements that moved
    pub sources: Vec<LayoutShiftSource>,
}

/// One element moved by a layout shift
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LayoutShiftSource {
    /// Tag name, `"unknown"` if the host could not resolve the node
    pub node: String,
    pub previous_rect: Option<Rect>,
    pub current_rect: Option<Rect>,
}

impl LayoutShiftSource {
    /// How far the element's origin moved, if both rects are known
    pub fn displacement(&self) -> Option<(f64, f64)> {
        let previous = self.previous_rect?;
        let current = self.current_rect?;
        Some((current.x - previous.x, current.y - previous.y))
    }
}

impl From<&ShiftSource> for LayoutShiftSource {
    fn from(source: &ShiftSource) -> Self {
        Self {
            node: source
                .node
                .clone()
                .unwrap_or_else(|| "unknown".to_string()),
            previous_rect: source.previous_rect,
            current_rect: source.current_rect,
        }
    }
}

/// Mutable metric values owned by the aggregator
#[derive(Debug, Clone, Default)]
pub struct MetricsState {
    pub(crate) lcp: Option<f64>,
    pub(crate) fid: Option<f64>,
    pub(crate) inp: Option<f64>,
    pub(crate) cls: f64,
    pub(crate) cls_entries: Arc<Vec<LayoutShiftRecord>>,
    pub(crate) fcp: Option<f64>,
    pub(crate) ttfb: Option<f64>,
}

impl MetricsState {
    /// Fresh state; `ttfb` comes from navigation timing when available
    pub fn new(ttfb: Option<f64>) -> Self {
        Self {
            ttfb: ttfb.map(non_negative),
            ..Self::default()
        }
    }

    pub fn lcp(&self) -> Option<f64> {
        self.lcp
    }

    pub fn fid(&self) -> Option<f64> {
        self.fid
    }

    pub fn inp(&self) -> Option<f64> {
        self.inp
    }

    pub fn cls(&self) -> f64 {
        self.cls
    }

    pub fn fcp(&self) -> Option<f64> {
        self.fcp
    }

    pub fn ttfb(&self) -> Option<f64> {
        self.ttfb
    }

    /// Shared view of the layout shift log
    pub fn layout_shifts(&self) -> Arc<Vec<LayoutShiftRecord>> {
        Arc::clone(&self.cls_entries)
    }

    /// Replace LCP with the latest candidate
    pub(crate) fn record_lcp(&mut self, start_time: f64) -> f64 {
        let lcp = non_negative(start_time);
        self.lcp = Some(lcp);
        lcp
    }

    /// Set FCP unless already set; returns the stored value if this call wrote it
    pub(crate) fn record_fcp(&mut self, start_time: f64) -> Option<f64> {
        write_once(&mut self.fcp, start_time)
    }

    /// Set FID unless already set; returns the stored value if this call wrote it
    pub(crate) fn record_fid(&mut self, delay: f64) -> Option<f64> {
        write_once(&mut self.fid, delay)
    }

    /// Fold one interaction delay into the running maximum
    pub(crate) fn record_interaction(&mut self, delay: f64) -> f64 {
        let inp = self.inp.unwrap_or(0.0).max(non_negative(delay));
        self.inp = Some(inp);
        inp
    }

    /// Append a shift to the log and add its score to CLS
    pub(crate) fn record_layout_shift(&mut self, entry: LayoutShiftRecord) -> f64 {
        self.cls += entry.value;
        // Reports holding the previous log keep their copy.
        Arc::make_mut(&mut self.cls_entries).push(entry);
        self.cls
    }
}

fn write_once(slot: &mut Option<f64>, value: f64) -> Option<f64> {
    if slot.is_some() {
        return None;
    }
    let value = non_negative(value);
    *slot = Some(value);
    Some(value)
}

/// Clamp negative and non-finite inputs to zero
pub(crate) fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shift(value: f64) -> LayoutShiftRecord {
        LayoutShiftRecord {
            value,
            start_time: 0.0,
            sources: Vec::new(),
        }
    }

    #[test]
    fn test_default_state() {
        let state = MetricsState::new(None);
        assert_eq!(state.lcp(), None);
        assert_eq!(state.fid(), None);
        assert_eq!(state.inp(), None);
        assert_eq!(state.cls(), 0.0);
        assert!(state.layout_shifts().is_empty());
        assert_eq!(state.fcp(), None);
        assert_eq!(state.ttfb(), None);
    }

    #[test]
    fn test_write_once_fields() {
        let mut state = MetricsState::default();
        assert_eq!(state.record_fcp(120.0), Some(120.0));
        assert_eq!(state.record_fcp(90.0), None);
        assert_eq!(state.fcp(), Some(120.0));

        assert_eq!(state.record_fid(16.0), Some(16.0));
        assert_eq!(state.record_fid(400.0), None);
        assert_eq!(state.fid(), Some(16.0));
    }

    #[test]
    fn test_negative_values_are_clamped() {
        let mut state = MetricsState::new(Some(-3.0));
        assert_eq!(state.ttfb(), Some(0.0));
        assert_eq!(state.record_lcp(f64::NAN), 0.0);
        assert_eq!(state.record_interaction(-12.0), 0.0);
        assert_eq!(state.inp(), Some(0.0));
    }

    #[test]
    fn test_shared_log_is_copy_on_write() {
        let mut state = MetricsState::default();
        state.record_layout_shift(shift(0.05));
        let view = state.layout_shifts();

        state.record_layout_shift(shift(0.02));

        assert_eq!(view.len(), 1);
        assert_eq!(state.layout_shifts().len(), 2);
        assert!((state.cls() - 0.07).abs() < 1e-12);
    }

    #[test]
    fn test_source_displacement() {
        let source = LayoutShiftSource::from(&ShiftSource {
            node: None,
            previous_rect: Some(Rect {
                x: 10.0,
                y: 100.0,
                width: 50.0,
                height: 20.0,
            }),
            current_rect: Some(Rect {
                x: 10.0,
                y: 140.0,
                width: 50.0,
                height: 20.0,
            }),
        });

        assert_eq!(source.node, "unknown");
        assert_eq!(source.displacement(), Some((0.0, 40.0)));
    }
}
