//! End-to-end report tests over a captured homepage load
//!
//! The fixture in `sessions/homepage.json` holds a navigation entry, six
//! resources, heap sizes and the observation records delivered during the
//! load, including an input-caused layout shift and an `event` entry.

use pretty_assertions::assert_eq;
use serde_json::Value;
use vitals_collector::host::CapturedSession;
use vitals_collector::metrics::StreamKind;
use vitals_collector::scoring::{PerformanceScores, Rating};
use vitals_collector::{CapturedHost, ObservationRecord, VitalsAggregator, VitalsConfig};

const HOMEPAGE: &str = include_str!("../sessions/homepage.json");

fn homepage() -> CapturedSession {
    serde_json::from_str(HOMEPAGE).expect("fixture should parse")
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {} to be close to {}",
        actual,
        expected
    );
}

#[test]
fn test_core_web_vitals() {
    let report = homepage().replay(&VitalsConfig::default()).snapshot();
    let vitals = report.core_web_vitals;

    assert_eq!(vitals.fcp, Some(652.0));
    assert_eq!(vitals.lcp, Some(1390.0));
    assert_eq!(vitals.fid, Some(36.0));
    assert_eq!(vitals.inp, Some(88.0));
    assert_eq!(vitals.ttfb, Some(226.0));
    assert_close(vitals.cls, 0.05);
}

#[test]
fn test_performance_scores() {
    let report = homepage().replay(&VitalsConfig::default()).snapshot();

    assert_eq!(
        report.performance_scores,
        PerformanceScores {
            lcp: Some(Rating::Good),
            fid: Some(Rating::Good),
            cls: Rating::Good,
            ttfb: Some(Rating::Good),
        }
    );
}

#[test]
fn test_timing_breakdown() {
    let report = homepage().replay(&VitalsConfig::default()).snapshot();
    let timing = report.timing_breakdown.expect("navigation entry present");

    assert_eq!(timing.redirect_time, 0.0);
    assert_close(timing.dns_time, 18.0);
    assert_close(timing.tcp_time, 64.0);
    assert_close(timing.tls_time, 45.0);
    assert_eq!(timing.request_time, 226.0);
    assert_eq!(timing.response_time, 43.0);
    assert_eq!(timing.dom_parse_time, 684.5);
    assert_eq!(timing.dom_content_loaded_time, 12.0);
    assert_eq!(timing.load_event_time, 18.0);
    assert_eq!(timing.total_time, 1830.0);
    assert_eq!(timing.dom_interactive_time, 1020.0);
    assert_eq!(timing.dom_complete_time, 1810.0);
}

#[test]
fn test_resources_and_memory() {
    let report = homepage().replay(&VitalsConfig::default()).snapshot();

    let resources = &report.resource_summary;
    assert_eq!(resources.total_resources, 6);
    assert_eq!(resources.image_resources, 2);
    assert_eq!(resources.script_resources, 2);
    assert_eq!(resources.stylesheet_resources, 1);
    assert_close(resources.average_resource_time, 800.0 / 6.0);

    let memory = report.memory.expect("memory exposed");
    assert_eq!(memory.used_js_heap_size, 12_000_000);
    assert_eq!(memory.usage_percentage, 25.0);
}

#[test]
fn test_layout_shift_detail() {
    let report = homepage().replay(&VitalsConfig::default()).snapshot();

    assert_eq!(report.layout_shifts.len(), 2);

    let first = &report.layout_shifts[0];
    assert_eq!(first.start_time, 1100.0);
    assert_eq!(first.sources.len(), 2);
    assert_eq!(first.sources[0].node, "IMG");
    assert_eq!(first.sources[1].node, "unknown");
    assert_eq!(first.sources[1].displacement(), Some((0.0, 360.0)));

    let second = &report.layout_shifts[1];
    assert_eq!(second.value, 0.01);
    assert!(second.sources.is_empty());
}

#[test]
fn test_report_json_shape() {
    let report = homepage().replay(&VitalsConfig::default()).snapshot();
    let json: Value = serde_json::to_value(&report).unwrap();

    let keys: Vec<&str> = json
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    for key in [
        "coreWebVitals",
        "timingBreakdown",
        "resourceSummary",
        "memory",
        "layoutShifts",
        "performanceScores",
    ] {
        assert!(keys.contains(&key), "missing key {}", key);
    }

    assert_eq!(json["timingBreakdown"]["domParseTime"], 684.5);
    assert_eq!(json["memory"]["jsHeapSizeLimit"], 48_000_000);
    assert_eq!(json["layoutShifts"][0]["sources"][0]["previousRect"]["y"], 240.0);
    assert_eq!(json["performanceScores"]["ttfb"], "good");
}

#[test]
fn test_without_navigation_entry() {
    let mut session = homepage();
    session.host.navigation = None;

    let report = session.replay(&VitalsConfig::default()).snapshot();

    assert!(report.timing_breakdown.is_none());
    assert_eq!(report.core_web_vitals.ttfb, None);
    assert_eq!(report.performance_scores.ttfb, None);

    // Everything the streams delivered is still there
    assert_eq!(report.core_web_vitals.lcp, Some(1390.0));
    assert_eq!(report.core_web_vitals.fid, Some(36.0));
    assert_eq!(report.performance_scores.lcp, Some(Rating::Good));
    assert_eq!(report.resource_summary.total_resources, 6);
}

#[test]
fn test_without_any_stream_support() {
    let mut host = CapturedHost::new();
    for kind in StreamKind::ALL {
        host = host.without_stream(kind);
    }
    let mut aggregator = VitalsAggregator::new(host);

    aggregator.on_record(&ObservationRecord::largest_contentful_paint(5000.0));
    aggregator.on_record(&ObservationRecord::layout_shift(0.9, 10.0, false));
    aggregator.on_record(&ObservationRecord::first_input(10.0, 500.0));

    let report = aggregator.snapshot();
    assert_eq!(report.core_web_vitals.lcp, None);
    assert_eq!(report.core_web_vitals.fid, None);
    assert_eq!(report.core_web_vitals.cls, 0.0);
    assert_eq!(report.resource_summary.average_resource_time, 0.0);
    assert_eq!(
        report.performance_scores,
        PerformanceScores {
            lcp: None,
            fid: None,
            cls: Rating::Good,
            ttfb: None,
        }
    );
}

#[test]
fn test_report_is_isolated_from_later_records() {
    let mut aggregator = homepage().replay(&VitalsConfig::default());
    let before = aggregator.snapshot();

    aggregator.on_record(&ObservationRecord::layout_shift(0.15, 5000.0, false));
    aggregator.on_record(&ObservationRecord::largest_contentful_paint(5200.0));

    assert_eq!(before.layout_shifts.len(), 2);
    assert_eq!(before.core_web_vitals.lcp, Some(1390.0));

    let after = aggregator.snapshot();
    assert_eq!(after.layout_shifts.len(), 3);
    assert_eq!(after.performance_scores.lcp, Some(Rating::Poor));
    assert_eq!(after.performance_scores.cls, Rating::NeedsImprovement);
}

#[test]
fn test_teardown_twice() {
    let mut aggregator = homepage().replay(&VitalsConfig::default());
    let before = aggregator.snapshot();

    assert!(aggregator.teardown());
    assert!(!aggregator.teardown());

    aggregator.on_record(&ObservationRecord::largest_contentful_paint(9000.0));
    assert_eq!(aggregator.snapshot(), before);
}
