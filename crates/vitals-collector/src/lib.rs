//! Core Web Vitals aggregation and scoring
//!
//! This crate turns the raw performance entries a browser reports for one page
//! load into Core Web Vitals (LCP, FID, INP, CLS, FCP, TTFB), a navigation
//! timing breakdown, a resource summary, and a Lighthouse-style rating per
//! metric.
//!
//! # Features
//!
//! - **Aggregation**: per-stream reduction rules folding observation records into stable values
//! - **Snapshots**: point-in-time reports merging accumulated metrics with live host data
//! - **Scoring**: `good` / `needs-improvement` / `poor` classification against fixed thresholds
//! - **Graceful degradation**: unsupported streams leave their metrics absent, never fail
//! - **Async collection**: drain any `futures::Stream` of records on a tokio task
//!
//! # Example
//!
//! ```
//! use vitals_collector::host::CapturedHost;
//! use vitals_collector::metrics::{ObservationRecord, VitalsAggregator};
//! use vitals_collector::reporter::{OutputFormat, Reporter};
//! use vitals_collector::timing::NavigationTiming;
//!
//! # fn example() -> anyhow::Result<()> {
//! let host = CapturedHost::new().with_navigation(NavigationTiming {
//!     request_start: 40.0,
//!     response_start: 220.0,
//!     ..NavigationTiming::default()
//! });
//!
//! let mut aggregator = VitalsAggregator::new(host);
//! aggregator.on_record(&ObservationRecord::paint("first-contentful-paint", 610.0));
//! aggregator.on_record(&ObservationRecord::largest_contentful_paint(1480.0));
//! aggregator.on_record(&ObservationRecord::first_input(3200.0, 3236.0));
//!
//! let report = aggregator.snapshot();
//! assert_eq!(report.core_web_vitals.ttfb, Some(180.0));
//!
//! println!("{}", Reporter::new(OutputFormat::Summary).format_report(&report)?);
//! aggregator.teardown();
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! Sessions can be configured using TOML files:
//!
//! ```toml
//! [session]
//! name = "Homepage"
//!
//! [streams]
//! layout_shift = true
//! first_input = false
//!
//! [thresholds.lcp]
//! good = 2500.0
//! needs_improvement = 4000.0
//! ```

pub mod config;
pub mod error;
pub mod host;
pub mod metrics;
pub mod report;
pub mod reporter;
pub mod scoring;
pub mod timing;

// Re-export main types for convenience
pub use config::VitalsConfig;
pub use error::VitalsError;
pub use host::{CapturedHost, CapturedSession, PerformanceHost};
pub use metrics::{CollectionHandle, ObservationRecord, StreamKind, VitalsAggregator};
pub use report::{CoreWebVitals, Report};
pub use reporter::{OutputFormat, Reporter};
pub use scoring::{classify, PerformanceScores, Rating, Thresholds};
