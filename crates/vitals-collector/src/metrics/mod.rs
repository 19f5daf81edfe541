//! Metrics aggregation for Core Web Vitals
//!
//! This module provides:
//! - **Records**: the raw performance entries pushed by the host ([`ObservationRecord`])
//! - **State**: the per-session accumulated values ([`MetricsState`])
//! - **Aggregation**: the reduction rules that fold records into state ([`VitalsAggregator`])
//! - **Background collection**: a tokio task draining a record stream ([`CollectionHandle`])

pub mod aggregator;
pub mod handle;
pub mod record;
pub mod state;

// Re-export commonly used types
pub use aggregator::VitalsAggregator;
pub use handle::CollectionHandle;
pub use record::{parse_console_message, ObservationRecord, Rect, ShiftSource, StreamKind};
pub use state::{LayoutShiftRecord, LayoutShiftSource, MetricsState};
