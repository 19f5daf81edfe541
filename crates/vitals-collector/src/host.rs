//! The host environment the aggregator reads point-in-time data from
//!
//! A [`PerformanceHost`] answers two kinds of questions: which observation
//! streams it can deliver (asked once, when the aggregator subscribes) and
//! what the navigation, resource and memory data look like right now (asked
//! on every snapshot).

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::config::VitalsConfig;
use crate::metrics::{ObservationRecord, StreamKind, VitalsAggregator};
use crate::timing::{MemoryInfo, NavigationTiming, ResourceTiming};

/// Capability and timing queries against the monitored page
pub trait PerformanceHost {
    /// Whether the host can deliver records for `kind`
    fn supports(&self, _kind: StreamKind) -> bool {
        true
    }

    /// The page's single navigation entry, if any
    fn navigation_entry(&self) -> Option<NavigationTiming>;

    /// All resource timing entries recorded so far
    fn resource_entries(&self) -> Vec<ResourceTiming>;

    /// Heap sizes, if the host exposes memory introspection
    fn memory(&self) -> Option<MemoryInfo> {
        None
    }
}

impl<H: PerformanceHost + ?Sized> PerformanceHost for Box<H> {
    fn supports(&self, kind: StreamKind) -> bool {
        (**self).supports(kind)
    }

    fn navigation_entry(&self) -> Option<NavigationTiming> {
        (**self).navigation_entry()
    }

    fn resource_entries(&self) -> Vec<ResourceTiming> {
        (**self).resource_entries()
    }

    fn memory(&self) -> Option<MemoryInfo> {
        (**self).memory()
    }
}

/// Host data captured ahead of time, e.g. from a recorded page load
///
/// ```
/// use vitals_collector::host::{CapturedHost, PerformanceHost};
/// use vitals_collector::metrics::StreamKind;
///
/// let host: CapturedHost = serde_json::from_str(r#"{
///     "navigation": { "requestStart": 20, "responseStart": 180 },
///     "resources": [ { "initiatorType": "img", "startTime": 300, "responseEnd": 420 } ],
///     "unsupported": ["layout-shift"]
/// }"#).unwrap();
///
/// assert!(!host.supports(StreamKind::LayoutShift));
/// assert_eq!(host.resource_entries().len(), 1);
/// assert!(host.memory().is_none());
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CapturedHost {
    pub navigation: Option<NavigationTiming>,
    pub resources: Vec<ResourceTiming>,
    pub memory: Option<MemoryInfo>,
    /// Streams the captured environment could not observe
    pub unsupported: HashSet<StreamKind>,
}

impl CapturedHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_navigation(mut self, navigation: NavigationTiming) -> Self {
        self.navigation = Some(navigation);
        self
    }

    pub fn with_resources(mut self, resources: Vec<ResourceTiming>) -> Self {
        self.resources = resources;
        self
    }

    pub fn with_memory(mut self, memory: MemoryInfo) -> Self {
        self.memory = Some(memory);
        self
    }

    /// Mark a stream as unavailable
    pub fn without_stream(mut self, kind: StreamKind) -> Self {
        self.unsupported.insert(kind);
        self
    }

    /// Record a resource fetched after capture started
    pub fn push_resource(&mut self, resource: ResourceTiming) {
        self.resources.push(resource);
    }
}

impl PerformanceHost for CapturedHost {
    fn supports(&self, kind: StreamKind) -> bool {
        !self.unsupported.contains(&kind)
    }

    fn navigation_entry(&self) -> Option<NavigationTiming> {
        if self.supports(StreamKind::Navigation) {
            self.navigation.clone()
        } else {
            None
        }
    }

    fn resource_entries(&self) -> Vec<ResourceTiming> {
        self.resources.clone()
    }

    fn memory(&self) -> Option<MemoryInfo> {
        self.memory
    }
}

/// A recorded page load: host data plus the records delivered, in order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CapturedSession {
    pub host: CapturedHost,
    pub records: Vec<ObservationRecord>,
}

impl CapturedSession {
    /// Load a captured session from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read session file: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse session file: {}", path.display()))
    }

    /// Feed every record through a fresh aggregator and return it
    pub fn replay(self, config: &VitalsConfig) -> VitalsAggregator<CapturedHost> {
        let mut aggregator = VitalsAggregator::with_config(self.host, config);
        for record in &self.records {
            aggregator.on_record(record);
        }
        aggregator
    }
}
