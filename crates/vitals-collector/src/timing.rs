//! Navigation, resource and memory data read from the host at snapshot time
//!
//! Everything here is a direct derivation of data the host already measured:
//! start/end differences for the navigation entry, counts and a mean for
//! resource entries, and a usage ratio for the heap.

use serde::{Deserialize, Serialize};

/// The page's navigation timing entry
///
/// Field names follow `PerformanceNavigationTiming`. Missing fields default
/// to zero, the entry's own time origin.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct NavigationTiming {
    pub navigation_start: f64,
    pub redirect_start: f64,
    pub redirect_end: f64,
    pub domain_lookup_start: f64,
    pub domain_lookup_end: f64,
    pub connect_start: f64,
    pub connect_end: f64,
    pub secure_connection_start: f64,
    pub request_start: f64,
    pub response_start: f64,
    pub response_end: f64,
    pub dom_interactive: f64,
    pub dom_content_loaded_event_start: f64,
    pub dom_content_loaded_event_end: f64,
    pub dom_complete: f64,
    pub load_event_start: f64,
    pub load_event_end: f64,
}

impl NavigationTiming {
    /// Time to first byte (`responseStart - requestStart`)
    pub fn ttfb(&self) -> f64 {
        self.response_start - self.request_start
    }

    /// Break the navigation down into network and processing phases
    pub fn breakdown(&self) -> TimingBreakdown {
        TimingBreakdown {
            redirect_time: self.redirect_end - self.redirect_start,
            dns_time: self.domain_lookup_end - self.domain_lookup_start,
            tcp_time: self.connect_end - self.connect_start,
            tls_time: if self.secure_connection_start > 0.0 {
                self.connect_end - self.secure_connection_start
            } else {
                0.0
            },
            request_time: self.response_start - self.request_start,
            response_time: self.response_end - self.response_start,
            dom_parse_time: self.dom_content_loaded_event_start - self.response_end,
            dom_content_loaded_time: self.dom_content_loaded_event_end
                - self.dom_content_loaded_event_start,
            load_event_time: self.load_event_end - self.load_event_start,
            total_time: self.load_event_end - self.navigation_start,
            dom_interactive_time: self.dom_interactive - self.navigation_start,
            dom_complete_time: self.dom_complete - self.navigation_start,
        }
    }
}

/// Phase durations of the navigation, all in milliseconds
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TimingBreakdown {
    // Network
    pub redirect_time: f64,
    pub dns_time: f64,
    pub tcp_time: f64,
    /// Zero when the connection was not secure
    pub tls_time: f64,
    pub request_time: f64,
    pub response_time: f64,

    // Processing
    pub dom_parse_time: f64,
    pub dom_content_loaded_time: f64,
    pub load_event_time: f64,

    // Totals
    pub total_time: f64,
    pub dom_interactive_time: f64,
    pub dom_complete_time: f64,
}

/// A resource timing entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResourceTiming {
    /// `img`, `script`, `link`, `fetch`, ...
    pub initiator_type: String,
    #[serde(default)]
    pub start_time: f64,
    #[serde(default)]
    pub response_end: f64,
}

impl ResourceTiming {
    pub fn new(initiator_type: impl Into<String>, start_time: f64, response_end: f64) -> Self {
        Self {
            initiator_type: initiator_type.into(),
            start_time,
            response_end,
        }
    }

    /// Fetch duration (`responseEnd - startTime`)
    pub fn duration(&self) -> f64 {
        self.response_end - self.start_time
    }
}

/// Resource counts by initiator plus the mean fetch duration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ResourceSummary {
    pub total_resources: usize,
    pub image_resources: usize,
    pub script_resources: usize,
    pub stylesheet_resources: usize,
    /// Zero when there are no resources
    pub average_resource_time: f64,
}

impl ResourceSummary {
    /// Summarize a list of resource entries
    pub fn from_entries(entries: &[ResourceTiming]) -> Self {
        let count_of = |initiator: &str| {
            entries
                .iter()
                .filter(|entry| entry.initiator_type == initiator)
                .count()
        };

        let average_resource_time = if entries.is_empty() {
            0.0
        } else {
            entries.iter().map(ResourceTiming::duration).sum::<f64>() / entries.len() as f64
        };

        Self {
            total_resources: entries.len(),
            image_resources: count_of("img"),
            script_resources: count_of("script"),
            stylesheet_resources: count_of("link"),
            average_resource_time,
        }
    }
}

/// Heap sizes exposed by the host's memory introspection
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct MemoryInfo {
    #[serde(rename = "usedJSHeapSize")]
    pub used_js_heap_size: u64,
    #[serde(rename = "totalJSHeapSize")]
    pub total_js_heap_size: u64,
    #[serde(rename = "jsHeapSizeLimit")]
    pub js_heap_size_limit: u64,
}

/// Heap sizes plus used/limit as a percentage
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MemoryUsage {
    #[serde(rename = "usedJSHeapSize")]
    pub used_js_heap_size: u64,
    #[serde(rename = "totalJSHeapSize")]
    pub total_js_heap_size: u64,
    #[serde(rename = "jsHeapSizeLimit")]
    pub js_heap_size_limit: u64,
    pub usage_percentage: f64,
}

impl From<MemoryInfo> for MemoryUsage {
    fn from(info: MemoryInfo) -> Self {
        let usage_percentage = if info.js_heap_size_limit == 0 {
            0.0
        } else {
            info.used_js_heap_size as f64 / info.js_heap_size_limit as f64 * 100.0
        };

        Self {
            used_js_heap_size: info.used_js_heap_size,
            total_js_heap_size: info.total_js_heap_size,
            js_heap_size_limit: info.js_heap_size_limit,
            usage_percentage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_navigation() -> NavigationTiming {
        NavigationTiming {
            navigation_start: 0.0,
            redirect_start: 0.0,
            redirect_end: 0.0,
            domain_lookup_start: 5.0,
            domain_lookup_end: 25.0,
            connect_start: 25.0,
            connect_end: 75.0,
            secure_connection_start: 40.0,
            request_start: 80.0,
            response_start: 230.0,
            response_end: 300.0,
            dom_interactive: 900.0,
            dom_content_loaded_event_start: 950.0,
            dom_content_loaded_event_end: 970.0,
            dom_complete: 1400.0,
            load_event_start: 1410.0,
            load_event_end: 1450.0,
        }
    }

    #[test]
    fn test_breakdown() {
        let breakdown = sample_navigation().breakdown();

        assert_eq!(breakdown.redirect_time, 0.0);
        assert_eq!(breakdown.dns_time, 20.0);
        assert_eq!(breakdown.tcp_time, 50.0);
        assert_eq!(breakdown.tls_time, 35.0);
        assert_eq!(breakdown.request_time, 150.0);
        assert_eq!(breakdown.response_time, 70.0);
        assert_eq!(breakdown.dom_parse_time, 650.0);
        assert_eq!(breakdown.dom_content_loaded_time, 20.0);
        assert_eq!(breakdown.load_event_time, 40.0);
        assert_eq!(breakdown.total_time, 1450.0);
        assert_eq!(breakdown.dom_interactive_time, 900.0);
        assert_eq!(breakdown.dom_complete_time, 1400.0);
    }

    #[test]
    fn test_tls_is_zero_without_secure_connection() {
        let navigation = NavigationTiming {
            secure_connection_start: 0.0,
            ..sample_navigation()
        };
        assert_eq!(navigation.breakdown().tls_time, 0.0);
    }

    #[test]
    fn test_ttfb() {
        assert_eq!(sample_navigation().ttfb(), 150.0);
    }

    #[test]
    fn test_navigation_deserializes_with_missing_fields() {
        let navigation: NavigationTiming =
            serde_json::from_str(r#"{"requestStart":12.5,"responseStart":40}"#).unwrap();
        assert_eq!(navigation.navigation_start, 0.0);
        assert_eq!(navigation.ttfb(), 27.5);
    }

    #[test]
    fn test_resource_summary() {
        let entries = vec![
            ResourceTiming::new("img", 100.0, 150.0),
            ResourceTiming::new("img", 120.0, 220.0),
            ResourceTiming::new("script", 50.0, 80.0),
            ResourceTiming::new("link", 40.0, 60.0),
            ResourceTiming::new("fetch", 500.0, 600.0),
        ];
        let summary = ResourceSummary::from_entries(&entries);

        assert_eq!(summary.total_resources, 5);
        assert_eq!(summary.image_resources, 2);
        assert_eq!(summary.script_resources, 1);
        assert_eq!(summary.stylesheet_resources, 1);
        assert_eq!(summary.average_resource_time, 60.0);
    }

    #[test]
    fn test_resource_summary_empty() {
        let summary = ResourceSummary::from_entries(&[]);
        assert_eq!(summary.total_resources, 0);
        assert_eq!(summary.average_resource_time, 0.0);
        assert!(!summary.average_resource_time.is_nan());
    }

    #[test]
    fn test_memory_usage() {
        let usage = MemoryUsage::from(MemoryInfo {
            used_js_heap_size: 25_000_000,
            total_js_heap_size: 40_000_000,
            js_heap_size_limit: 100_000_000,
        });
        assert_eq!(usage.usage_percentage, 25.0);

        let json = serde_json::to_string(&usage).unwrap();
        assert!(json.contains("\"usedJSHeapSize\":25000000"));
        assert!(json.contains("\"usagePercentage\":25.0"));
    }

    #[test]
    fn test_memory_usage_zero_limit() {
        let usage = MemoryUsage::from(MemoryInfo::default());
        assert_eq!(usage.usage_percentage, 0.0);
    }
}
