//! Configuration parsing for collection sessions
//!
//! This module provides TOML-based configuration for a collection session:
//! which observation streams to subscribe to and, optionally, overrides for
//! the rating thresholds. Every table is optional; an empty document yields
//! the default session.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::metrics::StreamKind;
use crate::scoring::{MetricThresholds, Thresholds};

/// Main configuration structure loaded from TOML files
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct VitalsConfig {
    /// Session labelling
    #[serde(default)]
    pub session: SessionConfig,
    /// Streams to subscribe to
    #[serde(default)]
    pub streams: StreamsConfig,
    /// Rating threshold overrides
    #[serde(default)]
    pub thresholds: ThresholdsConfig,
}

impl VitalsConfig {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The TOML is malformed
    /// - A threshold override is inconsistent
    ///
    /// # Example
    ///
    /// ```no_run
    /// use vitals_collector::config::VitalsConfig;
    ///
    /// # fn example() -> anyhow::Result<()> {
    /// let config = VitalsConfig::from_file("vitals.toml")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string
    ///
    /// # Example
    ///
    /// ```
    /// use vitals_collector::config::VitalsConfig;
    ///
    /// # fn example() -> anyhow::Result<()> {
    /// let toml = r#"
    ///     [session]
    ///     name = "Checkout"
    ///
    ///     [streams]
    ///     layout_shift = false
    /// "#;
    /// let config = VitalsConfig::from_str(toml)?;
    /// assert!(!config.streams.layout_shift);
    /// # Ok(())
    /// # }
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(s).context("Failed to parse TOML configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every threshold override is ordered and non-negative
    pub fn validate(&self) -> anyhow::Result<()> {
        let overrides = [
            ("lcp", self.thresholds.lcp),
            ("fid", self.thresholds.fid),
            ("cls", self.thresholds.cls),
            ("ttfb", self.thresholds.ttfb),
        ];

        for (metric, bounds) in overrides {
            if let Some(bounds) = bounds {
                if !(bounds.good >= 0.0 && bounds.good <= bounds.needs_improvement) {
                    anyhow::bail!(
                        "Invalid {} thresholds: expected 0 <= good ({}) <= needs_improvement ({})",
                        metric,
                        bounds.good,
                        bounds.needs_improvement
                    );
                }
            }
        }

        Ok(())
    }

    /// Effective thresholds: defaults with any overrides applied
    pub fn thresholds(&self) -> Thresholds {
        let defaults = Thresholds::default();
        Thresholds {
            lcp: self.thresholds.lcp.unwrap_or(defaults.lcp),
            fid: self.thresholds.fid.unwrap_or(defaults.fid),
            cls: self.thresholds.cls.unwrap_or(defaults.cls),
            ttfb: self.thresholds.ttfb.unwrap_or(defaults.ttfb),
        }
    }
}

/// Session labelling
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Label used in logs and summaries (default: "page")
    #[serde(default = "default_session_name")]
    pub name: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            name: default_session_name(),
        }
    }
}

fn default_session_name() -> String {
    "page".to_string()
}

/// Per-stream subscription switches, all enabled by default
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct StreamsConfig {
    #[serde(default = "enabled")]
    pub paint: bool,
    #[serde(default = "enabled")]
    pub largest_contentful_paint: bool,
    #[serde(default = "enabled")]
    pub first_input: bool,
    #[serde(default = "enabled")]
    pub layout_shift: bool,
    #[serde(default = "enabled")]
    pub navigation: bool,
}

impl StreamsConfig {
    /// Whether `kind` should be subscribed to
    pub fn is_enabled(&self, kind: StreamKind) -> bool {
        match kind {
            StreamKind::Paint => self.paint,
            StreamKind::LargestContentfulPaint => self.largest_contentful_paint,
            StreamKind::FirstInput => self.first_input,
            StreamKind::LayoutShift => self.layout_shift,
            StreamKind::Navigation => self.navigation,
        }
    }
}

impl Default for StreamsConfig {
    fn default() -> Self {
        Self {
            paint: true,
            largest_contentful_paint: true,
            first_input: true,
            layout_shift: true,
            navigation: true,
        }
    }
}

fn enabled() -> bool {
    true
}

/// Optional overrides for the rating thresholds
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
pub struct ThresholdsConfig {
    pub lcp: Option<MetricThresholds>,
    pub fid: Option<MetricThresholds>,
    pub cls: Option<MetricThresholds>,
    pub ttfb: Option<MetricThresholds>,
}
