//! Raw observation records delivered by the event source
//!
//! Records mirror the `PerformanceEntry` objects a browser hands to a
//! `PerformanceObserver`: one flat shape shared by every stream, with the
//! stream-specific fields optional. The aggregator decides which fields it
//! needs based on [`StreamKind`].
//!
//! Hosts that relay entries through the console can prefix each JSON payload
//! with [`RECORD_PREFIX`] and hand every console line to
//! [`parse_console_message`].

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

use crate::error::VitalsError;

/// Prefix marking a console message that carries one observation record
pub const RECORD_PREFIX: &str = "__VITALS_RECORD__:";

/// The logical stream a record was observed on
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum StreamKind {
    /// `paint` entries (first-paint, first-contentful-paint)
    Paint,
    /// `largest-contentful-paint` candidates
    LargestContentfulPaint,
    /// `first-input` and `event` timing entries
    #[serde(alias = "event")]
    FirstInput,
    /// `layout-shift` entries
    LayoutShift,
    /// The one-shot navigation timing entry
    Navigation,
}

impl StreamKind {
    /// Every stream the aggregator knows how to subscribe to
    pub const ALL: [StreamKind; 5] = [
        StreamKind::Paint,
        StreamKind::LargestContentfulPaint,
        StreamKind::FirstInput,
        StreamKind::LayoutShift,
        StreamKind::Navigation,
    ];

    /// The performance entry type name for this stream
    pub fn as_str(&self) -> &'static str {
        match self {
            StreamKind::Paint => "paint",
            StreamKind::LargestContentfulPaint => "largest-contentful-paint",
            StreamKind::FirstInput => "first-input",
            StreamKind::LayoutShift => "layout-shift",
            StreamKind::Navigation => "navigation",
        }
    }
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A rectangle in viewport coordinates
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// An element affected by a layout shift, as reported by the host
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ShiftSource {
    /// Tag name of the shifted node, if the node is still attached
    ///
    /// Accepts a bare tag name or a serialized DOM node (`{"tagName": ..}`);
    /// anything else is treated as an unresolved node.
    #[serde(
        default,
        alias = "elementTag",
        deserialize_with = "deserialize_node",
        skip_serializing_if = "Option::is_none"
    )]
    pub node: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_rect: Option<Rect>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_rect: Option<Rect>,
}

fn deserialize_node<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let node = Option::<Value>::deserialize(deserializer)?;
    Ok(node.and_then(|node| match node {
        Value::String(tag) => Some(tag),
        Value::Object(fields) => fields
            .get("tagName")
            .or_else(|| fields.get("nodeName"))
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => None,
    }))
}

/// One performance entry pushed by the event source
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ObservationRecord {
    /// Stream the entry was observed on
    #[serde(alias = "entryType")]
    pub kind: StreamKind,
    /// Milliseconds since navigation start
    #[serde(default)]
    pub start_time: f64,
    /// Entry name (`first-contentful-paint`, `first-input`, an event type, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// When the browser started running the input's event handlers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processing_start: Option<f64>,
    /// Interaction identifier; zero or absent means "not part of an interaction"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interaction_id: Option<u64>,
    /// Whether a layout shift followed recent user input
    #[serde(default)]
    pub had_recent_input: bool,
    /// Layout shift score
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    /// Elements moved by a layout shift
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<ShiftSource>,
}

impl ObservationRecord {
    /// An empty record on `kind` at `start_time`
    pub fn new(kind: StreamKind, start_time: f64) -> Self {
        Self {
            kind,
            start_time,
            name: None,
            processing_start: None,
            interaction_id: None,
            had_recent_input: false,
            value: None,
            sources: Vec::new(),
        }
    }

    /// A named paint entry such as `first-contentful-paint`
    pub fn paint(name: impl Into<String>, start_time: f64) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::new(StreamKind::Paint, start_time)
        }
    }

    /// A largest-contentful-paint candidate
    pub fn largest_contentful_paint(start_time: f64) -> Self {
        Self::new(StreamKind::LargestContentfulPaint, start_time)
    }

    /// The page's first input
    pub fn first_input(start_time: f64, processing_start: f64) -> Self {
        Self {
            name: Some("first-input".to_string()),
            processing_start: Some(processing_start),
            ..Self::new(StreamKind::FirstInput, start_time)
        }
    }

    /// An event timing entry belonging to interaction `interaction_id`
    pub fn interaction(interaction_id: u64, start_time: f64, processing_start: f64) -> Self {
        Self {
            name: Some("pointerdown".to_string()),
            processing_start: Some(processing_start),
            interaction_id: Some(interaction_id),
            ..Self::new(StreamKind::FirstInput, start_time)
        }
    }

    /// A layout shift with score `value`
    pub fn layout_shift(value: f64, start_time: f64, had_recent_input: bool) -> Self {
        Self {
            value: Some(value),
            had_recent_input,
            ..Self::new(StreamKind::LayoutShift, start_time)
        }
    }

    /// Attach layout shift sources
    pub fn with_sources(mut self, sources: Vec<ShiftSource>) -> Self {
        self.sources = sources;
        self
    }

    /// Whether the record names the page's first input
    pub fn is_first_input(&self) -> bool {
        self.name.as_deref() == Some("first-input")
    }

    /// Interaction id, treating zero as "no interaction"
    pub fn active_interaction(&self) -> Option<u64> {
        self.interaction_id.filter(|id| *id != 0)
    }

    /// Input delay (`processingStart - startTime`)
    ///
    /// # Errors
    ///
    /// Returns [`VitalsError::MalformedRecord`] if `processingStart` is missing
    pub fn input_delay(&self) -> Result<f64, VitalsError> {
        self.processing_start
            .map(|processing_start| processing_start - self.start_time)
            .ok_or(VitalsError::MalformedRecord {
                kind: self.kind,
                field: "processingStart",
            })
    }

    /// Layout shift score
    ///
    /// # Errors
    ///
    /// Returns [`VitalsError::MalformedRecord`] if `value` is missing
    pub fn shift_value(&self) -> Result<f64, VitalsError> {
        self.value.ok_or(VitalsError::MalformedRecord {
            kind: self.kind,
            field: "value",
        })
    }

    /// Parse a single record from its JSON form
    pub fn from_json(json: &str) -> Result<Self, VitalsError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Extract a record from a console message
///
/// Returns `None` when the message does not start with [`RECORD_PREFIX`],
/// and `Some(Err(_))` when it does but the payload cannot be parsed.
pub fn parse_console_message(message: &str) -> Option<Result<ObservationRecord, VitalsError>> {
    message
        .strip_prefix(RECORD_PREFIX)
        .map(ObservationRecord::from_json)
}
