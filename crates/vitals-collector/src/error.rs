use thiserror::Error;

use crate::metrics::StreamKind;

#[derive(Error, Debug)]
pub enum VitalsError {
    #[error("{0} observer not supported")]
    CapabilityUnavailable(StreamKind),

    #[error("Malformed {kind} record: missing `{field}`")]
    MalformedRecord {
        kind: StreamKind,
        field: &'static str,
    },

    #[error("Failed to parse observation record: {0}")]
    InvalidRecord(#[from] serde_json::Error),
}
