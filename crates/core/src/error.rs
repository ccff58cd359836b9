/// Errors raised while reading a stream snapshot.
///
/// The calculator itself never fails: a snapshot that made it past these
/// checks is assumed well-formed. Anything malformed is reported here
/// instead of being clamped into range.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// An amount field was negative, fractional or not a number at all.
    #[error("invalid amount in field '{field}': {value}")]
    InvalidAmount { field: String, value: String },

    /// The cliff lies before the stream was created.
    #[error("cliff {cliff} precedes stream creation at {timestamp_created}")]
    CliffBeforeCreation { cliff: u64, timestamp_created: u64 },

    /// The snapshot JSON could not be decoded.
    #[error("malformed stream snapshot: {0}")]
    Json(#[from] serde_json::Error),
}
