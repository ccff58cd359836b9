//! Roketo stream model and progress calculator.
//!
//! A [`StreamSnapshot`] is an immutable copy of a stream as last read from
//! the streaming contract. Everything else in this crate is a pure function
//! of a snapshot and an evaluation timestamp: how much has streamed, what is
//! left, when it ends, and which actions an account may take. No I/O happens
//! here; fetching snapshots is the client crate's job.

pub mod amount;
pub mod creation;
pub mod description;
pub mod error;
pub mod permissions;
pub mod progress;
pub mod snapshot;
pub mod time_left;
pub mod units;

pub use creation::{duration_in_seconds, tokens_per_second};
pub use description::{parse_color, parse_comment, StreamDescription, TRANSPARENT};
pub use error::SnapshotError;
pub use permissions::{
    can_add_funds, can_pause, can_start, can_stop, can_withdraw, StreamPermissions,
};
pub use progress::{
    available_to_withdraw, calculate_cliff_end_timestamp, calculate_end_timestamp,
    calculate_time_left, stream_progress, stream_view, ProgressAmounts, ProgressPercentages,
    StreamProgress, StreamView,
};
pub use snapshot::{FinishReason, StreamDirection, StreamSnapshot, StreamStatus};
pub use time_left::{format_time_left, MAX_SECONDS};
pub use units::now_millis;

/// Re-exported so callers can build amounts without a direct dependency.
pub use bigdecimal::BigDecimal;
