//! Point-in-time view of a stream as last read from the streaming contract.

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::error::SnapshotError;
use crate::units;

// ──────────────────────────────────────────────
// Status
// ──────────────────────────────────────────────

/// Why a stream reached its terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FinishReason {
    StoppedByOwner,
    StoppedByReceiver,
    // The contract spells this one without the second "a".
    #[serde(rename = "FinishedNatually", alias = "FinishedNaturally")]
    FinishedNaturally,
    FinishedBecauseCannotBePaid,
    FinishedWhileTransferred,
    /// A reason this SDK does not know about yet.
    #[serde(other)]
    Other,
}

/// Lifecycle state of a stream.
///
/// Wire form follows the contract: plain strings for the unit states and
/// `{"Finished": "<reason>"}` for the terminal one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StreamStatus {
    Initialized,
    Active,
    Paused,
    Finished(FinishReason),
}

impl StreamStatus {
    /// Initialized and Paused streams accrue nothing.
    pub fn is_idling(self) -> bool {
        matches!(self, StreamStatus::Initialized | StreamStatus::Paused)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, StreamStatus::Finished(_))
    }
}

/// Relation of a viewing account to a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamDirection {
    Incoming,
    Outgoing,
}

// ──────────────────────────────────────────────
// Snapshot
// ──────────────────────────────────────────────

/// Immutable copy of a stream's on-chain fields.
///
/// All amounts are in the token's smallest unit. All timestamps are
/// nanoseconds since the epoch, exactly as the contract reports them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamSnapshot {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub creator_id: String,
    pub owner_id: String,
    pub receiver_id: String,
    pub token_account_id: String,
    #[serde(deserialize_with = "units::deserialize_nanos")]
    pub timestamp_created: u64,
    #[serde(deserialize_with = "units::deserialize_nanos")]
    pub last_action: u64,
    #[serde(with = "crate::amount")]
    pub balance: BigDecimal,
    #[serde(with = "crate::amount")]
    pub tokens_per_sec: BigDecimal,
    pub status: StreamStatus,
    #[serde(with = "crate::amount")]
    pub tokens_total_withdrawn: BigDecimal,
    #[serde(
        default,
        deserialize_with = "units::deserialize_optional_nanos",
        skip_serializing_if = "Option::is_none"
    )]
    pub cliff: Option<u64>,
    #[serde(default)]
    pub is_expirable: bool,
    #[serde(default)]
    pub is_locked: bool,
}

impl StreamSnapshot {
    /// Decode a snapshot from contract JSON and check its invariants.
    pub fn from_json_str(json: &str) -> Result<Self, SnapshotError> {
        let snapshot: StreamSnapshot = serde_json::from_str(json)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Decode a snapshot from an already-parsed JSON value.
    pub fn from_json_value(value: serde_json::Value) -> Result<Self, SnapshotError> {
        let snapshot: StreamSnapshot = serde_json::from_value(value)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Check the invariants serde cannot express on its own.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        if let Some(cliff) = self.cliff {
            if cliff < self.timestamp_created {
                return Err(SnapshotError::CliffBeforeCreation {
                    cliff,
                    timestamp_created: self.timestamp_created,
                });
            }
        }
        Ok(())
    }

    /// `balance + tokens_total_withdrawn`; computed on every call since the
    /// balance moves with each add-funds.
    pub fn full_amount(&self) -> BigDecimal {
        &self.balance + &self.tokens_total_withdrawn
    }

    pub fn is_active(&self) -> bool {
        self.status == StreamStatus::Active
    }

    pub fn is_paused(&self) -> bool {
        self.status == StreamStatus::Paused
    }

    pub fn is_idling(&self) -> bool {
        self.status.is_idling()
    }

    /// Finished for any reason.
    pub fn is_dead(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn has_cliff(&self) -> bool {
        self.cliff.is_some()
    }

    /// True when there is no cliff or `now_ms` has reached it.
    pub fn has_passed_cliff(&self, now_ms: i64) -> bool {
        match self.cliff {
            None => true,
            Some(cliff) => units::millis_at_or_after_nanos(now_ms, cliff),
        }
    }

    pub fn is_locked(&self) -> bool {
        self.is_locked
    }

    /// Locked and already past `Initialized`. A locked stream that never
    /// started can still be cancelled; one that is running cannot.
    pub fn was_started_and_locked(&self) -> bool {
        self.is_locked && self.status != StreamStatus::Initialized
    }

    /// Direction of this stream as seen by `account_id`.
    ///
    /// Ownership is checked first, so a stream whose owner is also its
    /// receiver reads as outgoing.
    pub fn direction(&self, account_id: &str) -> Option<StreamDirection> {
        if self.owner_id == account_id {
            Some(StreamDirection::Outgoing)
        } else if self.receiver_id == account_id {
            Some(StreamDirection::Incoming)
        } else {
            None
        }
    }
}
