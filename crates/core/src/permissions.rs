//! Which stream actions an account may offer.
//!
//! These mirror the contract's own checks closely enough for a client to
//! hide buttons that would only produce a failing transaction.

use bigdecimal::Zero;

use crate::progress::{available_to_withdraw, left_percent};
use crate::snapshot::{StreamDirection, StreamSnapshot, StreamStatus};

/// Owner may top up an unlocked stream that still has something left to
/// stream and whose cliff is behind it.
pub fn can_add_funds(snapshot: &StreamSnapshot, account_id: &str, now_ms: i64) -> bool {
    snapshot.direction(account_id) == Some(StreamDirection::Outgoing)
        && !snapshot.is_locked()
        && left_percent(snapshot, now_ms) > 0.0
        && snapshot.has_passed_cliff(now_ms)
}

/// Owner may (re)start anything that is not already running.
pub fn can_start(snapshot: &StreamSnapshot, account_id: &str) -> bool {
    snapshot.status != StreamStatus::Active
        && snapshot.direction(account_id) == Some(StreamDirection::Outgoing)
}

/// Either party may pause a running stream, unless it has a cliff.
pub fn can_pause(snapshot: &StreamSnapshot, account_id: &str) -> bool {
    snapshot.direction(account_id).is_some() && snapshot.is_active() && !snapshot.has_cliff()
}

/// Either party may stop a live stream, except a locked one that has
/// already started.
pub fn can_stop(snapshot: &StreamSnapshot, account_id: &str) -> bool {
    snapshot.direction(account_id).is_some()
        && !snapshot.is_dead()
        && !snapshot.was_started_and_locked()
}

/// Receiver may withdraw once past the cliff and something has accrued.
pub fn can_withdraw(snapshot: &StreamSnapshot, account_id: &str, now_ms: i64) -> bool {
    snapshot.direction(account_id) == Some(StreamDirection::Incoming)
        && snapshot.has_passed_cliff(now_ms)
        && !available_to_withdraw(snapshot, now_ms).is_zero()
}

/// Snapshot of every permission for one account at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct StreamPermissions {
    pub direction: Option<StreamDirection>,
    pub can_add_funds: bool,
    pub can_start: bool,
    pub can_pause: bool,
    pub can_stop: bool,
    pub can_withdraw: bool,
}

impl StreamPermissions {
    pub fn evaluate(snapshot: &StreamSnapshot, account_id: &str, now_ms: i64) -> Self {
        StreamPermissions {
            direction: snapshot.direction(account_id),
            can_add_funds: can_add_funds(snapshot, account_id, now_ms),
            can_start: can_start(snapshot, account_id),
            can_pause: can_pause(snapshot, account_id),
            can_stop: can_stop(snapshot, account_id),
            can_withdraw: can_withdraw(snapshot, account_id, now_ms),
        }
    }
}
