//! Stream progress calculator.
//!
//! Every function here is a pure computation over a [`StreamSnapshot`] and an
//! explicit evaluation timestamp in milliseconds. Nothing is cached and
//! nothing is fetched: evaluating the same snapshot at the same timestamp
//! always yields the same answer, so a UI can re-run these every second and
//! a notification can run them against a past timestamp.
//!
//! Amount arithmetic stays in `BigDecimal` throughout. Conversion to `f64`
//! happens only for percentages.

use bigdecimal::{BigDecimal, ToPrimitive, Zero};
use serde::Serialize;

use crate::amount;
use crate::snapshot::StreamSnapshot;
use crate::time_left::{format_time_left, MAX_SECONDS};
use crate::units;

// ──────────────────────────────────────────────
// Available to withdraw
// ──────────────────────────────────────────────

/// Amount streamed since the last on-chain action and not yet withdrawn.
///
/// Zero while the stream idles. Otherwise `tokens_per_sec` times the
/// seconds elapsed since `last_action`, capped at the remaining balance.
///
/// `eval_ms` must not precede `last_action`; an earlier timestamp yields a
/// negative elapsed time and the cap does not guard against that.
pub fn available_to_withdraw(snapshot: &StreamSnapshot, eval_ms: i64) -> BigDecimal {
    if snapshot.is_idling() {
        return BigDecimal::zero();
    }

    let now_sec = BigDecimal::from(units::millis_to_whole_seconds(eval_ms));
    let last_action_sec = units::nanos_to_seconds(snapshot.last_action);
    let elapsed = now_sec - last_action_sec;
    let candidate = &snapshot.tokens_per_sec * elapsed;

    std::cmp::min(snapshot.balance.clone(), candidate)
}

// ──────────────────────────────────────────────
// Progress
// ──────────────────────────────────────────────

/// Raw amounts behind a progress bar, in the token's smallest unit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressAmounts {
    #[serde(serialize_with = "amount::serialize")]
    pub full: BigDecimal,
    #[serde(serialize_with = "amount::serialize")]
    pub withdrawn: BigDecimal,
    #[serde(serialize_with = "amount::serialize")]
    pub streamed: BigDecimal,
    #[serde(serialize_with = "amount::serialize")]
    pub left: BigDecimal,
    #[serde(serialize_with = "amount::serialize")]
    pub available: BigDecimal,
}

/// The same quantities as shares of `full`, scaled to 0..=100.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressPercentages {
    pub left: f64,
    pub streamed: f64,
    pub withdrawn: f64,
    pub available: f64,
    /// Position of the cliff along the stream's lifetime, when it can be
    /// placed at all.
    pub cliff: Option<f64>,
}

/// Amounts and percentages for one evaluation timestamp.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StreamProgress {
    pub amounts: ProgressAmounts,
    pub percentages: ProgressPercentages,
}

/// Compute streamed/withdrawn/left amounts and their percentages.
///
/// With `extrapolate == false` the accrual since `last_action` is ignored,
/// which is what a frozen historical snapshot (a notification, say) wants.
pub fn stream_progress(snapshot: &StreamSnapshot, eval_ms: i64, extrapolate: bool) -> StreamProgress {
    let available = if extrapolate {
        available_to_withdraw(snapshot, eval_ms)
    } else {
        BigDecimal::zero()
    };

    let full = snapshot.full_amount();
    let withdrawn = snapshot.tokens_total_withdrawn.clone();
    let streamed = &withdrawn + &available;
    let left = &full - &streamed;

    let percentages = ProgressPercentages {
        left: percent_of(&left, &full),
        streamed: percent_of(&streamed, &full),
        withdrawn: percent_of(&withdrawn, &full),
        available: percent_of(&available, &full),
        cliff: calculate_cliff_percent(snapshot),
    };

    StreamProgress {
        amounts: ProgressAmounts {
            full,
            withdrawn,
            streamed,
            left,
            available,
        },
        percentages,
    }
}

/// `part / full * 100`, defined as 0 for an empty stream.
fn percent_of(part: &BigDecimal, full: &BigDecimal) -> f64 {
    if full.is_zero() {
        return 0.0;
    }
    let ratio = part * BigDecimal::from(100) / full;
    ratio.to_f64().unwrap_or(0.0)
}

/// Share of the remaining balance still to stream at `eval_ms`.
pub fn left_percent(snapshot: &StreamSnapshot, eval_ms: i64) -> f64 {
    stream_progress(snapshot, eval_ms, true).percentages.left
}

// ──────────────────────────────────────────────
// Timing
// ──────────────────────────────────────────────

/// Projected millisecond timestamp at which the balance runs out.
///
/// `None` while idling, since nothing accrues, and for a zero rate, which
/// never ends. The result lies in the past for a stream that has already
/// drained, finished or not. An end too far out for `u64` milliseconds
/// saturates at `u64::MAX`.
pub fn calculate_end_timestamp(snapshot: &StreamSnapshot) -> Option<u64> {
    if snapshot.is_idling() || snapshot.tokens_per_sec.is_zero() {
        return None;
    }

    let tokens_per_ms = &snapshot.tokens_per_sec / BigDecimal::from(units::MILLIS_PER_SECOND);
    let last_action_ms = units::nanos_to_millis_exact(snapshot.last_action);
    let time_to_complete_ms = &snapshot.balance / tokens_per_ms;

    let end_ms = (last_action_ms + time_to_complete_ms).with_scale(0);
    Some(end_ms.to_u64().unwrap_or(u64::MAX))
}

/// The cliff as a millisecond timestamp.
pub fn calculate_cliff_end_timestamp(snapshot: &StreamSnapshot) -> Option<u64> {
    snapshot.cliff.map(units::nanos_to_millis)
}

/// Cliff duration as a share of the whole stream duration.
fn calculate_cliff_percent(snapshot: &StreamSnapshot) -> Option<f64> {
    let cliff = snapshot.cliff?;
    let end_ms = calculate_end_timestamp(snapshot)?;

    let created_ms = units::nanos_to_millis_exact(snapshot.timestamp_created);
    let cliff_duration_ms = units::nanos_to_millis_exact(cliff) - &created_ms;
    let stream_duration_ms = BigDecimal::from(end_ms) - created_ms;

    if stream_duration_ms.is_zero() {
        return None;
    }
    (cliff_duration_ms * BigDecimal::from(100) / stream_duration_ms).to_f64()
}

/// Whole seconds until the remaining balance is streamed, capped at
/// [`MAX_SECONDS`]. A zero rate reads as the cap.
pub fn calculate_time_left(snapshot: &StreamSnapshot, eval_ms: i64, extrapolate: bool) -> u64 {
    if snapshot.tokens_per_sec.is_zero() {
        return MAX_SECONDS;
    }
    let available = if extrapolate {
        available_to_withdraw(snapshot, eval_ms)
    } else {
        BigDecimal::zero()
    };

    let remaining = &snapshot.balance - available;
    let seconds = std::cmp::min(
        BigDecimal::from(MAX_SECONDS),
        remaining / &snapshot.tokens_per_sec,
    );

    seconds.with_scale(0).to_u64().unwrap_or(0)
}

// ──────────────────────────────────────────────
// View
// ──────────────────────────────────────────────

/// Everything a stream card needs, evaluated at one timestamp.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StreamView {
    pub is_dead: bool,
    pub percentages: ProgressPercentages,
    pub seconds_left: u64,
    pub time_left: String,
    pub stream_end_timestamp: Option<u64>,
    pub cliff_end_timestamp: Option<u64>,
    pub progress: ProgressAmounts,
}

/// Build the full derived view of a snapshot.
pub fn stream_view(snapshot: &StreamSnapshot, eval_ms: i64, extrapolate: bool) -> StreamView {
    let StreamProgress {
        amounts,
        percentages,
    } = stream_progress(snapshot, eval_ms, extrapolate);
    let seconds_left = calculate_time_left(snapshot, eval_ms, extrapolate);

    StreamView {
        is_dead: snapshot.is_dead(),
        percentages,
        seconds_left,
        time_left: format_time_left(seconds_left.saturating_mul(1_000)),
        stream_end_timestamp: calculate_end_timestamp(snapshot),
        cliff_end_timestamp: calculate_cliff_end_timestamp(snapshot),
        progress: amounts,
    }
}
