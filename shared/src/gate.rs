//! Re-vote cooldown.
//!
//! A client that has just voted must wait [`COOLDOWN_SECONDS`] before it can
//! vote again. The gate only ever looks at the locally stored mark and the
//! current time, so it is pacing for the UI and nothing more: clearing the
//! browser storage reopens it.

use thiserror::Error;
use time::{Duration, OffsetDateTime};
use tracing::debug;

pub const COOLDOWN_SECONDS: i64 = 25;
pub const COOLDOWN: Duration = Duration::seconds(COOLDOWN_SECONDS);

const NANOS_PER_SECOND: i128 = 1_000_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Open,
    Closed { remaining_seconds: u32 },
}

impl GateState {
    pub fn is_open(&self) -> bool {
        matches!(self, GateState::Open)
    }

    pub fn remaining_seconds(&self) -> u32 {
        match self {
            GateState::Open => 0,
            GateState::Closed { remaining_seconds } => *remaining_seconds,
        }
    }

    /// How much of the cooldown has already passed, in percent.
    pub fn cooldown_progress(&self) -> u8 {
        match self {
            GateState::Open => 0,
            GateState::Closed { remaining_seconds } => {
                let remaining = i64::from(*remaining_seconds).min(COOLDOWN_SECONDS);
                ((COOLDOWN_SECONDS - remaining) * 100 / COOLDOWN_SECONDS) as u8
            }
        }
    }
}

/// Local timestamp that cannot be trusted. Always resolved as an open gate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClockAnomaly {
    #[error("last vote is {0} in the future")]
    FutureTimestamp(Duration),
    #[error("stored vote mark {0:?} is not a timestamp")]
    Malformed(String),
}

pub fn evaluate(last_vote: Option<OffsetDateTime>, now: OffsetDateTime) -> GateState {
    let Some(last_vote) = last_vote else {
        return GateState::Open;
    };

    let elapsed = now - last_vote;
    if elapsed.is_negative() {
        debug!("{}; gate stays open", ClockAnomaly::FutureTimestamp(-elapsed));
        return GateState::Open;
    }
    if elapsed >= COOLDOWN {
        return GateState::Open;
    }

    let remaining = (COOLDOWN - elapsed).whole_nanoseconds();
    let remaining_seconds = (remaining + NANOS_PER_SECOND - 1) / NANOS_PER_SECOND;
    GateState::Closed { remaining_seconds: remaining_seconds as u32 }
}

/// Stored form of a vote mark: Unix epoch milliseconds.
pub fn format_mark(at: OffsetDateTime) -> String {
    (at.unix_timestamp_nanos() / 1_000_000).to_string()
}

pub fn parse_mark(raw: &str) -> Result<OffsetDateTime, ClockAnomaly> {
    let malformed = || ClockAnomaly::Malformed(raw.to_string());
    let millis: i64 = raw.trim().parse().map_err(|_| malformed())?;
    OffsetDateTime::from_unix_timestamp_nanos(i128::from(millis) * 1_000_000)
        .map_err(|_| malformed())
}

/// Reads a stored mark for [`evaluate`]. Anything unparseable counts as no
/// mark at all, which leaves the gate open.
pub fn read_mark(raw: Option<&str>) -> Option<OffsetDateTime> {
    match parse_mark(raw?) {
        Ok(at) => Some(at),
        Err(anomaly) => {
            debug!("{}; gate stays open", anomaly);
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateChange {
    Unchanged,
    Closed,
    Reopened,
}

/// Remembers the last evaluation so the countdown can report the moment it
/// reopens. Refreshed once per second by the UI while closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EligibilityGate {
    state: GateState,
}

impl Default for EligibilityGate {
    fn default() -> Self {
        Self { state: GateState::Open }
    }
}

impl EligibilityGate {
    pub fn new(last_vote: Option<OffsetDateTime>, now: OffsetDateTime) -> Self {
        Self { state: evaluate(last_vote, now) }
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    pub fn refresh(&mut self, last_vote: Option<OffsetDateTime>, now: OffsetDateTime) -> GateChange {
        let next = evaluate(last_vote, now);
        let change = match (self.state.is_open(), next.is_open()) {
            (false, true) => GateChange::Reopened,
            (true, false) => GateChange::Closed,
            _ => GateChange::Unchanged,
        };
        self.state = next;
        change
    }
}
