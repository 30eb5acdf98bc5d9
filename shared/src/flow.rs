//! One vote attempt from party selection to the remote increment.
//!
//! The flow never performs I/O itself. [`SubmissionFlow::confirm_vote`] hands
//! out a [`PendingVote`] ticket, the caller issues the increment for it and
//! feeds the outcome back through [`SubmissionFlow::resolve`]. Only one ticket
//! exists at a time, which is what keeps a double click from counting twice.

use std::fmt;
use thiserror::Error;
use time::OffsetDateTime;
use tracing::debug;
use uuid::Uuid;
use crate::directory::{VoteFailure, VoteMark};
use crate::gate::GateState;
use crate::models::Party;

#[derive(Debug, Clone, PartialEq)]
pub enum FlowState {
    Idle,
    PartySelected(Party),
    Submitting(Party),
    Succeeded(Party),
    Failed { party: Party, reason: VoteFailure },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowPhase {
    Idle,
    PartySelected,
    Submitting,
    Succeeded,
    Failed,
}

impl fmt::Display for FlowPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FlowPhase::Idle => "idle",
            FlowPhase::PartySelected => "a party is selected",
            FlowPhase::Submitting => "a vote is being submitted",
            FlowPhase::Succeeded => "the vote has been recorded",
            FlowPhase::Failed => "the last vote failed",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("cannot select a party while {0}")]
    SelectionLocked(FlowPhase),
    #[error("nothing to cancel while {0}")]
    NothingToCancel(FlowPhase),
}

/// Ticket for the single increment call allowed per confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingVote {
    attempt: u64,
    party_id: Uuid,
}

impl PendingVote {
    pub fn party_id(&self) -> Uuid {
        self.party_id
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionFlow {
    state: FlowState,
    attempts: u64,
}

impl Default for SubmissionFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl SubmissionFlow {
    pub fn new() -> Self {
        Self { state: FlowState::Idle, attempts: 0 }
    }

    pub fn state(&self) -> &FlowState {
        &self.state
    }

    pub fn phase(&self) -> FlowPhase {
        match self.state {
            FlowState::Idle => FlowPhase::Idle,
            FlowState::PartySelected(_) => FlowPhase::PartySelected,
            FlowState::Submitting(_) => FlowPhase::Submitting,
            FlowState::Succeeded(_) => FlowPhase::Succeeded,
            FlowState::Failed { .. } => FlowPhase::Failed,
        }
    }

    /// Party the current attempt is about, if any.
    pub fn target(&self) -> Option<&Party> {
        match &self.state {
            FlowState::Idle => None,
            FlowState::PartySelected(party)
            | FlowState::Submitting(party)
            | FlowState::Succeeded(party)
            | FlowState::Failed { party, .. } => Some(party),
        }
    }

    pub fn failure(&self) -> Option<&VoteFailure> {
        match &self.state {
            FlowState::Failed { reason, .. } => Some(reason),
            _ => None,
        }
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.state, FlowState::Submitting(_))
    }

    /// Allowed from `Idle` and after a failure. A closed gate does not block
    /// selection, only confirmation.
    pub fn select_party(&mut self, party: Party) -> Result<(), TransitionError> {
        match self.state {
            FlowState::Idle | FlowState::Failed { .. } => {
                self.state = FlowState::PartySelected(party);
                Ok(())
            }
            _ => Err(TransitionError::SelectionLocked(self.phase())),
        }
    }

    pub fn cancel(&mut self) -> Result<(), TransitionError> {
        match self.state {
            FlowState::PartySelected(_) => {
                self.state = FlowState::Idle;
                Ok(())
            }
            _ => Err(TransitionError::NothingToCancel(self.phase())),
        }
    }

    pub fn can_confirm(&self, gate: GateState) -> bool {
        gate.is_open() && matches!(self.state, FlowState::PartySelected(_))
    }

    /// Moves to `Submitting` and returns the ticket for the increment call.
    /// Returns `None`, changing nothing, when the gate is closed or no party
    /// is waiting for confirmation (including while a submission is in flight).
    pub fn confirm_vote(&mut self, gate: GateState) -> Option<PendingVote> {
        if !self.can_confirm(gate) {
            debug!(phase = %self.phase(), ?gate, "ignoring vote confirmation");
            return None;
        }

        let FlowState::PartySelected(party) = std::mem::replace(&mut self.state, FlowState::Idle) else {
            return None;
        };
        self.attempts += 1;
        let pending = PendingVote { attempt: self.attempts, party_id: party.id };
        self.state = FlowState::Submitting(party);
        Some(pending)
    }

    /// Applies the outcome of the increment issued for `pending`. The mark is
    /// written only on success and only after the call has resolved. Returns
    /// `false` when `pending` is not the submission currently in flight.
    pub fn resolve<M>(
        &mut self,
        pending: PendingVote,
        outcome: Result<Party, VoteFailure>,
        mark: &mut M,
        now: OffsetDateTime,
    ) -> bool
    where
        M: VoteMark + ?Sized,
    {
        let in_flight = match &self.state {
            FlowState::Submitting(party) => {
                pending.attempt == self.attempts && pending.party_id == party.id
            }
            _ => false,
        };
        if !in_flight {
            debug!(attempt = pending.attempt, "discarding stale vote outcome");
            return false;
        }

        let FlowState::Submitting(selected) = std::mem::replace(&mut self.state, FlowState::Idle) else {
            return false;
        };
        self.state = match outcome {
            Ok(updated) => {
                mark.write(now);
                FlowState::Succeeded(updated)
            }
            Err(reason) => FlowState::Failed { party: selected, reason },
        };
        true
    }

    /// Back to `Idle` once the confirmation view is gone. Ignored mid-submission.
    pub fn reset(&mut self) {
        if !self.is_submitting() {
            self.state = FlowState::Idle;
        }
    }
}
