pub mod error;
pub mod models;
pub mod validation;
pub mod user_info;
pub mod gate;
pub mod flow;
pub mod directory;
pub mod results;

pub use error::ErrorResponse;
pub use models::*;
pub use validation::*;
pub use user_info::*;
pub use gate::{EligibilityGate, GateChange, GateState, ClockAnomaly, COOLDOWN_SECONDS, read_mark};
pub use flow::{SubmissionFlow, FlowState, FlowPhase, PendingVote, TransitionError};
pub use directory::{PartyDirectory, VoteMark, MemoryMark, VoteFailure, bounded};

#[cfg(test)]
mod tests;
