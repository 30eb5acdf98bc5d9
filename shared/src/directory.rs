use std::future::Future;
use async_trait::async_trait;
use futures::future::{select, Either};
use futures::pin_mut;
use serde::{Serialize, Deserialize};
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;
use crate::models::Party;

/// Why a vote (or a party listing) did not go through.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum VoteFailure {
    #[error("Could not reach the election server: {0}")]
    NetworkError(String),
    #[error("This party no longer exists")]
    NotFound,
    #[error("The server rejected the request: {0}")]
    ServerRejected(String),
}

impl VoteFailure {
    /// The server may or may not have counted the vote.
    pub fn is_ambiguous(&self) -> bool {
        matches!(self, VoteFailure::NetworkError(_))
    }
}

/// Remote store of parties. `?Send` so browser futures can implement it.
#[async_trait(?Send)]
pub trait PartyDirectory {
    async fn list_parties(&self) -> Result<Vec<Party>, VoteFailure>;

    /// Adds one vote and returns the updated record. Not idempotent.
    async fn increment_vote(&self, party_id: Uuid) -> Result<Party, VoteFailure>;
}

/// Durable client-side slot holding the time of the last successful vote.
pub trait VoteMark {
    fn read(&self) -> Option<OffsetDateTime>;
    fn write(&mut self, at: OffsetDateTime);
}

/// Mark that lives only as long as the process or page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryMark {
    last_vote: Option<OffsetDateTime>,
}

#[cfg(test)]
impl MemoryMark {
    pub fn at(last_vote: OffsetDateTime) -> Self {
        Self { last_vote: Some(last_vote) }
    }
}

impl VoteMark for MemoryMark {
    fn read(&self) -> Option<OffsetDateTime> {
        self.last_vote
    }

    fn write(&mut self, at: OffsetDateTime) {
        self.last_vote = Some(at);
    }
}

/// Races `call` against `deadline`. A deadline hit is reported as a network
/// error because the remote side may still have applied the call.
pub async fn bounded<T, F, D>(call: F, deadline: D) -> Result<T, VoteFailure>
where
    F: Future<Output = Result<T, VoteFailure>>,
    D: Future<Output = ()>,
{
    pin_mut!(call);
    pin_mut!(deadline);
    match select(call, deadline).await {
        Either::Left((result, _)) => result,
        Either::Right(((), _)) => Err(VoteFailure::NetworkError("request timed out".into())),
    }
}
