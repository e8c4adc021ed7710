//! # Outbound Ports (Driven Ports / SPI)
//!
//! Dependencies of the proposal subsystem: the proposal index and the
//! machinery that applies a fully approved transaction to the ledger.

use crate::domain::entities::Proposal;
use crate::domain::errors::ProposalError;
use shared_types::{ProposalId, Timestamp, Transaction};
use thiserror::Error;

/// Failure while applying an approved proposed transaction.
///
/// Application failures never unwind proposal bookkeeping: the proposal
/// keeps (or loses) its slot according to the lifecycle, not according to
/// whether the wrapped transaction succeeded.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Failed to apply proposed transaction: {0}")]
pub struct ApplyError(pub String);

/// The proposal index.
pub trait ProposalStore {
    /// Insert a new proposal under a fresh id and return that id.
    fn insert(&mut self, proposal: Proposal) -> ProposalId;

    fn get(&self, id: ProposalId) -> Result<Proposal, ProposalError>;

    /// Replace the stored proposal carrying `proposal.id`.
    fn update(&mut self, proposal: Proposal) -> Result<(), ProposalError>;

    fn remove(&mut self, id: ProposalId) -> Result<(), ProposalError>;

    /// Proposals whose expiration time has passed, oldest expiration first.
    fn expired(&self, now: Timestamp) -> Vec<Proposal>;
}

/// Applies a proposed transaction to the ledger once it is fully approved.
pub trait TransactionApplier {
    fn apply(&mut self, tx: &Transaction) -> Result<(), ApplyError>;
}
