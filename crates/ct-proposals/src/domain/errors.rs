//! # Proposal Errors

use ct_authority::AuthorityError;
use shared_types::{ProposalId, ValidationError};
use thiserror::Error;

/// Errors from proposal creation, approval updates, veto, and expiry.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProposalError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Authority(#[from] AuthorityError),

    /// The referenced proposal does not exist (or was already executed,
    /// vetoed, or expired).
    #[error("Unknown proposal: {0}")]
    UnknownProposal(ProposalId),

    /// A proposal must expire in the future.
    #[error("Proposal expiration is in the past")]
    ExpirationInPast,

    /// A proposal may live at most four weeks.
    #[error("Proposal expiration is too far in the future")]
    ExpirationTooFar,

    /// The review period must fit inside the proposal's lifetime.
    #[error("Review period does not fit inside the proposal lifetime")]
    InvalidReviewPeriod,

    /// Proposals cannot wrap proposal operations.
    #[error("Proposed transaction contains a proposal operation")]
    NestedProposal,

    /// Operations requiring basic approval cannot be proposed together
    /// with operations requiring any other authority level.
    #[error("Cannot combine operations requiring basic approval with others")]
    MixedApprovalRequirements,

    /// No new approvals may be added once the review period has begun.
    #[error("Proposal {0} is in its review period")]
    ReviewPeriodActive(ProposalId),

    /// Tried to grant an approval the proposal does not require.
    #[error("Approval of {0} is not required by this proposal")]
    ApprovalNotRequired(String),

    /// Tried to grant an approval that was already granted.
    #[error("Approval of {0} was already granted")]
    ApprovalAlreadyGranted(String),

    /// Tried to revoke an approval that was never granted.
    #[error("Approval of {0} was never granted")]
    ApprovalNotFound(String),

    /// The vetoing account holds no authority required by the proposal.
    #[error("Account {0} is not authorized to veto this proposal")]
    NotAVetoer(String),
}
