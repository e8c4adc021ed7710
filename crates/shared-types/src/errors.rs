//! # Validation Errors
//!
//! Errors raised while statically validating protocol objects, before any
//! ledger state is consulted.

use thiserror::Error;

/// Errors from `Authority`, `Operation`, and `Transaction` validation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A transaction must contain at least one operation.
    #[error("Transaction contains no operations")]
    EmptyTransaction,

    /// An account name does not satisfy the chain's naming rules.
    #[error("Invalid account name: {0}")]
    InvalidAccountName(String),

    /// An authority is structurally invalid (bad delegate name, zero weight).
    #[error("Invalid authority: {0}")]
    InvalidAuthority(String),

    /// An owner authority whose weights can never reach its threshold.
    ///
    /// Rejected outright: a locked owner authority makes the account
    /// unrecoverable. The same condition on active/basic authorities is
    /// only logged.
    #[error("Owner authority of {0} can never be satisfied")]
    ImpossibleOwnerAuthority(String),

    /// An amount field must be positive.
    #[error("Amount must be positive")]
    NonPositiveAmount,

    /// A vote weight of zero changes nothing.
    #[error("Vote weight must be nonzero")]
    ZeroVoteWeight,

    /// Account metadata must be valid JSON when present.
    #[error("Metadata is not valid JSON")]
    InvalidMetadata,

    /// A proposal must propose at least one operation.
    #[error("Proposal contains no operations")]
    EmptyProposal,

    /// A proposal update must change at least one approval set.
    #[error("Proposal update changes nothing")]
    EmptyProposalUpdate,

    /// The same identity appears in both the add and remove set of one
    /// proposal update.
    #[error("Approval of {0} both added and removed")]
    ConflictingApprovalDelta(String),

    /// A content update must change at least one field.
    #[error("Content update changes nothing")]
    EmptyContentUpdate,
}
