//! # Authority Errors
//!
//! Error taxonomy for authority verification. The four `Missing*Authority`
//! variants are the recoverable outcomes of a verification pass; everything
//! else reports malformed input or missing ledger objects.

use thiserror::Error;

/// Errors that can occur while verifying authorities or deriving signatures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthorityError {
    /// A referenced account does not exist in the ledger.
    #[error("Unknown account: {0}")]
    UnknownAccount(String),

    /// A referenced content object does not exist in the ledger.
    #[error("Unknown content: {0}")]
    UnknownContent(String),

    /// The provided signatures do not satisfy an active-level requirement.
    ///
    /// Also raised for unsatisfied content management authorities, carrying
    /// the content URL instead of an account name.
    #[error("Missing required active authority of {0}")]
    MissingActiveAuthority(String),

    /// The provided signatures do not satisfy an owner-level requirement.
    #[error("Missing required owner authority of {0}")]
    MissingOwnerAuthority(String),

    /// The provided signatures do not satisfy a basic-level requirement.
    #[error("Missing required basic authority of {0}")]
    MissingBasicAuthority(String),

    /// The provided signatures do not satisfy an ad-hoc authority.
    #[error("Missing required other authority")]
    MissingOtherAuthority,

    /// A signature that contributed to no required authority.
    #[error("Transaction carries an irrelevant signature")]
    IrrelevantSignature,

    /// The same key signed the transaction more than once.
    #[error("Duplicate signature")]
    DuplicateSignature,

    /// A signature failed to parse or recover a public key.
    #[error("Invalid signature")]
    InvalidSignature,

    /// The caller requested an unsupported verification protocol version.
    #[error("Invalid protocol version: {0}")]
    InvalidProtocolVersion(u32),

    /// A transaction mixes basic-level operations with higher-level ones.
    ///
    /// Basic operations must travel in their own transaction so that a
    /// low-privilege signature can never ride along with an active or
    /// owner grant.
    #[error("Transaction mixes basic operations with higher authority levels")]
    MixedAuthorityLevels,
}
