//! # Inbound Ports (Driving Ports / API)
//!
//! The public API of the authority subsystem: transaction verification and
//! the wallet-facing signature-set queries.

use crate::domain::errors::AuthorityError;
use crate::domain::verify::ProtocolVersion;
use shared_types::{PublicKey, SignedTransaction};
use std::collections::BTreeSet;

/// Primary authority verification API.
///
/// Implementations must be thread-safe (`Send + Sync`).
pub trait AuthorityApi: Send + Sync {
    /// Verify that a transaction's signatures satisfy every authority its
    /// operations require.
    fn verify_transaction_authority(
        &self,
        tx: &SignedTransaction,
        version: ProtocolVersion,
    ) -> Result<(), AuthorityError>;

    /// The subset of `available_keys` that must additionally sign `tx`,
    /// given the signatures it already carries.
    fn required_signatures(
        &self,
        tx: &SignedTransaction,
        available_keys: &BTreeSet<PublicKey>,
    ) -> Result<BTreeSet<PublicKey>, AuthorityError>;

    /// Every key that could contribute a relevant signature to `tx`.
    fn potential_signatures(
        &self,
        tx: &SignedTransaction,
    ) -> Result<BTreeSet<PublicKey>, AuthorityError>;

    /// A minimal subset of `available_keys` sufficient to authorize `tx`.
    fn minimal_signatures(
        &self,
        tx: &SignedTransaction,
        available_keys: &BTreeSet<PublicKey>,
        version: ProtocolVersion,
    ) -> Result<BTreeSet<PublicKey>, AuthorityError>;

    /// Verify that `signers` could authorize an active-level operation of
    /// `account`. Used by wallets to sanity-check imported keys.
    fn verify_account_authority(
        &self,
        account: &str,
        signers: &BTreeSet<PublicKey>,
    ) -> Result<(), AuthorityError>;
}
