//! # Authority Service
//!
//! Application service layer that implements the `AuthorityApi` trait.
//! Recovers signing keys from compact signatures, extracts the required
//! authorities from the transaction, and delegates to the domain layer.

use crate::domain::derive;
use crate::domain::errors::AuthorityError;
use crate::domain::keys;
use crate::domain::verify::{verify_authority, Approvals, ProtocolVersion};
use crate::ports::inbound::AuthorityApi;
use crate::ports::outbound::AuthorityResolver;
use shared_types::{ChainId, PublicKey, RequiredAuthorities, SignedTransaction};
use std::collections::BTreeSet;
use tracing::debug;

/// Authority verification service over a ledger resolver.
pub struct AuthorityService<R: AuthorityResolver> {
    resolver: R,
    chain_id: ChainId,
    max_recursion: u32,
}

impl<R: AuthorityResolver> AuthorityService<R> {
    pub fn new(resolver: R, chain_id: ChainId) -> Self {
        AuthorityService {
            resolver,
            chain_id,
            max_recursion: shared_types::MAX_SIG_CHECK_DEPTH,
        }
    }

    pub fn with_max_recursion(mut self, max_recursion: u32) -> Self {
        self.max_recursion = max_recursion;
        self
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }
}

impl<R: AuthorityResolver + Send + Sync> AuthorityApi for AuthorityService<R> {
    fn verify_transaction_authority(
        &self,
        tx: &SignedTransaction,
        version: ProtocolVersion,
    ) -> Result<(), AuthorityError> {
        let signature_keys = keys::signature_keys(tx, &self.chain_id)?;
        let required = tx.transaction.required_authorities();
        debug!(
            signatures = signature_keys.len(),
            active = required.active.len(),
            owner = required.owner.len(),
            basic = required.basic.len(),
            "verifying transaction authority"
        );
        verify_authority(
            version,
            &required,
            &signature_keys,
            &self.resolver,
            self.max_recursion,
            false,
            &Approvals::default(),
        )
    }

    fn required_signatures(
        &self,
        tx: &SignedTransaction,
        available_keys: &BTreeSet<PublicKey>,
    ) -> Result<BTreeSet<PublicKey>, AuthorityError> {
        let signature_keys = keys::signature_keys(tx, &self.chain_id)?;
        let required = tx.transaction.required_authorities();
        derive::required_signatures(
            &required,
            &signature_keys,
            available_keys,
            &self.resolver,
            self.max_recursion,
        )
    }

    fn potential_signatures(
        &self,
        tx: &SignedTransaction,
    ) -> Result<BTreeSet<PublicKey>, AuthorityError> {
        let signature_keys = keys::signature_keys(tx, &self.chain_id)?;
        let required = tx.transaction.required_authorities();
        derive::potential_signatures(
            &required,
            &signature_keys,
            &self.resolver,
            self.max_recursion,
        )
    }

    fn minimal_signatures(
        &self,
        tx: &SignedTransaction,
        available_keys: &BTreeSet<PublicKey>,
        version: ProtocolVersion,
    ) -> Result<BTreeSet<PublicKey>, AuthorityError> {
        let signature_keys = keys::signature_keys(tx, &self.chain_id)?;
        let required = tx.transaction.required_authorities();
        derive::minimize_required_signatures(
            version,
            &required,
            &signature_keys,
            available_keys,
            &self.resolver,
            self.max_recursion,
        )
    }

    fn verify_account_authority(
        &self,
        account: &str,
        signers: &BTreeSet<PublicKey>,
    ) -> Result<(), AuthorityError> {
        let mut required = RequiredAuthorities::default();
        required.active.insert(account.to_string());
        verify_authority(
            ProtocolVersion::V2,
            &required,
            signers,
            &self.resolver,
            self.max_recursion,
            true,
            &Approvals::default(),
        )
    }
}
