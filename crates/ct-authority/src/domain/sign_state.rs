//! # Sign State
//!
//! Working state of one authority verification pass. Tracks which provided
//! keys have contributed weight to some satisfied authority and which
//! delegate accounts have already been approved, so that recursive
//! delegation never double-counts and unused signatures can be detected
//! afterwards.

use super::errors::AuthorityError;
use shared_types::{AccountName, Authority, PublicKey};
use std::collections::{BTreeMap, BTreeSet};

/// Resolves a delegate account name to the authority that governs it at the
/// level of the current verification pass.
pub type AuthorityGetter<'a> = dyn Fn(&str) -> Result<Authority, AuthorityError> + 'a;

/// Mutable state threaded through one verification or derivation pass.
pub struct SignState<'a> {
    /// Provided keys, each flagged once it contributes to a satisfied
    /// authority. Keys admitted from `available_keys` are added lazily.
    provided_signatures: BTreeMap<PublicKey, bool>,
    /// Accounts whose authority has already been satisfied in this pass,
    /// either recursively or by an externally granted approval.
    approved_by: BTreeSet<AccountName>,
    /// Candidate keys that may be drawn on in addition to the provided
    /// ones. Used when deriving which signatures a wallet should produce.
    available_keys: &'a BTreeSet<PublicKey>,
    get_authority: &'a AuthorityGetter<'a>,
    max_recursion: u32,
}

impl<'a> SignState<'a> {
    pub fn new(
        provided: BTreeSet<PublicKey>,
        get_authority: &'a AuthorityGetter<'a>,
        available_keys: &'a BTreeSet<PublicKey>,
        max_recursion: u32,
    ) -> Self {
        SignState {
            provided_signatures: provided.into_iter().map(|k| (k, false)).collect(),
            approved_by: BTreeSet::new(),
            available_keys,
            get_authority,
            max_recursion,
        }
    }

    /// Grant an account's approval without any signature, as when an
    /// approval was recorded on a proposal earlier.
    pub fn approve(&mut self, account: impl Into<AccountName>) {
        self.approved_by.insert(account.into());
    }

    pub fn is_approved(&self, account: &str) -> bool {
        self.approved_by.contains(account)
    }

    /// True if `key` can contribute weight: either it was provided, or it is
    /// in the available pool and gets promoted into the provided set. Either
    /// way the key is marked used.
    fn signed_by(&mut self, key: &PublicKey) -> bool {
        if let Some(used) = self.provided_signatures.get_mut(key) {
            *used = true;
            return true;
        }
        if self.available_keys.contains(key) {
            self.provided_signatures.insert(*key, true);
            return true;
        }
        false
    }

    /// Check an account's authority by name, honoring approvals already
    /// granted in this pass.
    pub fn check_authority_by_name(&mut self, account: &str) -> Result<bool, AuthorityError> {
        if self.approved_by.contains(account) {
            return Ok(true);
        }
        let auth = (self.get_authority)(account)?;
        self.check_authority(&auth, 0)
    }

    /// Check a weighted-threshold authority against the signing keys,
    /// recursing into delegate accounts up to the configured depth.
    ///
    /// Keys are consumed greedily: every matching key is marked used even
    /// when the threshold was already reached, mirroring how weight
    /// accumulation walks the full key list.
    pub fn check_authority(
        &mut self,
        auth: &Authority,
        depth: u32,
    ) -> Result<bool, AuthorityError> {
        let threshold = u64::from(auth.weight_threshold);
        let mut total: u64 = 0;

        for (key, weight) in &auth.key_auths {
            if self.signed_by(key) {
                total += u64::from(*weight);
                if total >= threshold {
                    return Ok(true);
                }
            }
        }

        for (account, weight) in &auth.account_auths {
            if !self.approved_by.contains(account) {
                if depth == self.max_recursion {
                    continue;
                }
                let delegate = (self.get_authority)(account)?;
                if self.check_authority(&delegate, depth + 1)? {
                    self.approved_by.insert(account.clone());
                } else {
                    continue;
                }
            }
            total += u64::from(*weight);
            if total >= threshold {
                return Ok(true);
            }
        }

        // A zero threshold is trivially satisfied.
        Ok(total >= threshold)
    }

    /// Drop every provided key that contributed to no satisfied authority.
    /// Returns true if anything was removed.
    pub fn remove_unused_signatures(&mut self) -> bool {
        let unused: Vec<PublicKey> = self
            .provided_signatures
            .iter()
            .filter(|(_, used)| !**used)
            .map(|(key, _)| *key)
            .collect();
        for key in &unused {
            self.provided_signatures.remove(key);
        }
        !unused.is_empty()
    }

    /// Keys currently in the provided set, in key order.
    pub fn provided_keys(&self) -> impl Iterator<Item = &PublicKey> {
        self.provided_signatures.keys()
    }
}
