//! # Weighted-Threshold Authorities
//!
//! An `Authority` is a weighted-threshold policy over public keys and
//! delegate accounts. It controls one permission level of an account
//! (owner / active / basic) or one management side of a content object
//! (master / comp).

use crate::entities::{is_valid_account_name, AccountName, PublicKey, Weight};
use crate::errors::ValidationError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A weighted-threshold policy over keys and delegate accounts.
///
/// The authority is satisfied when the summed weight of signing keys plus
/// recursively satisfied delegate accounts reaches `weight_threshold`.
///
/// A threshold of zero is trivially satisfied (`0 >= 0`). This "open
/// authority" behavior is preserved for chain compatibility; callers who
/// consider it a misconfiguration must reject it at creation time.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Authority {
    /// Minimum accumulated weight required to satisfy this authority.
    pub weight_threshold: u32,
    /// Delegate accounts and their weights. Satisfying a delegate's own
    /// active authority contributes that weight here.
    pub account_auths: BTreeMap<AccountName, Weight>,
    /// Directly authorized keys and their weights.
    pub key_auths: BTreeMap<PublicKey, Weight>,
}

impl Authority {
    pub fn new(weight_threshold: u32) -> Self {
        Authority {
            weight_threshold,
            ..Default::default()
        }
    }

    pub fn with_account(mut self, account: impl Into<AccountName>, weight: Weight) -> Self {
        self.account_auths.insert(account.into(), weight);
        self
    }

    pub fn with_key(mut self, key: PublicKey, weight: Weight) -> Self {
        self.key_auths.insert(key, weight);
        self
    }

    /// Structural validation: delegate names must be well formed and no
    /// entry may carry zero weight.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (name, weight) in &self.account_auths {
            if !is_valid_account_name(name) {
                return Err(ValidationError::InvalidAccountName(name.clone()));
            }
            if *weight == 0 {
                return Err(ValidationError::InvalidAuthority(format!(
                    "zero weight for account {name}"
                )));
            }
        }
        for (key, weight) in &self.key_auths {
            if *weight == 0 {
                return Err(ValidationError::InvalidAuthority(format!(
                    "zero weight for key {key}"
                )));
            }
        }
        Ok(())
    }

    /// True when the sum of all weights can never reach the threshold.
    /// Such an authority is permanently unsatisfiable.
    pub fn is_impossible(&self) -> bool {
        let total: u64 = self
            .account_auths
            .values()
            .chain(self.key_auths.values())
            .map(|w| u64::from(*w))
            .sum();
        total < u64::from(self.weight_threshold)
    }

    /// All keys directly referenced by this authority (one level, no
    /// delegate expansion).
    pub fn keys(&self) -> impl Iterator<Item = &PublicKey> {
        self.key_auths.keys()
    }

    pub fn num_auths(&self) -> usize {
        self.account_auths.len() + self.key_auths.len()
    }
}
