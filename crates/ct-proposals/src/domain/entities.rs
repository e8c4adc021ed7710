//! # Proposal Entity
//!
//! A proposal is a transaction held back from execution until enough
//! approvals accumulate. Approvals are granted and revoked by accounts and
//! keys over separate transactions, then replayed as pre-granted approvals
//! when checking whether the proposed transaction could execute.

use ct_authority::{verify_authority, Approvals, AuthorityResolver, ProtocolVersion};
use serde::{Deserialize, Serialize};
use shared_types::{AccountName, ProposalId, PublicKey, Timestamp, Transaction};
use std::collections::BTreeSet;

/// A proposed transaction and the approvals gathered so far.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    pub id: ProposalId,
    pub proposed_transaction: Transaction,
    pub expiration_time: Timestamp,
    /// End of the review period, if the proposal has one. The period opens
    /// at creation; until it passes no new approvals are accepted, and
    /// execution is deferred to the expiration sweep.
    pub review_period_time: Option<Timestamp>,

    /// Accounts whose active-level approval the proposal needs. Includes
    /// accounts folded in from content management authorities.
    pub required_active_approvals: BTreeSet<AccountName>,
    pub available_active_approvals: BTreeSet<AccountName>,
    pub required_owner_approvals: BTreeSet<AccountName>,
    pub available_owner_approvals: BTreeSet<AccountName>,
    /// Basic approvals cannot be granted through proposal updates; active
    /// approvals cover basic requirements. The set stays empty.
    pub available_basic_approvals: BTreeSet<AccountName>,
    pub available_key_approvals: BTreeSet<PublicKey>,

    /// Accounts entitled to veto the proposal: every account the proposed
    /// transaction directly requires, at any level, before content
    /// authorities are folded in.
    pub can_veto: BTreeSet<AccountName>,
}

impl Proposal {
    /// Whether the approvals gathered so far satisfy every authority the
    /// proposed transaction requires.
    ///
    /// Key approvals stand in for signatures; extra approvals are
    /// tolerated since approvals need not be minimal.
    pub fn is_authorized_to_execute(
        &self,
        resolver: &dyn AuthorityResolver,
        max_recursion: u32,
    ) -> bool {
        let required = self.proposed_transaction.required_authorities();
        let approvals = Approvals {
            basic: self.available_basic_approvals.clone(),
            active: self.available_active_approvals.clone(),
            owner: self.available_owner_approvals.clone(),
        };
        verify_authority(
            ProtocolVersion::V2,
            &required,
            &self.available_key_approvals,
            resolver,
            max_recursion,
            true,
            &approvals,
        )
        .is_ok()
    }

    pub fn is_expired(&self, now: Timestamp) -> bool {
        self.expiration_time <= now
    }

    /// True while the review period has not yet passed and additions are
    /// frozen.
    pub fn in_review_period(&self, now: Timestamp) -> bool {
        matches!(self.review_period_time, Some(end) if now <= end)
    }
}
