//! # Ledger Operations
//!
//! The closed sum type over every operation kind the chain supports, plus
//! required-authority extraction: each operation declares, by its own
//! semantics, which accounts need active / owner / basic approval and which
//! content objects need master / comp management approval.
//!
//! Extraction is a single exhaustive match so that adding an operation kind
//! without declaring its authorities is a compile error, not a silent gap.

use crate::authority::Authority;
use crate::entities::{is_valid_account_name, AccountName, ContentUrl, PublicKey, Timestamp};
use crate::errors::ValidationError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::warn;

/// Identifier of a proposal object in the proposal index.
pub type ProposalId = u64;

/// Which side of a content object a `ContentUpdate` edits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    /// Primary (recording) metadata, gated by the master management authority.
    Master,
    /// Companion (publishing) metadata, gated by the comp management authority.
    Publisher,
}

/// Creates a proposal wrapping `proposed_ops` for multi-party approval.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalCreateOperation {
    pub proposed_ops: Vec<Operation>,
    pub expiration_time: Timestamp,
    /// Cooling-off window before expiration during which no new approvals
    /// are accepted.
    pub review_period_seconds: Option<u32>,
}

/// Adds or revokes approvals on an existing proposal.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalUpdateOperation {
    pub proposal: ProposalId,
    pub active_approvals_to_add: BTreeSet<AccountName>,
    pub active_approvals_to_remove: BTreeSet<AccountName>,
    pub owner_approvals_to_add: BTreeSet<AccountName>,
    pub owner_approvals_to_remove: BTreeSet<AccountName>,
    pub key_approvals_to_add: BTreeSet<PublicKey>,
    pub key_approvals_to_remove: BTreeSet<PublicKey>,
}

/// Early veto of a proposal by one of its required authorities.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalDeleteOperation {
    pub proposal: ProposalId,
    pub vetoer: AccountName,
    /// Veto with the vetoer's owner authority instead of active.
    pub using_owner_authority: bool,
}

/// Every operation kind the chain supports.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    /// Curation vote on a content object.
    Vote {
        voter: AccountName,
        url: ContentUrl,
        weight: i16,
    },
    /// Initial publication of a content object.
    ContentPublish {
        uploader: AccountName,
        url: ContentUrl,
        track_meta: String,
        comp_meta: String,
        management: Authority,
        management_comp: Option<Authority>,
        playing_reward: u16,
        publishers_share: u16,
    },
    /// Edit of one side of a content object's metadata or management.
    ContentUpdate {
        url: ContentUrl,
        side: Side,
        new_track_meta: Option<String>,
        new_comp_meta: Option<String>,
        new_management: Option<Authority>,
        new_playing_reward: Option<u16>,
        new_publishers_share: Option<u16>,
    },
    /// Endorsement of a content object by a curator.
    ContentApprove {
        approver: AccountName,
        url: ContentUrl,
    },
    /// Takedown of a content object, gated by its master authority.
    ContentDisable { url: ContentUrl },
    Transfer {
        from: AccountName,
        to: AccountName,
        amount: u64,
        memo: String,
    },
    TransferToVesting {
        from: AccountName,
        to: AccountName,
        amount: u64,
    },
    WithdrawVesting {
        account: AccountName,
        vesting_shares: u64,
    },
    AccountCreate {
        creator: AccountName,
        new_account_name: AccountName,
        owner: Authority,
        active: Authority,
        basic: Authority,
        memo_key: Option<PublicKey>,
        json_metadata: String,
        fee: u64,
    },
    AccountUpdate {
        account: AccountName,
        owner: Option<Authority>,
        active: Option<Authority>,
        basic: Option<Authority>,
        memo_key: Option<PublicKey>,
        json_metadata: String,
    },
    Friendship {
        who: AccountName,
        whom: AccountName,
    },
    Unfriend {
        who: AccountName,
        whom: AccountName,
    },
    /// Claim of a genesis balance locked to a raw key rather than an
    /// account. The only operation requiring an ad-hoc "other" authority.
    BalanceClaim {
        deposit_to_account: AccountName,
        balance_id: u64,
        balance_owner_key: PublicKey,
        total_claimed: u64,
    },
    ProposalCreate(ProposalCreateOperation),
    ProposalUpdate(ProposalUpdateOperation),
    ProposalDelete(ProposalDeleteOperation),
}

/// The identities a transaction needs approval from, grouped by permission
/// level, plus ad-hoc authorities not tied to a named account.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequiredAuthorities {
    pub active: BTreeSet<AccountName>,
    pub owner: BTreeSet<AccountName>,
    pub basic: BTreeSet<AccountName>,
    pub master_content: BTreeSet<ContentUrl>,
    pub comp_content: BTreeSet<ContentUrl>,
    pub other: Vec<Authority>,
}

impl RequiredAuthorities {
    /// Fold the requirements of a sequence of operations. Deterministic and
    /// order-independent: the result is a set union.
    pub fn of_operations<'a>(ops: impl IntoIterator<Item = &'a Operation>) -> Self {
        let mut required = RequiredAuthorities::default();
        for op in ops {
            op.required_authorities(&mut required);
        }
        required
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
            && self.owner.is_empty()
            && self.basic.is_empty()
            && self.master_content.is_empty()
            && self.comp_content.is_empty()
            && self.other.is_empty()
    }
}

impl Operation {
    /// Contribute this operation's required identities to `out`.
    pub fn required_authorities(&self, out: &mut RequiredAuthorities) {
        match self {
            Operation::Vote { voter, .. } => {
                out.basic.insert(voter.clone());
            }
            Operation::ContentPublish { uploader, .. } => {
                out.active.insert(uploader.clone());
            }
            Operation::ContentUpdate {
                url,
                side,
                new_playing_reward,
                new_publishers_share,
                ..
            } => {
                // Reward splits affect both sides, so edits to them need
                // both management authorities.
                let affects_both =
                    new_playing_reward.is_some() || new_publishers_share.is_some();
                if *side == Side::Master || affects_both {
                    out.master_content.insert(url.clone());
                }
                if *side == Side::Publisher || affects_both {
                    out.comp_content.insert(url.clone());
                }
            }
            Operation::ContentApprove { approver, .. } => {
                out.basic.insert(approver.clone());
            }
            Operation::ContentDisable { url } => {
                out.master_content.insert(url.clone());
            }
            Operation::Transfer { from, .. } => {
                out.active.insert(from.clone());
            }
            Operation::TransferToVesting { from, .. } => {
                out.active.insert(from.clone());
            }
            Operation::WithdrawVesting { account, .. } => {
                out.active.insert(account.clone());
            }
            Operation::AccountCreate { creator, .. } => {
                out.active.insert(creator.clone());
            }
            Operation::AccountUpdate { account, owner, .. } => {
                // Changing the owner authority requires the owner key;
                // everything else is an active-level change.
                if owner.is_some() {
                    out.owner.insert(account.clone());
                } else {
                    out.active.insert(account.clone());
                }
            }
            Operation::Friendship { who, .. } => {
                out.basic.insert(who.clone());
            }
            Operation::Unfriend { who, .. } => {
                out.basic.insert(who.clone());
            }
            Operation::BalanceClaim {
                balance_owner_key, ..
            } => {
                out.other
                    .push(Authority::new(100).with_key(*balance_owner_key, 100));
            }
            // Proposal creation is permissionless; approvals are gathered
            // through subsequent updates.
            Operation::ProposalCreate(_) => {}
            Operation::ProposalUpdate(op) => {
                for id in op
                    .active_approvals_to_add
                    .iter()
                    .chain(&op.active_approvals_to_remove)
                {
                    out.active.insert(id.clone());
                }
                for id in op
                    .owner_approvals_to_add
                    .iter()
                    .chain(&op.owner_approvals_to_remove)
                {
                    out.owner.insert(id.clone());
                }
                let keys: BTreeSet<_> = op
                    .key_approvals_to_add
                    .iter()
                    .chain(&op.key_approvals_to_remove)
                    .copied()
                    .collect();
                if !keys.is_empty() {
                    let mut auth = Authority::new(keys.len() as u32);
                    for key in keys {
                        auth.key_auths.insert(key, 1);
                    }
                    out.other.push(auth);
                }
            }
            Operation::ProposalDelete(op) => {
                if op.using_owner_authority {
                    out.owner.insert(op.vetoer.clone());
                } else {
                    out.active.insert(op.vetoer.clone());
                }
            }
        }
    }

    /// Stateless validation of this operation's own fields.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            Operation::Vote { voter, weight, .. } => {
                check_name(voter)?;
                if *weight == 0 {
                    return Err(ValidationError::ZeroVoteWeight);
                }
                Ok(())
            }
            Operation::ContentPublish {
                uploader,
                management,
                management_comp,
                ..
            } => {
                check_name(uploader)?;
                management.validate()?;
                if let Some(comp) = management_comp {
                    comp.validate()?;
                }
                Ok(())
            }
            Operation::ContentUpdate {
                new_track_meta,
                new_comp_meta,
                new_management,
                new_playing_reward,
                new_publishers_share,
                ..
            } => {
                if new_track_meta.is_none()
                    && new_comp_meta.is_none()
                    && new_management.is_none()
                    && new_playing_reward.is_none()
                    && new_publishers_share.is_none()
                {
                    return Err(ValidationError::EmptyContentUpdate);
                }
                if let Some(auth) = new_management {
                    auth.validate()?;
                }
                Ok(())
            }
            Operation::ContentApprove { approver, .. } => check_name(approver),
            Operation::ContentDisable { .. } => Ok(()),
            Operation::Transfer {
                from, to, amount, ..
            }
            | Operation::TransferToVesting { from, to, amount } => {
                check_name(from)?;
                check_name(to)?;
                if *amount == 0 {
                    return Err(ValidationError::NonPositiveAmount);
                }
                Ok(())
            }
            Operation::WithdrawVesting { account, .. } => check_name(account),
            Operation::AccountCreate {
                creator,
                new_account_name,
                owner,
                active,
                basic,
                json_metadata,
                ..
            } => {
                check_name(creator)?;
                check_name(new_account_name)?;
                owner.validate()?;
                active.validate()?;
                basic.validate()?;
                check_owner_possible(new_account_name, owner)?;
                warn_if_impossible(new_account_name, "active", active);
                warn_if_impossible(new_account_name, "basic", basic);
                check_metadata(json_metadata)
            }
            Operation::AccountUpdate {
                account,
                owner,
                active,
                basic,
                json_metadata,
                ..
            } => {
                check_name(account)?;
                if let Some(auth) = owner {
                    auth.validate()?;
                    check_owner_possible(account, auth)?;
                }
                if let Some(auth) = active {
                    auth.validate()?;
                    warn_if_impossible(account, "active", auth);
                }
                if let Some(auth) = basic {
                    auth.validate()?;
                    warn_if_impossible(account, "basic", auth);
                }
                check_metadata(json_metadata)
            }
            Operation::Friendship { who, whom } | Operation::Unfriend { who, whom } => {
                check_name(who)?;
                check_name(whom)
            }
            Operation::BalanceClaim {
                deposit_to_account, ..
            } => check_name(deposit_to_account),
            Operation::ProposalCreate(op) => {
                if op.proposed_ops.is_empty() {
                    return Err(ValidationError::EmptyProposal);
                }
                for proposed in &op.proposed_ops {
                    proposed.validate()?;
                }
                Ok(())
            }
            Operation::ProposalUpdate(op) => {
                if op.active_approvals_to_add.is_empty()
                    && op.active_approvals_to_remove.is_empty()
                    && op.owner_approvals_to_add.is_empty()
                    && op.owner_approvals_to_remove.is_empty()
                    && op.key_approvals_to_add.is_empty()
                    && op.key_approvals_to_remove.is_empty()
                {
                    return Err(ValidationError::EmptyProposalUpdate);
                }
                check_disjoint(&op.active_approvals_to_add, &op.active_approvals_to_remove)?;
                check_disjoint(&op.owner_approvals_to_add, &op.owner_approvals_to_remove)?;
                if let Some(key) = op
                    .key_approvals_to_add
                    .intersection(&op.key_approvals_to_remove)
                    .next()
                {
                    return Err(ValidationError::ConflictingApprovalDelta(key.to_string()));
                }
                Ok(())
            }
            Operation::ProposalDelete(op) => check_name(&op.vetoer),
        }
    }
}

fn check_name(name: &str) -> Result<(), ValidationError> {
    if is_valid_account_name(name) {
        Ok(())
    } else {
        Err(ValidationError::InvalidAccountName(name.to_string()))
    }
}

fn check_metadata(metadata: &str) -> Result<(), ValidationError> {
    if metadata.is_empty() || serde_json::from_str::<serde_json::Value>(metadata).is_ok() {
        Ok(())
    } else {
        Err(ValidationError::InvalidMetadata)
    }
}

fn check_owner_possible(account: &str, owner: &Authority) -> Result<(), ValidationError> {
    if owner.is_impossible() {
        Err(ValidationError::ImpossibleOwnerAuthority(account.to_string()))
    } else {
        Ok(())
    }
}

fn warn_if_impossible(account: &str, level: &str, auth: &Authority) {
    if auth.is_impossible() {
        warn!(account, level, "authority can never be satisfied");
    }
}

fn check_disjoint(
    add: &BTreeSet<AccountName>,
    remove: &BTreeSet<AccountName>,
) -> Result<(), ValidationError> {
    if let Some(id) = add.intersection(remove).next() {
        Err(ValidationError::ConflictingApprovalDelta(id.clone()))
    } else {
        Ok(())
    }
}
