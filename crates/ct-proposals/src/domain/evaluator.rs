//! # Proposal Construction
//!
//! Turns a `ProposalCreateOperation` into a `Proposal`: validates the
//! wrapped transaction, derives the approval requirements, and folds
//! content management authorities down to the accounts that can actually
//! grant approvals.

use super::entities::Proposal;
use super::errors::ProposalError;
use ct_authority::AuthorityResolver;
use shared_types::{
    AccountName, Authority, Operation, ProposalCreateOperation, ProposalId, Timestamp, Transaction,
};
use std::collections::BTreeSet;

pub fn is_proposal_operation(op: &Operation) -> bool {
    matches!(
        op,
        Operation::ProposalCreate(_) | Operation::ProposalUpdate(_) | Operation::ProposalDelete(_)
    )
}

/// Fold the accounts reachable through an authority's delegation graph
/// into `out`. An account is included when its active authority holds keys
/// of its own, so an approval by it is meaningful.
pub fn collect_authority_accounts(
    auth: &Authority,
    resolver: &dyn AuthorityResolver,
    depth: u32,
    max_recursion: u32,
    out: &mut BTreeSet<AccountName>,
) -> Result<(), ProposalError> {
    for account in auth.account_auths.keys() {
        let active = resolver.active_authority(account)?;
        if !active.key_auths.is_empty() {
            out.insert(account.clone());
        }
        if depth < max_recursion {
            collect_authority_accounts(&active, resolver, depth + 1, max_recursion, out)?;
        }
    }
    Ok(())
}

/// Build a proposal from a create operation.
///
/// Veto rights are fixed here from the transaction's direct requirements;
/// the folding of content authorities that follows only widens who can
/// approve, never who can veto.
pub fn build_proposal(
    id: ProposalId,
    op: &ProposalCreateOperation,
    now: Timestamp,
    resolver: &dyn AuthorityResolver,
    max_recursion: u32,
) -> Result<Proposal, ProposalError> {
    if op.proposed_ops.iter().any(is_proposal_operation) {
        return Err(ProposalError::NestedProposal);
    }

    let proposed_transaction = Transaction {
        operations: op.proposed_ops.clone(),
        expiration: op.expiration_time,
    };
    proposed_transaction.validate()?;

    let required = proposed_transaction.required_authorities();

    let can_veto: BTreeSet<AccountName> = required
        .active
        .iter()
        .chain(&required.owner)
        .chain(&required.basic)
        .cloned()
        .collect();

    // An active or owner requirement of the same account already covers
    // its basic one.
    let required_basic: BTreeSet<AccountName> = required
        .basic
        .iter()
        .filter(|id| !required.active.contains(*id) && !required.owner.contains(*id))
        .cloned()
        .collect();

    // Basic-level proposals must stand alone: the verification engine
    // rejects mixed levels, so a mixed proposal could never execute.
    if !required_basic.is_empty()
        && (!required.active.is_empty()
            || !required.owner.is_empty()
            || !required.master_content.is_empty()
            || !required.comp_content.is_empty()
            || !required.other.is_empty())
    {
        return Err(ProposalError::MixedApprovalRequirements);
    }

    // Basic requirements are covered by active approvals, so they surface
    // as active approval requirements.
    let mut required_active: BTreeSet<AccountName> = required
        .active
        .iter()
        .chain(&required_basic)
        .cloned()
        .collect();

    // Content objects cannot approve; the accounts behind their management
    // authorities approve in their place.
    for url in &required.master_content {
        let auth = resolver.master_authority(url)?;
        collect_authority_accounts(&auth, resolver, 0, max_recursion, &mut required_active)?;
    }
    for url in &required.comp_content {
        let auth = resolver.comp_authority(url)?;
        collect_authority_accounts(&auth, resolver, 0, max_recursion, &mut required_active)?;
    }

    let required_owner = required.owner.clone();
    let required_active = &required_active - &required_owner;

    // The review period opens at creation; approvals may only be added
    // once it has passed.
    let review_period_time = op
        .review_period_seconds
        .map(|secs| now.saturating_add_secs(u64::from(secs)));

    Ok(Proposal {
        id,
        proposed_transaction,
        expiration_time: op.expiration_time,
        review_period_time,
        required_active_approvals: required_active,
        available_active_approvals: BTreeSet::new(),
        required_owner_approvals: required_owner,
        available_owner_approvals: BTreeSet::new(),
        available_basic_approvals: BTreeSet::new(),
        available_key_approvals: BTreeSet::new(),
        can_veto,
    })
}
