//! # Proposal Service
//!
//! Drives the proposal lifecycle against a ledger: creation, approval
//! updates, veto, and the expiration sweep. The ledger provides authority
//! resolution, the proposal index, and transaction application through the
//! outbound ports.
//!
//! The service assumes the enclosing transaction's own authority has
//! already been verified; here only proposal semantics are enforced.

use crate::domain::entities::Proposal;
use crate::domain::errors::ProposalError;
use crate::domain::evaluator::build_proposal;
use crate::ports::outbound::{ProposalStore, TransactionApplier};
use ct_authority::AuthorityResolver;
use shared_types::{
    ProposalCreateOperation, ProposalDeleteOperation, ProposalId, ProposalUpdateOperation,
    Timestamp, MAX_PROPOSAL_LIFETIME_SECS, MAX_SIG_CHECK_DEPTH,
};
use tracing::{debug, info, warn};

/// Tunables of the proposal subsystem.
#[derive(Clone, Debug)]
pub struct ProposalConfig {
    /// Delegation depth followed when checking approvals.
    pub max_recursion: u32,
    /// Reject approval grants the proposal does not require, and double
    /// grants. Disable only to replay historic chains that tolerated them.
    pub strict_approvals: bool,
    /// Longest allowed distance from now to a proposal's expiration.
    pub max_proposal_lifetime_secs: u64,
}

impl Default for ProposalConfig {
    fn default() -> Self {
        ProposalConfig {
            max_recursion: MAX_SIG_CHECK_DEPTH,
            strict_approvals: true,
            max_proposal_lifetime_secs: MAX_PROPOSAL_LIFETIME_SECS,
        }
    }
}

/// Proposal lifecycle service over a ledger.
pub struct ProposalService<L> {
    ledger: L,
    config: ProposalConfig,
}

impl<L> ProposalService<L>
where
    L: AuthorityResolver + ProposalStore + TransactionApplier,
{
    pub fn new(ledger: L) -> Self {
        ProposalService {
            ledger,
            config: ProposalConfig::default(),
        }
    }

    pub fn with_config(ledger: L, config: ProposalConfig) -> Self {
        ProposalService { ledger, config }
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut L {
        &mut self.ledger
    }

    /// Create a proposal. Permissionless: anyone may propose, approvals
    /// come later.
    pub fn create(
        &mut self,
        op: &ProposalCreateOperation,
        now: Timestamp,
    ) -> Result<ProposalId, ProposalError> {
        if op.expiration_time <= now {
            return Err(ProposalError::ExpirationInPast);
        }
        if now.secs_until(op.expiration_time) > self.config.max_proposal_lifetime_secs {
            return Err(ProposalError::ExpirationTooFar);
        }
        if let Some(secs) = op.review_period_seconds {
            if u64::from(secs) >= now.secs_until(op.expiration_time) {
                return Err(ProposalError::InvalidReviewPeriod);
            }
        }

        let proposal = build_proposal(0, op, now, &self.ledger, self.config.max_recursion)?;
        let id = self.ledger.insert(proposal);
        info!(proposal = id, "proposal created");
        Ok(id)
    }

    /// Grant and revoke approvals, then execute the proposal if it became
    /// fully authorized and has no review period.
    pub fn update(
        &mut self,
        op: &ProposalUpdateOperation,
        now: Timestamp,
    ) -> Result<(), ProposalError> {
        let mut proposal = self.ledger.get(op.proposal)?;
        if proposal.is_expired(now) {
            // Expired proposals are as good as gone; the sweep will reap them.
            return Err(ProposalError::UnknownProposal(op.proposal));
        }

        let adding = !op.active_approvals_to_add.is_empty()
            || !op.owner_approvals_to_add.is_empty()
            || !op.key_approvals_to_add.is_empty();
        if adding && proposal.in_review_period(now) {
            return Err(ProposalError::ReviewPeriodActive(op.proposal));
        }

        if self.config.strict_approvals {
            for id in &op.active_approvals_to_add {
                if !proposal.required_active_approvals.contains(id) {
                    return Err(ProposalError::ApprovalNotRequired(id.clone()));
                }
                if proposal.available_active_approvals.contains(id) {
                    return Err(ProposalError::ApprovalAlreadyGranted(id.clone()));
                }
            }
            for id in &op.owner_approvals_to_add {
                // Owner authority implies active (and folded basic).
                if !proposal.required_owner_approvals.contains(id)
                    && !proposal.required_active_approvals.contains(id)
                {
                    return Err(ProposalError::ApprovalNotRequired(id.clone()));
                }
                if proposal.available_owner_approvals.contains(id) {
                    return Err(ProposalError::ApprovalAlreadyGranted(id.clone()));
                }
            }
            for key in &op.key_approvals_to_add {
                if proposal.available_key_approvals.contains(key) {
                    return Err(ProposalError::ApprovalAlreadyGranted(key.to_string()));
                }
            }
        }

        for id in &op.active_approvals_to_remove {
            if !proposal.available_active_approvals.remove(id) {
                return Err(ProposalError::ApprovalNotFound(id.clone()));
            }
        }
        for id in &op.owner_approvals_to_remove {
            if !proposal.available_owner_approvals.remove(id) {
                return Err(ProposalError::ApprovalNotFound(id.clone()));
            }
        }
        for key in &op.key_approvals_to_remove {
            if !proposal.available_key_approvals.remove(key) {
                return Err(ProposalError::ApprovalNotFound(key.to_string()));
            }
        }

        proposal
            .available_active_approvals
            .extend(op.active_approvals_to_add.iter().cloned());
        proposal
            .available_owner_approvals
            .extend(op.owner_approvals_to_add.iter().cloned());
        proposal
            .available_key_approvals
            .extend(op.key_approvals_to_add.iter().copied());

        self.ledger.update(proposal.clone())?;
        debug!(proposal = proposal.id, "proposal approvals updated");

        // With a review period, execution waits for the expiration sweep.
        if proposal.review_period_time.is_none() {
            self.try_execute(&proposal);
        }
        Ok(())
    }

    /// Veto a proposal. Any account whose authority the proposed
    /// transaction directly requires may veto; whether the vetoer signs
    /// with active or owner authority is decided by the enclosing
    /// transaction, not here.
    pub fn veto(&mut self, op: &ProposalDeleteOperation) -> Result<(), ProposalError> {
        let proposal = self.ledger.get(op.proposal)?;
        if !proposal.can_veto.contains(&op.vetoer) {
            return Err(ProposalError::NotAVetoer(op.vetoer.clone()));
        }
        self.ledger.remove(op.proposal)?;
        info!(proposal = op.proposal, vetoer = %op.vetoer, "proposal vetoed");
        Ok(())
    }

    /// Sweep expired proposals: execute the ones that gathered enough
    /// approvals, drop the rest. Returns how many were removed.
    pub fn clear_expired(&mut self, now: Timestamp) -> Result<usize, ProposalError> {
        let expired = self.ledger.expired(now);
        let count = expired.len();
        for proposal in expired {
            if proposal.is_authorized_to_execute(&self.ledger, self.config.max_recursion) {
                match self.ledger.apply(&proposal.proposed_transaction) {
                    Ok(()) => info!(proposal = proposal.id, "expiring proposal executed"),
                    Err(e) => warn!(
                        proposal = proposal.id,
                        error = %e,
                        "expiring proposal failed to apply"
                    ),
                }
            }
            self.ledger.remove(proposal.id)?;
        }
        Ok(count)
    }

    /// Execute the proposal if it is fully authorized. An application
    /// failure is logged and the proposal retained; approvals may still
    /// change before expiry.
    fn try_execute(&mut self, proposal: &Proposal) {
        if !proposal.is_authorized_to_execute(&self.ledger, self.config.max_recursion) {
            return;
        }
        match self.ledger.apply(&proposal.proposed_transaction) {
            Ok(()) => {
                info!(proposal = proposal.id, "proposal executed");
                if let Err(e) = self.ledger.remove(proposal.id) {
                    warn!(proposal = proposal.id, error = %e, "executed proposal was not stored");
                }
            }
            Err(e) => {
                warn!(
                    proposal = proposal.id,
                    error = %e,
                    "proposed transaction failed to apply; proposal retained"
                );
            }
        }
    }
}
