//! # Proposal Lifecycle Flows
//!
//! Multi-party authorization over time: proposals gather approvals across
//! separate updates, execute when complete, and honor veto, review
//! periods, and expiration.

#[cfg(test)]
mod tests {
    use crate::fixtures::{transfer, Actor, TestLedger};
    use ct_proposals::{ProposalError, ProposalService};
    use shared_types::{
        Authority, Operation, ProposalCreateOperation, ProposalDeleteOperation, ProposalId,
        ProposalUpdateOperation, Timestamp,
    };

    const NOW: Timestamp = Timestamp(1_000_000);
    const EXPIRY: Timestamp = Timestamp(1_000_600);

    fn proposal_of(ops: Vec<Operation>, review: Option<u32>) -> ProposalCreateOperation {
        ProposalCreateOperation {
            proposed_ops: ops,
            expiration_time: EXPIRY,
            review_period_seconds: review,
        }
    }

    fn approve_active(id: ProposalId, account: &str) -> ProposalUpdateOperation {
        ProposalUpdateOperation {
            proposal: id,
            active_approvals_to_add: [account.to_string()].into(),
            ..Default::default()
        }
    }

    /// Two-signer escrow: corp is governed 2-of-2 by alice and bob.
    fn escrow_service() -> ProposalService<TestLedger> {
        let alice = Actor::new("alice");
        let bob = Actor::new("bob");
        let mut ledger = TestLedger::new();
        ledger.add_actor(&alice);
        ledger.add_actor(&bob);
        let corp = Authority::new(2)
            .with_account("alice", 1)
            .with_account("bob", 1);
        ledger.add_account("corp", corp.clone(), corp.clone(), corp);
        ProposalService::new(ledger)
    }

    /// Test: approvals accumulate across updates and execution fires on
    /// the last one.
    #[test]
    fn test_approvals_accumulate_until_execution() {
        let mut service = escrow_service();
        let id = service
            .create(
                &proposal_of(
                    vec![transfer("alice", "bob"), transfer("bob", "alice")],
                    None,
                ),
                NOW,
            )
            .unwrap();

        service.update(&approve_active(id, "alice"), NOW).unwrap();
        assert!(service.ledger().applied.is_empty());
        assert_eq!(
            service
                .ledger()
                .proposals
                .get(&id)
                .unwrap()
                .available_active_approvals
                .len(),
            1
        );

        service.update(&approve_active(id, "bob"), NOW).unwrap();
        assert_eq!(service.ledger().applied.len(), 1);
        assert!(service.ledger().proposals.is_empty());
    }

    /// Test: a corporate account approves as itself; its governance
    /// structure stays out of the proposal's bookkeeping.
    #[test]
    fn test_corporate_account_approves_as_itself() {
        let mut service = escrow_service();
        let id = service
            .create(&proposal_of(vec![transfer("corp", "alice")], None), NOW)
            .unwrap();
        // corp itself is the only directly required approver.
        let proposal = service.ledger().proposals.get(&id).unwrap();
        assert!(proposal.required_active_approvals.contains("corp"));
        assert!(proposal.available_basic_approvals.is_empty());

        let op = ProposalUpdateOperation {
            proposal: id,
            active_approvals_to_add: ["corp".to_string()].into(),
            ..Default::default()
        };
        service.update(&op, NOW).unwrap();
        assert_eq!(service.ledger().applied.len(), 1);
    }

    /// Test: a required party vetoes; an outsider cannot.
    #[test]
    fn test_veto_rights() {
        let mut service = escrow_service();
        let id = service
            .create(&proposal_of(vec![transfer("corp", "alice")], None), NOW)
            .unwrap();

        let outsider = ProposalDeleteOperation {
            proposal: id,
            vetoer: "alice".to_string(),
            using_owner_authority: false,
        };
        // alice is corp's delegate, not a direct requirement; she cannot
        // veto corp's proposal.
        assert_eq!(
            service.veto(&outsider),
            Err(ProposalError::NotAVetoer("alice".into()))
        );

        let vetoer = ProposalDeleteOperation {
            proposal: id,
            vetoer: "corp".to_string(),
            using_owner_authority: false,
        };
        service.veto(&vetoer).unwrap();
        assert!(service.ledger().proposals.is_empty());
    }

    /// Test: the review period freezes approvals right after creation;
    /// once it passes, a fully approved proposal still waits for the
    /// expiration sweep and executes there.
    #[test]
    fn test_review_period_execution_at_expiry() {
        let mut service = escrow_service();
        let id = service
            .create(&proposal_of(vec![transfer("corp", "alice")], Some(300)), NOW)
            .unwrap();

        // Inside the opening review window approvals are frozen.
        let during_review = Timestamp(NOW.0 + 100);
        assert_eq!(
            service.update(&approve_active(id, "corp"), during_review),
            Err(ProposalError::ReviewPeriodActive(id))
        );

        let after_review = Timestamp(NOW.0 + 301);
        service
            .update(&approve_active(id, "corp"), after_review)
            .unwrap();
        assert!(service.ledger().applied.is_empty());

        assert_eq!(service.clear_expired(EXPIRY).unwrap(), 1);
        assert_eq!(service.ledger().applied.len(), 1);
    }

    /// Test: an under-approved proposal dies quietly at expiration.
    #[test]
    fn test_expiry_drops_incomplete_proposal() {
        let mut service = escrow_service();
        let id = service
            .create(
                &proposal_of(
                    vec![transfer("alice", "bob"), transfer("bob", "alice")],
                    None,
                ),
                NOW,
            )
            .unwrap();
        service.update(&approve_active(id, "alice"), NOW).unwrap();

        assert_eq!(service.clear_expired(EXPIRY).unwrap(), 1);
        assert!(service.ledger().applied.is_empty());
        assert!(service.ledger().proposals.is_empty());
    }

    /// Test: approving a proposed content takedown through the accounts
    /// behind the content's management authority.
    #[test]
    fn test_content_proposal_approved_by_label() {
        let label = Actor::new("label");
        let mut ledger = TestLedger::new();
        ledger.add_actor(&label);
        ledger.add_content(
            "ipfs://song",
            Authority::new(1).with_account("label", 1),
            Authority::new(1).with_account("label", 1),
        );
        let mut service = ProposalService::new(ledger);

        let disable = Operation::ContentDisable {
            url: "ipfs://song".to_string(),
        };
        let id = service.create(&proposal_of(vec![disable], None), NOW).unwrap();
        let proposal = service.ledger().proposals.get(&id).unwrap();
        assert!(proposal.required_active_approvals.contains("label"));

        service.update(&approve_active(id, "label"), NOW).unwrap();
        assert_eq!(service.ledger().applied.len(), 1);
    }

    /// Test: key approvals work like signatures on the proposed
    /// transaction.
    #[test]
    fn test_key_approval_executes_proposal() {
        let alice = Actor::new("alice");
        let mut ledger = TestLedger::new();
        ledger.add_actor(&alice);
        let mut service = ProposalService::new(ledger);

        let id = service
            .create(&proposal_of(vec![transfer("alice", "bob")], None), NOW)
            .unwrap();
        let op = ProposalUpdateOperation {
            proposal: id,
            key_approvals_to_add: [alice.public].into(),
            ..Default::default()
        };
        service.update(&op, NOW).unwrap();
        assert_eq!(service.ledger().applied.len(), 1);
    }

    /// Test: a failed execution leaves the proposal in place for another
    /// attempt before expiry.
    #[test]
    fn test_failed_execution_keeps_proposal_alive() {
        let mut service = escrow_service();
        let id = service
            .create(&proposal_of(vec![transfer("corp", "alice")], None), NOW)
            .unwrap();
        service.ledger_mut().fail_apply = true;
        service.update(&approve_active(id, "corp"), NOW).unwrap();
        assert!(service.ledger().proposals.contains_key(&id));

        service.ledger_mut().fail_apply = false;
        // A later no-op-ish change retriggers execution.
        let revoke_and_regrant = ProposalUpdateOperation {
            proposal: id,
            active_approvals_to_remove: ["corp".to_string()].into(),
            ..Default::default()
        };
        service.update(&revoke_and_regrant, NOW).unwrap();
        service.update(&approve_active(id, "corp"), NOW).unwrap();
        assert_eq!(service.ledger().applied.len(), 1);
    }
}
