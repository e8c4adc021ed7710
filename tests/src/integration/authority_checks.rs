//! # Authority Verification Flows
//!
//! End-to-end checks: sign a transaction with real keys, recover the
//! signers, and verify them against weighted-threshold authorities.

#[cfg(test)]
mod tests {
    use crate::fixtures::{sign, transaction, transfer, Actor, TestLedger, CHAIN_ID};
    use ct_authority::{AuthorityApi, AuthorityError, AuthorityService, ProtocolVersion};
    use shared_types::{Authority, CompactSignature, Operation, SignedTransaction};

    fn verify(
        service: &AuthorityService<TestLedger>,
        tx: &SignedTransaction,
        version: ProtocolVersion,
    ) -> Result<(), AuthorityError> {
        service.verify_transaction_authority(tx, version)
    }

    /// Test: a 2-of-3 active authority accepts any two keys and rejects one.
    #[test]
    fn test_any_two_of_three_satisfies() {
        let k1 = Actor::new("corp");
        let k2 = Actor::new("corp");
        let k3 = Actor::new("corp");
        let mut ledger = TestLedger::new();
        let active = Authority::new(2)
            .with_key(k1.public, 1)
            .with_key(k2.public, 1)
            .with_key(k3.public, 1);
        ledger.add_account("corp", active.clone(), active.clone(), active);
        let service = AuthorityService::new(ledger, CHAIN_ID);

        let tx = transaction(vec![transfer("corp", "bob")]);
        for pair in [[&k1, &k2], [&k1, &k3], [&k2, &k3]] {
            let signed = sign(tx.clone(), &pair);
            assert_eq!(verify(&service, &signed, ProtocolVersion::V2), Ok(()));
        }

        let signed = sign(tx, &[&k1]);
        assert_eq!(
            verify(&service, &signed, ProtocolVersion::V2),
            Err(AuthorityError::MissingActiveAuthority("corp".into()))
        );
    }

    /// Test: delegated authority two levels deep verifies; three levels
    /// deep exceeds the recursion limit.
    #[test]
    fn test_recursive_delegation_depth_limit() {
        let alice = Actor::new("alice");
        let mut ledger = TestLedger::new();
        ledger.add_actor(&alice);
        // holdco -> subco -> alice
        let subco = Authority::new(1).with_account("alice", 1);
        ledger.add_account("subco", subco.clone(), subco.clone(), subco);
        let holdco = Authority::new(1).with_account("subco", 1);
        ledger.add_account("holdco", holdco.clone(), holdco.clone(), holdco);
        let parent = Authority::new(1).with_account("holdco", 1);
        ledger.add_account("parent", parent.clone(), parent.clone(), parent);
        let service = AuthorityService::new(ledger, CHAIN_ID);

        let signed = sign(transaction(vec![transfer("holdco", "bob")]), &[&alice]);
        assert_eq!(verify(&service, &signed, ProtocolVersion::V2), Ok(()));

        // One more hop puts alice's key out of reach.
        let signed = sign(transaction(vec![transfer("parent", "bob")]), &[&alice]);
        assert_eq!(
            verify(&service, &signed, ProtocolVersion::V2),
            Err(AuthorityError::MissingActiveAuthority("parent".into()))
        );
    }

    /// Test: mutually delegating accounts cannot authorize each other out
    /// of thin air, and verification terminates.
    #[test]
    fn test_delegation_cycle_terminates() {
        let outsider = Actor::new("outsider");
        let mut ledger = TestLedger::new();
        ledger.add_actor(&outsider);
        let ouro = Authority::new(1).with_account("boros", 1);
        ledger.add_account("ouro", ouro.clone(), ouro.clone(), ouro);
        let boros = Authority::new(1).with_account("ouro", 1);
        ledger.add_account("boros", boros.clone(), boros.clone(), boros);
        let service = AuthorityService::new(ledger, CHAIN_ID);

        let signed = sign(transaction(vec![transfer("ouro", "bob")]), &[&outsider]);
        assert!(verify(&service, &signed, ProtocolVersion::V2).is_err());
    }

    /// Test: a parent account's key reaches the child through the child's
    /// owner authority.
    #[test]
    fn test_parent_owner_key_authorizes_child() {
        let parent = Actor::new("parent");
        let child_active = Actor::new("child");
        let mut ledger = TestLedger::new();
        ledger.add_actor(&parent);
        ledger.add_account(
            "child",
            Authority::new(1).with_account("parent", 1),
            child_active.authority(),
            child_active.authority(),
        );
        let service = AuthorityService::new(ledger, CHAIN_ID);

        // The owner fallback lets parent's key move child's funds.
        let signed = sign(transaction(vec![transfer("child", "bob")]), &[&parent]);
        assert_eq!(verify(&service, &signed, ProtocolVersion::V2), Ok(()));
    }

    /// Test: a signature by a key the ledger has never seen is irrelevant,
    /// and mangled signature bytes are rejected outright.
    #[test]
    fn test_bogus_and_irrelevant_signatures() {
        let alice = Actor::new("alice");
        let stranger = Actor::new("stranger");
        let mut ledger = TestLedger::new();
        ledger.add_actor(&alice);
        let service = AuthorityService::new(ledger, CHAIN_ID);

        let tx = transaction(vec![transfer("alice", "bob")]);
        let signed = sign(tx.clone(), &[&alice, &stranger]);
        assert_eq!(
            verify(&service, &signed, ProtocolVersion::V2),
            Err(AuthorityError::IrrelevantSignature)
        );

        let mut signed = sign(tx, &[&alice]);
        signed.signatures.push(CompactSignature([0xFF; 65]));
        assert_eq!(
            verify(&service, &signed, ProtocolVersion::V2),
            Err(AuthorityError::InvalidSignature)
        );
    }

    /// Test: basic operations cannot share a transaction with active-level
    /// ones, unless the v2 pruning collapses the levels onto one account.
    #[test]
    fn test_mixed_authority_levels() {
        let alice = Actor::new("alice");
        let bob = Actor::new("bob");
        let mut ledger = TestLedger::new();
        ledger.add_actor(&alice);
        ledger.add_actor(&bob);
        let service = AuthorityService::new(ledger, CHAIN_ID);

        let vote = |voter: &str| Operation::Vote {
            voter: voter.to_string(),
            url: "ipfs://song".to_string(),
            weight: 100,
        };

        let mixed = transaction(vec![vote("alice"), transfer("bob", "alice")]);
        let signed = sign(mixed, &[&alice, &bob]);
        for version in [ProtocolVersion::V1, ProtocolVersion::V2] {
            assert_eq!(
                verify(&service, &signed, version),
                Err(AuthorityError::MixedAuthorityLevels)
            );
        }

        let collapsed = transaction(vec![vote("alice"), transfer("alice", "bob")]);
        let signed = sign(collapsed, &[&alice]);
        assert_eq!(
            verify(&service, &signed, ProtocolVersion::V1),
            Err(AuthorityError::MixedAuthorityLevels)
        );
        assert_eq!(verify(&service, &signed, ProtocolVersion::V2), Ok(()));
    }

    /// Test: content operations are authorized by the content's management
    /// authority, not by the uploader.
    #[test]
    fn test_content_management_authority() {
        let uploader = Actor::new("uploader");
        let label = Actor::new("label");
        let mut ledger = TestLedger::new();
        ledger.add_actor(&uploader);
        ledger.add_actor(&label);
        ledger.add_content("ipfs://song", label.authority(), label.authority());
        let service = AuthorityService::new(ledger, CHAIN_ID);

        let disable = transaction(vec![Operation::ContentDisable {
            url: "ipfs://song".to_string(),
        }]);

        let signed = sign(disable.clone(), &[&label]);
        assert_eq!(verify(&service, &signed, ProtocolVersion::V2), Ok(()));

        let signed = sign(disable, &[&uploader]);
        assert_eq!(
            verify(&service, &signed, ProtocolVersion::V2),
            Err(AuthorityError::MissingActiveAuthority("ipfs://song".into()))
        );
    }

    /// Test: a genesis balance claim is authorized by the balance key
    /// alone.
    #[test]
    fn test_balance_claim_other_authority() {
        let holder = Actor::new("holder");
        let depositor = Actor::new("alice");
        let mut ledger = TestLedger::new();
        ledger.add_actor(&depositor);
        let service = AuthorityService::new(ledger, CHAIN_ID);

        let claim = transaction(vec![Operation::BalanceClaim {
            deposit_to_account: "alice".to_string(),
            balance_id: 1,
            balance_owner_key: holder.public,
            total_claimed: 500,
        }]);

        let signed = sign(claim.clone(), &[&holder]);
        assert_eq!(verify(&service, &signed, ProtocolVersion::V2), Ok(()));

        let signed = sign(claim, &[&depositor]);
        assert_eq!(
            verify(&service, &signed, ProtocolVersion::V2),
            Err(AuthorityError::MissingOtherAuthority)
        );
    }

    /// Test: verify_account_authority accepts the account's own key and
    /// rejects a stranger's.
    #[test]
    fn test_verify_account_authority() {
        let alice = Actor::new("alice");
        let stranger = Actor::new("stranger");
        let mut ledger = TestLedger::new();
        ledger.add_actor(&alice);
        let service = AuthorityService::new(ledger, CHAIN_ID);

        assert_eq!(
            service.verify_account_authority("alice", &[alice.public].into()),
            Ok(())
        );
        assert_eq!(
            service.verify_account_authority("alice", &[stranger.public].into()),
            Err(AuthorityError::MissingActiveAuthority("alice".into()))
        );
    }
}
