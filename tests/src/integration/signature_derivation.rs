//! # Signature Derivation Flows
//!
//! Wallet-side queries: which keys must sign, which keys could sign, and
//! greedy minimization of oversigned transactions.

#[cfg(test)]
mod tests {
    use crate::fixtures::{sign, transaction, transfer, Actor, TestLedger, CHAIN_ID};
    use ct_authority::{AuthorityApi, AuthorityService, ProtocolVersion};
    use shared_types::{Authority, PublicKey, SignedTransaction};
    use std::collections::BTreeSet;

    struct Corporate {
        alice: Actor,
        bob: Actor,
        service: AuthorityService<TestLedger>,
    }

    /// alice and bob hold their own keys; "corp" is governed 2-of-2 by
    /// them, "wholly" 1-of-1 by corp.
    fn corporate() -> Corporate {
        let alice = Actor::new("alice");
        let bob = Actor::new("bob");
        let mut ledger = TestLedger::new();
        ledger.add_actor(&alice);
        ledger.add_actor(&bob);
        let corp = Authority::new(2)
            .with_account("alice", 1)
            .with_account("bob", 1);
        ledger.add_account("corp", corp.clone(), corp.clone(), corp);
        let wholly = Authority::new(1).with_account("corp", 1);
        ledger.add_account("wholly", wholly.clone(), wholly.clone(), wholly);
        Corporate {
            alice,
            bob,
            service: AuthorityService::new(ledger, CHAIN_ID),
        }
    }

    fn keyset(keys: &[PublicKey]) -> BTreeSet<PublicKey> {
        keys.iter().copied().collect()
    }

    fn unsigned(from: &str) -> SignedTransaction {
        SignedTransaction::new(transaction(vec![transfer(from, "bob")]))
    }

    /// Test: required signatures resolve delegation chains down to the
    /// wallet's keys.
    #[test]
    fn test_required_signatures_through_delegation() {
        let corp = corporate();
        let wallet = keyset(&[corp.alice.public, corp.bob.public]);

        let required = corp
            .service
            .required_signatures(&unsigned("alice"), &wallet)
            .unwrap();
        assert_eq!(required, keyset(&[corp.alice.public]));

        let required = corp
            .service
            .required_signatures(&unsigned("corp"), &wallet)
            .unwrap();
        assert_eq!(required, keyset(&[corp.alice.public, corp.bob.public]));

        let required = corp
            .service
            .required_signatures(&unsigned("wholly"), &wallet)
            .unwrap();
        assert_eq!(required, keyset(&[corp.alice.public, corp.bob.public]));
    }

    /// Test: keys already on the transaction are not requested again.
    #[test]
    fn test_required_signatures_honors_existing() {
        let corp = corporate();
        let wallet = keyset(&[corp.bob.public]);
        let partially_signed = sign(transaction(vec![transfer("corp", "bob")]), &[&corp.alice]);

        let required = corp
            .service
            .required_signatures(&partially_signed, &wallet)
            .unwrap();
        assert_eq!(required, keyset(&[corp.bob.public]));
    }

    /// Test: potential signatures list every key that could matter,
    /// including owner keys and delegate keys.
    #[test]
    fn test_potential_signatures_cover_delegates() {
        let corp = corporate();
        let potential = corp
            .service
            .potential_signatures(&unsigned("wholly"))
            .unwrap();
        assert!(potential.contains(&corp.alice.public));
        assert!(potential.contains(&corp.bob.public));
    }

    /// Test: minimization strips signatures made redundant by an
    /// overlapping 1-of-2 authority.
    #[test]
    fn test_minimization_drops_redundant_key() {
        let k1 = Actor::new("solo");
        let k2 = Actor::new("solo");
        let mut ledger = TestLedger::new();
        let active = Authority::new(1).with_key(k1.public, 1).with_key(k2.public, 1);
        ledger.add_account("solo", active.clone(), active.clone(), active);
        let service = AuthorityService::new(ledger, CHAIN_ID);

        let wallet = keyset(&[k1.public, k2.public]);
        let minimal = service
            .minimal_signatures(&unsigned("solo"), &wallet, ProtocolVersion::V2)
            .unwrap();
        assert_eq!(minimal.len(), 1);
        assert!(wallet.is_superset(&minimal));
    }

    /// Test: minimization keeps every key of a 2-of-2 authority.
    #[test]
    fn test_minimization_keeps_needed_keys() {
        let corp = corporate();
        let wallet = keyset(&[corp.alice.public, corp.bob.public]);
        let minimal = corp
            .service
            .minimal_signatures(&unsigned("corp"), &wallet, ProtocolVersion::V2)
            .unwrap();
        assert_eq!(minimal, wallet);
    }

    /// Test: the minimized set actually verifies once signed with.
    #[test]
    fn test_minimized_set_verifies() {
        let corp = corporate();
        let wallet = keyset(&[corp.alice.public, corp.bob.public]);
        let minimal = corp
            .service
            .minimal_signatures(&unsigned("wholly"), &wallet, ProtocolVersion::V2)
            .unwrap();

        let mut signers = Vec::new();
        if minimal.contains(&corp.alice.public) {
            signers.push(&corp.alice);
        }
        if minimal.contains(&corp.bob.public) {
            signers.push(&corp.bob);
        }
        let signed = sign(transaction(vec![transfer("wholly", "bob")]), &signers);
        assert_eq!(
            corp.service
                .verify_transaction_authority(&signed, ProtocolVersion::V2),
            Ok(())
        );
    }
}
