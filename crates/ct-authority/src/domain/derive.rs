//! # Signature-Set Derivation
//!
//! Wallet-facing derivation of signature sets:
//!
//! - `required_signatures`: which of the caller's keys must sign.
//! - `potential_signatures`: every key that could possibly be relevant,
//!   used by wallets to decide which of their keys to offer.
//! - `minimize_required_signatures`: greedy reduction of the required set,
//!   dropping keys made redundant by overlapping authorities.

use super::errors::AuthorityError;
use super::sign_state::SignState;
use super::verify::{verify_authority, Approvals, ProtocolVersion};
use crate::ports::outbound::AuthorityResolver;
use shared_types::{Authority, PublicKey, RequiredAuthorities};
use std::cell::RefCell;
use std::collections::BTreeSet;

/// The subset of `available_keys` that must sign to satisfy `required`,
/// given that `signature_keys` have already signed.
///
/// Best effort: requirements the available keys cannot satisfy contribute
/// nothing instead of failing. Content management authorities are not
/// consulted on this path, and basic requirements are walked only through
/// basic authorities.
pub fn required_signatures(
    required: &RequiredAuthorities,
    signature_keys: &BTreeSet<PublicKey>,
    available_keys: &BTreeSet<PublicKey>,
    resolver: &dyn AuthorityResolver,
    max_recursion: u32,
) -> Result<BTreeSet<PublicKey>, AuthorityError> {
    if !required.basic.is_empty() {
        if !required.active.is_empty() || !required.owner.is_empty() {
            return Err(AuthorityError::MixedAuthorityLevels);
        }
        let get_basic = |name: &str| resolver.basic_authority(name);
        let mut state = SignState::new(
            signature_keys.clone(),
            &get_basic,
            available_keys,
            max_recursion,
        );
        for id in &required.basic {
            state.check_authority_by_name(id)?;
        }
        state.remove_unused_signatures();
        return Ok(collect_available(&state, available_keys));
    }

    let get_active = |name: &str| resolver.active_authority(name);
    let mut state = SignState::new(
        signature_keys.clone(),
        &get_active,
        available_keys,
        max_recursion,
    );
    for auth in &required.other {
        state.check_authority(auth, 0)?;
    }
    for id in &required.active {
        let _ = state.check_authority_by_name(id)?
            || state.check_authority(&resolver.owner_authority(id)?, 0)?;
    }
    for id in &required.owner {
        state.check_authority(&resolver.owner_authority(id)?, 0)?;
    }
    state.remove_unused_signatures();
    Ok(collect_available(&state, available_keys))
}

fn collect_available(
    state: &SignState<'_>,
    available_keys: &BTreeSet<PublicKey>,
) -> BTreeSet<PublicKey> {
    state
        .provided_keys()
        .filter(|key| available_keys.contains(key))
        .copied()
        .collect()
}

/// Every key that could contribute to satisfying `required`: all keys of
/// every authority the derivation walk touches, including delegate
/// authorities up to the recursion limit.
pub fn potential_signatures(
    required: &RequiredAuthorities,
    signature_keys: &BTreeSet<PublicKey>,
    resolver: &dyn AuthorityResolver,
    max_recursion: u32,
) -> Result<BTreeSet<PublicKey>, AuthorityError> {
    let collector = KeyCollectingResolver::new(resolver);
    for auth in &required.other {
        collector.collect(auth);
    }
    let no_available = BTreeSet::new();
    required_signatures(
        required,
        signature_keys,
        &no_available,
        &collector,
        max_recursion,
    )?;
    Ok(collector.into_keys())
}

/// A minimal subset of the required signatures: each key is tentatively
/// dropped and kept out if verification still succeeds without it.
///
/// Greedy in key order, so the result is minimal but not necessarily the
/// smallest possible set.
pub fn minimize_required_signatures(
    version: ProtocolVersion,
    required: &RequiredAuthorities,
    signature_keys: &BTreeSet<PublicKey>,
    available_keys: &BTreeSet<PublicKey>,
    resolver: &dyn AuthorityResolver,
    max_recursion: u32,
) -> Result<BTreeSet<PublicKey>, AuthorityError> {
    let candidates = required_signatures(
        required,
        signature_keys,
        available_keys,
        resolver,
        max_recursion,
    )?;
    let mut result = candidates.clone();
    for key in &candidates {
        result.remove(key);
        match verify_authority(
            version,
            required,
            &result,
            resolver,
            max_recursion,
            false,
            &Approvals::default(),
        ) {
            Ok(()) => {}
            Err(AuthorityError::MissingActiveAuthority(_))
            | Err(AuthorityError::MissingOwnerAuthority(_))
            | Err(AuthorityError::MissingBasicAuthority(_))
            | Err(AuthorityError::MissingOtherAuthority) => {
                result.insert(*key);
            }
            Err(other) => return Err(other),
        }
    }
    Ok(result)
}

/// Resolver wrapper that records the keys of every authority it hands out.
struct KeyCollectingResolver<'a> {
    inner: &'a dyn AuthorityResolver,
    keys: RefCell<BTreeSet<PublicKey>>,
}

impl<'a> KeyCollectingResolver<'a> {
    fn new(inner: &'a dyn AuthorityResolver) -> Self {
        KeyCollectingResolver {
            inner,
            keys: RefCell::new(BTreeSet::new()),
        }
    }

    fn collect(&self, auth: &Authority) {
        self.keys.borrow_mut().extend(auth.keys().copied());
    }

    fn record(&self, auth: Result<Authority, AuthorityError>) -> Result<Authority, AuthorityError> {
        if let Ok(auth) = &auth {
            self.collect(auth);
        }
        auth
    }

    fn into_keys(self) -> BTreeSet<PublicKey> {
        self.keys.into_inner()
    }
}

impl AuthorityResolver for KeyCollectingResolver<'_> {
    fn owner_authority(&self, account: &str) -> Result<Authority, AuthorityError> {
        self.record(self.inner.owner_authority(account))
    }

    fn active_authority(&self, account: &str) -> Result<Authority, AuthorityError> {
        self.record(self.inner.active_authority(account))
    }

    fn basic_authority(&self, account: &str) -> Result<Authority, AuthorityError> {
        self.record(self.inner.basic_authority(account))
    }

    fn master_authority(&self, url: &str) -> Result<Authority, AuthorityError> {
        self.record(self.inner.master_authority(url))
    }

    fn comp_authority(&self, url: &str) -> Result<Authority, AuthorityError> {
        self.record(self.inner.comp_authority(url))
    }
}
