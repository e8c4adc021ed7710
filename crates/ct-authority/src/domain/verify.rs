//! # Authority Verification Engine
//!
//! Checks a set of signing keys against the authorities a transaction
//! requires. Two protocol versions are live on chain:
//!
//! - **V1**: basic-level transactions must stand alone, owner signatures
//!   satisfy active requirements, and only the basic path rejects unused
//!   signatures.
//! - **V2**: basic requirements already covered by an active or owner
//!   requirement of the same account are pruned, pre-granted approvals are
//!   honored at every level, and unused signatures are rejected unless the
//!   caller opts out.

use super::errors::AuthorityError;
use super::sign_state::SignState;
use crate::ports::outbound::AuthorityResolver;
use serde::{Deserialize, Serialize};
use shared_types::{AccountName, PublicKey, RequiredAuthorities};
use std::collections::BTreeSet;

/// Which verification semantics to apply.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProtocolVersion {
    V1,
    V2,
}

impl ProtocolVersion {
    pub fn from_u32(version: u32) -> Result<Self, AuthorityError> {
        match version {
            1 => Ok(ProtocolVersion::V1),
            2 => Ok(ProtocolVersion::V2),
            other => Err(AuthorityError::InvalidProtocolVersion(other)),
        }
    }
}

/// Approvals granted outside the transaction's own signatures, per level.
/// Used when a proposal carries approvals accumulated in earlier
/// transactions.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Approvals {
    pub basic: BTreeSet<AccountName>,
    pub active: BTreeSet<AccountName>,
    pub owner: BTreeSet<AccountName>,
}

/// Verify that `signature_keys` satisfies every authority in `required`.
#[allow(clippy::too_many_arguments)]
pub fn verify_authority(
    version: ProtocolVersion,
    required: &RequiredAuthorities,
    signature_keys: &BTreeSet<PublicKey>,
    resolver: &dyn AuthorityResolver,
    max_recursion: u32,
    allow_extra_signatures: bool,
    approvals: &Approvals,
) -> Result<(), AuthorityError> {
    match version {
        ProtocolVersion::V1 => {
            verify_v1(required, signature_keys, resolver, max_recursion, approvals)
        }
        ProtocolVersion::V2 => verify_v2(
            required,
            signature_keys,
            resolver,
            max_recursion,
            allow_extra_signatures,
            approvals,
        ),
    }
}

fn verify_v1(
    required: &RequiredAuthorities,
    signature_keys: &BTreeSet<PublicKey>,
    resolver: &dyn AuthorityResolver,
    max_recursion: u32,
    approvals: &Approvals,
) -> Result<(), AuthorityError> {
    let no_available = BTreeSet::new();

    if !required.basic.is_empty() {
        if !(required.active.is_empty() && required.owner.is_empty() && required.other.is_empty())
        {
            return Err(AuthorityError::MixedAuthorityLevels);
        }

        // Delegates inside a basic authority are resolved at basic level.
        let get_basic = |name: &str| resolver.basic_authority(name);
        let mut state = SignState::new(
            signature_keys.clone(),
            &get_basic,
            &no_available,
            max_recursion,
        );
        for id in &approvals.basic {
            state.approve(id.clone());
        }
        for id in &required.basic {
            let satisfied = state.check_authority_by_name(id)?
                || state.check_authority(&resolver.active_authority(id)?, 0)?
                || state.check_authority(&resolver.owner_authority(id)?, 0)?;
            if !satisfied {
                return Err(AuthorityError::MissingBasicAuthority(id.clone()));
            }
        }
        if state.remove_unused_signatures() {
            return Err(AuthorityError::IrrelevantSignature);
        }
        return Ok(());
    }

    let get_active = |name: &str| resolver.active_authority(name);
    let mut state = SignState::new(
        signature_keys.clone(),
        &get_active,
        &no_available,
        max_recursion,
    );
    // Owner approvals cover active requirements of the same account.
    for id in approvals.active.iter().chain(&approvals.owner) {
        state.approve(id.clone());
    }

    for auth in &required.other {
        if !state.check_authority(auth, 0)? {
            return Err(AuthorityError::MissingOtherAuthority);
        }
    }

    for id in &required.active {
        let satisfied = state.check_authority_by_name(id)?
            || state.check_authority(&resolver.owner_authority(id)?, 0)?;
        if !satisfied {
            return Err(AuthorityError::MissingActiveAuthority(id.clone()));
        }
    }

    for url in &required.master_content {
        if !state.check_authority(&resolver.master_authority(url)?, 0)? {
            return Err(AuthorityError::MissingActiveAuthority(url.clone()));
        }
    }
    for url in &required.comp_content {
        if !state.check_authority(&resolver.comp_authority(url)?, 0)? {
            return Err(AuthorityError::MissingActiveAuthority(url.clone()));
        }
    }

    for id in &required.owner {
        let satisfied = approvals.owner.contains(id)
            || state.check_authority(&resolver.owner_authority(id)?, 0)?;
        if !satisfied {
            return Err(AuthorityError::MissingOwnerAuthority(id.clone()));
        }
    }

    // Unused signatures are tolerated on this path.
    Ok(())
}

fn verify_v2(
    required: &RequiredAuthorities,
    signature_keys: &BTreeSet<PublicKey>,
    resolver: &dyn AuthorityResolver,
    max_recursion: u32,
    allow_extra_signatures: bool,
    approvals: &Approvals,
) -> Result<(), AuthorityError> {
    // A basic requirement is subsumed by an active or owner requirement of
    // the same account.
    let required_basic: BTreeSet<&AccountName> = required
        .basic
        .iter()
        .filter(|id| !required.active.contains(*id) && !required.owner.contains(*id))
        .collect();

    let higher_levels_present = !required.active.is_empty()
        || !required.owner.is_empty()
        || !required.master_content.is_empty()
        || !required.comp_content.is_empty()
        || !required.other.is_empty();
    if !required_basic.is_empty() && higher_levels_present {
        return Err(AuthorityError::MixedAuthorityLevels);
    }

    let no_available = BTreeSet::new();
    let get_active = |name: &str| resolver.active_authority(name);
    let mut state = SignState::new(
        signature_keys.clone(),
        &get_active,
        &no_available,
        max_recursion,
    );
    for id in approvals
        .basic
        .iter()
        .chain(&approvals.active)
        .chain(&approvals.owner)
    {
        state.approve(id.clone());
    }

    for id in required_basic {
        let satisfied = state.is_approved(id)
            || state.check_authority(&resolver.basic_authority(id)?, 0)?
            || state.check_authority(&resolver.active_authority(id)?, 0)?
            || state.check_authority(&resolver.owner_authority(id)?, 0)?;
        if !satisfied {
            return Err(AuthorityError::MissingBasicAuthority(id.clone()));
        }
    }

    for auth in &required.other {
        if !state.check_authority(auth, 0)? {
            return Err(AuthorityError::MissingOtherAuthority);
        }
    }

    for id in &required.active {
        let satisfied = state.check_authority_by_name(id)?
            || state.check_authority(&resolver.owner_authority(id)?, 0)?;
        if !satisfied {
            return Err(AuthorityError::MissingActiveAuthority(id.clone()));
        }
    }

    for url in &required.master_content {
        if !state.check_authority(&resolver.master_authority(url)?, 0)? {
            return Err(AuthorityError::MissingActiveAuthority(url.clone()));
        }
    }
    for url in &required.comp_content {
        if !state.check_authority(&resolver.comp_authority(url)?, 0)? {
            return Err(AuthorityError::MissingActiveAuthority(url.clone()));
        }
    }

    for id in &required.owner {
        let satisfied = approvals.owner.contains(id)
            || state.check_authority(&resolver.owner_authority(id)?, 0)?;
        if !satisfied {
            return Err(AuthorityError::MissingOwnerAuthority(id.clone()));
        }
    }

    if !allow_extra_signatures && state.remove_unused_signatures() {
        return Err(AuthorityError::IrrelevantSignature);
    }
    Ok(())
}
