//! # Key Recovery and Signing (secp256k1)
//!
//! Compact recoverable signatures: the signer's public key is recovered from
//! the signature and the signing digest, so transactions never carry signer
//! identities explicitly. Layout is `recovery id || r || s` (65 bytes).

use super::errors::AuthorityError;
use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};
use shared_types::{ChainId, CompactSignature, Hash, PublicKey, SignedTransaction};
use std::collections::BTreeSet;

/// Recover the compressed public key that produced `signature` over `digest`.
pub fn recover_public_key(
    digest: &Hash,
    signature: &CompactSignature,
) -> Result<PublicKey, AuthorityError> {
    let recovery_id =
        RecoveryId::from_byte(signature.0[0]).ok_or(AuthorityError::InvalidSignature)?;
    let sig = Signature::from_slice(&signature.0[1..])
        .map_err(|_| AuthorityError::InvalidSignature)?;
    let key = VerifyingKey::recover_from_prehash(digest, &sig, recovery_id)
        .map_err(|_| AuthorityError::InvalidSignature)?;
    Ok(compress(&key))
}

/// Recover the set of keys that signed `tx` for the network `chain_id`.
///
/// Two signatures by the same key are rejected: the duplicate can never
/// contribute additional weight, so it is always a mistake.
pub fn signature_keys(
    tx: &SignedTransaction,
    chain_id: &ChainId,
) -> Result<BTreeSet<PublicKey>, AuthorityError> {
    let digest = tx.sig_digest(chain_id);
    let mut keys = BTreeSet::new();
    for signature in &tx.signatures {
        let key = recover_public_key(&digest, signature)?;
        if !keys.insert(key) {
            return Err(AuthorityError::DuplicateSignature);
        }
    }
    Ok(keys)
}

/// Produce a compact recoverable signature over a prehashed digest.
pub fn sign_digest(
    digest: &Hash,
    secret: &SigningKey,
) -> Result<CompactSignature, AuthorityError> {
    let (sig, recovery_id) = secret
        .sign_prehash_recoverable(digest)
        .map_err(|_| AuthorityError::InvalidSignature)?;
    let mut out = [0u8; 65];
    out[0] = recovery_id.to_byte();
    out[1..].copy_from_slice(&sig.to_bytes());
    Ok(CompactSignature(out))
}

/// Compressed SEC1 encoding of a verifying key.
pub fn compress(key: &VerifyingKey) -> PublicKey {
    let point = key.to_encoded_point(true);
    let mut bytes = [0u8; 33];
    bytes.copy_from_slice(point.as_bytes());
    PublicKey(bytes)
}
