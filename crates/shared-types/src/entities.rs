//! # Core Protocol Entities
//!
//! Primitive identifiers and cryptographic value types used throughout the
//! ledger: hashes, keys, signatures, account names, content URLs, and
//! timestamps.

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, Bytes};
use std::fmt;

/// A 32-byte SHA-256 hash.
pub type Hash = [u8; 32];

/// Domain-separation identifier of the chain, mixed into every signing
/// digest so signatures cannot be replayed across networks.
pub type ChainId = Hash;

/// An account name. Names are the primary key of the account index.
pub type AccountName = String;

/// A content URL. URLs are the primary key of the content index.
pub type ContentUrl = String;

/// Weight of a single key or delegate account inside an authority.
pub type Weight = u16;

/// Maximum delegation depth followed when checking an account authority.
/// Chains deeper than this fail verification instead of recursing further.
pub const MAX_SIG_CHECK_DEPTH: u32 = 2;

/// Maximum distance into the future a proposal may expire (4 weeks).
pub const MAX_PROPOSAL_LIFETIME_SECS: u64 = 60 * 60 * 24 * 28;

/// A compressed SEC1 secp256k1 public key.
///
/// Ordered so it can key `BTreeMap`/`BTreeSet`; signature verification
/// operates on sets of recovered public keys, never raw signature bytes.
#[serde_as]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PublicKey(#[serde_as(as = "Bytes")] pub [u8; 33]);

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({self})")
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

/// A compact recoverable secp256k1 signature: recovery id byte || r || s.
///
/// The public key is recovered from the signature and the signing digest,
/// so transactions do not carry signer identities explicitly.
#[serde_as]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CompactSignature(#[serde_as(as = "Bytes")] pub [u8; 65]);

impl fmt::Debug for CompactSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CompactSignature(rec={})", self.0[0])
    }
}

/// Ledger time in seconds since the Unix epoch.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Timestamp(pub u64);

impl Timestamp {
    pub const fn from_secs(secs: u64) -> Self {
        Timestamp(secs)
    }

    pub const fn saturating_add_secs(self, secs: u64) -> Self {
        Timestamp(self.0.saturating_add(secs))
    }

    /// Seconds from `self` until `later`, zero if `later` is not later.
    pub const fn secs_until(self, later: Timestamp) -> u64 {
        later.0.saturating_sub(self.0)
    }
}

/// Checks an account name against the chain's naming rules: 3..=16
/// characters, dot-separated segments, each segment starting with a letter,
/// continuing with lowercase letters, digits or dashes, and ending with a
/// letter or digit.
pub fn is_valid_account_name(name: &str) -> bool {
    if name.len() < 3 || name.len() > 16 {
        return false;
    }
    name.split('.').all(|segment| {
        let bytes = segment.as_bytes();
        if bytes.len() < 3 {
            return false;
        }
        bytes[0].is_ascii_lowercase()
            && bytes[bytes.len() - 1].is_ascii_alphanumeric()
            && bytes
                .iter()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || *b == b'-')
    })
}
