//! # Transactions
//!
//! A transaction is an ordered list of operations plus an expiration time.
//! Signatures commit to the chain id through the signing digest, so a signed
//! transaction is only valid on the network it was signed for.

use crate::entities::{ChainId, CompactSignature, Hash, Timestamp};
use crate::errors::ValidationError;
use crate::operations::{Operation, RequiredAuthorities};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// An unsigned transaction.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub operations: Vec<Operation>,
    pub expiration: Timestamp,
}

impl Transaction {
    /// Stateless validation: at least one operation, and every operation
    /// valid on its own.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.operations.is_empty() {
            return Err(ValidationError::EmptyTransaction);
        }
        for op in &self.operations {
            op.validate()?;
        }
        Ok(())
    }

    /// Required authorities of all contained operations, folded together.
    pub fn required_authorities(&self) -> RequiredAuthorities {
        RequiredAuthorities::of_operations(&self.operations)
    }

    /// Digest of the serialized transaction alone. Identifies the
    /// transaction but is never signed directly.
    pub fn digest(&self) -> Hash {
        let encoded = bincode::serialize(self).expect("transaction serialization is infallible");
        Sha256::digest(&encoded).into()
    }

    /// Transaction id: the plain digest.
    pub fn id(&self) -> Hash {
        self.digest()
    }

    /// The digest signatures commit to: chain id prepended to the serialized
    /// transaction, then hashed. Prepending the chain id prevents replay on
    /// other networks.
    pub fn sig_digest(&self, chain_id: &ChainId) -> Hash {
        let encoded = bincode::serialize(self).expect("transaction serialization is infallible");
        let mut hasher = Sha256::new();
        hasher.update(chain_id);
        hasher.update(&encoded);
        hasher.finalize().into()
    }
}

/// A transaction together with the compact signatures attached to it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedTransaction {
    pub transaction: Transaction,
    pub signatures: Vec<CompactSignature>,
}

impl SignedTransaction {
    pub fn new(transaction: Transaction) -> Self {
        SignedTransaction {
            transaction,
            signatures: Vec::new(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.transaction.validate()
    }

    pub fn sig_digest(&self, chain_id: &ChainId) -> Hash {
        self.transaction.sig_digest(chain_id)
    }
}
