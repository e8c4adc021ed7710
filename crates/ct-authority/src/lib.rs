//! # Authority Verification Subsystem
//!
//! Decides whether a set of signatures satisfies the weighted-threshold
//! authorities a transaction requires, and derives the signature sets
//! wallets need to produce.
//!
//! ## Architecture
//!
//! This subsystem follows hexagonal architecture:
//! - **Domain Layer** (`domain/`): Pure authorization logic, no I/O
//! - **Ports Layer** (`ports/`): Trait definitions for inbound/outbound interfaces
//! - **Service Layer** (`service.rs`): Wires domain logic to ports
//!
//! ## Verification model
//!
//! Signatures are compact and recoverable: the signing key is recovered
//! from the signature and the chain-bound digest, then checked as a key
//! set against the required authorities. Account delegation is followed
//! recursively up to [`shared_types::MAX_SIG_CHECK_DEPTH`].

pub mod domain;
pub mod ports;
pub mod service;

// Re-export public API
pub use domain::derive::{
    minimize_required_signatures, potential_signatures, required_signatures,
};
pub use domain::errors::AuthorityError;
pub use domain::keys::{compress, recover_public_key, sign_digest, signature_keys};
pub use domain::sign_state::SignState;
pub use domain::verify::{verify_authority, Approvals, ProtocolVersion};
pub use ports::inbound::AuthorityApi;
pub use ports::outbound::AuthorityResolver;
pub use service::AuthorityService;
