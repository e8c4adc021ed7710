//! # Domain Layer
//!
//! Pure authorization logic with no I/O dependencies: key recovery, the
//! sign-state accumulator, the verification engine, and signature-set
//! derivation. Ledger access happens only through the
//! [`AuthorityResolver`](crate::ports::outbound::AuthorityResolver) port.

pub mod derive;
pub mod errors;
pub mod keys;
pub mod sign_state;
pub mod verify;
