//! # Shared Types Crate
//!
//! This crate contains the protocol data model for the Cantata ledger:
//! primitive identifiers, weighted-threshold authorities, the closed
//! `Operation` sum type, and transactions.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All cross-subsystem protocol types are
//!   defined here.
//! - **Deterministic encoding**: Collections are ordered (`BTreeMap` /
//!   `BTreeSet`) so that digests are reproducible across nodes.
//! - **Closed operation set**: Required-authority extraction is a single
//!   exhaustive match over `Operation`, checked at compile time.

pub mod authority;
pub mod entities;
pub mod errors;
pub mod operations;
pub mod transaction;

pub use authority::Authority;
pub use entities::*;
pub use errors::ValidationError;
pub use operations::*;
pub use transaction::{SignedTransaction, Transaction};
