//! # Domain Layer
//!
//! Proposal entity and construction logic. Ledger access happens only
//! through the authority resolver and the proposal store ports.

pub mod entities;
pub mod errors;
pub mod evaluator;
