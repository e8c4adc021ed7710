//! # Proposal Subsystem
//!
//! Lifecycle of proposed transactions: a transaction whose authorities
//! span several parties is parked as a proposal, gathers approvals over
//! subsequent transactions, and executes once fully authorized (or at the
//! end of its review period). Any required party may veto it; expired
//! proposals are swept.
//!
//! ## Architecture
//!
//! This subsystem follows hexagonal architecture:
//! - **Domain Layer** (`domain/`): Proposal entity and construction, no I/O
//! - **Ports Layer** (`ports/`): Trait definitions for outbound interfaces
//! - **Service Layer** (`service.rs`): Wires domain logic to ports

pub mod domain;
pub mod ports;
pub mod service;

// Re-export public API
pub use domain::entities::Proposal;
pub use domain::errors::ProposalError;
pub use domain::evaluator::{build_proposal, collect_authority_accounts, is_proposal_operation};
pub use ports::outbound::{ApplyError, ProposalStore, TransactionApplier};
pub use service::{ProposalConfig, ProposalService};
