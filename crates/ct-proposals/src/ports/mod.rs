//! # Ports Layer
//!
//! Trait definitions for the hexagonal architecture.
//! - **Outbound (Driven)**: Dependencies this subsystem needs

pub mod outbound;
