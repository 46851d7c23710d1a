//! # Shared Types Crate
//!
//! Primitives and entity definitions shared by the state and validation
//! subsystems.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: keys, addresses and entities are defined here.
//! - **One Identity, Two Names**: an account is addressed either by its public
//!   key or by the address derived from that key on a given network.

pub mod address;
pub mod entities;
pub mod errors;

pub use address::*;
pub use entities::*;
pub use errors::*;
