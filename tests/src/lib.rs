//! # Quantum-Chain Test Suite
//!
//! Cross-crate flows exercising `qc-validation` on top of
//! `qc-04-state-management`.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── fixtures.rs          # Signed entities and seeded state
//!     ├── validation_flows.rs  # Publisher → validators → observers → commit
//!     └── state_flows.rs       # Snapshot isolation and delta semantics
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p qc-tests integration::
//! cargo bench -p qc-tests
//! ```

pub mod integration;
