//! # Error Types
//!
//! Parse and conversion errors for shared primitives.

use thiserror::Error;

/// Errors raised when converting raw values into shared types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    /// Network byte does not name a known network.
    #[error("Unknown network identifier: 0x{0:02X}")]
    UnknownNetwork(u8),

    /// Network name does not name a known network.
    #[error("Unknown network name: {0}")]
    UnknownNetworkName(String),

    /// Entity type discriminant is not registered.
    #[error("Unknown entity type: 0x{0:04X}")]
    UnknownEntityType(u16),

    /// Lock hash algorithm byte is not supported.
    #[error("Unknown lock hash algorithm: {0}")]
    UnknownHashAlgorithm(u8),

    /// Input is not valid hex.
    #[error("Invalid hex encoding")]
    InvalidHex,

    /// Decoded value has the wrong size.
    #[error("Invalid length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
}
