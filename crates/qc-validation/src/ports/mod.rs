//! Decomposition seams: publishers, subscribers and transaction plugins.

pub mod publisher;

pub use publisher::*;
