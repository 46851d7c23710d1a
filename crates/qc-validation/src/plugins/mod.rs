//! Transaction plugins: per-type notification decomposition.

pub mod hash_lock;
pub mod secret_lock;
pub mod transfer;

pub use hash_lock::HashLockPlugin;
pub use secret_lock::SecretLockPlugin;
pub use transfer::TransferPlugin;
