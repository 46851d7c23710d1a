use shared_types::{Address, Amount, MosaicId};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("A delta is already open; only one writer is allowed")]
    DeltaAlreadyOpen,

    #[error("Delta was not created by this cache")]
    ForeignDelta,

    #[error("Sub-cache already registered: {name}")]
    DuplicateSubCache { name: &'static str },

    #[error("Delta type mismatch for sub-cache {name}")]
    SubCacheTypeMismatch { name: &'static str },

    #[error("Account not found: {address:?}")]
    AccountNotFound { address: Address },

    #[error("Insufficient balance of mosaic {mosaic_id}: required {required}, available {available}")]
    InsufficientBalance {
        mosaic_id: MosaicId,
        required: Amount,
        available: Amount,
    },

    #[error("Balance overflow for mosaic {mosaic_id}")]
    BalanceOverflow { mosaic_id: MosaicId },

    #[error("Lock already exists: {key}")]
    LockAlreadyExists { key: String },
}
