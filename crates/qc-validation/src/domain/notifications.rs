//! # Notifications
//!
//! An entity is decomposed into a sequence of typed facts. Payloads borrow
//! from the entity being published, so a notification can never outlive it.
//!
//! Each [`NotificationType`] belongs to a fixed [`NotificationChannel`]:
//! validators only see `Validator`/`All` notifications, observers only see
//! `Observer`/`All` notifications.

use shared_types::{
    Address, Amount, BlockDuration, EntityType, Hash256, Height, Key, Mosaic, MosaicId,
    NetworkIdentifier, Signature, Timestamp,
};
use std::fmt;

/// Consumers a notification is intended for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationChannel {
    Validator,
    Observer,
    All,
}

impl NotificationChannel {
    pub const fn includes_validator(self) -> bool {
        matches!(self, NotificationChannel::Validator | NotificationChannel::All)
    }

    pub const fn includes_observer(self) -> bool {
        matches!(self, NotificationChannel::Observer | NotificationChannel::All)
    }
}

/// Discriminant of a [`Notification`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NotificationType {
    CoreEntity,
    CoreTransaction,
    CoreBlock,
    CoreSignature,
    AccountAddress,
    AccountPublicKey,
    BalanceTransfer,
    BalanceReserve,
    TransferMessage,
    TransferMosaics,
    HashLockDuration,
    HashLockMosaic,
    HashLock,
    SecretLockDuration,
    SecretLockHashAlgorithm,
    SecretLock,
}

impl NotificationType {
    pub const fn channel(self) -> NotificationChannel {
        use NotificationChannel::*;
        match self {
            NotificationType::CoreEntity | NotificationType::CoreSignature => Validator,
            NotificationType::CoreTransaction | NotificationType::CoreBlock => All,
            NotificationType::AccountAddress | NotificationType::AccountPublicKey => Observer,
            NotificationType::BalanceTransfer | NotificationType::BalanceReserve => All,
            NotificationType::TransferMessage | NotificationType::TransferMosaics => Validator,
            NotificationType::HashLockDuration | NotificationType::HashLockMosaic => Validator,
            NotificationType::HashLock => All,
            NotificationType::SecretLockDuration | NotificationType::SecretLockHashAlgorithm => {
                Validator
            }
            NotificationType::SecretLock => All,
        }
    }
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

// =============================================================================
// CLUSTER A: CORE PAYLOADS
// =============================================================================

/// Header fields common to every entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityNotification {
    pub network: NetworkIdentifier,
    pub entity_type: EntityType,
    pub version: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionNotification<'a> {
    pub signer: &'a Key,
    pub transaction_hash: &'a Hash256,
    pub entity_type: EntityType,
    pub deadline: Timestamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockNotification<'a> {
    pub signer: &'a Key,
    pub height: Height,
    pub timestamp: Timestamp,
}

/// Signature over `data` (the entity hash).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignatureNotification<'a> {
    pub signer: &'a Key,
    pub signature: &'a Signature,
    pub data: &'a [u8],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountAddressNotification<'a> {
    pub address: &'a Address,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountPublicKeyNotification<'a> {
    pub public_key: &'a Key,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalanceTransferNotification<'a> {
    pub sender: &'a Key,
    pub recipient: &'a Address,
    pub mosaic_id: MosaicId,
    pub amount: Amount,
}

/// Funds withdrawn from the sender without a recipient (lock collateral).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalanceReserveNotification<'a> {
    pub sender: &'a Key,
    pub mosaic_id: MosaicId,
    pub amount: Amount,
}

// =============================================================================
// CLUSTER B: TRANSACTION PAYLOADS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferMessageNotification {
    pub message_size: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferMosaicsNotification<'a> {
    pub mosaics: &'a [Mosaic],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashLockDurationNotification {
    pub duration: BlockDuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashLockMosaicNotification {
    pub mosaic: Mosaic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashLockNotification<'a> {
    pub signer: &'a Key,
    pub mosaic: Mosaic,
    pub duration: BlockDuration,
    pub hash: &'a Hash256,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecretLockDurationNotification {
    pub duration: BlockDuration,
}

/// Raw algorithm byte; validated by the secret lock validators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecretLockHashAlgorithmNotification {
    pub hash_algorithm: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecretLockNotification<'a> {
    pub signer: &'a Key,
    pub mosaic: Mosaic,
    pub duration: BlockDuration,
    pub hash_algorithm: u8,
    pub secret: &'a Hash256,
    pub recipient: &'a Address,
}

// =============================================================================
// NOTIFICATION ENUM AND KINDS
// =============================================================================

/// A typed fact extracted from an entity.
///
/// Implemented as a closed set: a new notification is a new variant plus a
/// marker in [`kind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notification<'a> {
    CoreEntity(EntityNotification),
    CoreTransaction(TransactionNotification<'a>),
    CoreBlock(BlockNotification<'a>),
    CoreSignature(SignatureNotification<'a>),
    AccountAddress(AccountAddressNotification<'a>),
    AccountPublicKey(AccountPublicKeyNotification<'a>),
    BalanceTransfer(BalanceTransferNotification<'a>),
    BalanceReserve(BalanceReserveNotification<'a>),
    TransferMessage(TransferMessageNotification),
    TransferMosaics(TransferMosaicsNotification<'a>),
    HashLockDuration(HashLockDurationNotification),
    HashLockMosaic(HashLockMosaicNotification),
    HashLock(HashLockNotification<'a>),
    SecretLockDuration(SecretLockDurationNotification),
    SecretLockHashAlgorithm(SecretLockHashAlgorithmNotification),
    SecretLock(SecretLockNotification<'a>),
}

/// Statically typed view of one [`Notification`] variant.
///
/// Typed validators and observers name a kind; the aggregate only routes
/// notifications of [`Self::TYPE`] to them.
pub trait NotificationKind: Send + Sync + 'static {
    type Payload<'a>: Copy;

    const TYPE: NotificationType;

    fn downcast<'a>(notification: &Notification<'a>) -> Option<Self::Payload<'a>>;
}

/// Payload type of the kind `K`.
pub type Payload<'a, K> = <K as NotificationKind>::Payload<'a>;

macro_rules! notification_kinds {
    (
        owned { $($owned:ident => $owned_payload:ident),* $(,)? }
        borrowed { $($borrowed:ident => $borrowed_payload:ident),* $(,)? }
    ) => {
        impl Notification<'_> {
            pub const fn notification_type(&self) -> NotificationType {
                match self {
                    $(Notification::$owned(_) => NotificationType::$owned,)*
                    $(Notification::$borrowed(_) => NotificationType::$borrowed,)*
                }
            }
        }

        /// Marker types implementing [`NotificationKind`], one per variant.
        pub mod kind {
            use super::*;

            $(
                pub struct $owned;

                impl NotificationKind for $owned {
                    type Payload<'a> = $owned_payload;
                    const TYPE: NotificationType = NotificationType::$owned;

                    fn downcast<'a>(notification: &Notification<'a>) -> Option<Self::Payload<'a>> {
                        match notification {
                            Notification::$owned(payload) => Some(*payload),
                            _ => None,
                        }
                    }
                }
            )*

            $(
                pub struct $borrowed;

                impl NotificationKind for $borrowed {
                    type Payload<'a> = $borrowed_payload<'a>;
                    const TYPE: NotificationType = NotificationType::$borrowed;

                    fn downcast<'a>(notification: &Notification<'a>) -> Option<Self::Payload<'a>> {
                        match notification {
                            Notification::$borrowed(payload) => Some(*payload),
                            _ => None,
                        }
                    }
                }
            )*
        }
    };
}

notification_kinds! {
    owned {
        CoreEntity => EntityNotification,
        TransferMessage => TransferMessageNotification,
        HashLockDuration => HashLockDurationNotification,
        HashLockMosaic => HashLockMosaicNotification,
        SecretLockDuration => SecretLockDurationNotification,
        SecretLockHashAlgorithm => SecretLockHashAlgorithmNotification,
    }
    borrowed {
        CoreTransaction => TransactionNotification,
        CoreBlock => BlockNotification,
        CoreSignature => SignatureNotification,
        AccountAddress => AccountAddressNotification,
        AccountPublicKey => AccountPublicKeyNotification,
        BalanceTransfer => BalanceTransferNotification,
        BalanceReserve => BalanceReserveNotification,
        TransferMosaics => TransferMosaicsNotification,
        HashLock => HashLockNotification,
        SecretLock => SecretLockNotification,
    }
}

impl Notification<'_> {
    pub const fn channel(&self) -> NotificationChannel {
        self.notification_type().channel()
    }
}
