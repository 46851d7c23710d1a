//! Shared fixtures for unit tests.

use crate::adapters::EntityNotificationPublisher;
use crate::domain::{Notification, NotificationType, WeakEntityInfo};
use crate::ports::NotificationPublisher;
use crate::service::default_registry;
use qc_04_state_management::{AccountState, AccountStateCache, LockInfoCache, StateCache};
use shared_crypto::Ed25519KeyPair;
use shared_types::{
    public_key_to_address, Address, Amount, Block, BlockDuration, BlockHeader, Hash256, Height,
    Mosaic, MosaicId, NetworkIdentifier, Timestamp, Transaction, TransactionBody,
};
use std::ops::ControlFlow;
use std::sync::Arc;

pub(crate) const NETWORK: NetworkIdentifier = NetworkIdentifier::Testnet;
pub(crate) const BLOCK_TIME: Timestamp = 1_000_000;

pub(crate) fn keypair(seed: u8) -> Ed25519KeyPair {
    Ed25519KeyPair::from_seed([seed; 32])
}

fn signed(keypair: &Ed25519KeyPair, body: TransactionBody) -> Transaction {
    let mut transaction = Transaction {
        signer: *keypair.public_key().as_bytes(),
        signature: [0u8; 64],
        version: 1,
        network: NETWORK,
        max_fee: 0,
        deadline: BLOCK_TIME + 60_000,
        body,
    };
    transaction.signature = *keypair.sign(&transaction.hash()).as_bytes();
    transaction
}

pub(crate) fn transfer_from(
    keypair: &Ed25519KeyPair,
    recipient: Address,
    mosaics: &[(MosaicId, Amount)],
) -> Transaction {
    signed(
        keypair,
        TransactionBody::Transfer {
            recipient,
            message: b"hello".to_vec(),
            mosaics: mosaics
                .iter()
                .map(|&(id, amount)| Mosaic::new(id, amount))
                .collect(),
        },
    )
}

/// Transfer from `keypair(1)` to the address of `keypair(2)`.
pub(crate) fn transfer(mosaics: &[(MosaicId, Amount)]) -> Transaction {
    let recipient = public_key_to_address(keypair(2).public_key().as_bytes(), NETWORK);
    transfer_from(&keypair(1), recipient, mosaics)
}

pub(crate) fn hash_lock(mosaic: Mosaic, duration: BlockDuration, hash: Hash256) -> Transaction {
    signed(
        &keypair(1),
        TransactionBody::HashLock {
            mosaic,
            duration,
            hash,
        },
    )
}

pub(crate) fn secret_lock(
    mosaic: Mosaic,
    duration: BlockDuration,
    hash_algorithm: u8,
    secret: Hash256,
    recipient: Address,
) -> Transaction {
    signed(
        &keypair(1),
        TransactionBody::SecretLock {
            mosaic,
            duration,
            hash_algorithm,
            secret,
            recipient,
        },
    )
}

pub(crate) fn block_header(height: Height) -> BlockHeader {
    let harvester = keypair(9);
    let mut header = BlockHeader {
        signer: *harvester.public_key().as_bytes(),
        signature: [0u8; 64],
        version: 1,
        network: NETWORK,
        height,
        timestamp: BLOCK_TIME,
        previous_block_hash: [0u8; 32],
    };
    header.signature = *harvester.sign(&header.hash()).as_bytes();
    header
}

pub(crate) fn signed_block(height: Height, transactions: Vec<Transaction>) -> Block {
    Block {
        header: block_header(height),
        transactions,
    }
}

pub(crate) fn default_publisher() -> Arc<dyn NotificationPublisher> {
    let registry = default_registry().expect("default plugins are distinct");
    Arc::new(EntityNotificationPublisher::new(Arc::new(registry)))
}

pub(crate) fn collect_types(
    publisher: &dyn NotificationPublisher,
    entity: &WeakEntityInfo<'_>,
) -> Vec<NotificationType> {
    let mut types = Vec::new();
    let _ = publisher.publish(entity, &mut |notification: &Notification<'_>| {
        types.push(notification.notification_type());
        ControlFlow::Continue(())
    });
    types
}

/// Accounts plus an empty lock cache.
pub(crate) fn state_cache(accounts: Vec<AccountState>) -> StateCache {
    state_cache_on(NETWORK, accounts)
}

/// State whose account cache derives addresses on `network`.
pub(crate) fn state_cache_on(network: NetworkIdentifier, accounts: Vec<AccountState>) -> StateCache {
    StateCache::builder()
        .with_sub_cache(AccountStateCache::with_accounts(network, accounts))
        .with_sub_cache(LockInfoCache::new())
        .build()
        .expect("sub-caches are distinct")
}
