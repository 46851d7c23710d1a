//! Signed entities and seeded state shared by flows and benchmarks.

use qc_04_state_management::{AccountState, AccountStateCache, LockInfoCache, StateCache};
use qc_validation::{
    default_registry, EntityProcessor, TransactionRegistry, ValidationConfig, ValidationPipeline,
};
use shared_crypto::Ed25519KeyPair;
use shared_types::{
    public_key_to_address, Address, Amount, Block, BlockDuration, BlockHeader, Hash256, Height,
    Key, Mosaic, MosaicId, NetworkIdentifier, Timestamp, Transaction, TransactionBody,
};
use std::sync::Arc;

pub const NETWORK: NetworkIdentifier = NetworkIdentifier::Testnet;
pub const BLOCK_TIME: Timestamp = 5_000_000;
pub const CURRENCY: MosaicId = 0x6BED_913F_A202_23F8;
pub const LOCK_FUNDS: Amount = 10_000_000;

/// A deterministic account identity.
pub struct Account {
    keypair: Ed25519KeyPair,
}

impl Account {
    pub fn new(seed: u8) -> Self {
        Self {
            keypair: Ed25519KeyPair::from_seed([seed; 32]),
        }
    }

    pub fn key(&self) -> Key {
        *self.keypair.public_key().as_bytes()
    }

    pub fn address(&self) -> Address {
        public_key_to_address(&self.key(), NETWORK)
    }

    /// Committed state for this account, known by address only.
    pub fn funded(&self, amount: Amount) -> AccountState {
        AccountState::new(self.address(), 1)
            .with_balance(CURRENCY, amount)
            .expect("seed balance fits")
    }

    pub fn sign(&self, body: TransactionBody) -> Transaction {
        self.resign(Transaction {
            signer: self.key(),
            signature: [0u8; 64],
            version: 1,
            network: NETWORK,
            max_fee: 0,
            deadline: BLOCK_TIME + 3_600_000,
            body,
        })
    }

    /// Signs `transaction` again after its fields were changed.
    pub fn resign(&self, mut transaction: Transaction) -> Transaction {
        transaction.signature = *self.keypair.sign(&transaction.hash()).as_bytes();
        transaction
    }

    pub fn transfer(&self, recipient: Address, mosaics: &[(MosaicId, Amount)]) -> Transaction {
        self.sign(TransactionBody::Transfer {
            recipient,
            message: b"integration".to_vec(),
            mosaics: mosaics
                .iter()
                .map(|&(id, amount)| Mosaic::new(id, amount))
                .collect(),
        })
    }

    pub fn hash_lock(&self, duration: BlockDuration, hash: Hash256) -> Transaction {
        self.sign(TransactionBody::HashLock {
            mosaic: Mosaic::new(CURRENCY, LOCK_FUNDS),
            duration,
            hash,
        })
    }

    pub fn secret_lock(
        &self,
        amount: Amount,
        duration: BlockDuration,
        secret: Hash256,
        recipient: Address,
    ) -> Transaction {
        self.sign(TransactionBody::SecretLock {
            mosaic: Mosaic::new(CURRENCY, amount),
            duration,
            hash_algorithm: 0,
            secret,
            recipient,
        })
    }

    /// A block at `height` harvested by this account.
    pub fn block(&self, height: Height, transactions: Vec<Transaction>) -> Block {
        let mut header = BlockHeader {
            signer: self.key(),
            signature: [0u8; 64],
            version: 1,
            network: NETWORK,
            height,
            timestamp: BLOCK_TIME,
            previous_block_hash: [0u8; 32],
        };
        header.signature = *self.keypair.sign(&header.hash()).as_bytes();
        Block {
            header,
            transactions,
        }
    }
}

pub fn state(accounts: Vec<AccountState>) -> Arc<StateCache> {
    let state = StateCache::builder()
        .with_sub_cache(AccountStateCache::with_accounts(NETWORK, accounts))
        .with_sub_cache(LockInfoCache::new())
        .build()
        .expect("sub-caches are distinct");
    Arc::new(state)
}

pub fn registry() -> Arc<TransactionRegistry> {
    Arc::new(default_registry().expect("default plugins are distinct"))
}

pub fn processor(accounts: Vec<AccountState>) -> EntityProcessor {
    let pipeline = ValidationPipeline::with_defaults(&ValidationConfig::default(), registry());
    EntityProcessor::new(pipeline, state(accounts)).expect("fixture networks agree")
}
