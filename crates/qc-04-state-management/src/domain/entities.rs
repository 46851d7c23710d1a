//! # Domain Entities for State Management
//!
//! ## Type Decisions
//!
//! - `AccountBalances` keeps mosaics in a `BTreeMap` so iteration order is
//!   deterministic; an absent mosaic reads as zero.
//! - `AccountState` carries both identities of an account. The public key
//!   is known only once the account has signed something or been named by
//!   key.
//! - `LockInfo::key()` is the lock cache key: the guarded hash for hash
//!   locks, `SHA3-256(secret || recipient)` for secret locks.

use super::StateError;
use serde::{Deserialize, Serialize};
use sha3::{Digest, Sha3_256};
use shared_types::{Address, Amount, Hash256, Height, Key, LockHashAlgorithm, Mosaic, MosaicId};
use std::collections::BTreeMap;

/// Mosaic balances of one account.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountBalances {
    balances: BTreeMap<MosaicId, Amount>,
}

impl AccountBalances {
    pub fn new() -> Self {
        Self::default()
    }

    /// Held amount of `mosaic_id` (zero if absent).
    pub fn get(&self, mosaic_id: MosaicId) -> Amount {
        self.balances.get(&mosaic_id).copied().unwrap_or(0)
    }

    pub fn credit(&mut self, mosaic_id: MosaicId, amount: Amount) -> Result<(), StateError> {
        if amount == 0 {
            return Ok(());
        }

        let balance = self.balances.entry(mosaic_id).or_insert(0);
        *balance = balance
            .checked_add(amount)
            .ok_or(StateError::BalanceOverflow { mosaic_id })?;
        Ok(())
    }

    /// Debits `amount`; a mosaic reaching zero is dropped.
    pub fn debit(&mut self, mosaic_id: MosaicId, amount: Amount) -> Result<(), StateError> {
        if amount == 0 {
            return Ok(());
        }

        let available = self.get(mosaic_id);
        if available < amount {
            return Err(StateError::InsufficientBalance {
                mosaic_id,
                required: amount,
                available,
            });
        }

        if available == amount {
            self.balances.remove(&mosaic_id);
        } else {
            self.balances.insert(mosaic_id, available - amount);
        }
        Ok(())
    }

    /// Number of mosaics with a non-zero balance.
    pub fn len(&self) -> usize {
        self.balances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (MosaicId, Amount)> + '_ {
        self.balances.iter().map(|(id, amount)| (*id, *amount))
    }
}

/// Account entry, addressable by address or (once known) public key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountState {
    pub address: Address,
    /// Height at which the address was first seen.
    pub address_height: Height,
    pub public_key: Option<Key>,
    /// Height at which the public key was first seen (0 if unknown).
    pub public_key_height: Height,
    pub balances: AccountBalances,
}

impl AccountState {
    /// Creates an empty account known only by address.
    pub fn new(address: Address, address_height: Height) -> Self {
        Self {
            address,
            address_height,
            public_key: None,
            public_key_height: 0,
            balances: AccountBalances::new(),
        }
    }

    /// Adds a mosaic balance, builder style. Intended for seeding state.
    pub fn with_balance(mut self, mosaic_id: MosaicId, amount: Amount) -> Result<Self, StateError> {
        self.balances.credit(mosaic_id, amount)?;
        Ok(self)
    }
}

/// Whether a lock's funds have been claimed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LockStatus {
    Unused,
    Used,
}

/// Kind-specific lock data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LockKind {
    Hash {
        hash: Hash256,
    },
    Secret {
        algorithm: LockHashAlgorithm,
        secret: Hash256,
        recipient: Address,
    },
}

/// Funds escrowed by a lock transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockInfo {
    pub sender: Key,
    pub mosaic: Mosaic,
    /// First height at which the lock has expired.
    pub end_height: Height,
    pub status: LockStatus,
    pub kind: LockKind,
}

impl LockInfo {
    /// Cache key of this lock.
    pub fn key(&self) -> Hash256 {
        match &self.kind {
            LockKind::Hash { hash } => *hash,
            LockKind::Secret {
                secret, recipient, ..
            } => secret_lock_key(secret, recipient),
        }
    }

    /// True if unclaimed and not yet expired at `height`.
    pub fn is_active_at(&self, height: Height) -> bool {
        self.status == LockStatus::Unused && height < self.end_height
    }
}

/// Composite key of a secret lock.
pub fn secret_lock_key(secret: &Hash256, recipient: &Address) -> Hash256 {
    let mut hasher = Sha3_256::new();
    hasher.update(secret);
    hasher.update(recipient);
    hasher.finalize().into()
}
