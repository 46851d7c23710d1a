use serde::Serialize;
use shared_types::{BlockHeader, EntityType, Hash256, Key, NetworkIdentifier, Transaction};
use std::fmt;

/// Borrowed entity being validated or executed.
#[derive(Debug, Clone, Copy)]
pub enum EntityRef<'a> {
    Transaction(&'a Transaction),
    Block(&'a BlockHeader),
}

/// An entity together with its precomputed hash.
///
/// The hash is computed once on construction and shared by every
/// notification published for the entity.
#[derive(Debug, Clone, Copy)]
pub struct WeakEntityInfo<'a> {
    entity: EntityRef<'a>,
    hash: Hash256,
}

impl<'a> WeakEntityInfo<'a> {
    pub fn from_transaction(transaction: &'a Transaction) -> Self {
        Self {
            entity: EntityRef::Transaction(transaction),
            hash: transaction.hash(),
        }
    }

    pub fn from_block(header: &'a BlockHeader) -> Self {
        Self {
            entity: EntityRef::Block(header),
            hash: header.hash(),
        }
    }

    pub fn entity(&self) -> EntityRef<'a> {
        self.entity
    }

    pub fn hash(&self) -> &Hash256 {
        &self.hash
    }

    pub fn entity_type(&self) -> EntityType {
        match self.entity {
            EntityRef::Transaction(transaction) => transaction.entity_type(),
            EntityRef::Block(_) => EntityType::Block,
        }
    }

    pub fn signer(&self) -> &'a Key {
        match self.entity {
            EntityRef::Transaction(transaction) => &transaction.signer,
            EntityRef::Block(header) => &header.signer,
        }
    }

    pub fn network(&self) -> NetworkIdentifier {
        match self.entity {
            EntityRef::Transaction(transaction) => transaction.network,
            EntityRef::Block(header) => header.network,
        }
    }

    /// Hex-encoded hash for logs.
    pub fn hash_hex(&self) -> String {
        hex::encode(self.hash)
    }
}

/// Position of an entity within a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EntityPosition {
    BlockHeader,
    Transaction(usize),
}

impl fmt::Display for EntityPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityPosition::BlockHeader => f.write_str("block header"),
            EntityPosition::Transaction(index) => write!(f, "transaction {index}"),
        }
    }
}
