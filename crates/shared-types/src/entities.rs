//! # Core Domain Entities
//!
//! Defines the ledger entities that flow through admission.
//!
//! ## Clusters
//!
//! - **Primitives**: `Key`, `Signature`, `Hash256`, `Address`, amounts and heights
//! - **Identifiers**: `NetworkIdentifier`, `EntityType`, `LockHashAlgorithm`
//! - **Chain**: `Transaction`, `TransactionBody`, `BlockHeader`, `Block`

use crate::errors::TypeError;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, Bytes};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// CLUSTER A: PRIMITIVES
// =============================================================================

/// A 32-byte hash (SHA-256 or SHA3-256).
pub type Hash256 = [u8; 32];

/// A 64-byte Ed25519 signature.
pub type Signature = [u8; 64];

/// A 32-byte Ed25519 public key.
pub type Key = [u8; 32];

/// Size of a decoded address: network byte, 20-byte body, 4-byte checksum.
pub const ADDRESS_DECODED_SIZE: usize = 25;

/// A network-qualified account address derived from a public key.
pub type Address = [u8; ADDRESS_DECODED_SIZE];

/// Identifier of a fungible asset.
pub type MosaicId = u64;

/// Quantity of a mosaic in atomic units.
pub type Amount = u64;

/// Chain height.
pub type Height = u64;

/// Milliseconds since the network epoch.
pub type Timestamp = u64;

/// Duration measured in blocks.
pub type BlockDuration = u64;

/// A quantity of a single mosaic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Mosaic {
    /// Asset identifier.
    pub id: MosaicId,
    /// Atomic units.
    pub amount: Amount,
}

impl Mosaic {
    /// Creates a mosaic quantity.
    pub const fn new(id: MosaicId, amount: Amount) -> Self {
        Self { id, amount }
    }
}

// =============================================================================
// CLUSTER B: IDENTIFIERS
// =============================================================================

/// The network an entity or address belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum NetworkIdentifier {
    /// Public main network.
    Mainnet = 0x68,
    /// Public test network.
    Testnet = 0x98,
    /// Private network.
    Private = 0x78,
}

impl NetworkIdentifier {
    /// Raw byte used as the address prefix.
    pub const fn as_byte(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for NetworkIdentifier {
    type Error = TypeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x68 => Ok(Self::Mainnet),
            0x98 => Ok(Self::Testnet),
            0x78 => Ok(Self::Private),
            other => Err(TypeError::UnknownNetwork(other)),
        }
    }
}

impl FromStr for NetworkIdentifier {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mainnet" => Ok(Self::Mainnet),
            "testnet" => Ok(Self::Testnet),
            "private" => Ok(Self::Private),
            other => Err(TypeError::UnknownNetworkName(other.to_string())),
        }
    }
}

impl fmt::Display for NetworkIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Mainnet => "mainnet",
            Self::Testnet => "testnet",
            Self::Private => "private",
        };
        f.write_str(name)
    }
}

/// Discriminant of a verifiable entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u16)]
pub enum EntityType {
    /// Block header.
    Block = 0x8143,
    /// Mosaic transfer with optional message.
    Transfer = 0x4154,
    /// Hash lock (collateral for a pending aggregate).
    HashLock = 0x4148,
    /// Secret lock (atomic swap leg).
    SecretLock = 0x4152,
}

impl EntityType {
    /// Raw 16-bit discriminant.
    pub const fn as_u16(self) -> u16 {
        self as u16
    }
}

impl TryFrom<u16> for EntityType {
    type Error = TypeError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            0x8143 => Ok(Self::Block),
            0x4154 => Ok(Self::Transfer),
            0x4148 => Ok(Self::HashLock),
            0x4152 => Ok(Self::SecretLock),
            other => Err(TypeError::UnknownEntityType(other)),
        }
    }
}

/// Hash algorithm used to derive a secret lock's secret from its proof.
///
/// Secret lock bodies carry the raw byte so that unknown algorithms stay
/// representable and can be rejected by validation.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum LockHashAlgorithm {
    /// SHA3-256.
    Sha3_256 = 0,
    /// Keccak-256.
    Keccak_256 = 1,
    /// RIPEMD-160 over SHA-256.
    Hash_160 = 2,
    /// Double SHA-256.
    Hash_256 = 3,
}

impl TryFrom<u8> for LockHashAlgorithm {
    type Error = TypeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Sha3_256),
            1 => Ok(Self::Keccak_256),
            2 => Ok(Self::Hash_160),
            3 => Ok(Self::Hash_256),
            other => Err(TypeError::UnknownHashAlgorithm(other)),
        }
    }
}

// =============================================================================
// CLUSTER C: THE CHAIN
// =============================================================================

/// Type-specific transaction fields, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionBody {
    /// Moves mosaics to a recipient.
    Transfer {
        /// Recipient address.
        recipient: Address,
        /// Arbitrary message bytes.
        message: Vec<u8>,
        /// Mosaics to move, expected in strictly ascending id order.
        mosaics: Vec<Mosaic>,
    },
    /// Locks collateral for a pending transaction hash.
    HashLock {
        /// Locked collateral.
        mosaic: Mosaic,
        /// Lock lifetime in blocks.
        duration: BlockDuration,
        /// Hash of the guarded transaction.
        hash: Hash256,
    },
    /// Locks mosaics redeemable by the recipient with a proof.
    SecretLock {
        /// Locked mosaic.
        mosaic: Mosaic,
        /// Lock lifetime in blocks.
        duration: BlockDuration,
        /// Raw `LockHashAlgorithm` byte.
        hash_algorithm: u8,
        /// Hash of the proof.
        secret: Hash256,
        /// Address able to claim the lock.
        recipient: Address,
    },
}

impl TransactionBody {
    /// Entity type this body belongs to.
    pub fn entity_type(&self) -> EntityType {
        match self {
            Self::Transfer { .. } => EntityType::Transfer,
            Self::HashLock { .. } => EntityType::HashLock,
            Self::SecretLock { .. } => EntityType::SecretLock,
        }
    }

    fn hash_into(&self, hasher: &mut Sha256) {
        match self {
            Self::Transfer {
                recipient,
                message,
                mosaics,
            } => {
                hasher.update(recipient);
                hasher.update((message.len() as u64).to_le_bytes());
                hasher.update(message);
                hasher.update((mosaics.len() as u64).to_le_bytes());
                for mosaic in mosaics {
                    hasher.update(mosaic.id.to_le_bytes());
                    hasher.update(mosaic.amount.to_le_bytes());
                }
            }
            Self::HashLock {
                mosaic,
                duration,
                hash,
            } => {
                hasher.update(mosaic.id.to_le_bytes());
                hasher.update(mosaic.amount.to_le_bytes());
                hasher.update(duration.to_le_bytes());
                hasher.update(hash);
            }
            Self::SecretLock {
                mosaic,
                duration,
                hash_algorithm,
                secret,
                recipient,
            } => {
                hasher.update(mosaic.id.to_le_bytes());
                hasher.update(mosaic.amount.to_le_bytes());
                hasher.update(duration.to_le_bytes());
                hasher.update([*hash_algorithm]);
                hasher.update(secret);
                hasher.update(recipient);
            }
        }
    }
}

/// A signed transaction as received from the network.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Signer's public key.
    pub signer: Key,
    /// Signature over `hash()`.
    #[serde_as(as = "Bytes")]
    pub signature: Signature,
    /// Transaction format version.
    pub version: u8,
    /// Network the transaction targets.
    pub network: NetworkIdentifier,
    /// Maximum fee the signer is willing to pay.
    pub max_fee: Amount,
    /// Latest block time at which the transaction may be included.
    pub deadline: Timestamp,
    /// Type-specific fields.
    pub body: TransactionBody,
}

impl Transaction {
    /// Entity type derived from the body.
    pub fn entity_type(&self) -> EntityType {
        self.body.entity_type()
    }

    /// Compute the transaction hash.
    ///
    /// Covers every field except the signature; this is the signed payload.
    pub fn hash(&self) -> Hash256 {
        let mut hasher = Sha256::new();
        hasher.update(self.entity_type().as_u16().to_le_bytes());
        hasher.update([self.version, self.network.as_byte()]);
        hasher.update(self.signer);
        hasher.update(self.max_fee.to_le_bytes());
        hasher.update(self.deadline.to_le_bytes());
        self.body.hash_into(&mut hasher);
        hasher.finalize().into()
    }
}

/// The header of a block.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeader {
    /// Harvester's public key.
    pub signer: Key,
    /// Signature over `hash()`.
    #[serde_as(as = "Bytes")]
    pub signature: Signature,
    /// Block format version.
    pub version: u8,
    /// Network the block belongs to.
    pub network: NetworkIdentifier,
    /// Block height in the chain.
    pub height: Height,
    /// Block time.
    pub timestamp: Timestamp,
    /// Hash of the parent block.
    pub previous_block_hash: Hash256,
}

impl BlockHeader {
    /// Compute the header hash (signature excluded).
    pub fn hash(&self) -> Hash256 {
        let mut hasher = Sha256::new();
        hasher.update(EntityType::Block.as_u16().to_le_bytes());
        hasher.update([self.version, self.network.as_byte()]);
        hasher.update(self.signer);
        hasher.update(self.height.to_le_bytes());
        hasher.update(self.timestamp.to_le_bytes());
        hasher.update(self.previous_block_hash);
        hasher.finalize().into()
    }
}

/// A block header with its ordered transactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// The block header.
    pub header: BlockHeader,
    /// Transactions in execution order.
    pub transactions: Vec<Transaction>,
}
