//! # Address Derivation
//!
//! An address is `network byte || body || checksum` where the body is the
//! last 20 bytes of `SHA3-256(public key)` and the checksum is the first
//! 4 bytes of `SHA3-256(network byte || body)`.

use crate::entities::{Address, Key, NetworkIdentifier, ADDRESS_DECODED_SIZE};
use crate::errors::TypeError;
use sha3::{Digest, Sha3_256};

const BODY_SIZE: usize = 20;
const CHECKSUM_SIZE: usize = 4;

/// Derives the canonical address of `public_key` on `network`.
pub fn public_key_to_address(public_key: &Key, network: NetworkIdentifier) -> Address {
    let key_hash = Sha3_256::digest(public_key);

    let mut address = [0u8; ADDRESS_DECODED_SIZE];
    address[0] = network.as_byte();
    address[1..=BODY_SIZE].copy_from_slice(&key_hash[32 - BODY_SIZE..]);

    let checksum = Sha3_256::digest(&address[..=BODY_SIZE]);
    address[BODY_SIZE + 1..].copy_from_slice(&checksum[..CHECKSUM_SIZE]);
    address
}

/// Returns true if `address` carries `network`'s prefix and a correct checksum.
pub fn is_valid_address(address: &Address, network: NetworkIdentifier) -> bool {
    if address[0] != network.as_byte() {
        return false;
    }

    let checksum = Sha3_256::digest(&address[..=BODY_SIZE]);
    address[BODY_SIZE + 1..] == checksum[..CHECKSUM_SIZE]
}

/// Parses a hex-encoded public key.
pub fn parse_key(hex_str: &str) -> Result<Key, TypeError> {
    let bytes = hex::decode(hex_str).map_err(|_| TypeError::InvalidHex)?;
    bytes
        .as_slice()
        .try_into()
        .map_err(|_| TypeError::InvalidLength {
            expected: 32,
            actual: bytes.len(),
        })
}

/// Parses a hex-encoded address.
pub fn parse_address(hex_str: &str) -> Result<Address, TypeError> {
    let bytes = hex::decode(hex_str).map_err(|_| TypeError::InvalidHex)?;
    bytes
        .as_slice()
        .try_into()
        .map_err(|_| TypeError::InvalidLength {
            expected: ADDRESS_DECODED_SIZE,
            actual: bytes.len(),
        })
}
