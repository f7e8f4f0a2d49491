//! Cryptographic hash functions

use sha2::Digest;

/// SHA-256 hash
pub fn sha256(data: &[u8]) -> [u8; 32] {
    sha2::Sha256::digest(data).into()
}

/// SHA-384 hash
pub fn sha384(data: &[u8]) -> [u8; 48] {
    let mut hash = [0; 48];
    hash.copy_from_slice(&sha2::Sha384::digest(data));
    hash
}

/// SHA-512 hash
pub fn sha512(data: &[u8]) -> [u8; 64] {
    let mut hash = [0; 64];
    hash.copy_from_slice(&sha2::Sha512::digest(data));
    hash
}
