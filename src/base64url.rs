//! Base64url without padding (RFC 7515 §2).
//!
//! Encoding never emits `=`. Decoding accepts padded and unpadded input but
//! only the URL-safe alphabet: `+` and `/` are rejected.

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use thiserror::Error;

const URL_SAFE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Input is not base64url.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid base64url data: {0}")]
pub struct DecodeError(#[from] base64::DecodeError);

pub fn encode(bytes: impl AsRef<[u8]>) -> String {
    URL_SAFE.encode(bytes)
}

pub fn decode(data: impl AsRef<[u8]>) -> Result<Vec<u8>, DecodeError> {
    Ok(URL_SAFE.decode(data)?)
}
