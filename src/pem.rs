//! PEM key parsing.
//!
//! Public keys are DER `SubjectPublicKeyInfo` ([RFC 5280 §4.1.2.7]) and
//! private keys are DER PKCS#8 `PrivateKeyInfo` ([RFC 5208]), both carried as
//! base64 between `-----BEGIN …-----` / `-----END …-----` lines.
//!
//! [RFC 5280 §4.1.2.7]: <https://tools.ietf.org/html/rfc5280#section-4.1.2.7>
//! [RFC 5208]: <https://tools.ietf.org/html/rfc5208>
use base64::{
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
    Engine,
};
use rsa::{
    pkcs1::DecodeRsaPublicKey, pkcs8::DecodePrivateKey, traits::PublicKeyParts, RsaPrivateKey,
    RsaPublicKey,
};
use spki::{der::Decode, ObjectIdentifier};
use zeroize::Zeroizing;

use crate::error::KeyError;
use crate::jwk::MIN_MODULUS_LEN;

/// RSA public key.
///
/// See: <https://www.rfc-editor.org/rfc/rfc3447#appendix-A.1>
const OID_RSA: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.1");

const ARMOR_DELIMITER: &str = "-----";

const STANDARD_INDIFFERENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Parses a PEM (or bare base64) DER-encoded SPKI into an RSA public key.
pub fn public_key_from_pem(pem: &str) -> Result<RsaPublicKey, KeyError> {
    let der = decode_body(pem)?;
    let spki = spki::SubjectPublicKeyInfoOwned::from_der(&der).map_err(KeyError::Spki)?;
    if spki.algorithm.oid != OID_RSA {
        return Err(KeyError::UnsupportedSpkiAlgorithm(spki.algorithm.oid));
    }
    let key = RsaPublicKey::from_pkcs1_der(spki.subject_public_key.raw_bytes())
        .map_err(KeyError::Pkcs1)?;
    check_size(key.size())?;
    Ok(key)
}

/// Parses a PEM (or bare base64) DER-encoded PKCS#8 document into an RSA
/// private key.
pub fn private_key_from_pem(pem: &str) -> Result<RsaPrivateKey, KeyError> {
    let der = Zeroizing::new(decode_body(pem)?);
    let key = RsaPrivateKey::from_pkcs8_der(&der).map_err(KeyError::Pkcs8)?;
    check_size(key.size())?;
    Ok(key)
}

fn check_size(len: usize) -> Result<(), KeyError> {
    if len < MIN_MODULUS_LEN {
        return Err(KeyError::InvalidKeyLength(len));
    }
    Ok(())
}

/// Removes the armor lines and all whitespace, then decodes the base64 body.
fn decode_body(pem: &str) -> Result<Vec<u8>, KeyError> {
    let body = Zeroizing::new(strip_armor(pem));
    STANDARD_INDIFFERENT
        .decode(body.as_bytes())
        .map_err(KeyError::PemEncoding)
}

/// Drops every `-----…-----` run found within a line, and every whitespace
/// character. An unterminated run is left in place.
fn strip_armor(pem: &str) -> String {
    let mut body = String::with_capacity(pem.len());
    for line in pem.lines() {
        let mut rest = line;
        while let Some(start) = rest.find(ARMOR_DELIMITER) {
            let label = &rest[start + ARMOR_DELIMITER.len()..];
            match label.find(ARMOR_DELIMITER) {
                Some(end) => {
                    body.push_str(&rest[..start]);
                    rest = &label[end + ARMOR_DELIMITER.len()..];
                }
                None => break,
            }
        }
        body.push_str(rest);
    }
    body.retain(|c| !c.is_whitespace());
    body
}
