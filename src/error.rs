use std::fmt;

use thiserror::Error;

use crate::algorithm::Algorithm;
use crate::base64url::DecodeError;

/// Error type for token decoding, key import, verification and signing.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Token is not a well-formed compact JWT.
    #[error("malformed token: {0}")]
    MalformedToken(#[from] TokenError),

    /// `alg` is not one of the supported RSA algorithms.
    #[error("unsupported algorithm `{0}`, expected one of RS256, RS384, RS512")]
    UnsupportedAlgorithm(String),

    /// Key material is not usable for the requested algorithm and operation.
    #[error("invalid key: {0}")]
    InvalidKey(#[from] KeyError),

    /// Signer was called without an algorithm.
    #[error("no algorithm specified")]
    MissingAlgorithm,

    /// Input is not base64url.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Signature does not match the token.
    #[error("invalid signature")]
    InvalidSignature,

    /// Payload does not deserialize into the requested claims type.
    #[error("claims do not match the requested type: {0}")]
    Claims(#[source] serde_json::Error),

    /// Header or payload could not be serialized.
    #[error("unable to serialize token segment: {0}")]
    Serialize(#[source] serde_json::Error),

    /// Signature primitive failure.
    #[error("signing failed: {0}")]
    Signing(#[source] rsa::Error),
}

/// Compact token segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    Header,
    Payload,
    Signature,
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Header => f.write_str("header"),
            Self::Payload => f.write_str("payload"),
            Self::Signature => f.write_str("signature"),
        }
    }
}

/// Reason a compact token was rejected by the decoder.
#[derive(Error, Debug)]
pub enum TokenError {
    #[error("expected 3 segments, found {0}")]
    SegmentCount(usize),

    #[error("empty {0} segment")]
    EmptySegment(Segment),

    #[error("{segment} segment is not base64url: {source}")]
    Encoding {
        segment: Segment,
        #[source]
        source: DecodeError,
    },

    #[error("{segment} segment is not a valid JSON object: {source}")]
    Json {
        segment: Segment,
        #[source]
        source: serde_json::Error,
    },
}

/// Reason key material was rejected by the importer.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum KeyError {
    /// Key type is not supported
    #[error("key type not supported, expected `RSA`")]
    UnsupportedKeyType,
    /// Missing modulus in RSA key
    #[error("missing modulus in RSA key")]
    MissingModulus,
    /// Missing exponent in RSA key
    #[error("missing exponent in RSA key")]
    MissingExponent,
    /// Missing private key parameter in JWK
    #[error("missing private key parameter in JWK")]
    MissingPrivateKey,
    /// Missing prime in RSA key
    #[error("missing prime in RSA key")]
    MissingPrime,
    /// Modulus shorter than 2048 bits
    #[error("invalid key length: {0} bytes")]
    InvalidKeyLength(usize),
    #[error("key is bound to algorithm `{key}`, not `{requested}`")]
    AlgorithmMismatch { key: String, requested: Algorithm },
    #[error("key does not permit the `{0}` operation")]
    OperationNotPermitted(&'static str),
    #[error("malformed JWK: {0}")]
    Jwk(#[source] serde_json::Error),
    #[error("PEM body is not base64: {0}")]
    PemEncoding(#[source] base64::DecodeError),
    #[error("not a SubjectPublicKeyInfo structure: {0}")]
    Spki(#[source] spki::der::Error),
    #[error("unsupported public key algorithm {0}")]
    UnsupportedSpkiAlgorithm(spki::ObjectIdentifier),
    #[error("not an RSA public key: {0}")]
    Pkcs1(#[source] rsa::pkcs1::Error),
    #[error("not a PKCS#8 RSA private key: {0}")]
    Pkcs8(#[source] rsa::pkcs8::Error),
    #[error(transparent)]
    Rsa(#[from] rsa::Error),
}
