//! Decoding, verification and signing of [JSON Web Tokens (JWT)][jwt] secured
//! with RSA [JSON Web Signatures][jws].
//!
//! Only the RSASSA-PKCS1-v1_5 family is supported: `RS256`, `RS384` and
//! `RS512`. Keys are supplied either as a [JSON Web Key][jwk] or as a PEM
//! document (SPKI for public keys, PKCS#8 for private keys).
//!
//! [jwt]: <https://www.rfc-editor.org/rfc/rfc7519>
//! [jws]: <https://www.rfc-editor.org/rfc/rfc7515>
//! [jwk]: <https://www.rfc-editor.org/rfc/rfc7517>
//!
//! # Basic Usage
//!
//! ```
//! use rsa_jwt::{decode, sign, verify, Header, KeyMaterial, Payload, SignOptions};
//! use serde_json::json;
//!
//! let private_key = KeyMaterial::pem(include_str!("../tests/rsa2048-rfc7515.pkcs8.pem"));
//! let public_key = KeyMaterial::pem(include_str!("../tests/rsa2048-rfc7515-pk.pem"));
//!
//! let mut claims = Payload::new();
//! claims.insert("sub".to_owned(), json!("user_2GIpXOEpVyJw51rkZn9Kmnc6Sxr"));
//!
//! // `iat` is stamped by the signer.
//! let options = SignOptions::new("RS256").with_header(Header::default().with_key_id("local"));
//! let token = sign(&claims, &private_key, &options).expect("signature failed");
//!
//! let jwt = decode(&token).expect("malformed token");
//! assert!(verify(&jwt, &public_key).expect("verification failed"));
//! assert!(jwt.payload().contains_key("iat"));
//! ```
//!
//! # Verification outcome
//!
//! [`verify`] returns `Ok(false)` for a signature that does not match. Errors
//! are reserved for tokens, algorithms and keys that cannot be used at all.
//! Use [`decode_verify`] to treat both the same way.
#![cfg_attr(docsrs, feature(doc_auto_cfg), feature(doc_cfg))]

pub mod algorithm;
pub mod base64url;
pub mod decode;
pub mod error;
pub mod hash;
pub mod header;
pub mod jwk;
pub mod key;
pub mod pem;
pub mod signing;
pub mod verification;

pub use algorithm::{resolve, Algorithm, AlgorithmDescriptor, DigestKind, SignatureScheme};
pub use decode::{decode, DecodedJwt, Payload, RawSegments};
pub use error::{Error, KeyError, Segment, TokenError};
pub use header::Header;
pub use jwk::{JWKSet, JWK};
pub use key::{import, ImportedKey, KeyMaterial, KeyUsage, Sign, Verify};
pub use signing::{sign, SignOptions};
pub use verification::{decode_verify, verify};
