//! Key import.
//!
//! [`import`] turns caller-supplied [`KeyMaterial`] into an [`ImportedKey`]
//! bound to one algorithm and one usage. The usage is a type parameter:
//! an `ImportedKey<Verify>` has no `sign` method and an `ImportedKey<Sign>`
//! has no `verify` method.
use core::fmt;
use std::convert::TryFrom;
use std::marker::PhantomData;

use rsa::{RsaPrivateKey, RsaPublicKey};

use crate::algorithm::AlgorithmDescriptor;
use crate::error::{Error, KeyError};
use crate::jwk::{key_id_suffix, Params, RSAParams, JWK};
use crate::pem;

/// Caller-owned key input.
#[derive(Clone, PartialEq, Eq)]
pub enum KeyMaterial {
    Jwk(JWK),

    /// ASCII-armored (or bare) base64 DER. SPKI for verification, PKCS#8
    /// for signing.
    Pem(String),
}

impl KeyMaterial {
    pub fn pem(pem: impl Into<String>) -> Self {
        Self::Pem(pem.into())
    }

    /// Interprets a JSON value as a JWK.
    pub fn from_jwk_value(value: serde_json::Value) -> Result<Self, Error> {
        let jwk = serde_json::from_value(value).map_err(KeyError::Jwk)?;
        Ok(Self::Jwk(jwk))
    }

    /// `kid` of a JWK. PEM keys carry none.
    pub fn key_id(&self) -> Option<&str> {
        match self {
            Self::Jwk(jwk) => jwk.key_id.as_deref(),
            Self::Pem(_) => None,
        }
    }

    fn source(&self) -> &'static str {
        match self {
            Self::Jwk(_) => "JWK",
            Self::Pem(_) => "PEM",
        }
    }
}

impl From<JWK> for KeyMaterial {
    fn from(jwk: JWK) -> Self {
        Self::Jwk(jwk)
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Jwk(jwk) => f
                .debug_struct("Jwk")
                .field("kid", &jwk.key_id)
                .field("alg", &jwk.algorithm)
                .finish_non_exhaustive(),
            Self::Pem(_) => f.write_str("Pem(..)"),
        }
    }
}

mod sealed {
    pub trait Sealed {}

    impl Sealed for super::Verify {}
    impl Sealed for super::Sign {}
}

/// What an imported key may be used for.
pub trait KeyUsage: sealed::Sealed {
    /// Cryptographic key the usage needs.
    type Key;

    /// WebCrypto operation name, as found in a JWK `key_ops` member.
    const OPERATION: &'static str;

    fn from_jwk(params: &RSAParams) -> Result<Self::Key, KeyError>;

    fn from_pem(pem: &str) -> Result<Self::Key, KeyError>;
}

/// Signature verification usage.
#[derive(Debug)]
pub enum Verify {}

/// Signing usage.
#[derive(Debug)]
pub enum Sign {}

impl KeyUsage for Verify {
    type Key = RsaPublicKey;

    const OPERATION: &'static str = "verify";

    fn from_jwk(params: &RSAParams) -> Result<Self::Key, KeyError> {
        // A private JWK is only importable for signing.
        if params.is_private() {
            return Err(KeyError::OperationNotPermitted(Self::OPERATION));
        }
        params.validate_key_size()?;
        RsaPublicKey::try_from(params)
    }

    fn from_pem(pem: &str) -> Result<Self::Key, KeyError> {
        pem::public_key_from_pem(pem)
    }
}

impl KeyUsage for Sign {
    type Key = RsaPrivateKey;

    const OPERATION: &'static str = "sign";

    fn from_jwk(params: &RSAParams) -> Result<Self::Key, KeyError> {
        params.validate_key_size()?;
        RsaPrivateKey::try_from(params)
    }

    fn from_pem(pem: &str) -> Result<Self::Key, KeyError> {
        pem::private_key_from_pem(pem)
    }
}

/// Key bound to one algorithm and one usage.
pub struct ImportedKey<U: KeyUsage> {
    algorithm: AlgorithmDescriptor,
    key: U::Key,
    usage: PhantomData<U>,
}

impl<U: KeyUsage> ImportedKey<U> {
    pub fn algorithm(&self) -> AlgorithmDescriptor {
        self.algorithm
    }
}

impl ImportedKey<Verify> {
    /// Checks `signature` over `data`. Any mismatch, including a signature
    /// of the wrong length, is `false`.
    pub fn verify(&self, data: &[u8], signature: &[u8]) -> bool {
        let digest = self.algorithm.digest();
        self.key
            .verify(digest.pkcs1v15(), &digest.digest(data), signature)
            .is_ok()
    }
}

impl ImportedKey<Sign> {
    pub fn sign(&self, data: &[u8]) -> Result<Vec<u8>, Error> {
        let digest = self.algorithm.digest();
        self.key
            .sign(digest.pkcs1v15(), &digest.digest(data))
            .map_err(Error::Signing)
    }
}

impl<U: KeyUsage> fmt::Debug for ImportedKey<U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImportedKey")
            .field("algorithm", &self.algorithm.algorithm())
            .field("usage", &U::OPERATION)
            .finish_non_exhaustive()
    }
}

/// Imports `key` for `algorithm` and the usage `U`.
///
/// JWKs go through the same checks a WebCrypto import applies: `kty` must be
/// `RSA`, and `alg`, `use` and `key_ops` must agree with the request when
/// present. A JWK carrying private members can only be imported for [`Sign`]. PEM input must hold SPKI for [`Verify`] and PKCS#8 for [`Sign`].
/// Moduli shorter than 2048 bits are rejected.
pub fn import<U: KeyUsage>(
    key: &KeyMaterial,
    algorithm: AlgorithmDescriptor,
) -> Result<ImportedKey<U>, Error> {
    let imported = match key {
        KeyMaterial::Jwk(jwk) => {
            let Params::RSA(params) = &jwk.params else {
                return Err(KeyError::UnsupportedKeyType.into());
            };
            jwk.check_binding(algorithm, U::OPERATION)?;
            U::from_jwk(params)?
        }
        KeyMaterial::Pem(pem) => U::from_pem(pem)?,
    };
    log::debug!(
        "imported {} key{} for {} ({} {})",
        key.source(),
        key_id_suffix(key.key_id()),
        U::OPERATION,
        algorithm.scheme(),
        algorithm.digest()
    );
    Ok(ImportedKey {
        algorithm,
        key: imported,
        usage: PhantomData,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::resolve;
    use crate::base64url;
    use serde_json::json;

    const RSA_JSON: &str = include_str!("../tests/rsa2048-rfc7515.json");
    const RSA_PK_JSON: &str = include_str!("../tests/rsa2048-rfc7515-pk.json");
    const RSA_PKCS8: &str = include_str!("../tests/rsa2048-rfc7515.pkcs8.pem");
    const RSA_PKCS1: &str = include_str!("../tests/rsa2048-rfc7515.pkcs1.pem");
    const RSA_SPKI: &str = include_str!("../tests/rsa2048-rfc7515-pk.pem");

    // RFC 7515 Appendix A.2
    const RFC_SIGNING_INPUT: &str = "eyJhbGciOiJSUzI1NiJ9.eyJpc3MiOiJqb2UiLA0KICJleHAiOjEzMDA4MTkzODAsDQogImh0dHA6Ly9leGFtcGxlLmNvbS9pc19yb290Ijp0cnVlfQ";
    const RFC_SIGNATURE: &str = "cC4hiUPoj9Eetdgtv3hF80EGrhuB__dzERat0XF9g2VtQgr9PJbu3XOiZj5RZmh7AAuHIm4Bh-0Qc_lF5YKt_O8W2Fp5jujGbds9uJdbF9CUAr7t1dnZcAcQjbKBYNX4BAynRFdiuB--f_nZLgrnbyTyWzO75vRK5h6xBArLIARNPvkSjtQBMHlb1L07Qe7K0GarZRmB_eSN9383LcOLn6_dO--xi12jzDwusC-eOkHWEsqtFZESc6BfI7noOPqvhJ1phCnvWh6IeYI2w9QOYEUipUTI8np6LbgGY9Fs98rqVt5AXLIhWkWywlVmtVrBp0igcN_IoypGlUPQGe77Rw";

    fn jwk(json: &str) -> KeyMaterial {
        KeyMaterial::Jwk(serde_json::from_str(json).unwrap())
    }

    #[test]
    fn rfc7515_signature_jwk() {
        let rs256 = resolve("RS256").unwrap();
        let signer = import::<Sign>(&jwk(RSA_JSON), rs256).unwrap();
        let signature = signer.sign(RFC_SIGNING_INPUT.as_bytes()).unwrap();
        assert_eq!(base64url::encode(&signature), RFC_SIGNATURE);

        let verifier = import::<Verify>(&jwk(RSA_PK_JSON), rs256).unwrap();
        assert!(verifier.verify(RFC_SIGNING_INPUT.as_bytes(), &signature));
    }

    #[test]
    fn rfc7515_signature_pem() {
        let rs256 = resolve("RS256").unwrap();
        let signer = import::<Sign>(&KeyMaterial::pem(RSA_PKCS8), rs256).unwrap();
        let signature = signer.sign(RFC_SIGNING_INPUT.as_bytes()).unwrap();
        assert_eq!(base64url::encode(&signature), RFC_SIGNATURE);

        let verifier = import::<Verify>(&KeyMaterial::pem(RSA_SPKI), rs256).unwrap();
        assert!(verifier.verify(RFC_SIGNING_INPUT.as_bytes(), &signature));
    }

    #[test]
    fn mismatch_is_false() {
        let rs256 = resolve("RS256").unwrap();
        let verifier = import::<Verify>(&KeyMaterial::pem(RSA_SPKI), rs256).unwrap();
        let signature = base64url::decode(RFC_SIGNATURE).unwrap();
        assert!(!verifier.verify(b"eyJhbGciOiJSUzI1NiJ9.e30", &signature));
        assert!(!verifier.verify(RFC_SIGNING_INPUT.as_bytes(), &signature[1..]));
        assert!(!verifier.verify(RFC_SIGNING_INPUT.as_bytes(), &[]));

        // Same key, other digest.
        let rs512 = resolve("RS512").unwrap();
        let verifier = import::<Verify>(&KeyMaterial::pem(RSA_SPKI), rs512).unwrap();
        assert!(!verifier.verify(RFC_SIGNING_INPUT.as_bytes(), &signature));
    }

    #[test]
    fn public_jwk_cannot_sign() {
        let rs256 = resolve("RS256").unwrap();
        assert!(matches!(
            import::<Sign>(&jwk(RSA_PK_JSON), rs256),
            Err(Error::InvalidKey(KeyError::MissingPrivateKey))
        ));
    }

    #[test]
    fn private_jwk_needs_primes() {
        let rs256 = resolve("RS256").unwrap();
        let mut value: serde_json::Value = serde_json::from_str(RSA_JSON).unwrap();
        let object = value.as_object_mut().unwrap();
        for member in ["p", "q", "dp", "dq", "qi"] {
            object.remove(member);
        }
        let key = KeyMaterial::from_jwk_value(value).unwrap();
        assert!(matches!(
            import::<Sign>(&key, rs256),
            Err(Error::InvalidKey(KeyError::MissingPrime))
        ));
    }

    #[test]
    fn pem_structure_must_match_usage() {
        let rs256 = resolve("RS256").unwrap();
        for pem in [RSA_PKCS1, RSA_SPKI] {
            assert!(matches!(
                import::<Sign>(&KeyMaterial::pem(pem), rs256),
                Err(Error::InvalidKey(KeyError::Pkcs8(_)))
            ));
        }
        for pem in [RSA_PKCS1, RSA_PKCS8] {
            assert!(matches!(
                import::<Verify>(&KeyMaterial::pem(pem), rs256),
                Err(Error::InvalidKey(KeyError::Spki(_)))
            ));
        }
    }

    #[test]
    fn jwk_shape() {
        let rs256 = resolve("RS256").unwrap();
        assert!(matches!(
            KeyMaterial::from_jwk_value(json!({"n": "AQAB", "e": "AQAB"})),
            Err(Error::InvalidKey(KeyError::Jwk(_)))
        ));
        let ec = KeyMaterial::from_jwk_value(json!({"kty": "EC", "crv": "P-256"})).unwrap();
        assert!(matches!(
            import::<Verify>(&ec, rs256),
            Err(Error::InvalidKey(KeyError::UnsupportedKeyType))
        ));
        let no_exponent = KeyMaterial::from_jwk_value(json!({
            "kty": "RSA",
            "n": serde_json::from_str::<serde_json::Value>(RSA_PK_JSON).unwrap()["n"].clone(),
        }))
        .unwrap();
        assert!(matches!(
            import::<Verify>(&no_exponent, rs256),
            Err(Error::InvalidKey(KeyError::MissingExponent))
        ));
        let short = KeyMaterial::from_jwk_value(json!({"kty": "RSA", "n": "AQAB", "e": "AQAB"}))
            .unwrap();
        assert!(matches!(
            import::<Verify>(&short, rs256),
            Err(Error::InvalidKey(KeyError::InvalidKeyLength(3)))
        ));
    }

    #[test]
    fn jwk_bound_to_other_algorithm() {
        let mut key: JWK = serde_json::from_str(RSA_PK_JSON).unwrap();
        key.algorithm = Some("RS256".to_owned());
        let key = KeyMaterial::from(key);
        import::<Verify>(&key, resolve("RS256").unwrap()).unwrap();
        assert!(matches!(
            import::<Verify>(&key, resolve("RS384").unwrap()),
            Err(Error::InvalidKey(KeyError::AlgorithmMismatch { .. }))
        ));
    }

    #[test]
    fn private_jwk_cannot_verify() {
        let rs256 = resolve("RS256").unwrap();
        assert!(matches!(
            import::<Verify>(&jwk(RSA_JSON), rs256),
            Err(Error::InvalidKey(KeyError::OperationNotPermitted("verify")))
        ));
        let public = KeyMaterial::from(serde_json::from_str::<JWK>(RSA_JSON).unwrap().to_public());
        import::<Verify>(&public, rs256).unwrap();
    }

    #[test]
    fn verify_only_jwk_cannot_sign() {
        let mut key: JWK = serde_json::from_str(RSA_JSON).unwrap();
        key.key_operations = Some(vec!["verify".to_owned()]);
        assert!(matches!(
            import::<Sign>(&KeyMaterial::from(key), resolve("RS256").unwrap()),
            Err(Error::InvalidKey(KeyError::OperationNotPermitted("sign")))
        ));
    }

    #[test]
    fn debug_is_redacted() {
        let pem = KeyMaterial::pem(RSA_PKCS8);
        assert_eq!(format!("{pem:?}"), "Pem(..)");
        let key = jwk(RSA_JSON);
        let rendered = format!("{key:?}");
        assert!(!rendered.contains("private_exponent"));
        let signer = import::<Sign>(&key, resolve("RS384").unwrap()).unwrap();
        assert_eq!(
            format!("{signer:?}"),
            "ImportedKey { algorithm: RS384, usage: \"sign\", .. }"
        );
    }
}
