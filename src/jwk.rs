use std::convert::TryFrom;

use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use crate::algorithm::AlgorithmDescriptor;
use crate::base64url;
use crate::error::KeyError;

// RFC 7517 - JSON Web Key (JWK)
// RFC 7518 - JSON Web Algorithms (JWA)

/// Smallest accepted RSA modulus, in bytes (RFC 7518 §3.3).
pub(crate) const MIN_MODULUS_LEN: usize = 256;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct JWK {
    #[serde(rename = "use")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_key_use: Option<String>,
    #[serde(rename = "key_ops")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_operations: Option<Vec<String>>,
    #[serde(rename = "alg")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub algorithm: Option<String>,
    #[serde(rename = "kid")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_id: Option<String>,
    #[serde(flatten)]
    pub params: Params,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(tag = "kty")]
pub enum Params {
    RSA(RSAParams),
    /// Any `kty` other than `RSA`. Kept so that a key set mixing key types
    /// still parses; such keys are rejected at import.
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default, Zeroize)]
pub struct RSAParams {
    // Parameters for RSA Public Keys
    #[serde(rename = "n")]
    pub modulus: Option<Base64urlUInt>,
    #[serde(rename = "e")]
    pub exponent: Option<Base64urlUInt>,

    // Parameters for RSA Private Keys
    #[serde(rename = "d")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_exponent: Option<Base64urlUInt>,
    #[serde(rename = "p")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_prime_factor: Option<Base64urlUInt>,
    #[serde(rename = "q")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub second_prime_factor: Option<Base64urlUInt>,
    #[serde(rename = "dp")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_prime_factor_crt_exponent: Option<Base64urlUInt>,
    #[serde(rename = "dq")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub second_prime_factor_crt_exponent: Option<Base64urlUInt>,
    #[serde(rename = "qi")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_crt_coefficient: Option<Base64urlUInt>,
    #[serde(rename = "oth")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other_primes_info: Option<Vec<Prime>>,
}

impl Drop for RSAParams {
    fn drop(&mut self) {
        // Zeroize private key fields
        if let Some(ref mut d) = self.private_exponent {
            d.zeroize();
        }
        if let Some(ref mut p) = self.first_prime_factor {
            p.zeroize();
        }
        if let Some(ref mut q) = self.second_prime_factor {
            q.zeroize();
        }
        if let Some(ref mut dp) = self.first_prime_factor_crt_exponent {
            dp.zeroize();
        }
        if let Some(ref mut dq) = self.second_prime_factor_crt_exponent {
            dq.zeroize();
        }
        if let Some(ref mut qi) = self.first_crt_coefficient {
            qi.zeroize();
        }
        if let Some(ref mut primes) = self.other_primes_info {
            for prime in primes {
                prime.zeroize();
            }
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Zeroize)]
pub struct Prime {
    #[serde(rename = "r")]
    pub prime_factor: Base64urlUInt,
    #[serde(rename = "d")]
    pub factor_crt_exponent: Base64urlUInt,
    #[serde(rename = "t")]
    pub factor_crt_coefficient: Base64urlUInt,
}

/// Big-endian unsigned integer, base64url-encoded in JSON.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Hash, Zeroize)]
#[serde(try_from = "String")]
#[serde(into = "Base64urlUIntString")]
pub struct Base64urlUInt(pub Vec<u8>);
type Base64urlUIntString = String;

/// JWK Set (RFC 7517 §5).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct JWKSet {
    pub keys: Vec<JWK>,
}

impl JWKSet {
    /// Key whose `kid` is `key_id`.
    pub fn key(&self, key_id: &str) -> Option<&JWK> {
        self.keys
            .iter()
            .find(|jwk| jwk.key_id.as_deref() == Some(key_id))
    }
}

impl JWK {
    /// Public part of the key, with every private member removed.
    pub fn to_public(&self) -> Self {
        Self {
            public_key_use: self.public_key_use.clone(),
            key_operations: None,
            algorithm: self.algorithm.clone(),
            key_id: self.key_id.clone(),
            params: self.params.to_public(),
        }
    }

    /// Checks the members that bind a JWK to an algorithm and an operation:
    /// `alg` must name `algorithm`, `use` must be `sig` and `key_ops` must
    /// list `operation`, whenever those members are present.
    pub(crate) fn check_binding(
        &self,
        algorithm: AlgorithmDescriptor,
        operation: &'static str,
    ) -> Result<(), KeyError> {
        if let Some(key_algorithm) = &self.algorithm {
            if key_algorithm != algorithm.algorithm().as_str() {
                log::warn!(
                    "JWK{} is bound to {}, refusing to use it for {}",
                    key_id_suffix(self.key_id.as_deref()),
                    key_algorithm,
                    algorithm.algorithm()
                );
                return Err(KeyError::AlgorithmMismatch {
                    key: key_algorithm.clone(),
                    requested: algorithm.algorithm(),
                });
            }
        }
        if let Some(public_key_use) = &self.public_key_use {
            if public_key_use != "sig" {
                return Err(KeyError::OperationNotPermitted(operation));
            }
        }
        if let Some(key_operations) = &self.key_operations {
            if !key_operations.iter().any(|op| op == operation) {
                return Err(KeyError::OperationNotPermitted(operation));
            }
        }
        Ok(())
    }
}

pub(crate) fn key_id_suffix(key_id: Option<&str>) -> String {
    match key_id {
        Some(kid) => format!(" `{kid}`"),
        None => String::new(),
    }
}

impl Params {
    pub fn to_public(&self) -> Self {
        match self {
            Self::RSA(params) => Self::RSA(params.to_public()),
            Self::Unsupported => Self::Unsupported,
        }
    }
}

impl RSAParams {
    /// Construct a RSA public key
    pub fn new_public(n: &[u8], e: &[u8]) -> Self {
        Self::public(
            Some(Base64urlUInt(n.to_vec())),
            Some(Base64urlUInt(e.to_vec())),
        )
    }

    pub fn to_public(&self) -> Self {
        Self::public(self.modulus.clone(), self.exponent.clone())
    }

    fn public(modulus: Option<Base64urlUInt>, exponent: Option<Base64urlUInt>) -> Self {
        Self {
            modulus,
            exponent,
            private_exponent: None,
            first_prime_factor: None,
            second_prime_factor: None,
            first_prime_factor_crt_exponent: None,
            second_prime_factor_crt_exponent: None,
            first_crt_coefficient: None,
            other_primes_info: None,
        }
    }

    pub fn is_private(&self) -> bool {
        self.private_exponent.is_some()
    }

    pub fn validate_key_size(&self) -> Result<(), KeyError> {
        let n = &self.modulus.as_ref().ok_or(KeyError::MissingModulus)?.0;
        let len = significant_len(n);
        if len < MIN_MODULUS_LEN {
            return Err(KeyError::InvalidKeyLength(len));
        }
        Ok(())
    }
}

/// Length of a big-endian integer without its leading zero bytes.
pub(crate) fn significant_len(bytes: &[u8]) -> usize {
    bytes.len() - bytes.iter().take_while(|&&b| b == 0).count()
}

impl From<&Base64urlUInt> for rsa::BigUint {
    fn from(uint: &Base64urlUInt) -> Self {
        Self::from_bytes_be(&uint.0)
    }
}

impl TryFrom<&RSAParams> for rsa::RsaPublicKey {
    type Error = KeyError;
    fn try_from(params: &RSAParams) -> Result<Self, Self::Error> {
        let n = params.modulus.as_ref().ok_or(KeyError::MissingModulus)?;
        let e = params.exponent.as_ref().ok_or(KeyError::MissingExponent)?;
        Ok(Self::new(n.into(), e.into())?)
    }
}

impl TryFrom<&RSAParams> for rsa::RsaPrivateKey {
    type Error = KeyError;
    #[allow(clippy::many_single_char_names)]
    fn try_from(params: &RSAParams) -> Result<Self, Self::Error> {
        let n = params.modulus.as_ref().ok_or(KeyError::MissingModulus)?;
        let e = params.exponent.as_ref().ok_or(KeyError::MissingExponent)?;
        let d = params
            .private_exponent
            .as_ref()
            .ok_or(KeyError::MissingPrivateKey)?;
        let p = params
            .first_prime_factor
            .as_ref()
            .ok_or(KeyError::MissingPrime)?;
        let q = params
            .second_prime_factor
            .as_ref()
            .ok_or(KeyError::MissingPrime)?;
        let mut primes = vec![p.into(), q.into()];
        for prime in params.other_primes_info.iter().flatten() {
            primes.push((&prime.prime_factor).into());
        }
        let key = Self::from_components(n.into(), e.into(), d.into(), primes)?;
        key.validate()?;
        Ok(key)
    }
}

impl TryFrom<String> for Base64urlUInt {
    type Error = base64url::DecodeError;
    fn try_from(data: String) -> Result<Self, Self::Error> {
        Ok(Self(base64url::decode(data)?))
    }
}

impl From<&Base64urlUInt> for String {
    fn from(data: &Base64urlUInt) -> String {
        base64url::encode(&data.0)
    }
}

impl From<Base64urlUInt> for Base64urlUIntString {
    fn from(data: Base64urlUInt) -> Base64urlUIntString {
        String::from(&data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::{resolve, Algorithm};
    use serde_json::json;

    const RSA_JSON: &str = include_str!("../tests/rsa2048-rfc7515.json");
    const RSA_PK_JSON: &str = include_str!("../tests/rsa2048-rfc7515-pk.json");

    #[test]
    fn rsa_from_str() {
        let key: JWK = serde_json::from_str(RSA_JSON).unwrap();
        let Params::RSA(params) = &key.params else {
            panic!("expected RSA params");
        };
        assert!(params.is_private());
        assert_eq!(params.exponent, Some(Base64urlUInt(vec![1, 0, 1])));
        assert_eq!(params.modulus.as_ref().unwrap().0.len(), 256);
        params.validate_key_size().unwrap();
    }

    #[test]
    fn to_public_drops_private_members() {
        let key: JWK = serde_json::from_str(RSA_JSON).unwrap();
        let public: JWK = serde_json::from_str(RSA_PK_JSON).unwrap();
        assert_eq!(key.to_public(), public);
        let value = serde_json::to_value(key.to_public()).unwrap();
        assert_eq!(value, json!({"kty": "RSA", "n": value["n"].clone(), "e": "AQAB"}));
    }

    #[test]
    fn unsupported_key_type_parses() {
        let key: JWK = serde_json::from_value(json!({
            "kty": "EC",
            "crv": "P-256",
            "x": "weNJy2HscCSM6AEDTDg04biOvhFhyyWvOHQfeF_PxMQ",
            "y": "e8lnCO-AlStT-NJVX-crhB7QRYhiix03illJOVAOyck",
            "kid": "ec"
        }))
        .unwrap();
        assert_eq!(key.params, Params::Unsupported);
        assert_eq!(key.key_id.as_deref(), Some("ec"));
    }

    #[test]
    fn modulus_must_be_base64url() {
        serde_json::from_value::<JWK>(json!({"kty": "RSA", "n": "a+b/", "e": "AQAB"}))
            .unwrap_err();
    }

    #[test]
    fn short_modulus_rejected() {
        let params = RSAParams::new_public(&[0, 0xc3, 0x5f], &[1, 0, 1]);
        assert!(matches!(
            params.validate_key_size(),
            Err(KeyError::InvalidKeyLength(2))
        ));
        assert!(matches!(
            RSAParams::default().validate_key_size(),
            Err(KeyError::MissingModulus)
        ));
    }

    #[test]
    fn binding_checks() {
        let rs256 = resolve("RS256").unwrap();
        let rs512 = resolve("RS512").unwrap();
        let mut key: JWK = serde_json::from_str(RSA_PK_JSON).unwrap();
        key.check_binding(rs512, "verify").unwrap();

        key.algorithm = Some("RS256".to_string());
        key.check_binding(rs256, "verify").unwrap();
        assert!(matches!(
            key.check_binding(rs512, "verify"),
            Err(KeyError::AlgorithmMismatch {
                requested: Algorithm::RS512,
                ..
            })
        ));

        key.key_operations = Some(vec!["verify".to_string()]);
        key.check_binding(rs256, "verify").unwrap();
        assert!(matches!(
            key.check_binding(rs256, "sign"),
            Err(KeyError::OperationNotPermitted("sign"))
        ));

        key.key_operations = None;
        key.public_key_use = Some("enc".to_string());
        assert!(matches!(
            key.check_binding(rs256, "verify"),
            Err(KeyError::OperationNotPermitted("verify"))
        ));
    }

    #[test]
    fn key_set_lookup() {
        let set: JWKSet = serde_json::from_value(json!({
            "keys": [
                serde_json::from_str::<serde_json::Value>(include_str!("../tests/instance-2022-10-24-pk.json")).unwrap(),
                serde_json::from_str::<serde_json::Value>(include_str!("../tests/local-pk.json")).unwrap(),
            ]
        }))
        .unwrap();
        assert_eq!(set.keys.len(), 2);
        assert_eq!(
            set.key("local").and_then(|k| k.algorithm.as_deref()),
            Some("RS256")
        );
        assert!(set.key("ins_2GIoQhbUpy0hX7B2cVkuTMinXoD").is_some());
        assert!(set.key("missing").is_none());
    }
}
