use serde::Serialize;

use crate::algorithm::resolve;
use crate::base64url;
use crate::decode::Payload;
use crate::error::Error;
use crate::header::Header;
use crate::jwk::key_id_suffix;
use crate::key::{import, KeyMaterial, Sign};

/// Signer options.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignOptions {
    /// JWT `alg` to sign with. Required.
    pub algorithm: Option<String>,

    /// Header to sign with. Its `alg` is always replaced by
    /// [`algorithm`](Self::algorithm). Defaults to [`Header::default`].
    pub header: Option<Header>,
}

impl SignOptions {
    pub fn new(algorithm: impl Into<String>) -> Self {
        Self {
            algorithm: Some(algorithm.into()),
            header: None,
        }
    }

    pub fn with_header(mut self, header: Header) -> Self {
        self.header = Some(header);
        self
    }
}

fn base64_encode_json<T: Serialize>(object: &T) -> Result<String, Error> {
    let json = serde_json::to_vec(object).map_err(Error::Serialize)?;
    Ok(base64url::encode(json))
}

/// Signs `payload` into a compact JWT.
///
/// The header is a copy of `options.header` with `alg` overwritten, and the
/// payload is a copy of `payload` with `iat` set to the current time in
/// seconds, replacing any `iat` the caller supplied. Neither argument is
/// modified.
pub fn sign(payload: &Payload, key: &KeyMaterial, options: &SignOptions) -> Result<String, Error> {
    sign_at(payload, key, options, chrono::Utc::now().timestamp())
}

pub(crate) fn sign_at(
    payload: &Payload,
    key: &KeyMaterial,
    options: &SignOptions,
    issued_at: i64,
) -> Result<String, Error> {
    let algorithm = match options.algorithm.as_deref() {
        Some(name) if !name.is_empty() => resolve(name)?,
        _ => return Err(Error::MissingAlgorithm),
    };
    let signer = import::<Sign>(key, algorithm)?;

    let mut header = options.header.clone().unwrap_or_default();
    header.algorithm = algorithm.algorithm().as_str().to_owned();
    let mut payload = payload.clone();
    payload.insert("iat".to_owned(), issued_at.into());

    let signing_input = [base64_encode_json(&header)?, base64_encode_json(&payload)?].join(".");
    let signature = signer.sign(signing_input.as_bytes())?;
    log::debug!(
        "signed {} token{} issued at {}",
        algorithm.algorithm(),
        key_id_suffix(header.key_id.as_deref()),
        issued_at
    );
    Ok([signing_input, base64url::encode(signature)].join("."))
}
