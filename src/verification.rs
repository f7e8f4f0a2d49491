use crate::algorithm::resolve;
use crate::decode::{decode, DecodedJwt};
use crate::error::Error;
use crate::jwk::key_id_suffix;
use crate::key::{import, KeyMaterial, Verify};

/// Checks the signature of a decoded token against `key`.
///
/// The algorithm comes from the token's `alg` header and the key is imported
/// for verification under it. A well-formed signature that does not match is
/// `Ok(false)`; an unsupported `alg` or an unusable key is an error.
pub fn verify(jwt: &DecodedJwt, key: &KeyMaterial) -> Result<bool, Error> {
    let signing_input = jwt.signing_input();
    let algorithm = resolve(&jwt.header().algorithm)?;
    let verifier = import::<Verify>(key, algorithm)?;
    let valid = verifier.verify(signing_input.as_bytes(), jwt.signature());
    if !valid {
        log::debug!(
            "{} signature mismatch for token{}",
            algorithm.algorithm(),
            key_id_suffix(jwt.header().key_id.as_deref())
        );
    }
    Ok(valid)
}

/// Decodes `token` and checks its signature, failing with
/// [`Error::InvalidSignature`] when it does not match.
pub fn decode_verify(token: &str, key: &KeyMaterial) -> Result<DecodedJwt, Error> {
    let jwt = decode(token)?;
    if verify(&jwt, key)? {
        Ok(jwt)
    } else {
        Err(Error::InvalidSignature)
    }
}
