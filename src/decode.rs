use std::str::FromStr;

use serde::de::DeserializeOwned;

use crate::base64url;
use crate::error::{Error, Segment, TokenError};
use crate::header::Header;
use crate::key::KeyMaterial;

/// JWT claims set. Claims are carried as-is, none are interpreted.
pub type Payload = serde_json::Map<String, serde_json::Value>;

/// Header and payload segments exactly as they appeared in the token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSegments {
    pub header: String,
    pub payload: String,
}

/// Compact JWT split into its parts. No signature or claim has been checked.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedJwt {
    header: Header,
    payload: Payload,
    signature: Vec<u8>,
    raw: RawSegments,
}

impl DecodedJwt {
    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    pub fn signature(&self) -> &[u8] {
        &self.signature
    }

    pub fn raw(&self) -> &RawSegments {
        &self.raw
    }

    /// Bytes the signature covers: the raw header and payload segments
    /// joined by a dot. Never a re-serialization of the parsed JSON.
    pub fn signing_input(&self) -> String {
        [self.raw.header.as_str(), self.raw.payload.as_str()].join(".")
    }

    /// Deserializes the payload into `T`.
    pub fn claims<T: DeserializeOwned>(&self) -> Result<T, Error> {
        serde_json::from_value(serde_json::Value::Object(self.payload.clone()))
            .map_err(Error::Claims)
    }

    /// See [`verify`](crate::verify).
    pub fn verify(&self, key: &KeyMaterial) -> Result<bool, Error> {
        crate::verification::verify(self, key)
    }
}

impl FromStr for DecodedJwt {
    type Err = Error;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        decode(token)
    }
}

/// Splits a compact JWT and decodes its segments.
///
/// The token must have exactly three non-empty dot-separated segments. The
/// header must be a JSON object with a string `alg` and the payload a JSON
/// object.
pub fn decode(token: &str) -> Result<DecodedJwt, Error> {
    let segments: Vec<&str> = token.split('.').collect();
    let &[header_b64, payload_b64, signature_b64] = segments.as_slice() else {
        return Err(TokenError::SegmentCount(segments.len()).into());
    };
    for (segment, text) in [
        (Segment::Header, header_b64),
        (Segment::Payload, payload_b64),
        (Segment::Signature, signature_b64),
    ] {
        if text.is_empty() {
            return Err(TokenError::EmptySegment(segment).into());
        }
    }
    let header = decode_json(Segment::Header, header_b64)?;
    let payload = decode_json(Segment::Payload, payload_b64)?;
    let signature = decode_segment(Segment::Signature, signature_b64)?;
    Ok(DecodedJwt {
        header,
        payload,
        signature,
        raw: RawSegments {
            header: header_b64.to_owned(),
            payload: payload_b64.to_owned(),
        },
    })
}

fn decode_segment(segment: Segment, text: &str) -> Result<Vec<u8>, TokenError> {
    base64url::decode(text).map_err(|source| TokenError::Encoding { segment, source })
}

fn decode_json<T: DeserializeOwned>(segment: Segment, text: &str) -> Result<T, TokenError> {
    let json = decode_segment(segment, text)?;
    serde_json::from_slice(&json).map_err(|source| TokenError::Json { segment, source })
}
