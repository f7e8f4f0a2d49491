use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// RFC 7515 §4 - JOSE Header
// RFC 7519 §5 - JWT header parameters

/// JOSE header of a compact JWT.
///
/// Members other than `alg`, `kid` and `typ` are kept, in key order, in
/// [`additional_parameters`](Header::additional_parameters) and survive a
/// decode or a sign untouched.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Header {
    #[serde(rename = "alg")]
    pub algorithm: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(rename = "kid")]
    pub key_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(rename = "typ")]
    pub type_: Option<String>,

    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    #[serde(flatten)]
    pub additional_parameters: BTreeMap<String, serde_json::Value>,
}

impl Default for Header {
    /// `{"typ": "JWT"}`, with an `alg` left for the signer to fill in.
    fn default() -> Self {
        Self {
            algorithm: String::new(),
            key_id: None,
            type_: Some("JWT".to_owned()),
            additional_parameters: BTreeMap::new(),
        }
    }
}

impl Header {
    pub fn with_key_id(mut self, key_id: impl Into<String>) -> Self {
        self.key_id = Some(key_id.into());
        self
    }
}
