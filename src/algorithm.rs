use core::fmt;
use std::str::FromStr;

use rsa::Pkcs1v15Sign;

use crate::error::Error;
use crate::hash;

macro_rules! algorithms {
    ($(
        $(#[doc = $doc:tt])*
        $id:ident: $name:literal => $digest:ident
    ),*) => {
        /// Signature algorithm.
        #[derive(Debug, Clone, Copy, PartialEq, Hash, Eq)]
        pub enum Algorithm {
            $(
                $(#[doc = $doc])*
                $id
            ),*
        }

        impl Algorithm {
            /// Every supported algorithm, in table order.
            pub const ALL: &'static [Self] = &[$(Self::$id),*];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(
                        Self::$id => $name
                    ),*
                }
            }

            pub fn digest(&self) -> DigestKind {
                match self {
                    $(
                        Self::$id => DigestKind::$digest
                    ),*
                }
            }
        }

        impl FromStr for Algorithm {
            type Err = Error;

            fn from_str(name: &str) -> Result<Self, Self::Err> {
                match name {
                    $(
                        $name => Ok(Self::$id),
                    )*
                    other => Err(Error::UnsupportedAlgorithm(other.to_owned())),
                }
            }
        }
    };
}

algorithms! {
    /// RSASSA-PKCS1-v1_5 using SHA-256.
    ///
    /// See: <https://www.rfc-editor.org/rfc/rfc7518#section-3.3>
    RS256: "RS256" => Sha256,

    /// RSASSA-PKCS1-v1_5 using SHA-384.
    ///
    /// See: <https://www.rfc-editor.org/rfc/rfc7518#section-3.3>
    RS384: "RS384" => Sha384,

    /// RSASSA-PKCS1-v1_5 using SHA-512.
    ///
    /// See: <https://www.rfc-editor.org/rfc/rfc7518#section-3.3>
    RS512: "RS512" => Sha512
}

impl AsRef<str> for Algorithm {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_str().fmt(f)
    }
}

/// Message digest applied before the RSA operation.
#[derive(Debug, Clone, Copy, PartialEq, Hash, Eq)]
pub enum DigestKind {
    Sha256,
    Sha384,
    Sha512,
}

impl DigestKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Sha256 => "SHA-256",
            Self::Sha384 => "SHA-384",
            Self::Sha512 => "SHA-512",
        }
    }

    pub fn digest(&self, data: &[u8]) -> Vec<u8> {
        match self {
            Self::Sha256 => hash::sha256(data).to_vec(),
            Self::Sha384 => hash::sha384(data).to_vec(),
            Self::Sha512 => hash::sha512(data).to_vec(),
        }
    }

    /// PKCS#1 v1.5 padding carrying this digest's `DigestInfo` prefix.
    pub(crate) fn pkcs1v15(&self) -> Pkcs1v15Sign {
        match self {
            Self::Sha256 => Pkcs1v15Sign::new::<sha2::Sha256>(),
            Self::Sha384 => Pkcs1v15Sign::new::<sha2::Sha384>(),
            Self::Sha512 => Pkcs1v15Sign::new::<sha2::Sha512>(),
        }
    }
}

impl fmt::Display for DigestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.name().fmt(f)
    }
}

/// Asymmetric signature scheme.
#[derive(Debug, Clone, Copy, PartialEq, Hash, Eq)]
pub enum SignatureScheme {
    RsassaPkcs1v15,
}

impl SignatureScheme {
    pub fn name(&self) -> &'static str {
        match self {
            Self::RsassaPkcs1v15 => "RSASSA-PKCS1-v1_5",
        }
    }
}

impl fmt::Display for SignatureScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.name().fmt(f)
    }
}

/// Digest and scheme a JWT `alg` value stands for.
#[derive(Debug, Clone, Copy, PartialEq, Hash, Eq)]
pub struct AlgorithmDescriptor {
    algorithm: Algorithm,
    digest: DigestKind,
    scheme: SignatureScheme,
}

impl AlgorithmDescriptor {
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn digest(&self) -> DigestKind {
        self.digest
    }

    pub fn scheme(&self) -> SignatureScheme {
        self.scheme
    }
}

impl From<Algorithm> for AlgorithmDescriptor {
    fn from(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            digest: algorithm.digest(),
            scheme: SignatureScheme::RsassaPkcs1v15,
        }
    }
}

/// Resolves a JWT `alg` header value.
///
/// Names are matched exactly: `rs256` is not `RS256`.
pub fn resolve(name: &str) -> Result<AlgorithmDescriptor, Error> {
    name.parse::<Algorithm>().map(AlgorithmDescriptor::from)
}
