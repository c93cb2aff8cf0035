//! Hash function selection and the HMAC primitive built on it.

use crate::{Error, Result};
use alloc::vec::Vec;
use core::{
    fmt::{self, Display},
    str::FromStr,
};
use hmac::{
    Mac, SimpleHmac,
    digest::{Digest, KeyInit, core_api::BlockSizeUser},
};
use sha2::{Sha224, Sha256, Sha384, Sha512};

/// Hash function used to key the HMAC state of the nonce generator.
#[derive(Copy, Clone, Debug, Default, Eq, Hash, PartialEq)]
pub enum HashAlgorithm {
    /// SHA-224
    Sha224,
    /// SHA-256
    #[default]
    Sha256,
    /// SHA-384
    Sha384,
    /// SHA-512
    Sha512,
}

impl HashAlgorithm {
    /// Size of the hash (and HMAC) output in bytes.
    pub const fn output_size(self) -> usize {
        match self {
            HashAlgorithm::Sha224 => 28,
            HashAlgorithm::Sha256 => 32,
            HashAlgorithm::Sha384 => 48,
            HashAlgorithm::Sha512 => 64,
        }
    }

    /// Canonical name, e.g. `"SHA-256"`.
    pub const fn name(self) -> &'static str {
        match self {
            HashAlgorithm::Sha224 => "SHA-224",
            HashAlgorithm::Sha256 => "SHA-256",
            HashAlgorithm::Sha384 => "SHA-384",
            HashAlgorithm::Sha512 => "SHA-512",
        }
    }

    /// Compute `HMAC(key, parts[0] || parts[1] || ...)`.
    pub fn hmac(self, key: &[u8], parts: &[&[u8]]) -> Result<Vec<u8>> {
        match self {
            HashAlgorithm::Sha224 => hmac_with::<Sha224>(key, parts),
            HashAlgorithm::Sha256 => hmac_with::<Sha256>(key, parts),
            HashAlgorithm::Sha384 => hmac_with::<Sha384>(key, parts),
            HashAlgorithm::Sha512 => hmac_with::<Sha512>(key, parts),
        }
    }
}

fn hmac_with<D>(key: &[u8], parts: &[&[u8]]) -> Result<Vec<u8>>
where
    D: Digest + BlockSizeUser,
{
    let mut mac = <SimpleHmac<D> as KeyInit>::new_from_slice(key)
        .map_err(|_| Error::InvalidInput("hmac key"))?;

    for part in parts {
        mac.update(part);
    }

    Ok(mac.finalize().into_bytes().to_vec())
}

impl Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HashAlgorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let alg = match s {
            "SHA-224" | "SHA224" | "sha-224" | "sha224" => HashAlgorithm::Sha224,
            "SHA-256" | "SHA256" | "sha-256" | "sha256" => HashAlgorithm::Sha256,
            "SHA-384" | "SHA384" | "sha-384" | "sha384" => HashAlgorithm::Sha384,
            "SHA-512" | "SHA512" | "sha-512" | "sha512" => HashAlgorithm::Sha512,
            _ => return Err(Error::UnknownHashAlgorithm),
        };
        Ok(alg)
    }
}
