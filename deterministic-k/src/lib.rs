#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![doc = include_str!("../README.md")]
#![doc(
    html_logo_url = "https://raw.githubusercontent.com/RustCrypto/meta/master/logo.svg",
    html_favicon_url = "https://raw.githubusercontent.com/RustCrypto/meta/master/logo.svg"
)]
#![forbid(unsafe_code)]
#![warn(
    clippy::mod_module_files,
    clippy::unwrap_used,
    missing_docs,
    rust_2018_idioms,
    unused_lifetimes,
    unused_qualifications
)]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod convert;
pub mod error;
pub mod generator;
pub mod hash;
pub mod signer;
pub mod source;

#[cfg(feature = "ecdsa")]
pub mod ecdsa;

pub use num_bigint::{self, BigUint};

pub use crate::{
    error::{Error, Result},
    generator::{NonceGenerator, NonceParams},
    hash::HashAlgorithm,
    signer::{CurvePrimitive, Signature, Signer, VerificationKey, Verifier},
    source::{Bounded, FixedNonces, NonceSource},
};
