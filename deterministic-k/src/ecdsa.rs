//! Elliptic Curve Digital Signature Algorithm (ECDSA)
//!
//! [`Ecdsa`] implements [`CurvePrimitive`] for any RustCrypto prime order
//! curve by delegating to the low-level signing and verification equations
//! in [`ecdsa::hazmat`](ecdsa_core::hazmat). Aliases are provided for the
//! curves enabled through Cargo features:
//!
//! - `p192`: [`NistP192`]
//! - `p256`: [`NistP256`]
//! - `p384`: [`NistP384`]
//!
//! ## Signing/Verification Example
//!
//! ```
//! # #[cfg(feature = "p256")]
//! # {
//! use deterministic_k::{
//!     BigUint, HashAlgorithm, Signer, VerificationKey, Verifier, ecdsa::NistP256,
//! };
//! use sha2::{Digest, Sha256};
//!
//! let d = BigUint::parse_bytes(
//!     b"c9afa9d845ba75166b5c215767b1d6934e50c3db36e89b127b8a622b120f6721",
//!     16,
//! )
//! .unwrap();
//! let digest = Sha256::digest(b"sample");
//!
//! let signer = Signer::new(NistP256::new(), HashAlgorithm::Sha256);
//! let signature = signer.sign(&digest, &d, None).unwrap();
//!
//! let verifier = Verifier::new(NistP256::new());
//! assert!(verifier.verify(VerificationKey::Private(&d), &digest, &signature).unwrap());
//! # }
//! ```

use crate::{
    CurvePrimitive, Error, Result, Signature,
    convert::{bit_length, bits2int, int2octets},
};
use core::marker::PhantomData;
use ecdsa_core::{
    SignatureSize,
    hazmat::{sign_prehashed, verify_prehashed},
};
use elliptic_curve::{
    AffinePoint, CurveArithmetic, FieldBytes, PrimeCurve, ProjectivePoint, Scalar,
    bigint::Encoding,
    ff::PrimeField,
    generic_array::ArrayLength,
    group::{Curve as _, Group},
};
use num_bigint::BigUint;

/// ECDSA over the prime order curve `C`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Ecdsa<C> {
    curve: PhantomData<C>,
}

/// ECDSA/P-192
#[cfg(feature = "p192")]
pub type NistP192 = Ecdsa<p192::NistP192>;

/// ECDSA/P-256
#[cfg(feature = "p256")]
pub type NistP256 = Ecdsa<p256::NistP256>;

/// ECDSA/P-384
#[cfg(feature = "p384")]
pub type NistP384 = Ecdsa<p384::NistP384>;

impl<C> Ecdsa<C>
where
    C: PrimeCurve + CurveArithmetic,
    SignatureSize<C>: ArrayLength<u8>,
{
    /// Create a new ECDSA primitive for `C`.
    pub fn new() -> Self {
        Self { curve: PhantomData }
    }

    /// Serialize `x` as a big endian field element.
    fn field_bytes(x: &BigUint) -> Result<FieldBytes<C>> {
        let mut bytes = FieldBytes::<C>::default();
        let len = bytes.len();
        bytes.copy_from_slice(&int2octets(x, len)?);
        Ok(bytes)
    }

    /// Convert `x` into a scalar if `0 < x < n`.
    fn scalar(x: &BigUint, order: &BigUint) -> Result<Option<Scalar<C>>> {
        if x.bits() == 0 || x >= order {
            return Ok(None);
        }

        let repr = Self::field_bytes(x)?;
        Ok(Option::from(Scalar::<C>::from_repr(repr)))
    }

    /// Leftmost `qlen` bits of the digest, as field bytes.
    ///
    /// The value may exceed the order; the signing equation reduces it.
    fn prehash(digest: &[u8], order: &BigUint) -> Result<FieldBytes<C>> {
        let z = bits2int(digest, bit_length(order));
        Self::field_bytes(&z)
    }

    fn order_uint() -> BigUint {
        BigUint::from_bytes_be(C::ORDER.to_be_bytes().as_ref())
    }
}

impl<C> CurvePrimitive for Ecdsa<C>
where
    C: PrimeCurve + CurveArithmetic,
    SignatureSize<C>: ArrayLength<u8>,
{
    type PublicKey = AffinePoint<C>;

    fn order(&self) -> BigUint {
        Self::order_uint()
    }

    fn public_key(&self, private_key: &BigUint) -> Result<AffinePoint<C>> {
        let d = Self::scalar(private_key, &Self::order_uint())?
            .ok_or(Error::InvalidInput("private key"))?;
        Ok((ProjectivePoint::<C>::generator() * d).to_affine())
    }

    fn try_sign(
        &self,
        private_key: &BigUint,
        digest: &[u8],
        k: &BigUint,
    ) -> Result<Option<Signature>> {
        let order = Self::order_uint();
        let d = Self::scalar(private_key, &order)?.ok_or(Error::SigningPrimitive)?;
        let z = Self::prehash(digest, &order)?;

        let Some(k) = Self::scalar(k, &order)? else {
            return Ok(None);
        };

        // Only a zero `r` or `s` makes signing fail once `d` and `k` are valid.
        let Ok((signature, _)) = sign_prehashed::<C, _>(&d, k, &z) else {
            return Ok(None);
        };

        let (r, s) = signature.split_bytes();
        Ok(Some(Signature::new(
            BigUint::from_bytes_be(&r),
            BigUint::from_bytes_be(&s),
        )))
    }

    fn verify(
        &self,
        public_key: &AffinePoint<C>,
        digest: &[u8],
        signature: &Signature,
    ) -> Result<bool> {
        let z = Self::prehash(digest, &Self::order_uint())?;

        let (Ok(r), Ok(s)) = (
            Self::field_bytes(signature.r()),
            Self::field_bytes(signature.s()),
        ) else {
            return Ok(false);
        };

        let Ok(signature) = ecdsa_core::Signature::<C>::from_scalars(r, s) else {
            return Ok(false);
        };

        let q = ProjectivePoint::<C>::from(*public_key);
        Ok(verify_prehashed::<C>(&q, &z, &signature).is_ok())
    }
}
