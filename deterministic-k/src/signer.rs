//! Signing and verification on top of a deterministic nonce stream.
//!
//! The curve arithmetic and the raw signature equations live behind the
//! [`CurvePrimitive`] trait. [`Signer`] only decides which `k` to feed into
//! it and retries when a nonce is unusable.

use crate::{Error, HashAlgorithm, NonceGenerator, Result, source::NonceSource};
use num_bigint::BigUint;
use tracing::debug;

/// DSA/ECDSA signature: the pair `(r, s)`, both reduced modulo the group
/// order.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Signature {
    r: BigUint,
    s: BigUint,
}

impl Signature {
    /// Create a signature from its two components.
    pub fn new(r: BigUint, s: BigUint) -> Self {
        Self { r, s }
    }

    /// The `r` component.
    pub fn r(&self) -> &BigUint {
        &self.r
    }

    /// The `s` component.
    pub fn s(&self) -> &BigUint {
        &self.s
    }

    /// Split into `(r, s)`.
    pub fn into_parts(self) -> (BigUint, BigUint) {
        (self.r, self.s)
    }
}

/// Raw signature scheme over a prime order group.
///
/// # ⚠️ Warning: Hazmat!
///
/// These are the bare signing and verification equations. `try_sign` uses
/// whatever `k` it is given; reusing a `k` for two different messages under
/// the same key reveals the key. Use [`Signer`] instead of calling this
/// directly.
pub trait CurvePrimitive {
    /// Public key representation.
    type PublicKey;

    /// Order `n` of the group generated by the base point.
    fn order(&self) -> BigUint;

    /// Compute the public key `d×G` for the private key `d`.
    fn public_key(&self, private_key: &BigUint) -> Result<Self::PublicKey>;

    /// Try to sign `digest` with the private key and the nonce `k`.
    ///
    /// Returns `Ok(None)` when `k` cannot be used (e.g. it yields `r = 0` or
    /// `s = 0`), so that the caller can try the next nonce. Errors are reserved
    /// for failures unrelated to the choice of `k`.
    fn try_sign(
        &self,
        private_key: &BigUint,
        digest: &[u8],
        k: &BigUint,
    ) -> Result<Option<Signature>>;

    /// Check `signature` over `digest` against the public key.
    ///
    /// `r` and `s` are guaranteed to be in `[1, n)` when called through
    /// [`Verifier`].
    fn verify(
        &self,
        public_key: &Self::PublicKey,
        digest: &[u8],
        signature: &Signature,
    ) -> Result<bool>;
}

/// Deterministic signer.
#[derive(Clone, Debug)]
pub struct Signer<C> {
    curve: C,
    hash: HashAlgorithm,
}

impl<C: CurvePrimitive> Signer<C> {
    /// Create a signer deriving its nonces with the given hash function.
    pub fn new(curve: C, hash: HashAlgorithm) -> Self {
        Self { curve, hash }
    }

    /// Borrow the underlying curve.
    pub fn curve(&self) -> &C {
        &self.curve
    }

    /// Hash function used to derive nonces.
    pub fn hash_algorithm(&self) -> HashAlgorithm {
        self.hash
    }

    /// Sign a message digest using RFC 6979 nonces, optionally diversified with
    /// `extra_entropy`.
    ///
    /// Every call derives its own nonce stream, so signing the same digest
    /// with the same key and extra entropy always gives the same signature.
    pub fn sign(
        &self,
        digest: &[u8],
        private_key: &BigUint,
        extra_entropy: Option<&[u8]>,
    ) -> Result<Signature> {
        let mut nonces = NonceGenerator::new(self.hash);
        nonces.init(&self.curve.order(), private_key, digest, extra_entropy)?;
        self.sign_with(&mut nonces, digest, private_key)
    }

    /// Sign a message digest with nonces drawn from `nonces`.
    ///
    /// Nonces rejected by the signature primitive are skipped. There is no
    /// limit on the number of draws other than the one imposed by the source
    /// itself (see [`Bounded`](crate::Bounded)).
    pub fn sign_with<S>(
        &self,
        nonces: &mut S,
        digest: &[u8],
        private_key: &BigUint,
    ) -> Result<Signature>
    where
        S: NonceSource + ?Sized,
    {
        check_private_key(private_key, &self.curve.order())?;
        let mut attempts = 0u64;

        loop {
            let k = nonces.next_nonce()?;
            attempts += 1;

            if let Some(signature) = self.curve.try_sign(private_key, digest, &k)? {
                return Ok(signature);
            }

            debug!(attempts, "signature primitive rejected nonce");
        }
    }
}

/// Key to verify a signature against.
#[derive(Debug)]
pub enum VerificationKey<'a, P> {
    /// Public key point.
    Public(&'a P),

    /// Private key; the public key is derived from it.
    Private(&'a BigUint),
}

impl<P> Clone for VerificationKey<'_, P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P> Copy for VerificationKey<'_, P> {}

/// Signature verifier.
#[derive(Clone, Debug)]
pub struct Verifier<C> {
    curve: C,
}

impl<C: CurvePrimitive> Verifier<C> {
    /// Create a verifier for the given curve.
    pub fn new(curve: C) -> Self {
        Self { curve }
    }

    /// Borrow the underlying curve.
    pub fn curve(&self) -> &C {
        &self.curve
    }

    /// Verify `signature` over `digest`.
    ///
    /// Returns `Ok(false)` for any signature which does not match, including
    /// ones whose components are out of range. Errors indicate a malformed
    /// key.
    pub fn verify(
        &self,
        key: VerificationKey<'_, C::PublicKey>,
        digest: &[u8],
        signature: &Signature,
    ) -> Result<bool> {
        let order = self.curve.order();

        if let VerificationKey::Private(d) = key {
            check_private_key(d, &order)?;
        }

        if !in_range(signature.r(), &order) || !in_range(signature.s(), &order) {
            return Ok(false);
        }

        match key {
            VerificationKey::Public(q) => self.curve.verify(q, digest, signature),
            VerificationKey::Private(d) => {
                let q = self.curve.public_key(d)?;
                self.curve.verify(&q, digest, signature)
            }
        }
    }
}

/// Is `0 < x < n`?
fn in_range(x: &BigUint, order: &BigUint) -> bool {
    x.bits() != 0 && x < order
}

fn check_private_key(private_key: &BigUint, order: &BigUint) -> Result<()> {
    if in_range(private_key, order) {
        Ok(())
    } else {
        Err(Error::InvalidInput("private key"))
    }
}
