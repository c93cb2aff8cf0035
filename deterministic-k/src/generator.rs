//! Deterministic nonce generation as described in
//! [RFC 6979 § 3.2](https://datatracker.ietf.org/doc/html/rfc6979#section-3.2),
//! including the additional input `k'` from § 3.6.
//!
//! # ⚠️ Warning
//!
//! A generator holds values derived from the private key. Use one generator
//! per signature and never share it between signing operations.

use crate::{
    Error, HashAlgorithm, Result,
    convert::{bit_length, bits2int, bits2octets, byte_length, int2octets},
    source::NonceSource,
};
use alloc::vec::Vec;
use core::fmt;
use num_bigint::BigUint;
use tracing::trace;
use zeroize::Zeroizing;

/// HMAC based generator of deterministic nonces.
///
/// A generator is created empty with [`NonceGenerator::new`] and keyed with
/// [`NonceGenerator::init`]. Every call to [`NonceSource::next_nonce`] then
/// returns the next value `k` of the RFC 6979 sequence, with `0 < k < n`.
/// The sequence only moves forward: calling `init` again with the same
/// inputs restarts it from the beginning.
pub struct NonceGenerator {
    hash: HashAlgorithm,
    state: Option<DrbgState>,
}

/// HMAC key `K` and chaining value `V` (RFC 6979 § 3.2.b-c) together with the
/// group order they were derived for.
struct DrbgState {
    order: BigUint,
    qlen: usize,
    rlen: usize,
    k: Zeroizing<Vec<u8>>,
    v: Zeroizing<Vec<u8>>,
}

impl NonceGenerator {
    /// Create an uninitialized generator using the given hash function.
    pub fn new(hash: HashAlgorithm) -> Self {
        Self { hash, state: None }
    }

    /// Hash function backing this generator.
    pub fn hash_algorithm(&self) -> HashAlgorithm {
        self.hash
    }

    /// Has [`NonceGenerator::init`] been called?
    pub fn is_initialized(&self) -> bool {
        self.state.is_some()
    }

    /// Derive fresh `K` and `V` from the group order, private key, message
    /// digest and optional extra entropy (RFC 6979 § 3.2.a-f, § 3.6).
    ///
    /// Any previous state is discarded, even when this call fails.
    pub fn init(
        &mut self,
        order: &BigUint,
        private_key: &BigUint,
        digest: &[u8],
        extra_entropy: Option<&[u8]>,
    ) -> Result<()> {
        self.state = None;

        if order.bits() < 2 {
            return Err(Error::InvalidInput("group order"));
        }

        if private_key.bits() == 0 || private_key >= order {
            return Err(Error::InvalidInput("private key"));
        }

        let qlen = bit_length(order);
        let rlen = byte_length(order);
        let x = Zeroizing::new(int2octets(private_key, rlen)?);
        let m = bits2octets(digest, order, rlen)?;
        let e = extra_entropy.unwrap_or_default();

        let mut k = Zeroizing::new(alloc::vec![0x00; self.hash.output_size()]);
        let mut v = Zeroizing::new(alloc::vec![0x01; self.hash.output_size()]);

        for round in [0x00u8, 0x01] {
            let input: [&[u8]; 5] = [&v, &[round], &x, &m, e];
            k = Zeroizing::new(self.hash.hmac(&k, &input)?);
            v = Zeroizing::new(self.hash.hmac(&k, &[v.as_slice()])?);
        }

        trace!(
            hash = self.hash.name(),
            order_bits = qlen,
            extra_entropy = extra_entropy.is_some(),
            "initialized nonce generator"
        );

        self.state = Some(DrbgState {
            order: order.clone(),
            qlen,
            rlen,
            k,
            v,
        });

        Ok(())
    }
}

impl DrbgState {
    /// Fill `T` with `rlen` bytes of HMAC output (RFC 6979 § 3.2.h.1-2).
    fn candidate(&mut self, hash: HashAlgorithm) -> Result<BigUint> {
        let mut t = Zeroizing::new(Vec::with_capacity(self.rlen));

        while t.len() < self.rlen {
            self.v = Zeroizing::new(hash.hmac(&self.k, &[self.v.as_slice()])?);
            let take = (self.rlen - t.len()).min(self.v.len());
            t.extend_from_slice(&self.v[..take]);
        }

        Ok(bits2int(&t, self.qlen))
    }

    /// Update `K` and `V` after a rejected candidate (RFC 6979 § 3.2.h.3).
    fn rekey(&mut self, hash: HashAlgorithm) -> Result<()> {
        self.k = Zeroizing::new(hash.hmac(&self.k, &[self.v.as_slice(), &[0x00u8]])?);
        self.v = Zeroizing::new(hash.hmac(&self.k, &[self.v.as_slice()])?);
        Ok(())
    }
}

impl NonceSource for NonceGenerator {
    fn next_nonce(&mut self) -> Result<BigUint> {
        let hash = self.hash;
        let state = self.state.as_mut().ok_or(Error::UninitializedState)?;
        let mut rejected = 0u64;

        loop {
            let k = state.candidate(hash)?;

            // An accepted candidate leaves `K` untouched; the next draw
            // continues from the current `V`.
            if k.bits() != 0 && k < state.order {
                return Ok(k);
            }

            rejected += 1;
            trace!(rejected, order_bits = state.qlen, "nonce candidate out of range");
            state.rekey(hash)?;
        }
    }
}

impl fmt::Debug for NonceGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NonceGenerator")
            .field("hash", &self.hash)
            .field("initialized", &self.is_initialized())
            .finish_non_exhaustive()
    }
}

/// Inputs for building an initialized [`NonceGenerator`].
///
/// The group order, private key, message digest and hash algorithm are
/// required; extra entropy is optional. [`NonceParams::build`] fails with
/// [`Error::InvalidInput`] naming the first missing field.
#[derive(Clone, Default)]
pub struct NonceParams {
    order: Option<BigUint>,
    private_key: Option<BigUint>,
    digest: Option<Vec<u8>>,
    hash: Option<HashAlgorithm>,
    extra_entropy: Option<Vec<u8>>,
}

impl NonceParams {
    /// Empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the group order `n`.
    pub fn order(mut self, order: BigUint) -> Self {
        self.order = Some(order);
        self
    }

    /// Set the private key `d`.
    pub fn private_key(mut self, private_key: BigUint) -> Self {
        self.private_key = Some(private_key);
        self
    }

    /// Set the message digest `h1`.
    pub fn digest(mut self, digest: impl Into<Vec<u8>>) -> Self {
        self.digest = Some(digest.into());
        self
    }

    /// Set the hash function used for HMAC.
    pub fn hash_algorithm(mut self, hash: HashAlgorithm) -> Self {
        self.hash = Some(hash);
        self
    }

    /// Set the extra entropy `k'`.
    pub fn extra_entropy(mut self, extra_entropy: impl Into<Vec<u8>>) -> Self {
        self.extra_entropy = Some(extra_entropy.into());
        self
    }

    /// Validate the parameters and return an initialized generator.
    pub fn build(&self) -> Result<NonceGenerator> {
        let order = self.order.as_ref().ok_or(Error::InvalidInput("group order"))?;
        let private_key = self
            .private_key
            .as_ref()
            .ok_or(Error::InvalidInput("private key"))?;
        let digest = self.digest.as_deref().ok_or(Error::InvalidInput("digest"))?;
        let hash = self.hash.ok_or(Error::InvalidInput("hash algorithm"))?;

        let mut generator = NonceGenerator::new(hash);
        generator.init(order, private_key, digest, self.extra_entropy.as_deref())?;
        Ok(generator)
    }
}

impl fmt::Debug for NonceParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NonceParams")
            .field("order", &self.order)
            .field("private_key", &self.private_key.as_ref().map(|_| "..."))
            .field("digest", &self.digest)
            .field("hash", &self.hash)
            .field("extra_entropy", &self.extra_entropy.as_ref().map(Vec::len))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{NonceGenerator, NonceParams};
    use crate::{Error, HashAlgorithm, NonceSource};
    use alloc::{format, vec::Vec};
    use hex_literal::hex;
    use num_bigint::BigUint;

    /// SHA-256("sample")
    const SAMPLE_SHA256: [u8; 32] =
        hex!("af2bdbe1aa9b6ec1e2ade1d694f41fc71a831d0268e9891562113d8a62add1bf");

    fn small_order() -> BigUint {
        BigUint::from(65537u32)
    }

    fn params() -> NonceParams {
        NonceParams::new()
            .order(small_order())
            .private_key(BigUint::from(2u8))
            .digest(SAMPLE_SHA256)
            .hash_algorithm(HashAlgorithm::Sha256)
    }

    #[test]
    fn next_before_init() {
        let mut generator = NonceGenerator::new(HashAlgorithm::Sha256);
        assert!(!generator.is_initialized());
        assert_eq!(generator.next_nonce(), Err(Error::UninitializedState));
    }

    #[test]
    fn init_rejects_bad_private_key() {
        let mut generator = NonceGenerator::new(HashAlgorithm::Sha256);
        let n = small_order();

        for d in [BigUint::from(0u8), n.clone(), &n + 1u8] {
            assert_eq!(
                generator.init(&n, &d, &SAMPLE_SHA256, None),
                Err(Error::InvalidInput("private key"))
            );
        }
        assert!(!generator.is_initialized());
    }

    #[test]
    fn failed_reinit_discards_previous_state() {
        let n = small_order();
        let mut generator = params().build().unwrap();
        assert!(generator.next_nonce().is_ok());

        assert_eq!(
            generator.init(&n, &BigUint::from(0u8), &SAMPLE_SHA256, None),
            Err(Error::InvalidInput("private key"))
        );
        assert!(!generator.is_initialized());
        assert_eq!(generator.next_nonce(), Err(Error::UninitializedState));

        let mut generator = params().build().unwrap();
        assert_eq!(
            generator.init(&BigUint::from(1u8), &BigUint::from(1u8), &SAMPLE_SHA256, None),
            Err(Error::InvalidInput("group order"))
        );
        assert_eq!(generator.next_nonce(), Err(Error::UninitializedState));
    }

    #[test]
    fn init_rejects_degenerate_order() {
        let mut generator = NonceGenerator::new(HashAlgorithm::Sha256);
        let one = BigUint::from(1u8);
        assert_eq!(
            generator.init(&one, &one, &SAMPLE_SHA256, None),
            Err(Error::InvalidInput("group order"))
        );
    }

    /// With n = 65537 the first candidate (125844) is out of range, so this
    /// sequence goes through the `K`/`V` update of § 3.2.h.3. Candidates are
    /// 125844, 59315, 112124, 35246, 69342, 106254, 108189, 42870; only the
    /// in-range ones are returned and only the others trigger an update.
    #[test]
    fn rejection_sampling_sequence() {
        let mut generator = params().build().unwrap();
        let nonces: Vec<_> = (0..3).map(|_| generator.next_nonce().unwrap()).collect();

        assert_eq!(
            nonces,
            [59315u32, 35246, 42870].map(BigUint::from).to_vec()
        );
    }

    #[test]
    fn init_restarts_sequence() {
        let n = small_order();
        let d = BigUint::from(2u8);
        let mut generator = NonceGenerator::new(HashAlgorithm::Sha256);

        generator.init(&n, &d, &SAMPLE_SHA256, None).unwrap();
        let first = generator.next_nonce().unwrap();
        let second = generator.next_nonce().unwrap();
        assert_ne!(first, second);

        generator.init(&n, &d, &SAMPLE_SHA256, None).unwrap();
        assert_eq!(generator.next_nonce().unwrap(), first);
        assert_eq!(generator.next_nonce().unwrap(), second);
    }

    #[test]
    fn empty_extra_entropy_is_no_extra_entropy() {
        let mut plain = params().build().unwrap();
        let mut empty = params().extra_entropy(Vec::new()).build().unwrap();
        assert_eq!(plain.next_nonce(), empty.next_nonce());
    }

    #[test]
    fn extra_entropy_changes_sequence() {
        let mut plain = params().build().unwrap();
        let mut seeded = params().extra_entropy(*b"seed").build().unwrap();
        let mut seeded_again = params().extra_entropy(*b"seed").build().unwrap();

        let k = seeded.next_nonce().unwrap();
        assert_ne!(plain.next_nonce().unwrap(), k);
        assert_eq!(seeded_again.next_nonce().unwrap(), k);
    }

    #[test]
    fn params_require_every_field() {
        let full = params();

        let missing = [
            (
                NonceParams { order: None, ..full.clone() },
                "group order",
            ),
            (
                NonceParams { private_key: None, ..full.clone() },
                "private key",
            ),
            (NonceParams { digest: None, ..full.clone() }, "digest"),
            (
                NonceParams { hash: None, ..full.clone() },
                "hash algorithm",
            ),
        ];

        for (params, field) in missing {
            assert_eq!(params.build().unwrap_err(), Error::InvalidInput(field));
        }

        assert!(full.build().is_ok());
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let params = params().private_key(BigUint::from(12345u32));
        let rendered = format!("{params:?}");
        assert!(!rendered.contains("12345"));

        let generator = params.build().unwrap();
        let rendered = format!("{generator:?}");
        assert!(!rendered.contains("12345"));
        assert_eq!(rendered, "NonceGenerator { hash: Sha256, initialized: true, .. }");
    }
}
