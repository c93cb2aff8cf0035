//! Sources of ephemeral scalars consumed by the [`Signer`](crate::Signer).

use crate::{Error, Result};
use alloc::collections::VecDeque;
use num_bigint::BigUint;

/// Anything which can hand out nonces one at a time.
///
/// Implemented by the deterministic [`NonceGenerator`](crate::NonceGenerator)
/// as well as by [`FixedNonces`], which replays pre-computed values, and by
/// the [`Bounded`] adapter.
pub trait NonceSource {
    /// Draw the next nonce.
    fn next_nonce(&mut self) -> Result<BigUint>;
}

impl<S: NonceSource + ?Sized> NonceSource for &mut S {
    fn next_nonce(&mut self) -> Result<BigUint> {
        (**self).next_nonce()
    }
}

/// Pre-supplied, ordered sequence of nonces.
///
/// Useful for reproducing externally computed test vectors. Once every value
/// has been handed out, further draws fail with
/// [`Error::NonceSourceExhausted`].
#[derive(Clone, Debug, Default)]
pub struct FixedNonces {
    queue: VecDeque<BigUint>,
}

impl FixedNonces {
    /// Replay the given nonces in order.
    pub fn new(nonces: impl IntoIterator<Item = BigUint>) -> Self {
        Self {
            queue: nonces.into_iter().collect(),
        }
    }

    /// Number of nonces not yet drawn.
    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

impl NonceSource for FixedNonces {
    fn next_nonce(&mut self) -> Result<BigUint> {
        self.queue.pop_front().ok_or(Error::NonceSourceExhausted)
    }
}

/// Limits the number of nonces drawn from an inner source.
///
/// The deterministic generator never runs dry, and the
/// [`Signer`](crate::Signer) retries for as long as its source keeps
/// producing values. Wrapping the source in `Bounded` turns a misbehaving
/// signature primitive into [`Error::NonceSourceExhausted`] instead of an
/// endless loop.
#[derive(Clone, Debug)]
pub struct Bounded<S> {
    inner: S,
    remaining: usize,
}

impl<S: NonceSource> Bounded<S> {
    /// Allow at most `max_draws` draws from `inner`.
    pub fn new(inner: S, max_draws: usize) -> Self {
        Self {
            inner,
            remaining: max_draws,
        }
    }

    /// Number of draws still allowed.
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    /// Unwrap the inner source.
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: NonceSource> NonceSource for Bounded<S> {
    fn next_nonce(&mut self) -> Result<BigUint> {
        if self.remaining == 0 {
            return Err(Error::NonceSourceExhausted);
        }

        self.remaining -= 1;
        self.inner.next_nonce()
    }
}
