//! Conversions between bit strings, octet strings and integers as defined in
//! [RFC 6979 § 2.3](https://datatracker.ietf.org/doc/html/rfc6979#section-2.3).
//!
//! All encodings are big endian. `qlen` is the bit length of the group order
//! and `rlen` its length rounded up to whole bytes.

use crate::{Error, Result};
use alloc::{vec, vec::Vec};
use num_bigint::BigUint;

/// Bit length of `n` (`qlen`).
pub fn bit_length(n: &BigUint) -> usize {
    n.bits() as usize
}

/// Length of `n` in whole bytes (`rlen`).
pub fn byte_length(n: &BigUint) -> usize {
    bit_length(n).div_ceil(8)
}

/// Interpret `bits` as a big endian integer, keeping only its leftmost `qlen`
/// bits (RFC 6979 § 2.3.2).
///
/// The result is truncated, never reduced: it may still be larger than the
/// group order.
pub fn bits2int(bits: &[u8], qlen: usize) -> BigUint {
    let x = BigUint::from_bytes_be(bits);
    let blen = bits.len() * 8;

    if blen > qlen { x >> (blen - qlen) } else { x }
}

/// Encode `x` as exactly `rlen` big endian bytes (RFC 6979 § 2.3.3).
pub fn int2octets(x: &BigUint, rlen: usize) -> Result<Vec<u8>> {
    let mut out = vec![0u8; rlen];

    if x.bits() == 0 {
        return Ok(out);
    }

    let bytes = x.to_bytes_be();

    if bytes.len() > rlen {
        return Err(Error::InvalidInput("integer wider than octet length"));
    }

    out[rlen - bytes.len()..].copy_from_slice(&bytes);
    Ok(out)
}

/// Fold a message digest into `rlen` bytes modulo `order` (RFC 6979 § 2.3.4).
///
/// `bits2int` only truncates, so at most one subtraction of the order is
/// needed to bring the value into range.
pub fn bits2octets(bits: &[u8], order: &BigUint, rlen: usize) -> Result<Vec<u8>> {
    let z1 = bits2int(bits, bit_length(order));
    let z2 = if &z1 >= order { z1 - order } else { z1 };
    int2octets(&z2, rlen)
}
