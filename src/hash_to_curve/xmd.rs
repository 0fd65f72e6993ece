//! The XMD message expander over SHA-256.
//!
//! Implements expand_message_xmd from the hash-to-curve draft: repeated
//! digests chained through XOR, separated by a one-byte block counter and
//! the length-suffixed domain separation tag.

use crate::{BlsError, BlsResult};
use byteorder::{BigEndian, WriteBytesExt};
use sha2::{Digest, Sha256};

/// Digest output size.
const B_IN_BYTES: usize = 32;
/// Digest block (rate) size, the width of the zero-padding prefix.
const R_IN_BYTES: usize = 64;

/// Derives `len_in_bytes` pseudorandom bytes from the message under the
/// given domain separation tag.
pub fn expand_message_xmd(msg: &[u8], dst: &[u8], len_in_bytes: usize) -> BlsResult<Vec<u8>> {
    if dst.is_empty() || dst.len() > 255 {
        return Err(BlsError::DomainTooLarge(dst.len()));
    }
    let ell = (len_in_bytes + B_IN_BYTES - 1) / B_IN_BYTES;
    if ell > 255 || len_in_bytes > u16::MAX as usize {
        return Err(BlsError::ExpansionTooLong(len_in_bytes));
    }

    let mut l_i_b_str = Vec::with_capacity(2);
    l_i_b_str.write_u16::<BigEndian>(len_in_bytes as u16)?;

    // b_0 = H(Z_pad || msg || l_i_b_str || 0x00 || DST_prime)
    let mut hasher = Sha256::new();
    hasher.update([0u8; R_IN_BYTES]);
    hasher.update(msg);
    hasher.update(&l_i_b_str);
    hasher.update([0u8]);
    hasher.update(dst);
    hasher.update([dst.len() as u8]);
    let b_0 = hasher.finalize();

    // b_1 = H(b_0 || 0x01 || DST_prime)
    let mut hasher = Sha256::new();
    hasher.update(b_0);
    hasher.update([1u8]);
    hasher.update(dst);
    hasher.update([dst.len() as u8]);
    let mut b_prev = hasher.finalize();

    let mut out = Vec::with_capacity(ell * B_IN_BYTES);
    out.extend_from_slice(&b_prev);
    for i in 2..=ell as u8 {
        // b_i = H((b_0 xor b_{i-1}) || i || DST_prime)
        let mut mixed = [0u8; B_IN_BYTES];
        for (j, m) in mixed.iter_mut().enumerate() {
            *m = b_0[j] ^ b_prev[j];
        }
        let mut hasher = Sha256::new();
        hasher.update(mixed);
        hasher.update([i]);
        hasher.update(dst);
        hasher.update([dst.len() as u8]);
        b_prev = hasher.finalize();
        out.extend_from_slice(&b_prev);
    }
    out.truncate(len_in_bytes);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    // test vectors from the hash-to-curve draft, SHA-256 expander with
    // DST = "QUUX-V01-CS02-with-expander-SHA256-128"
    const DST: &[u8] = b"QUUX-V01-CS02-with-expander-SHA256-128";

    #[test]
    fn draft_vector_empty_message() {
        let out = expand_message_xmd(b"", DST, 0x20).unwrap();
        assert_eq!(
            hex::encode(&out),
            "68a985b87eb6b46952128911f2a4412bbc302a9d759667f87f7a21d803f07235"
        );
    }

    #[test]
    fn draft_vector_abc() {
        let out = expand_message_xmd(b"abc", DST, 0x20).unwrap();
        assert_eq!(
            hex::encode(&out),
            "d8ccab23b5985ccea865c6c97b6e5b8350e794e603b4b97902f53a8a0d605615"
        );
    }

    #[test]
    fn output_length_is_respected() {
        for len in [1usize, 31, 32, 33, 64, 96, 256] {
            let out = expand_message_xmd(b"msg", DST, len).unwrap();
            assert_eq!(out.len(), len);
        }
    }

    #[test]
    fn requested_length_is_bound_into_the_expansion() {
        // the length is hashed into b_0, so different lengths must not be
        // prefixes of each other
        let short = expand_message_xmd(b"msg", DST, 32).unwrap();
        let long = expand_message_xmd(b"msg", DST, 96).unwrap();
        assert_ne!(&long[..32], &short[..]);
    }

    #[test]
    fn oversized_dst_is_rejected() {
        let big = vec![0x41u8; 256];
        assert!(matches!(
            expand_message_xmd(b"", &big, 32),
            Err(BlsError::DomainTooLarge(256))
        ));
    }

    #[test]
    fn oversized_expansion_is_rejected() {
        assert!(matches!(
            expand_message_xmd(b"", DST, 32 * 256),
            Err(BlsError::ExpansionTooLong(_))
        ));
    }
}
