//! Hashing arbitrary messages to G2.
//!
//! The construction is the draft-irtf-cfrg-hash-to-curve random-oracle
//! suite for BLS12-381 G2 over SHA-256: expand the message, derive two
//! field elements, map each through simplified SWU and the 3-isogeny, add,
//! and clear the cofactor. Deterministic and domain-separated, with no
//! retry path.
//!
//! The domain separation tag is explicit state of the hasher object; there
//! is no process-wide default to mutate.

pub mod xmd;

mod swu;

use crate::curve::G2Projective;
use crate::fields::{Fp, Fp2};
use crate::{BlsError, BlsResult};
use log::trace;
use once_cell::sync::Lazy;
use xmd::expand_message_xmd;

/// Bytes of expander output per base-field coordinate.
const L: usize = 64;
/// Fp2 coordinates per field element.
const M: usize = 2;

/// The ciphersuite tag for signature hashing.
pub const SIG_DST: &[u8] = b"BLS_SIG_BLS12381G2_XMD:SHA-256_SSWU_RO_NUL_";

/// Ready-made signature hasher under [`SIG_DST`].
pub static SIG_HASH_TO_G2: Lazy<XmdSswu> =
    Lazy::new(|| XmdSswu::new(SIG_DST).expect("the ciphersuite tag is a valid DST"));

/// Trait for hashing arbitrary data to a group element on an elliptic
/// curve.
pub trait HashToCurve {
    /// The group being hashed into.
    type Output;

    /// Produces a curve point from the message, under this hasher's domain
    /// separation tag.
    fn hash(&self, message: &[u8]) -> BlsResult<Self::Output>;
}

/// The XMD + simplified-SWU random-oracle hasher for G2.
#[derive(Clone, Debug)]
pub struct XmdSswu {
    dst: Vec<u8>,
}

impl XmdSswu {
    /// Creates a hasher with an explicit domain separation tag (1..=255
    /// bytes).
    pub fn new(dst: &[u8]) -> BlsResult<XmdSswu> {
        if dst.is_empty() || dst.len() > 255 {
            return Err(BlsError::DomainTooLarge(dst.len()));
        }
        Ok(XmdSswu { dst: dst.to_vec() })
    }

    pub fn dst(&self) -> &[u8] {
        &self.dst
    }

    /// Derives `count` Fp2 elements from the message.
    pub fn hash_to_field(&self, message: &[u8], count: usize) -> BlsResult<Vec<Fp2>> {
        let len = count * M * L;
        let bytes = expand_message_xmd(message, &self.dst, len)?;
        let mut out = Vec::with_capacity(count);
        for i in 0..count {
            let off = i * M * L;
            out.push(Fp2::new(
                fp_from_okm(&bytes[off..off + L]),
                fp_from_okm(&bytes[off + L..off + 2 * L]),
            ));
        }
        Ok(out)
    }
}

impl HashToCurve for XmdSswu {
    type Output = G2Projective;

    fn hash(&self, message: &[u8]) -> BlsResult<G2Projective> {
        let u = self.hash_to_field(message, 2)?;
        let (x0, y0) = swu::map_to_curve_sswu(&u[0])?;
        let (x1, y1) = swu::map_to_curve_sswu(&u[1])?;
        let q0 = swu::iso_map(&x0, &y0);
        let q1 = swu::iso_map(&x1, &y1);
        let p = q0.add(&q1).clear_cofactor();
        trace!(
            "hashed {} byte message to G2 under dst {:?}",
            message.len(),
            String::from_utf8_lossy(&self.dst)
        );
        Ok(p)
    }
}

/// Interprets a 64-byte expander block as an integer and reduces it into
/// Fp, folding one byte at a time.
fn fp_from_okm(bytes: &[u8]) -> Fp {
    let radix = Fp::from_u64(256);
    let mut acc = Fp::zero();
    for &b in bytes {
        acc = acc * radix + Fp::from_u64(b as u64);
    }
    acc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashing_is_deterministic() {
        let hasher = XmdSswu::new(SIG_DST).unwrap();
        let a = hasher.hash(b"hello world").unwrap();
        let b = hasher.hash(b"hello world").unwrap();
        assert_eq!(a, b);
        assert_eq!(
            a.to_affine().to_compressed().to_vec(),
            b.to_affine().to_compressed().to_vec()
        );
    }

    #[test]
    fn different_messages_hash_differently() {
        let hasher = &*SIG_HASH_TO_G2;
        assert_ne!(hasher.hash(b"hello").unwrap(), hasher.hash(b"world").unwrap());
    }

    #[test]
    fn changing_the_tag_changes_the_output() {
        let a = XmdSswu::new(b"TAG-A").unwrap();
        let b = XmdSswu::new(b"TAG-B").unwrap();
        assert_ne!(a.hash(b"message").unwrap(), b.hash(b"message").unwrap());
    }

    #[test]
    fn outputs_are_valid_subgroup_points() {
        let hasher = &*SIG_HASH_TO_G2;
        for msg in [&b""[..], b"a", b"abc", b"a longer message with some length"] {
            let p = hasher.hash(msg).unwrap();
            assert!(p.to_affine().is_on_curve());
            assert!(p.is_torsion_free());
            assert!(!p.is_identity());
        }
    }

    #[test]
    fn random_oracle_suite_vectors() {
        // BLS12381G2_XMD:SHA-256_SSWU_RO_ vectors from the hash-to-curve
        // draft, compressed form
        let hasher =
            XmdSswu::new(b"QUUX-V01-CS02-with-BLS12381G2_XMD:SHA-256_SSWU_RO_").unwrap();
        let p = hasher.hash(b"").unwrap();
        assert_eq!(
            hex::encode(p.to_affine().to_compressed()),
            "a5cb8437535e20ecffaef7752baddf98034139c38452458baeefab379ba13dff5bf5dd71b72418717047f5b0f37da03d0141ebfbdca40eb85b87142e130ab689c673cf60f1a3e98d69335266f30d9b8d4ac44c1038e9dcdd5393faf5c41fb78a"
        );
        let p = hasher.hash(b"abc").unwrap();
        assert_eq!(
            hex::encode(p.to_affine().to_compressed()),
            "939cddbccdc5e91b9623efd38c49f81a6f83f175e80b06fc374de9eb4b41dfe4ca3a230ed250fbe3a2acf73a41177fd802c2d18e033b960562aae3cab37a27ce00d80ccd5ba4b7fe0e7a210245129dbec7780ccc7954725f4168aff2787776e6"
        );
    }

    #[test]
    fn empty_or_oversized_tags_are_rejected() {
        assert!(matches!(
            XmdSswu::new(b""),
            Err(BlsError::DomainTooLarge(0))
        ));
        assert!(matches!(
            XmdSswu::new(&[0u8; 256]),
            Err(BlsError::DomainTooLarge(256))
        ));
    }

    #[test]
    fn field_reduction_folds_big_endian() {
        // 0x0100 = 256
        let mut bytes = [0u8; 64];
        bytes[62] = 1;
        assert_eq!(fp_from_okm(&bytes), Fp::from_u64(256));
        bytes[63] = 7;
        assert_eq!(fp_from_okm(&bytes), Fp::from_u64(263));
    }
}
