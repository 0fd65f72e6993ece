//! The G2 group: points over Fp2 on the sextic twist, b = 4 + 4i.
//!
//! Signatures and hashed messages live here. Compressed encodings are 96
//! bytes; the flag bits ride on the c1 half of X, which is serialized
//! first.

use super::{Affine, CurveParams, Projective, BLS_X};
use crate::fields::{modulus_minus_one_div, Fp, Fp2};
use crate::{BlsError, BlsResult};
use once_cell::sync::Lazy;

const COMPRESSION_FLAG: u8 = 0x80;
const INFINITY_FLAG: u8 = 0x40;
const SIGN_FLAG: u8 = 0x20;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct G2Params;

impl CurveParams for G2Params {
    type Base = Fp2;

    fn coeff_b() -> Fp2 {
        Fp2::from_u64s(4, 4)
    }
}

pub type G2Projective = Projective<G2Params>;
pub type G2Affine = Affine<G2Params>;

static GENERATOR: Lazy<G2Affine> = Lazy::new(|| Affine {
    x: Fp2::new(
        fp_from_hex("024aa2b2f08f0a91260805272dc51051c6e47ad4fa403b02b4510b647ae3d1770bac0326a805bbefd48056c8c121bdb8"),
        fp_from_hex("13e02b6052719f607dacd3a088274f65596bd0d09920b61ab5da61bbdc7f5049334cf11213945d57e5ac7d055d042b7e"),
    ),
    y: Fp2::new(
        fp_from_hex("0ce5d527727d6e118cc9cdc6da2e351aadfd9baa8cbdd3a76d429a695160d12c923ac9cc3baca289e193548608b82801"),
        fp_from_hex("0606c4a02ea734cc32acd2b02bc28b99cb3e287e85a763af267492ab572e99ab3f370d275cec1da1aaa9075ff05f79be"),
    ),
    infinity: false,
});

/// 1 / xi^((p - 1) / 3), the untwist-Frobenius-twist action on X.
static PSI_X: Lazy<Fp2> = Lazy::new(|| {
    Fp2::nonresidue()
        .pow_vartime(&modulus_minus_one_div(3))
        .invert()
        .expect("xi is invertible")
});

/// 1 / xi^((p - 1) / 2), the untwist-Frobenius-twist action on Y.
static PSI_Y: Lazy<Fp2> = Lazy::new(|| {
    Fp2::nonresidue()
        .pow_vartime(&modulus_minus_one_div(2))
        .invert()
        .expect("xi is invertible")
});

fn fp_from_hex(s: &str) -> Fp {
    let bytes = hex::decode(s).expect("static curve constant");
    let mut buf = [0u8; 48];
    buf.copy_from_slice(&bytes);
    Fp::from_bytes(&buf).expect("static curve constant below the modulus")
}

impl G2Projective {
    pub fn generator() -> G2Projective {
        G2Projective::from(*GENERATOR)
    }

    /// The untwist-Frobenius-twist endomorphism psi.
    pub(crate) fn psi(&self) -> G2Projective {
        G2Projective {
            x: self.x.conjugate() * *PSI_X,
            y: self.y.conjugate() * *PSI_Y,
            z: self.z.conjugate(),
        }
    }

    /// Multiplication by the (negative) curve parameter x.
    fn mul_by_param(&self) -> G2Projective {
        self.mul_u64(BLS_X).neg()
    }

    /// Subgroup membership through psi(P) = [x] P, which holds exactly on
    /// the prime-order subgroup.
    pub fn is_torsion_free(&self) -> bool {
        if self.is_identity() {
            return true;
        }
        self.psi() == self.mul_by_param()
    }

    /// psi-based cofactor clearing:
    /// psi^2(2P) + [x]([x]P + psi(P)) - [x]P - psi(P) - P.
    /// Only used on freshly mapped points, never on decoded input.
    pub fn clear_cofactor(&self) -> G2Projective {
        let t1 = self.mul_by_param();
        let t2 = self.psi();
        let t3 = self.double().psi().psi();
        t3.add(&t1.add(&t2).mul_by_param())
            .add(&t1.neg())
            .add(&t2.neg())
            .add(&self.neg())
    }
}

impl G2Affine {
    pub fn generator() -> G2Affine {
        *GENERATOR
    }

    /// 96-byte compressed form: big-endian X as c1 then c0, flags in the
    /// top bits of the first byte.
    pub fn to_compressed(&self) -> [u8; 96] {
        let mut out = [0u8; 96];
        if self.infinity {
            out[0] = COMPRESSION_FLAG | INFINITY_FLAG;
            return out;
        }
        out[..48].copy_from_slice(&self.x.c1.to_bytes());
        out[48..].copy_from_slice(&self.x.c0.to_bytes());
        out[0] |= COMPRESSION_FLAG;
        if self.y.lexicographically_largest() {
            out[0] |= SIGN_FLAG;
        }
        out
    }

    /// 192-byte raw form: X(c1 then c0) followed by Y(c1 then c0).
    pub fn to_uncompressed(&self) -> [u8; 192] {
        let mut out = [0u8; 192];
        if self.infinity {
            out[0] = INFINITY_FLAG;
            return out;
        }
        out[..48].copy_from_slice(&self.x.c1.to_bytes());
        out[48..96].copy_from_slice(&self.x.c0.to_bytes());
        out[96..144].copy_from_slice(&self.y.c1.to_bytes());
        out[144..].copy_from_slice(&self.y.c0.to_bytes());
        out
    }

    pub fn from_compressed(bytes: &[u8]) -> BlsResult<G2Affine> {
        if bytes.len() != 96 {
            return Err(BlsError::InvalidLength {
                expected: 96,
                actual: bytes.len(),
            });
        }
        let compressed = bytes[0] & COMPRESSION_FLAG != 0;
        let infinity = bytes[0] & INFINITY_FLAG != 0;
        let sign = bytes[0] & SIGN_FLAG != 0;
        if !compressed {
            return Err(BlsError::InvalidFlags);
        }
        let mut tmp = [0u8; 96];
        tmp.copy_from_slice(bytes);
        tmp[0] &= !(COMPRESSION_FLAG | INFINITY_FLAG | SIGN_FLAG);
        if infinity {
            if sign || tmp != [0u8; 96] {
                return Err(BlsError::InvalidFlags);
            }
            return Ok(G2Affine::identity());
        }
        let mut c1b = [0u8; 48];
        c1b.copy_from_slice(&tmp[..48]);
        let mut c0b = [0u8; 48];
        c0b.copy_from_slice(&tmp[48..]);
        let x = Fp2::new(
            Fp::from_bytes(&c0b).ok_or(BlsError::NonCanonicalElement)?,
            Fp::from_bytes(&c1b).ok_or(BlsError::NonCanonicalElement)?,
        );
        let y2 = x.square() * x + G2Params::coeff_b();
        let mut y = y2.sqrt().ok_or(BlsError::NotOnCurve)?;
        if y.lexicographically_largest() != sign {
            y = -y;
        }
        let point = Affine {
            x,
            y,
            infinity: false,
        };
        if !G2Projective::from(point).is_torsion_free() {
            return Err(BlsError::NotInSubgroup);
        }
        Ok(point)
    }

    pub fn from_uncompressed(bytes: &[u8]) -> BlsResult<G2Affine> {
        if bytes.len() != 192 {
            return Err(BlsError::InvalidLength {
                expected: 192,
                actual: bytes.len(),
            });
        }
        let compressed = bytes[0] & COMPRESSION_FLAG != 0;
        let infinity = bytes[0] & INFINITY_FLAG != 0;
        let sign = bytes[0] & SIGN_FLAG != 0;
        if compressed || sign {
            return Err(BlsError::InvalidFlags);
        }
        let mut tmp = [0u8; 192];
        tmp.copy_from_slice(bytes);
        tmp[0] &= !INFINITY_FLAG;
        if infinity {
            if tmp != [0u8; 192] {
                return Err(BlsError::InvalidFlags);
            }
            return Ok(G2Affine::identity());
        }
        let read = |range: core::ops::Range<usize>| -> BlsResult<Fp> {
            let mut buf = [0u8; 48];
            buf.copy_from_slice(&tmp[range]);
            Fp::from_bytes(&buf).ok_or(BlsError::NonCanonicalElement)
        };
        let x = Fp2::new(read(48..96)?, read(0..48)?);
        let y = Fp2::new(read(144..192)?, read(96..144)?);
        let point = Affine {
            x,
            y,
            infinity: false,
        };
        if !point.is_on_curve() {
            return Err(BlsError::NotOnCurve);
        }
        if !G2Projective::from(point).is_torsion_free() {
            return Err(BlsError::NotInSubgroup);
        }
        Ok(point)
    }
}
