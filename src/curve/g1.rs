//! The G1 group: points over the base field, b = 4.
//!
//! Public keys live here. Compressed encodings are 48 bytes with the flag
//! bits in the top three bits of the leading byte.

use super::{Affine, CurveParams, Projective, WindowTable, BLS_X};
use crate::fields::Fp;
use crate::{BlsError, BlsResult};
use once_cell::sync::Lazy;

/// Effective cofactor for G1: 1 - x (x is negative, so |x| + 1).
const H_EFF: u64 = BLS_X + 1;

const COMPRESSION_FLAG: u8 = 0x80;
const INFINITY_FLAG: u8 = 0x40;
const SIGN_FLAG: u8 = 0x20;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct G1Params;

impl CurveParams for G1Params {
    type Base = Fp;

    fn coeff_b() -> Fp {
        Fp::from_u64(4)
    }
}

pub type G1Projective = Projective<G1Params>;
pub type G1Affine = Affine<G1Params>;

static GENERATOR: Lazy<G1Affine> = Lazy::new(|| Affine {
    x: fp_from_hex("17f1d3a73197d7942695638c4fa9ac0fc3688c4f9774b905a14e3a3f171bac586c55e83ff97a1aeffb3af00adb22c6bb"),
    y: fp_from_hex("08b3f481e3aaa0f1a09e30ed741d8ae4fcf5e095d5d00af600db18cb2c04b3edd03cc744a2888ae40caa232946c5e7e1"),
    infinity: false,
});

/// Fixed-base table for the generator, shared by key derivation.
static GENERATOR_TABLE: Lazy<WindowTable<G1Params>> = Lazy::new(|| {
    WindowTable::new(
        &G1Projective::generator(),
        WindowTable::<G1Params>::DEFAULT_WINDOW,
    )
});

/// A primitive cube root of unity in Fp driving the G1 endomorphism
/// (x, y) -> (beta x, y). Derived by exponentiating a small non-cube and
/// calibrated against the generator, which fixes the eigenvalue to -x^2.
static ENDO_BETA: Lazy<Fp> = Lazy::new(|| {
    let exp = crate::fields::modulus_minus_one_div(3);
    let mut g = 2u64;
    loop {
        let beta = Fp::from_u64(g).pow_vartime(&exp);
        if beta != Fp::one() {
            let gen = G1Projective::generator();
            let expect = gen.mul_u64(BLS_X).mul_u64(BLS_X).neg();
            let endo = G1Projective {
                x: gen.x * beta,
                y: gen.y,
                z: gen.z,
            };
            return if endo == expect { beta } else { beta.square() };
        }
        g += 1;
    }
});

fn fp_from_hex(s: &str) -> Fp {
    let bytes = hex::decode(s).expect("static curve constant");
    let mut buf = [0u8; 48];
    buf.copy_from_slice(&bytes);
    Fp::from_bytes(&buf).expect("static curve constant below the modulus")
}

impl G1Projective {
    pub fn generator() -> G1Projective {
        G1Projective::from(*GENERATOR)
    }

    /// The shared window table for the generator.
    pub fn generator_table() -> &'static WindowTable<G1Params> {
        &GENERATOR_TABLE
    }

    /// Subgroup membership through the endomorphism identity
    /// phi(P) = -[x^2] P, far cheaper than a full cofactor multiply.
    pub fn is_torsion_free(&self) -> bool {
        if self.is_identity() {
            return true;
        }
        let endo = G1Projective {
            x: self.x * *ENDO_BETA,
            y: self.y,
            z: self.z,
        };
        endo == self.mul_u64(BLS_X).mul_u64(BLS_X).neg()
    }

    /// Moves a point of the full curve into the prime-order subgroup.
    /// Only used on freshly mapped points, never on decoded input.
    pub fn clear_cofactor(&self) -> G1Projective {
        self.mul_u64(H_EFF)
    }
}

impl G1Affine {
    pub fn generator() -> G1Affine {
        *GENERATOR
    }

    /// 48-byte compressed form: big-endian X with compression, infinity and
    /// Y-sign flags in the top bits.
    pub fn to_compressed(&self) -> [u8; 48] {
        let mut out = [0u8; 48];
        if self.infinity {
            out[0] = COMPRESSION_FLAG | INFINITY_FLAG;
            return out;
        }
        out.copy_from_slice(&self.x.to_bytes());
        out[0] |= COMPRESSION_FLAG;
        if self.y.lexicographically_largest() {
            out[0] |= SIGN_FLAG;
        }
        out
    }

    /// 96-byte raw form: X followed by Y.
    pub fn to_uncompressed(&self) -> [u8; 96] {
        let mut out = [0u8; 96];
        if self.infinity {
            out[0] = INFINITY_FLAG;
            return out;
        }
        out[..48].copy_from_slice(&self.x.to_bytes());
        out[48..].copy_from_slice(&self.y.to_bytes());
        out
    }

    /// Decodes a compressed point, enforcing canonical field encoding, the
    /// curve equation and subgroup membership.
    pub fn from_compressed(bytes: &[u8]) -> BlsResult<G1Affine> {
        if bytes.len() != 48 {
            return Err(BlsError::InvalidLength {
                expected: 48,
                actual: bytes.len(),
            });
        }
        let compressed = bytes[0] & COMPRESSION_FLAG != 0;
        let infinity = bytes[0] & INFINITY_FLAG != 0;
        let sign = bytes[0] & SIGN_FLAG != 0;
        if !compressed {
            return Err(BlsError::InvalidFlags);
        }
        let mut tmp = [0u8; 48];
        tmp.copy_from_slice(bytes);
        tmp[0] &= !(COMPRESSION_FLAG | INFINITY_FLAG | SIGN_FLAG);
        if infinity {
            if sign || tmp != [0u8; 48] {
                return Err(BlsError::InvalidFlags);
            }
            return Ok(G1Affine::identity());
        }
        let x = Fp::from_bytes(&tmp).ok_or(BlsError::NonCanonicalElement)?;
        let y2 = x.square() * x + G1Params::coeff_b();
        let mut y = y2.sqrt().ok_or(BlsError::NotOnCurve)?;
        if y.lexicographically_largest() != sign {
            y = -y;
        }
        let point = Affine {
            x,
            y,
            infinity: false,
        };
        if !G1Projective::from(point).is_torsion_free() {
            return Err(BlsError::NotInSubgroup);
        }
        Ok(point)
    }

    /// Decodes a raw (uncompressed) point with the same validity checks.
    pub fn from_uncompressed(bytes: &[u8]) -> BlsResult<G1Affine> {
        if bytes.len() != 96 {
            return Err(BlsError::InvalidLength {
                expected: 96,
                actual: bytes.len(),
            });
        }
        let compressed = bytes[0] & COMPRESSION_FLAG != 0;
        let infinity = bytes[0] & INFINITY_FLAG != 0;
        let sign = bytes[0] & SIGN_FLAG != 0;
        if compressed || sign {
            return Err(BlsError::InvalidFlags);
        }
        let mut tmp = [0u8; 96];
        tmp.copy_from_slice(bytes);
        tmp[0] &= !INFINITY_FLAG;
        if infinity {
            if tmp != [0u8; 96] {
                return Err(BlsError::InvalidFlags);
            }
            return Ok(G1Affine::identity());
        }
        let mut xb = [0u8; 48];
        xb.copy_from_slice(&tmp[..48]);
        let mut yb = [0u8; 48];
        yb.copy_from_slice(&tmp[48..]);
        let x = Fp::from_bytes(&xb).ok_or(BlsError::NonCanonicalElement)?;
        let y = Fp::from_bytes(&yb).ok_or(BlsError::NonCanonicalElement)?;
        let point = Affine {
            x,
            y,
            infinity: false,
        };
        if !point.is_on_curve() {
            return Err(BlsError::NotOnCurve);
        }
        if !G1Projective::from(point).is_torsion_free() {
            return Err(BlsError::NotInSubgroup);
        }
        Ok(point)
    }
}
