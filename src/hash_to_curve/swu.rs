//! Simplified SWU map for the G2 field (p = 9 mod 16) and the 3-isogeny
//! back to the target curve.
//!
//! The map lands on an isogenous curve E' with a nonzero a-coefficient,
//! where SWU applies; the published rational maps then carry the point to
//! the true curve. Coefficients are the standard constants for
//! BLS12-381 G2.

use crate::curve::G2Projective;
use crate::fields::{Fp, Fp2};
use crate::{BlsError, BlsResult};
use once_cell::sync::Lazy;

/// E' coefficient A' = 240 i.
static ISO_A: Lazy<Fp2> = Lazy::new(|| Fp2::from_u64s(0, 240));

/// E' coefficient B' = 1012 + 1012 i.
static ISO_B: Lazy<Fp2> = Lazy::new(|| Fp2::from_u64s(1012, 1012));

/// SWU constant Z = -(2 + i).
static SWU_Z: Lazy<Fp2> = Lazy::new(|| -Fp2::from_u64s(2, 1));

/// -B' / A'.
static NEG_B_OVER_A: Lazy<Fp2> = Lazy::new(|| {
    -(*ISO_B) * ISO_A.invert().expect("A' is nonzero")
});

/// B' / (Z * A'), the exceptional-case x1.
static B_OVER_ZA: Lazy<Fp2> = Lazy::new(|| {
    *ISO_B * (*SWU_Z * *ISO_A).invert().expect("Z A' is nonzero")
});

fn fp2_from_hex(c0: &str, c1: &str) -> Fp2 {
    let parse = |s: &str| -> Fp {
        let bytes = hex::decode(s).expect("static isogeny constant");
        let mut buf = [0u8; 48];
        buf.copy_from_slice(&bytes);
        Fp::from_bytes(&buf).expect("static isogeny constant below the modulus")
    };
    Fp2::new(parse(c0), parse(c1))
}

/// Numerator of the x rational map, ascending degree.
static ISO_X_NUM: Lazy<[Fp2; 4]> = Lazy::new(|| {
    [
        fp2_from_hex(
            "05c759507e8e333ebb5b7a9a47d7ed8532c52d39fd3a042a88b58423c50ae15d5c2638e343d9c71c6238aaaaaaaa97d6",
            "05c759507e8e333ebb5b7a9a47d7ed8532c52d39fd3a042a88b58423c50ae15d5c2638e343d9c71c6238aaaaaaaa97d6",
        ),
        fp2_from_hex(
            "000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000",
            "11560bf17baa99bc32126fced787c88f984f87adf7ae0c7f9a208c6b4f20a4181472aaa9cb8d555526a9ffffffffc71a",
        ),
        fp2_from_hex(
            "11560bf17baa99bc32126fced787c88f984f87adf7ae0c7f9a208c6b4f20a4181472aaa9cb8d555526a9ffffffffc71e",
            "08ab05f8bdd54cde190937e76bc3e447cc27c3d6fbd7063fcd104635a790520c0a395554e5c6aaaa9354ffffffffe38d",
        ),
        fp2_from_hex(
            "171d6541fa38ccfaed6dea691f5fb614cb14b4e7f4e810aa22d6108f142b85757098e38d0f671c7188e2aaaaaaaa5ed1",
            "000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000",
        ),
    ]
});

/// Denominator of the x rational map, ascending degree; monic of degree 2.
static ISO_X_DEN: Lazy<[Fp2; 2]> = Lazy::new(|| {
    [
        fp2_from_hex(
            "000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000",
            "1a0111ea397fe69a4b1ba7b6434bacd764774b84f38512bf6730d2a0f6b0f6241eabfffeb153ffffb9feffffffffaa63",
        ),
        fp2_from_hex(
            "00000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000c",
            "1a0111ea397fe69a4b1ba7b6434bacd764774b84f38512bf6730d2a0f6b0f6241eabfffeb153ffffb9feffffffffaa9f",
        ),
    ]
});

/// Numerator of the y rational map, ascending degree.
static ISO_Y_NUM: Lazy<[Fp2; 4]> = Lazy::new(|| {
    [
        fp2_from_hex(
            "1530477c7ab4113b59a4c18b076d11930f7da5d4a07f649bf54439d87d27e500fc8c25ebf8c92f6812cfc71c71c6d706",
            "1530477c7ab4113b59a4c18b076d11930f7da5d4a07f649bf54439d87d27e500fc8c25ebf8c92f6812cfc71c71c6d706",
        ),
        fp2_from_hex(
            "000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000",
            "05c759507e8e333ebb5b7a9a47d7ed8532c52d39fd3a042a88b58423c50ae15d5c2638e343d9c71c6238aaaaaaaa97be",
        ),
        fp2_from_hex(
            "11560bf17baa99bc32126fced787c88f984f87adf7ae0c7f9a208c6b4f20a4181472aaa9cb8d555526a9ffffffffc71c",
            "08ab05f8bdd54cde190937e76bc3e447cc27c3d6fbd7063fcd104635a790520c0a395554e5c6aaaa9354ffffffffe38f",
        ),
        fp2_from_hex(
            "124c9ad43b6cf79bfbf7043de3811ad0761b0f37a1e26286b0e977c69aa274524e79097a56dc4bd9e1b371c71c718b10",
            "000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000",
        ),
    ]
});

/// Denominator of the y rational map, ascending degree; monic of degree 3.
static ISO_Y_DEN: Lazy<[Fp2; 3]> = Lazy::new(|| {
    [
        fp2_from_hex(
            "1a0111ea397fe69a4b1ba7b6434bacd764774b84f38512bf6730d2a0f6b0f6241eabfffeb153ffffb9feffffffffa8fb",
            "1a0111ea397fe69a4b1ba7b6434bacd764774b84f38512bf6730d2a0f6b0f6241eabfffeb153ffffb9feffffffffa8fb",
        ),
        fp2_from_hex(
            "000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000",
            "1a0111ea397fe69a4b1ba7b6434bacd764774b84f38512bf6730d2a0f6b0f6241eabfffeb153ffffb9feffffffffa9d3",
        ),
        fp2_from_hex(
            "000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000012",
            "1a0111ea397fe69a4b1ba7b6434bacd764774b84f38512bf6730d2a0f6b0f6241eabfffeb153ffffb9feffffffffaa99",
        ),
    ]
});

/// The simplified SWU map for p = 9 mod 16, producing an affine point on
/// the isogenous curve E'. Square-root candidates are tried for both x1
/// and x2; at least one always applies, so a double failure signals a
/// parameter error rather than a normal outcome.
pub(crate) fn map_to_curve_sswu(u: &Fp2) -> BlsResult<(Fp2, Fp2)> {
    let z = *SWU_Z;
    let zu2 = z * u.square();
    let tv1_den = zu2.square() + zu2;
    let x1 = match tv1_den.invert() {
        Some(tv1) => (Fp2::one() + tv1) * *NEG_B_OVER_A,
        None => *B_OVER_ZA,
    };
    let gx1 = (x1.square() + *ISO_A) * x1 + *ISO_B;
    let x2 = zu2 * x1;
    let gx2 = (x2.square() + *ISO_A) * x2 + *ISO_B;

    let (x, mut y) = if let Some(y1) = gx1.sqrt() {
        (x1, y1)
    } else if let Some(y2) = gx2.sqrt() {
        (x2, y2)
    } else {
        return Err(BlsError::HashToCurveError);
    };
    if u.sgn0() != y.sgn0() {
        y = -y;
    }
    Ok((x, y))
}

/// Evaluates the published rational maps carrying a point of E' onto the
/// target curve. The exceptional divisor (a vanishing denominator) maps
/// to the identity.
pub(crate) fn iso_map(x: &Fp2, y: &Fp2) -> G2Projective {
    let horner = |coeffs: &[Fp2], monic: bool| -> Fp2 {
        let mut acc = if monic { Fp2::one() } else { Fp2::zero() };
        for k in coeffs.iter().rev() {
            acc = acc * *x + *k;
        }
        acc
    };
    let x_num = horner(&ISO_X_NUM[..], false);
    let x_den = horner(&ISO_X_DEN[..], true);
    let y_num = horner(&ISO_Y_NUM[..], false);
    let y_den = horner(&ISO_Y_DEN[..], true);
    if x_den.is_zero() || y_den.is_zero() {
        return G2Projective::identity();
    }
    // x' = x_num / x_den, y' = y * y_num / y_den as one projective triple
    G2Projective {
        x: x_num * y_den,
        y: *y * y_num * x_den,
        z: x_den * y_den,
    }
}
