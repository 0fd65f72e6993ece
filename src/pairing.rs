//! The optimal-ate pairing over BLS12-381.
//!
//! Line coefficients depend only on the G2 operand, so they are computed
//! once per point into a `G2Prepared` and reused for every Miller loop
//! against it; pairing one G2 point against many G1 points then costs one
//! precomputation plus cheap evaluations.

use crate::curve::{G1Affine, G1Projective, G2Affine, G2Projective, BLS_X};
use crate::fields::{Fp, Fp2, Fp12};
use crate::{BlsError, BlsResult};
use once_cell::sync::Lazy;

static TWO_INV: Lazy<Fp> = Lazy::new(|| {
    Fp::from_u64(2)
        .invert()
        .expect("2 is invertible in a field of odd characteristic")
});

/// One line function, stored as the three nonzero Fp2 coefficients it
/// contributes to the sparse Fp12 multiplication.
type LineCoefficients = (Fp2, Fp2, Fp2);

/// A G2 point with its Miller-loop line coefficients precomputed.
#[derive(Clone, Debug)]
pub struct G2Prepared {
    ell_coeffs: Vec<LineCoefficients>,
    infinity: bool,
}

impl G2Prepared {
    pub fn is_identity(&self) -> bool {
        self.infinity
    }
}

impl From<&G2Affine> for G2Prepared {
    fn from(q: &G2Affine) -> G2Prepared {
        if q.is_identity() {
            return G2Prepared {
                ell_coeffs: Vec::new(),
                infinity: true,
            };
        }
        // walk the bits of |x| below the leading one, emitting a doubling
        // step per bit and an addition step on set bits
        let qx = q.x;
        let qy = q.y;
        let mut rx = qx;
        let mut ry = qy;
        let mut rz = Fp2::one();
        let mut ell_coeffs = Vec::with_capacity(70);
        for i in (0..63).rev() {
            // doubling step
            let t0 = ry.square();
            let t1 = rz.square();
            let b3 = triple_b(t1);
            let t3 = b3 + b3 + b3;
            let t4 = (ry + rz).square() - t1 - t0;
            let rx_sq = rx.square();
            ell_coeffs.push((b3 - t0, rx_sq + rx_sq + rx_sq, -t4));
            let b3_sq = b3.square();
            rx = ((t0 - t3) * rx * ry) * *TWO_INV;
            ry = ((t0 + t3) * *TWO_INV).square() - (b3_sq + b3_sq + b3_sq);
            rz = t0 * t4;
            if (BLS_X >> i) & 1 == 1 {
                // addition step, mixing the fixed affine Q back in
                let t0 = ry - qy * rz;
                let t1 = rx - qx * rz;
                ell_coeffs.push((t0 * qx - t1 * qy, -t0, t1));
                let t2 = t1.square();
                let t3 = t2 * t1;
                let t4 = t2 * rx;
                let t5 = t3 - (t4 + t4) + t0.square() * rz;
                rx = t1 * t5;
                ry = (t4 - t5) * t0 - t3 * ry;
                rz = rz * t3;
            }
        }
        G2Prepared {
            ell_coeffs,
            infinity: false,
        }
    }
}

impl From<&G2Projective> for G2Prepared {
    fn from(q: &G2Projective) -> G2Prepared {
        G2Prepared::from(&q.to_affine())
    }
}

/// 3 * t * b2 where b2 = 4 + 4i; (a + bi)(4 + 4i) = 4(a-b) + 4(a+b)i.
fn triple_b(t: Fp2) -> Fp2 {
    let t3 = t + t + t;
    let four = Fp::from_u64(4);
    Fp2::new((t3.c0 - t3.c1) * four, (t3.c0 + t3.c1) * four)
}

/// Evaluates the precomputed lines against a fixed G1 point. The loop runs
/// in the reversed pairing direction, hence the final conjugation.
pub fn miller_loop(q: &G2Prepared, p: &G1Affine) -> Fp12 {
    if q.infinity || p.is_identity() {
        return Fp12::one();
    }
    let px = p.x;
    let py = p.y;
    let mut f = Fp12::one();
    let mut coeff_idx = 0;
    for i in (0..63).rev() {
        let c = &q.ell_coeffs[coeff_idx];
        coeff_idx += 1;
        f = f.mul_by_014(&c.0, &(c.1 * px), &(c.2 * py));
        if (BLS_X >> i) & 1 == 1 {
            let c = &q.ell_coeffs[coeff_idx];
            coeff_idx += 1;
            f = f.mul_by_014(&c.0, &(c.1 * px), &(c.2 * py));
        }
        if i != 0 {
            f = f.square();
        }
    }
    f.conjugate()
}

/// The pairing e(P, Q). With `apply_final_exponent` false the raw
/// Miller-loop output is returned, letting callers multiply several
/// partial pairings together before paying for one exponentiation.
pub fn pairing(p: &G1Projective, q: &G2Projective, apply_final_exponent: bool) -> BlsResult<Fp12> {
    let p_affine = p.to_affine();
    let q_prepared = G2Prepared::from(q);
    pairing_prepared(&p_affine, &q_prepared, apply_final_exponent)
}

/// Pairing against an already prepared G2 operand.
pub fn pairing_prepared(
    p: &G1Affine,
    q: &G2Prepared,
    apply_final_exponent: bool,
) -> BlsResult<Fp12> {
    if p.is_identity() || q.is_identity() {
        return Err(BlsError::PairingAtInfinity);
    }
    let f = miller_loop(q, p);
    if apply_final_exponent {
        f.final_exponentiate().ok_or(BlsError::PairingAtInfinity)
    } else {
        Ok(f)
    }
}
