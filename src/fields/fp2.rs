//! Quadratic extension of the base field: c0 + c1*i with i^2 = -1.

use super::fp::{self, Fp};
use crate::arith;
use core::fmt;
use core::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};
use once_cell::sync::Lazy;

/// (p - 3) / 4, the candidate exponent for square roots in Fp2.
static P_MINUS_3_DIV_4: Lazy<[u64; 6]> = Lazy::new(|| {
    let (t, _) = arith::sub(&fp::MODULUS, &[3, 0, 0, 0, 0, 0]);
    arith::shr1(&arith::shr1(&t, 0), 0)
});

#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct Fp2 {
    pub c0: Fp,
    pub c1: Fp,
}

impl fmt::Debug for Fp2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fp2({:?} + {:?}*i)", self.c0, self.c1)
    }
}

impl Fp2 {
    pub const fn new(c0: Fp, c1: Fp) -> Fp2 {
        Fp2 { c0, c1 }
    }

    pub const fn zero() -> Fp2 {
        Fp2::new(Fp::zero(), Fp::zero())
    }

    pub const fn one() -> Fp2 {
        Fp2::new(Fp::one(), Fp::zero())
    }

    pub fn is_zero(&self) -> bool {
        self.c0.is_zero() && self.c1.is_zero()
    }

    pub fn from_u64s(c0: u64, c1: u64) -> Fp2 {
        Fp2::new(Fp::from_u64(c0), Fp::from_u64(c1))
    }

    /// The quadratic non-residue xi = 1 + i underlying the sextic extension.
    pub(crate) fn nonresidue() -> Fp2 {
        Fp2::from_u64s(1, 1)
    }

    pub fn square(&self) -> Fp2 {
        // (c0 + c1 i)^2 = (c0 + c1)(c0 - c1) + 2 c0 c1 i
        let a = self.c0 + self.c1;
        let b = self.c0 - self.c1;
        let c = self.c0 + self.c0;
        Fp2::new(a * b, c * self.c1)
    }

    pub fn double(&self) -> Fp2 {
        *self + *self
    }

    pub fn conjugate(&self) -> Fp2 {
        Fp2::new(self.c0, -self.c1)
    }

    /// Multiplication by xi = 1 + i.
    pub fn mul_by_nonresidue(&self) -> Fp2 {
        Fp2::new(self.c0 - self.c1, self.c0 + self.c1)
    }

    /// The p^power Frobenius map; only the parity of `power` matters.
    pub fn frobenius_map(&self, power: usize) -> Fp2 {
        if power % 2 == 1 {
            self.conjugate()
        } else {
            *self
        }
    }

    pub fn invert(&self) -> Option<Fp2> {
        // 1 / (c0 + c1 i) = (c0 - c1 i) / (c0^2 + c1^2)
        let norm = self.c0.square() + self.c1.square();
        norm.invert()
            .map(|t| Fp2::new(self.c0 * t, -(self.c1 * t)))
    }

    pub fn pow_vartime(&self, exp: &[u64]) -> Fp2 {
        let mut res = Fp2::one();
        for &limb in exp.iter().rev() {
            for i in (0..64).rev() {
                res = res.square();
                if (limb >> i) & 1 == 1 {
                    res *= *self;
                }
            }
        }
        res
    }

    /// Square root in Fp2 (p^2 = 9 mod 16). One exponentiation produces a
    /// candidate; the check value alpha = cand^2 / self is a root of unity
    /// that selects the correcting branch. Verified by squaring, so a
    /// non-residue yields `None` rather than a wrong answer.
    pub fn sqrt(&self) -> Option<Fp2> {
        if self.is_zero() {
            return Some(*self);
        }
        let a1 = self.pow_vartime(&*P_MINUS_3_DIV_4);
        let alpha = a1.square() * *self;
        let x0 = a1 * *self;
        let candidate = if alpha == -Fp2::one() {
            // multiply by i
            Fp2::new(-x0.c1, x0.c0)
        } else {
            (alpha + Fp2::one()).pow_vartime(&*fp::P_MINUS_1_DIV_2) * x0
        };
        if candidate.square() == *self {
            Some(candidate)
        } else {
            None
        }
    }

    /// The sign of an Fp2 element per the hash-to-curve convention: parity
    /// of c0, falling back to the parity of c1 when c0 is zero.
    pub fn sgn0(&self) -> bool {
        let sign_0 = self.c0.is_odd();
        let zero_0 = self.c0.is_zero();
        let sign_1 = self.c1.is_odd();
        sign_0 || (zero_0 && sign_1)
    }

    /// Serialization sign bit: compares (c1, c0) against the negation,
    /// most significant component first.
    pub fn lexicographically_largest(&self) -> bool {
        self.c1.lexicographically_largest()
            || (self.c1.is_zero() && self.c0.lexicographically_largest())
    }

    #[cfg(test)]
    pub(crate) fn random<R: rand::RngCore>(rng: &mut R) -> Fp2 {
        Fp2::new(Fp::random(rng), Fp::random(rng))
    }
}

impl Add for Fp2 {
    type Output = Fp2;

    fn add(self, rhs: Fp2) -> Fp2 {
        Fp2::new(self.c0 + rhs.c0, self.c1 + rhs.c1)
    }
}

impl Sub for Fp2 {
    type Output = Fp2;

    fn sub(self, rhs: Fp2) -> Fp2 {
        Fp2::new(self.c0 - rhs.c0, self.c1 - rhs.c1)
    }
}

impl Neg for Fp2 {
    type Output = Fp2;

    fn neg(self) -> Fp2 {
        Fp2::new(-self.c0, -self.c1)
    }
}

impl Mul for Fp2 {
    type Output = Fp2;

    fn mul(self, rhs: Fp2) -> Fp2 {
        // Karatsuba: three base-field multiplications instead of four
        let t0 = self.c0 * rhs.c0;
        let t1 = self.c1 * rhs.c1;
        let s = (self.c0 + self.c1) * (rhs.c0 + rhs.c1);
        Fp2::new(t0 - t1, s - t0 - t1)
    }
}

/// Scaling by a base-field element, used by the pairing line evaluation.
impl Mul<Fp> for Fp2 {
    type Output = Fp2;

    fn mul(self, rhs: Fp) -> Fp2 {
        Fp2::new(self.c0 * rhs, self.c1 * rhs)
    }
}

impl AddAssign for Fp2 {
    fn add_assign(&mut self, rhs: Fp2) {
        *self = *self + rhs;
    }
}

impl SubAssign for Fp2 {
    fn sub_assign(&mut self, rhs: Fp2) {
        *self = *self - rhs;
    }
}

impl MulAssign for Fp2 {
    fn mul_assign(&mut self, rhs: Fp2) {
        *self = *self * rhs;
    }
}
