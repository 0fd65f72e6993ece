//! Cubic extension of Fp2: c0 + c1*v + c2*v^2 with v^3 = xi = 1 + i.

use super::fp;
use super::fp2::Fp2;
use core::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};
use once_cell::sync::Lazy;

/// xi^((p - 1) / 3), the Frobenius action on the v component.
static FROBENIUS_C1: Lazy<Fp2> =
    Lazy::new(|| Fp2::nonresidue().pow_vartime(&fp::modulus_minus_one_div(3)));

/// xi^(2 (p - 1) / 3), the Frobenius action on the v^2 component.
static FROBENIUS_C2: Lazy<Fp2> = Lazy::new(|| FROBENIUS_C1.square());

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Fp6 {
    pub c0: Fp2,
    pub c1: Fp2,
    pub c2: Fp2,
}

impl Fp6 {
    pub const fn new(c0: Fp2, c1: Fp2, c2: Fp2) -> Fp6 {
        Fp6 { c0, c1, c2 }
    }

    pub const fn zero() -> Fp6 {
        Fp6::new(Fp2::zero(), Fp2::zero(), Fp2::zero())
    }

    pub const fn one() -> Fp6 {
        Fp6::new(Fp2::one(), Fp2::zero(), Fp2::zero())
    }

    pub fn is_zero(&self) -> bool {
        self.c0.is_zero() && self.c1.is_zero() && self.c2.is_zero()
    }

    /// Multiplication by v: rotates the coefficients and folds the overflow
    /// through xi.
    pub fn mul_by_nonresidue(&self) -> Fp6 {
        Fp6::new(self.c2.mul_by_nonresidue(), self.c0, self.c1)
    }

    /// Sparse multiplication by b0 + b1*v, a Miller-loop shortcut.
    pub fn mul_by_01(&self, b0: &Fp2, b1: &Fp2) -> Fp6 {
        let t0 = self.c0 * *b0;
        let t1 = self.c1 * *b1;
        Fp6::new(
            ((self.c1 + self.c2) * *b1 - t1).mul_by_nonresidue() + t0,
            (*b0 + *b1) * (self.c0 + self.c1) - t0 - t1,
            (self.c0 + self.c2) * *b0 - t0 + t1,
        )
    }

    /// Sparse multiplication by b1*v.
    pub fn mul_by_1(&self, b1: &Fp2) -> Fp6 {
        Fp6::new(
            (self.c2 * *b1).mul_by_nonresidue(),
            self.c0 * *b1,
            self.c1 * *b1,
        )
    }

    pub fn square(&self) -> Fp6 {
        let t0 = self.c0.square();
        let t1 = (self.c0 * self.c1).double();
        let t3 = (self.c1 * self.c2).double();
        let t4 = self.c2.square();
        let t2 = (self.c0 - self.c1 + self.c2).square();
        Fp6::new(
            t3.mul_by_nonresidue() + t0,
            t4.mul_by_nonresidue() + t1,
            t1 + t2 + t3 - t0 - t4,
        )
    }

    pub fn invert(&self) -> Option<Fp6> {
        let c0 = self.c0.square() - (self.c1 * self.c2).mul_by_nonresidue();
        let c1 = self.c2.square().mul_by_nonresidue() - self.c0 * self.c1;
        let c2 = self.c1.square() - self.c0 * self.c2;
        let t = (self.c2 * c1 + self.c1 * c2).mul_by_nonresidue() + self.c0 * c0;
        t.invert()
            .map(|t| Fp6::new(c0 * t, c1 * t, c2 * t))
    }

    /// The p^power Frobenius map, applied as `power` compositions of the
    /// single-power map (indices reduce mod 6).
    pub fn frobenius_map(&self, power: usize) -> Fp6 {
        let mut out = *self;
        for _ in 0..(power % 6) {
            out = out.frobenius_step();
        }
        out
    }

    fn frobenius_step(&self) -> Fp6 {
        Fp6::new(
            self.c0.conjugate(),
            self.c1.conjugate() * *FROBENIUS_C1,
            self.c2.conjugate() * *FROBENIUS_C2,
        )
    }

    /// Scales every coefficient by an Fp2 element.
    pub(crate) fn scale(&self, by: &Fp2) -> Fp6 {
        Fp6::new(self.c0 * *by, self.c1 * *by, self.c2 * *by)
    }

    #[cfg(test)]
    pub(crate) fn random<R: rand::RngCore>(rng: &mut R) -> Fp6 {
        Fp6::new(Fp2::random(rng), Fp2::random(rng), Fp2::random(rng))
    }
}

impl Add for Fp6 {
    type Output = Fp6;

    fn add(self, rhs: Fp6) -> Fp6 {
        Fp6::new(self.c0 + rhs.c0, self.c1 + rhs.c1, self.c2 + rhs.c2)
    }
}

impl Sub for Fp6 {
    type Output = Fp6;

    fn sub(self, rhs: Fp6) -> Fp6 {
        Fp6::new(self.c0 - rhs.c0, self.c1 - rhs.c1, self.c2 - rhs.c2)
    }
}

impl Neg for Fp6 {
    type Output = Fp6;

    fn neg(self) -> Fp6 {
        Fp6::new(-self.c0, -self.c1, -self.c2)
    }
}

impl Mul for Fp6 {
    type Output = Fp6;

    fn mul(self, rhs: Fp6) -> Fp6 {
        // Karatsuba over the three components
        let t0 = self.c0 * rhs.c0;
        let t1 = self.c1 * rhs.c1;
        let t2 = self.c2 * rhs.c2;
        Fp6::new(
            ((self.c1 + self.c2) * (rhs.c1 + rhs.c2) - t1 - t2).mul_by_nonresidue() + t0,
            (self.c0 + self.c1) * (rhs.c0 + rhs.c1) - t0 - t1 + t2.mul_by_nonresidue(),
            (self.c0 + self.c2) * (rhs.c0 + rhs.c2) - t0 + t1 - t2,
        )
    }
}

impl AddAssign for Fp6 {
    fn add_assign(&mut self, rhs: Fp6) {
        *self = *self + rhs;
    }
}

impl SubAssign for Fp6 {
    fn sub_assign(&mut self, rhs: Fp6) {
        *self = *self - rhs;
    }
}

impl MulAssign for Fp6 {
    fn mul_assign(&mut self, rhs: Fp6) {
        *self = *self * rhs;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xorshift::XorShiftRng;

    fn rng() -> XorShiftRng {
        XorShiftRng::seed_from_u64(0x6666_7777)
    }

    #[test]
    fn v_cubed_is_xi() {
        let v = Fp6::new(Fp2::zero(), Fp2::one(), Fp2::zero());
        let xi = Fp6::new(Fp2::nonresidue(), Fp2::zero(), Fp2::zero());
        assert_eq!(v * v * v, xi);
    }

    #[test]
    fn field_axioms() {
        let mut rng = rng();
        for _ in 0..20 {
            let a = Fp6::random(&mut rng);
            let b = Fp6::random(&mut rng);
            let c = Fp6::random(&mut rng);
            assert_eq!(a * b, b * a);
            assert_eq!((a * b) * c, a * (b * c));
            assert_eq!(a * (b + c), a * b + a * c);
            assert_eq!(a.square(), a * a);
        }
    }

    #[test]
    fn inversion() {
        let mut rng = rng();
        for _ in 0..20 {
            let a = Fp6::random(&mut rng);
            if a.is_zero() {
                continue;
            }
            assert_eq!(a * a.invert().unwrap(), Fp6::one());
        }
    }

    #[test]
    fn sparse_multiplications_match_full() {
        let mut rng = rng();
        for _ in 0..10 {
            let a = Fp6::random(&mut rng);
            let b0 = Fp2::random(&mut rng);
            let b1 = Fp2::random(&mut rng);
            let sparse01 = Fp6::new(b0, b1, Fp2::zero());
            assert_eq!(a.mul_by_01(&b0, &b1), a * sparse01);
            let sparse1 = Fp6::new(Fp2::zero(), b1, Fp2::zero());
            assert_eq!(a.mul_by_1(&b1), a * sparse1);
        }
    }

    #[test]
    fn mul_by_nonresidue_matches_v() {
        let mut rng = rng();
        let v = Fp6::new(Fp2::zero(), Fp2::one(), Fp2::zero());
        for _ in 0..10 {
            let a = Fp6::random(&mut rng);
            assert_eq!(a.mul_by_nonresidue(), a * v);
        }
    }

    #[test]
    fn frobenius_has_order_six() {
        let mut rng = rng();
        for _ in 0..5 {
            let a = Fp6::random(&mut rng);
            assert_eq!(a.frobenius_map(6), a);
            assert_eq!(
                a.frobenius_map(1).frobenius_map(2),
                a.frobenius_map(3)
            );
        }
    }

    #[test]
    fn frobenius_respects_multiplication() {
        let mut rng = rng();
        for _ in 0..5 {
            let a = Fp6::random(&mut rng);
            let b = Fp6::random(&mut rng);
            assert_eq!(
                (a * b).frobenius_map(1),
                a.frobenius_map(1) * b.frobenius_map(1)
            );
        }
    }
}
