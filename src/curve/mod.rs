//! Projective point arithmetic, generic over the coordinate field.
//!
//! Both BLS12-381 groups are short Weierstrass curves with a = 0, so a
//! single set of homogeneous-coordinate formulas serves G1 (over Fp) and
//! G2 (over Fp2); each instantiation only supplies its curve coefficient b.

use crate::fields::{Field, Scalar};
use crate::{arith, BlsError, BlsResult};
use core::fmt::Debug;

pub mod g1;
pub mod g2;

pub use g1::{G1Affine, G1Params, G1Projective};
pub use g2::{G2Affine, G2Params, G2Projective};

/// |x|, the absolute value of the BLS12-381 curve parameter. The parameter
/// itself is negative; code walking its bits conjugates or negates to
/// account for the sign.
pub(crate) const BLS_X: u64 = 0xd201_0000_0001_0000;

/// Curve-level constants for one of the two groups.
pub trait CurveParams: 'static + Copy + Clone + Debug + Default + PartialEq + Eq {
    type Base: Field;

    /// The b in y^2 = x^3 + b.
    fn coeff_b() -> Self::Base;
}

/// A point in homogeneous projective coordinates; Z = 0 designates the
/// group identity.
#[derive(Clone, Copy, Debug)]
pub struct Projective<P: CurveParams> {
    pub(crate) x: P::Base,
    pub(crate) y: P::Base,
    pub(crate) z: P::Base,
}

/// An affine point, the form used for serialization and pairing input.
#[derive(Clone, Copy, Debug)]
pub struct Affine<P: CurveParams> {
    pub x: P::Base,
    pub y: P::Base,
    pub infinity: bool,
}

impl<P: CurveParams> Projective<P> {
    pub fn identity() -> Self {
        Projective {
            x: P::Base::zero(),
            y: P::Base::one(),
            z: P::Base::zero(),
        }
    }

    pub fn is_identity(&self) -> bool {
        self.z.is_zero()
    }

    pub fn double(&self) -> Self {
        if self.is_identity() {
            return *self;
        }
        let xx = self.x.square();
        let w = xx.double() + xx;
        let s = self.y * self.z;
        let ss = s.square();
        let b = self.x * self.y * s;
        let b4 = b.double().double();
        let h = w.square() - b4.double();
        let x3 = (h * s).double();
        let e = self.y.square() * ss;
        let y3 = w * (b4 - h) - e.double().double().double();
        let z3 = (ss * s).double().double().double();
        Projective {
            x: x3,
            y: y3,
            z: z3,
        }
    }

    pub fn add(&self, other: &Self) -> Self {
        if self.is_identity() {
            return *other;
        }
        if other.is_identity() {
            return *self;
        }
        let u1 = other.y * self.z;
        let u2 = self.y * other.z;
        let v1 = other.x * self.z;
        let v2 = self.x * other.z;
        if v1 == v2 {
            // same x line: either a doubling or a pair of opposite points
            return if u1 == u2 {
                self.double()
            } else {
                Self::identity()
            };
        }
        let u = u1 - u2;
        let v = v1 - v2;
        let w = self.z * other.z;
        let vv = v.square();
        let vvv = vv * v;
        let vvv2 = vv * v2;
        let a = u.square() * w - vvv - vvv2.double();
        let x3 = v * a;
        let y3 = u * (vvv2 - a) - vvv * u2;
        let z3 = vvv * w;
        Projective {
            x: x3,
            y: y3,
            z: z3,
        }
    }

    pub fn neg(&self) -> Self {
        Projective {
            x: self.x,
            y: -self.y,
            z: self.z,
        }
    }

    /// Reduces to affine coordinates; the identity maps to the affine
    /// infinity marker.
    pub fn to_affine(&self) -> Affine<P> {
        match self.z.invert() {
            Some(zinv) => Affine {
                x: self.x * zinv,
                y: self.y * zinv,
                infinity: false,
            },
            None => Affine::identity(),
        }
    }

    /// Affine conversion for many points at the cost of one inversion,
    /// via the running-product trick.
    pub fn batch_normalize(points: &[Self]) -> Vec<Affine<P>> {
        let mut prods = Vec::with_capacity(points.len());
        let mut acc = P::Base::one();
        for p in points {
            prods.push(acc);
            if !p.is_identity() {
                acc = acc * p.z;
            }
        }
        let mut inv = match acc.invert() {
            Some(i) => i,
            // acc is a product of nonzero z values, so this arm only fires
            // for an all-identity input where inv is never used
            None => P::Base::one(),
        };
        let mut out = vec![Affine::identity(); points.len()];
        for i in (0..points.len()).rev() {
            if points[i].is_identity() {
                continue;
            }
            let zinv = prods[i] * inv;
            inv = inv * points[i].z;
            out[i] = Affine {
                x: points[i].x * zinv,
                y: points[i].y * zinv,
                infinity: false,
            };
        }
        out
    }

    /// Plain double-and-add. The bit pattern of the scalar is observable
    /// through timing, so this is only for scalars that are public anyway.
    pub fn mul_vartime(&self, k: &Scalar) -> BlsResult<Self> {
        check_scalar(k)?;
        let limbs = k.to_canonical();
        let mut acc = Self::identity();
        for i in (0..256).rev() {
            acc = acc.double();
            if arith::bit(&limbs, i) {
                acc = acc.add(self);
            }
        }
        Ok(acc)
    }

    /// Double-and-add-always: a decoy accumulator absorbs the additions for
    /// zero bits so every iteration performs the same group operations.
    ///
    /// This reduces simple timing and branch leakage; it is NOT a verified
    /// constant-time ladder. Deployments that sign with long-lived secret
    /// scalars under adversarial timing observation need a stronger
    /// guarantee than this crate provides.
    pub fn mul_masked(&self, k: &Scalar) -> BlsResult<Self> {
        check_scalar(k)?;
        let limbs = k.to_canonical();
        let mut real = Self::identity();
        let mut decoy = Self::identity();
        let mut base = *self;
        for i in 0..256 {
            if arith::bit(&limbs, i) {
                real = real.add(&base);
            } else {
                decoy = decoy.add(&base);
            }
            base = base.double();
        }
        Ok(real)
    }

    /// Multiplication by a small public constant (cofactor clearing and
    /// endomorphism checks walk the 64-bit curve parameter).
    pub(crate) fn mul_u64(&self, k: u64) -> Self {
        let mut acc = Self::identity();
        for i in (0..64).rev() {
            acc = acc.double();
            if (k >> i) & 1 == 1 {
                acc = acc.add(self);
            }
        }
        acc
    }
}

impl<P: CurveParams> PartialEq for Projective<P> {
    fn eq(&self, other: &Self) -> bool {
        // cross-multiplied comparison; raw coordinates are only equal up to
        // a shared projective factor
        let self_id = self.is_identity();
        let other_id = other.is_identity();
        if self_id || other_id {
            return self_id && other_id;
        }
        self.x * other.z == other.x * self.z && self.y * other.z == other.y * self.z
    }
}

impl<P: CurveParams> Eq for Projective<P> {}

impl<P: CurveParams> From<Affine<P>> for Projective<P> {
    fn from(p: Affine<P>) -> Self {
        if p.infinity {
            Self::identity()
        } else {
            Projective {
                x: p.x,
                y: p.y,
                z: P::Base::one(),
            }
        }
    }
}

impl<P: CurveParams> Affine<P> {
    pub fn identity() -> Self {
        Affine {
            x: P::Base::zero(),
            y: P::Base::one(),
            infinity: true,
        }
    }

    pub fn is_identity(&self) -> bool {
        self.infinity
    }

    /// Whether the coordinates satisfy y^2 = x^3 + b.
    pub fn is_on_curve(&self) -> bool {
        self.infinity || self.y.square() == self.x.square() * self.x + P::coeff_b()
    }

    pub fn neg(&self) -> Self {
        Affine {
            x: self.x,
            y: -self.y,
            infinity: self.infinity,
        }
    }
}

impl<P: CurveParams> PartialEq for Affine<P> {
    fn eq(&self, other: &Self) -> bool {
        if self.infinity || other.infinity {
            return self.infinity && other.infinity;
        }
        self.x == other.x && self.y == other.y
    }
}

impl<P: CurveParams> Eq for Affine<P> {}

/// Every scalar-multiplication entry point insists on a scalar in the open
/// interval (0, r); the type already guarantees the upper bound.
fn check_scalar(k: &Scalar) -> BlsResult<()> {
    if k.is_zero() {
        return Err(BlsError::InvalidScalar);
    }
    Ok(())
}

/// A fixed-base window table: per-window multiples of one base point,
/// built once and reused for every multiplication by that base. The
/// generator tables are the important instances, since the generator is
/// multiplied on every signing and key-derivation call.
#[derive(Clone, Debug)]
pub struct WindowTable<P: CurveParams> {
    window: usize,
    rows: Vec<Vec<Projective<P>>>,
}

impl<P: CurveParams> WindowTable<P> {
    /// Default window width; 256/4 rows of 15 points trade table size
    /// against one addition per window.
    pub const DEFAULT_WINDOW: usize = 4;

    pub fn new(base: &Projective<P>, window: usize) -> Self {
        let window = window.clamp(1, 8);
        let windows = (256 + window - 1) / window;
        let mut rows = Vec::with_capacity(windows);
        let mut cur = *base;
        for _ in 0..windows {
            let mut row = Vec::with_capacity((1 << window) - 1);
            let mut acc = cur;
            for _ in 0..(1 << window) - 1 {
                row.push(acc);
                acc = acc.add(&cur);
            }
            rows.push(row);
            // acc has reached 2^window * cur, the next row's unit
            cur = acc;
        }
        WindowTable { window, rows }
    }

    pub fn mul(&self, k: &Scalar) -> BlsResult<Projective<P>> {
        check_scalar(k)?;
        let limbs = k.to_canonical();
        let mut acc = Projective::identity();
        for (w, row) in self.rows.iter().enumerate() {
            let mut digit = 0usize;
            for b in 0..self.window {
                let idx = w * self.window + b;
                if idx < 256 && arith::bit(&limbs, idx) {
                    digit |= 1 << b;
                }
            }
            if digit != 0 {
                acc = acc.add(&row[digit - 1]);
            }
        }
        Ok(acc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::Fp;
    use rand::SeedableRng;
    use rand_xorshift::XorShiftRng;

    fn rng() -> XorShiftRng {
        XorShiftRng::seed_from_u64(0x9999_0001)
    }

    #[test]
    fn group_axioms_g1() {
        let mut rng = rng();
        let g = G1Projective::generator();
        assert_eq!(g.add(&G1Projective::identity()), g);
        assert_eq!(g.add(&g.neg()), G1Projective::identity());
        assert_eq!(g.double(), g.add(&g));
        let a = g.mul_vartime(&Scalar::random(&mut rng)).unwrap();
        let b = g.mul_vartime(&Scalar::random(&mut rng)).unwrap();
        let c = g.mul_vartime(&Scalar::random(&mut rng)).unwrap();
        assert_eq!(a.add(&b), b.add(&a));
        assert_eq!(a.add(&b).add(&c), a.add(&b.add(&c)));
    }

    #[test]
    fn group_axioms_g2() {
        let mut rng = rng();
        let g = G2Projective::generator();
        assert_eq!(g.add(&G2Projective::identity()), g);
        assert_eq!(g.add(&g.neg()), G2Projective::identity());
        assert_eq!(g.double(), g.add(&g));
        let a = g.mul_vartime(&Scalar::random(&mut rng)).unwrap();
        let b = g.mul_vartime(&Scalar::random(&mut rng)).unwrap();
        assert_eq!(a.add(&b), b.add(&a));
    }

    #[test]
    fn scalar_multiplication_strategies_agree() {
        let mut rng = rng();
        let g1 = G1Projective::generator();
        let g2 = G2Projective::generator();
        let table1 = WindowTable::new(&g1, WindowTable::<G1Params>::DEFAULT_WINDOW);
        let table2 = WindowTable::new(&g2, 5);
        for _ in 0..10 {
            let k = Scalar::random(&mut rng);
            let plain = g1.mul_vartime(&k).unwrap();
            assert_eq!(plain, g1.mul_masked(&k).unwrap());
            assert_eq!(plain, table1.mul(&k).unwrap());
            let plain2 = g2.mul_vartime(&k).unwrap();
            assert_eq!(plain2, g2.mul_masked(&k).unwrap());
            assert_eq!(plain2, table2.mul(&k).unwrap());
        }
    }

    #[test]
    fn zero_scalar_is_rejected_everywhere() {
        let g = G1Projective::generator();
        let zero = Scalar::zero();
        assert!(matches!(
            g.mul_vartime(&zero),
            Err(BlsError::InvalidScalar)
        ));
        assert!(matches!(g.mul_masked(&zero), Err(BlsError::InvalidScalar)));
        let table = WindowTable::new(&g, 4);
        assert!(matches!(table.mul(&zero), Err(BlsError::InvalidScalar)));
    }

    #[test]
    fn small_multiples_by_repeated_addition() {
        let g = G1Projective::generator();
        let mut acc = G1Projective::identity();
        for i in 1u64..=17 {
            acc = acc.add(&g);
            assert_eq!(acc, g.mul_vartime(&Scalar::from_u64(i)).unwrap());
        }
    }

    #[test]
    fn batch_normalize_matches_individual_conversion() {
        let mut rng = rng();
        let g = G1Projective::generator();
        let mut points = vec![G1Projective::identity()];
        for _ in 0..8 {
            points.push(g.mul_vartime(&Scalar::random(&mut rng)).unwrap());
        }
        points.push(G1Projective::identity());
        let batch = G1Projective::batch_normalize(&points);
        for (p, a) in points.iter().zip(&batch) {
            assert_eq!(p.to_affine(), *a);
        }
    }

    #[test]
    fn projective_equality_ignores_scaling() {
        let g = G1Projective::generator();
        let two = Fp::from_u64(2);
        let scaled = G1Projective {
            x: g.x * two,
            y: g.y * two,
            z: g.z * two,
        };
        assert_eq!(g, scaled);
        assert_ne!(g, g.double());
    }
}
