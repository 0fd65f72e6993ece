//! The 381-bit base field of BLS12-381.
//!
//! Elements are kept in Montgomery form internally; every public operation
//! returns a fully reduced value, so two equal residues always compare equal
//! limb for limb.

use crate::arith::{self, adc, mac};
use core::cmp::Ordering;
use core::fmt;
use core::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};
use once_cell::sync::Lazy;

/// p = 0x1a0111ea397fe69a4b1ba7b6434bacd764774b84f38512bf6730d2a0f6b0f624
///     1eabfffeb153ffffb9feffffffffaaab
pub(crate) const MODULUS: [u64; 6] = [
    0xb9fe_ffff_ffff_aaab,
    0x1eab_fffe_b153_ffff,
    0x6730_d2a0_f6b0_f624,
    0x6477_4b84_f385_12bf,
    0x4b1b_a7b6_434b_acd7,
    0x1a01_11ea_397f_e69a,
];

/// -(p^-1) mod 2^64
const INV: u64 = 0x89f3_fffc_fffc_fffd;

/// R = 2^384 mod p
const R: [u64; 6] = [
    0x7609_0000_0002_fffd,
    0xebf4_000b_c40c_0002,
    0x5f48_9857_53c7_58ba,
    0x77ce_5853_7052_5745,
    0x5c07_1a97_a256_ec6d,
    0x15f6_5ec3_fa80_e493,
];

/// R^2 = 2^768 mod p
const R2: [u64; 6] = [
    0xf4df_1f34_1c34_1746,
    0x0a76_e6a6_09d1_04f1,
    0x8de5_476c_4c95_b6d5,
    0x67eb_88a9_939d_83c0,
    0x9a79_3e85_b519_952d,
    0x1198_8fe5_92ca_e3aa,
];

/// (p + 1) / 4, the square-root exponent (p = 3 mod 4).
static SQRT_EXP: Lazy<[u64; 6]> = Lazy::new(|| {
    let (t, carry) = arith::add(&MODULUS, &[1, 0, 0, 0, 0, 0]);
    arith::shr1(&arith::shr1(&t, carry), 0)
});

/// (p - 1) / 2, used for Legendre-style sign decisions.
pub(crate) static P_MINUS_1_DIV_2: Lazy<[u64; 6]> = Lazy::new(|| modulus_minus_one_div(2));

/// (p - 1) / k for exponent derivation; k must divide p - 1 exactly.
pub(crate) fn modulus_minus_one_div(k: u64) -> [u64; 6] {
    let (t, _) = arith::sub(&MODULUS, &[1, 0, 0, 0, 0, 0]);
    arith::div_small(&t, k)
}

/// An element of the base field.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Fp([u64; 6]);

impl fmt::Debug for Fp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fp(0x{})", hex::encode(self.to_bytes()))
    }
}

impl Default for Fp {
    fn default() -> Self {
        Fp::zero()
    }
}

impl Fp {
    pub const fn zero() -> Fp {
        Fp([0; 6])
    }

    pub const fn one() -> Fp {
        Fp(R)
    }

    pub fn is_zero(&self) -> bool {
        arith::is_zero(&self.0)
    }

    pub fn from_u64(v: u64) -> Fp {
        Fp::from_canonical([v, 0, 0, 0, 0, 0])
    }

    /// Montgomery form of a canonical (already reduced) residue.
    pub(crate) fn from_canonical(limbs: [u64; 6]) -> Fp {
        Fp(limbs) * Fp(R2)
    }

    /// Canonical residue of this element.
    pub(crate) fn to_canonical(&self) -> [u64; 6] {
        let mut t = [0u64; 12];
        t[..6].copy_from_slice(&self.0);
        montgomery_reduce(&mut t)
    }

    /// Parses 48 big-endian bytes; `None` if the value is not below p.
    pub fn from_bytes(bytes: &[u8; 48]) -> Option<Fp> {
        let mut limbs = [0u64; 6];
        for i in 0..6 {
            let mut chunk = [0u8; 8];
            chunk.copy_from_slice(&bytes[i * 8..(i + 1) * 8]);
            limbs[5 - i] = u64::from_be_bytes(chunk);
        }
        if arith::cmp(&limbs, &MODULUS) != Ordering::Less {
            return None;
        }
        Some(Fp::from_canonical(limbs))
    }

    /// 48 big-endian bytes of the canonical residue.
    pub fn to_bytes(&self) -> [u8; 48] {
        let limbs = self.to_canonical();
        let mut out = [0u8; 48];
        for i in 0..6 {
            out[i * 8..(i + 1) * 8].copy_from_slice(&limbs[5 - i].to_be_bytes());
        }
        out
    }

    pub fn square(&self) -> Fp {
        *self * *self
    }

    pub fn double(&self) -> Fp {
        *self + *self
    }

    /// Exponentiation by a little-endian limb exponent. Runs in time
    /// dependent on the exponent, which is fine for the fixed public
    /// exponents it is used with.
    pub fn pow_vartime(&self, exp: &[u64]) -> Fp {
        let mut res = Fp::one();
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

    /// Multiplicative inverse by the binary extended Euclidean algorithm
    /// over canonical residues; `None` for zero.
    pub fn invert(&self) -> Option<Fp> {
        if self.is_zero() {
            return None;
        }
        let mut u = self.to_canonical();
        let mut v = MODULUS;
        let mut b = [1u64, 0, 0, 0, 0, 0];
        let mut c = [0u64; 6];
        while !arith::is_one(&u) && !arith::is_one(&v) {
            while arith::is_even(&u) {
                u = arith::shr1(&u, 0);
                b = half_mod(&b);
            }
            while arith::is_even(&v) {
                v = arith::shr1(&v, 0);
                c = half_mod(&c);
            }
            if arith::cmp(&u, &v) != Ordering::Less {
                let (diff, _) = arith::sub(&u, &v);
                u = diff;
                b = sub_mod(&b, &c);
            } else {
                let (diff, _) = arith::sub(&v, &u);
                v = diff;
                c = sub_mod(&c, &b);
            }
        }
        let inv = if arith::is_one(&u) { b } else { c };
        Some(Fp::from_canonical(inv))
    }

    /// Square root via the fixed exponent (p + 1) / 4, checked by squaring.
    /// `None` when the input is a quadratic non-residue.
    pub fn sqrt(&self) -> Option<Fp> {
        let candidate = self.pow_vartime(&*SQRT_EXP);
        if candidate.square() == *self {
            Some(candidate)
        } else {
            None
        }
    }

    /// Parity of the canonical residue.
    pub fn is_odd(&self) -> bool {
        self.to_canonical()[0] & 1 == 1
    }

    /// True when the canonical residue exceeds (p - 1) / 2, i.e. the element
    /// is the larger of {y, -y}.
    pub fn lexicographically_largest(&self) -> bool {
        arith::cmp(&self.to_canonical(), &*P_MINUS_1_DIV_2) == Ordering::Greater
    }

    #[cfg(test)]
    pub(crate) fn random<R: rand::RngCore>(rng: &mut R) -> Fp {
        loop {
            let mut bytes = [0u8; 48];
            rng.fill_bytes(&mut bytes);
            // clear the top bits so most draws are already below p
            bytes[0] &= 0x1f;
            if let Some(v) = Fp::from_bytes(&bytes) {
                return v;
            }
        }
    }
}

/// Halves a residue mod p: even values shift, odd values add p first.
fn half_mod(a: &[u64; 6]) -> [u64; 6] {
    if arith::is_even(a) {
        arith::shr1(a, 0)
    } else {
        let (t, carry) = arith::add(a, &MODULUS);
        arith::shr1(&t, carry)
    }
}

/// a - b mod p over canonical residues.
fn sub_mod(a: &[u64; 6], b: &[u64; 6]) -> [u64; 6] {
    let (diff, borrow) = arith::sub(a, b);
    if borrow == 0 {
        diff
    } else {
        let (fixed, _) = arith::add(&diff, &MODULUS);
        fixed
    }
}

/// Reduces a value below 2p into the canonical range.
#[inline]
fn reduce_once(limbs: [u64; 6], carry: u64) -> [u64; 6] {
    if carry != 0 || arith::cmp(&limbs, &MODULUS) != Ordering::Less {
        let (diff, _) = arith::sub(&limbs, &MODULUS);
        diff
    } else {
        limbs
    }
}

/// Montgomery reduction of a 768-bit product; the result lands in the upper
/// six limbs of `t`.
fn montgomery_reduce(t: &mut [u64; 12]) -> [u64; 6] {
    let mut carry2 = 0u64;
    for i in 0..6 {
        let k = t[i].wrapping_mul(INV);
        let mut carry = 0u64;
        for j in 0..6 {
            let (lo, c) = mac(t[i + j], k, MODULUS[j], carry);
            t[i + j] = lo;
            carry = c;
        }
        let (lo, c) = adc(t[i + 6], carry2, carry);
        t[i + 6] = lo;
        carry2 = c;
    }
    let mut r = [0u64; 6];
    r.copy_from_slice(&t[6..12]);
    reduce_once(r, carry2)
}

impl Add for Fp {
    type Output = Fp;

    fn add(self, rhs: Fp) -> Fp {
        // both operands are below p < 2^381, so the sum cannot overflow
        let (sum, _) = arith::add(&self.0, &rhs.0);
        Fp(reduce_once(sum, 0))
    }
}

impl Sub for Fp {
    type Output = Fp;

    fn sub(self, rhs: Fp) -> Fp {
        Fp(sub_mod(&self.0, &rhs.0))
    }
}

impl Neg for Fp {
    type Output = Fp;

    fn neg(self) -> Fp {
        if self.is_zero() {
            self
        } else {
            let (diff, _) = arith::sub(&MODULUS, &self.0);
            Fp(diff)
        }
    }
}

impl Mul for Fp {
    type Output = Fp;

    fn mul(self, rhs: Fp) -> Fp {
        let mut t = [0u64; 12];
        for i in 0..6 {
            let mut carry = 0u64;
            for j in 0..6 {
                let (lo, c) = mac(t[i + j], self.0[i], rhs.0[j], carry);
                t[i + j] = lo;
                carry = c;
            }
            t[i + 6] = carry;
        }
        Fp(montgomery_reduce(&mut t))
    }
}

impl AddAssign for Fp {
    fn add_assign(&mut self, rhs: Fp) {
        *self = *self + rhs;
    }
}

impl SubAssign for Fp {
    fn sub_assign(&mut self, rhs: Fp) {
        *self = *self - rhs;
    }
}

impl MulAssign for Fp {
    fn mul_assign(&mut self, rhs: Fp) {
        *self = *self * rhs;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xorshift::XorShiftRng;

    fn rng() -> XorShiftRng {
        XorShiftRng::seed_from_u64(0x5a5a_1234)
    }

    #[test]
    fn identities() {
        assert_eq!(Fp::one() * Fp::one(), Fp::one());
        assert_eq!(Fp::from_u64(0), Fp::zero());
        assert!((Fp::one() - Fp::one()).is_zero());
        let mut one_bytes = [0u8; 48];
        one_bytes[47] = 1;
        assert_eq!(Fp::one().to_bytes(), one_bytes);
    }

    #[test]
    fn field_axioms() {
        let mut rng = rng();
        for _ in 0..50 {
            let a = Fp::random(&mut rng);
            let b = Fp::random(&mut rng);
            let c = Fp::random(&mut rng);
            assert_eq!(a + b, b + a);
            assert_eq!(a * b, b * a);
            assert_eq!((a + b) + c, a + (b + c));
            assert_eq!((a * b) * c, a * (b * c));
            assert_eq!(a * (b + c), a * b + a * c);
            assert_eq!(a - a, Fp::zero());
            assert_eq!(a + (-a), Fp::zero());
        }
    }

    #[test]
    fn inversion() {
        let mut rng = rng();
        assert!(Fp::zero().invert().is_none());
        for _ in 0..25 {
            let a = Fp::random(&mut rng);
            if a.is_zero() {
                continue;
            }
            let inv = a.invert().unwrap();
            assert_eq!(a * inv, Fp::one());
        }
    }

    #[test]
    fn sqrt_of_squares() {
        let mut rng = rng();
        for _ in 0..25 {
            let a = Fp::random(&mut rng);
            let sq = a.square();
            let root = sq.sqrt().unwrap();
            assert!(root == a || root == -a);
        }
        // 4 = 2^2 always has a root; small smoke value
        let two = Fp::from_u64(2);
        let r = Fp::from_u64(4).sqrt().unwrap();
        assert!(r == two || r == -two);
    }

    #[test]
    fn byte_round_trip() {
        let mut rng = rng();
        for _ in 0..25 {
            let a = Fp::random(&mut rng);
            assert_eq!(Fp::from_bytes(&a.to_bytes()).unwrap(), a);
        }
        // the modulus itself must be rejected
        let mut p_bytes = [0u8; 48];
        for i in 0..6 {
            p_bytes[i * 8..(i + 1) * 8].copy_from_slice(&MODULUS[5 - i].to_be_bytes());
        }
        assert!(Fp::from_bytes(&p_bytes).is_none());
    }

    #[test]
    fn pow_matches_repeated_multiplication() {
        let a = Fp::from_u64(7);
        let mut expect = Fp::one();
        for _ in 0..13 {
            expect *= a;
        }
        assert_eq!(a.pow_vartime(&[13]), expect);
    }

    #[test]
    fn largest_flag_flips_under_negation() {
        let mut rng = rng();
        for _ in 0..25 {
            let a = Fp::random(&mut rng);
            if a.is_zero() {
                continue;
            }
            assert_ne!(
                a.lexicographically_largest(),
                (-a).lexicographically_largest()
            );
        }
    }
}
