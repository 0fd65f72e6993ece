//! The BLS12-381 field tower and the scalar field.
//!
//! Fp is the 381-bit base field; Fp2, Fp6 and Fp12 stack on top of it as
//! i^2 = -1, v^3 = 1 + i and w^2 = v. The scalar field Fr is independent
//! and carries the group order.

mod fp;
mod fp2;
mod fp6;
mod fp12;
mod scalar;

pub use fp::Fp;
pub use fp2::Fp2;
pub use fp6::Fp6;
pub use fp12::Fp12;
pub use scalar::Scalar;

pub(crate) use fp::modulus_minus_one_div;

use core::fmt::Debug;
use core::ops::{Add, Mul, Neg, Sub};

/// The operations projective point arithmetic needs from a coordinate
/// field. Implemented by Fp (for G1) and Fp2 (for G2), letting the curve
/// formulas specialize at compile time.
pub trait Field:
    Copy
    + Clone
    + Debug
    + Default
    + PartialEq
    + Eq
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Neg<Output = Self>
{
    fn zero() -> Self;
    fn one() -> Self;
    fn is_zero(&self) -> bool;
    fn square(&self) -> Self;
    fn double(&self) -> Self;
    fn invert(&self) -> Option<Self>;
}

impl Field for Fp {
    fn zero() -> Self {
        Fp::zero()
    }

    fn one() -> Self {
        Fp::one()
    }

    fn is_zero(&self) -> bool {
        Fp::is_zero(self)
    }

    fn square(&self) -> Self {
        Fp::square(self)
    }

    fn double(&self) -> Self {
        Fp::double(self)
    }

    fn invert(&self) -> Option<Self> {
        Fp::invert(self)
    }
}

impl Field for Fp2 {
    fn zero() -> Self {
        Fp2::zero()
    }

    fn one() -> Self {
        Fp2::one()
    }

    fn is_zero(&self) -> bool {
        Fp2::is_zero(self)
    }

    fn square(&self) -> Self {
        Fp2::square(self)
    }

    fn double(&self) -> Self {
        Fp2::double(self)
    }

    fn invert(&self) -> Option<Self> {
        Fp2::invert(self)
    }
}
