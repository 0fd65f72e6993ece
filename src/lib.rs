//! # BLS signatures over BLS12-381
//!
//! This crate implements the full pairing stack for BLS signatures from
//! the field arithmetic up: the Fp/Fp2/Fp6/Fp12 tower, the scalar field,
//! projective group operations over G1 and G2, hashing to the curve, the
//! optimal-ate pairing, and the signature API layered on top.
//!
//! Public keys are compressed G1 points (48 bytes), signatures compressed
//! G2 points (96 bytes), both in the flag-bit convention where the top
//! three bits of the leading byte carry compression, infinity and Y-sign.
//!
//! Scalar multiplications with secret scalars use a decoy-accumulator
//! strategy that reduces, but does not eliminate, timing leakage; see
//! [`curve::Projective::mul_masked`] before relying on it.

/// Shared multi-limb arithmetic helpers
pub(crate) mod arith;

/// The field tower and the scalar field
pub mod fields;

/// Projective group operations over G1 and G2
pub mod curve;

/// Message hashing onto G2
pub mod hash_to_curve;

/// The Miller loop and final exponentiation
pub mod pairing;

/// Keys, signatures, aggregation and batch verification
pub(crate) mod bls;
pub use bls::{
    aggregate_public_keys, aggregate_signatures, get_public_key, sign, verify, verify_batch,
    PrivateKey, PublicKey, Signature,
};

pub use hash_to_curve::{HashToCurve, XmdSswu, SIG_DST, SIG_HASH_TO_G2};

use thiserror::Error;

/// Convenience result alias
pub type BlsResult<T> = std::result::Result<T, BlsError>;

/// Everything that can go wrong below the boolean verification results.
///
/// Encoding, validity and usage failures abort immediately; only a failed
/// verification of otherwise well-formed data comes back as `false`, and
/// only batch verification converts internal algebraic failures into
/// `false`.
#[derive(Debug, Error)]
pub enum BlsError {
    /// A byte string of the wrong size for its type
    #[error("invalid encoding length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
    /// Flag bits in a point encoding that contradict each other
    #[error("invalid flag bits in point encoding")]
    InvalidFlags,
    /// A field element encoding at or above the modulus
    #[error("field element encoding is not canonical")]
    NonCanonicalElement,
    /// Decoded coordinates that do not satisfy the curve equation
    #[error("point is not on the curve")]
    NotOnCurve,
    /// A curve point outside the prime-order subgroup
    #[error("point is not in the prime-order subgroup")]
    NotInSubgroup,
    /// A private key of zero, or at or above the group order
    #[error("private key must lie strictly between 0 and the group order")]
    InvalidPrivateKey,
    /// A zero scalar supplied to a multiplication entry point
    #[error("scalar must be nonzero and below the group order")]
    InvalidScalar,
    /// A domain separation tag outside 1..=255 bytes
    #[error("domain separation tag length {0} is out of range")]
    DomainTooLarge(usize),
    /// A message expansion beyond what the expander can label
    #[error("requested expansion of {0} bytes is too long")]
    ExpansionTooLong(usize),
    /// No square-root candidate applied inside the SWU map; indicates a
    /// parameter error, not a property of the message
    #[error("could not hash message to the curve")]
    HashToCurveError,
    /// An aggregate operation over an empty list
    #[error("empty input where at least one element is required")]
    EmptyInput,
    /// Batch inputs of different lengths
    #[error("mismatched input lengths: {0} keys, {1} messages")]
    MismatchedLengths(usize, usize),
    /// A pairing evaluated at the identity
    #[error("pairing with the point at infinity")]
    PairingAtInfinity,
    /// An IO error from writing length prefixes
    #[error("io error {0}")]
    IoError(#[from] std::io::Error),
}
