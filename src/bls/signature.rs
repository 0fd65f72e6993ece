//! Signatures: G2 points, serialized compressed, with aggregation and
//! batch verification.

use crate::bls::PublicKey;
use crate::curve::{G1Projective, G2Affine, G2Projective};
use crate::fields::Fp12;
use crate::hash_to_curve::HashToCurve;
use crate::pairing::pairing;
use crate::{BlsError, BlsResult};
use log::trace;
use std::collections::HashMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Signature(G2Projective);

impl From<G2Projective> for Signature {
    fn from(sig: G2Projective) -> Signature {
        Signature(sig)
    }
}

impl AsRef<G2Projective> for Signature {
    fn as_ref(&self) -> &G2Projective {
        &self.0
    }
}

impl Signature {
    /// Sums the provided signatures into an aggregate signature. At least
    /// one signature is required.
    pub fn aggregate(signatures: &[Signature]) -> BlsResult<Signature> {
        if signatures.is_empty() {
            return Err(BlsError::EmptyInput);
        }
        let mut asig = G2Projective::identity();
        for sig in signatures {
            asig = asig.add(sig.as_ref());
        }
        Ok(Signature(asig))
    }

    /// Verifies this (aggregate) signature against pubkey and message
    /// pairs.
    ///
    /// Public keys signing the same message are grouped and summed so each
    /// distinct message is hashed and paired exactly once; together with
    /// the single pairing against the negated generator and one shared
    /// final exponentiation, N verifications collapse into one
    /// exponentiation.
    ///
    /// Usage errors (mismatched or empty inputs) surface as errors; this
    /// is the one boundary that converts internal algebraic failures into
    /// `Ok(false)` so the aggregate API stays total over structurally
    /// valid inputs.
    pub fn batch_verify<H: HashToCurve<Output = G2Projective>>(
        &self,
        public_keys: &[PublicKey],
        messages: &[&[u8]],
        hash_to_g2: &H,
    ) -> BlsResult<bool> {
        if public_keys.len() != messages.len() {
            return Err(BlsError::MismatchedLengths(
                public_keys.len(),
                messages.len(),
            ));
        }
        if public_keys.is_empty() {
            return Err(BlsError::EmptyInput);
        }
        Ok(self
            .batch_verify_inner(public_keys, messages, hash_to_g2)
            .unwrap_or(false))
    }

    fn batch_verify_inner<H: HashToCurve<Output = G2Projective>>(
        &self,
        public_keys: &[PublicKey],
        messages: &[&[u8]],
        hash_to_g2: &H,
    ) -> BlsResult<bool> {
        // group keys by identical message so each distinct message costs
        // one hash and one pairing
        let mut groups: HashMap<&[u8], G1Projective> = HashMap::new();
        for (pk, msg) in public_keys.iter().zip(messages) {
            let entry = groups
                .entry(*msg)
                .or_insert_with(G1Projective::identity);
            *entry = entry.add(pk.as_ref());
        }
        trace!(
            "batch verification of {} pairs in {} message groups",
            public_keys.len(),
            groups.len()
        );
        let mut acc = pairing(&G1Projective::generator().neg(), &self.0, false)?;
        for (msg, apk) in groups {
            let hm = hash_to_g2.hash(msg)?;
            acc = acc * pairing(&apk, &hm, false)?;
        }
        match acc.final_exponentiate() {
            Some(f) => Ok(f == Fp12::one()),
            None => Ok(false),
        }
    }

    pub fn to_compressed(&self) -> [u8; 96] {
        self.0.to_affine().to_compressed()
    }

    pub fn to_uncompressed(&self) -> [u8; 192] {
        self.0.to_affine().to_uncompressed()
    }

    /// Decodes a compressed signature, enforcing the curve and subgroup
    /// checks.
    pub fn from_compressed(bytes: &[u8]) -> BlsResult<Signature> {
        Ok(Signature(G2Projective::from(G2Affine::from_compressed(
            bytes,
        )?)))
    }

    pub fn from_uncompressed(bytes: &[u8]) -> BlsResult<Signature> {
        Ok(Signature(G2Projective::from(G2Affine::from_uncompressed(
            bytes,
        )?)))
    }
}
