//! Public keys: G1 points, serialized compressed.

use crate::bls::{PrivateKey, Signature};
use crate::curve::{G1Affine, G1Projective, G2Projective};
use crate::hash_to_curve::HashToCurve;
use crate::pairing::pairing;
use crate::BlsResult;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PublicKey(G1Projective);

impl From<G1Projective> for PublicKey {
    fn from(pk: G1Projective) -> PublicKey {
        PublicKey(pk)
    }
}

impl From<&PrivateKey> for PublicKey {
    fn from(sk: &PrivateKey) -> PublicKey {
        sk.to_public()
    }
}

impl AsRef<G1Projective> for PublicKey {
    fn as_ref(&self) -> &G1Projective {
        &self.0
    }
}

impl PublicKey {
    /// Sums the provided public keys into an aggregate key. At least one
    /// key is required.
    pub fn aggregate(public_keys: &[PublicKey]) -> BlsResult<PublicKey> {
        if public_keys.is_empty() {
            return Err(crate::BlsError::EmptyInput);
        }
        let mut apk = G1Projective::identity();
        for pk in public_keys {
            apk = apk.add(pk.as_ref());
        }
        Ok(PublicKey(apk))
    }

    /// Checks a signature over a message: with H the hasher and G the G1
    /// generator, verifies e(-pk, H(m)) * e(G, sig) == 1 using a single
    /// shared final exponentiation.
    ///
    /// Well-formed but cryptographically wrong inputs yield `Ok(false)`,
    /// never an error.
    pub fn verify<H: HashToCurve<Output = G2Projective>>(
        &self,
        message: &[u8],
        signature: &Signature,
        hash_to_g2: &H,
    ) -> BlsResult<bool> {
        let hm = hash_to_g2.hash(message)?;
        Ok(self.verify_hashed(&hm, signature))
    }

    /// The pairing check against an already hashed message point.
    pub fn verify_hashed(&self, message_point: &G2Projective, signature: &Signature) -> bool {
        // identity operands make the pairing product degenerate; they can
        // only arise from hostile inputs, so fail closed
        if self.0.is_identity() || signature.as_ref().is_identity() || message_point.is_identity()
        {
            return false;
        }
        let lhs = match pairing(&self.0.neg(), message_point, false) {
            Ok(f) => f,
            Err(_) => return false,
        };
        let rhs = match pairing(&G1Projective::generator(), signature.as_ref(), false) {
            Ok(f) => f,
            Err(_) => return false,
        };
        match (lhs * rhs).final_exponentiate() {
            Some(f) => f.is_one(),
            None => false,
        }
    }

    pub fn to_compressed(&self) -> [u8; 48] {
        self.0.to_affine().to_compressed()
    }

    pub fn to_uncompressed(&self) -> [u8; 96] {
        self.0.to_affine().to_uncompressed()
    }

    /// Decodes a compressed key, enforcing the curve and subgroup checks.
    pub fn from_compressed(bytes: &[u8]) -> BlsResult<PublicKey> {
        Ok(PublicKey(G1Projective::from(G1Affine::from_compressed(
            bytes,
        )?)))
    }

    pub fn from_uncompressed(bytes: &[u8]) -> BlsResult<PublicKey> {
        Ok(PublicKey(G1Projective::from(G1Affine::from_uncompressed(
            bytes,
        )?)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash_to_curve::SIG_HASH_TO_G2;
    use rand::SeedableRng;
    use rand_xorshift::XorShiftRng;

    fn rng() -> XorShiftRng {
        XorShiftRng::seed_from_u64(0x4242_5151)
    }

    #[test]
    fn serialization_round_trip() {
        let mut rng = rng();
        for _ in 0..5 {
            let pk = PrivateKey::generate(&mut rng).to_public();
            assert_eq!(
                PublicKey::from_compressed(&pk.to_compressed()).unwrap(),
                pk
            );
            assert_eq!(
                PublicKey::from_uncompressed(&pk.to_uncompressed()).unwrap(),
                pk
            );
        }
    }

    #[test]
    fn derived_key_golden_vector() {
        // sk = 1 derives the generator itself
        let mut sk_bytes = [0u8; 32];
        sk_bytes[31] = 1;
        let sk = PrivateKey::from_bytes(&sk_bytes).unwrap();
        assert_eq!(
            hex::encode(sk.to_public().to_compressed()),
            "97f1d3a73197d7942695638c4fa9ac0fc3688c4f9774b905a14e3a3f171bac586c55e83ff97a1aeffb3af00adb22c6bb"
        );
    }

    #[test]
    fn aggregate_requires_input() {
        assert!(PublicKey::aggregate(&[]).is_err());
    }

    #[test]
    fn verify_is_false_for_identity_operands() {
        let mut rng = rng();
        let sk = PrivateKey::generate(&mut rng);
        let sig = sk.sign(b"msg", &*SIG_HASH_TO_G2).unwrap();
        let id_pk = PublicKey::from(G1Projective::identity());
        assert_eq!(
            id_pk.verify(b"msg", &sig, &*SIG_HASH_TO_G2).unwrap(),
            false
        );
    }
}
