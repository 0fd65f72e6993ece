//! Private keys: scalars in the open interval (0, r).

use crate::bls::{PublicKey, Signature};
use crate::curve::{G1Projective, G2Projective};
use crate::fields::Scalar;
use crate::hash_to_curve::HashToCurve;
use crate::{BlsError, BlsResult};
use rand::Rng;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrivateKey {
    sk: Scalar,
}

impl PrivateKey {
    /// Samples a uniform nonzero scalar.
    pub fn generate<R: Rng>(rng: &mut R) -> PrivateKey {
        PrivateKey {
            sk: Scalar::random(rng),
        }
    }

    pub fn from_scalar(sk: &Scalar) -> BlsResult<PrivateKey> {
        if sk.is_zero() {
            return Err(BlsError::InvalidPrivateKey);
        }
        Ok(PrivateKey { sk: *sk })
    }

    /// Parses 32 big-endian bytes; zero, values at or above the group
    /// order, and wrong lengths are all rejected.
    pub fn from_bytes(bytes: &[u8]) -> BlsResult<PrivateKey> {
        if bytes.len() != 32 {
            return Err(BlsError::InvalidLength {
                expected: 32,
                actual: bytes.len(),
            });
        }
        let mut buf = [0u8; 32];
        buf.copy_from_slice(bytes);
        let sk = Scalar::from_bytes(&buf).ok_or(BlsError::InvalidPrivateKey)?;
        PrivateKey::from_scalar(&sk)
    }

    pub fn to_bytes(&self) -> [u8; 32] {
        self.sk.to_bytes()
    }

    pub fn as_scalar(&self) -> &Scalar {
        &self.sk
    }

    /// Signs a message: hash to G2, multiply by the secret scalar.
    pub fn sign<H: HashToCurve<Output = G2Projective>>(
        &self,
        message: &[u8],
        hash_to_g2: &H,
    ) -> BlsResult<Signature> {
        let hm = hash_to_g2.hash(message)?;
        self.sign_hashed(&hm)
    }

    /// Signs an already hashed point, for callers composing their own
    /// hashing. The multiplication runs with the decoy-accumulator
    /// strategy since the scalar is secret.
    pub fn sign_hashed(&self, point: &G2Projective) -> BlsResult<Signature> {
        Ok(Signature::from(point.mul_masked(&self.sk)?))
    }

    /// Derives the public key from the shared generator window table.
    pub fn to_public(&self) -> PublicKey {
        // the key scalar is nonzero by construction, so the table multiply
        // cannot fail
        let point = G1Projective::generator_table()
            .mul(&self.sk)
            .unwrap_or_else(|_| G1Projective::identity());
        PublicKey::from(point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xorshift::XorShiftRng;

    fn rng() -> XorShiftRng {
        XorShiftRng::seed_from_u64(0x5ec2_e75a)
    }

    #[test]
    fn byte_round_trip() {
        let mut rng = rng();
        for _ in 0..10 {
            let sk = PrivateKey::generate(&mut rng);
            let bytes = sk.to_bytes();
            assert_eq!(PrivateKey::from_bytes(&bytes).unwrap(), sk);
        }
    }

    #[test]
    fn invalid_keys_are_rejected() {
        // zero
        assert!(matches!(
            PrivateKey::from_bytes(&[0u8; 32]),
            Err(BlsError::InvalidPrivateKey)
        ));
        // the group order (not below r)
        let r_bytes =
            hex::decode("73eda753299d7d483339d80809a1d80553bda402fffe5bfeffffffff00000001")
                .unwrap();
        assert!(matches!(
            PrivateKey::from_bytes(&r_bytes),
            Err(BlsError::InvalidPrivateKey)
        ));
        // wrong length
        assert!(matches!(
            PrivateKey::from_bytes(&[1u8; 31]),
            Err(BlsError::InvalidLength { .. })
        ));
    }

    #[test]
    fn public_key_matches_plain_generator_multiplication() {
        let mut rng = rng();
        for _ in 0..5 {
            let sk = PrivateKey::generate(&mut rng);
            let expect = G1Projective::generator()
                .mul_vartime(sk.as_scalar())
                .unwrap();
            assert_eq!(*sk.to_public().as_ref(), expect);
        }
    }
}
