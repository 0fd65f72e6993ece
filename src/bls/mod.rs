//! BLS signatures: minimal-pubkey-size variant (public keys on G1,
//! signatures on G2), plus the byte-level surface the surrounding
//! identity layer consumes.

mod secret;
pub use secret::PrivateKey;

mod public;
pub use public::PublicKey;

mod signature;
pub use signature::Signature;

use crate::curve::G2Projective;
use crate::hash_to_curve::HashToCurve;
use crate::BlsResult;

/// Derives the compressed public key for a 32-byte secret key.
pub fn get_public_key(secret_key: &[u8]) -> BlsResult<[u8; 48]> {
    let sk = PrivateKey::from_bytes(secret_key)?;
    Ok(sk.to_public().to_compressed())
}

/// Signs a message with a 32-byte secret key, returning the compressed
/// signature.
pub fn sign<H: HashToCurve<Output = G2Projective>>(
    message: &[u8],
    secret_key: &[u8],
    hash_to_g2: &H,
) -> BlsResult<[u8; 96]> {
    let sk = PrivateKey::from_bytes(secret_key)?;
    Ok(sk.sign(message, hash_to_g2)?.to_compressed())
}

/// Verifies a compressed signature over a message under a compressed
/// public key. Malformed or invalid encodings are errors; a well-formed
/// but wrong signature is `Ok(false)`.
pub fn verify<H: HashToCurve<Output = G2Projective>>(
    signature: &[u8],
    message: &[u8],
    public_key: &[u8],
    hash_to_g2: &H,
) -> BlsResult<bool> {
    let sig = Signature::from_compressed(signature)?;
    let pk = PublicKey::from_compressed(public_key)?;
    pk.verify(message, &sig, hash_to_g2)
}

/// Aggregates compressed public keys into one compressed key.
pub fn aggregate_public_keys(public_keys: &[impl AsRef<[u8]>]) -> BlsResult<[u8; 48]> {
    let keys = public_keys
        .iter()
        .map(|pk| PublicKey::from_compressed(pk.as_ref()))
        .collect::<BlsResult<Vec<_>>>()?;
    Ok(PublicKey::aggregate(&keys)?.to_compressed())
}

/// Aggregates compressed signatures into one compressed signature.
pub fn aggregate_signatures(signatures: &[impl AsRef<[u8]>]) -> BlsResult<[u8; 96]> {
    let sigs = signatures
        .iter()
        .map(|sig| Signature::from_compressed(sig.as_ref()))
        .collect::<BlsResult<Vec<_>>>()?;
    Ok(Signature::aggregate(&sigs)?.to_compressed())
}

/// Verifies one aggregate signature against many (message, public key)
/// pairs; see [`Signature::batch_verify`].
pub fn verify_batch<H: HashToCurve<Output = G2Projective>>(
    signature: &[u8],
    messages: &[&[u8]],
    public_keys: &[impl AsRef<[u8]>],
    hash_to_g2: &H,
) -> BlsResult<bool> {
    let sig = Signature::from_compressed(signature)?;
    let keys = public_keys
        .iter()
        .map(|pk| PublicKey::from_compressed(pk.as_ref()))
        .collect::<BlsResult<Vec<_>>>()?;
    sig.batch_verify(&keys, messages, hash_to_g2)
}
