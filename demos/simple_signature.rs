use bls_core::{PrivateKey, PublicKey, Signature, SIG_HASH_TO_G2};

fn main() {
    let rng = &mut rand::thread_rng();
    let hasher = &*SIG_HASH_TO_G2;
    let message = b"hello from bls-core";

    let sk1 = PrivateKey::generate(rng);
    let sk2 = PrivateKey::generate(rng);

    let sig1 = sk1.sign(&message[..], hasher).unwrap();
    let sig2 = sk2.sign(&message[..], hasher).unwrap();

    let pk1 = sk1.to_public();
    println!("public key:  {}", hex::encode(pk1.to_compressed()));
    println!("signature:   {}", hex::encode(sig1.to_compressed()));
    println!(
        "verified:    {}",
        pk1.verify(&message[..], &sig1, hasher).unwrap()
    );

    let apk = PublicKey::aggregate(&[pk1, sk2.to_public()]).unwrap();
    let asig = Signature::aggregate(&[sig1, sig2]).unwrap();
    println!(
        "aggregate:   {}",
        apk.verify(&message[..], &asig, hasher).unwrap()
    );
}
