use criterion::{criterion_group, criterion_main, Criterion};
use rand::Rng;

use bls_core::{PrivateKey, PublicKey, Signature, SIG_HASH_TO_G2};

fn batch_bls_comparison(c: &mut Criterion) {
    let mut group = c.benchmark_group("bls");
    group.sample_size(10);
    const NUM_MESSAGES: usize = 20;
    const NUM_SIGNERS: usize = 5;
    let rng = &mut rand::thread_rng();
    let hasher = &*SIG_HASH_TO_G2;

    let mut messages: Vec<Vec<u8>> = Vec::new();
    for _ in 0..NUM_MESSAGES {
        messages.push((0..32).map(|_| rng.gen()).collect());
    }

    // each message signed by a committee; keep the per-message aggregates
    // and the total aggregate signature
    let mut pubkeys = Vec::new();
    let mut sigs = Vec::new();
    let mut all_sigs = Vec::new();
    for msg in &messages {
        let mut committee_keys = Vec::new();
        let mut committee_sigs = Vec::new();
        for _ in 0..NUM_SIGNERS {
            let sk = PrivateKey::generate(rng);
            committee_sigs.push(sk.sign(msg, hasher).unwrap());
            committee_keys.push(sk.to_public());
        }
        all_sigs.extend_from_slice(&committee_sigs);
        pubkeys.push(PublicKey::aggregate(&committee_keys).unwrap());
        sigs.push(Signature::aggregate(&committee_sigs).unwrap());
    }
    let asig = Signature::aggregate(&all_sigs).unwrap();
    let msg_refs: Vec<&[u8]> = messages.iter().map(|m| m.as_ref()).collect();

    group.bench_function("individual verification", |b| {
        b.iter(|| {
            pubkeys
                .iter()
                .zip(&sigs)
                .zip(&messages)
                .for_each(|((pk, sig), msg)| {
                    assert!(pk.verify(msg, sig, hasher).unwrap());
                })
        })
    });

    group.bench_function("batch verification", |b| {
        b.iter(|| assert!(asig.batch_verify(&pubkeys, &msg_refs, hasher).unwrap()))
    });

    group.bench_function("sign", |b| {
        let sk = PrivateKey::generate(rng);
        b.iter(|| sk.sign(&messages[0], hasher).unwrap())
    });

    group.finish();
}

criterion_group!(benches, batch_bls_comparison);
criterion_main!(benches);
