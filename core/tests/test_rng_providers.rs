//! Tests for the pluggable random providers and the batch contract

use randsim_core::rng::{build_provider, AlgorithmId, BlockXorshift, RngError, Xorshift64Star};

#[test]
fn test_all_algorithms_build_with_adequate_batch() {
    for algorithm in [AlgorithmId::Sequence, AlgorithmId::Block, AlgorithmId::System] {
        let mut provider = build_provider(algorithm, 12345, 512)
            .unwrap_or_else(|err| panic!("{:?} failed to build: {}", algorithm, err));
        let mut batch = vec![0u64; 512];
        provider.fill(&mut batch);
        assert!(
            batch.iter().any(|&v| v != 0),
            "{:?} produced an all-zero batch",
            algorithm
        );
    }
}

#[test]
fn test_block_provider_rejects_undersized_batch() {
    let err = build_provider(AlgorithmId::Block, 1, BlockXorshift::MIN_BATCH_SIZE - 1).unwrap_err();
    assert_eq!(
        err,
        RngError::BatchTooSmall {
            requested: BlockXorshift::MIN_BATCH_SIZE - 1,
            minimum: BlockXorshift::MIN_BATCH_SIZE,
        }
    );
}

#[test]
fn test_sequence_and_system_accept_any_positive_batch() {
    assert!(build_provider(AlgorithmId::Sequence, 1, 1).is_ok());
    assert!(build_provider(AlgorithmId::System, 1, 1).is_ok());
}

#[test]
fn test_same_seed_replays_identically() {
    for algorithm in [AlgorithmId::Sequence, AlgorithmId::Block, AlgorithmId::System] {
        let mut first = build_provider(algorithm, 987654321, 512).unwrap();
        let mut second = build_provider(algorithm, 987654321, 512).unwrap();

        let mut batch_a = vec![0u64; 512];
        let mut batch_b = vec![0u64; 512];
        first.fill(&mut batch_a);
        second.fill(&mut batch_b);
        assert_eq!(batch_a, batch_b, "{:?} not deterministic", algorithm);
    }
}

#[test]
fn test_different_seeds_diverge() {
    let mut first = build_provider(AlgorithmId::Sequence, 1, 64).unwrap();
    let mut second = build_provider(AlgorithmId::Sequence, 2, 64).unwrap();

    let mut batch_a = vec![0u64; 64];
    let mut batch_b = vec![0u64; 64];
    first.fill(&mut batch_a);
    second.fill(&mut batch_b);
    assert_ne!(batch_a, batch_b);
}

#[test]
fn test_block_variant_shares_stream_with_sequence() {
    // Same seed, same underlying xorshift64* stream; the variants differ
    // only in fill discipline.
    let mut block = build_provider(AlgorithmId::Block, 555, 512).unwrap();
    let mut sequence = Xorshift64Star::new(555);

    let mut batch = vec![0u64; 512];
    block.fill(&mut batch);
    for value in batch {
        assert_eq!(value, sequence.next());
    }
}

#[test]
fn test_fixed_seed_first_draw_is_zero_leading() {
    // Seed chosen so the very first xorshift64* output has an all-zero
    // upper half; the end-to-end session test depends on it.
    let mut rng = Xorshift64Star::new(0xB249_BA8B_2FAE_1B35);
    let first = rng.next();
    assert_eq!(first, 0x0000_0000_CAFE_F00D);
    assert_eq!(first >> 32, 0);
}
