//! Property tests for the seeded generator
//!
//! Determinism, output range and weighted-pick exclusion of zero weights.

use proptest::prelude::*;

use crate::rng::SeededRng;

proptest! {
    /// Identical seed strings yield identical sequences
    #[test]
    fn prop_same_seed_same_sequence(seed in ".{0,24}", draws in 1..64usize) {
        let mut a = SeededRng::new(&seed);
        let mut b = SeededRng::new(&seed);
        for _ in 0..draws {
            prop_assert_eq!(a.next_f64().to_bits(), b.next_f64().to_bits());
        }
    }

    /// Every draw lands in [0, 1)
    #[test]
    fn prop_next_in_unit_interval(seed in ".{0,24}") {
        let mut rng = SeededRng::new(&seed);
        for _ in 0..256 {
            let value = rng.next_f64();
            prop_assert!((0.0..1.0).contains(&value), "value {} out of range", value);
        }
    }

    /// A zero-weighted entry is never drawn while some weight is positive
    #[test]
    fn prop_weighted_skips_zero_weights(
        seed in "[a-zA-Z0-9-]{1,16}",
        weights in proptest::collection::vec(prop_oneof![Just(0.0f64), 0.1f64..10.0], 1..12)
    ) {
        prop_assume!(weights.iter().any(|w| *w > 0.0));
        let mut rng = SeededRng::new(&seed);
        for _ in 0..32 {
            let index = rng.pick_weighted_index(&weights).unwrap();
            prop_assert!(weights[index] > 0.0);
        }
    }

    /// Uniform picks always return a member of the pool
    #[test]
    fn prop_pick_returns_member(
        seed in "[a-z]{1,8}",
        items in proptest::collection::vec(0u32..1000, 1..20)
    ) {
        let mut rng = SeededRng::new(&seed);
        let picked = rng.pick(&items).unwrap();
        prop_assert!(items.contains(picked));
    }
}
