//! Property tests for forging, rerolls and share links

use proptest::prelude::*;

use crate::config::{
    Archetype, Choice, Domain, MapType, PointUsage, Preset, RawConfig, MAX_EPOCH,
};
use crate::forge::{
    config_from_query, decode_config, encode_config, share_query, CivForge, RerollOutcome,
};

fn choice_strategy<T: Domain + std::fmt::Debug>() -> impl Strategy<Value = Choice<T>> {
    prop_oneof![
        proptest::sample::select(T::ALL).prop_map(Choice::Fixed),
        Just(Choice::Random(Vec::new())),
        proptest::sample::subsequence(T::ALL, 0..=T::ALL.len()).prop_map(Choice::Random),
    ]
}

fn raw_config_strategy() -> impl Strategy<Value = RawConfig> {
    (
        proptest::collection::vec("\\PC{0,12}", 2..=10),
        "[A-Za-z0-9éß東-]{1,16}",
        choice_strategy::<MapType>(),
        choice_strategy::<Preset>(),
        choice_strategy::<PointUsage>(),
        choice_strategy::<Archetype>(),
        1..=MAX_EPOCH,
    )
        .prop_map(|(names, seed, map, preset, usage, archetype, start)| {
            let mut config = RawConfig::for_players(&seed, names);
            config.archetypes = vec![archetype; config.player_count];
            config.map_type = map;
            config.preset = preset;
            config.point_usage = usage;
            config.start_epoch = start;
            config.end_epoch = Choice::Random((start..=MAX_EPOCH).collect());
            config
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Share tokens decode back to the identical configuration
    #[test]
    fn prop_share_round_trip(config in raw_config_strategy()) {
        let token = encode_config(&config).unwrap();
        prop_assert_eq!(decode_config(&token), Some(config.clone()));
        let query = share_query(&config).unwrap();
        prop_assert_eq!(config_from_query(&query), Some(config));
    }

    /// Arbitrary text never decodes into a panic
    #[test]
    fn prop_decode_never_panics(token in "\\PC{0,64}") {
        let _ = decode_config(&token);
    }

    /// A reroll touches only its target and only once
    #[test]
    fn prop_reroll_isolation(config in raw_config_strategy(), pick in any::<prop::sample::Index>()) {
        let forge = CivForge::builtin();
        let mut forged = forge.forge(&config).unwrap();
        let before = forged.clone();
        let target = pick.index(forged.builds.len());

        let outcome = forge.reroll(&mut forged, target).unwrap();
        for (index, build) in forged.builds.iter().enumerate() {
            if index != target {
                prop_assert_eq!(build, &before.builds[index]);
            }
        }

        if outcome == RerollOutcome::Locked {
            prop_assert_eq!(&forged, &before);
        } else {
            prop_assert_eq!(outcome, RerollOutcome::Rerolled);
            prop_assert!(forged.builds[target].reroll_used);
            let after_first = forged.clone();
            prop_assert_eq!(forge.reroll(&mut forged, target).unwrap(), RerollOutcome::AlreadyUsed);
            prop_assert_eq!(&forged, &after_first);
        }
    }
}
