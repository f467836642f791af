//! Property tests for build generation
//!
//! Budget, uniqueness, inflation and map exclusion hold for every resolved
//! configuration, and generation is a pure function of its inputs.

use proptest::prelude::*;

use crate::catalog::{Catalog, CatalogItem};
use crate::config::{
    Archetype, Domain, GameSpeed, MapSize, MapType, PointUsage, Preset, ResolvedConfig,
    ResourceLevel, MAX_EPOCH,
};
use crate::generator::{generate, POINT_BUDGET};
use crate::weight::weight;
use ahash::{AHashMap, AHashSet};

fn resolved_config_strategy() -> impl Strategy<Value = ResolvedConfig> {
    (
        "[A-Za-z0-9-]{1,12}",
        proptest::sample::select(MapType::ALL),
        proptest::sample::select(Preset::ALL),
        proptest::sample::select(PointUsage::ALL),
        proptest::sample::select(Archetype::ALL),
        (
            proptest::sample::select(MapSize::ALL),
            proptest::sample::select(ResourceLevel::ALL),
            proptest::sample::select(GameSpeed::ALL),
        ),
        1..=MAX_EPOCH,
    )
        .prop_flat_map(|(seed, map, preset, usage, archetype, extended, start)| {
            (start..=MAX_EPOCH).prop_map(move |end| {
                let players = [("Ada", archetype), ("Bo", Archetype::Balanced)];
                let mut config = ResolvedConfig::new(&seed, &players);
                config.map_type = map;
                config.preset = preset;
                config.point_usage = usage;
                config.map_size = extended.0;
                config.resources = extended.1;
                config.game_speed = extended.2;
                config.start_epoch = start;
                config.end_epoch = end;
                config
            })
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// Spent points stay within budget and equal the item cost sum
    #[test]
    fn prop_budget_invariant(config in resolved_config_strategy(), ensure in proptest::bool::ANY) {
        let build = generate(Catalog::builtin(), &config, "Ada", 0, None, ensure);
        let total: u32 = build.items.iter().map(|item| item.cost).sum();
        prop_assert!(build.points_spent <= POINT_BUDGET);
        prop_assert_eq!(build.points_spent, total);
    }

    /// Item names are pairwise distinct
    #[test]
    fn prop_no_duplicate_items(config in resolved_config_strategy(), ensure in proptest::bool::ANY) {
        let build = generate(Catalog::builtin(), &config, "Ada", 0, None, ensure);
        let names: AHashSet<&str> = build.item_names().collect();
        prop_assert_eq!(names.len(), build.items.len());
    }

    /// The k-th boost in a category costs base + k * bonus
    #[test]
    fn prop_inflation_correct(config in resolved_config_strategy()) {
        let catalog = Catalog::builtin();
        let build = generate(catalog, &config, "Ada", 0, None, false);
        let mut seen = AHashMap::new();
        for item in &build.items {
            match item.category {
                Some(category) => {
                    let prior = seen.entry(category).or_insert(0u32);
                    let expected = item.original_cost + *prior * catalog.bonus_cost(category);
                    prop_assert_eq!(item.cost, expected, "{}", item.name);
                    prop_assert_eq!(item.inflation_applied, Some(*prior * catalog.bonus_cost(category)));
                    *prior += 1;
                }
                None => prop_assert_eq!(item.cost, item.original_cost),
            }
        }
    }

    /// Nothing forbidden on the map is bought outside the relaxed power slot
    #[test]
    fn prop_map_exclusion(config in resolved_config_strategy(), ensure in proptest::bool::ANY) {
        let catalog = Catalog::builtin();
        let build = generate(catalog, &config, "Ada", 0, None, ensure);
        for item in build.items.iter().filter(|item| !item.map_rule_relaxed) {
            let entry: Option<CatalogItem<'_>> = catalog.item(&item.name);
            prop_assert!(entry.is_some());
            if let Some(entry) = entry {
                prop_assert!(weight(&entry, &config) > 0.0, "{} forbidden on {}", item.name, config.map_type);
            }
        }
        prop_assert!(build.valid);
    }

    /// Identical inputs give identical builds
    #[test]
    fn prop_generation_deterministic(config in resolved_config_strategy(), ensure in proptest::bool::ANY) {
        let catalog = Catalog::builtin();
        let first = generate(catalog, &config, "Bo", 1, None, ensure);
        let second = generate(catalog, &config, "Bo", 1, None, ensure);
        prop_assert_eq!(first, second);
    }
}
