//! Property tests for the weight model
//!
//! Weights are finite and non-negative, biases strictly positive, and the
//! hard exclusions hold for every catalog item.

use proptest::prelude::*;

use crate::catalog::{Catalog, CatalogItem, Category};
use crate::config::{
    Archetype, Domain, GameSpeed, MapSize, MapType, ResolvedConfig, ResourceLevel,
};
use crate::weight::{archetype_bias, weight};

fn all_items(catalog: &Catalog) -> Vec<CatalogItem<'_>> {
    catalog
        .boosts()
        .iter()
        .map(CatalogItem::Boost)
        .chain(catalog.powers().iter().map(CatalogItem::Power))
        .collect()
}

proptest! {
    /// Every factor combination yields a finite, non-negative weight
    #[test]
    fn prop_weight_non_negative(
        map in proptest::sample::select(MapType::ALL),
        size in proptest::sample::select(MapSize::ALL),
        resources in proptest::sample::select(ResourceLevel::ALL),
        speed in proptest::sample::select(GameSpeed::ALL),
        archetype in proptest::sample::select(Archetype::ALL),
    ) {
        let catalog = Catalog::builtin();
        let mut config = ResolvedConfig::new("prop", &[("A", archetype)]);
        config.map_type = map;
        config.map_size = size;
        config.resources = resources;
        config.game_speed = speed;

        for item in all_items(catalog) {
            let w = weight(&item, &config);
            prop_assert!(w.is_finite() && w >= 0.0, "{} weighs {}", item.name(), w);
            let bias = archetype_bias(&item, archetype);
            prop_assert!(bias > 0.0);
            if item.category() == Some(Category::Ships)
                && matches!(map, MapType::Land | MapType::Space | MapType::Orbital)
            {
                prop_assert_eq!(w, 0.0);
            }
            if item.category() != Some(Category::Ships) && !item.name().contains("Fishing") {
                prop_assert!(w > 0.0, "{} unexpectedly forbidden on {}", item.name(), map);
            }
        }
    }
}
