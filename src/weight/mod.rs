//! Selection weight model
//!
//! Pure functions scoring a catalog item against a resolved configuration.
//! Factors multiply; a weight of exactly zero marks the item as forbidden on
//! that configuration.

#[cfg(test)]
mod property_tests;

use crate::catalog::{CatalogItem, Category, Phase};
use crate::config::{Archetype, GameSpeed, MapSize, MapType, ResolvedConfig, ResourceLevel};

/// Items above this cost are damped when resources are low
pub const LOW_RESOURCE_COST_CEILING: u32 = 20;
/// Items at or below this cost are favored when resources are low
pub const CHEAP_ITEM_COST: u32 = 5;
/// Items at or above this cost are favored when resources are high
pub const EXPENSIVE_ITEM_COST: u32 = 15;

#[inline]
fn name_contains(item: &CatalogItem<'_>, needle: &str) -> bool {
    item.name().to_ascii_lowercase().contains(needle)
}

#[inline]
fn is_fishing(item: &CatalogItem<'_>) -> bool {
    name_contains(item, "fishing")
}

/// Base map-category fit, including hard exclusions
pub fn map_fit(item: &CatalogItem<'_>, map: MapType) -> f64 {
    let category = item.category();
    let in_any = |categories: &[Category]| category.is_some_and(|c| categories.contains(&c));
    let cavalry = category.is_some_and(Category::is_cavalry);

    match map {
        MapType::Land => {
            if item.in_category(Category::Ships) || is_fishing(item) {
                return 0.0;
            }
            if category.is_some_and(Category::is_infantry)
                || in_any(&[Category::Economy, Category::Buildings])
            {
                return 1.5;
            }
            1.0
        }
        MapType::Water => {
            if item.in_category(Category::Ships) || is_fishing(item) {
                3.0
            } else if cavalry {
                0.5
            } else {
                1.0
            }
        }
        MapType::Islands => {
            if in_any(&[Category::Ships, Category::Aircraft]) || item.name() == "Expansionism" {
                2.0
            } else if cavalry {
                0.8
            } else {
                1.0
            }
        }
        MapType::Space | MapType::Orbital => {
            if item.in_category(Category::Ships) {
                return 0.0;
            }
            if in_any(&[Category::Aircraft, Category::Tanks, Category::Cyber]) {
                2.5
            } else if name_contains(item, "farming") || name_contains(item, "hunting") {
                0.1
            } else {
                1.0
            }
        }
        MapType::Coastal | MapType::Rivers => {
            if item.in_category(Category::Ships) || is_fishing(item) {
                1.2
            } else {
                1.0
            }
        }
        MapType::Mixed => 1.0,
    }
}

/// Small maps reward fast aggression, large maps reward economy and cavalry
pub fn size_factor(item: &CatalogItem<'_>, size: MapSize) -> f64 {
    let category = item.category();
    match size {
        MapSize::Small => {
            let mut factor = 1.0;
            if item.has_tag(Phase::Early) {
                factor *= 1.2;
            }
            if category.is_some_and(Category::is_infantry) {
                factor *= 1.15;
            }
            factor
        }
        MapSize::Large => {
            if category.is_some_and(|c| c == Category::Economy || c.is_cavalry()) {
                1.25
            } else {
                1.0
            }
        }
        MapSize::Medium => 1.0,
    }
}

pub fn resource_factor(item: &CatalogItem<'_>, level: ResourceLevel) -> f64 {
    let cost = item.base_cost();
    let mut factor = 1.0;
    match level {
        ResourceLevel::Low => {
            if item.in_category(Category::Economy) || item.in_category(Category::Citizens) {
                factor *= 1.3;
            }
            if cost <= CHEAP_ITEM_COST {
                factor *= 1.1;
            }
            if cost > LOW_RESOURCE_COST_CEILING {
                factor *= 0.7;
            }
        }
        ResourceLevel::High => {
            if cost >= EXPENSIVE_ITEM_COST {
                factor *= 1.2;
            }
            if item.has_tag(Phase::Late) {
                factor *= 1.2;
            }
        }
        ResourceLevel::Standard => {}
    }
    factor
}

pub fn speed_factor(item: &CatalogItem<'_>, speed: GameSpeed) -> f64 {
    let mut factor = 1.0;
    match speed {
        GameSpeed::Fast => {
            if item.has_tag(Phase::Early) {
                factor *= 1.3;
            }
        }
        GameSpeed::Slow => {
            if item.in_category(Category::Economy) {
                factor *= 1.2;
            }
            if item.has_tag(Phase::Late) {
                factor *= 1.3;
            }
        }
        GameSpeed::Normal => {}
    }
    factor
}

/// Configuration weight of an item; zero means forbidden
pub fn weight(item: &CatalogItem<'_>, config: &ResolvedConfig) -> f64 {
    let fit = map_fit(item, config.map_type);
    if fit == 0.0 {
        return 0.0;
    }
    fit * size_factor(item, config.map_size)
        * resource_factor(item, config.resources)
        * speed_factor(item, config.game_speed)
}

#[inline]
pub fn is_forbidden(item: &CatalogItem<'_>, config: &ResolvedConfig) -> bool {
    weight(item, config) == 0.0
}

/// Soft nudge toward a player's declared leaning; never zero
pub fn archetype_bias(item: &CatalogItem<'_>, archetype: Archetype) -> f64 {
    let category = item.category();
    let name = item.name();
    let mut bias: f64 = 1.0;

    match archetype {
        Archetype::Economic => {
            if category.is_some_and(|c| c == Category::Economy || c == Category::Citizens) {
                bias = bias.max(1.3);
            }
            if name == "Market" || name == "Advanced Mining" {
                bias = bias.max(1.3);
            }
        }
        Archetype::Aggressive => {
            if category.is_some_and(|c| c.is_infantry() || c.is_cavalry() || c == Category::Tanks) {
                bias = bias.max(1.25);
            }
            if name.contains("Attack") {
                bias = bias.max(1.2);
            }
            if name == "Expansionism" {
                bias = bias.max(1.3);
            }
        }
        Archetype::Defensive => {
            if item.in_category(Category::Buildings)
                || name.contains("Hit Points")
                || name == "Priest Tower"
            {
                bias = bias.max(1.3);
            }
        }
        Archetype::Naval => {
            if item.in_category(Category::Ships) || name.contains("Fishing") {
                bias = bias.max(1.5);
            }
        }
        Archetype::Balanced => {
            if category.is_some_and(|c| c == Category::Cyber || c == Category::Religion) {
                bias = 0.8;
            }
        }
    }
    bias
}
