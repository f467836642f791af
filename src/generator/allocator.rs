//! Point allocation loop
//!
//! Spends the point budget one weighted draw at a time. Boost costs inflate
//! per prior pick in the same category; powers keep their fixed cost.

use super::{GeneratedItem, POINT_BUDGET};
use crate::catalog::{Boost, Catalog, CatalogItem, Category, Power};
use crate::config::{Archetype, MapType, PointUsage, Preset, ResolvedConfig};
use crate::rng::SeededRng;
use crate::weight::{archetype_bias, map_fit, weight};
use ahash::{AHashMap, AHashSet};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{trace, warn};

/// Hard ceiling on selection rounds
pub const MAX_ITERATIONS: usize = 500;
/// Efficient stops once this many points or fewer remain
pub const EFFICIENT_STOP: u32 = 5;
/// Loose stops once this many points or fewer remain
pub const LOOSE_STOP: u32 = 15;
/// Exact narrows to exact-cost candidates below this many remaining points
pub const EXACT_WINDOW: u32 = 20;
/// Per-pick category momentum step
pub const MOMENTUM_STEP: f64 = 0.6;

const GUARANTEED_TRACE: &str = "guaranteed power";
const RELAXED_TRACE: &str = "guaranteed power (map rules relaxed)";
const STANDARD_TRACE: &str = "standard roll";

/// `"20% Attack (Ranged Inf)"` style boost names
static BOOST_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+)%\s+(.+?)(?:\s+\((.+)\))?$").expect("Invalid boost name pattern")
});

/// Outcome of one player's allocation
#[derive(Debug, Clone, Default)]
pub struct Allocation {
    pub items: Vec<GeneratedItem>,
    pub points_remaining: u32,
    pub category_counts: AHashMap<Category, u32>,
    pub warnings: Vec<String>,
    /// Selection rounds run, excluding the guaranteed power
    pub iterations: usize,
}

impl Allocation {
    fn new() -> Self {
        Self {
            points_remaining: POINT_BUDGET,
            ..Self::default()
        }
    }

    pub fn points_spent(&self) -> u32 {
        POINT_BUDGET - self.points_remaining
    }

    pub fn category_count(&self, category: Category) -> u32 {
        self.category_counts.get(&category).copied().unwrap_or(0)
    }
}

/// Affordable candidate with its current price
#[derive(Debug, Clone, Copy)]
struct Offer<'c> {
    item: CatalogItem<'c>,
    cost: u32,
    inflation: u32,
    /// Configuration weight, never zero for offered items
    weight: f64,
}

/// Human-readable description of a catalog item
pub fn describe(item: &CatalogItem<'_>) -> String {
    match *item {
        CatalogItem::Power(power) if !power.description.is_empty() => power.description.clone(),
        CatalogItem::Power(power) => power.name.clone(),
        CatalogItem::Boost(boost) => match BOOST_NAME.captures(&boost.name) {
            Some(caps) => {
                let stat = &caps[2];
                match caps.get(3) {
                    Some(target) => format!("+{}% {} for {}", &caps[1], stat, target.as_str()),
                    None => format!("+{}% {}", &caps[1], stat),
                }
            }
            None => boost.name.clone(),
        },
    }
}

#[inline]
fn boost_in_era(catalog: &Catalog, boost: &Boost, config: &ResolvedConfig) -> bool {
    catalog
        .heading(boost.category)
        .is_some_and(|heading| heading.min_epoch <= config.end_epoch)
}

#[inline]
fn power_in_era(power: &Power, config: &ResolvedConfig) -> bool {
    power.min_epoch <= config.end_epoch && power.max_epoch >= config.start_epoch
}

/// Whether an item's era window is satisfied by the resolved epochs
pub fn in_era(catalog: &Catalog, item: &CatalogItem<'_>, config: &ResolvedConfig) -> bool {
    match *item {
        CatalogItem::Boost(boost) => boost_in_era(catalog, boost, config),
        CatalogItem::Power(power) => power_in_era(power, config),
    }
}

/// Preset reweighting for one candidate
pub fn preset_modifier(item: &CatalogItem<'_>, cost: u32, preset: Preset, category_count: u32) -> f64 {
    let is_boost = item.category().is_some();
    match preset {
        Preset::Historical if is_boost => 1.2,
        Preset::Historical => 0.2,
        Preset::Chaos if is_boost && category_count > 0 => 2.0,
        Preset::Tournament if is_boost && cost > 20 => 0.8,
        _ => 1.0,
    }
}

/// Momentum multiplier for boosts in a category already picked `count` times
#[inline]
pub fn momentum(item: &CatalogItem<'_>, count: u32) -> f64 {
    if item.category().is_some() {
        1.0 + MOMENTUM_STEP * f64::from(count)
    } else {
        1.0
    }
}

fn stops_early(policy: PointUsage, points: u32) -> bool {
    match policy {
        PointUsage::Efficient => points <= EFFICIENT_STOP,
        PointUsage::Loose => points <= LOOSE_STOP,
        PointUsage::Exact => false,
    }
}

fn favored_trace(item: &CatalogItem<'_>, config: &ResolvedConfig, archetype: Option<Archetype>) -> String {
    let fit = map_fit(item, config.map_type);
    let bias = archetype.map_or(1.0, |a| archetype_bias(item, a));
    if fit > 1.0 && fit >= bias {
        format!("favored by {} map rules (x{:.1})", config.map_type, fit)
    } else if bias > 1.0 {
        match archetype {
            Some(a) => format!("{} archetype preference (x{:.2})", a, bias),
            None => STANDARD_TRACE.to_string(),
        }
    } else {
        STANDARD_TRACE.to_string()
    }
}

/// Naval leaning is pointless where ships are excluded
fn naval_suppressed(map: MapType) -> bool {
    matches!(map, MapType::Land | MapType::Space | MapType::Orbital)
}

struct Allocator<'c> {
    catalog: &'c Catalog,
    config: &'c ResolvedConfig,
    archetype: Option<Archetype>,
    boosts: Vec<&'c Boost>,
    powers: Vec<&'c Power>,
    taken: AHashSet<&'c str>,
    state: Allocation,
}

impl<'c> Allocator<'c> {
    fn new(catalog: &'c Catalog, config: &'c ResolvedConfig, archetype: Option<Archetype>) -> Self {
        let boosts = catalog
            .boosts()
            .iter()
            .filter(|b| boost_in_era(catalog, b, config))
            .collect();
        let powers = catalog
            .powers()
            .iter()
            .filter(|p| power_in_era(p, config))
            .collect();
        Self {
            catalog,
            config,
            archetype,
            boosts,
            powers,
            taken: AHashSet::new(),
            state: Allocation::new(),
        }
    }

    fn bias(&self, item: &CatalogItem<'_>) -> f64 {
        self.archetype.map_or(1.0, |a| archetype_bias(item, a))
    }

    fn offer(&self, item: CatalogItem<'c>) -> Option<Offer<'c>> {
        if self.taken.contains(item.name()) {
            return None;
        }
        // Saturated prices always exceed the remaining points
        let inflation = match item.category() {
            Some(category) => self
                .state
                .category_count(category)
                .saturating_mul(self.catalog.bonus_cost(category)),
            None => 0,
        };
        let cost = item.base_cost().saturating_add(inflation);
        if cost > self.state.points_remaining {
            return None;
        }
        let weight = weight(&item, self.config);
        if weight == 0.0 {
            return None;
        }
        Some(Offer {
            item,
            cost,
            inflation,
            weight,
        })
    }

    fn affordable(&self) -> Vec<Offer<'c>> {
        let boosts = self.boosts.iter().map(|&b| CatalogItem::Boost(b));
        let powers = self.powers.iter().map(|&p| CatalogItem::Power(p));
        boosts.chain(powers).filter_map(|item| self.offer(item)).collect()
    }

    fn selection_weight(&self, offer: &Offer<'_>) -> f64 {
        let count = offer
            .item
            .category()
            .map_or(0, |c| self.state.category_count(c));
        offer.weight
            * self.bias(&offer.item)
            * preset_modifier(&offer.item, offer.cost, self.config.preset, count)
            * momentum(&offer.item, count)
    }

    fn take(&mut self, offer: &Offer<'c>, trace: String, map_rule_relaxed: bool) {
        let item = offer.item;
        self.state.points_remaining -= offer.cost;
        if let Some(category) = item.category() {
            *self.state.category_counts.entry(category).or_insert(0) += 1;
        }
        self.taken.insert(item.name());
        self.state.items.push(GeneratedItem {
            name: item.name().to_string(),
            cost: offer.cost,
            original_cost: item.base_cost(),
            kind: item.kind(),
            category: item.category(),
            inflation_applied: item.category().map(|_| offer.inflation),
            description: describe(&item),
            trace,
            map_rule_relaxed,
        });
    }

    /// Step 0: one power ahead of the regular loop
    fn take_guaranteed_power(&mut self, rng: &mut SeededRng) {
        let points = self.state.points_remaining;
        let affordable: Vec<&'c Power> = self
            .powers
            .iter()
            .copied()
            .filter(|p| p.cost <= points)
            .collect();
        let legal: Vec<&'c Power> = affordable
            .iter()
            .copied()
            .filter(|p| weight(&CatalogItem::Power(p), self.config) > 0.0)
            .collect();

        let relaxed = legal.is_empty();
        let pool = if relaxed { affordable } else { legal };
        if pool.is_empty() {
            return;
        }

        let weights: Vec<f64> = pool
            .iter()
            .map(|p| {
                let item = CatalogItem::Power(p);
                let base = weight(&item, self.config);
                let base = if base == 0.0 { 1.0 } else { base };
                base * self.bias(&item)
            })
            .collect();
        let Ok(index) = rng.pick_weighted_index(&weights) else {
            return;
        };
        let power = pool[index];
        let offer = Offer {
            item: CatalogItem::Power(power),
            cost: power.cost,
            inflation: 0,
            weight: weights[index],
        };

        if relaxed {
            warn!(
                power = %power.name,
                map = %self.config.map_type,
                "no legal power for guaranteed slot, relaxing map rules"
            );
            self.state.warnings.push(format!(
                "Guaranteed power {} ignores {} map rules.",
                power.name, self.config.map_type
            ));
            self.take(&offer, RELAXED_TRACE.to_string(), true);
        } else {
            self.take(&offer, GUARANTEED_TRACE.to_string(), false);
        }
    }

    fn run(mut self, rng: &mut SeededRng, ensure_power: bool) -> Allocation {
        if self.archetype == Some(Archetype::Naval) && naval_suppressed(self.config.map_type) {
            self.state.warnings.push(format!(
                "Naval archetype preference was suppressed due to {} map rules.",
                self.config.map_type
            ));
        }

        if ensure_power {
            self.take_guaranteed_power(rng);
        }

        let mut finished = false;
        while self.state.iterations < MAX_ITERATIONS {
            self.state.iterations += 1;
            let points = self.state.points_remaining;

            let offers = self.affordable();
            if offers.is_empty() || stops_early(self.config.point_usage, points) {
                finished = true;
                break;
            }

            let mut exact = false;
            let candidates = if self.config.point_usage == PointUsage::Exact && points < EXACT_WINDOW {
                let exact_offers: Vec<Offer<'c>> =
                    offers.iter().copied().filter(|o| o.cost == points).collect();
                exact = !exact_offers.is_empty();
                if exact {
                    exact_offers
                } else {
                    offers
                }
            } else {
                offers
            };

            let weights: Vec<f64> = candidates.iter().map(|o| self.selection_weight(o)).collect();
            let Ok(index) = rng.pick_weighted_index(&weights) else {
                finished = true;
                break;
            };
            let chosen = candidates[index];

            let reason = if exact {
                format!("exact-match policy: spends the last {} points", points)
            } else {
                favored_trace(&chosen.item, self.config, self.archetype)
            };
            trace!(
                item = chosen.item.name(),
                cost = chosen.cost,
                points,
                candidates = candidates.len(),
                "allocation step"
            );
            self.take(&chosen, reason, false);
        }

        if !finished {
            warn!(
                iterations = MAX_ITERATIONS,
                points = self.state.points_remaining,
                "allocation hit the iteration ceiling"
            );
        }
        self.state
    }
}

/// Spend one player's budget.
///
/// Never fails: an empty affordable pool, a policy stop and the iteration
/// ceiling all end the loop with whatever was bought so far.
pub fn allocate(
    catalog: &Catalog,
    config: &ResolvedConfig,
    archetype: Option<Archetype>,
    rng: &mut SeededRng,
    ensure_power: bool,
) -> Allocation {
    Allocator::new(catalog, config, archetype).run(rng, ensure_power)
}
