//! Civilization build generator
//!
//! [`generate`] runs the per-player allocation loop and hands the result to
//! the deriver for ratings, summary and scoring.

mod allocator;
mod quota;

#[cfg(test)]
mod property_tests;

pub use allocator::*;
pub use quota::*;

use crate::catalog::{Catalog, Category, ItemKind};
use crate::config::{Archetype, ResolvedConfig};
use crate::deriver::{self, Difficulty, PhaseRatings, SynergyMatch};
use crate::rng::{fold_seed, SeededRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Fixed point budget per player
pub const POINT_BUDGET: u32 = 100;

/// One purchased boost or power
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedItem {
    pub name: String,
    /// Cost actually charged
    pub cost: u32,
    /// Catalog cost before inflation
    pub original_cost: u32,
    pub kind: ItemKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inflation_applied: Option<u32>,
    pub description: String,
    /// Dominant reason the item was favored
    pub trace: String,
    /// Taken by the guaranteed-power fallback despite map rules
    #[serde(default)]
    pub map_rule_relaxed: bool,
}

/// Complete build for one player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerBuild {
    pub id: String,
    pub player_name: String,
    pub player_index: usize,
    pub seed: String,
    pub archetype: Option<Archetype>,
    pub points_spent: u32,
    pub items: Vec<GeneratedItem>,
    pub ratings: PhaseRatings,
    pub summary: String,
    pub reasoning: String,
    pub power_score: u32,
    pub difficulty: Difficulty,
    pub primary_category: Option<Category>,
    pub warnings: Vec<String>,
    pub synergies: Vec<SynergyMatch>,
    pub reroll_used: bool,
    pub valid: bool,
}

impl PlayerBuild {
    pub fn item_names(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|item| item.name.as_str())
    }

    pub fn has_item(&self, name: &str) -> bool {
        self.items.iter().any(|item| item.name == name)
    }
}

/// Per-player seed: `<matchSeed>-<playerName>-<playerIndex>`
pub fn player_seed(match_seed: &str, player_name: &str, player_index: usize) -> String {
    format!("{}-{}-{}", match_seed, player_name, player_index)
}

/// Reroll seed: the player seed suffixed with `-REROLL`
pub fn reroll_seed(match_seed: &str, player_name: &str, player_index: usize) -> String {
    format!("{}-REROLL", player_seed(match_seed, player_name, player_index))
}

/// Stable build id derived from the seed string
pub fn build_id(player_index: usize, seed: &str) -> String {
    format!("civ-{}-{:08x}", player_index, fold_seed(seed))
}

/// Generate one player's build.
///
/// `forced_seed` replaces the per-player seed (used by rerolls);
/// `ensure_power` reserves the first purchase for a civilization power.
pub fn generate(
    catalog: &Catalog,
    config: &ResolvedConfig,
    player_name: &str,
    player_index: usize,
    forced_seed: Option<&str>,
    ensure_power: bool,
) -> PlayerBuild {
    let seed = forced_seed.map_or_else(
        || player_seed(&config.seed, player_name, player_index),
        str::to_string,
    );
    let mut rng = SeededRng::new(&seed);
    let archetype = config.archetypes.get(player_index).copied();

    let allocation = allocate(catalog, config, archetype, &mut rng, ensure_power);
    let points_spent = POINT_BUDGET - allocation.points_remaining;
    let derived = deriver::derive(catalog, config, archetype, &allocation);

    debug!(
        player = player_name,
        seed = %seed,
        points_spent,
        items = allocation.items.len(),
        "generated build"
    );

    PlayerBuild {
        id: build_id(player_index, &seed),
        player_name: player_name.to_string(),
        player_index,
        seed,
        archetype,
        points_spent,
        items: allocation.items,
        ratings: derived.ratings,
        summary: derived.summary,
        reasoning: derived.reasoning,
        power_score: derived.power_score,
        difficulty: derived.difficulty,
        primary_category: derived.primary_category,
        warnings: allocation.warnings,
        synergies: derived.synergies,
        reroll_used: false,
        valid: derived.valid,
    }
}
