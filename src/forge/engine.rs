//! Match forging engine

use crate::catalog::Catalog;
use crate::config::{resolve, Preset, RawConfig, ResolvedConfig};
use crate::error::{ForgeError, Result};
use crate::generator::{generate, guaranteed_power_slots, reroll_seed, PlayerBuild};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

/// Suffix appended to the reasoning of a rerolled build
pub const REROLL_MARKER: &str = " (Rerolled)";

/// Resolved configuration plus one build per player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForgedMatch {
    pub config: ResolvedConfig,
    pub builds: Vec<PlayerBuild>,
}

impl ForgedMatch {
    pub fn build(&self, index: usize) -> Option<&PlayerBuild> {
        self.builds.get(index)
    }

    pub fn rerolls_locked(&self) -> bool {
        self.config.preset == Preset::Tournament
    }
}

/// Result of a reroll request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RerollOutcome {
    Rerolled,
    /// The player already spent their reroll
    AlreadyUsed,
    /// Tournament rules forbid rerolls
    Locked,
}

/// Match engine over an injected catalog
#[derive(Debug, Clone)]
pub struct CivForge {
    catalog: Arc<Catalog>,
}

impl CivForge {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog: Arc::new(catalog),
        }
    }

    pub fn with_catalog(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    /// Engine over the embedded catalog
    pub fn builtin() -> Self {
        Self::new(Catalog::builtin().clone())
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn resolve(&self, raw: &RawConfig) -> Result<ResolvedConfig> {
        resolve(raw)
    }

    /// One player's build under a resolved configuration
    pub fn generate(
        &self,
        config: &ResolvedConfig,
        player_index: usize,
        forced_seed: Option<&str>,
        ensure_power: bool,
    ) -> Result<PlayerBuild> {
        let name = config
            .player_names
            .get(player_index)
            .ok_or(ForgeError::PlayerNotFound(player_index))?;
        Ok(generate(
            &self.catalog,
            config,
            name,
            player_index,
            forced_seed,
            ensure_power,
        ))
    }

    /// Resolve the configuration and generate every player's build
    pub fn forge(&self, raw: &RawConfig) -> Result<ForgedMatch> {
        let config = self.resolve(raw)?;
        self.forge_resolved(config)
    }

    /// Generate every player's build for an already resolved configuration
    pub fn forge_resolved(&self, config: ResolvedConfig) -> Result<ForgedMatch> {
        config.validate()?;
        let slots = guaranteed_power_slots(&config.seed, config.player_count);
        let builds = config
            .player_names
            .iter()
            .enumerate()
            .map(|(index, name)| {
                generate(&self.catalog, &config, name, index, None, slots[index])
            })
            .collect();

        info!(
            seed = %config.seed,
            players = config.player_count,
            map = %config.map_type,
            "forged match"
        );
        Ok(ForgedMatch { config, builds })
    }

    /// Replace one player's build from the reroll sub-seed.
    ///
    /// Only the targeted entry changes. The player's guaranteed-power slot
    /// carries over to the new build.
    pub fn reroll(&self, forged: &mut ForgedMatch, index: usize) -> Result<RerollOutcome> {
        let current = forged
            .builds
            .get(index)
            .ok_or(ForgeError::PlayerNotFound(index))?;
        if forged.rerolls_locked() {
            return Ok(RerollOutcome::Locked);
        }
        if current.reroll_used {
            return Ok(RerollOutcome::AlreadyUsed);
        }

        let config = &forged.config;
        let name = current.player_name.clone();
        let seed = reroll_seed(&config.seed, &name, index);
        let ensure_power = guaranteed_power_slots(&config.seed, config.player_count)
            .get(index)
            .copied()
            .unwrap_or(false);

        let mut build = generate(&self.catalog, config, &name, index, Some(&seed), ensure_power);
        build.reroll_used = true;
        build.reasoning.push_str(REROLL_MARKER);
        debug!(player = %name, index, seed = %seed, "rerolled build");

        forged.builds[index] = build;
        Ok(RerollOutcome::Rerolled)
    }
}

impl Default for CivForge {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Archetype, Choice, MapType, PointUsage};

    fn scenario() -> RawConfig {
        RawConfig {
            archetypes: vec![Choice::Fixed(Archetype::Balanced); 2],
            map_type: Choice::Fixed(MapType::Land),
            preset: Choice::Fixed(Preset::Casual),
            point_usage: Choice::Fixed(PointUsage::Efficient),
            ..RawConfig::default()
        }
    }

    #[test]
    fn test_forge_generates_every_player() {
        let forge = CivForge::builtin();
        let forged = forge.forge(&scenario()).unwrap();
        assert_eq!(forged.builds.len(), 2);
        assert_eq!(forged.builds[0].player_name, "Taco");
        assert_eq!(forged.builds[1].player_name, "Piert");
        assert_eq!(forged.builds[1].seed, "EF-1-Piert-1");

        let powered = forged
            .builds
            .iter()
            .filter(|b| b.items.first().is_some_and(|i| i.trace == "guaranteed power"))
            .count();
        assert!(powered >= 1);
        assert_eq!(forged, forge.forge(&scenario()).unwrap());
    }

    #[test]
    fn test_forge_rejects_invalid_config() {
        let mut raw = scenario();
        raw.player_count = 1;
        assert!(matches!(
            CivForge::builtin().forge(&raw),
            Err(ForgeError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_reroll_once() {
        let forge = CivForge::builtin();
        let mut forged = forge.forge(&scenario()).unwrap();
        let before = forged.clone();

        assert_eq!(forge.reroll(&mut forged, 0).unwrap(), RerollOutcome::Rerolled);
        let rerolled = forged.builds[0].clone();
        assert!(rerolled.reroll_used);
        assert!(rerolled.reasoning.ends_with(" (Rerolled)"));
        assert_eq!(rerolled.seed, "EF-1-Taco-0-REROLL");
        assert_eq!(forged.builds[1], before.builds[1]);

        assert_eq!(forge.reroll(&mut forged, 0).unwrap(), RerollOutcome::AlreadyUsed);
        assert_eq!(forged.builds[0], rerolled);

        // Reloading the same match and rerolling again reproduces it
        let mut reloaded = before;
        forge.reroll(&mut reloaded, 0).unwrap();
        assert_eq!(reloaded.builds[0], rerolled);
    }

    #[test]
    fn test_reroll_keeps_guaranteed_power_slot() {
        let forge = CivForge::builtin();
        let mut forged = forge.forge(&scenario()).unwrap();
        let slots = guaranteed_power_slots(&forged.config.seed, forged.config.player_count);
        let slot = slots.iter().position(|&s| s).unwrap();

        forge.reroll(&mut forged, slot).unwrap();
        let first = &forged.builds[slot].items[0];
        assert_eq!(first.kind, crate::catalog::ItemKind::Power);
        assert_eq!(first.trace, "guaranteed power");
    }

    #[test]
    fn test_reroll_locked_in_tournament() {
        let forge = CivForge::builtin();
        let mut raw = scenario();
        raw.preset = Choice::Fixed(Preset::Tournament);
        let mut forged = forge.forge(&raw).unwrap();
        let before = forged.clone();
        assert_eq!(forge.reroll(&mut forged, 1).unwrap(), RerollOutcome::Locked);
        assert_eq!(forged, before);
    }

    #[test]
    fn test_reroll_unknown_player() {
        let forge = CivForge::builtin();
        let mut forged = forge.forge(&scenario()).unwrap();
        assert!(matches!(
            forge.reroll(&mut forged, 7),
            Err(ForgeError::PlayerNotFound(7))
        ));
        assert!(matches!(
            forge.generate(&forged.config, 9, None, false),
            Err(ForgeError::PlayerNotFound(9))
        ));
    }
}
