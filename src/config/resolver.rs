//! Seeded resolution of randomizable match settings
//!
//! Each draw advances one shared generator, so the order of
//! [`RESOLUTION_ORDER`] is part of the reproducibility contract. Changing it
//! requires bumping [`RESOLUTION_VERSION`].

use super::{
    Archetype, Choice, Domain, GameSpeed, MapSize, MapType, PointUsage, Preset, RawConfig,
    ResolvedConfig, ResourceLevel, MAX_EPOCH, SPACE_MIN_EPOCH,
};
use crate::error::Result;
use crate::rng::SeededRng;
use tracing::debug;

/// Version of the draw sequence below
pub const RESOLUTION_VERSION: u32 = 1;

/// Probability mass given to space-category maps when both kinds are eligible
pub const SPACE_MAP_SHARE: f64 = 0.05;

/// Named resolution step; one or more draws each
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionStep {
    MapType,
    Preset,
    PointUsage,
    MapSize,
    Resources,
    GameSpeed,
    EndEpoch,
    Archetypes,
}

/// Fixed draw order for version 1
pub const RESOLUTION_ORDER: [ResolutionStep; 8] = [
    ResolutionStep::MapType,
    ResolutionStep::Preset,
    ResolutionStep::PointUsage,
    ResolutionStep::MapSize,
    ResolutionStep::Resources,
    ResolutionStep::GameSpeed,
    ResolutionStep::EndEpoch,
    ResolutionStep::Archetypes,
];

/// Seed string of the rule-resolution stream
pub fn rules_seed(match_seed: &str) -> String {
    format!("match-rules-{}", match_seed)
}

/// Resolve one field against its domain.
///
/// Pool entries outside the domain are ignored; an empty pool falls back to
/// the whole domain.
pub fn resolve_choice<T: Copy + PartialEq>(
    rng: &mut SeededRng,
    choice: &Choice<T>,
    domain: &[T],
) -> Result<T> {
    match choice {
        Choice::Fixed(value) => Ok(*value),
        Choice::Random(pool) => {
            let eligible: Vec<T> = pool.iter().copied().filter(|v| domain.contains(v)).collect();
            let candidates = if eligible.is_empty() { domain } else { &eligible[..] };
            rng.pick(candidates).copied()
        }
    }
}

/// Resolve the map type with era gating and the space/surface split
pub fn resolve_map(rng: &mut SeededRng, choice: &Choice<MapType>, gate_epoch: u8) -> Result<MapType> {
    let pool = match choice {
        Choice::Fixed(map) => return Ok(*map),
        Choice::Random(pool) if pool.is_empty() => MapType::ALL.to_vec(),
        Choice::Random(pool) => pool.clone(),
    };

    let mut eligible = pool;
    if gate_epoch < SPACE_MIN_EPOCH {
        eligible.retain(|map| !map.is_space());
    }
    if eligible.is_empty() {
        debug!(gate_epoch, "no eligible map after era gating, using default");
        return Ok(MapType::default());
    }

    let (space, surface): (Vec<MapType>, Vec<MapType>) =
        eligible.iter().copied().partition(|map| map.is_space());
    if !space.is_empty() && !surface.is_empty() {
        let group = if rng.next_f64() < SPACE_MAP_SHARE {
            &space
        } else {
            &surface
        };
        return rng.pick(group).copied();
    }

    rng.pick(&eligible).copied()
}

/// Lowest end epoch the configuration can resolve to
fn gate_epoch(raw: &RawConfig) -> u8 {
    match &raw.end_epoch {
        Choice::Fixed(end) => *end,
        Choice::Random(pool) => pool
            .iter()
            .copied()
            .filter(|e| (raw.start_epoch..=MAX_EPOCH).contains(e))
            .min()
            .unwrap_or(raw.start_epoch),
    }
}

/// Resolve a raw configuration into a concrete one.
///
/// Pure function of `raw`: the generator is keyed by the match seed.
pub fn resolve(raw: &RawConfig) -> Result<ResolvedConfig> {
    raw.validate()?;

    let mut rng = SeededRng::new(&rules_seed(&raw.seed));
    let mut resolved = ResolvedConfig {
        player_count: raw.player_count,
        player_names: raw.player_names.clone(),
        archetypes: Vec::with_capacity(raw.player_count),
        start_epoch: raw.start_epoch,
        end_epoch: raw.start_epoch,
        seed: raw.seed.clone(),
        preset: Preset::default(),
        point_usage: PointUsage::default(),
        map_type: MapType::default(),
        map_size: MapSize::default(),
        resources: ResourceLevel::default(),
        game_speed: GameSpeed::default(),
    };

    for step in RESOLUTION_ORDER {
        match step {
            ResolutionStep::MapType => {
                resolved.map_type = resolve_map(&mut rng, &raw.map_type, gate_epoch(raw))?;
            }
            ResolutionStep::Preset => {
                resolved.preset = resolve_choice(&mut rng, &raw.preset, Preset::ALL)?;
            }
            ResolutionStep::PointUsage => {
                resolved.point_usage = resolve_choice(&mut rng, &raw.point_usage, PointUsage::ALL)?;
            }
            ResolutionStep::MapSize => {
                resolved.map_size = resolve_choice(&mut rng, &raw.map_size, MapSize::ALL)?;
            }
            ResolutionStep::Resources => {
                resolved.resources = resolve_choice(&mut rng, &raw.resources, ResourceLevel::ALL)?;
            }
            ResolutionStep::GameSpeed => {
                resolved.game_speed = resolve_choice(&mut rng, &raw.game_speed, GameSpeed::ALL)?;
            }
            ResolutionStep::EndEpoch => {
                let domain: Vec<u8> = (raw.start_epoch..=MAX_EPOCH).collect();
                resolved.end_epoch = resolve_choice(&mut rng, &raw.end_epoch, &domain)?;
            }
            ResolutionStep::Archetypes => {
                for choice in &raw.archetypes {
                    let archetype = resolve_choice(&mut rng, choice, Archetype::ALL)?;
                    resolved.archetypes.push(archetype);
                }
            }
        }
    }

    debug!(
        seed = %resolved.seed,
        map = %resolved.map_type,
        preset = %resolved.preset,
        point_usage = %resolved.point_usage,
        end_epoch = resolved.end_epoch,
        "resolved match configuration"
    );

    Ok(resolved)
}
