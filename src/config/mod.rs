//! Match configuration module
//!
//! A [`RawConfig`] is what the lobby hands over: every randomizable field is a
//! [`Choice`]. [`resolve`] turns it into a concrete [`ResolvedConfig`] using the
//! seeded generator.

mod resolver;


pub use resolver::*;

use crate::error::{ForgeError, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const MIN_EPOCH: u8 = 1;
pub const MAX_EPOCH: u8 = 15;
/// Space Age; space-category maps are not drawn before it
pub const SPACE_MIN_EPOCH: u8 = 14;
pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 10;

pub const DEFAULT_NAMES: [&str; MAX_PLAYERS] = [
    "Taco", "Piert", "DjonLuc", "Justin", "Naldo", "Pash", "Kuban", "Player 8", "Player 9",
    "Player 10",
];

/// Finite domain of a randomizable field
pub trait Domain: Copy + PartialEq + 'static {
    const ALL: &'static [Self];
}

macro_rules! domain_enum {
    ($(#[$meta:meta])* $name:ident { #[default] $default:ident, $($variant:ident),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
        pub enum $name {
            #[default]
            $default,
            $($variant),+
        }

        impl $name {
            pub fn as_str(self) -> &'static str {
                match self {
                    $name::$default => stringify!($default),
                    $($name::$variant => stringify!($variant)),+
                }
            }
        }

        impl Domain for $name {
            const ALL: &'static [Self] = &[$name::$default, $($name::$variant),+];
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

domain_enum! {
    /// Map type; Space and Orbital form the space category
    MapType { #[default] Land, Water, Mixed, Islands, Coastal, Rivers, Space, Orbital }
}

domain_enum! {
    /// Ruleset preset reweighting selection
    Preset { #[default] Casual, Tournament, Chaos, Historical }
}

domain_enum! {
    /// Stopping rule for spending the point budget
    PointUsage { #[default] Efficient, Exact, Loose }
}

domain_enum! {
    /// Declared strategic leaning of a player
    Archetype { #[default] Balanced, Economic, Aggressive, Defensive, Naval }
}

domain_enum! {
    MapSize { #[default] Medium, Small, Large }
}

domain_enum! {
    ResourceLevel { #[default] Standard, Low, High }
}

domain_enum! {
    GameSpeed { #[default] Normal, Slow, Fast }
}

impl MapType {
    #[inline]
    pub fn is_space(self) -> bool {
        matches!(self, MapType::Space | MapType::Orbital)
    }
}

/// A randomizable field: fixed value or random draw from an allowed pool.
///
/// An empty pool means the field's full domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "value", rename_all = "snake_case")]
pub enum Choice<T> {
    Fixed(T),
    Random(Vec<T>),
}

impl<T> Choice<T> {
    /// Random over the full domain
    pub fn any() -> Self {
        Choice::Random(Vec::new())
    }

    pub fn is_random(&self) -> bool {
        matches!(self, Choice::Random(_))
    }
}

impl<T: Default> Default for Choice<T> {
    fn default() -> Self {
        Choice::Fixed(T::default())
    }
}

/// Pre-resolution configuration supplied by the lobby
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawConfig {
    pub player_count: usize,
    pub player_names: Vec<String>,
    pub archetypes: Vec<Choice<Archetype>>,
    pub start_epoch: u8,
    pub end_epoch: Choice<u8>,
    pub seed: String,
    pub preset: Choice<Preset>,
    pub point_usage: Choice<PointUsage>,
    pub map_type: Choice<MapType>,
    #[serde(default)]
    pub map_size: Choice<MapSize>,
    #[serde(default)]
    pub resources: Choice<ResourceLevel>,
    #[serde(default)]
    pub game_speed: Choice<GameSpeed>,
}

impl Default for RawConfig {
    fn default() -> Self {
        Self {
            player_count: MIN_PLAYERS,
            player_names: DEFAULT_NAMES[..MIN_PLAYERS]
                .iter()
                .map(|name| name.to_string())
                .collect(),
            archetypes: vec![Choice::any(); MIN_PLAYERS],
            start_epoch: MIN_EPOCH,
            end_epoch: Choice::Fixed(MAX_EPOCH),
            seed: "EF-1".to_string(),
            preset: Choice::default(),
            point_usage: Choice::default(),
            map_type: Choice::default(),
            map_size: Choice::default(),
            resources: Choice::default(),
            game_speed: Choice::default(),
        }
    }
}

impl RawConfig {
    /// Default lobby configuration with a fresh `EF-<n>` seed
    pub fn with_random_seed() -> Self {
        let n: u32 = rand::thread_rng().gen_range(0..10_000);
        Self {
            seed: format!("EF-{}", n),
            ..Self::default()
        }
    }

    /// Configuration for the given players, every archetype random
    pub fn for_players<S: Into<String>>(seed: &str, names: impl IntoIterator<Item = S>) -> Self {
        let player_names: Vec<String> = names.into_iter().map(Into::into).collect();
        Self {
            player_count: player_names.len(),
            archetypes: vec![Choice::any(); player_names.len()],
            player_names,
            seed: seed.to_string(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&self.player_count) {
            return Err(ForgeError::InvalidConfig(format!(
                "player count {} outside {}..={}",
                self.player_count, MIN_PLAYERS, MAX_PLAYERS
            )));
        }
        if self.player_names.len() != self.player_count {
            return Err(ForgeError::InvalidConfig(format!(
                "{} player names for {} players",
                self.player_names.len(),
                self.player_count
            )));
        }
        if self.archetypes.len() != self.player_count {
            return Err(ForgeError::InvalidConfig(format!(
                "{} archetypes for {} players",
                self.archetypes.len(),
                self.player_count
            )));
        }
        if !(MIN_EPOCH..=MAX_EPOCH).contains(&self.start_epoch) {
            return Err(ForgeError::InvalidConfig(format!(
                "start epoch {} outside {}..={}",
                self.start_epoch, MIN_EPOCH, MAX_EPOCH
            )));
        }
        if let Choice::Fixed(end) = self.end_epoch {
            if !(self.start_epoch..=MAX_EPOCH).contains(&end) {
                return Err(ForgeError::InvalidConfig(format!(
                    "end epoch {} outside {}..={}",
                    end, self.start_epoch, MAX_EPOCH
                )));
            }
        }
        if self.seed.trim().is_empty() {
            return Err(ForgeError::InvalidConfig("seed is empty".to_string()));
        }
        Ok(())
    }
}

/// Fully concrete match configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedConfig {
    pub player_count: usize,
    pub player_names: Vec<String>,
    pub archetypes: Vec<Archetype>,
    pub start_epoch: u8,
    pub end_epoch: u8,
    pub seed: String,
    pub preset: Preset,
    pub point_usage: PointUsage,
    pub map_type: MapType,
    pub map_size: MapSize,
    pub resources: ResourceLevel,
    pub game_speed: GameSpeed,
}

impl ResolvedConfig {
    /// Concrete configuration with default rules for the given players
    pub fn new(seed: &str, players: &[(&str, Archetype)]) -> Self {
        Self {
            player_count: players.len(),
            player_names: players.iter().map(|(name, _)| name.to_string()).collect(),
            archetypes: players.iter().map(|(_, archetype)| *archetype).collect(),
            start_epoch: MIN_EPOCH,
            end_epoch: MAX_EPOCH,
            seed: seed.to_string(),
            preset: Preset::default(),
            point_usage: PointUsage::default(),
            map_type: MapType::default(),
            map_size: MapSize::default(),
            resources: ResourceLevel::default(),
            game_speed: GameSpeed::default(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.player_names.len() != self.player_count
            || self.archetypes.len() != self.player_count
        {
            return Err(ForgeError::InvalidConfig(format!(
                "{} names and {} archetypes for {} players",
                self.player_names.len(),
                self.archetypes.len(),
                self.player_count
            )));
        }
        if self.end_epoch < self.start_epoch {
            return Err(ForgeError::InvalidConfig(format!(
                "end epoch {} before start epoch {}",
                self.end_epoch, self.start_epoch
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = RawConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.player_names, vec!["Taco", "Piert"]);
    }

    #[test]
    fn test_random_seed_has_lobby_shape() {
        let config = RawConfig::with_random_seed();
        assert!(config.seed.starts_with("EF-"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_mismatched_lengths() {
        let mut config = RawConfig::default();
        config.player_names.push("Extra".to_string());
        assert!(matches!(config.validate(), Err(ForgeError::InvalidConfig(_))));

        let mut config = RawConfig::default();
        config.archetypes.pop();
        assert!(matches!(config.validate(), Err(ForgeError::InvalidConfig(_))));
    }

    #[test]
    fn test_validate_rejects_bad_epochs() {
        let mut config = RawConfig::default();
        config.start_epoch = 10;
        config.end_epoch = Choice::Fixed(5);
        assert!(config.validate().is_err());

        config.start_epoch = 0;
        config.end_epoch = Choice::Fixed(5);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_player_counts() {
        let config = RawConfig::for_players("s", ["Solo"]);
        assert!(config.validate().is_err());
        let names: Vec<String> = (0..11).map(|i| format!("P{}", i)).collect();
        assert!(RawConfig::for_players("s", names).validate().is_err());
    }

    #[test]
    fn test_choice_serde_shape() {
        let fixed: Choice<MapType> = Choice::Fixed(MapType::Islands);
        assert_eq!(
            serde_json::to_string(&fixed).unwrap(),
            r#"{"mode":"fixed","value":"Islands"}"#
        );
        let random: Choice<MapType> = Choice::any();
        assert_eq!(
            serde_json::to_string(&random).unwrap(),
            r#"{"mode":"random","value":[]}"#
        );
    }

    #[test]
    fn test_space_maps() {
        let space: Vec<MapType> = MapType::ALL.iter().copied().filter(|m| m.is_space()).collect();
        assert_eq!(space, vec![MapType::Space, MapType::Orbital]);
        assert_eq!(MapType::Coastal.to_string(), "Coastal");
    }
}
