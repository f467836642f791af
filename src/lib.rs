//! Civ Forge - deterministic civilization build generator
//!
//! Given a match configuration and a seed, this crate allocates a fixed point
//! budget per player across a catalog of boosts and powers, producing a
//! reproducible, explainable build for each player. Python bindings are
//! available behind the `python` feature.
//!
//! ```
//! use civ_forge::{CivForge, RawConfig};
//!
//! let forge = CivForge::builtin();
//! let forged = forge.forge(&RawConfig::default()).unwrap();
//! assert_eq!(forged.builds.len(), 2);
//! assert!(forged.builds.iter().all(|build| build.points_spent <= 100));
//! ```

pub mod catalog;
pub mod config;
pub mod deriver;
pub mod error;
pub mod forge;
pub mod generator;
pub mod rng;
pub mod weight;

#[cfg(feature = "python")]
mod bindings;

pub use crate::catalog::Catalog;
pub use crate::config::{resolve, Choice, RawConfig, ResolvedConfig};
pub use crate::error::{ForgeError, Result};
pub use crate::forge::{CivForge, ForgedMatch, MatchSnapshot, RerollOutcome};
pub use crate::generator::{generate, GeneratedItem, PlayerBuild};
pub use crate::rng::SeededRng;
