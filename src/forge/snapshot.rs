//! Export snapshot of a forged match

use super::ForgedMatch;
use crate::config::{ResolvedConfig, RESOLUTION_VERSION};
use crate::error::{ForgeError, Result};
use crate::generator::PlayerBuild;
use serde::{Deserialize, Serialize};

/// Current snapshot document version
pub const SNAPSHOT_SCHEMA_VERSION: u32 = 1;

/// Archival document: resolved configuration and every build
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSnapshot {
    pub schema_version: u32,
    /// Draw-order version the configuration was resolved under
    pub resolution_version: u32,
    pub config: ResolvedConfig,
    pub builds: Vec<PlayerBuild>,
}

impl MatchSnapshot {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a snapshot, rejecting documents newer than this crate
    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: MatchSnapshot = serde_json::from_str(json)?;
        if snapshot.schema_version > SNAPSHOT_SCHEMA_VERSION {
            return Err(ForgeError::UnsupportedSnapshot(snapshot.schema_version));
        }
        Ok(snapshot)
    }

    pub fn into_match(self) -> ForgedMatch {
        ForgedMatch {
            config: self.config,
            builds: self.builds,
        }
    }
}

impl From<&ForgedMatch> for MatchSnapshot {
    fn from(forged: &ForgedMatch) -> Self {
        Self {
            schema_version: SNAPSHOT_SCHEMA_VERSION,
            resolution_version: RESOLUTION_VERSION,
            config: forged.config.clone(),
            builds: forged.builds.clone(),
        }
    }
}

impl From<ForgedMatch> for MatchSnapshot {
    fn from(forged: ForgedMatch) -> Self {
        Self {
            schema_version: SNAPSHOT_SCHEMA_VERSION,
            resolution_version: RESOLUTION_VERSION,
            config: forged.config,
            builds: forged.builds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RawConfig;
    use crate::forge::CivForge;

    #[test]
    fn test_snapshot_json_round_trip() {
        let forged = CivForge::builtin().forge(&RawConfig::default()).unwrap();
        let snapshot = MatchSnapshot::from(&forged);
        let json = snapshot.to_json().unwrap();
        assert!(json.contains("\"schema_version\": 1"));
        assert!(json.contains("\"player_name\": \"Taco\""));

        let parsed = MatchSnapshot::from_json(&json).unwrap();
        assert_eq!(parsed, snapshot);
        assert_eq!(parsed.into_match(), forged);
    }

    #[test]
    fn test_snapshot_rejects_newer_schema() {
        let forged = CivForge::builtin().forge(&RawConfig::default()).unwrap();
        let mut snapshot = MatchSnapshot::from(forged);
        snapshot.schema_version = SNAPSHOT_SCHEMA_VERSION + 1;
        let json = snapshot.to_json().unwrap();
        assert!(matches!(
            MatchSnapshot::from_json(&json),
            Err(ForgeError::UnsupportedSnapshot(2))
        ));
        assert!(matches!(
            MatchSnapshot::from_json("{\"schema_version\": 1}"),
            Err(ForgeError::Json(_))
        ));
    }
}
