//! Share-link encoding of raw configurations
//!
//! The token is the configuration's JSON in URL-safe, unpadded base64, so it
//! can sit in a query string without escaping.

use crate::config::RawConfig;
use crate::error::Result;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use tracing::debug;

/// Query parameter carrying the token
pub const SHARE_PARAM: &str = "m";

pub fn encode_config(config: &RawConfig) -> Result<String> {
    let json = serde_json::to_vec(config)?;
    Ok(URL_SAFE_NO_PAD.encode(json))
}

/// Decode a share token; `None` when the token is malformed
pub fn decode_config(token: &str) -> Option<RawConfig> {
    let bytes = match URL_SAFE_NO_PAD.decode(token.trim()) {
        Ok(bytes) => bytes,
        Err(e) => {
            debug!(error = %e, "share token is not valid base64");
            return None;
        }
    };
    match serde_json::from_slice(&bytes) {
        Ok(config) => Some(config),
        Err(e) => {
            debug!(error = %e, "share token does not hold a configuration");
            None
        }
    }
}

/// `m=<token>` query fragment
pub fn share_query(config: &RawConfig) -> Result<String> {
    Ok(format!("{}={}", SHARE_PARAM, encode_config(config)?))
}

/// Read the configuration back out of a query string
pub fn config_from_query(query: &str) -> Option<RawConfig> {
    query
        .trim_start_matches('?')
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == SHARE_PARAM)
        .and_then(|(_, token)| decode_config(token))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Archetype, Choice, MapType};

    #[test]
    fn test_round_trip_non_ascii_names() {
        let mut config = RawConfig::for_players("EF-77", ["Zoë", "東京", "Ärger 🚀"]);
        config.archetypes[1] = Choice::Fixed(Archetype::Naval);
        config.map_type = Choice::Random(Vec::new());
        let token = encode_config(&config).unwrap();
        assert!(token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
        assert_eq!(decode_config(&token), Some(config));
    }

    #[test]
    fn test_malformed_tokens() {
        assert_eq!(decode_config("***"), None);
        assert_eq!(decode_config(""), None);
        // Valid base64 of "hello"
        assert_eq!(decode_config("aGVsbG8"), None);
    }

    #[test]
    fn test_query_round_trip() {
        let mut config = RawConfig::default();
        config.map_type = Choice::Random(vec![MapType::Water, MapType::Islands]);
        let query = share_query(&config).unwrap();
        assert!(query.starts_with("m="));
        assert_eq!(config_from_query(&format!("?lang=en&{}", query)), Some(config));
        assert_eq!(config_from_query("?lang=en"), None);
    }
}
