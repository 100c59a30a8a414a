// =============================================================================
// Engine Configuration
// =============================================================================
//
// Every field carries `#[serde(default)]` so that adding new fields never
// breaks loading an older config file, and a partial file only overrides
// what it names.
// =============================================================================

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::signals::ScoringPolicy;

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_assets() -> Vec<String> {
    vec![
        "bitcoin".to_string(),
        "ethereum".to_string(),
        "solana".to_string(),
    ]
}

fn default_data_dir() -> String {
    "data".to_string()
}

fn default_cache_ttl_secs() -> u64 {
    60
}

// =============================================================================
// EngineConfig
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Asset ids to analyse; each maps to `<data_dir>/<id>.json`.
    #[serde(default = "default_assets")]
    pub assets: Vec<String>,

    /// Directory holding market-chart JSON dumps.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// How long a loaded price history is reused before re-reading it.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// Seconds between analysis passes; 0 runs a single pass and exits.
    #[serde(default)]
    pub refresh_secs: u64,

    /// Aggregate signal weights and thresholds.
    #[serde(default)]
    pub scoring: ScoringPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            assets: default_assets(),
            data_dir: default_data_dir(),
            cache_ttl_secs: default_cache_ttl_secs(),
            refresh_secs: 0,
            scoring: ScoringPolicy::default(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// A missing or malformed file is an error so the caller can fall back
    /// to defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read engine config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse engine config from {}", path.display()))?;

        info!(
            path = %path.display(),
            assets = ?config.assets,
            refresh_secs = config.refresh_secs,
            "engine config loaded"
        );

        Ok(config)
    }

    /// Trim and lowercase every asset id and drop blanks, so ids from the
    /// file and from `PULSE_ASSETS` resolve to the same data file.
    pub fn normalize_assets(&mut self) {
        self.assets = normalize_ids(self.assets.iter().map(String::as_str));
    }
}

/// Parse a comma-separated asset list (`PULSE_ASSETS`), lowercasing ids and
/// skipping blanks.
pub fn parse_asset_list(raw: &str) -> Vec<String> {
    normalize_ids(raw.split(','))
}

fn normalize_ids<'a>(ids: impl Iterator<Item = &'a str>) -> Vec<String> {
    ids.map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_expected_values() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.assets, vec!["bitcoin", "ethereum", "solana"]);
        assert_eq!(cfg.data_dir, "data");
        assert_eq!(cfg.cache_ttl_secs, 60);
        assert_eq!(cfg.refresh_secs, 0);
        assert_eq!(cfg.scoring, ScoringPolicy::default());
    }

    #[test]
    fn deserialise_empty_json_uses_defaults() {
        let cfg: EngineConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg, EngineConfig::default());
    }

    #[test]
    fn deserialise_partial_json_fills_defaults() {
        let json = r#"{ "assets": ["dogecoin"], "scoring": { "strong_threshold": 50 } }"#;
        let cfg: EngineConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.assets, vec!["dogecoin"]);
        assert_eq!(cfg.cache_ttl_secs, 60);
        assert_eq!(cfg.scoring.strong_threshold, 50.0);
        assert_eq!(cfg.scoring.threshold, 15.0);
    }

    #[test]
    fn load_reads_file_and_reports_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pulse_config.json");
        std::fs::write(&path, r#"{ "refresh_secs": 300 }"#).unwrap();
        let cfg = EngineConfig::load(&path).unwrap();
        assert_eq!(cfg.refresh_secs, 300);

        let err = EngineConfig::load(dir.path().join("absent.json")).unwrap_err();
        assert!(err.to_string().contains("failed to read engine config"));

        std::fs::write(&path, "{ nope").unwrap();
        let err = EngineConfig::load(&path).unwrap_err();
        assert!(err.to_string().contains("failed to parse engine config"));
    }

    #[test]
    fn asset_list_parsing() {
        assert_eq!(
            parse_asset_list(" Bitcoin, ethereum ,,SOLANA "),
            vec!["bitcoin", "ethereum", "solana"]
        );
        assert!(parse_asset_list(" , ").is_empty());
    }

    #[test]
    fn config_asset_ids_normalised_like_env_list() {
        let json = r#"{ "assets": ["Bitcoin", " ETHEREUM ", ""] }"#;
        let mut cfg: EngineConfig = serde_json::from_str(json).unwrap();
        cfg.normalize_assets();
        assert_eq!(cfg.assets, parse_asset_list("Bitcoin, ETHEREUM ,"));
        assert_eq!(cfg.assets, vec!["bitcoin", "ethereum"]);
    }
}
