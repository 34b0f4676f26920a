use crate::error::AuszugError;
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_MAX_DESCRIPTION_LEN: usize = 750;
pub const DEFAULT_REMARK_SEPARATOR: &str = " | ";

/// Tunables shared by all format engines.
///
/// Every field is optional in the JSON file; missing fields take the
/// defaults below.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Upper bound (in characters) for an assembled description.
    pub max_description_len: usize,
    /// Delimiter used when remarks are rendered as a single string.
    pub remark_separator: String,
    /// Seed year for statements whose dates carry no year.
    /// Falls back to the current calendar year.
    pub base_year: Option<i32>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_description_len: DEFAULT_MAX_DESCRIPTION_LEN,
            remark_separator: DEFAULT_REMARK_SEPARATOR.to_string(),
            base_year: None,
        }
    }
}

impl EngineConfig {
    /// The year used before any explicit year token has been seen.
    pub fn seed_year(&self) -> i32 {
        self.base_year.unwrap_or_else(|| chrono::Local::now().year())
    }
}

/// Load an engine config from a JSON file.
pub fn load_config(path: &Path) -> Result<EngineConfig, AuszugError> {
    let content = std::fs::read_to_string(path).map_err(|e| AuszugError::ConfigLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let config: EngineConfig =
        serde_json::from_str(&content).map_err(|e| AuszugError::ConfigLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
    validate_config(&config)?;
    Ok(config)
}

/// Parse an engine config from a JSON string (no file path context).
pub fn parse_config_str(json: &str) -> Result<EngineConfig, AuszugError> {
    let config: EngineConfig = serde_json::from_str(json)?;
    validate_config(&config)?;
    Ok(config)
}

pub fn validate_config(config: &EngineConfig) -> Result<(), AuszugError> {
    if config.max_description_len == 0 {
        return Err(AuszugError::ConfigInvalid(
            "max_description_len must be greater than zero".into(),
        ));
    }

    if let Some(year) = config.base_year {
        if !(1900..=2200).contains(&year) {
            return Err(AuszugError::ConfigInvalid(format!(
                "base_year {year} is out of range (expected 1900..=2200)"
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_uses_defaults() {
        let config = parse_config_str("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.max_description_len, 750);
        assert_eq!(config.remark_separator, " | ");
    }

    #[test]
    fn test_partial_override() {
        let config = parse_config_str(r#"{ "base_year": 2024, "remark_separator": "; " }"#).unwrap();
        assert_eq!(config.base_year, Some(2024));
        assert_eq!(config.seed_year(), 2024);
        assert_eq!(config.remark_separator, "; ");
        assert_eq!(config.max_description_len, 750);
    }

    #[test]
    fn test_zero_description_len_rejected() {
        let err = parse_config_str(r#"{ "max_description_len": 0 }"#).unwrap_err();
        assert!(matches!(err, AuszugError::ConfigInvalid(_)));
    }

    #[test]
    fn test_absurd_year_rejected() {
        assert!(parse_config_str(r#"{ "base_year": 12 }"#).is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_config(Path::new("/nonexistent/auszug.json")).unwrap_err();
        assert!(matches!(err, AuszugError::ConfigLoad { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("auszug.json");
        std::fs::write(&path, r#"{ "max_description_len": 120 }"#).unwrap();
        let config = load_config(&path).unwrap();
        assert_eq!(config.max_description_len, 120);
    }
}
