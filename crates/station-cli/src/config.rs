use std::path::PathBuf;

use anyhow::{Result, anyhow};
use station_gen::AiModel;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub db_path: PathBuf,
    pub model: AiModel,
    /// Absent means AI generation is unavailable.
    pub api_key: Option<String>,
    pub export_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let db_path = lookup("STATION_DB_PATH").unwrap_or_else(|| "station.db".into());
        let model = match lookup("STATION_AI_MODEL") {
            Some(id) => id.parse::<AiModel>().map_err(|e: String| anyhow!("STATION_AI_MODEL: {}", e))?,
            None => AiModel::default(),
        };
        let api_key = lookup("GEMINI_API_KEY")
            .or_else(|| lookup("API_KEY"))
            .filter(|key| !key.trim().is_empty());
        let export_dir = lookup("STATION_EXPORT_DIR").unwrap_or_else(|| ".".into());

        Ok(Self {
            db_path: PathBuf::from(db_path),
            model,
            api_key,
            export_dir: PathBuf::from(export_dir),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = load(&[]).unwrap();
        assert_eq!(config.db_path, PathBuf::from("station.db"));
        assert_eq!(config.model, AiModel::Gemini25Flash);
        assert_eq!(config.api_key, None);
        assert_eq!(config.export_dir, PathBuf::from("."));
    }

    #[test]
    fn gemini_key_takes_precedence() {
        let config = load(&[("API_KEY", "fallback"), ("GEMINI_API_KEY", "primary")]).unwrap();
        assert_eq!(config.api_key.as_deref(), Some("primary"));

        let config = load(&[("API_KEY", "fallback")]).unwrap();
        assert_eq!(config.api_key.as_deref(), Some("fallback"));
    }

    #[test]
    fn blank_key_counts_as_missing() {
        assert_eq!(load(&[("GEMINI_API_KEY", " ")]).unwrap().api_key, None);
    }

    #[test]
    fn unknown_model_is_rejected() {
        assert!(load(&[("STATION_AI_MODEL", "gemini-1.0")]).is_err());
        let config = load(&[("STATION_AI_MODEL", "gemini-2.5-pro")]).unwrap();
        assert_eq!(config.model, AiModel::Gemini25Pro);
    }
}
