use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Process-wide configuration: four service endpoints plus the staleness
/// window. Constructed once and passed to every component; nothing reads
/// the environment after startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub plex: PlexConfig,
    pub overseerr: OverseerrConfig,
    pub radarr: RadarrConfig,
    pub sonarr: SonarrConfig,
    /// Items untouched for longer than this many months count as stale.
    #[serde(default = "default_stale_months")]
    pub stale_months: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlexConfig {
    pub url: String,
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverseerrConfig {
    pub url: String,
    pub api_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RadarrConfig {
    pub url: String,
    pub api_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SonarrConfig {
    pub url: String,
    pub api_key: String,
}

fn default_stale_months() -> u32 {
    3
}

fn require_env(name: &str) -> Result<String> {
    std::env::var(name).map_err(|_| anyhow!("{} is not set", name))
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let stale_months = match std::env::var("STALE_MONTHS") {
            Ok(raw) => raw
                .parse::<u32>()
                .with_context(|| format!("STALE_MONTHS is not a valid month count: {}", raw))?,
            Err(_) => default_stale_months(),
        };

        Ok(Self {
            plex: PlexConfig {
                url: require_env("PLEX_URL")?,
                token: require_env("PLEX_TOKEN")?,
            },
            overseerr: OverseerrConfig {
                url: require_env("OVERSEERR_API_URL")?,
                api_key: require_env("OVERSEERR_API_KEY")?,
            },
            radarr: RadarrConfig {
                url: require_env("RADARR_API_URL")?,
                api_key: require_env("RADARR_API_KEY")?,
            },
            sonarr: SonarrConfig {
                url: require_env("SONARR_API_URL")?,
                api_key: require_env("SONARR_API_KEY")?,
            },
            stale_months,
        })
    }

    pub fn load_from_file(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to_file(&self, path: &PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        for (name, url) in [
            ("Plex", &self.plex.url),
            ("Overseerr", &self.overseerr.url),
            ("Radarr", &self.radarr.url),
            ("Sonarr", &self.sonarr.url),
        ] {
            if url.is_empty() {
                return Err(anyhow!("{} URL is empty", name));
            }
        }
        if self.stale_months == 0 {
            return Err(anyhow!("stale_months must be at least 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn test_config() -> Config {
        Config {
            plex: PlexConfig {
                url: "http://plex.local:32400".to_string(),
                token: "plex-token".to_string(),
            },
            overseerr: OverseerrConfig {
                url: "http://overseerr.local/api/v1".to_string(),
                api_key: "overseerr-key".to_string(),
            },
            radarr: RadarrConfig {
                url: "http://radarr.local/api/v3".to_string(),
                api_key: "radarr-key".to_string(),
            },
            sonarr: SonarrConfig {
                url: "http://sonarr.local/api/v3".to_string(),
                api_key: "sonarr-key".to_string(),
            },
            stale_months: 3,
        }
    }

    #[test]
    fn test_config_load_and_save() {
        let file = NamedTempFile::new().unwrap();
        let config = test_config();

        let path = file.path().to_path_buf();
        config.save_to_file(&path).unwrap();

        let loaded = Config::load_from_file(&path).unwrap();
        assert_eq!(loaded.plex.token, "plex-token");
        assert_eq!(loaded.sonarr.api_key, "sonarr-key");
        assert_eq!(loaded.stale_months, 3);
    }

    #[test]
    fn test_stale_months_defaults_when_missing_from_file() {
        let file = NamedTempFile::new().unwrap();
        let path = file.path().to_path_buf();
        std::fs::write(
            &path,
            r#"
[plex]
url = "http://plex.local:32400"
token = "t"

[overseerr]
url = "http://overseerr.local"
api_key = "k"

[radarr]
url = "http://radarr.local"
api_key = "k"

[sonarr]
url = "http://sonarr.local"
api_key = "k"
"#,
        )
        .unwrap();

        let loaded = Config::load_from_file(&path).unwrap();
        assert_eq!(loaded.stale_months, 3);
    }

    #[test]
    fn test_config_validate() {
        let mut config = test_config();
        assert!(config.validate().is_ok());

        config.radarr.url.clear();
        assert!(config.validate().is_err());

        let mut config = test_config();
        config.stale_months = 0;
        assert!(config.validate().is_err());
    }
}
