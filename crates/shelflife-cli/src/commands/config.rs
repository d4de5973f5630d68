use crate::output::{Output, OutputFormat};
use color_eyre::Result;
use media_audit_config::Config;
use serde_json::json;

pub fn run_config(output: &Output) -> Result<()> {
    let config = Config::from_env()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to load configuration: {}", e))?;

    match output.format() {
        OutputFormat::Human => {
            println!("Plex:      {} (token {})", config.plex.url, mask(&config.plex.token));
            println!(
                "Overseerr: {} (key {})",
                config.overseerr.url,
                mask(&config.overseerr.api_key)
            );
            println!(
                "Radarr:    {} (key {})",
                config.radarr.url,
                mask(&config.radarr.api_key)
            );
            println!(
                "Sonarr:    {} (key {})",
                config.sonarr.url,
                mask(&config.sonarr.api_key)
            );
            println!("Staleness window: {} months", config.stale_months);
        }
        OutputFormat::Json | OutputFormat::JsonPretty => {
            output.print_json(&json!({
                "plex": { "url": config.plex.url, "token": mask(&config.plex.token) },
                "overseerr": { "url": config.overseerr.url, "api_key": mask(&config.overseerr.api_key) },
                "radarr": { "url": config.radarr.url, "api_key": mask(&config.radarr.api_key) },
                "sonarr": { "url": config.sonarr.url, "api_key": mask(&config.sonarr.api_key) },
                "stale_months": config.stale_months,
            }));
        }
    }
    Ok(())
}

fn mask(secret: &str) -> String {
    if secret.chars().count() <= 4 {
        "****".to_string()
    } else {
        let prefix: String = secret.chars().take(4).collect();
        format!("{}****", prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_short_secret() {
        assert_eq!(mask("abc"), "****");
    }

    #[test]
    fn test_mask_long_secret() {
        assert_eq!(mask("abcdefgh"), "abcd****");
    }
}
