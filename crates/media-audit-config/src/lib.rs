pub mod config;
pub mod paths;

pub use config::{Config, OverseerrConfig, PlexConfig, RadarrConfig, SonarrConfig};
pub use paths::{container_base_path, PathManager};
