pub mod error;
mod http;
mod json;
pub mod overseerr;
pub mod plex;
pub mod radarr;
pub mod sonarr;

pub use error::SourceError;
pub use overseerr::{OverseerrClient, MAX_REQUEST_PAGES};
pub use plex::{LibrarySection, PlexClient};
pub use radarr::RadarrClient;
pub use sonarr::SonarrClient;
