use songbook_core::config::PaginationConfig;
use songbook_core::{Config, SanitizedConfig, SongService};

/// Shared application state
pub struct AppState {
    config: Config,
    songs: SongService,
}

impl AppState {
    pub fn new(config: Config, songs: SongService) -> Self {
        Self { config, songs }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn pagination(&self) -> &PaginationConfig {
        &self.config.pagination
    }

    pub fn songs(&self) -> &SongService {
        &self.songs
    }
}
