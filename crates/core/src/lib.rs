pub mod config;
pub mod enrichment;
pub mod liveness;
pub mod metadata;
pub mod metrics;
pub mod pagination;
pub mod song;
pub mod testing;
pub mod verses;

pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, SanitizedConfig,
};
pub use enrichment::{
    create_enrichment_system, details_to_changes, enrich, EnrichmentHandle, EnrichmentJob,
    EnrichmentOutcome, EnrichmentWorker,
};
pub use liveness::{LivenessMonitor, StoreUnreachable};
pub use metadata::{HttpMetadataSource, MetadataError, MetadataSource, SongDetails};
pub use pagination::{total_pages, PageOutOfRange, PageRequest, PageWindow};
pub use song::{
    FieldError, FieldValue, Predicate, Song, SongChanges, SongError, SongField, SongFilter,
    SongPage, SongService, SongStore, SqliteSongStore,
};
pub use verses::{paginate_verses, split_verses, VersePage};
