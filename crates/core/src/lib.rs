pub mod catalog;
pub mod config;
pub mod dispatch;
pub mod external;
pub mod fsutil;
pub mod stages;
pub mod status;
pub mod testing;

pub use catalog::{
    AssetLayout, AssetStatus, AssetType, Catalog, CatalogError, Episode, EpisodeName, Season,
};
pub use config::{
    load_config, load_config_from_env, load_config_from_str, validate_config, Config,
    ConfigError, SanitizedConfig,
};
pub use dispatch::{ActionError, Selector, SolveError};
pub use stages::{RunError, RunSummary, SkipReason, StageError, StageOutcome, StageRunner};
pub use status::{investigate, StatusError, StatusReport, StatusRow};
