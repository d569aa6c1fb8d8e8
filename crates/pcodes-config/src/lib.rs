//! Harvester configuration: the TOML project file, per-country exceptions,
//! and the country reference registry.

pub mod countries;
pub mod error;
pub mod project;

pub use countries::CountryRegistry;
pub use error::{ConfigError, Result};
pub use project::{
    CatalogSettings, CountryOverride, CountryRules, DatasetSettings, DownloadSettings,
    LevelOverride, MissingUnit, ProjectConfig, ResourceSettings, ResourceSpec,
};
