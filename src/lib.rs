pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use crate::config::cli::LocalStorage;
#[cfg(feature = "cli")]
pub use crate::config::CliConfig;
pub use crate::config::settings::SettingsStore;
pub use crate::config::toml_config::TomlConfig;

pub use crate::core::{
    engine::{EngineOutput, TallyEngine},
    lookup::{LookupEngine, LookupEvent},
    pipeline::LookupPipeline,
    roster::Roster,
};
pub use crate::utils::error::{Result, TallyError};
