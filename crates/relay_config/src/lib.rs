//! Configuration for the relay services.
//!
//! Values come from an optional TOML file (`config/default.toml` unless a
//! path is given) and `RELAY_`-prefixed environment variables, with `__`
//! separating nested keys (`RELAY_BROKER__URL`, `RELAY_BINDINGS__INPUT`).
//! Anything left unset keeps its default.

pub mod settings;


use crate::settings::PartialSettings;
use config::{Config, Environment, File};

pub use config::ConfigError;
pub use settings::{BindingSettings, BrokerSettings, LoggingSettings, ServerSettings, Settings};

pub const DEFAULT_CONFIG_PATH: &str = "config/default";

pub fn load_config() -> Result<Settings, ConfigError> {
    load_config_from(DEFAULT_CONFIG_PATH)
}

/// Load settings from the file at `path` (extension optional) and the
/// environment. A missing file is not an error.
pub fn load_config_from(path: &str) -> Result<Settings, ConfigError> {
    let builder = Config::builder()
        .add_source(File::with_name(path).required(false))
        .add_source(
            Environment::with_prefix("RELAY")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

    let config = builder.build()?;
    let partial: PartialSettings = config.try_deserialize()?;

    Ok(Settings::default().merge(partial))
}
