mod settings;

use config::{Config, ConfigError, Environment, File};

pub use settings::{
    BrokerSettings, DEFAULT_CAPACITY, DEFAULT_PORT, PartialBrokerSettings, PartialServerSettings,
    PartialSettings, ServerSettings, Settings,
};

/// Loads the configuration from `config/default.*` and `SPECULAR_*`
/// environment variables, merged over the defaults.
///
/// Nested keys use a double underscore: `SPECULAR_SERVER__PORT=9000`.
pub fn load_config() -> Result<Settings, ConfigError> {
    let builder = Config::builder()
        .add_source(File::with_name("config/default").required(false))
        .add_source(
            Environment::with_prefix("SPECULAR")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

    let config = builder.build()?;
    let partial: PartialSettings = config.try_deserialize()?;

    Ok(Settings::merge(partial))
}

#[cfg(test)]
mod tests;
