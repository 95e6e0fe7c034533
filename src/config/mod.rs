use config::{builder::DefaultState, Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use url::Url;

/// Environment variable holding the key sent to the upstream in the `api_key` header
pub const API_KEY_VAR: &str = "API_KEY";

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UpstreamConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    pub cookie_name: String,
    pub max_age_secs: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    pub enabled: bool,
    pub allowed_origins: Vec<String>,
    pub max_age: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub environment: String,
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
    pub session: SessionConfig,
    pub cors: CorsConfig,
}

fn with_defaults(
    builder: ConfigBuilder<DefaultState>,
    environment: &str,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    builder
        .set_default("environment", environment)?
        .set_default("server.host", "127.0.0.1")?
        .set_default("server.port", 8080)?
        .set_default("server.workers", num_cpus::get() as i64)?
        .set_default("upstream.base_url", "http://127.0.0.1:8000")?
        .set_default("upstream.api_key", "")?
        .set_default("upstream.timeout_secs", 30)?
        .set_default("session.cookie_name", "token")?
        .set_default("session.max_age_secs", 60 * 60)?
        .set_default("cors.enabled", false)?
        .set_default("cors.allowed_origins", Vec::<String>::new())?
        .set_default("cors.max_age", 3600)
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = with_defaults(Config::builder(), "development")?
            // Add in settings from the config file if it exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // E.g., `APP_UPSTREAM__BASE_URL=http://api:8000` would set `Settings.upstream.base_url`
            .add_source(
                Environment::with_prefix("app")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("cors.allowed_origins")
                    .try_parsing(true),
            )
            // The plain `API_KEY` variable wins over every other source
            .set_override_option("upstream.api_key", env::var(API_KEY_VAR).ok())?
            .build()?;

        let settings: Self = s.try_deserialize()?;
        settings.validate()?;

        Ok(settings)
    }

    /// Built-in defaults only, without files or environment.
    pub fn defaults() -> Result<Self, ConfigError> {
        with_defaults(Config::builder(), "test")?
            .build()?
            .try_deserialize()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        Url::parse(&self.upstream.base_url).map_err(|e| {
            ConfigError::Message(format!(
                "invalid upstream.base_url '{}': {}",
                self.upstream.base_url, e
            ))
        })?;

        if self.session.cookie_name.is_empty() {
            return Err(ConfigError::Message("session.cookie_name must not be empty".into()));
        }

        Ok(())
    }
}
