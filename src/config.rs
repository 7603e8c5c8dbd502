use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

/// Runtime configuration.
///
/// Layered, later sources win:
/// - built-in defaults
/// - `config.toml` in the working directory (optional)
/// - `RECORDS_*` environment variables
/// - plain `DATABASE_URL`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub database_url: String,
    pub listen_addr: String,
    pub loglevel: String,
    pub max_connections: u32,
    /// Maximum accepted request body, in bytes.
    pub body_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite:records.db".to_string(),
            listen_addr: "0.0.0.0:8000".to_string(),
            loglevel: "info".to_string(),
            max_connections: 5,
            body_limit: 1024 * 1024,
        }
    }
}

impl Config {
    pub const FILE: &'static str = "config.toml";
    pub const ENV_PREFIX: &'static str = "RECORDS_";

    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(Self::FILE))
            .merge(Env::prefixed(Self::ENV_PREFIX))
            .merge(Env::raw().only(&["DATABASE_URL"]))
    }

    pub fn load() -> Result<Self, figment::Error> {
        Self::figment().extract()
    }
}
