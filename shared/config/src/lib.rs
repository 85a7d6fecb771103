use serde::Deserialize;

/// Application configuration loaded from environment variables.
///
/// Carries exactly the fields the CLI surface (spec §6) and the store
/// adapter need; the `server` subcommand's `--host`/`--port`/`--debug`
/// flags layer over these environment-sourced defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Database connection URL.
    #[serde(default)]
    pub database_url: String,

    /// Server host address.
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Raises the tracing filter to `trace` when set.
    #[serde(default)]
    pub debug: bool,

    /// Max Postgres pool connections.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_max_connections() -> u32 {
    10
}

impl Config {
    /// Load configuration from environment variables, with an optional
    /// `.env` file layered in first.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        let _ = dotenvy::dotenv();

        let builder = config::Config::builder()
            .set_default("database_url", "")?
            .set_default("host", default_host())?
            .set_default("port", default_port() as i64)?
            .set_default("debug", false)?
            .set_default("max_connections", default_max_connections() as i64)?
            .add_source(config::Environment::default());

        builder.build()?.try_deserialize::<Config>()
    }
}
