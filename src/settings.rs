use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Server {
    pub listen: String,
}

#[derive(Debug, Deserialize)]
pub struct Insights {
    pub url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

/// Artificial latency of the simulated operations, in milliseconds.
#[derive(Debug, Deserialize)]
pub struct Simulation {
    pub transfer_delay_ms: u64,
    pub donation_delay_ms: u64,
    pub account_delay_ms: u64,
    pub contact_delay_ms: u64,
    pub broadcast_delay_ms: u64,
    pub injection_delay_ms: u64,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub server: Server,
    pub insights: Insights,
    pub simulation: Simulation,
}

impl Settings {
    /// Defaults, then the optional TOML file at `path`, then `NEXGEN_*`
    /// variables (`NEXGEN_INSIGHTS__MODEL`). A bare `API_KEY` wins over
    /// everything for the insights key.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .set_default("server.listen", "0.0.0.0:8080")?
            .set_default("insights.url", "https://generativelanguage.googleapis.com")?
            .set_default("insights.model", "gemini-3-flash-preview")?
            .set_default("insights.timeout_secs", 15)?
            .set_default("simulation.transfer_delay_ms", 2000)?
            .set_default("simulation.donation_delay_ms", 2000)?
            .set_default("simulation.account_delay_ms", 2000)?
            .set_default("simulation.contact_delay_ms", 1500)?
            .set_default("simulation.broadcast_delay_ms", 1000)?
            .set_default("simulation.injection_delay_ms", 2000)?
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix("NEXGEN")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .set_override_option("insights.api_key", std::env::var("API_KEY").ok())?
            .build()?;

        config.try_deserialize()
    }
}
