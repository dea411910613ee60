use config::builder::DefaultState;
use config::{ConfigBuilder, Environment};
use serde::Deserialize;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_WINDOW_HOURS: u32 = 24;

#[derive(Debug, Deserialize, Clone)]
pub struct StatusConfig {
    pub server: ServerSettings,
    pub probe: ProbeSettings,
    pub window_hours: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ProbeSettings {
    pub id: String,
}

impl StatusConfig {
    /// Trailing window of samples kept on the charts
    pub fn window(&self) -> chrono::Duration {
        chrono::Duration::hours(i64::from(self.window_hours))
    }
}

/// Load `config/probe_status` (optional) overlaid with `PROBE_STATUS__*`
/// environment variables.
pub fn load_status_config() -> anyhow::Result<StatusConfig> {
    let builder = config::Config::builder()
        .add_source(config::File::with_name("config/probe_status").required(false))
        .add_source(status_environment());

    build_status_config(builder)
}

/// `PROBE_STATUS__PROBE__ID` maps to `probe.id`.
fn status_environment() -> Environment {
    Environment::with_prefix("PROBE_STATUS")
        .prefix_separator("__")
        .separator("__")
}

fn build_status_config(builder: ConfigBuilder<DefaultState>) -> anyhow::Result<StatusConfig> {
    let settings = builder
        .set_default("server.base_url", DEFAULT_BASE_URL)?
        .set_default("window_hours", i64::from(DEFAULT_WINDOW_HOURS))?
        .build()?;

    Ok(settings.try_deserialize()?)
}
