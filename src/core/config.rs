mod parsing;
mod secret;
mod settings;
mod types;

pub(crate) use types::{
    ApiSettings, ConfigError, CorsSettings, DatabaseSettings, Environment, ReportSettings,
    RuntimeSettings, SecuritySettings, Settings, TelemetrySettings,
};
