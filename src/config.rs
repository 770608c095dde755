use clap::{Args, Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Clone, Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Config {
    #[command(flatten)]
    pub server: ServerConfig,

    #[command(flatten)]
    pub sandbox: SandboxConfig,

    #[command(flatten)]
    pub edge: EdgeConfig,

    #[command(flatten)]
    pub timeouts: TimeoutConfig,

    #[command(flatten)]
    pub telemetry: TelemetryConfig,
}

#[derive(Clone, Debug, Args)]
pub struct ServerConfig {
    /// Host to listen on
    #[arg(long, env = "SANDBOX_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "SANDBOX_PORT", default_value_t = 3000)]
    pub port: u16,

    /// Port for the management server (liveness and readiness probes)
    #[arg(long, env = "SANDBOX_MGMT_PORT", default_value_t = 9090)]
    pub mgmt_port: u16,

    /// How long to wait for in-flight requests to drain on shutdown
    #[arg(long, env = "SANDBOX_SHUTDOWN_TIMEOUT_SECS", default_value_t = 5)]
    pub shutdown_timeout_secs: u64,
}

#[derive(Clone, Debug, Args)]
pub struct SandboxConfig {
    /// Client id reported in routing config lookup failures
    #[arg(long, env = "SANDBOX_CLIENT_ID", default_value = "sandbox_client_id")]
    pub client_id: String,

    /// Optional JSON file of extra routing plans, mapping plan id to outcome
    #[arg(long, env = "SANDBOX_ROUTING_PLANS_FILE")]
    pub routing_plans_file: Option<PathBuf>,
}

#[derive(Clone, Debug, Args)]
pub struct EdgeConfig {
    /// Apply the gateway response filter (content type, cache headers, header scrubbing)
    #[arg(
        long = "edge-filter",
        env = "SANDBOX_EDGE_FILTER",
        default_value_t = true,
        action = clap::ArgAction::Set
    )]
    pub enabled: bool,
}

#[derive(Clone, Debug, Args)]
pub struct TimeoutConfig {
    /// Simulated downstream timeout used by the timeout endpoints
    #[arg(long, env = "SANDBOX_DOWNSTREAM_TIMEOUT_MS", default_value_t = 2000)]
    pub downstream_timeout_ms: u64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Clone, Debug, Args)]
pub struct TelemetryConfig {
    /// Log output format
    #[arg(long, env = "SANDBOX_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

impl Config {
    #[must_use]
    pub fn load() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::try_parse_from(["batch-sandbox"]).unwrap();
        assert_eq!(config.sandbox.client_id, "sandbox_client_id");
        assert!(config.edge.enabled);
        assert_eq!(config.timeouts.downstream_timeout_ms, 2000);
        assert_eq!(config.telemetry.log_format, LogFormat::Text);
    }

    #[test]
    fn test_edge_filter_can_be_disabled() {
        let config = Config::try_parse_from(["batch-sandbox", "--edge-filter", "false"]).unwrap();
        assert!(!config.edge.enabled);
    }
}
