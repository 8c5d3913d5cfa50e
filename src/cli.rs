use std::{path::PathBuf, sync::OnceLock};

use clap::Parser;

/// Watch labelled Docker containers and report state changes to Slack.
///
/// Every option can also be given through the environment variable shown
/// in its help, and most of them in the config file.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Path to the optional TOML config file.
    #[arg(
        short,
        long,
        env = "DOCKER_MONITOR_CONFIG",
        default_value = "docker-monitor.toml"
    )]
    pub config: PathBuf,

    /// Cron expression with seconds, e.g. "0 * * * * *".
    #[arg(long, env = "SCHEDULE")]
    pub schedule: Option<String>,

    /// Host label used in report headers. Defaults to the machine hostname.
    #[arg(long, env = "HOST")]
    pub host: Option<String>,

    #[arg(long, env = "DOCKER_SOCKET")]
    pub docker_socket: Option<PathBuf>,

    #[arg(long, env = "SLACK_WEBHOOK_URL")]
    pub slack_webhook_url: Option<String>,

    /// URL requested after every successful check. `{milliseconds}` is
    /// replaced with the duration of the check.
    #[arg(long, env = "HEARTBEAT_URL")]
    pub heartbeat_url: Option<String>,

    /// Only containers carrying this label are monitored.
    #[arg(long, env = "MONITOR_LABEL")]
    pub label: Option<String>,

    /// Timeout in seconds for Docker and HTTP requests.
    #[arg(long, env = "TIMEOUT")]
    pub timeout: Option<u64>,

    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: log::LevelFilter,
}

static ARGS: OnceLock<Args> = OnceLock::new();

pub fn get_cli_args() -> &'static Args {
    ARGS.get_or_init(Args::parse)
}
