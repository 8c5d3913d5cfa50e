use std::{path::PathBuf, str::FromStr, time::Duration};

use cron::Schedule;

use crate::cli::Args;

pub const DEFAULT_SCHEDULE: &str = "0 * * * * *";
pub const DEFAULT_DOCKER_SOCKET: &str = "/var/run/docker.sock";
pub const DEFAULT_LABEL: &str = "docker-monitor.enable=true";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Invalid schedule: {0}")]
    Schedule(#[from] cron::error::Error),
    #[error("Missing Slack webhook URL (set SLACK_WEBHOOK_URL or slack_webhook_url)")]
    MissingWebhook,
    #[error("Unable to determine hostname: {0}")]
    Hostname(#[from] nix::Error),
}

/// Values read from the config file. Anything set on the command line or
/// in the environment takes precedence.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MonitorConfigFile {
    schedule: Option<Schedule>,
    host: Option<String>,
    docker_socket: Option<PathBuf>,
    slack_webhook_url: Option<String>,
    heartbeat_url: Option<String>,
    label: Option<String>,
    timeout: Option<u64>,
}

impl MonitorConfigFile {
    fn try_init_from_string(val: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(val)?)
    }

    fn try_init(args: &Args) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(&args.config) {
            Ok(config) => Self::try_init_from_string(&config),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No config file at {:?}, using defaults", args.config);
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MonitorConfig {
    pub schedule: Schedule,
    pub host: String,
    pub docker_socket: PathBuf,
    pub slack_webhook_url: String,
    pub heartbeat_url: Option<String>,
    pub label: String,
    pub timeout: Duration,
}

impl MonitorConfig {
    pub fn try_init(args: &Args) -> Result<Self, ConfigError> {
        let file = MonitorConfigFile::try_init(args)?;
        Self::resolve(args, file)
    }

    fn resolve(args: &Args, file: MonitorConfigFile) -> Result<Self, ConfigError> {
        let schedule = match &args.schedule {
            Some(expr) => Schedule::from_str(expr)?,
            None => match file.schedule {
                Some(schedule) => schedule,
                None => Schedule::from_str(DEFAULT_SCHEDULE)?,
            },
        };

        let host = match non_empty(args.host.clone()).or(non_empty(file.host)) {
            Some(host) => host,
            None => nix::unistd::gethostname()?
                .to_string_lossy()
                .into_owned(),
        };

        let slack_webhook_url = non_empty(args.slack_webhook_url.clone())
            .or(non_empty(file.slack_webhook_url))
            .ok_or(ConfigError::MissingWebhook)?;

        Ok(Self {
            schedule,
            host,
            docker_socket: args
                .docker_socket
                .clone()
                .or(file.docker_socket)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DOCKER_SOCKET)),
            slack_webhook_url,
            heartbeat_url: non_empty(args.heartbeat_url.clone()).or(non_empty(file.heartbeat_url)),
            label: non_empty(args.label.clone())
                .or(non_empty(file.label))
                .unwrap_or_else(|| DEFAULT_LABEL.to_string()),
            timeout: Duration::from_secs(
                args.timeout.or(file.timeout).unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
