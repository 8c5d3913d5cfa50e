use std::process::ExitCode;

use config::MonitorConfig;
use monitor::Monitor;
use schedule::CheckSchedule;
use service::{docker::DockerSource, heartbeat::Heartbeat, slack::SlackNotifier};

mod classify;
mod cli;
mod config;
mod fingerprint;
mod monitor;
mod report;
mod schedule;
mod service;
mod signals;
mod state;

#[tokio::main]
async fn main() -> ExitCode {
    // Variables from a local .env file act like the real environment
    let _ = dotenv::dotenv();

    let args = cli::get_cli_args();

    // RUST_LOG, when set, takes precedence over --log-level
    env_logger::Builder::new()
        .filter_level(args.log_level)
        .parse_default_env()
        .init();

    let config = match MonitorConfig::try_init(args) {
        Ok(config) => config,
        Err(e) => {
            log::error!("Unable to load configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    let source = match DockerSource::connect(
        &config.docker_socket,
        config.timeout,
        config.label.clone(),
    ) {
        Ok(source) => source,
        Err(e) => {
            log::error!(
                "Unable to connect to Docker at {:?}: {e}",
                config.docker_socket
            );
            return ExitCode::FAILURE;
        }
    };

    let http = match reqwest::Client::builder().timeout(config.timeout).build() {
        Ok(http) => http,
        Err(e) => {
            log::error!("Unable to build HTTP client: {e}");
            return ExitCode::FAILURE;
        }
    };

    let notifier = SlackNotifier::new(http.clone(), config.slack_webhook_url.clone());
    let heartbeat = config
        .heartbeat_url
        .clone()
        .map(|url| Heartbeat::new(http, url));
    let monitor = Monitor::new(source, notifier, heartbeat, config.host.clone());
    let schedule = CheckSchedule::new(config.schedule.clone());

    let (cancel_tx, mut cancel_rx) = tokio::sync::mpsc::channel(1);
    if let Err(e) = signals::handle_shutdown(cancel_tx) {
        log::error!("Unable to register signal handlers: {e}");
        return ExitCode::FAILURE;
    }

    let _ = sd_notify::notify(false, &[sd_notify::NotifyState::Ready]);
    log::info!(
        "Monitoring containers labelled {} on {} with schedule {schedule}",
        config.label,
        config.host
    );

    monitor.run(&schedule, &mut cancel_rx).await;

    log::info!("Docker monitor stopped");
    ExitCode::SUCCESS
}
