//! One check cycle and the loop driving it.

use std::time::Instant;

use async_trait::async_trait;
use tokio::sync::mpsc::Receiver;

use crate::fingerprint::{Fingerprint, fingerprint};
use crate::report::{Report, assemble};
use crate::schedule::CheckSchedule;
use crate::service::heartbeat::Heartbeat;
use crate::service::slack::WebhookError;
use crate::state::ContainerState;

#[derive(Debug, thiserror::Error)]
pub enum MonitorError {
    #[error("Docker API error: {0}")]
    DockerApi(#[from] bollard::errors::Error),
    #[error("Webhook error: {0}")]
    Webhook(#[from] WebhookError),
}

/// Supplies the monitored containers, already ordered by id.
#[async_trait]
pub trait ContainerSource: Send + Sync {
    async fn containers(&self) -> Result<Vec<ContainerState>, MonitorError>;
}

/// Delivers a report somewhere a human will read it.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, report: &Report) -> Result<(), MonitorError>;
}

pub struct Monitor<S, N> {
    source: S,
    notifier: N,
    heartbeat: Option<Heartbeat>,
    host: String,
}

impl<S: ContainerSource, N: Notifier> Monitor<S, N> {
    pub fn new(source: S, notifier: N, heartbeat: Option<Heartbeat>, host: String) -> Self {
        Self {
            source,
            notifier,
            heartbeat,
            host,
        }
    }

    /// Run one check. Returns the fingerprint to compare the next check
    /// against. On error nothing was delivered and the caller should keep
    /// `previous`.
    pub async fn check(&self, previous: Option<Fingerprint>) -> Result<Fingerprint, MonitorError> {
        let started = Instant::now();

        let containers = self.source.containers().await?;
        log::debug!(
            "Checked {} containers in {:?}",
            containers.len(),
            started.elapsed()
        );

        let current = fingerprint(&containers);
        if current.changed_since(previous) {
            let report = assemble(&containers, &self.host);
            log::info!(
                "Container state changed ({current}), reporting {} containers: {}",
                report.total,
                report.header
            );
            for line in report.texts() {
                log::debug!("{line}");
            }
            self.notifier.notify(&report).await?;
        } else {
            log::debug!("No change since last check ({current})");
        }

        let elapsed = started.elapsed();
        log::debug!("Completed monitoring in {elapsed:?}");

        if let Some(heartbeat) = &self.heartbeat {
            heartbeat.ping(elapsed).await;
        }

        Ok(current)
    }

    /// Check on every tick of `schedule` until `cancel` fires or the
    /// schedule runs out.
    pub async fn run(&self, schedule: &CheckSchedule, cancel: &mut Receiver<()>) {
        let mut previous = None;

        loop {
            let Some((next, delay)) = schedule.until_next() else {
                log::warn!("Schedule {schedule} has no upcoming occurrences, stopping");
                return;
            };
            log::debug!("Waiting {delay:?} until {next}");

            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = cancel.recv() => {
                    log::warn!("Monitoring cancelled");
                    return;
                }
            }

            previous = match self.check(previous).await {
                Ok(current) => Some(current),
                Err(e) => {
                    log::error!("Monitoring cycle failed, retrying on next tick: {e}");
                    previous
                }
            };
        }
    }
}
