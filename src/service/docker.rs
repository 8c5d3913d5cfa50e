//! Container inspection through the Docker Engine API using bollard.

use std::{
    collections::HashMap,
    path::Path,
    time::{Duration, Instant},
};

use async_trait::async_trait;
use bollard::query_parameters::{
    InspectContainerOptions, InspectContainerOptionsBuilder, ListContainersOptions,
    ListContainersOptionsBuilder,
};
use bollard::models::ContainerSummary;
use bollard::{API_DEFAULT_VERSION, Docker};
use futures_util::StreamExt;

use crate::monitor::{ContainerSource, MonitorError};
use crate::state::ContainerState;

/// Inspect requests in flight at once during a single check.
const MAX_CONCURRENT_INSPECTIONS: usize = 8;

pub struct DockerSource {
    docker: Docker,
    label: String,
}

impl DockerSource {
    /// Connect to the daemon listening on `socket`. Only containers carrying
    /// `label` are reported.
    pub fn connect(
        socket: &Path,
        timeout: Duration,
        label: String,
    ) -> Result<Self, bollard::errors::Error> {
        let docker = Docker::connect_with_socket(
            &socket.to_string_lossy(),
            timeout.as_secs(),
            API_DEFAULT_VERSION,
        )?;
        Ok(Self { docker, label })
    }

    /// Identifiers of every labelled container, stopped ones included,
    /// sorted so that inspection order is stable across checks.
    async fn list_ids(&self) -> Result<Vec<String>, bollard::errors::Error> {
        let filters = HashMap::from([("label", vec![self.label.as_str()])]);
        let options: ListContainersOptions = ListContainersOptionsBuilder::new()
            .all(true)
            .filters(&filters)
            .build();

        let summaries = self.docker.list_containers(Some(options)).await?;
        log::debug!("Listed {} containers", summaries.len());
        Ok(monitored_ids(summaries))
    }

    /// Inspect a single container. `None` if it disappeared since listing.
    async fn inspect(&self, id: &str) -> Result<Option<ContainerState>, bollard::errors::Error> {
        let options: InspectContainerOptions = InspectContainerOptionsBuilder::new().build();

        let inspected = unless_gone(id, self.docker.inspect_container(id, Some(options)).await)?;
        Ok(inspected.map(|inspect| {
            let state = ContainerState::from_inspect(id, inspect);
            log::debug!("Inspected {id} {} container", state.name);
            state
        }))
    }
}

/// Identifiers worth inspecting, sorted so the fingerprint does not depend
/// on the order the daemon lists containers in.
fn monitored_ids(summaries: Vec<ContainerSummary>) -> Vec<String> {
    let mut ids: Vec<String> = summaries
        .into_iter()
        .filter_map(|summary| match summary.id {
            Some(id) if !id.is_empty() => Some(id),
            _ => {
                log::warn!("Missing container id. Cannot inspect.");
                None
            }
        })
        .collect();
    ids.sort();
    ids
}

/// A 404 means the container was removed between listing and inspection.
fn unless_gone<T>(
    id: &str,
    result: Result<T, bollard::errors::Error>,
) -> Result<Option<T>, bollard::errors::Error> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(bollard::errors::Error::DockerResponseServerError {
            status_code: 404, ..
        }) => {
            log::warn!("Container {id} not found.");
            Ok(None)
        }
        Err(e) => {
            log::error!("Failed to inspect container {id}: {e}");
            Err(e)
        }
    }
}

#[async_trait]
impl ContainerSource for DockerSource {
    async fn containers(&self) -> Result<Vec<ContainerState>, MonitorError> {
        let started = Instant::now();
        let ids = self.list_ids().await?;

        // `buffered` yields in input order, so the id ordering survives.
        let inspected: Vec<_> = futures_util::stream::iter(ids)
            .map(|id| async move { self.inspect(&id).await })
            .buffered(MAX_CONCURRENT_INSPECTIONS)
            .collect()
            .await;

        let containers = inspected
            .into_iter()
            .filter_map(Result::transpose)
            .collect::<Result<Vec<_>, _>>()?;

        log::debug!("Checked docker in {:?}", started.elapsed());
        Ok(containers)
    }
}
