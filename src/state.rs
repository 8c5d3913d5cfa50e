//! Inspected state of a single container.
//!
//! Values are built fresh every cycle from the Engine API inspect response
//! and are never mutated afterwards.

use bollard::models::{ContainerInspectResponse, ContainerStateStatusEnum, HealthStatusEnum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerStatus {
    Unknown,
    Created,
    Running,
    Paused,
    Restarting,
    Removing,
    Exited,
    Dead,
}

impl ContainerStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Created => "created",
            Self::Running => "running",
            Self::Paused => "paused",
            Self::Restarting => "restarting",
            Self::Removing => "removing",
            Self::Exited => "exited",
            Self::Dead => "dead",
        }
    }
}

impl From<ContainerStateStatusEnum> for ContainerStatus {
    fn from(status: ContainerStateStatusEnum) -> Self {
        match status {
            ContainerStateStatusEnum::EMPTY => Self::Unknown,
            ContainerStateStatusEnum::CREATED => Self::Created,
            ContainerStateStatusEnum::RUNNING => Self::Running,
            ContainerStateStatusEnum::PAUSED => Self::Paused,
            ContainerStateStatusEnum::RESTARTING => Self::Restarting,
            ContainerStateStatusEnum::REMOVING => Self::Removing,
            ContainerStateStatusEnum::EXITED => Self::Exited,
            ContainerStateStatusEnum::DEAD => Self::Dead,
        }
    }
}

/// Result of the container's health probe. `None` means no probe is configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HealthStatus {
    None,
    Starting,
    Healthy,
    Unhealthy,
}

impl HealthStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Starting => "starting",
            Self::Healthy => "healthy",
            Self::Unhealthy => "unhealthy",
        }
    }
}

impl From<HealthStatusEnum> for HealthStatus {
    fn from(status: HealthStatusEnum) -> Self {
        match status {
            HealthStatusEnum::HEALTHY => Self::Healthy,
            HealthStatusEnum::UNHEALTHY => Self::Unhealthy,
            HealthStatusEnum::STARTING => Self::Starting,
            HealthStatusEnum::EMPTY | HealthStatusEnum::NONE => Self::None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContainerState {
    pub id: String,
    /// Display name, without the leading `/` the Engine API prepends.
    pub name: String,
    pub status: ContainerStatus,
    /// Only meaningful while `status` is `Running`.
    pub health: HealthStatus,
    /// Only meaningful while `status` is `Exited` or `Restarting`.
    pub exit_code: i64,
    /// Only meaningful while `status` is `Exited` or `Restarting`.
    pub oom_killed: bool,
    pub restart_count: u64,
}

impl ContainerState {
    pub fn new(id: impl Into<String>, name: &str, status: ContainerStatus) -> Self {
        Self {
            id: id.into(),
            name: display_name(name).to_string(),
            status,
            health: HealthStatus::None,
            exit_code: 0,
            oom_killed: false,
            restart_count: 0,
        }
    }

    pub fn with_health(mut self, health: HealthStatus) -> Self {
        self.health = health;
        self
    }

    pub fn with_exit_code(mut self, exit_code: i64) -> Self {
        self.exit_code = exit_code;
        self
    }

    pub fn with_oom_killed(mut self, oom_killed: bool) -> Self {
        self.oom_killed = oom_killed;
        self
    }

    pub fn with_restart_count(mut self, restart_count: u64) -> Self {
        self.restart_count = restart_count;
        self
    }

    /// Build the state from an inspect response.
    ///
    /// `id` is the identifier the container was listed under; it is used
    /// when the response itself carries none.
    pub fn from_inspect(id: &str, inspect: ContainerInspectResponse) -> Self {
        let name = inspect.name.as_deref().unwrap_or(id);
        let id = inspect.id.as_deref().unwrap_or(id);
        let restart_count = inspect
            .restart_count
            .and_then(|count| u64::try_from(count).ok())
            .unwrap_or(0);

        let Some(inspected) = inspect.state else {
            return ContainerState::new(id, name, ContainerStatus::Unknown)
                .with_restart_count(restart_count);
        };

        let status = inspected
            .status
            .map(ContainerStatus::from)
            .unwrap_or(ContainerStatus::Unknown);
        let health = inspected
            .health
            .and_then(|health| health.status)
            .map(HealthStatus::from)
            .unwrap_or(HealthStatus::None);

        ContainerState::new(id, name, status)
            .with_health(health)
            .with_exit_code(inspected.exit_code.unwrap_or(0))
            .with_oom_killed(inspected.oom_killed.unwrap_or(false))
            .with_restart_count(restart_count)
    }
}

fn display_name(name: &str) -> &str {
    name.trim_start_matches('/')
}
