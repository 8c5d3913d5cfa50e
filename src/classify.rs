//! Mapping from a container's inspected state to a prioritised status line.

use std::fmt;

use crate::state::{ContainerState, ContainerStatus, HealthStatus};

/// Priority of a status line. Higher sorts first in a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Severity {
    Normal = 0,
    Transitional = 1,
    ExpectedExit = 2,
    Error = 3,
}

/// Visual tier of a status line. An OOM kill and a plain failure share a
/// severity but not a marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Transition,
    Healthy,
    Paused,
    Removing,
    Stopped,
    Failure,
    Fatal,
}

/// One piece of the text following the container name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Detail {
    State(&'static str),
    OomKilled,
    ExitCode(i64),
    RestartCount(u64),
}

impl fmt::Display for Detail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Detail::State(state) => f.write_str(state),
            Detail::OomKilled => f.write_str("OOMKilled"),
            Detail::ExitCode(code) => write!(f, "exit code {code}"),
            Detail::RestartCount(count) => write!(f, "restart count {count}"),
        }
    }
}

pub const SEPARATOR: &str = " • ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedMessage {
    pub severity: Severity,
    pub container_name: String,
    pub text: String,
    pub is_error: bool,
    pub marker: Marker,
    pub details: Vec<Detail>,
}

impl ClassifiedMessage {
    fn new(
        container: &ContainerState,
        severity: Severity,
        is_error: bool,
        marker: Marker,
        details: Vec<Detail>,
    ) -> Self {
        let mut text = container.name.clone();
        for detail in &details {
            text.push_str(SEPARATOR);
            text.push_str(&detail.to_string());
        }
        Self {
            severity,
            container_name: container.name.clone(),
            text,
            is_error,
            marker,
            details,
        }
    }
}

/// Classify a single container. Total over every input; the first matching
/// arm wins.
pub fn classify(container: &ContainerState) -> ClassifiedMessage {
    use ContainerStatus::*;
    use Detail::*;

    let status = State(container.status.as_str());
    let exit_code = ExitCode(container.exit_code);
    let restarts = RestartCount(container.restart_count);

    // Running lines only mention restarts once there have been some.
    let running = |health: &'static str| {
        let mut details = vec![State(health)];
        if container.restart_count > 0 {
            details.push(RestartCount(container.restart_count));
        }
        details
    };

    let (severity, is_error, marker, details) = match container.status {
        Created => (Severity::Transitional, false, Marker::Transition, vec![status]),
        Running if container.health == HealthStatus::Starting => (
            Severity::Transitional,
            false,
            Marker::Transition,
            running(container.health.as_str()),
        ),
        Running if container.health == HealthStatus::Unhealthy => (
            Severity::Error,
            true,
            Marker::Failure,
            running(container.health.as_str()),
        ),
        Running if container.health == HealthStatus::Healthy => (
            Severity::Normal,
            false,
            Marker::Healthy,
            running(container.health.as_str()),
        ),
        Running => (
            Severity::Normal,
            false,
            Marker::Healthy,
            running(container.status.as_str()),
        ),
        Paused => (Severity::Transitional, false, Marker::Paused, vec![status]),
        Restarting | Exited if container.oom_killed => (
            Severity::Error,
            true,
            Marker::Fatal,
            vec![status, OomKilled, exit_code, restarts],
        ),
        Restarting => (
            Severity::Error,
            true,
            Marker::Failure,
            vec![status, exit_code, restarts],
        ),
        Removing => (Severity::Transitional, false, Marker::Removing, vec![status]),
        Exited if container.exit_code == 0 => (
            Severity::ExpectedExit,
            false,
            Marker::Stopped,
            vec![status, exit_code, restarts],
        ),
        Exited => (
            Severity::Error,
            true,
            Marker::Failure,
            vec![status, exit_code, restarts],
        ),
        Dead | Unknown => (Severity::Error, true, Marker::Failure, vec![status]),
    };

    ClassifiedMessage::new(container, severity, is_error, marker, details)
}
