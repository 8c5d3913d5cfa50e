use crate::classify::{ClassifiedMessage, classify};
use crate::state::ContainerState;

/// Summary of one check, ready to hand to a notifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub header: String,
    /// Worst severity first, then by container name.
    pub lines: Vec<ClassifiedMessage>,
    pub error_count: usize,
    pub total: usize,
}

impl Report {
    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(|line| line.text.as_str())
    }
}

pub fn assemble(containers: &[ContainerState], host: &str) -> Report {
    let mut lines: Vec<ClassifiedMessage> = containers.iter().map(classify).collect();
    lines.sort_by(|a, b| {
        b.severity
            .cmp(&a.severity)
            .then_with(|| a.container_name.cmp(&b.container_name))
    });

    let total = lines.len();
    let error_count = lines.iter().filter(|line| line.is_error).count();
    let header = if error_count == 0 {
        format!("Monitoring {total} containers on {host}")
    } else {
        format!("{error_count} of {total} containers have errors on {host}")
    };

    Report {
        header,
        lines,
        error_count,
        total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::Severity;
    use crate::state::{ContainerStatus, HealthStatus};
    use quickcheck_macros::quickcheck;

    #[test]
    fn test_empty_report() {
        let report = assemble(&[], "host-1");
        assert_eq!(report.header, "Monitoring 0 containers on host-1");
        assert!(report.lines.is_empty());
        assert!(!report.has_errors());
    }

    #[test]
    fn test_errors_sorted_first() {
        let containers = vec![
            ContainerState::new("1", "/web", ContainerStatus::Running)
                .with_health(HealthStatus::Healthy),
            ContainerState::new("2", "/api", ContainerStatus::Running)
                .with_health(HealthStatus::Unhealthy),
        ];
        let report = assemble(&containers, "prod");

        assert_eq!(report.header, "1 of 2 containers have errors on prod");
        assert!(report.has_errors());
        assert_eq!(report.total, 2);
        assert_eq!(
            report.texts().collect::<Vec<_>>(),
            vec!["api • unhealthy", "web • healthy"]
        );
    }

    #[test]
    fn test_healthy_header() {
        let containers = vec![
            ContainerState::new("1", "/web", ContainerStatus::Running),
            ContainerState::new("2", "/batch", ContainerStatus::Exited).with_exit_code(0),
        ];
        let report = assemble(&containers, "staging");
        assert_eq!(report.header, "Monitoring 2 containers on staging");
        assert_eq!(report.error_count, 0);
    }

    #[test]
    fn test_equal_severity_sorted_by_name() {
        let containers = vec![
            ContainerState::new("1", "/zeta", ContainerStatus::Dead),
            ContainerState::new("2", "/alpha", ContainerStatus::Exited).with_exit_code(3),
            ContainerState::new("3", "/mid", ContainerStatus::Created),
            ContainerState::new("4", "/beta", ContainerStatus::Paused),
        ];
        let report = assemble(&containers, "h");
        let names: Vec<_> = report
            .lines
            .iter()
            .map(|line| line.container_name.as_str())
            .collect();
        assert_eq!(names, vec!["alpha", "zeta", "beta", "mid"]);
        assert_eq!(report.header, "2 of 4 containers have errors on h");
    }

    #[quickcheck]
    fn lines_are_ordered(states: Vec<ContainerState>) -> bool {
        let report = assemble(&states, "h");
        report.lines.windows(2).all(|pair| {
            let (a, b) = (&pair[0], &pair[1]);
            a.severity > b.severity
                || (a.severity == b.severity && a.container_name <= b.container_name)
        })
    }

    #[quickcheck]
    fn counts_match(states: Vec<ContainerState>) -> bool {
        let report = assemble(&states, "h");
        let errors = report
            .lines
            .iter()
            .filter(|line| line.severity == Severity::Error)
            .count();
        report.total == states.len() && report.error_count == errors
    }
}
