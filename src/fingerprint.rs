//! Change detection over the inspected container set.

use std::hash::{DefaultHasher, Hash, Hasher};

use crate::state::ContainerState;

const SEED: u64 = 17;
const FACTOR: u64 = 23;

/// Opaque digest of an ordered set of container states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint(u64);

impl Fingerprint {
    /// Whether a notification is due given the last delivered fingerprint.
    /// `None` means nothing was delivered yet by this process.
    pub fn changed_since(self, previous: Option<Fingerprint>) -> bool {
        previous != Some(self)
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// Fold every container's full state into a single order-sensitive digest.
///
/// The caller must present containers in a stable order (by id), otherwise
/// a reshuffled listing reads as a change.
pub fn fingerprint(containers: &[ContainerState]) -> Fingerprint {
    let digest = containers.iter().fold(SEED, |acc, container| {
        acc.wrapping_mul(FACTOR).wrapping_add(hash_one(container))
    });
    Fingerprint(digest)
}

fn hash_one(container: &ContainerState) -> u64 {
    // DefaultHasher::new uses fixed keys, so values are stable for the
    // lifetime of the process.
    let mut hasher = DefaultHasher::new();
    container.hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{ContainerStatus, HealthStatus};
    use quickcheck::TestResult;
    use quickcheck_macros::quickcheck;

    fn containers() -> Vec<ContainerState> {
        vec![
            ContainerState::new("a1", "/db", ContainerStatus::Running)
                .with_health(HealthStatus::Healthy),
            ContainerState::new("b2", "/web", ContainerStatus::Running).with_restart_count(1),
            ContainerState::new("c3", "/job", ContainerStatus::Exited).with_exit_code(0),
        ]
    }

    #[quickcheck]
    fn deterministic(states: Vec<ContainerState>) -> bool {
        fingerprint(&states) == fingerprint(&states.clone())
    }

    #[quickcheck]
    fn order_sensitive(states: Vec<ContainerState>, i: usize, j: usize) -> TestResult {
        if states.len() < 2 {
            return TestResult::discard();
        }
        let (i, j) = (i % states.len(), j % states.len());
        if states[i] == states[j] {
            return TestResult::discard();
        }
        let mut swapped = states.clone();
        swapped.swap(i, j);
        TestResult::from_bool(fingerprint(&states) != fingerprint(&swapped))
    }

    #[quickcheck]
    fn restart_increment_changes(states: Vec<ContainerState>, i: usize) -> TestResult {
        if states.is_empty() {
            return TestResult::discard();
        }
        let i = i % states.len();
        let mut changed = states.clone();
        changed[i].restart_count += 1;
        TestResult::from_bool(fingerprint(&states) != fingerprint(&changed))
    }

    #[test]
    fn test_every_field_changes_fingerprint() {
        let base = containers();
        let before = fingerprint(&base);

        let mutations: Vec<fn(&mut ContainerState)> = vec![
            |c: &mut ContainerState| c.id.push('x'),
            |c: &mut ContainerState| c.name.push('x'),
            |c: &mut ContainerState| c.status = ContainerStatus::Paused,
            |c: &mut ContainerState| c.health = HealthStatus::Unhealthy,
            |c: &mut ContainerState| c.exit_code = 1,
            |c: &mut ContainerState| c.oom_killed = true,
            |c: &mut ContainerState| c.restart_count += 1,
        ];

        for mutate in mutations {
            let mut changed = base.clone();
            mutate(&mut changed[1]);
            assert_ne!(fingerprint(&changed), before, "{:?}", changed[1]);
        }
    }

    #[test]
    fn test_empty_is_seed() {
        assert_eq!(fingerprint(&[]), Fingerprint(SEED));
        assert!(fingerprint(&[]).changed_since(None));
        assert!(!fingerprint(&[]).changed_since(Some(Fingerprint(SEED))));
    }

    #[test]
    fn test_changed_since() {
        let current = fingerprint(&containers());
        assert!(current.changed_since(None));
        assert!(!current.changed_since(Some(current)));
        assert!(current.changed_since(Some(fingerprint(&containers()[1..]))));
    }
}
