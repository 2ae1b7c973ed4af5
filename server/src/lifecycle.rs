//! Process lifecycle phases
//!
//! `Created → Initializing → {Running | Aborted}`. `Aborted` is terminal:
//! it is reached only when the critical-failure switch is set during
//! startup, and no listener is ever bound from it.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Created,
    Initializing,
    Running,
    Aborted,
}

impl Phase {
    /// Whether the controller may take this transition
    pub fn can_transition_to(self, next: Phase) -> bool {
        matches!(
            (self, next),
            (Phase::Created, Phase::Initializing)
                | (Phase::Initializing, Phase::Running)
                | (Phase::Initializing, Phase::Aborted)
        )
    }

    pub fn is_terminal(self) -> bool {
        self == Phase::Aborted
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Created => "created",
            Phase::Initializing => "initializing",
            Phase::Running => "running",
            Phase::Aborted => "aborted",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_transitions() {
        assert!(Phase::Created.can_transition_to(Phase::Initializing));
        assert!(Phase::Initializing.can_transition_to(Phase::Running));
        assert!(Phase::Initializing.can_transition_to(Phase::Aborted));
    }

    #[test]
    fn test_aborted_is_terminal() {
        assert!(Phase::Aborted.is_terminal());
        for next in [Phase::Created, Phase::Initializing, Phase::Running] {
            assert!(!Phase::Aborted.can_transition_to(next));
        }
    }

    #[test]
    fn test_running_never_returns_to_startup_phases() {
        for next in [Phase::Created, Phase::Initializing, Phase::Aborted] {
            assert!(!Phase::Running.can_transition_to(next));
        }
    }
}
