//! Archive manager lifecycle
//!
//! ```text
//! Idle ──> Creating ──> Created
//!   │          └──────> Failed
//!   └────> Restoring ─> Restored
//!              └──────> Failed
//! ```
//!
//! Terminal states (`Created`, `Restored`, `Failed`) may start a new
//! operation; the in-progress states may only finish.

use crate::error::{BackupError, Result};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArchiveState {
    #[default]
    Idle,
    Creating,
    Created,
    Restoring,
    Restored,
    Failed,
}

impl ArchiveState {
    pub fn can_transition_to(&self, next: ArchiveState) -> bool {
        use ArchiveState::*;
        match (self, next) {
            (Creating, Created | Failed) => true,
            (Restoring, Restored | Failed) => true,
            (Idle | Created | Restored | Failed, Creating | Restoring) => true,
            _ => false,
        }
    }

    /// Move to `next`, or fail with [`BackupError::InvalidTransition`].
    pub fn transition(&mut self, next: ArchiveState) -> Result<()> {
        if !self.can_transition_to(next) {
            return Err(BackupError::InvalidTransition {
                from: *self,
                to: next,
            });
        }
        tracing::debug!("Archive manager: {} -> {}", self, next);
        *self = next;
        Ok(())
    }
}

impl fmt::Display for ArchiveState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Creating => "creating",
            Self::Created => "created",
            Self::Restoring => "restoring",
            Self::Restored => "restored",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_lifecycle() {
        let mut state = ArchiveState::default();
        state.transition(ArchiveState::Creating).unwrap();
        state.transition(ArchiveState::Created).unwrap();
        state.transition(ArchiveState::Restoring).unwrap();
        state.transition(ArchiveState::Restored).unwrap();
    }

    #[test]
    fn test_failed_state_can_start_over() {
        let mut state = ArchiveState::Creating;
        state.transition(ArchiveState::Failed).unwrap();
        state.transition(ArchiveState::Creating).unwrap();
    }

    #[test]
    fn test_in_progress_cannot_start_another_operation() {
        let mut state = ArchiveState::Creating;
        let err = state.transition(ArchiveState::Restoring).unwrap_err();
        assert!(matches!(
            err,
            BackupError::InvalidTransition {
                from: ArchiveState::Creating,
                to: ArchiveState::Restoring
            }
        ));
        assert_eq!(state, ArchiveState::Creating);
    }

    #[test]
    fn test_cannot_finish_what_was_not_started() {
        assert!(!ArchiveState::Idle.can_transition_to(ArchiveState::Created));
        assert!(!ArchiveState::Creating.can_transition_to(ArchiveState::Restored));
        assert!(!ArchiveState::Restoring.can_transition_to(ArchiveState::Created));
    }
}
