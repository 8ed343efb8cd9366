use std::fmt;

use crate::core::{CommandError, Result};
use crate::project::Project;

/// Life-cycle of a command.
///
/// `Created -> Executing -> Executed <-> Undone`; any failure ends in `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommandState {
    #[default]
    Created,
    Executing,
    Executed,
    Undone,
    Failed,
}

impl fmt::Display for CommandState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CommandState::Created => "created",
            CommandState::Executing => "executing",
            CommandState::Executed => "executed",
            CommandState::Undone => "undone",
            CommandState::Failed => "failed",
        };
        write!(f, "{}", s)
    }
}

/// A reversible unit of work on a [`Project`].
///
/// Implementors provide the `perform_*` hooks; the provided `execute`, `undo`
/// and `redo` methods enforce the life-cycle and must not be overridden.
pub trait Command: fmt::Debug {
    /// Human readable description, e.g. "Place net point".
    fn text(&self) -> &str;

    fn state(&self) -> CommandState;

    fn set_state(&mut self, state: CommandState);

    /// Apply the change. Returns `false` if nothing was modified.
    fn perform_execute(&mut self, project: &mut Project) -> Result<bool>;

    fn perform_undo(&mut self, project: &mut Project) -> Result<()>;

    fn perform_redo(&mut self, project: &mut Project) -> Result<()>;

    /// Execute the command once.
    fn execute(&mut self, project: &mut Project) -> Result<bool> {
        if self.state() != CommandState::Created {
            return Err(CommandError::invalid_state(
                self.text(),
                format!("cannot be executed while {}", self.state()),
            ));
        }
        self.set_state(CommandState::Executing);
        match self.perform_execute(project) {
            Ok(changed) => {
                self.set_state(CommandState::Executed);
                Ok(changed)
            }
            Err(err) => {
                self.set_state(CommandState::Failed);
                Err(err)
            }
        }
    }

    /// Revert a previously executed (or redone) command.
    fn undo(&mut self, project: &mut Project) -> Result<()> {
        if self.state() != CommandState::Executed {
            return Err(CommandError::invalid_state(
                self.text(),
                format!("cannot be undone while {}", self.state()),
            ));
        }
        match self.perform_undo(project) {
            Ok(()) => {
                self.set_state(CommandState::Undone);
                Ok(())
            }
            Err(err) => {
                self.set_state(CommandState::Failed);
                Err(err)
            }
        }
    }

    /// Re-apply an undone command.
    fn redo(&mut self, project: &mut Project) -> Result<()> {
        if self.state() != CommandState::Undone {
            return Err(CommandError::invalid_state(
                self.text(),
                format!("cannot be redone while {}", self.state()),
            ));
        }
        match self.perform_redo(project) {
            Ok(()) => {
                self.set_state(CommandState::Executed);
                Ok(())
            }
            Err(err) => {
                self.set_state(CommandState::Failed);
                Err(err)
            }
        }
    }
}
