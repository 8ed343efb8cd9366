//! Undo history of an editing session.

use tracing::{debug, error, info};

use super::command::{Command, CommandState};
use super::group::CommandGroup;
use crate::core::{CommandError, EditorOptions, Result};
use crate::project::Project;

/// Linear undo/redo history with optional open transaction.
///
/// All modifications of a [`Project`] in an editing session go through one
/// stack, which serializes them. A transaction (`begin_cmd` ...
/// `commit_cmd`/`abort_cmd`) collects several commands into a single undo step;
/// its commands are executed immediately so the user sees the intermediate
/// state.
#[derive(Debug)]
pub struct UndoStack {
    commands: Vec<Box<dyn Command>>,
    /// Number of commands currently applied; `commands[..current]` are executed.
    current: usize,
    clean: Option<usize>,
    active: Option<CommandGroup>,
    limit: usize,
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new(&EditorOptions::default())
    }
}

impl UndoStack {
    pub fn new(options: &EditorOptions) -> Self {
        Self {
            commands: Vec::new(),
            current: 0,
            clean: Some(0),
            active: None,
            limit: options.undo_limit.max(1),
        }
    }

    /// Execute a top-level command and record it if it changed the project.
    pub fn exec_cmd(&mut self, project: &mut Project, mut cmd: Box<dyn Command>) -> Result<bool> {
        if self.active.is_some() {
            return Err(CommandError::Transaction(
                "another command is active at the moment".to_string(),
            ));
        }
        let changed = cmd.execute(project)?;
        if changed {
            info!("Executed \"{}\"", cmd.text());
            self.push(cmd);
        } else {
            debug!("\"{}\" changed nothing, not recorded", cmd.text());
        }
        Ok(changed)
    }

    /// Open a transaction named `text`.
    pub fn begin_cmd(&mut self, text: impl Into<String>) -> Result<()> {
        if self.active.is_some() {
            return Err(CommandError::Transaction(
                "another command is active at the moment".to_string(),
            ));
        }
        let mut group = CommandGroup::new(text);
        group.set_state(CommandState::Executing);
        self.active = Some(group);
        Ok(())
    }

    /// Execute `cmd` as part of the open transaction.
    pub fn append_to_cmd(&mut self, project: &mut Project, cmd: Box<dyn Command>) -> Result<bool> {
        let group = self
            .active
            .as_mut()
            .ok_or_else(|| CommandError::Transaction("no command is active".to_string()))?;
        group.exec_new_child_cmd(project, cmd)
    }

    /// Close the open transaction; it becomes one undo step if non-empty.
    pub fn commit_cmd(&mut self) -> Result<bool> {
        let mut group = self
            .active
            .take()
            .ok_or_else(|| CommandError::Transaction("no command is active".to_string()))?;
        group.set_state(CommandState::Executed);
        let changed = group.child_count() > 0;
        if changed {
            info!("Committed \"{}\"", group.text());
            self.push(Box::new(group));
        }
        Ok(changed)
    }

    /// Revert and discard everything done in the open transaction.
    pub fn abort_cmd(&mut self, project: &mut Project) -> Result<()> {
        let mut group = self
            .active
            .take()
            .ok_or_else(|| CommandError::Transaction("no command is active".to_string()))?;
        info!("Aborted \"{}\"", group.text());
        group.rollback(project);
        Ok(())
    }

    pub fn is_command_group_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn can_undo(&self) -> bool {
        self.active.is_none() && self.current > 0
    }

    pub fn can_redo(&self) -> bool {
        self.active.is_none() && self.current < self.commands.len()
    }

    pub fn undo_text(&self) -> Option<&str> {
        self.current
            .checked_sub(1)
            .and_then(|i| self.commands.get(i))
            .map(|c| c.text())
    }

    pub fn redo_text(&self) -> Option<&str> {
        self.commands.get(self.current).map(|c| c.text())
    }

    /// Undo the last step. Returns `false` if there was nothing to undo.
    ///
    /// If the step fails to undo, the error is returned and the whole
    /// history is discarded.
    pub fn undo(&mut self, project: &mut Project) -> Result<bool> {
        self.check_idle()?;
        if self.current == 0 {
            return Ok(false);
        }
        if let Err(err) = self.commands[self.current - 1].undo(project) {
            self.discard_history("undo", &err);
            return Err(err);
        }
        self.current -= 1;
        Ok(true)
    }

    /// Redo the next step. Returns `false` if there was nothing to redo.
    ///
    /// Fails like [`UndoStack::undo`].
    pub fn redo(&mut self, project: &mut Project) -> Result<bool> {
        self.check_idle()?;
        if self.current >= self.commands.len() {
            return Ok(false);
        }
        if let Err(err) = self.commands[self.current].redo(project) {
            self.discard_history("redo", &err);
            return Err(err);
        }
        self.current += 1;
        Ok(true)
    }

    pub fn is_clean(&self) -> bool {
        self.active.is_none() && self.clean == Some(self.current)
    }

    /// Mark the current state as saved.
    pub fn set_clean(&mut self) {
        self.clean = Some(self.current);
    }

    /// Forget the whole history. The open transaction, if any, is kept.
    pub fn clear(&mut self) {
        self.commands.clear();
        self.current = 0;
        self.clean = Some(0);
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    fn check_idle(&self) -> Result<()> {
        if self.active.is_some() {
            return Err(CommandError::Transaction(
                "cannot undo or redo while a command is active".to_string(),
            ));
        }
        Ok(())
    }

    /// A command that failed to undo or redo is `Failed` and cannot be
    /// replayed; the steps around it no longer match the project either.
    fn discard_history(&mut self, action: &str, err: &CommandError) {
        error!(
            "{} failed, discarding {} undo step(s): {}",
            action,
            self.commands.len(),
            err
        );
        self.commands.clear();
        self.current = 0;
        self.clean = None;
    }

    fn push(&mut self, cmd: Box<dyn Command>) {
        // a new command discards the redo tail
        self.commands.truncate(self.current);
        if self.clean.is_some_and(|clean| clean > self.current) {
            self.clean = None;
        }
        self.commands.push(cmd);
        self.current += 1;

        if self.commands.len() > self.limit {
            let excess = self.commands.len() - self.limit;
            self.commands.drain(..excess);
            self.current -= excess;
            self.clean = self
                .clean
                .and_then(|clean| clean.checked_sub(excess));
        }
    }
}
