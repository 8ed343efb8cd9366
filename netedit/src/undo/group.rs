use tracing::{debug, error, warn};

use super::command::{Command, CommandState};
use super::scope::ScopedRollback;
use crate::core::{CommandError, Result};
use crate::project::Project;

/// Rollback guard used by every group: undoes the executed children.
pub type GroupRollback = ScopedRollback<fn((&mut CommandGroup, &mut Project))>;

/// A command made of an ordered list of child commands.
///
/// Children are executed and redone in insertion order and undone in reverse
/// order. Only children that executed successfully *and* changed something are
/// kept, so `child_count() > 0` is exactly "this group modified the project".
///
/// Specialized groups (e.g. [`crate::editor::PlaceNetPointCommand`]) embed a
/// `CommandGroup` and add children from their own `perform_execute` via
/// [`CommandGroup::exec_new_child_cmd`].
#[derive(Debug)]
pub struct CommandGroup {
    text: String,
    state: CommandState,
    pending: Vec<Box<dyn Command>>,
    children: Vec<Box<dyn Command>>,
}

impl CommandGroup {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            state: CommandState::Created,
            pending: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Queue a child to run when the group executes.
    ///
    /// Only allowed before `execute`; while executing use
    /// [`CommandGroup::exec_new_child_cmd`].
    pub fn append_child(&mut self, cmd: Box<dyn Command>) -> Result<()> {
        if self.state != CommandState::Created {
            return Err(CommandError::invalid_state(
                &self.text,
                format!("cannot accept queued children while {}", self.state),
            ));
        }
        self.pending.push(cmd);
        Ok(())
    }

    /// Execute `cmd` now and take ownership of it if it changed anything.
    ///
    /// A failing child is dropped and its error returned; the caller is
    /// responsible for rolling back the children executed before it.
    pub fn exec_new_child_cmd(
        &mut self,
        project: &mut Project,
        mut cmd: Box<dyn Command>,
    ) -> Result<bool> {
        if self.state != CommandState::Executing {
            return Err(CommandError::invalid_state(
                &self.text,
                format!("cannot execute children while {}", self.state),
            ));
        }
        let changed = cmd.execute(project)?;
        if changed {
            debug!("{}: executed child \"{}\"", self.text, cmd.text());
            self.children.push(cmd);
        } else {
            debug!("{}: child \"{}\" changed nothing", self.text, cmd.text());
        }
        Ok(changed)
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Texts of the kept children in execution order.
    pub fn child_texts(&self) -> Vec<&str> {
        self.children.iter().map(|c| c.text()).collect()
    }

    pub fn rollback_guard() -> GroupRollback {
        let action: fn((&mut CommandGroup, &mut Project)) =
            |(group, project)| group.rollback(project);
        ScopedRollback::new(action)
    }

    /// Run `build` as the body of this group's execution, undoing every child
    /// it executed if it fails.
    pub fn execute_with<F>(&mut self, project: &mut Project, build: F) -> Result<bool>
    where
        F: FnOnce(&mut CommandGroup, &mut Project) -> Result<()>,
    {
        let guard = Self::rollback_guard();
        match build(self, project) {
            Ok(()) => {
                guard.dismiss();
                Ok(self.child_count() > 0)
            }
            Err(err) => {
                guard.rollback((self, project));
                Err(err)
            }
        }
    }

    /// Undo and discard every executed child (reverse order).
    pub(crate) fn rollback(&mut self, project: &mut Project) {
        if !self.children.is_empty() {
            warn!(
                "{}: rolling back {} child command(s)",
                self.text,
                self.children.len()
            );
        }
        while let Some(mut child) = self.children.pop() {
            if let Err(err) = child.undo(project) {
                error!(
                    "{}: rollback of \"{}\" failed: {}",
                    self.text,
                    child.text(),
                    err
                );
            }
        }
    }

    pub(crate) fn undo_children(&mut self, project: &mut Project) -> Result<()> {
        for i in (0..self.children.len()).rev() {
            if let Err(err) = self.children[i].undo(project) {
                // restore the children already undone
                for child in self.children[i + 1..].iter_mut() {
                    if let Err(redo_err) = child.redo(project) {
                        error!("{}: restoring \"{}\" failed: {}", self.text, child.text(), redo_err);
                    }
                }
                return Err(err);
            }
        }
        Ok(())
    }

    pub(crate) fn redo_children(&mut self, project: &mut Project) -> Result<()> {
        for i in 0..self.children.len() {
            if let Err(err) = self.children[i].redo(project) {
                for child in self.children[..i].iter_mut().rev() {
                    if let Err(undo_err) = child.undo(project) {
                        error!("{}: restoring \"{}\" failed: {}", self.text, child.text(), undo_err);
                    }
                }
                return Err(err);
            }
        }
        Ok(())
    }
}

impl Command for CommandGroup {
    fn text(&self) -> &str {
        &self.text
    }

    fn state(&self) -> CommandState {
        self.state
    }

    fn set_state(&mut self, state: CommandState) {
        self.state = state;
    }

    fn perform_execute(&mut self, project: &mut Project) -> Result<bool> {
        let pending = std::mem::take(&mut self.pending);
        self.execute_with(project, |group, project| {
            for cmd in pending {
                group.exec_new_child_cmd(project, cmd)?;
            }
            Ok(())
        })
    }

    fn perform_undo(&mut self, project: &mut Project) -> Result<()> {
        self.undo_children(project)
    }

    fn perform_redo(&mut self, project: &mut Project) -> Result<()> {
        self.redo_children(project)
    }
}
