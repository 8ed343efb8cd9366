//! Undoable modifications of a schematic's net items.

use tracing::debug;
use uuid::Uuid;

use super::{Anchor, NetLine, NetPoint};
use crate::core::{CommandError, Result};
use crate::geometry::Point;
use crate::project::Project;
use crate::undo::{Command, CommandState};

/// Add a net point bound to an existing net signal.
#[derive(Debug)]
pub struct AddNetPoint {
    state: CommandState,
    schematic: Uuid,
    net_point: NetPoint,
}

impl AddNetPoint {
    pub fn new(schematic: Uuid, net_signal: Uuid, position: Point) -> Self {
        Self {
            state: CommandState::Created,
            schematic,
            net_point: NetPoint {
                uuid: Uuid::new_v4(),
                position,
                net_signal,
            },
        }
    }

    pub fn uuid(&self) -> Uuid {
        self.net_point.uuid
    }
}

impl Command for AddNetPoint {
    fn text(&self) -> &str {
        "Add net point"
    }

    fn state(&self) -> CommandState {
        self.state
    }

    fn set_state(&mut self, state: CommandState) {
        self.state = state;
    }

    fn perform_execute(&mut self, project: &mut Project) -> Result<bool> {
        if project.circuit().net_signal(self.net_point.net_signal).is_none() {
            return Err(CommandError::missing(format_args!(
                "net signal {}",
                self.net_point.net_signal
            )));
        }
        project
            .try_schematic(self.schematic)?
            .check_position(self.net_point.position)?;
        self.perform_redo(project)?;
        debug!("Added net point at {}", self.net_point.position);
        Ok(true)
    }

    fn perform_undo(&mut self, project: &mut Project) -> Result<()> {
        project
            .try_schematic_mut(self.schematic)?
            .remove_net_point(self.net_point.uuid)?;
        Ok(())
    }

    fn perform_redo(&mut self, project: &mut Project) -> Result<()> {
        project
            .try_schematic_mut(self.schematic)?
            .insert_net_point(usize::MAX, self.net_point.clone())
    }
}

/// Remove a net point that has no net lines left.
#[derive(Debug)]
pub struct RemoveNetPoint {
    state: CommandState,
    schematic: Uuid,
    uuid: Uuid,
    removed: Option<(usize, NetPoint)>,
}

impl RemoveNetPoint {
    pub fn new(schematic: Uuid, net_point: Uuid) -> Self {
        Self {
            state: CommandState::Created,
            schematic,
            uuid: net_point,
            removed: None,
        }
    }
}

impl Command for RemoveNetPoint {
    fn text(&self) -> &str {
        "Remove net point"
    }

    fn state(&self) -> CommandState {
        self.state
    }

    fn set_state(&mut self, state: CommandState) {
        self.state = state;
    }

    fn perform_execute(&mut self, project: &mut Project) -> Result<bool> {
        self.perform_redo(project)?;
        Ok(true)
    }

    fn perform_undo(&mut self, project: &mut Project) -> Result<()> {
        let (index, net_point) = self
            .removed
            .take()
            .ok_or_else(|| CommandError::invalid_state(self.text(), "has nothing to restore"))?;
        project
            .try_schematic_mut(self.schematic)?
            .insert_net_point(index, net_point)
    }

    fn perform_redo(&mut self, project: &mut Project) -> Result<()> {
        let removed = project
            .try_schematic_mut(self.schematic)?
            .remove_net_point(self.uuid)?;
        self.removed = Some(removed);
        Ok(())
    }
}

/// Add a net line between two anchors.
#[derive(Debug)]
pub struct AddNetLine {
    state: CommandState,
    schematic: Uuid,
    net_line: NetLine,
}

impl AddNetLine {
    pub fn new(schematic: Uuid, start: Anchor, end: Anchor) -> Self {
        Self {
            state: CommandState::Created,
            schematic,
            net_line: NetLine {
                uuid: Uuid::new_v4(),
                start,
                end,
            },
        }
    }

    pub fn uuid(&self) -> Uuid {
        self.net_line.uuid
    }
}

impl Command for AddNetLine {
    fn text(&self) -> &str {
        "Add net line"
    }

    fn state(&self) -> CommandState {
        self.state
    }

    fn set_state(&mut self, state: CommandState) {
        self.state = state;
    }

    fn perform_execute(&mut self, project: &mut Project) -> Result<bool> {
        self.perform_redo(project)?;
        Ok(true)
    }

    fn perform_undo(&mut self, project: &mut Project) -> Result<()> {
        project
            .try_schematic_mut(self.schematic)?
            .remove_net_line(self.net_line.uuid)?;
        Ok(())
    }

    fn perform_redo(&mut self, project: &mut Project) -> Result<()> {
        project
            .try_schematic_mut(self.schematic)?
            .insert_net_line(usize::MAX, self.net_line.clone())
    }
}

#[derive(Debug)]
pub struct RemoveNetLine {
    state: CommandState,
    schematic: Uuid,
    uuid: Uuid,
    removed: Option<(usize, NetLine)>,
}

impl RemoveNetLine {
    pub fn new(schematic: Uuid, net_line: Uuid) -> Self {
        Self {
            state: CommandState::Created,
            schematic,
            uuid: net_line,
            removed: None,
        }
    }
}

impl Command for RemoveNetLine {
    fn text(&self) -> &str {
        "Remove net line"
    }

    fn state(&self) -> CommandState {
        self.state
    }

    fn set_state(&mut self, state: CommandState) {
        self.state = state;
    }

    fn perform_execute(&mut self, project: &mut Project) -> Result<bool> {
        self.perform_redo(project)?;
        Ok(true)
    }

    fn perform_undo(&mut self, project: &mut Project) -> Result<()> {
        let (index, net_line) = self
            .removed
            .take()
            .ok_or_else(|| CommandError::invalid_state(self.text(), "has nothing to restore"))?;
        project
            .try_schematic_mut(self.schematic)?
            .insert_net_line(index, net_line)
    }

    fn perform_redo(&mut self, project: &mut Project) -> Result<()> {
        let removed = project
            .try_schematic_mut(self.schematic)?
            .remove_net_line(self.uuid)?;
        self.removed = Some(removed);
        Ok(())
    }
}

/// Move a net point to another net signal.
#[derive(Debug)]
pub struct SetNetPointNetSignal {
    state: CommandState,
    schematic: Uuid,
    net_point: Uuid,
    new_signal: Uuid,
    old_signal: Option<Uuid>,
}

impl SetNetPointNetSignal {
    pub fn new(schematic: Uuid, net_point: Uuid, net_signal: Uuid) -> Self {
        Self {
            state: CommandState::Created,
            schematic,
            net_point,
            new_signal: net_signal,
            old_signal: None,
        }
    }

    fn apply(&self, project: &mut Project, net_signal: Uuid) -> Result<()> {
        project
            .try_schematic_mut(self.schematic)?
            .net_point_mut(self.net_point)?
            .net_signal = net_signal;
        Ok(())
    }
}

impl Command for SetNetPointNetSignal {
    fn text(&self) -> &str {
        "Change net signal of net point"
    }

    fn state(&self) -> CommandState {
        self.state
    }

    fn set_state(&mut self, state: CommandState) {
        self.state = state;
    }

    fn perform_execute(&mut self, project: &mut Project) -> Result<bool> {
        if project.circuit().net_signal(self.new_signal).is_none() {
            return Err(CommandError::missing(format_args!("net signal {}", self.new_signal)));
        }
        let old = project
            .try_schematic(self.schematic)?
            .net_point(self.net_point)
            .map(|np| np.net_signal)
            .ok_or_else(|| CommandError::missing(format_args!("net point {}", self.net_point)))?;
        if old == self.new_signal {
            return Ok(false);
        }
        self.old_signal = Some(old);
        self.apply(project, self.new_signal)?;
        Ok(true)
    }

    fn perform_undo(&mut self, project: &mut Project) -> Result<()> {
        let old = self
            .old_signal
            .ok_or_else(|| CommandError::invalid_state(self.text(), "has nothing to restore"))?;
        self.apply(project, old)
    }

    fn perform_redo(&mut self, project: &mut Project) -> Result<()> {
        self.apply(project, self.new_signal)
    }
}

/// Connect a symbol pin to a net signal (or disconnect it with `None`).
#[derive(Debug)]
pub struct SetPinNetSignal {
    state: CommandState,
    schematic: Uuid,
    pin: Uuid,
    new_signal: Option<Uuid>,
    old_signal: Option<Option<Uuid>>,
}

impl SetPinNetSignal {
    pub fn new(schematic: Uuid, pin: Uuid, net_signal: Option<Uuid>) -> Self {
        Self {
            state: CommandState::Created,
            schematic,
            pin,
            new_signal: net_signal,
            old_signal: None,
        }
    }

    fn apply(&self, project: &mut Project, net_signal: Option<Uuid>) -> Result<()> {
        project
            .try_schematic_mut(self.schematic)?
            .symbol_pin_mut(self.pin)?
            .net_signal = net_signal;
        Ok(())
    }
}

impl Command for SetPinNetSignal {
    fn text(&self) -> &str {
        "Change net signal of pin"
    }

    fn state(&self) -> CommandState {
        self.state
    }

    fn set_state(&mut self, state: CommandState) {
        self.state = state;
    }

    fn perform_execute(&mut self, project: &mut Project) -> Result<bool> {
        if let Some(signal) = self.new_signal {
            if project.circuit().net_signal(signal).is_none() {
                return Err(CommandError::missing(format_args!("net signal {}", signal)));
            }
        }
        let old = project
            .try_schematic(self.schematic)?
            .symbol_pin(self.pin)
            .map(|p| p.net_signal)
            .ok_or_else(|| CommandError::missing(format_args!("symbol pin {}", self.pin)))?;
        if old == self.new_signal {
            return Ok(false);
        }
        self.old_signal = Some(old);
        self.apply(project, self.new_signal)?;
        Ok(true)
    }

    fn perform_undo(&mut self, project: &mut Project) -> Result<()> {
        let old = self
            .old_signal
            .ok_or_else(|| CommandError::invalid_state(self.text(), "has nothing to restore"))?;
        self.apply(project, old)
    }

    fn perform_redo(&mut self, project: &mut Project) -> Result<()> {
        self.apply(project, self.new_signal)
    }
}
