use uuid::Uuid;

use crate::circuit::cmd::RemoveNetSignal;
use crate::core::{CommandError, Result};
use crate::project::Project;
use crate::schematic::cmd::{SetNetPointNetSignal, SetPinNetSignal};
use crate::undo::{Command, CommandGroup, CommandState};

/// Move everything on net signal `from` over to `into`, then delete `from`.
///
/// Affects net points and pins of every schematic in the project.
#[derive(Debug)]
pub struct CombineNetSignals {
    group: CommandGroup,
    from: Uuid,
    into: Uuid,
}

impl CombineNetSignals {
    pub fn new(from: Uuid, into: Uuid) -> Self {
        Self {
            group: CommandGroup::new("Combine net signals"),
            from,
            into,
        }
    }
}

impl Command for CombineNetSignals {
    fn text(&self) -> &str {
        self.group.text()
    }

    fn state(&self) -> CommandState {
        self.group.state()
    }

    fn set_state(&mut self, state: CommandState) {
        self.group.set_state(state);
    }

    fn perform_execute(&mut self, project: &mut Project) -> Result<bool> {
        if self.from == self.into {
            return Ok(false);
        }
        for uuid in [self.from, self.into] {
            if project.circuit().net_signal(uuid).is_none() {
                return Err(CommandError::missing(format_args!("net signal {}", uuid)));
            }
        }

        let (from, into) = (self.from, self.into);
        self.group.execute_with(project, |group, project| {
            let mut children: Vec<Box<dyn Command>> = Vec::new();
            for schematic in project.schematics() {
                for np in schematic.net_points().iter().filter(|np| np.net_signal == from) {
                    children.push(Box::new(SetNetPointNetSignal::new(
                        schematic.uuid,
                        np.uuid,
                        into,
                    )));
                }
                for pin in schematic
                    .symbol_pins()
                    .iter()
                    .filter(|p| p.net_signal == Some(from))
                {
                    children.push(Box::new(SetPinNetSignal::new(
                        schematic.uuid,
                        pin.uuid,
                        Some(into),
                    )));
                }
            }
            children.push(Box::new(RemoveNetSignal::new(from)));

            for cmd in children {
                group.exec_new_child_cmd(project, cmd)?;
            }
            Ok(())
        })
    }

    fn perform_undo(&mut self, project: &mut Project) -> Result<()> {
        self.group.undo_children(project)
    }

    fn perform_redo(&mut self, project: &mut Project) -> Result<()> {
        self.group.redo_children(project)
    }
}
