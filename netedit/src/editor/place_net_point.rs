use tracing::{debug, warn};
use uuid::Uuid;

use super::CombineAllNetSignalsUnderNetPoint;
use crate::circuit::cmd::{AddNetClass, AddNetSignal};
use crate::core::Result;
use crate::geometry::Point;
use crate::project::Project;
use crate::schematic::cmd::AddNetPoint;
use crate::undo::{Command, CommandGroup, CommandState};

/// Place a net point on a schematic.
///
/// If a net point already exists at the position the first one (schematic
/// order) is reused. Otherwise a new one is created on the requested net
/// signal, which itself is reused if it exists or created (together with its
/// net class) if not. An empty signal name creates an auto-named signal.
/// Finally everything at the position is merged into the resulting net point.
///
/// All of this happens in one undo step: if any part fails, the parts already
/// done are undone before the error is returned.
///
/// ```
/// use netedit::prelude::*;
///
/// let mut project = Project::new();
/// let schematic = project.add_schematic(Schematic::new("Main", &EditorOptions::default()));
///
/// let mut cmd = PlaceNetPointCommand::new(schematic, Point::new(0, 0), "default", "");
/// assert!(cmd.execute(&mut project).unwrap());
/// assert_eq!(project.circuit().net_signals()[0].name, "N#1");
/// ```
#[derive(Debug)]
pub struct PlaceNetPointCommand {
    group: CommandGroup,
    schematic: Uuid,
    position: Point,
    net_class_name: String,
    net_signal_name: String,
    net_point: Option<Uuid>,
}

impl PlaceNetPointCommand {
    pub fn new(
        schematic: Uuid,
        position: Point,
        net_class_name: impl Into<String>,
        net_signal_name: impl Into<String>,
    ) -> Self {
        Self {
            group: CommandGroup::new("Place net point"),
            schematic,
            position,
            net_class_name: net_class_name.into(),
            net_signal_name: net_signal_name.into(),
            net_point: None,
        }
    }

    /// The placed (or reused) net point, once executed.
    pub fn net_point(&self) -> Option<Uuid> {
        self.net_point
    }

    pub fn child_count(&self) -> usize {
        self.group.child_count()
    }

    fn place(&mut self, project: &mut Project) -> Result<Uuid> {
        let existing = project
            .try_schematic(self.schematic)?
            .net_points_at(self.position)
            .first()
            .map(|np| (np.uuid, np.net_signal));

        let (net_point, preferred) = match existing {
            None => {
                let net_signal = self.get_or_create_net_signal(project)?;
                let net_point = self.create_net_point(project, net_signal)?;
                (net_point, None)
            }
            Some((net_point, net_signal)) => {
                debug!("Reusing net point {} at {}", net_point, self.position);
                let current_name = project
                    .circuit()
                    .net_signal(net_signal)
                    .map(|ns| ns.name.as_str());
                let preferred = if self.net_signal_name.is_empty()
                    || current_name == Some(self.net_signal_name.as_str())
                {
                    None
                } else {
                    Some(self.get_or_create_net_signal(project)?)
                };
                (net_point, preferred)
            }
        };

        // merge all net items under the resulting net point together
        let mut combine = CombineAllNetSignalsUnderNetPoint::new(self.schematic, net_point);
        if let Some(net_signal) = preferred {
            combine = combine.with_preferred_net_signal(net_signal);
        }
        self.group.exec_new_child_cmd(project, Box::new(combine))?;
        Ok(net_point)
    }

    fn get_or_create_net_signal(&mut self, project: &mut Project) -> Result<Uuid> {
        let circuit = project.circuit();
        if !self.net_signal_name.is_empty() {
            if let Some(net_signal) = circuit.net_signal_by_name(&self.net_signal_name) {
                let same_class = self.net_class_name.is_empty()
                    || circuit
                        .net_class(net_signal.net_class)
                        .is_some_and(|nc| nc.name == self.net_class_name);
                if same_class {
                    return Ok(net_signal.uuid);
                }
                // a signal of another class: adding it below reports the collision
            }
        }

        let net_class = match circuit.net_class_by_name(&self.net_class_name) {
            Some(net_class) => net_class.uuid,
            None => {
                let cmd = AddNetClass::new(self.net_class_name.clone());
                let uuid = cmd.uuid();
                self.group.exec_new_child_cmd(project, Box::new(cmd))?;
                uuid
            }
        };

        let name = Some(self.net_signal_name.clone()).filter(|n| !n.is_empty());
        let cmd = AddNetSignal::new(net_class, name);
        let uuid = cmd.uuid();
        self.group.exec_new_child_cmd(project, Box::new(cmd))?;
        Ok(uuid)
    }

    fn create_net_point(&mut self, project: &mut Project, net_signal: Uuid) -> Result<Uuid> {
        let cmd = AddNetPoint::new(self.schematic, net_signal, self.position);
        let uuid = cmd.uuid();
        self.group.exec_new_child_cmd(project, Box::new(cmd))?;
        Ok(uuid)
    }
}

impl Command for PlaceNetPointCommand {
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
        // if an error occurs, undo all already executed child commands
        let guard = CommandGroup::rollback_guard();
        match self.place(project) {
            Ok(net_point) => {
                guard.dismiss();
                self.net_point = Some(net_point);
                Ok(self.group.child_count() > 0)
            }
            Err(err) => {
                warn!("Placing net point at {} failed: {}", self.position, err);
                guard.rollback((&mut self.group, project));
                Err(err)
            }
        }
    }

    fn perform_undo(&mut self, project: &mut Project) -> Result<()> {
        self.group.undo_children(project)
    }

    fn perform_redo(&mut self, project: &mut Project) -> Result<()> {
        self.group.redo_children(project)
    }
}
