use tracing::debug;
use uuid::Uuid;

use super::{CombineNetPoints, CombineNetSignals};
use crate::core::{CommandError, Result};
use crate::project::Project;
use crate::schematic::cmd::{AddNetLine, RemoveNetLine, SetPinNetSignal};
use crate::schematic::Anchor;
use crate::undo::{Command, CommandGroup, CommandState};

/// Unite every net item located at a net point into that net point's net.
///
/// Steps, each as child commands:
/// 1. all net signals meeting at the point are combined into one,
/// 2. other net points at the same position are folded into the net point,
/// 3. net lines passing through the position are split at the net point,
/// 4. pins at the position, and pins at the ends of split lines, get the
///    resulting net signal.
///
/// With nothing to unite no child is created and `execute` returns `false`.
#[derive(Debug)]
pub struct CombineAllNetSignalsUnderNetPoint {
    group: CommandGroup,
    schematic: Uuid,
    net_point: Uuid,
    preferred_net_signal: Option<Uuid>,
}

impl CombineAllNetSignalsUnderNetPoint {
    pub fn new(schematic: Uuid, net_point: Uuid) -> Self {
        Self {
            group: CommandGroup::new("Combine net items at net point"),
            schematic,
            net_point,
            preferred_net_signal: None,
        }
    }

    /// Make `net_signal` the signal everything ends up on.
    pub fn with_preferred_net_signal(mut self, net_signal: Uuid) -> Self {
        self.preferred_net_signal = Some(net_signal);
        self
    }

    /// Pick the signal that survives: the preferred one, else the first with a
    /// user-given name, else the net point's own.
    fn resulting_net_signal(
        &self,
        project: &Project,
        own: Uuid,
        candidates: &[Uuid],
    ) -> Result<Uuid> {
        if let Some(preferred) = self.preferred_net_signal {
            if project.circuit().net_signal(preferred).is_none() {
                return Err(CommandError::missing(format_args!("net signal {}", preferred)));
            }
            return Ok(preferred);
        }
        let named = candidates.iter().copied().find(|uuid| {
            project
                .circuit()
                .net_signal(*uuid)
                .is_some_and(|ns| !ns.has_auto_name)
        });
        Ok(named.unwrap_or(own))
    }
}

impl Command for CombineAllNetSignalsUnderNetPoint {
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
        let schematic = project.try_schematic(self.schematic)?;
        schematic.check_consistency(project.circuit())?;
        let net_point = schematic
            .net_point(self.net_point)
            .ok_or_else(|| CommandError::missing(format_args!("net point {}", self.net_point)))?;
        let position = net_point.position;
        let anchor = Anchor::NetPoint(net_point.uuid);

        // net signals meeting at the position, net point's own first
        let own_signal = net_point.net_signal;
        let mut signals: Vec<Uuid> = vec![own_signal];
        let others = schematic
            .net_points_at(position)
            .into_iter()
            .filter(|np| np.uuid != self.net_point)
            .map(|np| np.net_signal);
        let lines = schematic
            .net_lines_at(position)
            .into_iter()
            .filter(|nl| !nl.is_attached_to(anchor))
            .flat_map(|nl| schematic.net_line_net_signals(nl));
        let pins = schematic
            .symbol_pins_at(position)
            .into_iter()
            .filter_map(|p| p.net_signal);
        for signal in others.chain(lines).chain(pins) {
            if !signals.contains(&signal) {
                signals.push(signal);
            }
        }
        let result = self.resulting_net_signal(project, own_signal, &signals)?;
        debug!(
            "{} net signal(s) at {}, keeping {}",
            signals.len(),
            position,
            result
        );

        let (schematic_uuid, net_point_uuid) = (self.schematic, self.net_point);
        self.group.execute_with(project, |group, project| {
            for signal in signals.into_iter().filter(|s| *s != result) {
                let cmd = CombineNetSignals::new(signal, result);
                group.exec_new_child_cmd(project, Box::new(cmd))?;
            }

            let others: Vec<Uuid> = project
                .try_schematic(schematic_uuid)?
                .net_points_at(position)
                .into_iter()
                .map(|np| np.uuid)
                .filter(|uuid| *uuid != net_point_uuid)
                .collect();
            for other in others {
                group.exec_new_child_cmd(
                    project,
                    Box::new(CombineNetPoints::new(schematic_uuid, other, net_point_uuid)),
                )?;
            }

            // split lines running through the position; lines ending there
            // (e.g. at a pin) are connected already
            let schematic = project.try_schematic(schematic_uuid)?;
            let mut children: Vec<Box<dyn Command>> = Vec::new();
            // pins wired to the net point, directly or through a split line
            let mut pins: Vec<Uuid> = Vec::new();
            for nl in schematic.net_lines_at(position) {
                if nl.is_attached_to(anchor) {
                    continue;
                }
                let ends_here = [nl.start, nl.end].iter().any(|end| {
                    schematic
                        .anchor_position(*end)
                        .is_some_and(|p| schematic.is_near(p, position))
                });
                if ends_here {
                    continue;
                }
                children.push(Box::new(RemoveNetLine::new(schematic_uuid, nl.uuid)));
                children.push(Box::new(AddNetLine::new(schematic_uuid, nl.start, anchor)));
                children.push(Box::new(AddNetLine::new(schematic_uuid, anchor, nl.end)));
                for end in [nl.start, nl.end] {
                    if let Anchor::Pin(pin) = end {
                        pins.push(pin);
                    }
                }
            }
            pins.extend(schematic.symbol_pins_at(position).into_iter().map(|p| p.uuid));
            let mut seen: Vec<Uuid> = Vec::new();
            for pin in pins {
                if seen.contains(&pin) {
                    continue;
                }
                seen.push(pin);
                let current = schematic
                    .symbol_pin(pin)
                    .ok_or_else(|| CommandError::missing(format_args!("symbol pin {}", pin)))?
                    .net_signal;
                if current != Some(result) {
                    children.push(Box::new(SetPinNetSignal::new(
                        schematic_uuid,
                        pin,
                        Some(result),
                    )));
                }
            }
            for cmd in children {
                group.exec_new_child_cmd(project, cmd)?;
            }

            // the net point itself must carry the result (preferred signal)
            let own = project
                .try_schematic(schematic_uuid)?
                .net_point(net_point_uuid)
                .map(|np| np.net_signal);
            if own != Some(result) {
                return Err(CommandError::InconsistentModel(format!(
                    "net point {} did not end up on net signal {}",
                    net_point_uuid, result
                )));
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
