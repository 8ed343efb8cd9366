use uuid::Uuid;

use crate::core::{CommandError, Result};
use crate::project::Project;
use crate::schematic::cmd::{AddNetLine, RemoveNetLine, RemoveNetPoint};
use crate::schematic::Anchor;
use crate::undo::{Command, CommandGroup, CommandState};

/// Fold net point `remove` into net point `keep`.
///
/// Every net line of `remove` is re-attached to `keep`; lines that would
/// connect `keep` to itself, or duplicate an existing connection, are dropped.
/// Both points must already be on the same net signal.
#[derive(Debug)]
pub struct CombineNetPoints {
    group: CommandGroup,
    schematic: Uuid,
    remove: Uuid,
    keep: Uuid,
}

impl CombineNetPoints {
    pub fn new(schematic: Uuid, remove: Uuid, keep: Uuid) -> Self {
        Self {
            group: CommandGroup::new("Combine net points"),
            schematic,
            remove,
            keep,
        }
    }
}

impl Command for CombineNetPoints {
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
        if self.remove == self.keep {
            return Ok(false);
        }
        let schematic = project.try_schematic(self.schematic)?;
        let (Some(remove), Some(keep)) = (
            schematic.net_point(self.remove),
            schematic.net_point(self.keep),
        ) else {
            return Err(CommandError::InconsistentModel(
                "cannot combine net points which do not exist".to_string(),
            ));
        };
        if remove.net_signal != keep.net_signal {
            return Err(CommandError::InconsistentModel(format!(
                "net points {} and {} are on different net signals",
                remove.uuid, keep.uuid
            )));
        }

        let (schematic_uuid, remove, keep) = (self.schematic, self.remove, self.keep);
        self.group.execute_with(project, |group, project| {
            let from = Anchor::NetPoint(remove);
            let to = Anchor::NetPoint(keep);
            let schematic = project.try_schematic(schematic_uuid)?;

            // anchors `keep` is connected to, including the ones we add below
            let mut connected: Vec<Anchor> = schematic
                .net_lines_of(to)
                .iter()
                .filter_map(|nl| nl.other_end(to))
                .collect();

            let mut children: Vec<Box<dyn Command>> = Vec::new();
            for nl in schematic.net_lines_of(from) {
                children.push(Box::new(RemoveNetLine::new(schematic_uuid, nl.uuid)));
                let Some(other) = nl.other_end(from) else {
                    continue;
                };
                if other == to || connected.contains(&other) {
                    continue;
                }
                connected.push(other);
                let (start, end) = if nl.start == from {
                    (to, other)
                } else {
                    (other, to)
                };
                children.push(Box::new(AddNetLine::new(schematic_uuid, start, end)));
            }
            children.push(Box::new(RemoveNetPoint::new(schematic_uuid, remove)));

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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::cmd::{AddNetClass, AddNetSignal};
    use crate::core::EditorOptions;
    use crate::geometry::Point;
    use crate::schematic::cmd::AddNetPoint;
    use crate::schematic::Schematic;

    fn exec(project: &mut Project, mut cmd: impl Command) {
        assert!(cmd.execute(project).unwrap());
    }

    struct Fixture {
        project: Project,
        schematic: Uuid,
        signal: Uuid,
    }

    impl Fixture {
        fn new() -> Self {
            let mut project = Project::new();
            let schematic =
                project.add_schematic(Schematic::new("Main", &EditorOptions::default()));
            let class = AddNetClass::new("default");
            let signal = AddNetSignal::new(class.uuid(), Some("S".to_string()));
            let signal_uuid = signal.uuid();
            exec(&mut project, class);
            exec(&mut project, signal);
            Self {
                project,
                schematic,
                signal: signal_uuid,
            }
        }

        fn point(&mut self, signal: Uuid, x: i64) -> Uuid {
            let cmd = AddNetPoint::new(self.schematic, signal, Point::new(x, 0));
            let uuid = cmd.uuid();
            exec(&mut self.project, cmd);
            uuid
        }

        fn line(&mut self, a: Uuid, b: Uuid) {
            let cmd = AddNetLine::new(self.schematic, Anchor::NetPoint(a), Anchor::NetPoint(b));
            exec(&mut self.project, cmd);
        }
    }

    #[test]
    fn test_lines_are_reattached_without_duplicates() {
        let mut f = Fixture::new();
        let keep = f.point(f.signal, 0);
        let remove = f.point(f.signal, 0);
        let c = f.point(f.signal, 1000);
        let d = f.point(f.signal, 2000);
        f.line(keep, c);
        f.line(remove, c);
        f.line(remove, d);
        f.line(keep, remove);
        let before = f.project.clone();

        let mut cmd = CombineNetPoints::new(f.schematic, remove, keep);
        assert!(cmd.execute(&mut f.project).unwrap());

        let sch = f.project.schematic(f.schematic).unwrap();
        assert!(sch.net_point(remove).is_none());
        assert_eq!(sch.net_lines().len(), 2);
        let keep_anchor = Anchor::NetPoint(keep);
        let mut others: Vec<Anchor> = sch
            .net_lines_of(keep_anchor)
            .iter()
            .filter_map(|nl| nl.other_end(keep_anchor))
            .collect();
        others.sort_by_key(|a| a.net_point());
        let mut expected = vec![Anchor::NetPoint(c), Anchor::NetPoint(d)];
        expected.sort_by_key(|a| a.net_point());
        assert_eq!(others, expected);

        cmd.undo(&mut f.project).unwrap();
        assert_eq!(f.project, before);
    }

    #[test]
    fn test_different_signals_are_rejected() {
        let mut f = Fixture::new();
        let class = f.project.circuit().net_classes()[0].uuid;
        let other = AddNetSignal::new(class, Some("T".to_string()));
        let other_uuid = other.uuid();
        exec(&mut f.project, other);
        let keep = f.point(f.signal, 0);
        let remove = f.point(other_uuid, 0);

        let mut cmd = CombineNetPoints::new(f.schematic, remove, keep);
        assert!(matches!(
            cmd.execute(&mut f.project),
            Err(CommandError::InconsistentModel(_))
        ));
    }
}
