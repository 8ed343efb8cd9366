//! Undoable modifications of the circuit registry.

use tracing::debug;
use uuid::Uuid;

use super::{NetClass, NetSignal};
use crate::core::{CommandError, Result};
use crate::project::Project;
use crate::undo::{Command, CommandState};

/// Add a new net class.
#[derive(Debug)]
pub struct AddNetClass {
    state: CommandState,
    net_class: NetClass,
}

impl AddNetClass {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            state: CommandState::Created,
            net_class: NetClass {
                uuid: Uuid::new_v4(),
                name: name.into(),
            },
        }
    }

    /// UUID the new net class gets.
    pub fn uuid(&self) -> Uuid {
        self.net_class.uuid
    }
}

impl Command for AddNetClass {
    fn text(&self) -> &str {
        "Add net class"
    }

    fn state(&self) -> CommandState {
        self.state
    }

    fn set_state(&mut self, state: CommandState) {
        self.state = state;
    }

    fn perform_execute(&mut self, project: &mut Project) -> Result<bool> {
        self.perform_redo(project)?;
        debug!("Added net class \"{}\"", self.net_class.name);
        Ok(true)
    }

    fn perform_undo(&mut self, project: &mut Project) -> Result<()> {
        project.circuit_mut().remove_net_class(self.net_class.uuid)?;
        Ok(())
    }

    fn perform_redo(&mut self, project: &mut Project) -> Result<()> {
        project.circuit_mut().add_net_class(self.net_class.clone())
    }
}

/// Add a new net signal to an existing net class.
///
/// Without a requested name (or with an empty one) a unique `N#<n>` name is
/// generated when the command first executes; redo reuses that name.
#[derive(Debug)]
pub struct AddNetSignal {
    state: CommandState,
    uuid: Uuid,
    net_class: Uuid,
    requested_name: Option<String>,
    net_signal: Option<NetSignal>,
}

impl AddNetSignal {
    pub fn new(net_class: Uuid, name: Option<String>) -> Self {
        Self {
            state: CommandState::Created,
            uuid: Uuid::new_v4(),
            net_class,
            requested_name: name.filter(|n| !n.is_empty()),
            net_signal: None,
        }
    }

    /// Signal with a generated name.
    pub fn auto_named(net_class: Uuid) -> Self {
        Self::new(net_class, None)
    }

    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    /// The created signal (available once executed).
    pub fn net_signal(&self) -> Option<&NetSignal> {
        self.net_signal.as_ref()
    }
}

impl Command for AddNetSignal {
    fn text(&self) -> &str {
        "Add net signal"
    }

    fn state(&self) -> CommandState {
        self.state
    }

    fn set_state(&mut self, state: CommandState) {
        self.state = state;
    }

    fn perform_execute(&mut self, project: &mut Project) -> Result<bool> {
        let circuit = project.circuit_mut();
        let (name, has_auto_name) = match &self.requested_name {
            Some(name) => (name.clone(), false),
            None => (circuit.generate_auto_net_signal_name(), true),
        };
        let net_signal = NetSignal {
            uuid: self.uuid,
            name,
            net_class: self.net_class,
            has_auto_name,
        };
        circuit.add_net_signal(net_signal.clone())?;
        debug!("Added net signal \"{}\"", net_signal.name);
        self.net_signal = Some(net_signal);
        Ok(true)
    }

    fn perform_undo(&mut self, project: &mut Project) -> Result<()> {
        project.circuit_mut().remove_net_signal(self.uuid)?;
        Ok(())
    }

    fn perform_redo(&mut self, project: &mut Project) -> Result<()> {
        let net_signal = self
            .net_signal
            .clone()
            .ok_or_else(|| CommandError::invalid_state(self.text(), "has no signal to restore"))?;
        project.circuit_mut().add_net_signal(net_signal)
    }
}

/// Remove a net signal nothing refers to anymore.
#[derive(Debug)]
pub struct RemoveNetSignal {
    state: CommandState,
    uuid: Uuid,
    removed: Option<(usize, NetSignal)>,
}

impl RemoveNetSignal {
    pub fn new(net_signal: Uuid) -> Self {
        Self {
            state: CommandState::Created,
            uuid: net_signal,
            removed: None,
        }
    }
}

impl Command for RemoveNetSignal {
    fn text(&self) -> &str {
        "Remove net signal"
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
        let (index, net_signal) = self
            .removed
            .take()
            .ok_or_else(|| CommandError::invalid_state(self.text(), "has no signal to restore"))?;
        project.circuit_mut().insert_net_signal(index, net_signal)
    }

    fn perform_redo(&mut self, project: &mut Project) -> Result<()> {
        if project.is_net_signal_used(self.uuid) {
            let name = project
                .circuit()
                .net_signal(self.uuid)
                .map(|ns| ns.name.clone())
                .unwrap_or_else(|| self.uuid.to_string());
            return Err(CommandError::InconsistentModel(format!(
                "net signal \"{}\" is still in use",
                name
            )));
        }
        self.removed = Some(project.circuit_mut().remove_net_signal(self.uuid)?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::EntityKind;

    #[test]
    fn test_add_net_class_undo_redo() {
        let mut project = Project::default();
        let mut cmd = AddNetClass::new("default");
        let uuid = cmd.uuid();

        assert!(cmd.execute(&mut project).unwrap());
        assert_eq!(project.circuit().net_class_by_name("default").unwrap().uuid, uuid);

        cmd.undo(&mut project).unwrap();
        assert!(project.circuit().net_classes().is_empty());

        cmd.redo(&mut project).unwrap();
        assert_eq!(project.circuit().net_class(uuid).unwrap().name, "default");
    }

    #[test]
    fn test_add_net_class_collision() {
        let mut project = Project::default();
        AddNetClass::new("default").execute(&mut project).unwrap();
        let mut cmd = AddNetClass::new("default");
        let err = cmd.execute(&mut project).unwrap_err();
        assert_eq!(
            err,
            CommandError::NameCollision {
                kind: EntityKind::NetClass,
                name: "default".to_string()
            }
        );
        assert_eq!(cmd.state(), CommandState::Failed);
    }

    #[test]
    fn test_auto_named_signal_keeps_name_on_redo() {
        let mut project = Project::default();
        let mut class = AddNetClass::new("default");
        class.execute(&mut project).unwrap();

        let mut cmd = AddNetSignal::auto_named(class.uuid());
        cmd.execute(&mut project).unwrap();
        assert_eq!(cmd.net_signal().unwrap().name, "N#1");
        assert!(cmd.net_signal().unwrap().has_auto_name);

        cmd.undo(&mut project).unwrap();
        cmd.redo(&mut project).unwrap();
        assert_eq!(project.circuit().net_signal(cmd.uuid()).unwrap().name, "N#1");
    }

    #[test]
    fn test_empty_requested_name_means_auto_name() {
        let mut project = Project::default();
        let mut class = AddNetClass::new("default");
        class.execute(&mut project).unwrap();

        let mut cmd = AddNetSignal::new(class.uuid(), Some(String::new()));
        cmd.execute(&mut project).unwrap();
        assert!(cmd.net_signal().unwrap().has_auto_name);
    }

    #[test]
    fn test_remove_net_signal_restores_position() {
        let mut project = Project::default();
        let mut class = AddNetClass::new("default");
        class.execute(&mut project).unwrap();
        for name in ["A", "B", "C"] {
            AddNetSignal::new(class.uuid(), Some(name.to_string()))
                .execute(&mut project)
                .unwrap();
        }
        let before = project.clone();

        let b = project.circuit().net_signal_by_name("B").unwrap().uuid;
        let mut cmd = RemoveNetSignal::new(b);
        cmd.execute(&mut project).unwrap();
        assert!(project.circuit().net_signal_by_name("B").is_none());

        cmd.undo(&mut project).unwrap();
        assert_eq!(project, before);
    }
}
