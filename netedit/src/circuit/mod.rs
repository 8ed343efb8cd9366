//! Circuit registry
//!
//! The circuit owns every net class and net signal of a project and
//! guarantees their names are unique. Lookups are plain queries; all
//! modifications go through the commands in [`cmd`] so that they can be undone.

pub mod cmd;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::{CommandError, EntityKind, Result};

/// A named category of net signals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetClass {
    pub uuid: Uuid,
    pub name: String,
}

/// A named electrical node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetSignal {
    pub uuid: Uuid,
    pub name: String,
    /// The net class this signal belongs to.
    pub net_class: Uuid,
    /// True if the name was generated rather than chosen by the user.
    pub has_auto_name: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Circuit {
    net_classes: Vec<NetClass>,
    net_signals: Vec<NetSignal>,
}

impl Circuit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn net_classes(&self) -> &[NetClass] {
        &self.net_classes
    }

    pub fn net_signals(&self) -> &[NetSignal] {
        &self.net_signals
    }

    pub fn net_class(&self, uuid: Uuid) -> Option<&NetClass> {
        self.net_classes.iter().find(|nc| nc.uuid == uuid)
    }

    pub fn net_class_by_name(&self, name: &str) -> Option<&NetClass> {
        self.net_classes.iter().find(|nc| nc.name == name)
    }

    pub fn net_signal(&self, uuid: Uuid) -> Option<&NetSignal> {
        self.net_signals.iter().find(|ns| ns.uuid == uuid)
    }

    pub fn net_signal_by_name(&self, name: &str) -> Option<&NetSignal> {
        self.net_signals.iter().find(|ns| ns.name == name)
    }

    /// Signals belonging to the net class `uuid`.
    pub fn net_signals_of_class(&self, uuid: Uuid) -> impl Iterator<Item = &NetSignal> {
        self.net_signals.iter().filter(move |ns| ns.net_class == uuid)
    }

    /// First unused name of the form `N#<n>`.
    pub fn generate_auto_net_signal_name(&self) -> String {
        let mut i = 1usize;
        loop {
            let name = format!("N#{}", i);
            if self.net_signal_by_name(&name).is_none() {
                return name;
            }
            i += 1;
        }
    }

    pub(crate) fn add_net_class(&mut self, net_class: NetClass) -> Result<()> {
        self.insert_net_class(self.net_classes.len(), net_class)
    }

    pub(crate) fn insert_net_class(&mut self, index: usize, net_class: NetClass) -> Result<()> {
        check_name(EntityKind::NetClass, &net_class.name)?;
        if self.net_class_by_name(&net_class.name).is_some() {
            return Err(CommandError::NameCollision {
                kind: EntityKind::NetClass,
                name: net_class.name,
            });
        }
        if self.net_class(net_class.uuid).is_some() {
            return Err(CommandError::InconsistentModel(format!(
                "net class {} is already in the circuit",
                net_class.uuid
            )));
        }
        let index = index.min(self.net_classes.len());
        self.net_classes.insert(index, net_class);
        Ok(())
    }

    /// Remove a net class that no signal refers to. Returns its former index.
    pub(crate) fn remove_net_class(&mut self, uuid: Uuid) -> Result<(usize, NetClass)> {
        let index = self
            .net_classes
            .iter()
            .position(|nc| nc.uuid == uuid)
            .ok_or_else(|| CommandError::missing(format_args!("net class {}", uuid)))?;
        if self.net_signals_of_class(uuid).next().is_some() {
            return Err(CommandError::InconsistentModel(format!(
                "net class \"{}\" is still in use",
                self.net_classes[index].name
            )));
        }
        Ok((index, self.net_classes.remove(index)))
    }

    pub(crate) fn add_net_signal(&mut self, net_signal: NetSignal) -> Result<()> {
        self.insert_net_signal(self.net_signals.len(), net_signal)
    }

    pub(crate) fn insert_net_signal(&mut self, index: usize, net_signal: NetSignal) -> Result<()> {
        check_name(EntityKind::NetSignal, &net_signal.name)?;
        if self.net_signal_by_name(&net_signal.name).is_some() {
            return Err(CommandError::NameCollision {
                kind: EntityKind::NetSignal,
                name: net_signal.name,
            });
        }
        if self.net_signal(net_signal.uuid).is_some() {
            return Err(CommandError::InconsistentModel(format!(
                "net signal {} is already in the circuit",
                net_signal.uuid
            )));
        }
        if self.net_class(net_signal.net_class).is_none() {
            return Err(CommandError::missing(format_args!(
                "net class {}",
                net_signal.net_class
            )));
        }
        let index = index.min(self.net_signals.len());
        self.net_signals.insert(index, net_signal);
        Ok(())
    }

    /// Remove a net signal. Callers make sure nothing in the schematics
    /// still refers to it.
    pub(crate) fn remove_net_signal(&mut self, uuid: Uuid) -> Result<(usize, NetSignal)> {
        let index = self
            .net_signals
            .iter()
            .position(|ns| ns.uuid == uuid)
            .ok_or_else(|| CommandError::missing(format_args!("net signal {}", uuid)))?;
        Ok((index, self.net_signals.remove(index)))
    }
}

fn check_name(kind: EntityKind, name: &str) -> Result<()> {
    if name.trim().is_empty() || name.trim() != name {
        return Err(CommandError::InvalidName {
            kind,
            name: name.to_string(),
        });
    }
    Ok(())
}
