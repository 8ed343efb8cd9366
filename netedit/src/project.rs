//! The mutable context every command operates on.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::circuit::Circuit;
use crate::core::{CommandError, Result};
use crate::schematic::Schematic;

/// One circuit plus the schematics drawing it.
///
/// Cloning a project gives a structural snapshot; two projects compare equal
/// iff every entity, its identity and its order are the same.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    circuit: Circuit,
    schematics: Vec<Schematic>,
}

impl Project {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    pub(crate) fn circuit_mut(&mut self) -> &mut Circuit {
        &mut self.circuit
    }

    pub fn schematics(&self) -> &[Schematic] {
        &self.schematics
    }

    pub fn schematic(&self, uuid: Uuid) -> Option<&Schematic> {
        self.schematics.iter().find(|s| s.uuid == uuid)
    }

    /// Mutable access for placing symbol pins; net items are only changed
    /// through commands.
    pub fn schematic_mut(&mut self, uuid: Uuid) -> Option<&mut Schematic> {
        self.schematics.iter_mut().find(|s| s.uuid == uuid)
    }

    pub fn add_schematic(&mut self, schematic: Schematic) -> Uuid {
        let uuid = schematic.uuid;
        self.schematics.push(schematic);
        uuid
    }

    pub(crate) fn try_schematic(&self, uuid: Uuid) -> Result<&Schematic> {
        self.schematic(uuid)
            .ok_or_else(|| CommandError::missing(format_args!("schematic {}", uuid)))
    }

    pub(crate) fn try_schematic_mut(&mut self, uuid: Uuid) -> Result<&mut Schematic> {
        self.schematic_mut(uuid)
            .ok_or_else(|| CommandError::missing(format_args!("schematic {}", uuid)))
    }

    /// True if any net point or pin of any schematic refers to the signal.
    pub fn is_net_signal_used(&self, net_signal: Uuid) -> bool {
        self.schematics.iter().any(|s| {
            s.net_points().iter().any(|np| np.net_signal == net_signal)
                || s.symbol_pins()
                    .iter()
                    .any(|p| p.net_signal == Some(net_signal))
        })
    }

    pub fn check_consistency(&self) -> Result<()> {
        for schematic in &self.schematics {
            schematic.check_consistency(&self.circuit)?;
        }
        Ok(())
    }
}
