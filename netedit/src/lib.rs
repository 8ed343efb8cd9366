//! netedit - transactional net editing for schematics
//!
//! This library provides the undo/redo command engine of a schematic editor
//! and the net editing operations built on it. Every modification of a
//! [`Project`] is a [`Command`]; composite commands either apply completely or
//! leave the project exactly as it was.
//!
//! # Quick Start
//!
//! ```
//! use netedit::prelude::*;
//!
//! let options = EditorOptions::default();
//! let mut project = Project::new();
//! let schematic = project.add_schematic(Schematic::new("Main", &options));
//! let mut stack = UndoStack::new(&options);
//!
//! let cmd = PlaceNetPointCommand::new(schematic, Point::new(0, 0), "default", "GND");
//! assert!(stack.exec_cmd(&mut project, Box::new(cmd)).unwrap());
//! assert!(project.circuit().net_signal_by_name("GND").is_some());
//!
//! stack.undo(&mut project).unwrap();
//! assert!(project.circuit().net_signals().is_empty());
//! ```
//!
//! # Features
//!
//! - **Command engine**: commands, command groups, explicit rollback guards
//! - **Undo stack**: linear history with transactions and clean state
//! - **Net model**: net classes and signals, net points, net lines, pins
//! - **Net placement**: create-or-reuse net points and merge coincident nets

pub mod circuit;
pub mod core;
pub mod editor;
pub mod geometry;
pub mod project;
pub mod schematic;
pub mod undo;

// Re-export main types
pub use circuit::{Circuit, NetClass, NetSignal};
pub use crate::core::{CommandError, EditorOptions, EntityKind, Result};
pub use editor::{
    CombineAllNetSignalsUnderNetPoint, CombineNetPoints, CombineNetSignals, PlaceNetPointCommand,
};
pub use geometry::Point;
pub use project::Project;
pub use schematic::{Anchor, NetLine, NetPoint, Schematic, SymbolPin};
pub use undo::{Command, CommandGroup, CommandState, ScopedRollback, UndoStack};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        Command, CommandError, EditorOptions, PlaceNetPointCommand, Point, Project, Schematic,
        UndoStack,
    };
}
