//! Command engine.
//!
//! - [`Command`] - reversible unit of work with an enforced life-cycle
//! - [`CommandGroup`] - ordered composite of commands with all-or-nothing execute
//! - [`ScopedRollback`] - explicit commit-or-rollback guard
//! - [`UndoStack`] - history of an editing session, with transactions

pub mod command;
pub mod group;
pub mod scope;
pub mod stack;

pub use command::{Command, CommandState};
pub use group::CommandGroup;
pub use scope::ScopedRollback;
pub use stack::UndoStack;
