//! Error type and editor options shared by every command.
//! No UI or storage dependencies.

use std::fmt;

/// Kind of circuit entity a name refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    NetClass,
    NetSignal,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::NetClass => write!(f, "net class"),
            EntityKind::NetSignal => write!(f, "net signal"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("There is already a {kind} with the name \"{name}\"")]
    NameCollision { kind: EntityKind, name: String },
    #[error("Invalid {kind} name: \"{name}\"")]
    InvalidName { kind: EntityKind, name: String },
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),
    #[error("Inconsistent model: {0}")]
    InconsistentModel(String),
    #[error("Command \"{command}\" {reason}")]
    InvalidState { command: String, reason: String },
    #[error("Undo stack: {0}")]
    Transaction(String),
}

impl CommandError {
    pub(crate) fn invalid_state(command: &str, reason: impl Into<String>) -> Self {
        CommandError::InvalidState {
            command: command.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn missing(what: impl fmt::Display) -> Self {
        CommandError::InconsistentModel(format!("{} does not exist", what))
    }
}

pub type Result<T> = std::result::Result<T, CommandError>;

/// Editor-wide settings (CLI flags map onto these).
#[derive(Clone, Debug)]
pub struct EditorOptions {
    /// Maximum distance (nm) at which an item counts as "at" a position.
    pub hit_tolerance: i64,
    /// Net points must satisfy `|x| <= max_extent && |y| <= max_extent` (nm).
    pub max_extent: i64,
    /// Number of undo steps kept by the undo stack.
    pub undo_limit: usize,
    /// Net class front ends place new net signals in unless told otherwise.
    pub default_net_class: String,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            hit_tolerance: 0,
            max_extent: 1_000_000_000,
            undo_limit: 100,
            default_net_class: "default".to_string(),
        }
    }
}
