use bolt_ops::{BoltOutput, BuildError};
use serde::{Deserialize, Serialize};
use solid_host::ComponentId;

use crate::inputs::{InputChange, Validation};

/// Lifecycle of one command dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// Inputs are built and handlers registered; nothing has run yet.
    Created,
    InputsChanging,
    Validating,
    Previewing,
    Executing,
    /// Handlers are dropped; the session accepts nothing further.
    Destroyed,
}

/// Events a command session registers handlers for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandlerKind {
    Execute,
    InputChanged,
    ExecutePreview,
    Destroy,
    ValidateInputs,
}

/// An event delivered by the host application to a running command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CommandEvent {
    /// The user confirmed the dialog.
    Execute,
    /// A dialog input changed value.
    InputChanged { change: InputChange },
    /// The graphics window needs a fresh preview.
    ExecutePreview,
    /// The dialog is closing.
    Destroy,
    /// The host asks whether the current inputs are acceptable.
    ValidateInputs,
}

impl CommandEvent {
    pub fn kind(&self) -> HandlerKind {
        match self {
            CommandEvent::Execute => HandlerKind::Execute,
            CommandEvent::InputChanged { .. } => HandlerKind::InputChanged,
            CommandEvent::ExecutePreview => HandlerKind::ExecutePreview,
            CommandEvent::Destroy => HandlerKind::Destroy,
            CommandEvent::ValidateInputs => HandlerKind::ValidateInputs,
        }
    }
}

/// Result of handling a [`CommandEvent`].
#[derive(Debug, Clone)]
pub enum CommandResponse {
    Executed(Box<BoltOutput>),
    InputUpdated,
    Previewed { component: ComponentId },
    Validated(Validation),
    Destroyed,
}

/// Errors from the command layer.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("cannot {action} while the session is {state:?}")]
    InvalidTransition {
        state: SessionState,
        action: &'static str,
    },

    #[error("no handler registered for {event:?}")]
    NotRegistered { event: HandlerKind },

    #[error("invalid inputs: {reason}")]
    InvalidInputs { reason: String },

    #[error("toolbar panel {panel} not found in workspace {workspace}")]
    PanelNotFound { workspace: String, panel: String },

    #[error("cached settings are unreadable")]
    Settings(#[from] serde_json::Error),

    #[error("bolt build failed")]
    Build(#[from] BuildError),
}
