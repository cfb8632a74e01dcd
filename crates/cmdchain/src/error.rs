//! Error types for dispatch.

use thiserror::Error;

/// Error returned by [`Chain::dispatch`](crate::Chain::dispatch).
///
/// The chain only ever synthesizes [`UnknownCommand`](Self::UnknownCommand).
/// Everything else is an action's own error, carried as-is in
/// [`Action`](Self::Action): its message and source chain are those of the
/// original error.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// No entry handled the invocation and it was not a help request.
    #[error("{executable} {command}: unknown command")]
    UnknownCommand {
        /// Name of the invoking executable
        executable: String,
        /// The command that was attempted
        command: String,
    },

    /// The matched action failed.
    #[error(transparent)]
    Action(anyhow::Error),
}

impl DispatchError {
    /// Creates an unknown-command error.
    pub fn unknown_command(executable: impl Into<String>, command: impl Into<String>) -> Self {
        DispatchError::UnknownCommand {
            executable: executable.into(),
            command: command.into(),
        }
    }

    /// Returns true if no handler matched.
    pub fn is_unknown_command(&self) -> bool {
        matches!(self, DispatchError::UnknownCommand { .. })
    }

    /// Returns the action's error, if this is one.
    pub fn as_action_error(&self) -> Option<&anyhow::Error> {
        match self {
            DispatchError::Action(err) => Some(err),
            DispatchError::UnknownCommand { .. } => None,
        }
    }

    /// Unwraps the action's original error, if this is one.
    pub fn into_action_error(self) -> Option<anyhow::Error> {
        match self {
            DispatchError::Action(err) => Some(err),
            DispatchError::UnknownCommand { .. } => None,
        }
    }
}
