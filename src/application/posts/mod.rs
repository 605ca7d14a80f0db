//! Post editing and mutation services.

mod commands;
mod editor;
mod lifecycle;

pub use commands::PostCommands;
pub use editor::PostEditor;
pub use lifecycle::PostLifecycle;

/// Result of a delete request that was allowed to complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// The author declined the confirmation; nothing was sent.
    Cancelled,
}
